use anyhow::{Context, Error, Result};
use csv::ReaderBuilder;
use derive_getters::Getters;
use derive_new::new;

#[derive(Clone, Debug, Eq, Getters, PartialEq, new)]
pub struct MarketCategory {
    label: String,
    symbols: Vec<String>,
}

/// Categories shown as tabs plus the symbols featured in the top strip.
/// Built once at start-up and never mutated afterwards.
#[derive(Clone, Debug, Eq, Getters, PartialEq, new)]
pub struct Watchlist {
    categories: Vec<MarketCategory>,
    spotlight: Vec<String>,
}

const SPOTLIGHT_LABEL: &str = "spotlight";

impl Default for Watchlist {
    fn default() -> Self {
        let category = |label: &str, symbols: &[&str]| {
            MarketCategory::new(
                label.to_string(),
                symbols.iter().map(|s| s.to_string()).collect(),
            )
        };

        Self {
            categories: vec![
                category(
                    "Italia",
                    &[
                        "LDO.MI", "ENEL.MI", "ISP.MI", "UCG.MI", "RACE.MI", "ENI.MI", "STMMI.MI",
                        "A2A.MI", "G.MI", "PST.MI", "TEN.MI", "AZM.MI",
                    ],
                ),
                category(
                    "USA",
                    &[
                        "AAPL", "NVDA", "MSFT", "TSLA", "AMZN", "GOOGL", "META", "BRK-B", "AMD",
                        "NFLX", "AVGO", "COST",
                    ],
                ),
                category(
                    "ETF",
                    &[
                        "SWDA.MI", "CSSPX.MI", "EIMI.MI", "TLT", "IBCI.MI", "VUSA.L", "SMH",
                    ],
                ),
                category(
                    "Crypto",
                    &["BTC-EUR", "ETH-EUR", "SOL-EUR", "BNB-EUR", "XRP-EUR", "ADA-EUR"],
                ),
            ],
            spotlight: ["LDO.MI", "NVDA", "BTC-EUR", "GC=F", "NOVO-B.CO"]
                .iter()
                .map(|s| s.to_string())
                .collect(),
        }
    }
}

impl Watchlist {
    /// Reads `category,symbol` rows. Rows labelled `spotlight` feed the top strip.
    /// Category order follows first appearance in the file.
    pub fn from_csv(path: &str) -> Result<Self> {
        let mut reader = ReaderBuilder::new()
            .has_headers(false)
            .flexible(true)
            .trim(csv::Trim::All)
            .comment(Some(b'#'))
            .from_path(path)
            .with_context(|| format!("Failed to open watchlist file at path: {}", path))?;

        let mut categories: Vec<MarketCategory> = Vec::new();
        let mut spotlight = Vec::new();

        for (row_idx, record) in reader.records().enumerate() {
            let rec = record
                .with_context(|| format!("Failed to read watchlist record at row {}", row_idx + 1))?;

            if rec.len() < 2 {
                return Err(Error::msg(format!(
                    "Invalid watchlist format at row {}: expected 2 columns, found {}",
                    row_idx + 1,
                    rec.len()
                )));
            }

            let label = rec[0].to_string();
            let symbol = rec[1].to_uppercase();

            if label.is_empty() || symbol.is_empty() {
                log::warn!("Skipping incomplete watchlist row {}", row_idx + 1);
                continue;
            }

            if label.eq_ignore_ascii_case(SPOTLIGHT_LABEL) {
                spotlight.push(symbol);
                continue;
            }

            match categories.iter_mut().find(|c| c.label == label) {
                Some(category) => {
                    if !category.symbols.contains(&symbol) {
                        category.symbols.push(symbol);
                    }
                }
                None => categories.push(MarketCategory::new(label, vec![symbol])),
            }
        }

        if categories.is_empty() {
            return Err(Error::msg(format!("Watchlist file {} has no categories", path)));
        }

        Ok(Self::new(categories, spotlight))
    }

    pub fn labels(&self) -> Vec<&str> {
        self.categories.iter().map(|c| c.label.as_str()).collect()
    }

    /// Every distinct symbol in tab order, spotlight last.
    pub fn all_symbols(&self) -> Vec<String> {
        let mut symbols: Vec<String> = Vec::new();
        for symbol in self
            .categories
            .iter()
            .flat_map(|c| c.symbols.iter())
            .chain(self.spotlight.iter())
        {
            if !symbols.contains(symbol) {
                symbols.push(symbol.clone());
            }
        }
        symbols
    }
}
