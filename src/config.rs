use std::time::Duration;

use anyhow::Result;
use clap::Parser;

use crate::models::{AnalysisSettings, HistoryRange, LevelsMethod, ScoringMethod, Watchlist};

#[derive(Clone, Debug, Parser)]
#[command(
    name = "quant-terminal",
    version,
    about = "Market watchlist with trend scores and a session portfolio"
)]
pub struct Config {
    /// Minutes a fetched symbol stays cached before it is recomputed.
    #[arg(long, env = "QUANT_TTL_MINUTES", default_value_t = 60, value_parser = clap::value_parser!(u64).range(1..))]
    pub ttl_minutes: u64,

    /// History window requested from the provider.
    #[arg(long, env = "QUANT_RANGE", value_enum, default_value_t = HistoryRange::OneYear)]
    pub range: HistoryRange,

    #[arg(long, env = "QUANT_SCORING", value_enum, default_value_t = ScoringMethod::Linear)]
    pub scoring: ScoringMethod,

    /// Volatility measure used for take-profit and stop-loss.
    #[arg(long, env = "QUANT_LEVELS", value_enum, default_value_t = LevelsMethod::Std)]
    pub levels: LevelsMethod,

    /// CSV of `category,symbol` rows replacing the built-in watchlist.
    #[arg(long, env = "QUANT_WATCHLIST")]
    pub watchlist: Option<String>,

    #[arg(long, env = "QUANT_LOG_FILE", default_value = "quant-terminal.log")]
    pub log_file: String,

    /// Symbol printed in front of money amounts.
    #[arg(long, env = "QUANT_CURRENCY", default_value = "€")]
    pub currency: String,

    #[arg(long, env = "QUANT_TIMEOUT_SECS", default_value_t = 10)]
    pub timeout_secs: u64,

    /// Print every symbol's fetch outcome, errors included, and exit.
    #[arg(long)]
    pub diagnose: bool,
}

impl Config {
    pub fn settings(&self) -> AnalysisSettings {
        AnalysisSettings {
            range: self.range,
            scoring: self.scoring,
            levels: self.levels,
        }
    }

    pub fn ttl(&self) -> Duration {
        Duration::from_secs(self.ttl_minutes * 60)
    }

    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }

    pub fn log_path(&self) -> String {
        shellexpand::tilde(&self.log_file).into_owned()
    }

    pub fn watchlist(&self) -> Result<Watchlist> {
        match &self.watchlist {
            Some(path) => Watchlist::from_csv(&shellexpand::tilde(path)),
            None => Ok(Watchlist::default()),
        }
    }
}
