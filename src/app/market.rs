use std::{
    sync::LazyLock,
    time::{Duration, Instant},
};

use regex::Regex;

use crate::{
    api::MarketDataProvider,
    app::{analysis, cache::TtlCache},
    errors::MarketDataError,
    models::{AnalysisSettings, FetchOutcome, MarketCategory, QuoteSnapshot},
};

static SYMBOL_PATTERN: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^[A-Z0-9^][A-Z0-9.\-=^]{0,19}$").expect("symbol pattern is valid")
});

/// Upper-cases and checks a user-typed ticker symbol.
pub fn normalize_symbol(input: &str) -> Result<String, MarketDataError> {
    let symbol = input.trim().to_uppercase();
    if SYMBOL_PATTERN.is_match(&symbol) {
        Ok(symbol)
    } else {
        Err(MarketDataError::InvalidSymbol(input.trim().to_string()))
    }
}

/// Fetches, analyses and memoizes snapshots. `None` in the cache marks a
/// symbol whose history came back empty.
pub struct MarketService<P: MarketDataProvider> {
    provider: P,
    cache: TtlCache<Option<QuoteSnapshot>>,
    settings: AnalysisSettings,
}

impl<P: MarketDataProvider> MarketService<P> {
    pub fn new(provider: P, ttl: Duration, settings: AnalysisSettings) -> Self {
        Self {
            provider,
            cache: TtlCache::new(ttl),
            settings,
        }
    }

    pub fn settings(&self) -> &AnalysisSettings {
        &self.settings
    }

    pub fn ttl(&self) -> Duration {
        self.cache.ttl()
    }

    pub fn cached_symbols(&self) -> usize {
        self.cache.len()
    }

    /// Drops cache entries older than the TTL. Returns how many went.
    pub fn purge_expired(&mut self) -> usize {
        self.cache.purge_expired(Instant::now())
    }

    pub async fn analyze(&mut self, symbol: &str) -> FetchOutcome {
        if let Some(cached) = self.cache.get(symbol) {
            log::trace!("Cache hit for {}", symbol);
            return FetchOutcome::from(cached);
        }

        let history = match self.provider.fetch_history(symbol, self.settings.range).await {
            Ok(history) => history,
            Err(err) => {
                log::warn!("Failed to fetch history for {}: {}", symbol, err);
                return FetchOutcome::Failed(err);
            }
        };

        if history.is_empty() {
            log::warn!("No bars returned for {}", symbol);
            self.cache.insert(symbol, None);
            return FetchOutcome::Empty;
        }

        let profile = match self.provider.fetch_profile(symbol).await {
            Ok(profile) => Some(profile),
            Err(err) => {
                log::debug!("No profile for {}: {}", symbol, err);
                None
            }
        };

        let snapshot = analysis::build_snapshot(&history, profile.as_ref(), &self.settings);
        if let Some(snapshot) = &snapshot {
            log::info!(
                "Analysed {}: close {:.2}, score {}",
                symbol,
                snapshot.price(),
                snapshot.score()
            );
        }
        self.cache.insert(symbol, snapshot.clone());

        FetchOutcome::from(snapshot)
    }

    /// Ready snapshots for the category, in watchlist order. Other outcomes are
    /// logged and skipped.
    pub async fn analyze_category(&mut self, category: &MarketCategory) -> Vec<QuoteSnapshot> {
        self.analyze_symbols(category.symbols()).await
    }

    pub async fn analyze_symbols(&mut self, symbols: &[String]) -> Vec<QuoteSnapshot> {
        let mut snapshots = Vec::with_capacity(symbols.len());

        for symbol in symbols {
            match self.analyze(symbol).await {
                FetchOutcome::Ready(snapshot) => snapshots.push(snapshot),
                FetchOutcome::Empty => log::info!("Skipping {}: no data", symbol),
                FetchOutcome::Failed(err) => log::info!("Skipping {}: {}", symbol, err),
            }
        }

        snapshots
    }

    /// Analyses a free-text symbol entered by the user.
    pub async fn lookup(&mut self, input: &str) -> FetchOutcome {
        match normalize_symbol(input) {
            Ok(symbol) => self.analyze(&symbol).await,
            Err(err) => FetchOutcome::Failed(err),
        }
    }
}
