use crate::{
    errors::MarketDataError,
    models::{HistoryRange, PriceHistory, Profile},
};

/// Source of daily bars and descriptive metadata for a symbol.
pub trait MarketDataProvider {
    fn fetch_history(
        &self,
        symbol: &str,
        range: HistoryRange,
    ) -> impl Future<Output = Result<PriceHistory, MarketDataError>>;

    fn fetch_profile(&self, symbol: &str) -> impl Future<Output = Result<Profile, MarketDataError>>;
}
