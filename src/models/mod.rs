pub mod bar;
pub mod fetch_outcome;
pub mod portfolio_entry;
pub mod settings;
pub mod snapshot;
pub mod watchlist;

pub use bar::{Bar, Dividend, PriceHistory, Profile};
pub use fetch_outcome::FetchOutcome;
pub use portfolio_entry::{PacAllocation, PortfolioEntry, PortfolioRow};
pub use settings::{AnalysisSettings, HistoryRange, LevelsMethod, ScoringMethod};
pub use snapshot::{Indicators, QuoteSnapshot, ScoreColor, TradeLevels, TrendFlags};
pub use watchlist::{MarketCategory, Watchlist};
