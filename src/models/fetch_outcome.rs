use crate::errors::MarketDataError;

use super::QuoteSnapshot;

/// Result of analysing one symbol. Tables keep only `Ready` rows.
#[derive(Debug)]
pub enum FetchOutcome {
    Ready(QuoteSnapshot),
    Empty,
    Failed(MarketDataError),
}

impl FetchOutcome {
    pub fn ready(self) -> Option<QuoteSnapshot> {
        match self {
            FetchOutcome::Ready(snapshot) => Some(snapshot),
            _ => None,
        }
    }

    pub fn is_ready(&self) -> bool {
        matches!(self, FetchOutcome::Ready(_))
    }

    pub fn label(&self) -> &str {
        match self {
            FetchOutcome::Ready(_) => "ready",
            FetchOutcome::Empty => "empty",
            FetchOutcome::Failed(_) => "failed",
        }
    }
}

impl From<Option<QuoteSnapshot>> for FetchOutcome {
    fn from(value: Option<QuoteSnapshot>) -> Self {
        match value {
            Some(snapshot) => FetchOutcome::Ready(snapshot),
            None => FetchOutcome::Empty,
        }
    }
}
