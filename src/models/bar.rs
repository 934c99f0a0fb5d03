use chrono::{DateTime, Utc};
use derive_getters::Getters;
use derive_new::new;
use serde::{Deserialize, Serialize};

#[derive(Clone, Debug, Deserialize, Getters, PartialEq, Serialize, new)]
pub struct Bar {
    date: DateTime<Utc>,
    open: f64,
    high: f64,
    low: f64,
    close: f64,
    volume: u64,
}

#[derive(Clone, Debug, Deserialize, Getters, PartialEq, Serialize, new)]
pub struct Dividend {
    date: DateTime<Utc>,
    amount: f64,
}

/// Daily bars for one symbol, oldest first.
#[derive(Clone, Debug, Default, Getters, new)]
pub struct PriceHistory {
    symbol: String,
    name: Option<String>,
    currency: Option<String>,
    bars: Vec<Bar>,
    dividends: Vec<Dividend>,
}

impl PriceHistory {
    pub fn last_bar(&self) -> Option<&Bar> {
        self.bars.last()
    }

    pub fn is_empty(&self) -> bool {
        self.bars.is_empty()
    }
}

/// Descriptive metadata that the chart endpoint does not carry.
#[derive(Clone, Debug, Default, Getters, PartialEq, new)]
pub struct Profile {
    name: Option<String>,
    dividend_yield: Option<f64>,
    pe_ratio: Option<f64>,
    market_cap: Option<u64>,
}
