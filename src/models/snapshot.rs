use derive_getters::Getters;
use derive_new::new;
use ratatui::style::Color;

#[derive(Clone, Copy, Debug, Default, Eq, PartialEq, new)]
pub struct TrendFlags {
    /// Close above SMA(200).
    pub long: bool,
    /// Close above SMA(50).
    pub medium: bool,
    /// Close above SMA(20).
    pub short: bool,
}

#[derive(Clone, Copy, Debug, Default, PartialEq, new)]
pub struct Indicators {
    pub sma20: Option<f64>,
    pub sma50: Option<f64>,
    pub sma200: Option<f64>,
    pub std20: Option<f64>,
    pub atr14: Option<f64>,
}

#[derive(Clone, Copy, Debug, Eq, PartialEq, new)]
pub struct ScoreColor {
    pub r: u8,
    pub g: u8,
}

impl ScoreColor {
    pub fn hex(&self) -> String {
        format!("#{:02x}{:02x}00", self.r, self.g)
    }

    pub fn to_color(&self) -> Color {
        Color::Rgb(self.r, self.g, 0)
    }
}

#[derive(Clone, Copy, Debug, PartialEq, new)]
pub struct TradeLevels {
    pub entry: f64,
    pub take_profit: f64,
    pub stop_loss: f64,
}

#[derive(Clone, Debug, Getters, PartialEq, new)]
pub struct QuoteSnapshot {
    symbol: String,
    name: String,
    price: f64,
    flags: TrendFlags,
    score: u8,
    color: ScoreColor,
    indicators: Indicators,
    currency: Option<String>,
    dividend_yield: Option<f64>,
    levels: Option<TradeLevels>,
    pe_ratio: Option<f64>,
    market_cap: Option<u64>,
}
