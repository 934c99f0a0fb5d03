use crate::models::{Bar, Indicators, ScoreColor, TradeLevels, TrendFlags};

pub const SHORT_WINDOW: usize = 20;
pub const MEDIUM_WINDOW: usize = 50;
pub const LONG_WINDOW: usize = 200;
pub const ATR_WINDOW: usize = 14;

const BASE_SCORE: i32 = 30;
const LONG_WEIGHT: i32 = 40;
const MEDIUM_WEIGHT: i32 = 20;
const SHORT_WEIGHT: i32 = 10;

const LOGISTIC_WEIGHT: f64 = 0.6;
const ENTRY_DISCOUNT: f64 = 0.99;
const TAKE_PROFIT_MULTIPLE: f64 = 3.0;
const STOP_LOSS_MULTIPLE: f64 = 2.0;

/// Mean of the trailing `window` values, `None` when history is too short.
pub fn sma(values: &[f64], window: usize) -> Option<f64> {
    if window == 0 || values.len() < window {
        return None;
    }

    let tail = &values[values.len() - window..];
    Some(tail.iter().sum::<f64>() / window as f64)
}

/// Sample standard deviation (n - 1) of the trailing `window` values.
pub fn rolling_std(values: &[f64], window: usize) -> Option<f64> {
    if window < 2 {
        return None;
    }

    let mean = sma(values, window)?;
    let tail = &values[values.len() - window..];
    let variance = tail.iter().map(|v| (v - mean).powi(2)).sum::<f64>() / (window - 1) as f64;

    Some(variance.sqrt())
}

/// Average true range over the trailing `window` bars. Needs one extra bar for the
/// previous close of the first range.
pub fn atr(bars: &[Bar], window: usize) -> Option<f64> {
    if window == 0 || bars.len() < window + 1 {
        return None;
    }

    let start = bars.len() - window;
    let total: f64 = (start..bars.len())
        .map(|i| {
            let bar = &bars[i];
            let prev_close = *bars[i - 1].close();
            let high_low = bar.high() - bar.low();
            let high_close = (bar.high() - prev_close).abs();
            let low_close = (bar.low() - prev_close).abs();
            high_low.max(high_close).max(low_close)
        })
        .sum();

    Some(total / window as f64)
}

pub fn indicators(bars: &[Bar]) -> Indicators {
    let closes: Vec<f64> = bars.iter().map(|bar| *bar.close()).collect();

    Indicators::new(
        sma(&closes, SHORT_WINDOW),
        sma(&closes, MEDIUM_WINDOW),
        sma(&closes, LONG_WINDOW),
        rolling_std(&closes, SHORT_WINDOW),
        atr(bars, ATR_WINDOW),
    )
}

pub fn trend_flags(close: f64, indicators: &Indicators) -> TrendFlags {
    let above = |average: Option<f64>| matches!(average, Some(value) if close > value);

    TrendFlags::new(
        above(indicators.sma200),
        above(indicators.sma50),
        above(indicators.sma20),
    )
}

pub fn linear_score(flags: &TrendFlags) -> u8 {
    let mut score = BASE_SCORE;
    if flags.long {
        score += LONG_WEIGHT;
    }
    if flags.medium {
        score += MEDIUM_WEIGHT;
    }
    if flags.short {
        score += SHORT_WEIGHT;
    }

    score.clamp(1, 100) as u8
}

/// `(sma20 - close) / std20`, or 0 whenever the ratio is undefined.
pub fn z_score(close: f64, sma20: Option<f64>, std20: Option<f64>) -> f64 {
    match (sma20, std20) {
        (Some(mean), Some(std)) if std > 0.0 && std.is_finite() => {
            let z = (mean - close) / std;
            if z.is_finite() { z } else { 0.0 }
        }
        _ => 0.0,
    }
}

pub fn logistic_score(z: f64, long_trend: bool) -> u8 {
    let probability = 1.0 / (1.0 + (-z).exp());
    let trend = if long_trend { 100.0 } else { 0.0 };
    let blended = LOGISTIC_WEIGHT * 100.0 * probability + (1.0 - LOGISTIC_WEIGHT) * trend;

    if blended.is_nan() {
        return 1;
    }

    blended.round().clamp(1.0, 100.0) as u8
}

/// Red at 1, green at 100.
pub fn score_color(score: u8) -> ScoreColor {
    let ratio = f64::from(score.clamp(1, 100)) / 100.0;

    ScoreColor::new(
        (255.0 * (1.0 - ratio)) as u8,
        (255.0 * ratio) as u8,
    )
}

/// Entry slightly under the close; exits at multiples of the given volatility.
pub fn trade_levels(close: f64, volatility: Option<f64>) -> TradeLevels {
    let volatility = volatility.filter(|v| v.is_finite()).unwrap_or(0.0);

    TradeLevels::new(
        close * ENTRY_DISCOUNT,
        close + TAKE_PROFIT_MULTIPLE * volatility,
        close - STOP_LOSS_MULTIPLE * volatility,
    )
}
