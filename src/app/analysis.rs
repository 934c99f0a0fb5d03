use chrono::Duration;

use crate::{
    app::calc,
    models::{
        AnalysisSettings, LevelsMethod, PriceHistory, Profile, QuoteSnapshot, ScoringMethod,
    },
};

/// Builds the snapshot for the latest bar. `None` when the history has no bars.
pub fn build_snapshot(
    history: &PriceHistory,
    profile: Option<&Profile>,
    settings: &AnalysisSettings,
) -> Option<QuoteSnapshot> {
    let last = history.last_bar()?;
    let close = *last.close();
    if !close.is_finite() {
        return None;
    }

    let indicators = calc::indicators(history.bars());
    let flags = calc::trend_flags(close, &indicators);

    let score = match settings.scoring {
        ScoringMethod::Linear => calc::linear_score(&flags),
        ScoringMethod::Logistic => {
            let z = calc::z_score(close, indicators.sma20, indicators.std20);
            calc::logistic_score(z, flags.long)
        }
    };

    let volatility = match settings.levels {
        LevelsMethod::Std => indicators.std20,
        LevelsMethod::Atr => indicators.atr14,
    };

    let name = profile
        .and_then(|p| p.name().clone())
        .or_else(|| history.name().clone())
        .unwrap_or_else(|| history.symbol().clone());

    let dividend_yield = profile
        .and_then(|p| *p.dividend_yield())
        .or_else(|| trailing_dividend_yield(history, close));

    Some(QuoteSnapshot::new(
        history.symbol().clone(),
        name,
        round_price(close),
        flags,
        score,
        calc::score_color(score),
        indicators,
        history.currency().clone(),
        dividend_yield,
        Some(calc::trade_levels(close, volatility)),
        profile.and_then(|p| *p.pe_ratio()),
        profile.and_then(|p| *p.market_cap()),
    ))
}

/// Dividends paid in the year before the last bar, as a percentage of `close`.
pub fn trailing_dividend_yield(history: &PriceHistory, close: f64) -> Option<f64> {
    let last_date = *history.last_bar()?.date();
    let cutoff = last_date - Duration::days(365);

    let paid: f64 = history
        .dividends()
        .iter()
        .filter(|d| *d.date() > cutoff && *d.date() <= last_date)
        .map(|d| *d.amount())
        .sum();

    if paid <= 0.0 || close <= 0.0 {
        return None;
    }

    Some(paid / close * 100.0)
}

fn round_price(price: f64) -> f64 {
    (price * 100.0).round() / 100.0
}
