use std::collections::HashMap;

use chrono::{DateTime, TimeZone, Utc};
use derive_getters::Getters;
use serde::Deserialize;

use crate::{
    errors::MarketDataError,
    models::{Bar, Dividend, PriceHistory, Profile},
};

#[derive(Debug, Deserialize, Getters)]
pub struct YahooChartEnvelopeDto {
    chart: YahooChartDto,
}

#[derive(Debug, Deserialize, Getters)]
pub struct YahooChartDto {
    result: Option<Vec<YahooChartResultDto>>,
    error: Option<YahooErrorDto>,
}

#[derive(Debug, Deserialize, Getters)]
pub struct YahooErrorDto {
    code: String,
    description: Option<String>,
}

#[derive(Debug, Deserialize, Getters)]
pub struct YahooChartResultDto {
    meta: YahooMetaDto,
    #[serde(default)]
    timestamp: Vec<i64>,
    #[serde(default)]
    events: Option<YahooEventsDto>,
    indicators: YahooIndicatorsDto,
}

#[derive(Debug, Deserialize, Getters)]
#[serde(rename_all = "camelCase")]
pub struct YahooMetaDto {
    symbol: String,
    currency: Option<String>,
    long_name: Option<String>,
    short_name: Option<String>,
}

#[derive(Debug, Deserialize, Getters)]
pub struct YahooEventsDto {
    #[serde(default)]
    dividends: HashMap<String, YahooDividendDto>,
}

#[derive(Debug, Deserialize, Getters)]
pub struct YahooDividendDto {
    amount: f64,
    date: i64,
}

#[derive(Debug, Deserialize, Getters)]
pub struct YahooIndicatorsDto {
    #[serde(default)]
    quote: Vec<YahooQuoteSeriesDto>,
}

/// Parallel arrays indexed like `timestamp`; the provider sends `null` for gaps.
#[derive(Debug, Default, Deserialize, Getters)]
pub struct YahooQuoteSeriesDto {
    #[serde(default)]
    open: Vec<Option<f64>>,
    #[serde(default)]
    high: Vec<Option<f64>>,
    #[serde(default)]
    low: Vec<Option<f64>>,
    #[serde(default)]
    close: Vec<Option<f64>>,
    #[serde(default)]
    volume: Vec<Option<f64>>,
}

fn timestamp_to_utc(seconds: i64) -> Option<DateTime<Utc>> {
    Utc.timestamp_opt(seconds, 0).single()
}

fn value_at(series: &[Option<f64>], index: usize) -> Option<f64> {
    series
        .get(index)
        .copied()
        .flatten()
        .filter(|v| v.is_finite())
}

impl YahooChartEnvelopeDto {
    /// First chart result, or the provider's own error when it sent one.
    pub fn into_result(self, symbol: &str) -> Result<YahooChartResultDto, MarketDataError> {
        if let Some(error) = self.chart.error {
            let message = error.description.unwrap_or(error.code);
            return Err(MarketDataError::NotFound(format!("{}: {}", symbol, message)));
        }

        self.chart
            .result
            .and_then(|results| results.into_iter().next())
            .ok_or_else(|| MarketDataError::NotFound(format!("No chart result for {}", symbol)))
    }
}

impl YahooChartResultDto {
    pub fn to_price_history(&self) -> PriceHistory {
        let empty = YahooQuoteSeriesDto::default();
        let series = self.indicators.quote.first().unwrap_or(&empty);

        let bars = self
            .timestamp
            .iter()
            .enumerate()
            .filter_map(|(i, ts)| {
                let close = value_at(&series.close, i)?;
                let date = timestamp_to_utc(*ts)?;
                Some(Bar::new(
                    date,
                    value_at(&series.open, i).unwrap_or(close),
                    value_at(&series.high, i).unwrap_or(close),
                    value_at(&series.low, i).unwrap_or(close),
                    close,
                    value_at(&series.volume, i).unwrap_or(0.0).max(0.0) as u64,
                ))
            })
            .collect();

        let mut dividends: Vec<Dividend> = self
            .events
            .as_ref()
            .map(|events| {
                events
                    .dividends
                    .values()
                    .filter_map(|d| Some(Dividend::new(timestamp_to_utc(d.date)?, d.amount)))
                    .collect()
            })
            .unwrap_or_default();
        dividends.sort_by(|a, b| a.date().cmp(b.date()));

        let name = self
            .meta
            .short_name
            .clone()
            .or_else(|| self.meta.long_name.clone());

        PriceHistory::new(
            self.meta.symbol.clone(),
            name,
            self.meta.currency.clone(),
            bars,
            dividends,
        )
    }
}

#[derive(Debug, Deserialize, Getters)]
#[serde(rename_all = "camelCase")]
pub struct YahooQuoteSummaryEnvelopeDto {
    quote_summary: YahooQuoteSummaryDto,
}

#[derive(Debug, Deserialize, Getters)]
pub struct YahooQuoteSummaryDto {
    result: Option<Vec<YahooQuoteSummaryResultDto>>,
    error: Option<YahooErrorDto>,
}

#[derive(Debug, Deserialize, Getters)]
#[serde(rename_all = "camelCase")]
pub struct YahooQuoteSummaryResultDto {
    summary_detail: Option<YahooSummaryDetailDto>,
    price: Option<YahooPriceDto>,
}

#[derive(Debug, Deserialize, Getters)]
#[serde(rename_all = "camelCase")]
pub struct YahooSummaryDetailDto {
    dividend_yield: Option<YahooRawValueDto>,
    #[serde(rename = "trailingPE")]
    trailing_pe: Option<YahooRawValueDto>,
    market_cap: Option<YahooRawValueDto>,
}

#[derive(Debug, Deserialize, Getters)]
#[serde(rename_all = "camelCase")]
pub struct YahooPriceDto {
    short_name: Option<String>,
    long_name: Option<String>,
}

/// `{"raw": 0.0045, "fmt": "0.45%"}`, or `{}` when the field is unknown.
#[derive(Debug, Deserialize, Getters)]
pub struct YahooRawValueDto {
    raw: Option<f64>,
}

fn raw(value: &Option<YahooRawValueDto>) -> Option<f64> {
    value.as_ref().and_then(|v| v.raw).filter(|v| v.is_finite())
}

impl YahooQuoteSummaryEnvelopeDto {
    pub fn to_profile(&self, symbol: &str) -> Result<Profile, MarketDataError> {
        if let Some(error) = &self.quote_summary.error {
            let message = error.description.clone().unwrap_or_else(|| error.code.clone());
            return Err(MarketDataError::NotFound(format!("{}: {}", symbol, message)));
        }

        let result = self
            .quote_summary
            .result
            .as_ref()
            .and_then(|results| results.first())
            .ok_or_else(|| MarketDataError::NotFound(format!("No summary for {}", symbol)))?;

        let detail = result.summary_detail.as_ref();
        let name = result
            .price
            .as_ref()
            .and_then(|p| p.short_name.clone().or_else(|| p.long_name.clone()));

        Ok(Profile::new(
            name,
            detail.and_then(|d| raw(&d.dividend_yield)).map(|y| y * 100.0),
            detail.and_then(|d| raw(&d.trailing_pe)),
            detail
                .and_then(|d| raw(&d.market_cap))
                .filter(|cap| *cap >= 0.0)
                .map(|cap| cap as u64),
        ))
    }
}
