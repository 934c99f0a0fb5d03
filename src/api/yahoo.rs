use std::{sync::Arc, time::Duration};

use reqwest::{Client, StatusCode, header};
use tokio::sync::RwLock;

use super::{
    provider::MarketDataProvider,
    utils::{make_request, parse_response_object},
    yahoo_dto::{YahooChartEnvelopeDto, YahooQuoteSummaryEnvelopeDto},
};
use crate::{
    errors::MarketDataError,
    models::{HistoryRange, PriceHistory, Profile},
};

const BASE_URL: &str = "https://query1.finance.yahoo.com";
const COOKIE_URL: &str = "https://fc.yahoo.com";
const USER_AGENT: &str = "Mozilla/5.0 (X11; Linux x86_64) quant-terminal/0.1";

/// Session cookie plus the crumb token quoteSummary requires alongside it.
#[derive(Clone, Debug, PartialEq)]
pub struct Crumb {
    pub cookie: String,
    pub value: String,
}

#[derive(Clone, Debug)]
pub struct YahooApi {
    client: Client,
    base_url: String,
    cookie_url: String,
    crumb: Arc<RwLock<Option<Crumb>>>,
}

impl YahooApi {
    pub fn new(timeout: Duration) -> Result<Self, MarketDataError> {
        let client = Client::builder()
            .user_agent(USER_AGENT)
            .timeout(timeout)
            .build()?;

        Ok(Self::with_client(client, BASE_URL, COOKIE_URL))
    }

    pub fn with_client(client: Client, base_url: &str, cookie_url: &str) -> Self {
        Self {
            client,
            base_url: base_url.trim_end_matches('/').to_string(),
            cookie_url: cookie_url.to_string(),
            crumb: Arc::new(RwLock::new(None)),
        }
    }

    pub async fn get_chart(
        &self,
        symbol: &str,
        range: HistoryRange,
    ) -> Result<PriceHistory, MarketDataError> {
        let params = format!("range={}&interval=1d&events=div", range.as_query());
        let endpoint = format!("v8/finance/chart/{}", encode_symbol(symbol));
        let res = make_request(&self.client, &self.base_url, &endpoint, &params, None).await?;

        let envelope = parse_response_object::<YahooChartEnvelopeDto>(
            res,
            &format!("Failed to parse chart for {}", symbol),
        )?;

        Ok(envelope.into_result(symbol)?.to_price_history())
    }

    /// quoteSummary rejects requests without a crumb. A 401 means the crumb went
    /// stale, so it is fetched again and the request retried once.
    pub async fn get_summary(&self, symbol: &str) -> Result<Profile, MarketDataError> {
        let crumb = self.crumb(false).await?;

        match self.request_summary(symbol, &crumb).await {
            Err(MarketDataError::Provider { status: 401, .. }) => {
                log::debug!("Crumb rejected for {}, fetching a new one", symbol);
                let crumb = self.crumb(true).await?;
                self.request_summary(symbol, &crumb).await
            }
            other => other,
        }
    }

    async fn request_summary(
        &self,
        symbol: &str,
        crumb: &Crumb,
    ) -> Result<Profile, MarketDataError> {
        let params = format!(
            "modules=summaryDetail,price&crumb={}",
            encode_symbol(&crumb.value)
        );
        let endpoint = format!("v10/finance/quoteSummary/{}", encode_symbol(symbol));
        let res = make_request(
            &self.client,
            &self.base_url,
            &endpoint,
            &params,
            Some(&crumb.cookie),
        )
        .await?;

        parse_response_object::<YahooQuoteSummaryEnvelopeDto>(
            res,
            &format!("Failed to parse summary for {}", symbol),
        )?
        .to_profile(symbol)
    }

    /// Cached crumb, or a fresh one when `refresh` is set or none is stored yet.
    pub async fn crumb(&self, refresh: bool) -> Result<Crumb, MarketDataError> {
        if !refresh {
            if let Some(crumb) = self.crumb.read().await.clone() {
                return Ok(crumb);
            }
        }

        let crumb = self.fetch_crumb().await?;
        *self.crumb.write().await = Some(crumb.clone());

        Ok(crumb)
    }

    async fn fetch_crumb(&self) -> Result<Crumb, MarketDataError> {
        // The cookie host answers 404 but still sets the session cookie.
        let res = self.client.get(&self.cookie_url).send().await?;
        let cookie = res
            .headers()
            .get(header::SET_COOKIE)
            .and_then(|value| value.to_str().ok())
            .and_then(session_cookie)
            .ok_or_else(|| MarketDataError::Provider {
                status: res.status().as_u16(),
                message: String::from("No session cookie in response"),
            })?;

        let res = self
            .client
            .get(format!("{}/v1/test/getcrumb", self.base_url))
            .header(header::COOKIE, &cookie)
            .send()
            .await?;
        let status = res.status();
        let value = res.text().await?.trim().to_string();

        if status != StatusCode::OK || value.is_empty() || value.starts_with('{') {
            return Err(MarketDataError::Provider {
                status: status.as_u16(),
                message: format!("Failed to obtain crumb: {}", value),
            });
        }

        log::debug!("Obtained new Yahoo crumb");
        Ok(Crumb { cookie, value })
    }
}

impl MarketDataProvider for YahooApi {
    async fn fetch_history(
        &self,
        symbol: &str,
        range: HistoryRange,
    ) -> Result<PriceHistory, MarketDataError> {
        self.get_chart(symbol, range).await
    }

    async fn fetch_profile(&self, symbol: &str) -> Result<Profile, MarketDataError> {
        self.get_summary(symbol).await
    }
}

/// `A3=d=AQAB...; Expires=...; Domain=.yahoo.com` becomes `A3=d=AQAB...`.
pub fn session_cookie(set_cookie: &str) -> Option<String> {
    let pair = set_cookie.split(';').next()?.trim();
    if pair.contains('=') {
        Some(pair.to_string())
    } else {
        None
    }
}

/// Symbols such as `GC=F` or `^GSPC` must be percent-encoded in the path.
pub fn encode_symbol(symbol: &str) -> String {
    symbol
        .chars()
        .map(|c| match c {
            'A'..='Z' | 'a'..='z' | '0'..='9' | '.' | '-' | '_' => c.to_string(),
            other => {
                let mut buf = [0u8; 4];
                other
                    .encode_utf8(&mut buf)
                    .bytes()
                    .map(|b| format!("%{:02X}", b))
                    .collect()
            }
        })
        .collect()
}
