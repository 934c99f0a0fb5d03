use reqwest::{Client, StatusCode, header};
use serde::de::DeserializeOwned;
use serde_json::Value;

use crate::errors::MarketDataError;

pub async fn make_request(
    client: &Client,
    base_url: &str,
    endpoint: &str,
    params: &str,
    cookie: Option<&str>,
) -> Result<Value, MarketDataError> {
    let url = format!("{}/{}?{}", base_url, endpoint, params);
    log::debug!("GET {}", url);

    let mut req = client.get(&url);
    if let Some(cookie) = cookie {
        req = req.header(header::COOKIE, cookie);
    }
    let res = req.send().await?;
    let status = res.status();
    let text = res.text().await?;

    if !status.is_success() {
        let message = provider_error_message(&text).unwrap_or_else(|| status.to_string());
        return Err(match status {
            StatusCode::NOT_FOUND => MarketDataError::NotFound(message),
            _ => MarketDataError::Provider {
                status: status.as_u16(),
                message,
            },
        });
    }

    let data = serde_json::from_str::<Value>(&text)?;

    Ok(data)
}

/// Yahoo wraps failures as `{"<root>": {"result": null, "error": {"description": ..}}}`.
pub fn provider_error_message(text: &str) -> Option<String> {
    let value = serde_json::from_str::<Value>(text).ok()?;
    let root = value.as_object()?.values().next()?;
    let error = root.get("error")?;

    error
        .get("description")
        .and_then(Value::as_str)
        .map(str::to_string)
        .or_else(|| error.get("code").and_then(Value::as_str).map(str::to_string))
}

pub fn parse_response_object<T>(data: Value, error_msg: &str) -> Result<T, MarketDataError>
where
    T: DeserializeOwned,
{
    match data {
        Value::Object(obj) => serde_json::from_value(Value::Object(obj))
            .map_err(|e| MarketDataError::Parsing(format!("{}: {}", error_msg, e))),
        _ => Err(MarketDataError::Parsing(
            "Unexpected API response format: not an object".to_string(),
        )),
    }
}
