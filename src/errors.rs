use thiserror::Error;

#[derive(Error, Debug)]
pub enum MarketDataError {
    #[error("Network error: {0}")]
    Network(#[from] reqwest::Error),

    #[error("Provider error ({status}): {message}")]
    Provider { status: u16, message: String },

    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Parsing error: {0}")]
    Parsing(String),

    #[error("Invalid symbol: '{0}'")]
    InvalidSymbol(String),

    #[error("Invalid input: {0}")]
    InvalidInput(String),
}

impl From<serde_json::Error> for MarketDataError {
    fn from(error: serde_json::Error) -> Self {
        MarketDataError::Parsing(error.to_string())
    }
}
