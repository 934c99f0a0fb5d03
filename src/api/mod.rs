pub mod provider;
pub mod utils;
pub mod yahoo;
pub mod yahoo_dto;

pub use provider::MarketDataProvider;
pub use yahoo::YahooApi;
