pub mod analysis;
pub mod app;
pub mod cache;
pub mod calc;
pub mod diagnose;
pub mod market;
pub mod portfolio;
pub mod session;
pub mod sort;
pub mod ui;

pub use app::App;
pub use market::MarketService;
pub use portfolio::Portfolio;
pub use session::Session;
