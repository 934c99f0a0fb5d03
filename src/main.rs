use std::fs::OpenOptions;

use anyhow::{Context, Result};
use clap::Parser;
use env_logger::{Env, Target};

use quant_terminal_tui::{
    api::YahooApi,
    app::{App, MarketService, Session, diagnose::diagnose},
    config::Config,
};

fn init_logging(path: &str) -> Result<()> {
    let file = OpenOptions::new()
        .create(true)
        .append(true)
        .open(path)
        .with_context(|| format!("Failed to open log file at path: {}", path))?;

    env_logger::Builder::from_env(Env::default().default_filter_or("info"))
        .target(Target::Pipe(Box::new(file)))
        .init();

    Ok(())
}

#[tokio::main]
async fn main() -> Result<()> {
    dotenv::dotenv().ok();
    let config = Config::parse();

    init_logging(&config.log_path())?;
    log::info!("Starting with {:?}", config);

    let watchlist = config.watchlist()?;
    let api = YahooApi::new(config.timeout()).context("Failed to build HTTP client")?;
    let mut market = MarketService::new(api, config.ttl(), config.settings());

    if config.diagnose {
        for line in diagnose(&mut market, &watchlist).await {
            println!("{}", line);
        }
        return Ok(());
    }

    let mut app = App::new(market, watchlist, Session::new(), &config.currency);
    app.run().await?;

    let portfolio = app.session().portfolio();
    log::info!(
        "Session closed with {} holdings worth {}",
        portfolio.len(),
        portfolio.total_value()
    );

    Ok(())
}
