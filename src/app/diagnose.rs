use crate::{
    api::MarketDataProvider,
    app::market::MarketService,
    models::{FetchOutcome, Watchlist},
};

/// Runs every watchlist symbol through the service and reports each outcome,
/// keeping the full error for failed fetches.
pub async fn diagnose<P: MarketDataProvider>(
    market: &mut MarketService<P>,
    watchlist: &Watchlist,
) -> Vec<String> {
    let settings = *market.settings();
    let mut report = vec![format!(
        "range={} scoring={} levels={}",
        settings.range, settings.scoring, settings.levels
    )];
    let mut ready = 0;
    let symbols = watchlist.all_symbols();

    for symbol in &symbols {
        let outcome = market.analyze(symbol).await;
        if outcome.is_ready() {
            ready += 1;
        }
        let line = match &outcome {
            FetchOutcome::Ready(snapshot) => format!(
                "{:<12} {:<7} price={:.2} score={} L={} M={} B={}",
                symbol,
                outcome.label(),
                snapshot.price(),
                snapshot.score(),
                snapshot.flags().long,
                snapshot.flags().medium,
                snapshot.flags().short,
            ),
            FetchOutcome::Empty => format!("{:<12} {:<7}", symbol, outcome.label()),
            FetchOutcome::Failed(err) => {
                format!("{:<12} {:<7} {:?}", symbol, outcome.label(), err)
            }
        };
        report.push(line);
    }

    report.push(format!("{}/{} symbols ready", ready, symbols.len()));
    report
}
