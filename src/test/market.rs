#[cfg(test)]
mod tests {
    use std::{sync::atomic::Ordering, time::Duration};

    use crate::{
        app::{
            diagnose::diagnose,
            market::{MarketService, normalize_symbol},
        },
        errors::MarketDataError,
        models::{
            AnalysisSettings, FetchOutcome, MarketCategory, PriceHistory, Profile, Watchlist,
        },
        test::fake::{FakeProvider, falling, rising},
    };

    const TTL: Duration = Duration::from_secs(3600);

    fn service(provider: FakeProvider) -> MarketService<FakeProvider> {
        MarketService::new(provider, TTL, AnalysisSettings::default())
    }

    #[tokio::test]
    async fn ready_outcome_is_memoized() {
        let provider = FakeProvider::default().with_history(rising("AAPL"));
        let calls = provider.calls.clone();
        let mut market = service(provider);

        let first = market.analyze("AAPL").await;
        let second = market.analyze("AAPL").await;

        assert!(first.is_ready());
        assert_eq!(*second.ready().unwrap().score(), 100);
        assert_eq!(calls.load(Ordering::SeqCst), 1);
        assert_eq!(market.cached_symbols(), 1);
    }

    #[tokio::test]
    async fn empty_history_is_an_absence_not_an_error() {
        let empty = PriceHistory::new("DELISTED".into(), None, None, Vec::new(), Vec::new());
        let provider = FakeProvider::default().with_history(empty);
        let calls = provider.calls.clone();
        let mut market = service(provider);

        assert!(matches!(market.analyze("DELISTED").await, FetchOutcome::Empty));
        assert!(matches!(market.analyze("DELISTED").await, FetchOutcome::Empty));
        assert_eq!(calls.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn failures_are_typed_and_retried() {
        let provider = FakeProvider::default().with_failure("TEN.MI");
        let calls = provider.calls.clone();
        let mut market = service(provider);

        let outcome = market.analyze("TEN.MI").await;
        assert!(matches!(
            outcome,
            FetchOutcome::Failed(MarketDataError::Provider { status: 500, .. })
        ));

        market.analyze("TEN.MI").await;
        assert_eq!(calls.load(Ordering::SeqCst), 2);
        assert_eq!(market.cached_symbols(), 0);
    }

    #[tokio::test]
    async fn category_keeps_only_ready_rows_in_order() {
        let provider = FakeProvider::default()
            .with_history(falling("ENI.MI"))
            .with_history(rising("LDO.MI"))
            .with_failure("UCG.MI");
        let mut market = service(provider);
        let category = MarketCategory::new(
            "Italia".into(),
            vec!["ENI.MI".into(), "UCG.MI".into(), "MISSING.MI".into(), "LDO.MI".into()],
        );

        let rows = market.analyze_category(&category).await;
        let symbols: Vec<&str> = rows.iter().map(|s| s.symbol().as_str()).collect();

        assert_eq!(symbols, vec!["ENI.MI", "LDO.MI"]);
    }

    #[tokio::test]
    async fn profile_is_best_effort() {
        let provider = FakeProvider::default()
            .with_history(rising("MSFT"))
            .with_history(rising("META"))
            .with_profile("MSFT", Profile::new(Some("Microsoft".into()), Some(0.7), Some(35.0), None));
        let mut market = service(provider);

        let with_profile = market.analyze("MSFT").await.ready().unwrap();
        let without = market.analyze("META").await.ready().unwrap();

        assert_eq!(with_profile.name(), "Microsoft");
        assert_eq!(*with_profile.pe_ratio(), Some(35.0));
        assert_eq!(without.name(), "META");
        assert_eq!(*without.pe_ratio(), None);
    }

    #[tokio::test]
    async fn lookup_validates_before_fetching() {
        let provider = FakeProvider::default().with_history(rising("NVDA"));
        let calls = provider.calls.clone();
        let mut market = service(provider);

        let invalid = market.lookup("not a symbol!").await;
        assert!(matches!(
            invalid,
            FetchOutcome::Failed(MarketDataError::InvalidSymbol(_))
        ));
        assert_eq!(calls.load(Ordering::SeqCst), 0);

        let found = market.lookup("  nvda ").await;
        assert_eq!(found.ready().unwrap().symbol(), "NVDA");
    }

    #[test]
    fn symbols_are_normalized() {
        assert_eq!(normalize_symbol("gc=f").unwrap(), "GC=F");
        assert_eq!(normalize_symbol("^GSPC").unwrap(), "^GSPC");
        assert_eq!(normalize_symbol("brk-b").unwrap(), "BRK-B");
        assert_eq!(normalize_symbol("novo-b.co").unwrap(), "NOVO-B.CO");
        assert!(normalize_symbol("").is_err());
        assert!(normalize_symbol("-ABC").is_err());
        assert!(normalize_symbol("AAPL;DROP").is_err());
    }

    #[tokio::test]
    async fn purge_drops_expired_entries() {
        let provider = FakeProvider::default()
            .with_history(rising("AAPL"))
            .with_history(falling("ENI.MI"));
        let mut market = MarketService::new(provider, Duration::ZERO, AnalysisSettings::default());

        market.analyze("AAPL").await;
        market.analyze("ENI.MI").await;
        assert_eq!(market.cached_symbols(), 2);

        assert_eq!(market.purge_expired(), 2);
        assert_eq!(market.cached_symbols(), 0);
    }

    #[tokio::test]
    async fn purge_keeps_live_entries() {
        let mut market = service(FakeProvider::default().with_history(rising("AAPL")));

        market.analyze("AAPL").await;

        assert_eq!(market.purge_expired(), 0);
        assert_eq!(market.cached_symbols(), 1);
    }

    #[tokio::test]
    async fn diagnose_reports_every_outcome() {
        let provider = FakeProvider::default()
            .with_history(rising("AAPL"))
            .with_failure("TSLA");
        let mut market = service(provider);
        let watchlist = Watchlist::new(
            vec![MarketCategory::new(
                "USA".into(),
                vec!["AAPL".into(), "TSLA".into()],
            )],
            Vec::new(),
        );

        let report = diagnose(&mut market, &watchlist).await;

        assert_eq!(report.len(), 4);
        assert_eq!(report[0], "range=1y scoring=linear levels=std");
        assert!(report[1].starts_with("AAPL"));
        assert!(report[1].contains("ready") && report[1].contains("score=100"));
        assert!(report[2].contains("failed") && report[2].contains("upstream exploded"));
        assert_eq!(report[3], "1/2 symbols ready");
    }
}
