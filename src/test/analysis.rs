#[cfg(test)]
mod tests {
    use chrono::{Duration, TimeZone, Utc};

    use crate::{
        app::analysis::{build_snapshot, trailing_dividend_yield},
        models::{
            AnalysisSettings, Dividend, LevelsMethod, PriceHistory, Profile, ScoringMethod,
        },
        test::fake::{falling, history_from_closes, rising},
    };

    #[test]
    fn rising_market_scores_100() {
        let snapshot = build_snapshot(&rising("NVDA"), None, &AnalysisSettings::default()).unwrap();

        assert_eq!(*snapshot.score(), 100);
        assert!(snapshot.flags().long && snapshot.flags().medium && snapshot.flags().short);
        assert_eq!(snapshot.price(), &250.0);
        assert_eq!(snapshot.name(), "NVDA");
        assert_eq!(snapshot.color().hex(), "#00ff00");
        assert_eq!(snapshot.currency().as_deref(), Some("EUR"));
    }

    #[test]
    fn falling_market_scores_30() {
        let snapshot = build_snapshot(&falling("ENI.MI"), None, &AnalysisSettings::default()).unwrap();

        assert_eq!(*snapshot.score(), 30);
        assert!(!snapshot.flags().long && !snapshot.flags().medium && !snapshot.flags().short);
    }

    #[test]
    fn empty_history_is_unavailable() {
        let history = PriceHistory::new("NONE".into(), None, None, Vec::new(), Vec::new());

        assert!(build_snapshot(&history, None, &AnalysisSettings::default()).is_none());
    }

    #[test]
    fn flat_market_with_logistic_scoring_does_not_divide_by_zero() {
        let history = history_from_closes("FLAT", &[42.0; 250]);
        let settings = AnalysisSettings {
            scoring: ScoringMethod::Logistic,
            ..AnalysisSettings::default()
        };

        let snapshot = build_snapshot(&history, None, &settings).unwrap();

        assert_eq!(snapshot.indicators().std20, Some(0.0));
        assert_eq!(*snapshot.score(), 30);
        let levels = snapshot.levels().unwrap();
        assert_eq!(levels.take_profit, 42.0);
        assert_eq!(levels.stop_loss, 42.0);
    }

    #[test]
    fn atr_levels_use_true_range() {
        let history = history_from_closes("ATR", &[10.0; 30]);
        let settings = AnalysisSettings {
            levels: LevelsMethod::Atr,
            ..AnalysisSettings::default()
        };

        let levels = build_snapshot(&history, None, &settings)
            .unwrap()
            .levels()
            .unwrap();

        assert!((levels.take_profit - 16.0).abs() < 1e-9);
        assert!((levels.stop_loss - 6.0).abs() < 1e-9);
        assert!((levels.entry - 9.9).abs() < 1e-9);
    }

    #[test]
    fn profile_overrides_name_and_fundamentals() {
        let profile = Profile::new(
            Some("Leonardo".into()),
            Some(1.5),
            Some(18.2),
            Some(21_400_000_000),
        );
        let snapshot =
            build_snapshot(&falling("LDO.MI"), Some(&profile), &AnalysisSettings::default()).unwrap();

        assert_eq!(snapshot.name(), "Leonardo");
        assert_eq!(*snapshot.dividend_yield(), Some(1.5));
        assert_eq!(*snapshot.pe_ratio(), Some(18.2));
        assert_eq!(*snapshot.market_cap(), Some(21_400_000_000));
    }

    #[test]
    fn dividend_yield_counts_last_twelve_months_only() {
        let base = history_from_closes("ENEL.MI", &[50.0; 400]);
        let last = *base.last_bar().unwrap().date();
        let dividends = vec![
            Dividend::new(last - Duration::days(500), 10.0),
            Dividend::new(last - Duration::days(200), 1.0),
            Dividend::new(last - Duration::days(20), 1.5),
        ];
        let history = PriceHistory::new(
            base.symbol().clone(),
            None,
            None,
            base.bars().clone(),
            dividends,
        );

        let yield_pct = trailing_dividend_yield(&history, 50.0).unwrap();
        assert!((yield_pct - 5.0).abs() < 1e-9);

        let snapshot = build_snapshot(&history, None, &AnalysisSettings::default()).unwrap();
        assert!((snapshot.dividend_yield().unwrap() - 5.0).abs() < 1e-9);
    }

    #[test]
    fn no_dividends_means_no_yield() {
        let history = history_from_closes("TSLA", &[200.0; 30]);

        assert_eq!(trailing_dividend_yield(&history, 200.0), None);
        assert_eq!(Utc.with_ymd_and_hms(2024, 1, 1, 0, 0, 0).unwrap(), *history.bars()[0].date());
    }
}
