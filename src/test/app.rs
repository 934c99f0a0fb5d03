#[cfg(test)]
mod tests {
    use std::time::Duration;

    use crossterm::event::KeyCode;
    use rust_decimal_macros::dec;

    use crate::{
        app::{
            App, MarketService, Session,
            app::{Action, InputMode},
            sort::SortColumn,
        },
        models::{AnalysisSettings, MarketCategory, Watchlist},
        test::fake::{FakeProvider, falling, history_from_closes, rising},
    };

    fn watchlist() -> Watchlist {
        Watchlist::new(
            vec![
                MarketCategory::new("USA".into(), vec!["NVDA".into(), "TSLA".into(), "AMD".into()]),
                MarketCategory::new("Italia".into(), vec!["ENI.MI".into()]),
            ],
            vec!["NVDA".into(), "GC=F".into()],
        )
    }

    async fn app() -> App<FakeProvider> {
        let provider = FakeProvider::default()
            .with_history(rising("NVDA"))
            .with_history(falling("AMD"))
            .with_history(falling("ENI.MI"))
            .with_failure("TSLA");
        let market = MarketService::new(provider, Duration::from_secs(3600), AnalysisSettings::default());
        let mut app = App::new(market, watchlist(), Session::new(), "€");
        app.refresh().await;
        app
    }

    fn type_text<P: crate::api::MarketDataProvider>(app: &mut App<P>, text: &str) {
        for c in text.chars() {
            app.handle_key(KeyCode::Char(c));
        }
    }

    #[tokio::test]
    async fn refresh_fills_tables_and_spotlight() {
        let app = app().await;
        let view = app.view();

        assert_eq!(view.tables.len(), 2);
        assert_eq!(view.tables[0].len(), 2);
        assert_eq!(view.tables[0][0].symbol(), "NVDA");
        assert_eq!(view.tables[1].len(), 1);
        assert_eq!(view.spotlight.len(), 1);
    }

    #[tokio::test]
    async fn number_keys_sort_the_tables() {
        let mut app = app().await;

        app.handle_key(KeyCode::Char('1'));

        assert_eq!(app.session().sort().column(), SortColumn::Name);
        assert_eq!(app.view().tables[0][0].symbol(), "AMD");
    }

    #[tokio::test]
    async fn add_flow_puts_selection_in_portfolio() {
        let mut app = app().await;

        app.handle_key(KeyCode::Down);
        app.handle_key(KeyCode::Char('a'));
        assert_eq!(app.view().input_mode, InputMode::Quantity);

        type_text(&mut app, "4x");
        assert_eq!(app.view().input, "4");
        assert_eq!(app.handle_key(KeyCode::Enter), Action::Continue);

        let entry = app.session().portfolio().get("NVDA").unwrap();
        assert_eq!(*entry.quantity(), dec!(4));
        assert_eq!(app.session().portfolio().total_value(), dec!(1000));
        assert_eq!(app.view().popup_message.as_deref(), Some("Added NVDA!"));
    }

    #[tokio::test]
    async fn pac_flow_on_portfolio_tab() {
        let mut app = app().await;
        app.handle_key(KeyCode::Down);
        app.handle_key(KeyCode::Char('a'));
        type_text(&mut app, "2");
        app.handle_key(KeyCode::Enter);

        app.handle_key(KeyCode::Tab);
        app.handle_key(KeyCode::Tab);
        app.handle_key(KeyCode::Char('p'));
        assert_eq!(app.view().input_mode, InputMode::Pac);

        type_text(&mut app, "100");
        app.handle_key(KeyCode::Enter);

        let plan = app.view().pac_plan.as_ref().unwrap();
        assert_eq!(plan.len(), 1);
        assert_eq!(*plan[0].amount(), dec!(100));
        assert_eq!(*plan[0].units(), dec!(0.4));

        app.handle_key(KeyCode::Esc);
        assert!(app.view().pac_plan.is_none());
    }

    #[tokio::test]
    async fn pac_on_empty_portfolio_shows_error() {
        let mut app = app().await;
        app.handle_key(KeyCode::BackTab);
        app.handle_key(KeyCode::Char('p'));

        assert!(app.view().error_popup.is_some());
        assert_eq!(app.view().input_mode, InputMode::Normal);

        app.handle_key(KeyCode::Enter);
        assert!(app.view().error_popup.is_none());
    }

    #[tokio::test]
    async fn remove_from_portfolio_tab() {
        let mut app = app().await;
        app.handle_key(KeyCode::Down);
        app.handle_key(KeyCode::Char('a'));
        type_text(&mut app, "1");
        app.handle_key(KeyCode::Enter);

        app.handle_key(KeyCode::Left);
        app.handle_key(KeyCode::Down);
        app.handle_key(KeyCode::Char('d'));

        assert!(app.session().portfolio().is_empty());
    }

    #[tokio::test]
    async fn detail_popup_and_lookup() {
        let mut app = app().await;

        app.handle_key(KeyCode::Down);
        app.handle_key(KeyCode::Enter);
        assert_eq!(app.view().detail.as_ref().unwrap().symbol(), "NVDA");
        app.handle_key(KeyCode::Esc);
        assert!(app.view().detail.is_none());

        app.handle_key(KeyCode::Char('/'));
        type_text(&mut app, "eni.mi");
        let action = app.handle_key(KeyCode::Enter);
        assert_eq!(action, Action::Lookup(String::from("eni.mi")));

        app.lookup("eni.mi").await;
        assert_eq!(app.view().detail.as_ref().unwrap().symbol(), "ENI.MI");

        app.lookup("tsla").await;
        assert!(app.view().error_popup.is_some());
    }

    #[tokio::test]
    async fn refresh_updates_holdings_added_through_lookup() {
        let provider = FakeProvider::default()
            .with_history(rising("NVDA"))
            .with_sequence(
                "ZZZ",
                vec![
                    history_from_closes("ZZZ", &[10.0; 30]),
                    history_from_closes("ZZZ", &[20.0; 30]),
                ],
            );
        let market = MarketService::new(provider, Duration::ZERO, AnalysisSettings::default());
        let mut app = App::new(market, watchlist(), Session::new(), "€");
        app.refresh().await;

        app.lookup("zzz").await;
        app.handle_key(KeyCode::Char('a'));
        type_text(&mut app, "3");
        app.handle_key(KeyCode::Enter);
        assert_eq!(*app.session().portfolio().get("ZZZ").unwrap().price(), dec!(10));

        app.refresh().await;

        assert_eq!(*app.session().portfolio().get("ZZZ").unwrap().price(), dec!(20));
        assert_eq!(app.session().portfolio().total_value(), dec!(60));
    }

    #[tokio::test]
    async fn quit_and_refresh_actions() {
        let mut app = app().await;

        assert_eq!(app.handle_key(KeyCode::F(5)), Action::Refresh);
        assert_eq!(app.handle_key(KeyCode::Char('q')), Action::Quit);
    }
}
