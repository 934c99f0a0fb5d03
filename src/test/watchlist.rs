#[cfg(test)]
mod tests {
    use std::io::Write;

    use tempfile::NamedTempFile;

    use crate::models::Watchlist;

    #[test]
    fn default_watchlist_has_four_markets() {
        let watchlist = Watchlist::default();

        assert_eq!(watchlist.labels(), vec!["Italia", "USA", "ETF", "Crypto"]);
        assert_eq!(watchlist.spotlight().len(), 5);
        assert!(watchlist.categories()[1].symbols().contains(&String::from("BRK-B")));
    }

    #[test]
    fn all_symbols_are_distinct() {
        let watchlist = Watchlist::default();
        let symbols = watchlist.all_symbols();

        // LDO.MI, NVDA and BTC-EUR appear in both a category and the spotlight.
        assert_eq!(symbols.len(), 12 + 12 + 7 + 6 + 2);
        assert_eq!(symbols.last().map(String::as_str), Some("NOVO-B.CO"));
    }

    #[test]
    fn loads_from_csv() {
        let mut file = NamedTempFile::new().unwrap();
        writeln!(file, "# category,symbol").unwrap();
        writeln!(file, "Tech, aapl").unwrap();
        writeln!(file, "Energy,ENI.MI").unwrap();
        writeln!(file, "Tech,MSFT").unwrap();
        writeln!(file, "Tech,AAPL").unwrap();
        writeln!(file, "spotlight,GC=F").unwrap();

        let watchlist = Watchlist::from_csv(file.path().to_str().unwrap()).unwrap();

        assert_eq!(watchlist.labels(), vec!["Tech", "Energy"]);
        assert_eq!(
            watchlist.categories()[0].symbols(),
            &vec![String::from("AAPL"), String::from("MSFT")]
        );
        assert_eq!(watchlist.spotlight(), &vec![String::from("GC=F")]);
    }

    #[test]
    fn rejects_malformed_csv() {
        let mut file = NamedTempFile::new().unwrap();
        writeln!(file, "OnlyOneColumn").unwrap();

        assert!(Watchlist::from_csv(file.path().to_str().unwrap()).is_err());
        assert!(Watchlist::from_csv("/definitely/not/here.csv").is_err());
    }

    #[test]
    fn rejects_csv_without_categories() {
        let mut file = NamedTempFile::new().unwrap();
        writeln!(file, "spotlight,NVDA").unwrap();

        assert!(Watchlist::from_csv(file.path().to_str().unwrap()).is_err());
    }
}
