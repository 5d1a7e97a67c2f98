//! Comparison job against real snapshot files in a temp directory.

use std::sync::Arc;

use chrono::{Duration, NaiveDate, NaiveDateTime};
use rust_decimal_macros::dec;
use stocklive::adapter::outbound::xlsx::{read_snapshot, XlsxSnapshotStore};
use stocklive::application::compare::StockComparison;
use stocklive::application::price::PriceFetcher;
use stocklive::domain::EquityQuote;
use stocklive::port::outbound::store::SnapshotStore;
use stocklive::testkit::config;
use stocklive::testkit::domain::{at, call, chain, date, days_after, put};
use stocklive::testkit::market::FakeMarketData;

const PREFIX: &str = "AI_Stock_Live_Comparison_";

fn start() -> NaiveDateTime {
    at(date(2025, 7, 23), 9, 0)
}

fn optionable(market: FakeMarketData, symbol: &str, today: NaiveDate) -> FakeMarketData {
    let mut market = market.with_quote(EquityQuote {
        symbol: symbol.to_string(),
        price: Some(dec!(100)),
        previous_close: Some(dec!(100)),
        ..EquityQuote::default()
    });
    for days in [90, 180, 365] {
        let exp = days_after(today, days);
        market = market.with_chain(
            symbol,
            chain(
                exp,
                vec![call(dec!(110), dec!(4), 10, exp)],
                vec![put(dec!(90), dec!(2), 10, exp)],
            ),
        );
    }
    market
}

fn job(market: Arc<FakeMarketData>, store: XlsxSnapshotStore) -> StockComparison {
    StockComparison::new(
        market.clone(),
        PriceFetcher::new(market, config::retry()),
        Arc::new(store),
        config::comparison(),
    )
}

#[tokio::test]
async fn second_run_reuses_fresh_rows_from_the_saved_workbook() {
    let dir = tempfile::tempdir().unwrap();
    let today = start().date();
    let market = Arc::new(
        optionable(optionable(FakeMarketData::new(), "AAA", today), "BBB", today)
            .with_price("NOPT", dec!(12)),
    );
    let tickers: Vec<String> = ["AAA", "BBB", "NOPT"].map(String::from).to_vec();

    let first = job(market.clone(), XlsxSnapshotStore::new(dir.path(), PREFIX))
        .run(&tickers, start())
        .await
        .unwrap();

    assert_eq!(first.fetched, tickers);
    assert!(first.path.exists());
    assert_eq!(
        first.path.file_name().and_then(|n| n.to_str()),
        Some("AI_Stock_Live_Comparison_20250723_090000.xlsx")
    );

    let saved = read_snapshot(&first.path).unwrap();
    assert_eq!(saved.len(), 3);
    let aaa = saved.iter().find(|r| r.symbol == "AAA").unwrap();
    assert_eq!(aaa.current_price, Some(dec!(100)));
    assert_eq!(aaa.call_yield_1y, Some(dec!(4)));
    assert_eq!(aaa.put_price_1y, Some(dec!(2)));
    assert_eq!(aaa.example_strike_6m, Some(dec!(110)));
    assert_eq!(aaa.last_update, Some(start()));
    let nopt = saved.iter().find(|r| r.symbol == "NOPT").unwrap();
    assert_eq!(nopt.current_price, Some(dec!(12)));
    assert!(nopt.error.as_deref().unwrap().contains("no options data"));

    let quote_calls = market.quote_calls("AAA");
    let second = job(market.clone(), XlsxSnapshotStore::new(dir.path(), PREFIX))
        .run(&tickers, start() + Duration::hours(1))
        .await
        .unwrap();

    assert_eq!(second.reused, tickers);
    assert!(second.fetched.is_empty());
    assert_eq!(market.quote_calls("AAA"), quote_calls);
    assert_ne!(second.path, first.path);
    assert!(first.path.exists());
}

#[tokio::test]
async fn stale_rows_are_refetched_and_unrequested_rows_kept() {
    let dir = tempfile::tempdir().unwrap();
    let today = start().date();
    let market = Arc::new(optionable(
        optionable(FakeMarketData::new(), "AAA", today),
        "BBB",
        today,
    ));
    let store = || XlsxSnapshotStore::new(dir.path(), PREFIX);

    job(market.clone(), store())
        .run(&["AAA".into(), "BBB".into()], start())
        .await
        .unwrap();

    let later = start() + Duration::hours(5);
    let report = job(market.clone(), store())
        .run(&["bbb".into()], later)
        .await
        .unwrap();

    assert_eq!(report.fetched, ["BBB"]);
    let latest = store().latest().unwrap().unwrap();
    assert_eq!(latest.taken_at, later);
    let symbols: Vec<&str> = latest.records.iter().map(|r| r.symbol.as_str()).collect();
    assert!(symbols.contains(&"AAA"));
    assert_eq!(latest.get("BBB").unwrap().last_update, Some(later));
    assert_eq!(latest.get("AAA").unwrap().last_update, Some(start()));
}

#[tokio::test]
async fn workbook_without_ticker_column_is_ignored() {
    let dir = tempfile::tempdir().unwrap();
    let bogus = dir.path().join(format!("{PREFIX}20250101_000000.xlsx"));
    let mut workbook = rust_xlsxwriter::Workbook::new();
    workbook
        .add_worksheet()
        .write_string(0, 0, "Symbol")
        .unwrap();
    workbook.save(&bogus).unwrap();

    let market = Arc::new(optionable(FakeMarketData::new(), "AAA", start().date()));
    let store = XlsxSnapshotStore::new(dir.path(), PREFIX);
    assert!(store.latest().is_err());

    let report = job(market, store)
        .run(&["AAA".into()], start())
        .await
        .unwrap();
    assert_eq!(report.fetched, ["AAA"]);
}
