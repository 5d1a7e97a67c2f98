use std::fs;
use std::sync::Arc;
use std::time::Duration;

use rust_decimal_macros::dec;
use stocklive::application::portfolio::PortfolioFixer;
use stocklive::application::price::PriceFetcher;
use stocklive::application::screen::OptionScreener;
use stocklive::domain::portfolio::Action;
use stocklive::infrastructure::config::portfolio::PortfolioConfig;
use stocklive::testkit::config;
use stocklive::testkit::domain::{call, chain, date, days_after};
use stocklive::testkit::market::FakeMarketData;

const OLD_EXPORT: &str = "\
Portfolio
Security Type,Financial Instrument Description,Position,Market Price,Expiration,Strike,Volume
STK,ZZZ,100,10,,,
Totals
Cash
NAV
Margin
Generated
";

const EXPORT: &str = "\
Portfolio
Security Type,Financial Instrument Description,Position,Market Price,Expiration,Strike,Volume
STK,AAA,300,100.00,,,
STK,BBB,100,50.00,,,
OPT,BBB Aug22'25 52 CALL,-2,0.40,2025-08-22,52,10
Totals
Cash
NAV
Margin
Generated
";

#[tokio::test]
async fn newest_export_yields_recommendation_file() {
    let today = date(2025, 7, 23);
    let exports = tempfile::tempdir().unwrap();
    let out = tempfile::tempdir().unwrap();
    fs::write(exports.path().join("portfolio.20250101.csv"), OLD_EXPORT).unwrap();
    fs::write(exports.path().join("portfolio.20250722.csv"), EXPORT).unwrap();

    let exp = days_after(today, 30);
    let market = Arc::new(
        FakeMarketData::new().with_price("AAA", dec!(100)).with_chain(
            "AAA",
            chain(
                exp,
                vec![
                    call(dec!(105), dec!(2), 100, exp),
                    call(dec!(102), dec!(3), 100, exp),
                ],
                vec![],
            ),
        ),
    );
    let screener = OptionScreener::new(
        market.clone(),
        PriceFetcher::new(market, config::retry()),
        Duration::ZERO,
    );
    let fixer = PortfolioFixer::new(screener, PortfolioConfig::default());

    let report = fixer.run(exports.path(), out.path(), today).await.unwrap();

    assert!(report.source.ends_with("portfolio.20250722.csv"));
    let actions: Vec<(&str, Action)> = report
        .recommendations
        .iter()
        .map(|r| (r.ticker.as_str(), r.action))
        .collect();
    assert_eq!(
        actions,
        [
            ("AAA", Action::SellCoveredCall),
            ("AAA", Action::SellCoveredCall),
            ("BBB", Action::BuyBackCall),
        ]
    );
    assert_eq!(report.recommendations[0].strike, Some(dec!(102)));

    let path = report.output.unwrap();
    assert_eq!(path, out.path().join("recommendations.20250722.csv"));
    let text = fs::read_to_string(path).unwrap();
    assert_eq!(text.lines().count(), 4);
    assert!(text.contains("BBB,Buy Back Call,2025-08-22,52,0.4,10,,"));
}
