//! Application service factories.

use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;

use super::market::build_price_fetcher;
use crate::adapter::outbound::xlsx::XlsxSnapshotStore;
use crate::application::compare::{ComparisonSettings, StockComparison};
use crate::application::portfolio::PortfolioFixer;
use crate::application::screen::OptionScreener;
use crate::infrastructure::config::settings::Config;
use crate::port::outbound::market::MarketData;

/// Build the comparison job writing snapshots under `output_dir`.
pub fn build_comparison(
    config: &Config,
    market: Arc<dyn MarketData>,
    output_dir: PathBuf,
    max_age_hours: i64,
) -> StockComparison {
    let store = XlsxSnapshotStore::new(output_dir, config.comparison.file_prefix.clone());
    StockComparison::new(
        market.clone(),
        build_price_fetcher(config, market),
        Arc::new(store),
        ComparisonSettings {
            max_age_hours,
            otm_pct: config.comparison.otm_pct,
            pacing_ms: config.provider.pacing_ms,
        },
    )
}

/// Build the call screener.
pub fn build_screener(config: &Config, market: Arc<dyn MarketData>) -> OptionScreener {
    OptionScreener::new(
        market.clone(),
        build_price_fetcher(config, market),
        Duration::from_millis(config.provider.pacing_ms),
    )
}

/// Build the portfolio fixer with the `[portfolio]` screen criteria.
pub fn build_portfolio_fixer(config: &Config, market: Arc<dyn MarketData>) -> PortfolioFixer {
    PortfolioFixer::new(build_screener(config, market), config.portfolio.clone())
}
