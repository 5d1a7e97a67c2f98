//! Market-data provider factory.

use std::sync::Arc;

use tracing::info;

use crate::adapter::outbound::yahoo::YahooClient;
use crate::application::price::PriceFetcher;
use crate::infrastructure::config::settings::Config;
use crate::port::outbound::market::MarketData;

/// Build the configured market-data provider.
pub fn build_market_data(config: &Config) -> Arc<dyn MarketData> {
    let client = YahooClient::from_config(&config.provider);
    info!(
        provider = client.provider_name(),
        base_url = %config.provider.base_url,
        "Market data provider ready"
    );
    Arc::new(client)
}

/// Wrap `market` in a price fetcher using the configured retry policy.
pub fn build_price_fetcher(config: &Config, market: Arc<dyn MarketData>) -> PriceFetcher {
    PriceFetcher::new(market, config.retry.clone())
}
