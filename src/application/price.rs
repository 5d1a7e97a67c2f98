//! Current price lookup with bounded retry.

use std::sync::Arc;
use std::time::Duration;

use serde::{Deserialize, Serialize};
use tokio::time::sleep;
use tracing::{debug, warn};

use crate::domain::{EquityQuote, Price};
use crate::error::{FetchError, Result};
use crate::port::outbound::market::MarketData;

/// Attempt budget and delay schedule for quote lookups.
///
/// The delay before attempt `n` (0-based) is `base_delay_ms + n * step_delay_ms`;
/// with the defaults that is 1s, 3s, 5s.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RetryPolicy {
    #[serde(default = "default_max_attempts")]
    pub max_attempts: u32,
    #[serde(default = "default_base_delay_ms")]
    pub base_delay_ms: u64,
    #[serde(default = "default_step_delay_ms")]
    pub step_delay_ms: u64,
}

const fn default_max_attempts() -> u32 {
    3
}

const fn default_base_delay_ms() -> u64 {
    1000
}

const fn default_step_delay_ms() -> u64 {
    2000
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self {
            max_attempts: default_max_attempts(),
            base_delay_ms: default_base_delay_ms(),
            step_delay_ms: default_step_delay_ms(),
        }
    }
}

impl RetryPolicy {
    /// Policy that retries immediately.
    #[must_use]
    pub const fn immediate(max_attempts: u32) -> Self {
        Self {
            max_attempts,
            base_delay_ms: 0,
            step_delay_ms: 0,
        }
    }

    /// Pause taken before attempt `attempt` (0-based).
    #[must_use]
    pub fn delay_before(&self, attempt: u32) -> Duration {
        Duration::from_millis(
            self.base_delay_ms
                .saturating_add(u64::from(attempt).saturating_mul(self.step_delay_ms)),
        )
    }
}

/// Fetches quotes through a [`MarketData`] port, retrying failures.
///
/// A quote that comes back without a price counts as a failed attempt.
pub struct PriceFetcher {
    market: Arc<dyn MarketData>,
    policy: RetryPolicy,
}

impl PriceFetcher {
    #[must_use]
    pub fn new(market: Arc<dyn MarketData>, policy: RetryPolicy) -> Self {
        Self { market, policy }
    }

    #[must_use]
    pub fn policy(&self) -> &RetryPolicy {
        &self.policy
    }

    /// Full quote for `symbol`, guaranteed to carry a price.
    ///
    /// # Errors
    ///
    /// [`FetchError::PriceUnavailable`] once every attempt has failed.
    pub async fn fetch_quote(&self, symbol: &str) -> Result<EquityQuote> {
        let max_attempts = self.policy.max_attempts.max(1);
        let mut reason = String::new();

        for attempt in 0..max_attempts {
            let delay = self.policy.delay_before(attempt);
            if !delay.is_zero() {
                sleep(delay).await;
            }

            match self.market.quote(symbol).await {
                Ok(quote) if quote.price.is_some() => {
                    debug!(symbol, attempt = attempt + 1, "Quote fetched");
                    return Ok(quote);
                }
                Ok(_) => reason = "quote carried no price".to_string(),
                Err(err) => reason = err.to_string(),
            }

            warn!(
                symbol,
                attempt = attempt + 1,
                max_attempts,
                error = %reason,
                "Quote lookup failed"
            );
        }

        Err(FetchError::PriceUnavailable {
            symbol: symbol.to_string(),
            attempts: max_attempts,
            reason,
        }
        .into())
    }

    /// Current price of `symbol`.
    ///
    /// # Errors
    ///
    /// [`FetchError::PriceUnavailable`] once every attempt has failed.
    pub async fn current_price(&self, symbol: &str) -> Result<Price> {
        let quote = self.fetch_quote(symbol).await?;
        quote.price.ok_or_else(|| {
            FetchError::PriceUnavailable {
                symbol: symbol.to_string(),
                attempts: self.policy.max_attempts.max(1),
                reason: "quote carried no price".to_string(),
            }
            .into()
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::Error;
    use crate::testkit::market::FakeMarketData;
    use rust_decimal_macros::dec;

    #[test]
    fn default_delays_step_by_two_seconds() {
        let policy = RetryPolicy::default();
        assert_eq!(policy.delay_before(0), Duration::from_secs(1));
        assert_eq!(policy.delay_before(1), Duration::from_secs(3));
        assert_eq!(policy.delay_before(2), Duration::from_secs(5));
    }

    #[tokio::test]
    async fn succeeds_after_transient_failures() {
        let market = Arc::new(FakeMarketData::new().with_price("AAA", dec!(100)).failing_quotes("AAA", 2));
        let fetcher = PriceFetcher::new(market.clone(), RetryPolicy::immediate(3));

        assert_eq!(fetcher.current_price("AAA").await.unwrap(), dec!(100));
        assert_eq!(market.quote_calls("AAA"), 3);
    }

    #[tokio::test]
    async fn gives_up_after_max_attempts() {
        let market = Arc::new(FakeMarketData::new().with_price("AAA", dec!(100)).failing_quotes("AAA", 5));
        let fetcher = PriceFetcher::new(market.clone(), RetryPolicy::immediate(3));

        let err = fetcher.current_price("AAA").await.unwrap_err();
        assert!(matches!(
            err,
            Error::Fetch(FetchError::PriceUnavailable { attempts: 3, .. })
        ));
        assert_eq!(market.quote_calls("AAA"), 3);
    }

    #[tokio::test]
    async fn quote_without_price_is_a_failed_attempt() {
        let market = Arc::new(FakeMarketData::new().with_quote(EquityQuote {
            symbol: "AAA".into(),
            ..EquityQuote::default()
        }));
        let fetcher = PriceFetcher::new(market.clone(), RetryPolicy::immediate(2));

        let err = fetcher.fetch_quote("AAA").await.unwrap_err();
        assert!(err.to_string().contains("no price"));
        assert_eq!(market.quote_calls("AAA"), 2);
    }

    #[tokio::test]
    async fn unknown_symbol_reports_symbol() {
        let market = Arc::new(FakeMarketData::new());
        let fetcher = PriceFetcher::new(market, RetryPolicy::immediate(1));

        let err = fetcher.current_price("ZZZ").await.unwrap_err();
        assert!(err.to_string().contains("ZZZ"));
    }
}
