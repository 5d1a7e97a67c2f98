//! Covered-call screening across near-term expirations.

use std::sync::Arc;
use std::time::Duration;

use chrono::NaiveDate;
use tokio::time::sleep;
use tracing::{debug, info, warn};

use super::price::PriceFetcher;
use crate::domain::error::DomainError;
use crate::domain::screen::{rank, screen_calls};
use crate::domain::{ScreenCandidate, ScreenCriteria};
use crate::error::Result;
use crate::port::outbound::market::MarketData;

/// Candidates for a batch of symbols plus the symbols that failed.
#[derive(Debug, Clone, Default)]
pub struct ScreenReport {
    /// Ranked candidates, grouped by symbol in request order.
    pub candidates: Vec<ScreenCandidate>,
    /// `(symbol, reason)` for every symbol that could not be screened.
    pub failures: Vec<(String, String)>,
}

/// Screens calls near spot for high annualized time value.
pub struct OptionScreener {
    market: Arc<dyn MarketData>,
    prices: PriceFetcher,
    pacing: Duration,
}

impl OptionScreener {
    #[must_use]
    pub fn new(market: Arc<dyn MarketData>, prices: PriceFetcher, pacing: Duration) -> Self {
        Self {
            market,
            prices,
            pacing,
        }
    }

    /// Ranked candidates for one symbol.
    ///
    /// # Errors
    ///
    /// Fails when the price or the expiration list cannot be fetched, and
    /// with [`DomainError::NoQualifyingQuote`] when no call passes the
    /// filters. A chain that fails to load is skipped.
    pub async fn screen(
        &self,
        symbol: &str,
        criteria: &ScreenCriteria,
        today: NaiveDate,
    ) -> Result<Vec<ScreenCandidate>> {
        let spot = self.prices.current_price(symbol).await?;
        let expirations = self.market.expirations(symbol).await?;
        let eligible = criteria.eligible_expirations(&expirations, today);
        debug!(symbol, spot = %spot, expirations = eligible.len(), "Screening");

        let mut candidates = Vec::new();
        for (i, expiration) in eligible.into_iter().enumerate() {
            if i > 0 {
                self.pace().await;
            }
            match self.market.option_chain(symbol, expiration).await {
                Ok(chain) => {
                    candidates.extend(screen_calls(symbol, &chain.calls, spot, today, criteria));
                }
                Err(err) => {
                    warn!(symbol, %expiration, error = %err, "Skipping expiration");
                }
            }
        }

        if candidates.is_empty() {
            return Err(DomainError::NoQualifyingQuote.into());
        }
        Ok(rank(candidates, criteria.max_results))
    }

    /// Screen every symbol, collecting failures instead of stopping.
    pub async fn screen_many(
        &self,
        symbols: &[String],
        criteria: &ScreenCriteria,
        today: NaiveDate,
    ) -> ScreenReport {
        let mut report = ScreenReport::default();
        for (i, symbol) in symbols.iter().enumerate() {
            if i > 0 {
                self.pace().await;
            }
            match self.screen(symbol, criteria, today).await {
                Ok(found) => {
                    info!(symbol = %symbol, candidates = found.len(), "Screened");
                    report.candidates.extend(found);
                }
                Err(err) => {
                    warn!(symbol = %symbol, error = %err, "Screen failed");
                    report.failures.push((symbol.clone(), err.to_string()));
                }
            }
        }
        report
    }

    async fn pace(&self) {
        if !self.pacing.is_zero() {
            sleep(self.pacing).await;
        }
    }
}
