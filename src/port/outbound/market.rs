//! Market-data port: quotes, price history and option chains.
//!
//! The provider is an opaque collaborator; adapters translate its wire
//! format into domain types and surface failures as [`Error`].

use async_trait::async_trait;
use chrono::NaiveDate;

use crate::domain::{EquityQuote, OptionChain, Price};
use crate::error::Error;

/// Source of equity quotes and option chains.
#[async_trait]
pub trait MarketData: Send + Sync {
    /// Current quote for `symbol`.
    async fn quote(&self, symbol: &str) -> Result<EquityQuote, Error>;

    /// Daily closing prices over the last year, oldest first.
    async fn daily_closes(&self, symbol: &str) -> Result<Vec<Price>, Error>;

    /// Listed option expiration dates, soonest first.
    async fn expirations(&self, symbol: &str) -> Result<Vec<NaiveDate>, Error>;

    /// Calls and puts for one expiration.
    async fn option_chain(&self, symbol: &str, expiration: NaiveDate) -> Result<OptionChain, Error>;

    /// Name of the provider for logs.
    fn provider_name(&self) -> &'static str;
}
