//! In-memory [`MarketData`] for exercising services without a network.

use std::collections::HashMap;
use std::sync::Mutex;

use async_trait::async_trait;
use chrono::NaiveDate;

use crate::domain::{EquityQuote, OptionChain, Price};
use crate::error::{Error, FetchError, Result};
use crate::port::outbound::market::MarketData;

/// Scripted market data keyed by symbol.
///
/// Quotes can be made to fail a fixed number of times before succeeding,
/// and every call is counted so tests can assert on retry behavior.
#[derive(Default)]
pub struct FakeMarketData {
    quotes: HashMap<String, EquityQuote>,
    closes: HashMap<String, Vec<Price>>,
    chains: HashMap<String, Vec<OptionChain>>,
    failing_closes: Vec<String>,
    failing_chains: Vec<(String, NaiveDate)>,
    quote_failures: Mutex<HashMap<String, u32>>,
    quote_calls: Mutex<HashMap<String, u32>>,
    chain_calls: Mutex<u32>,
}

impl FakeMarketData {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Quote with only a price.
    #[must_use]
    pub fn with_price(self, symbol: &str, price: Price) -> Self {
        self.with_quote(EquityQuote {
            symbol: symbol.to_string(),
            price: Some(price),
            ..EquityQuote::default()
        })
    }

    #[must_use]
    pub fn with_quote(mut self, quote: EquityQuote) -> Self {
        self.quotes.insert(quote.symbol.clone(), quote);
        self
    }

    #[must_use]
    pub fn with_closes(mut self, symbol: &str, closes: Vec<Price>) -> Self {
        self.closes.insert(symbol.to_string(), closes);
        self
    }

    /// Price history requests for `symbol` fail.
    #[must_use]
    pub fn failing_closes(mut self, symbol: &str) -> Self {
        self.failing_closes.push(symbol.to_string());
        self
    }

    /// Add a chain; its expiration becomes a listed expiration.
    #[must_use]
    pub fn with_chain(mut self, symbol: &str, chain: OptionChain) -> Self {
        self.chains.entry(symbol.to_string()).or_default().push(chain);
        self
    }

    /// Chain requests for `symbol` at `expiration` fail; the date stays listed.
    #[must_use]
    pub fn failing_chain(mut self, symbol: &str, expiration: NaiveDate) -> Self {
        self.failing_chains.push((symbol.to_string(), expiration));
        self
    }

    /// The first `times` quote requests for `symbol` fail.
    #[must_use]
    pub fn failing_quotes(self, symbol: &str, times: u32) -> Self {
        if let Ok(mut failures) = self.quote_failures.lock() {
            failures.insert(symbol.to_string(), times);
        }
        self
    }

    /// Quote requests seen for `symbol`.
    pub fn quote_calls(&self, symbol: &str) -> u32 {
        self.quote_calls
            .lock()
            .map(|calls| calls.get(symbol).copied().unwrap_or(0))
            .unwrap_or(0)
    }

    /// Chain requests seen across all symbols.
    pub fn chain_calls(&self) -> u32 {
        self.chain_calls.lock().map(|calls| *calls).unwrap_or(0)
    }

    fn no_options(symbol: &str) -> Error {
        FetchError::NoOptionsData {
            symbol: symbol.to_string(),
        }
        .into()
    }
}

#[async_trait]
impl MarketData for FakeMarketData {
    async fn quote(&self, symbol: &str) -> Result<EquityQuote> {
        if let Ok(mut calls) = self.quote_calls.lock() {
            *calls.entry(symbol.to_string()).or_default() += 1;
        }
        if let Ok(mut failures) = self.quote_failures.lock() {
            if let Some(remaining) = failures.get_mut(symbol) {
                if *remaining > 0 {
                    *remaining -= 1;
                    return Err(Error::Parse(format!("scripted failure for {symbol}")));
                }
            }
        }
        self.quotes.get(symbol).cloned().ok_or_else(|| {
            FetchError::EmptyResponse {
                symbol: symbol.to_string(),
                what: "quote",
            }
            .into()
        })
    }

    async fn daily_closes(&self, symbol: &str) -> Result<Vec<Price>> {
        if self.failing_closes.iter().any(|s| s == symbol) {
            return Err(Error::Parse(format!("no history for {symbol}")));
        }
        Ok(self.closes.get(symbol).cloned().unwrap_or_default())
    }

    async fn expirations(&self, symbol: &str) -> Result<Vec<NaiveDate>> {
        let mut dates: Vec<NaiveDate> = self
            .chains
            .get(symbol)
            .map(|chains| chains.iter().filter_map(|chain| chain.expiration).collect())
            .unwrap_or_default();
        if dates.is_empty() {
            return Err(Self::no_options(symbol));
        }
        dates.sort_unstable();
        Ok(dates)
    }

    async fn option_chain(&self, symbol: &str, expiration: NaiveDate) -> Result<OptionChain> {
        if let Ok(mut calls) = self.chain_calls.lock() {
            *calls += 1;
        }
        if self
            .failing_chains
            .iter()
            .any(|(s, exp)| s == symbol && *exp == expiration)
        {
            return Err(Error::Parse(format!("chain unavailable for {symbol} {expiration}")));
        }
        self.chains
            .get(symbol)
            .and_then(|chains| {
                chains
                    .iter()
                    .find(|chain| chain.expiration == Some(expiration))
                    .cloned()
            })
            .ok_or_else(|| Self::no_options(symbol))
    }

    fn provider_name(&self) -> &'static str {
        "fake"
    }
}
