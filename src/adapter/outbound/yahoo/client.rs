//! Yahoo Finance-style REST client.
//!
//! Three endpoints cover everything the crate needs:
//! - `/v7/finance/quote` for the equity quote
//! - `/v8/finance/chart` for a year of daily closes
//! - `/v7/finance/options` for expirations and per-date chains

use std::time::Duration;

use async_trait::async_trait;
use chrono::NaiveDate;
use reqwest::{Client as HttpClient, Url};
use tracing::{debug, warn};

use super::dto::{
    date_from_timestamp, timestamp_for_date, ChartResponse, OptionChainData, OptionsResponse,
    QuoteResponse,
};
use super::settings::ProviderConfig;
use crate::domain::{EquityQuote, OptionChain, OptionKind, Price};
use crate::error::{Error, FetchError, Result};
use crate::port::outbound::market::MarketData;

/// HTTP client for the quote, chart and options endpoints.
pub struct YahooClient {
    http: HttpClient,
    base_url: String,
}

impl YahooClient {
    /// Create a client with default HTTP settings against `base_url`.
    #[must_use]
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            http: HttpClient::new(),
            base_url: base_url.into().trim_end_matches('/').to_string(),
        }
    }

    #[must_use]
    pub fn from_config(config: &ProviderConfig) -> Self {
        let http = HttpClient::builder()
            .timeout(Duration::from_millis(config.timeout_ms))
            .connect_timeout(Duration::from_millis(config.connect_timeout_ms))
            .user_agent(config.user_agent.clone())
            .build()
            .unwrap_or_else(|err| {
                warn!(error = %err, "Failed to build HTTP client, using defaults");
                HttpClient::new()
            });

        Self {
            http,
            base_url: config.base_url.trim_end_matches('/').to_string(),
        }
    }

    /// Endpoint URL with each path segment and query value percent-encoded,
    /// so symbols such as `^GSPC` or `BRK/B` stay one segment.
    fn endpoint(&self, segments: &[&str], query: &[(&str, &str)]) -> Result<Url> {
        let mut url = Url::parse(&self.base_url)
            .map_err(|err| Error::Parse(format!("invalid provider URL {}: {err}", self.base_url)))?;
        url.path_segments_mut()
            .map_err(|()| Error::Parse(format!("provider URL {} cannot take a path", self.base_url)))?
            .pop_if_empty()
            .extend(segments);
        if !query.is_empty() {
            url.query_pairs_mut().extend_pairs(query);
        }
        Ok(url)
    }

    async fn get<T>(&self, url: Url) -> Result<T>
    where
        T: serde::de::DeserializeOwned,
    {
        debug!(url = %url, "GET");
        let response = self.http.get(url).send().await?.error_for_status()?;
        Ok(response.json::<T>().await?)
    }

    async fn options(&self, symbol: &str, date: Option<NaiveDate>) -> Result<OptionChainData> {
        let segments = ["v7", "finance", "options", symbol];
        let url = match date {
            Some(date) => {
                let stamp = timestamp_for_date(date).to_string();
                self.endpoint(&segments, &[("date", stamp.as_str())])?
            }
            None => self.endpoint(&segments, &[])?,
        };
        let response: OptionsResponse = self.get(url).await?;
        response
            .option_chain
            .result
            .into_iter()
            .next()
            .ok_or_else(|| {
                FetchError::NoOptionsData {
                    symbol: symbol.to_string(),
                }
                .into()
            })
    }
}

#[async_trait]
impl MarketData for YahooClient {
    async fn quote(&self, symbol: &str) -> Result<EquityQuote> {
        let url = self.endpoint(&["v7", "finance", "quote"], &[("symbols", symbol)])?;
        let response: QuoteResponse = self.get(url).await?;
        let data = response
            .quote_response
            .result
            .into_iter()
            .next()
            .ok_or_else(|| FetchError::EmptyResponse {
                symbol: symbol.to_string(),
                what: "quote",
            })?;
        Ok(data.into_equity_quote(symbol))
    }

    async fn daily_closes(&self, symbol: &str) -> Result<Vec<Price>> {
        let url = self.endpoint(
            &["v8", "finance", "chart", symbol],
            &[("range", "1y"), ("interval", "1d")],
        )?;
        let response: ChartResponse = self.get(url).await?;
        let closes = response.closes();
        debug!(symbol, count = closes.len(), "Fetched daily closes");
        Ok(closes)
    }

    async fn expirations(&self, symbol: &str) -> Result<Vec<NaiveDate>> {
        let data = self.options(symbol, None).await?;
        let mut dates: Vec<NaiveDate> = data
            .expiration_dates
            .iter()
            .filter_map(|ts| date_from_timestamp(*ts))
            .collect();
        dates.sort_unstable();
        dates.dedup();
        if dates.is_empty() {
            return Err(Error::Fetch(FetchError::NoOptionsData {
                symbol: symbol.to_string(),
            }));
        }
        Ok(dates)
    }

    async fn option_chain(&self, symbol: &str, expiration: NaiveDate) -> Result<OptionChain> {
        let data = self.options(symbol, Some(expiration)).await?;
        let Some(by_date) = data.options.into_iter().next() else {
            return Ok(OptionChain::new(expiration, Vec::new(), Vec::new()));
        };
        let calls = by_date
            .calls
            .into_iter()
            .filter_map(|row| row.into_quote(OptionKind::Call, expiration))
            .collect();
        let puts = by_date
            .puts
            .into_iter()
            .filter_map(|row| row.into_quote(OptionKind::Put, expiration))
            .collect();
        Ok(OptionChain::new(expiration, calls, puts))
    }

    fn provider_name(&self) -> &'static str {
        "Yahoo Finance"
    }
}
