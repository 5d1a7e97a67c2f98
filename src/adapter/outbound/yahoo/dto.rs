//! Response shapes of the Yahoo-style finance endpoints.
//!
//! Only the fields the crate reads are modelled; everything is optional
//! because the provider omits fields freely.

use chrono::{DateTime, NaiveDate};
use rust_decimal::Decimal;
use serde::Deserialize;

use crate::domain::quote::{EquityQuote, OptionKind, OptionQuote};

/// `GET /v7/finance/quote?symbols=...`
#[derive(Debug, Deserialize)]
pub struct QuoteResponse {
    #[serde(rename = "quoteResponse")]
    pub quote_response: QuoteResult,
}

#[derive(Debug, Deserialize)]
pub struct QuoteResult {
    #[serde(default)]
    pub result: Vec<QuoteData>,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct QuoteData {
    pub symbol: Option<String>,
    pub regular_market_price: Option<f64>,
    pub regular_market_previous_close: Option<f64>,
    pub market_cap: Option<f64>,
    #[serde(rename = "trailingPE")]
    pub trailing_pe: Option<f64>,
    pub dividend_yield: Option<f64>,
    pub trailing_annual_dividend_yield: Option<f64>,
    pub dividend_date: Option<i64>,
    pub ex_dividend_date: Option<i64>,
    pub target_mean_price: Option<f64>,
}

impl QuoteData {
    /// Convert to the domain quote; `symbol` is used when the payload omits it.
    #[must_use]
    pub fn into_equity_quote(self, symbol: &str) -> EquityQuote {
        EquityQuote {
            symbol: self.symbol.unwrap_or_else(|| symbol.to_string()),
            price: self.regular_market_price.and_then(decimal),
            previous_close: self.regular_market_previous_close.and_then(decimal),
            market_cap: self.market_cap.and_then(decimal),
            trailing_pe: self.trailing_pe.and_then(decimal),
            dividend_yield: self
                .dividend_yield
                .or(self.trailing_annual_dividend_yield)
                .and_then(decimal),
            ex_dividend_date: self.ex_dividend_date.and_then(date_from_timestamp),
            target_mean_price: self.target_mean_price.and_then(decimal),
        }
    }
}

/// `GET /v8/finance/chart/{symbol}?range=1y&interval=1d`
#[derive(Debug, Deserialize)]
pub struct ChartResponse {
    pub chart: ChartResult,
}

#[derive(Debug, Deserialize)]
pub struct ChartResult {
    #[serde(default)]
    pub result: Option<Vec<ChartData>>,
}

#[derive(Debug, Deserialize)]
pub struct ChartData {
    pub indicators: ChartIndicators,
}

#[derive(Debug, Deserialize)]
pub struct ChartIndicators {
    #[serde(default)]
    pub quote: Vec<ChartQuote>,
}

#[derive(Debug, Deserialize)]
pub struct ChartQuote {
    #[serde(default)]
    pub close: Vec<Option<f64>>,
}

impl ChartResponse {
    /// Daily closes oldest first, with gaps removed.
    #[must_use]
    pub fn closes(self) -> Vec<Decimal> {
        self.chart
            .result
            .unwrap_or_default()
            .into_iter()
            .next()
            .and_then(|data| data.indicators.quote.into_iter().next())
            .map(|quote| quote.close.into_iter().flatten().filter_map(decimal).collect())
            .unwrap_or_default()
    }
}

/// `GET /v7/finance/options/{symbol}[?date=<unix>]`
#[derive(Debug, Deserialize)]
pub struct OptionsResponse {
    #[serde(rename = "optionChain")]
    pub option_chain: OptionChainResult,
}

#[derive(Debug, Deserialize)]
pub struct OptionChainResult {
    #[serde(default)]
    pub result: Vec<OptionChainData>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OptionChainData {
    #[serde(default)]
    pub expiration_dates: Vec<i64>,
    #[serde(default)]
    pub options: Vec<OptionsByDate>,
}

#[derive(Debug, Deserialize)]
pub struct OptionsByDate {
    #[serde(rename = "expirationDate")]
    pub expiration_date: Option<i64>,
    #[serde(default)]
    pub calls: Vec<OptionData>,
    #[serde(default)]
    pub puts: Vec<OptionData>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OptionData {
    pub strike: Option<f64>,
    pub last_price: Option<f64>,
    pub bid: Option<f64>,
    pub ask: Option<f64>,
    pub volume: Option<i64>,
    pub open_interest: Option<i64>,
    pub expiration: Option<i64>,
}

impl OptionData {
    /// Convert to a domain quote. Contracts without a strike are dropped.
    #[must_use]
    pub fn into_quote(self, kind: OptionKind, expiration: NaiveDate) -> Option<OptionQuote> {
        let strike = self.strike.and_then(decimal)?;
        let last = self.last_price.and_then(decimal).unwrap_or_default();
        let expiration = self
            .expiration
            .and_then(date_from_timestamp)
            .unwrap_or(expiration);
        Some(OptionQuote {
            kind,
            strike,
            last_price: last,
            bid: self.bid.and_then(decimal),
            ask: self.ask.and_then(decimal),
            volume: self.volume.and_then(|v| u64::try_from(v).ok()),
            open_interest: self.open_interest.and_then(|v| u64::try_from(v).ok()),
            expiration,
        })
    }
}

fn decimal(value: f64) -> Option<Decimal> {
    if !value.is_finite() {
        return None;
    }
    Decimal::try_from(value).ok()
}

/// Calendar date (UTC) of a unix timestamp in seconds.
#[must_use]
pub fn date_from_timestamp(ts: i64) -> Option<NaiveDate> {
    DateTime::from_timestamp(ts, 0).map(|dt| dt.date_naive())
}

/// Unix timestamp the provider uses to address an expiration date.
#[must_use]
pub fn timestamp_for_date(date: NaiveDate) -> i64 {
    date.and_hms_opt(0, 0, 0)
        .map(|dt| dt.and_utc().timestamp())
        .unwrap_or_default()
}
