//! One comparison row per ticker symbol.

use chrono::{NaiveDate, NaiveDateTime};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use super::money::{Percent, Price};
use super::yields::put_call_yield_ratio;

/// Text format of the last-update timestamp in persisted snapshots.
///
/// Lexicographic order of this format matches chronological order.
pub const LAST_UPDATE_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

/// Metrics for one symbol at one point in time.
///
/// The symbol is the key: within a snapshot it is unique, and a freshly
/// fetched record replaces any prior record with the same symbol.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct TickerRecord {
    pub symbol: String,
    pub current_price: Option<Price>,
    pub day_change_pct: Option<Percent>,
    /// Market capitalization in trillions of dollars.
    pub market_cap_trillions: Option<Decimal>,
    pub pe_ratio: Option<Decimal>,
    pub yoy_change_pct: Option<Percent>,
    pub ex_dividend_date: Option<NaiveDate>,
    pub dividend_yield: Option<Decimal>,
    pub analyst_target: Option<Price>,
    /// Last price of the one-year put at the sampled OTM distance.
    pub put_price_1y: Option<Price>,
    /// One-year put premium as a percentage of spot.
    pub put_premium_yield: Option<Percent>,
    pub call_yield_3m: Option<Percent>,
    pub call_yield_6m: Option<Percent>,
    pub call_yield_1y: Option<Percent>,
    /// One-year call premium as a percentage of spot.
    pub call_premium_yield: Option<Percent>,
    /// Strike behind the six-month call yield.
    pub example_strike_6m: Option<Price>,
    /// Why fetching this symbol failed, if it did.
    pub error: Option<String>,
    pub last_update: Option<NaiveDateTime>,
}

impl TickerRecord {
    /// Create an empty record for `symbol` stamped at `now`.
    #[must_use]
    pub fn new(symbol: impl Into<String>, now: NaiveDateTime) -> Self {
        Self {
            symbol: symbol.into(),
            last_update: Some(now),
            ..Default::default()
        }
    }

    /// Record for a symbol whose fetch failed.
    #[must_use]
    pub fn failed(symbol: impl Into<String>, error: impl Into<String>, now: NaiveDateTime) -> Self {
        Self {
            error: Some(error.into()),
            ..Self::new(symbol, now)
        }
    }

    /// Put premium yield over call premium yield.
    #[must_use]
    pub fn put_call_ratio(&self) -> Option<Decimal> {
        put_call_yield_ratio(self.put_premium_yield, self.call_premium_yield)
    }

    #[must_use]
    pub fn is_failed(&self) -> bool {
        self.error.is_some()
    }

    /// Last update rendered in [`LAST_UPDATE_FORMAT`].
    #[must_use]
    pub fn last_update_text(&self) -> Option<String> {
        self.last_update
            .map(|ts| ts.format(LAST_UPDATE_FORMAT).to_string())
    }
}

/// Parse a persisted last-update value. Unparsable text yields `None`.
#[must_use]
pub fn parse_last_update(text: &str) -> Option<NaiveDateTime> {
    let text = text.trim();
    NaiveDateTime::parse_from_str(text, LAST_UPDATE_FORMAT)
        .or_else(|_| NaiveDateTime::parse_from_str(text, "%Y-%m-%dT%H:%M:%S"))
        .ok()
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    fn now() -> NaiveDateTime {
        NaiveDate::from_ymd_opt(2025, 7, 23)
            .unwrap()
            .and_hms_opt(9, 30, 0)
            .unwrap()
    }

    #[test]
    fn failed_record_keeps_symbol_and_timestamp() {
        let record = TickerRecord::failed("AAA", "boom", now());

        assert_eq!(record.symbol, "AAA");
        assert_eq!(record.error.as_deref(), Some("boom"));
        assert_eq!(record.last_update, Some(now()));
        assert!(record.current_price.is_none());
    }

    #[test]
    fn ratio_derives_from_premium_yields() {
        let mut record = TickerRecord::new("AAA", now());
        record.put_premium_yield = Some(dec!(5));
        record.call_premium_yield = Some(dec!(10));
        assert_eq!(record.put_call_ratio(), Some(dec!(0.5)));

        record.call_premium_yield = Some(Decimal::ZERO);
        assert_eq!(record.put_call_ratio(), None);
    }

    #[test]
    fn last_update_text_round_trips() {
        let record = TickerRecord::new("AAA", now());
        let text = record.last_update_text().unwrap();

        assert_eq!(text, "2025-07-23 09:30:00");
        assert_eq!(parse_last_update(&text), Some(now()));
        assert_eq!(parse_last_update("yesterday-ish"), None);
    }
}
