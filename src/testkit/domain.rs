//! Builders for dates, quotes and records used across tests.

use chrono::{Duration, NaiveDate, NaiveDateTime};

use crate::domain::{OptionChain, OptionKind, OptionQuote, Price, TickerRecord};

/// A calendar date; panics on an invalid date.
pub fn date(year: i32, month: u32, day: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(year, month, day).expect("valid date")
}

/// A timestamp on `date` at `hour:minute`.
pub fn at(day: NaiveDate, hour: u32, minute: u32) -> NaiveDateTime {
    day.and_hms_opt(hour, minute, 0).expect("valid time")
}

/// Date `days` after `from`.
pub fn days_after(from: NaiveDate, days: i64) -> NaiveDate {
    from + Duration::days(days)
}

/// A call with volume, expiring on `expiration`.
pub fn call(strike: Price, last: Price, volume: u64, expiration: NaiveDate) -> OptionQuote {
    OptionQuote::new(OptionKind::Call, strike, last, expiration).with_volume(volume)
}

/// A put with volume, expiring on `expiration`.
pub fn put(strike: Price, last: Price, volume: u64, expiration: NaiveDate) -> OptionQuote {
    OptionQuote::new(OptionKind::Put, strike, last, expiration).with_volume(volume)
}

/// A chain holding `calls` and `puts` for `expiration`.
pub fn chain(expiration: NaiveDate, calls: Vec<OptionQuote>, puts: Vec<OptionQuote>) -> OptionChain {
    OptionChain::new(expiration, calls, puts)
}

/// A record with a price, stamped at `updated`.
pub fn priced_record(symbol: &str, price: Price, updated: NaiveDateTime) -> TickerRecord {
    TickerRecord {
        current_price: Some(price),
        ..TickerRecord::new(symbol, updated)
    }
}
