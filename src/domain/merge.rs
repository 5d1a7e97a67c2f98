//! Merging freshly fetched records into a prior snapshot.

use std::collections::HashSet;

use chrono::{Duration, NaiveDateTime};

use super::record::TickerRecord;

/// Default maximum age before a record must be refetched.
pub const DEFAULT_MAX_AGE_HOURS: i64 = 4;

/// Combine `existing` rows with `fresh` rows.
///
/// Every existing row whose symbol is in `refreshed` is dropped; the rest keep
/// their order and `fresh` is appended after them.
#[must_use]
pub fn merge(
    existing: &[TickerRecord],
    fresh: Vec<TickerRecord>,
    refreshed: &HashSet<String>,
) -> Vec<TickerRecord> {
    let mut merged: Vec<TickerRecord> = existing
        .iter()
        .filter(|record| !refreshed.contains(&record.symbol))
        .cloned()
        .collect();
    merged.extend(fresh);
    merged
}

/// True when the record has no last-update timestamp or it is at least
/// `max_age_hours` old.
#[must_use]
pub fn is_stale(record: &TickerRecord, now: NaiveDateTime, max_age_hours: i64) -> bool {
    match record.last_update {
        Some(updated) => now - updated >= Duration::hours(max_age_hours),
        None => true,
    }
}

/// Tickers split by whether the existing snapshot can serve them.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Freshness {
    /// Present and recent enough to reuse.
    pub fresh: Vec<String>,
    /// Missing from the snapshot or stale; these get refetched.
    pub refresh: Vec<String>,
}

/// Split requested `tickers` into reusable and to-be-fetched.
#[must_use]
pub fn partition_by_freshness(
    tickers: &[String],
    existing: &[TickerRecord],
    now: NaiveDateTime,
    max_age_hours: i64,
) -> Freshness {
    let mut freshness = Freshness::default();
    for ticker in tickers {
        let reusable = existing
            .iter()
            .find(|record| &record.symbol == ticker)
            .is_some_and(|record| !is_stale(record, now, max_age_hours));
        if reusable {
            freshness.fresh.push(ticker.clone());
        } else {
            freshness.refresh.push(ticker.clone());
        }
    }
    freshness
}

/// Trim, uppercase and de-duplicate tickers, keeping first occurrences.
#[must_use]
pub fn normalize_tickers<I, S>(tickers: I) -> Vec<String>
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    let mut seen = HashSet::new();
    tickers
        .into_iter()
        .map(|t| t.as_ref().trim().to_uppercase())
        .filter(|t| !t.is_empty())
        .filter(|t| seen.insert(t.clone()))
        .collect()
}
