//! Near-the-money call screening ranked by annualized time value.

use chrono::NaiveDate;
use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use serde::{Deserialize, Serialize};

use super::money::{percent_change, Percent, Price};
use super::quote::OptionQuote;
use super::yields::{annualized_time_value_pct, time_value};

/// Filter thresholds for [`screen_calls`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ScreenCriteria {
    /// Minimum traded volume per contract.
    pub min_volume: u64,
    /// Number of expirations to sample after the `min_days` cut.
    pub max_expirations: usize,
    /// Minimum annualized time value, in percent.
    pub min_annual_tv_pct: Percent,
    /// Highest strike considered, as percent above spot.
    pub max_otm_pct: Percent,
    /// Lowest strike considered, as percent below spot.
    pub max_itm_pct: Percent,
    /// Expirations must be strictly more than this many days out.
    pub min_days: i64,
    /// Keep at most this many candidates; zero keeps all.
    pub max_results: usize,
}

impl Default for ScreenCriteria {
    fn default() -> Self {
        Self {
            min_volume: 50,
            max_expirations: 2,
            min_annual_tv_pct: dec!(9.9),
            max_otm_pct: dec!(5.0),
            max_itm_pct: dec!(1.0),
            min_days: 5,
            max_results: 20,
        }
    }
}

impl ScreenCriteria {
    /// Strike window `[spot * (1 - itm%), spot * (1 + otm%)]`.
    #[must_use]
    pub fn strike_window(&self, spot: Price) -> (Price, Price) {
        let low = spot * (Decimal::ONE - self.max_itm_pct / Decimal::ONE_HUNDRED);
        let high = spot * (Decimal::ONE + self.max_otm_pct / Decimal::ONE_HUNDRED);
        (low, high)
    }

    /// Expirations worth sampling: far enough out, first `max_expirations`.
    #[must_use]
    pub fn eligible_expirations(&self, dates: &[NaiveDate], today: NaiveDate) -> Vec<NaiveDate> {
        dates
            .iter()
            .copied()
            .filter(|date| (*date - today).num_days() > self.min_days)
            .take(self.max_expirations)
            .collect()
    }
}

/// A call that passed the screen.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScreenCandidate {
    pub symbol: String,
    pub expiration: NaiveDate,
    pub strike: Price,
    pub last: Price,
    pub bid: Option<Price>,
    pub ask: Option<Price>,
    pub volume: Option<u64>,
    pub open_interest: Option<u64>,
    pub time_value: Price,
    pub days: i64,
    pub annualized_tv_pct: Percent,
    /// Strike distance from spot, in percent (negative when in the money).
    pub distance_pct: Percent,
}

/// Calls within the strike window that meet volume and time-value thresholds.
///
/// Candidates come back in quote order; use [`rank`] to sort and truncate.
#[must_use]
pub fn screen_calls(
    symbol: &str,
    calls: &[OptionQuote],
    spot: Price,
    today: NaiveDate,
    criteria: &ScreenCriteria,
) -> Vec<ScreenCandidate> {
    let (low, high) = criteria.strike_window(spot);
    calls
        .iter()
        .filter(|quote| quote.strike >= low && quote.strike <= high)
        .filter(|quote| quote.volume.unwrap_or(0) >= criteria.min_volume)
        .filter_map(|quote| {
            let days = (quote.expiration - today).num_days();
            let time_value = time_value(quote, spot);
            let annualized = annualized_time_value_pct(time_value, quote.strike, days)?;
            if annualized < criteria.min_annual_tv_pct {
                return None;
            }
            Some(ScreenCandidate {
                symbol: symbol.to_string(),
                expiration: quote.expiration,
                strike: quote.strike,
                last: quote.last_price,
                bid: quote.bid,
                ask: quote.ask,
                volume: quote.volume,
                open_interest: quote.open_interest,
                time_value,
                days,
                annualized_tv_pct: annualized,
                distance_pct: percent_change(spot, quote.strike).unwrap_or_default(),
            })
        })
        .collect()
}

/// Sort by annualized time value, best first, keeping at most `max_results`.
#[must_use]
pub fn rank(mut candidates: Vec<ScreenCandidate>, max_results: usize) -> Vec<ScreenCandidate> {
    candidates.sort_by(|a, b| b.annualized_tv_pct.cmp(&a.annualized_tv_pct));
    if max_results > 0 {
        candidates.truncate(max_results);
    }
    candidates
}
