//! Option chain sampling: pick the expiration nearest a tenor and the
//! nearest qualifying out-of-the-money strike on each side.

use chrono::{Duration, NaiveDate};
use rust_decimal::Decimal;

use super::error::DomainError;
use super::money::{Percent, Price};
use super::quote::OptionQuote;
use super::yields::premium_yield_pct;

/// Default distance from spot, in percent, for the sampled strikes.
pub const DEFAULT_OTM_PCT: Decimal = Decimal::from_parts(6, 0, 0, false, 0);

/// Tenors sampled for every comparison row, in days.
pub const THREE_MONTHS: i64 = 90;
pub const SIX_MONTHS: i64 = 180;
pub const ONE_YEAR: i64 = 365;

/// A sampled call: premium as a percentage of spot and the strike it came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CallSample {
    pub yield_pct: Percent,
    pub strike: Price,
}

/// Expiration with the smallest absolute day-distance from `today + target_days`.
///
/// Ties keep the earliest entry in `dates`.
///
/// # Errors
///
/// Returns [`DomainError::NoExpirationsAvailable`] when `dates` is empty.
pub fn closest_expiration(
    dates: &[NaiveDate],
    target_days: i64,
    today: NaiveDate,
) -> Result<NaiveDate, DomainError> {
    let target = today + Duration::days(target_days);
    let mut best: Option<(NaiveDate, i64)> = None;
    for &date in dates {
        let distance = (date - target).num_days().abs();
        match best {
            Some((_, best_distance)) if distance >= best_distance => {}
            _ => best = Some((date, distance)),
        }
    }
    best.map(|(date, _)| date)
        .ok_or(DomainError::NoExpirationsAvailable)
}

/// Strike threshold `spot * (1 + otm_pct / 100)` for calls.
#[must_use]
pub fn call_strike_floor(spot: Price, otm_pct: Percent) -> Price {
    spot * (Decimal::ONE + otm_pct / Decimal::ONE_HUNDRED)
}

/// Strike threshold `spot * (1 - otm_pct / 100)` for puts.
#[must_use]
pub fn put_strike_ceiling(spot: Price, otm_pct: Percent) -> Price {
    spot * (Decimal::ONE - otm_pct / Decimal::ONE_HUNDRED)
}

/// Cheapest call at least `otm_pct` above spot.
///
/// Takes the lowest strike `>= spot * (1 + otm_pct / 100)` and reports its
/// last price as a percentage of spot, rounded to two decimals.
#[must_use]
pub fn select_otm_call(calls: &[OptionQuote], spot: Price, otm_pct: Percent) -> Option<CallSample> {
    let floor = call_strike_floor(spot, otm_pct);
    let call = calls
        .iter()
        .filter(|quote| quote.strike >= floor)
        .min_by(|a, b| a.strike.cmp(&b.strike))?;
    Some(CallSample {
        yield_pct: premium_yield_pct(call.last_price, spot)?,
        strike: call.strike,
    })
}

/// Last price of the put closest to spot while at least `otm_pct` below it.
#[must_use]
pub fn select_otm_put(puts: &[OptionQuote], spot: Price, otm_pct: Percent) -> Option<Price> {
    let ceiling = put_strike_ceiling(spot, otm_pct);
    puts.iter()
        .filter(|quote| quote.strike <= ceiling)
        .max_by(|a, b| a.strike.cmp(&b.strike))
        .map(|put| put.last_price)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::quote::OptionKind;
    use rust_decimal_macros::dec;

    fn today() -> NaiveDate {
        NaiveDate::from_ymd_opt(2025, 3, 3).unwrap()
    }

    fn days(n: i64) -> NaiveDate {
        today() + Duration::days(n)
    }

    fn quotes(kind: OptionKind, rows: &[(Decimal, Decimal)]) -> Vec<OptionQuote> {
        rows.iter()
            .map(|&(strike, last)| OptionQuote::new(kind, strike, last, days(90)))
            .collect()
    }

    #[test]
    fn closest_expiration_picks_nearest_date() {
        let dates = [days(5), days(14), days(40)];
        assert_eq!(closest_expiration(&dates, 10, today()), Ok(days(14)));
    }

    #[test]
    fn closest_expiration_tie_keeps_first_seen() {
        let dates = [days(20), days(10)];
        assert_eq!(closest_expiration(&dates, 15, today()), Ok(days(20)));
    }

    #[test]
    fn closest_expiration_empty_fails() {
        assert_eq!(
            closest_expiration(&[], 90, today()),
            Err(DomainError::NoExpirationsAvailable)
        );
    }

    #[test]
    fn otm_call_takes_lowest_qualifying_strike() {
        let calls = quotes(OptionKind::Call, &[(dec!(110), dec!(2.0)), (dec!(106), dec!(1.0))]);
        let sample = select_otm_call(&calls, dec!(100), DEFAULT_OTM_PCT).unwrap();

        assert_eq!(sample.strike, dec!(106));
        assert_eq!(sample.yield_pct, dec!(1.00));
    }

    #[test]
    fn otm_call_none_when_all_strikes_too_close() {
        let calls = quotes(OptionKind::Call, &[(dec!(100), dec!(4)), (dec!(105), dec!(2))]);
        assert_eq!(select_otm_call(&calls, dec!(100), DEFAULT_OTM_PCT), None);
    }

    #[test]
    fn otm_put_takes_highest_qualifying_strike() {
        let puts = quotes(OptionKind::Put, &[(dec!(94), dec!(1.5)), (dec!(90), dec!(2.0))]);
        assert_eq!(select_otm_put(&puts, dec!(100), DEFAULT_OTM_PCT), Some(dec!(1.5)));
    }

    #[test]
    fn otm_put_none_when_all_strikes_too_close() {
        let puts = quotes(OptionKind::Put, &[(dec!(95), dec!(1.5)), (dec!(99), dec!(2.0))]);
        assert_eq!(select_otm_put(&puts, dec!(100), DEFAULT_OTM_PCT), None);
    }

    #[test]
    fn selected_strikes_never_cross_the_otm_bounds() {
        // last price equals strike so the put selection reveals its strike
        let rows: Vec<(Decimal, Decimal)> = (60..=140)
            .map(|s| (Decimal::from(s), Decimal::from(s)))
            .collect();
        let calls = quotes(OptionKind::Call, &rows);
        let puts = quotes(OptionKind::Put, &rows);

        for spot in [dec!(61.5), dec!(80), dec!(99.99), dec!(100), dec!(117.3), dec!(139)] {
            for otm in [dec!(0), dec!(3), dec!(6), dec!(10), dec!(25)] {
                if let Some(sample) = select_otm_call(&calls, spot, otm) {
                    assert!(sample.strike >= call_strike_floor(spot, otm));
                }
                if let Some(strike) = select_otm_put(&puts, spot, otm) {
                    assert!(strike <= put_strike_ceiling(spot, otm));
                }
            }
        }
    }
}
