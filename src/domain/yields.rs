//! Time value and premium yield arithmetic.
//!
//! Everything here is formula-free plain arithmetic on [`Decimal`]; the
//! spreadsheet formula for the put/call ratio lives in the xlsx writer.

use rust_decimal::Decimal;

use super::money::{Percent, Price};
use super::quote::OptionQuote;

const DAYS_PER_YEAR: i64 = 365;

/// Portion of the option price not explained by immediate exercise.
///
/// Out-of-the-money options are all time value. In-the-money options
/// subtract the (non-negative) intrinsic value from the last price.
#[must_use]
pub fn time_value(quote: &OptionQuote, spot: Price) -> Price {
    if quote.is_out_of_the_money(spot) {
        quote.last_price
    } else {
        quote.last_price - quote.intrinsic_value(spot)
    }
}

/// Time value scaled to a 365-day rate and normalized by strike, in percent.
///
/// Returns `None` for expired or same-day options (`days_to_expiry <= 0`)
/// and for non-positive strikes.
#[must_use]
pub fn annualized_time_value_pct(
    time_value: Price,
    strike: Price,
    days_to_expiry: i64,
) -> Option<Percent> {
    if days_to_expiry <= 0 || strike <= Decimal::ZERO {
        return None;
    }
    let per_strike = time_value.checked_div(strike)?;
    let annualize = Decimal::from(DAYS_PER_YEAR).checked_div(Decimal::from(days_to_expiry))?;
    Some(per_strike * annualize * Decimal::ONE_HUNDRED)
}

/// Put premium yield divided by call premium yield.
///
/// Defined only when both yields are present and the call yield is non-zero.
#[must_use]
pub fn put_call_yield_ratio(put_yield: Option<Percent>, call_yield: Option<Percent>) -> Option<Decimal> {
    let put = put_yield?;
    let call = call_yield?;
    if call.is_zero() {
        return None;
    }
    put.checked_div(call)
}

/// Premium as a percentage of spot, rounded to two decimals.
#[must_use]
pub fn premium_yield_pct(premium: Price, spot: Price) -> Option<Percent> {
    if spot <= Decimal::ZERO {
        return None;
    }
    super::money::percent_of(premium, spot).map(|pct| pct.round_dp(2))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::quote::OptionKind;
    use chrono::NaiveDate;
    use rust_decimal_macros::dec;

    fn quote(kind: OptionKind, strike: Decimal, last: Decimal) -> OptionQuote {
        OptionQuote::new(kind, strike, last, NaiveDate::from_ymd_opt(2030, 1, 18).unwrap())
    }

    #[test]
    fn otm_call_is_all_time_value() {
        let call = quote(OptionKind::Call, dec!(105), dec!(2.5));
        assert_eq!(time_value(&call, dec!(100)), dec!(2.5));
    }

    #[test]
    fn itm_call_subtracts_intrinsic() {
        let call = quote(OptionKind::Call, dec!(95), dec!(7));
        assert_eq!(time_value(&call, dec!(100)), dec!(2));
    }

    #[test]
    fn itm_put_subtracts_intrinsic() {
        let put = quote(OptionKind::Put, dec!(110), dec!(12.5));
        assert_eq!(time_value(&put, dec!(100)), dec!(2.5));
    }

    #[test]
    fn deep_itm_quote_below_intrinsic_has_negative_time_value() {
        let call = quote(OptionKind::Call, dec!(80), dec!(19));
        assert_eq!(time_value(&call, dec!(100)), dec!(-1));
    }

    #[test]
    fn annualized_pct_matches_formula() {
        // 2 / 100 * 365 / 73 * 100 = 10
        let pct = annualized_time_value_pct(dec!(2), dec!(100), 73).unwrap();
        assert_eq!(pct, dec!(10));
    }

    #[test]
    fn annualized_pct_undefined_for_expired_or_same_day() {
        for days in [-30, -1, 0] {
            assert_eq!(annualized_time_value_pct(dec!(2), dec!(100), days), None);
        }
    }

    #[test]
    fn annualized_pct_undefined_for_zero_strike() {
        assert_eq!(annualized_time_value_pct(dec!(2), Decimal::ZERO, 30), None);
    }

    #[test]
    fn ratio_cases() {
        assert_eq!(put_call_yield_ratio(Some(dec!(5)), Some(dec!(10))), Some(dec!(0.5)));
        assert_eq!(put_call_yield_ratio(Some(dec!(5)), Some(dec!(0))), None);
        assert_eq!(put_call_yield_ratio(None, Some(dec!(10))), None);
        assert_eq!(put_call_yield_ratio(Some(dec!(5)), None), None);
    }

    #[test]
    fn premium_yield_rounds_to_cents() {
        assert_eq!(premium_yield_pct(dec!(1), dec!(3)), Some(dec!(33.33)));
        assert_eq!(premium_yield_pct(dec!(1), Decimal::ZERO), None);
    }
}
