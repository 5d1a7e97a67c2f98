//! Monetary and percentage types.

use rust_decimal::Decimal;

/// Price represented as a Decimal for precision.
pub type Price = Decimal;

/// Percentage points (`6.5` means 6.5%).
pub type Percent = Decimal;

/// Percentage change from `from` to `to`, or `None` when `from` is zero.
#[must_use]
pub fn percent_change(from: Price, to: Price) -> Option<Percent> {
    if from.is_zero() {
        return None;
    }
    Some((to - from) / from * Decimal::ONE_HUNDRED)
}

/// `value` as a percentage of `base`, or `None` when `base` is zero.
#[must_use]
pub fn percent_of(value: Price, base: Price) -> Option<Percent> {
    value
        .checked_div(base)
        .map(|ratio| ratio * Decimal::ONE_HUNDRED)
}
