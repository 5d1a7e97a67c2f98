//! Snapshot sheet layout: header names, their order, and cell addressing.

pub const TICKER: &str = "Ticker";
pub const CURRENT_PRICE: &str = "Current Price";
pub const DAY_CHANGE: &str = "1D % Change";
pub const MARKET_CAP: &str = "Market Cap (T$)";
pub const PE_RATIO: &str = "P/E";
pub const YOY_CHANGE: &str = "YoY Price %";
pub const EX_DIVIDEND: &str = "Ex-Div Date";
pub const DIVIDEND_YIELD: &str = "Div Yield";
pub const ANALYST_TARGET: &str = "Analyst 1-yr Target";
pub const PUT_PRICE: &str = "1-yr 6% OTM PUT Price";
pub const PUT_PREMIUM_YIELD: &str = "Annual Yield Put Prem";
pub const CALL_YIELD_3M: &str = "3-mo Call Yield";
pub const CALL_YIELD_6M: &str = "6-mo Call Yield";
pub const CALL_YIELD_1Y: &str = "1-yr Call Yield";
pub const CALL_PREMIUM_YIELD: &str = "Annual Yield Call Prem";
pub const PUT_CALL_RATIO: &str = "Put/Call Yield Ratio";
pub const EXAMPLE_STRIKE: &str = "Example 6-mo Strike";
pub const ERROR: &str = "Error";
pub const LAST_UPDATE: &str = "Last Update";

/// Column order of a written snapshot. The ratio sits right after the call
/// premium yield it divides by.
pub const HEADERS: [&str; 19] = [
    TICKER,
    CURRENT_PRICE,
    DAY_CHANGE,
    MARKET_CAP,
    PE_RATIO,
    YOY_CHANGE,
    EX_DIVIDEND,
    DIVIDEND_YIELD,
    ANALYST_TARGET,
    PUT_PRICE,
    PUT_PREMIUM_YIELD,
    CALL_YIELD_3M,
    CALL_YIELD_6M,
    CALL_YIELD_1Y,
    CALL_PREMIUM_YIELD,
    PUT_CALL_RATIO,
    EXAMPLE_STRIKE,
    ERROR,
    LAST_UPDATE,
];

/// Zero-based index of `header` in [`HEADERS`].
#[must_use]
pub fn index_of(header: &str) -> Option<u16> {
    HEADERS
        .iter()
        .position(|h| *h == header)
        .and_then(|i| u16::try_from(i).ok())
}

/// Spreadsheet letter(s) for a zero-based column: 0 → `A`, 26 → `AA`.
#[must_use]
pub fn column_letter(index: u16) -> String {
    let mut n = u32::from(index) + 1;
    let mut letters = Vec::new();
    while n > 0 {
        let rem = (n - 1) % 26;
        letters.push(char::from(b'A' + rem as u8));
        n = (n - 1) / 26;
    }
    letters.iter().rev().collect()
}

/// Live ratio formula for a one-based sheet row.
///
/// Blank when the division fails (empty or zero call yield).
#[must_use]
pub fn ratio_formula(row: u32) -> String {
    let put = index_of(PUT_PREMIUM_YIELD).map(column_letter).unwrap_or_default();
    let call = index_of(CALL_PREMIUM_YIELD).map(column_letter).unwrap_or_default();
    format!("=IFERROR({put}{row}/{call}{row},\"\")")
}
