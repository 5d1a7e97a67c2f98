//! Option and equity quotes as returned by the market-data provider.

use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use super::money::{Percent, Price};

/// Call or put.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OptionKind {
    Call,
    Put,
}

impl std::fmt::Display for OptionKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Call => write!(f, "call"),
            Self::Put => write!(f, "put"),
        }
    }
}

/// A single option quote. Fetched per request and never persisted.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OptionQuote {
    pub kind: OptionKind,
    pub strike: Price,
    pub last_price: Price,
    pub bid: Option<Price>,
    pub ask: Option<Price>,
    pub volume: Option<u64>,
    pub open_interest: Option<u64>,
    pub expiration: NaiveDate,
}

impl OptionQuote {
    /// Create a quote with only the fields every provider returns.
    #[must_use]
    pub fn new(kind: OptionKind, strike: Price, last_price: Price, expiration: NaiveDate) -> Self {
        Self {
            kind,
            strike,
            last_price,
            bid: None,
            ask: None,
            volume: None,
            open_interest: None,
            expiration,
        }
    }

    #[must_use]
    pub fn with_volume(mut self, volume: u64) -> Self {
        self.volume = Some(volume);
        self
    }

    #[must_use]
    pub fn with_open_interest(mut self, open_interest: u64) -> Self {
        self.open_interest = Some(open_interest);
        self
    }

    #[must_use]
    pub fn with_bid_ask(mut self, bid: Price, ask: Price) -> Self {
        self.bid = Some(bid);
        self.ask = Some(ask);
        self
    }

    /// True when exercising now would be worthless: call strike above spot,
    /// put strike below spot.
    #[must_use]
    pub fn is_out_of_the_money(&self, spot: Price) -> bool {
        match self.kind {
            OptionKind::Call => self.strike > spot,
            OptionKind::Put => self.strike < spot,
        }
    }

    /// Value of immediate exercise, clipped at zero.
    #[must_use]
    pub fn intrinsic_value(&self, spot: Price) -> Price {
        let raw = match self.kind {
            OptionKind::Call => spot - self.strike,
            OptionKind::Put => self.strike - spot,
        };
        raw.max(Decimal::ZERO)
    }
}

/// All quotes for one expiration date.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct OptionChain {
    pub expiration: Option<NaiveDate>,
    pub calls: Vec<OptionQuote>,
    pub puts: Vec<OptionQuote>,
}

impl OptionChain {
    #[must_use]
    pub fn new(expiration: NaiveDate, calls: Vec<OptionQuote>, puts: Vec<OptionQuote>) -> Self {
        Self {
            expiration: Some(expiration),
            calls,
            puts,
        }
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.calls.is_empty() && self.puts.is_empty()
    }
}

/// Equity quote fields used to build a comparison row.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct EquityQuote {
    pub symbol: String,
    pub price: Option<Price>,
    pub previous_close: Option<Price>,
    pub market_cap: Option<Decimal>,
    pub trailing_pe: Option<Decimal>,
    pub dividend_yield: Option<Percent>,
    pub ex_dividend_date: Option<NaiveDate>,
    pub target_mean_price: Option<Price>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    fn expiry() -> NaiveDate {
        NaiveDate::from_ymd_opt(2030, 1, 18).unwrap()
    }

    #[test]
    fn call_moneyness_and_intrinsic() {
        let otm = OptionQuote::new(OptionKind::Call, dec!(105), dec!(2), expiry());
        let itm = OptionQuote::new(OptionKind::Call, dec!(95), dec!(7), expiry());

        assert!(otm.is_out_of_the_money(dec!(100)));
        assert_eq!(otm.intrinsic_value(dec!(100)), Decimal::ZERO);
        assert!(!itm.is_out_of_the_money(dec!(100)));
        assert_eq!(itm.intrinsic_value(dec!(100)), dec!(5));
    }

    #[test]
    fn put_moneyness_and_intrinsic() {
        let otm = OptionQuote::new(OptionKind::Put, dec!(94), dec!(1.5), expiry());
        let itm = OptionQuote::new(OptionKind::Put, dec!(110), dec!(12), expiry());

        assert!(otm.is_out_of_the_money(dec!(100)));
        assert_eq!(otm.intrinsic_value(dec!(100)), Decimal::ZERO);
        assert_eq!(itm.intrinsic_value(dec!(100)), dec!(10));
    }
}
