//! Covered-call coverage for a brokerage portfolio.
//!
//! A stock position of `N` shares is covered by short calls on the same
//! underlying; each contract covers [`SHARES_PER_CONTRACT`] shares. The
//! coverage state decides what to recommend:
//!
//! - at least one free lot: sell covered calls
//! - more contracts than shares: buy calls back
//! - exactly covered: roll when a better call exists, otherwise hold

use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use super::money::{Percent, Price};
use super::quote::{OptionKind, OptionQuote};
use super::screen::ScreenCandidate;
use super::yields::{annualized_time_value_pct, time_value};

/// Shares controlled by one option contract.
pub const SHARES_PER_CONTRACT: i64 = 100;

/// Security type column of the broker export.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum SecurityType {
    Stock,
    Option,
    Other(String),
}

impl SecurityType {
    /// Parse the broker's `STK` / `OPT` codes.
    #[must_use]
    pub fn from_code(code: &str) -> Self {
        match code.trim().to_uppercase().as_str() {
            "STK" => Self::Stock,
            "OPT" => Self::Option,
            other => Self::Other(other.to_string()),
        }
    }
}

/// One row of the portfolio export.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Position {
    pub security_type: SecurityType,
    /// Ticker for stocks; `"<TICKER> <contract>"` for options.
    pub description: String,
    /// Signed quantity; short calls are negative.
    pub quantity: Decimal,
    pub market_price: Option<Price>,
    pub expiration: Option<NaiveDate>,
    pub strike: Option<Price>,
    pub volume: Option<u64>,
}

impl Position {
    /// Underlying ticker: the first whitespace-separated token of the description.
    #[must_use]
    pub fn underlying(&self) -> &str {
        self.description.split_whitespace().next().unwrap_or("")
    }

    #[must_use]
    pub fn is_stock(&self) -> bool {
        self.security_type == SecurityType::Stock
    }

    #[must_use]
    pub fn is_option(&self) -> bool {
        self.security_type == SecurityType::Option
    }

    /// Annualized time value of this (call) position at `spot`, when it has
    /// enough data: strike, market price and a future expiration.
    #[must_use]
    pub fn annualized_time_value_pct(&self, spot: Price, today: NaiveDate) -> Option<Percent> {
        let strike = self.strike?;
        let price = self.market_price?;
        let expiration = self.expiration?;
        let quote = OptionQuote::new(OptionKind::Call, strike, price, expiration);
        annualized_time_value_pct(
            time_value(&quote, spot),
            strike,
            (expiration - today).num_days(),
        )
    }
}

/// Options whose underlying is `ticker`.
#[must_use]
pub fn related_options<'a>(ticker: &str, positions: &'a [Position]) -> Vec<&'a Position> {
    positions
        .iter()
        .filter(|p| p.is_option() && p.underlying().eq_ignore_ascii_case(ticker))
        .collect()
}

/// Shares held versus shares committed to written calls.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Coverage {
    pub shares: Decimal,
    pub covered_shares: Decimal,
    pub free_shares: Decimal,
}

impl Coverage {
    /// Coverage for `shares` given the related option positions.
    #[must_use]
    pub fn compute(shares: Decimal, options: &[&Position]) -> Self {
        let contracts: Decimal = options.iter().map(|p| p.quantity.abs()).sum();
        let covered_shares = contracts * Decimal::from(SHARES_PER_CONTRACT);
        Self {
            shares,
            covered_shares,
            free_shares: shares - covered_shares,
        }
    }

    /// What the coverage calls for.
    #[must_use]
    pub fn state(&self) -> CoverageState {
        if self.free_shares >= Decimal::from(SHARES_PER_CONTRACT) {
            CoverageState::Uncovered
        } else if self.covered_shares > self.shares {
            CoverageState::OverCovered
        } else {
            CoverageState::Covered
        }
    }
}

/// Coverage classification driving the recommendation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CoverageState {
    /// At least one free lot of 100 shares.
    Uncovered,
    /// More shares under contract than held.
    OverCovered,
    /// Every full lot is already written against.
    Covered,
}

/// Recommended action for a position.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Action {
    SellCoveredCall,
    BuyBackCall,
    ConsiderRolling,
    RollOrHold,
}

impl std::fmt::Display for Action {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::SellCoveredCall => write!(f, "Sell Covered Call"),
            Self::BuyBackCall => write!(f, "Buy Back Call"),
            Self::ConsiderRolling => write!(f, "Consider Rolling to Better Option"),
            Self::RollOrHold => write!(f, "Roll or Hold"),
        }
    }
}

/// One line of the recommendations file.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Recommendation {
    pub ticker: String,
    pub action: Action,
    pub expiration: Option<NaiveDate>,
    pub strike: Option<Price>,
    pub premium: Option<Price>,
    pub volume: Option<u64>,
    pub annualized_return_pct: Option<Percent>,
    pub distance_otm_pct: Option<Percent>,
}

impl Recommendation {
    /// Recommendation pointing at a screened call.
    #[must_use]
    pub fn from_candidate(ticker: &str, action: Action, candidate: &ScreenCandidate) -> Self {
        Self {
            ticker: ticker.to_string(),
            action,
            expiration: Some(candidate.expiration),
            strike: Some(candidate.strike),
            premium: Some(candidate.last),
            volume: candidate.volume,
            annualized_return_pct: Some(candidate.annualized_tv_pct),
            distance_otm_pct: Some(candidate.distance_pct),
        }
    }

    /// Recommendation about an option already held.
    #[must_use]
    pub fn from_position(ticker: &str, action: Action, position: &Position) -> Self {
        Self {
            ticker: ticker.to_string(),
            action,
            expiration: position.expiration,
            strike: position.strike,
            premium: position.market_price,
            volume: position.volume,
            annualized_return_pct: None,
            distance_otm_pct: None,
        }
    }
}

/// Roll when the best screened call beats the held one, or when the held
/// one's annualized time value cannot be determined.
#[must_use]
pub fn should_roll(best: &ScreenCandidate, held_annualized_pct: Option<Percent>) -> bool {
    held_annualized_pct.map_or(true, |held| best.annualized_tv_pct > held)
}
