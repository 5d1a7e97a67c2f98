//! Domain errors raised by option sampling and screening.
//!
//! # Examples
//!
//! ```
//! use chrono::NaiveDate;
//! use stocklive::domain::error::DomainError;
//! use stocklive::domain::sampler::closest_expiration;
//!
//! let today = NaiveDate::from_ymd_opt(2025, 1, 2).unwrap();
//! let result = closest_expiration(&[], 90, today);
//!
//! assert!(matches!(result, Err(DomainError::NoExpirationsAvailable)));
//! ```

use thiserror::Error;

/// Errors that occur when a domain operation has nothing to work with.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum DomainError {
    /// The option chain lists no expiration dates.
    #[error("no expiration dates available")]
    NoExpirationsAvailable,

    /// Every quote was eliminated by the filters.
    #[error("no option quote satisfies the filters")]
    NoQualifyingQuote,
}
