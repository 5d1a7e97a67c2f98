use std::path::PathBuf;

use thiserror::Error;

use crate::domain::error::DomainError;

/// Configuration-related errors with structured variants.
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("missing required field: {field}")]
    MissingField { field: &'static str },

    #[error("invalid value for {field}: {reason}")]
    InvalidValue { field: &'static str, reason: String },

    #[error("failed to read config file: {0}")]
    ReadFile(#[source] std::io::Error),

    #[error("failed to parse config: {0}")]
    Parse(#[source] toml::de::Error),
}

/// Market-data errors for a single symbol.
///
/// These are captured into the symbol's record rather than aborting a batch.
#[derive(Error, Debug)]
pub enum FetchError {
    #[error("price unavailable for {symbol} after {attempts} attempts: {reason}")]
    PriceUnavailable {
        symbol: String,
        attempts: u32,
        reason: String,
    },

    #[error("no options data available for {symbol}")]
    NoOptionsData { symbol: String },

    #[error("provider returned no {what} for {symbol}")]
    EmptyResponse { symbol: String, what: &'static str },
}

/// Errors reading or writing snapshot files.
#[derive(Error, Debug)]
pub enum SnapshotError {
    #[error("snapshot {path} is missing column '{column}'", path = path.display())]
    StaleSnapshotUnreadable { path: PathBuf, column: &'static str },

    #[error("failed to read snapshot {path}: {reason}", path = path.display())]
    Unreadable { path: PathBuf, reason: String },

    #[error("failed to write spreadsheet: {0}")]
    Write(#[from] rust_xlsxwriter::XlsxError),
}

/// Errors reading portfolio exports.
#[derive(Error, Debug)]
pub enum PortfolioError {
    #[error("no portfolio.<YYYYMMDD>.csv file found in {dir}", dir = dir.display())]
    NoPortfolioFile { dir: PathBuf },

    #[error("portfolio row {row} is invalid: {reason}")]
    InvalidRow { row: usize, reason: String },
}

#[derive(Error, Debug)]
pub enum Error {
    #[error(transparent)]
    Config(#[from] ConfigError),

    #[error(transparent)]
    Domain(#[from] DomainError),

    #[error(transparent)]
    Fetch(#[from] FetchError),

    #[error(transparent)]
    Snapshot(#[from] SnapshotError),

    #[error(transparent)]
    Portfolio(#[from] PortfolioError),

    #[error("JSON parsing error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("parse error: {0}")]
    Parse(String),
}

pub type Result<T> = std::result::Result<T, Error>;

impl From<rust_xlsxwriter::XlsxError> for Error {
    fn from(err: rust_xlsxwriter::XlsxError) -> Self {
        Error::Snapshot(SnapshotError::Write(err))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn price_unavailable_names_symbol_and_attempts() {
        let err: Error = FetchError::PriceUnavailable {
            symbol: "AAA".into(),
            attempts: 3,
            reason: "timeout".into(),
        }
        .into();

        assert_eq!(
            err.to_string(),
            "price unavailable for AAA after 3 attempts: timeout"
        );
    }

    #[test]
    fn missing_column_names_file() {
        let err = SnapshotError::StaleSnapshotUnreadable {
            path: PathBuf::from("snap.xlsx"),
            column: "Ticker",
        };
        assert_eq!(err.to_string(), "snapshot snap.xlsx is missing column 'Ticker'");
    }
}
