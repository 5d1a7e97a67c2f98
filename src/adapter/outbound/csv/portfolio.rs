//! Broker portfolio exports: `portfolio.<YYYYMMDD>.csv`.
//!
//! The export wraps the position table in a title line above the header and
//! a few summary lines below the last position; both are skipped by count.

use std::fs;
use std::path::{Path, PathBuf};
use std::str::FromStr;

use chrono::NaiveDate;
use rust_decimal::prelude::ToPrimitive;
use rust_decimal::Decimal;
use serde::Deserialize;
use tracing::debug;

use crate::domain::portfolio::{Position, SecurityType};
use crate::error::{PortfolioError, Result};

const FILE_PREFIX: &str = "portfolio.";
const FILE_SUFFIX: &str = ".csv";
const DATE_FORMAT: &str = "%Y%m%d";

/// Date embedded in a portfolio export filename.
#[must_use]
pub fn parse_portfolio_file_name(name: &str) -> Option<NaiveDate> {
    let stamp = name.strip_prefix(FILE_PREFIX)?.strip_suffix(FILE_SUFFIX)?;
    NaiveDate::parse_from_str(stamp, DATE_FORMAT).ok()
}

/// Newest export in `dir` by filename date.
///
/// # Errors
///
/// [`PortfolioError::NoPortfolioFile`] when `dir` has no matching file.
pub fn latest_portfolio_file(dir: &Path) -> Result<(PathBuf, NaiveDate)> {
    let no_file = || PortfolioError::NoPortfolioFile {
        dir: dir.to_path_buf(),
    };
    let entries = fs::read_dir(dir).map_err(|_| no_file())?;

    let mut latest: Option<(PathBuf, NaiveDate)> = None;
    for entry in entries {
        let entry = entry?;
        let Some(date) = entry
            .file_name()
            .to_str()
            .and_then(parse_portfolio_file_name)
        else {
            continue;
        };
        if latest.as_ref().map_or(true, |(_, best)| date > *best) {
            latest = Some((entry.path(), date));
        }
    }
    latest.ok_or_else(|| no_file().into())
}

#[derive(Debug, Deserialize)]
struct PortfolioRow {
    #[serde(rename = "Security Type")]
    security_type: String,
    #[serde(rename = "Financial Instrument Description")]
    description: String,
    #[serde(rename = "Position", default)]
    position: Option<String>,
    #[serde(rename = "Market Price", default)]
    market_price: Option<String>,
    #[serde(rename = "Expiration", default)]
    expiration: Option<String>,
    #[serde(rename = "Strike", default)]
    strike: Option<String>,
    #[serde(rename = "Volume", default)]
    volume: Option<String>,
}

/// Read positions from an export, skipping `skip_header` leading lines and
/// `skip_footer` trailing lines around the table.
///
/// # Errors
///
/// Returns an error when the file cannot be read, the table is malformed,
/// or a row has no parsable position size.
pub fn read_positions(path: &Path, skip_header: usize, skip_footer: usize) -> Result<Vec<Position>> {
    let content = fs::read_to_string(path)?;
    let lines: Vec<&str> = content.trim_start_matches('\u{feff}').lines().collect();
    if lines.len() <= skip_header + skip_footer {
        return Ok(Vec::new());
    }
    let table = lines[skip_header..lines.len() - skip_footer].join("\n");

    let mut reader = csv::ReaderBuilder::new()
        .flexible(true)
        .trim(csv::Trim::All)
        .from_reader(table.as_bytes());

    let mut positions = Vec::new();
    for (i, row) in reader.deserialize::<PortfolioRow>().enumerate() {
        // Header line is skip_header + 1; data starts on the line after it.
        let line = skip_header + i + 2;
        let row = row?;
        positions.push(to_position(row, line)?);
    }
    debug!(path = %path.display(), count = positions.len(), "Read portfolio positions");
    Ok(positions)
}

fn to_position(row: PortfolioRow, line: usize) -> Result<Position> {
    let quantity = row
        .position
        .as_deref()
        .and_then(parse_number)
        .ok_or_else(|| PortfolioError::InvalidRow {
            row: line,
            reason: format!("unparsable position {:?}", row.position.unwrap_or_default()),
        })?;

    Ok(Position {
        security_type: SecurityType::from_code(&row.security_type),
        description: row.description,
        quantity,
        market_price: row.market_price.as_deref().and_then(parse_number),
        expiration: row.expiration.as_deref().and_then(parse_date),
        strike: row.strike.as_deref().and_then(parse_number),
        volume: row
            .volume
            .as_deref()
            .and_then(parse_number)
            .and_then(|v| v.trunc().to_u64()),
    })
}

/// Number with optional thousands separators, currency sign or parentheses
/// for negatives.
fn parse_number(text: &str) -> Option<Decimal> {
    let text = text.trim();
    if text.is_empty() || text == "-" {
        return None;
    }
    let (negative, text) = match text.strip_prefix('(').and_then(|t| t.strip_suffix(')')) {
        Some(inner) => (true, inner),
        None => (false, text),
    };
    let cleaned: String = text.chars().filter(|c| !matches!(c, ',' | '$')).collect();
    let value = Decimal::from_str(&cleaned).ok()?;
    Some(if negative { -value } else { value })
}

fn parse_date(text: &str) -> Option<NaiveDate> {
    let text = text.trim();
    ["%Y-%m-%d", "%Y%m%d", "%m/%d/%Y", "%b %d %Y", "%d %b %Y"]
        .iter()
        .find_map(|format| NaiveDate::parse_from_str(text, format).ok())
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    const EXPORT: &str = "\
Portfolio,Account U123
Security Type,Financial Instrument Description,Position,Market Price,Expiration,Strike,Volume
STK,AAPL,200,190.50,,,
OPT,AAPL Jan17'25 200 CALL,-1,3.10,2025-01-17,200,1234
STK,MSFT,\"1,000\",410.00,,,
Totals,,,,,,
Cash,,,,,,
Net Liquidation,,,,,,
Margin,,,,,,
Generated,,,,,,
";

    #[test]
    fn export_rows_between_header_and_footer() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("portfolio.20250102.csv");
        fs::write(&path, EXPORT).unwrap();

        let positions = read_positions(&path, 1, 5).unwrap();

        assert_eq!(positions.len(), 3);
        assert!(positions[0].is_stock());
        assert_eq!(positions[0].quantity, dec!(200));
        assert!(positions[1].is_option());
        assert_eq!(positions[1].underlying(), "AAPL");
        assert_eq!(positions[1].quantity, dec!(-1));
        assert_eq!(positions[1].strike, Some(dec!(200)));
        assert_eq!(positions[1].volume, Some(1234));
        assert_eq!(positions[1].expiration, NaiveDate::from_ymd_opt(2025, 1, 17));
        assert_eq!(positions[2].quantity, dec!(1000));
    }

    #[test]
    fn byte_order_mark_before_header_is_ignored() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("portfolio.20250102.csv");
        let body = "\u{feff}Security Type,Financial Instrument Description,Position,Market Price,Expiration,Strike,Volume\nSTK,AAPL,200,190.50,,,\n";
        fs::write(&path, body).unwrap();

        let positions = read_positions(&path, 0, 0).unwrap();

        assert_eq!(positions.len(), 1);
        assert!(positions[0].is_stock());
        assert_eq!(positions[0].description, "AAPL");
    }

    #[test]
    fn latest_file_by_name_date() {
        let dir = tempfile::tempdir().unwrap();
        for name in [
            "portfolio.20250102.csv",
            "portfolio.20250315.csv",
            "portfolio.latest.csv",
            "recommendations.20251231.csv",
        ] {
            fs::write(dir.path().join(name), "").unwrap();
        }

        let (path, date) = latest_portfolio_file(dir.path()).unwrap();
        assert!(path.ends_with("portfolio.20250315.csv"));
        assert_eq!(date, NaiveDate::from_ymd_opt(2025, 3, 15).unwrap());
    }

    #[test]
    fn empty_directory_has_no_portfolio() {
        let dir = tempfile::tempdir().unwrap();
        let err = latest_portfolio_file(dir.path()).unwrap_err();
        assert!(err.to_string().contains("no portfolio"));
    }

    #[test]
    fn numbers_accept_broker_formatting() {
        assert_eq!(parse_number("1,250"), Some(dec!(1250)));
        assert_eq!(parse_number("(2)"), Some(dec!(-2)));
        assert_eq!(parse_number("$3.50"), Some(dec!(3.50)));
        assert_eq!(parse_number(""), None);
    }
}
