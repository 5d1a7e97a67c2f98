//! Load a snapshot workbook back into records.
//!
//! Columns are located by header text, so older files with a different
//! order or extra columns still load. A file without a `Ticker` column
//! cannot be merged and is rejected; a file without `Last Update` loads
//! with every row marked stale.

use std::collections::HashMap;
use std::path::Path;
use std::str::FromStr;

use calamine::{open_workbook_auto, Data, DataType, Reader};
use chrono::{NaiveDate, NaiveDateTime};
use rust_decimal::Decimal;
use tracing::debug;

use super::columns;
use crate::domain::record::parse_last_update;
use crate::domain::TickerRecord;
use crate::error::{Result, SnapshotError};

/// Read the first worksheet of `path`.
///
/// # Errors
///
/// [`SnapshotError::Unreadable`] when the file cannot be opened or has no
/// sheet, [`SnapshotError::StaleSnapshotUnreadable`] when the `Ticker`
/// header is missing.
pub fn read_snapshot(path: &Path) -> Result<Vec<TickerRecord>> {
    let unreadable = |reason: String| SnapshotError::Unreadable {
        path: path.to_path_buf(),
        reason,
    };

    let mut workbook = open_workbook_auto(path).map_err(|e| unreadable(e.to_string()))?;
    let range = workbook
        .worksheet_range_at(0)
        .ok_or_else(|| unreadable("workbook has no sheets".to_string()))?
        .map_err(|e| unreadable(e.to_string()))?;

    let mut rows = range.rows();
    let header: HashMap<String, usize> = rows
        .next()
        .map(|cells| {
            cells
                .iter()
                .enumerate()
                .filter_map(|(i, cell)| text(cell).map(|name| (name, i)))
                .collect()
        })
        .unwrap_or_default();

    if !header.contains_key(columns::TICKER) {
        return Err(SnapshotError::StaleSnapshotUnreadable {
            path: path.to_path_buf(),
            column: columns::TICKER,
        }
        .into());
    }

    let sheet = Sheet { header };
    let records: Vec<TickerRecord> = rows.filter_map(|cells| sheet.record(cells)).collect();
    debug!(path = %path.display(), rows = records.len(), "Snapshot read");
    Ok(records)
}

struct Sheet {
    header: HashMap<String, usize>,
}

impl Sheet {
    fn cell<'a>(&self, cells: &'a [Data], name: &str) -> Option<&'a Data> {
        self.header.get(name).and_then(|i| cells.get(*i))
    }

    fn decimal(&self, cells: &[Data], name: &str) -> Option<Decimal> {
        self.cell(cells, name).and_then(decimal)
    }

    fn text(&self, cells: &[Data], name: &str) -> Option<String> {
        self.cell(cells, name).and_then(text)
    }

    fn record(&self, cells: &[Data]) -> Option<TickerRecord> {
        let symbol = self.text(cells, columns::TICKER)?;

        Some(TickerRecord {
            symbol,
            current_price: self.decimal(cells, columns::CURRENT_PRICE),
            day_change_pct: self.decimal(cells, columns::DAY_CHANGE),
            market_cap_trillions: self.decimal(cells, columns::MARKET_CAP),
            pe_ratio: self.decimal(cells, columns::PE_RATIO),
            yoy_change_pct: self.decimal(cells, columns::YOY_CHANGE),
            ex_dividend_date: self.cell(cells, columns::EX_DIVIDEND).and_then(date),
            dividend_yield: self.decimal(cells, columns::DIVIDEND_YIELD),
            analyst_target: self.decimal(cells, columns::ANALYST_TARGET),
            put_price_1y: self.decimal(cells, columns::PUT_PRICE),
            put_premium_yield: self.decimal(cells, columns::PUT_PREMIUM_YIELD),
            call_yield_3m: self.decimal(cells, columns::CALL_YIELD_3M),
            call_yield_6m: self.decimal(cells, columns::CALL_YIELD_6M),
            call_yield_1y: self.decimal(cells, columns::CALL_YIELD_1Y),
            call_premium_yield: self.decimal(cells, columns::CALL_PREMIUM_YIELD),
            example_strike_6m: self.decimal(cells, columns::EXAMPLE_STRIKE),
            error: self.text(cells, columns::ERROR),
            last_update: self.cell(cells, columns::LAST_UPDATE).and_then(timestamp),
        })
    }
}

/// Non-empty trimmed text of a cell.
fn text(cell: &Data) -> Option<String> {
    let value = match cell {
        Data::String(s) | Data::DateTimeIso(s) => s.trim().to_string(),
        Data::Int(i) => i.to_string(),
        Data::Float(f) => f.to_string(),
        Data::Bool(b) => b.to_string(),
        _ => return None,
    };
    (!value.is_empty()).then_some(value)
}

/// Numeric cell, or text such as `"1.25%"` or `"3.4"`.
fn decimal(cell: &Data) -> Option<Decimal> {
    match cell {
        Data::Float(f) if f.is_finite() => Decimal::try_from(*f).ok(),
        Data::Int(i) => Some(Decimal::from(*i)),
        Data::String(s) => {
            let trimmed = s.trim().trim_end_matches('%').trim();
            Decimal::from_str(trimmed).ok()
        }
        _ => None,
    }
}

fn date(cell: &Data) -> Option<NaiveDate> {
    match cell {
        Data::String(s) | Data::DateTimeIso(s) => {
            let s = s.trim();
            NaiveDate::parse_from_str(s, "%Y-%m-%d")
                .ok()
                .or_else(|| parse_last_update(s).map(|ts| ts.date()))
        }
        Data::DateTime(_) => cell.as_date(),
        _ => None,
    }
}

fn timestamp(cell: &Data) -> Option<NaiveDateTime> {
    match cell {
        Data::String(s) | Data::DateTimeIso(s) => parse_last_update(s),
        Data::DateTime(_) => cell.as_datetime(),
        _ => None,
    }
}
