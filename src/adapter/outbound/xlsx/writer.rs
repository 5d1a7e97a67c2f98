//! Styled snapshot workbook with a live put/call ratio formula.

use std::cmp::Ordering;
use std::path::Path;

use rust_decimal::prelude::ToPrimitive;
use rust_decimal::Decimal;
use rust_xlsxwriter::{Format, Formula, Workbook, Worksheet, XlsxError};
use tracing::debug;

use super::columns::{self, HEADERS};
use crate::domain::TickerRecord;
use crate::error::Result;

const HEADER_ROW_HEIGHT: f64 = 32.0;
const COLUMN_WIDTH: f64 = 14.0;

/// Sort rows newest first; rows without a timestamp go last, ties by symbol.
pub fn presentation_order(records: &mut [TickerRecord]) {
    records.sort_by(|a, b| match (a.last_update, b.last_update) {
        (Some(x), Some(y)) => y.cmp(&x).then_with(|| a.symbol.cmp(&b.symbol)),
        (Some(_), None) => Ordering::Less,
        (None, Some(_)) => Ordering::Greater,
        (None, None) => a.symbol.cmp(&b.symbol),
    });
}

/// Writes comparison rows to a single-sheet `.xlsx` file.
#[derive(Debug, Clone)]
pub struct SpreadsheetWriter {
    sheet_name: String,
}

impl Default for SpreadsheetWriter {
    fn default() -> Self {
        Self::new("Comparison")
    }
}

impl SpreadsheetWriter {
    #[must_use]
    pub fn new(sheet_name: impl Into<String>) -> Self {
        Self {
            sheet_name: sheet_name.into(),
        }
    }

    /// Write `records` to `path` in presentation order.
    ///
    /// The header row is bold and wrapped and stays frozen while scrolling.
    /// The ratio column holds `=IFERROR(put/call,"")` with the computed ratio
    /// cached so readers that do not recalculate still see a value.
    ///
    /// # Errors
    ///
    /// Returns an error when the workbook cannot be built or saved.
    pub fn write(&self, records: &[TickerRecord], path: &Path) -> Result<()> {
        let mut rows = records.to_vec();
        presentation_order(&mut rows);

        let mut workbook = Workbook::new();
        let sheet = workbook.add_worksheet();
        sheet.set_name(&self.sheet_name)?;
        write_header(sheet)?;

        for (i, record) in rows.iter().enumerate() {
            let row = u32::try_from(i + 1).map_err(|_| XlsxError::RowColumnLimitError)?;
            write_record(sheet, row, record)?;
        }

        workbook.save(path)?;
        debug!(path = %path.display(), rows = rows.len(), "Snapshot written");
        Ok(())
    }
}

fn write_header(sheet: &mut Worksheet) -> std::result::Result<(), XlsxError> {
    let bold = Format::new().set_bold().set_text_wrap();
    for (col, header) in HEADERS.iter().enumerate() {
        let col = u16::try_from(col).map_err(|_| XlsxError::RowColumnLimitError)?;
        sheet.write_string_with_format(0, col, *header, &bold)?;
        sheet.set_column_width(col, COLUMN_WIDTH)?;
    }
    sheet.set_row_height(0, HEADER_ROW_HEIGHT)?;
    sheet.set_freeze_panes(1, 0)?;
    Ok(())
}

fn write_record(
    sheet: &mut Worksheet,
    row: u32,
    record: &TickerRecord,
) -> std::result::Result<(), XlsxError> {
    let mut put = |header: &str, value: Option<Decimal>| -> std::result::Result<(), XlsxError> {
        if let (Some(col), Some(value)) = (columns::index_of(header), value.and_then(|v| v.to_f64())) {
            sheet.write_number(row, col, value)?;
        }
        Ok(())
    };

    put(columns::CURRENT_PRICE, record.current_price)?;
    put(columns::DAY_CHANGE, record.day_change_pct)?;
    put(columns::MARKET_CAP, record.market_cap_trillions)?;
    put(columns::PE_RATIO, record.pe_ratio)?;
    put(columns::YOY_CHANGE, record.yoy_change_pct)?;
    put(columns::DIVIDEND_YIELD, record.dividend_yield)?;
    put(columns::ANALYST_TARGET, record.analyst_target)?;
    put(columns::PUT_PRICE, record.put_price_1y)?;
    put(columns::PUT_PREMIUM_YIELD, record.put_premium_yield)?;
    put(columns::CALL_YIELD_3M, record.call_yield_3m)?;
    put(columns::CALL_YIELD_6M, record.call_yield_6m)?;
    put(columns::CALL_YIELD_1Y, record.call_yield_1y)?;
    put(columns::CALL_PREMIUM_YIELD, record.call_premium_yield)?;
    put(columns::EXAMPLE_STRIKE, record.example_strike_6m)?;

    let mut text = |header: &str, value: Option<String>| -> std::result::Result<(), XlsxError> {
        if let (Some(col), Some(value)) = (columns::index_of(header), value) {
            sheet.write_string(row, col, value)?;
        }
        Ok(())
    };

    text(columns::TICKER, Some(record.symbol.clone()))?;
    text(
        columns::EX_DIVIDEND,
        record.ex_dividend_date.map(|d| d.format("%Y-%m-%d").to_string()),
    )?;
    text(columns::ERROR, record.error.clone())?;
    text(columns::LAST_UPDATE, record.last_update_text())?;

    if let Some(col) = columns::index_of(columns::PUT_CALL_RATIO) {
        let cached = record
            .put_call_ratio()
            .map(|ratio| ratio.round_dp(4).normalize().to_string())
            .unwrap_or_default();
        let formula = Formula::new(columns::ratio_formula(row + 1)).set_result(cached);
        sheet.write_formula(row, col, formula)?;
    }

    Ok(())
}
