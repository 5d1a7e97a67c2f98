//! Snapshots: the persisted table of ticker records.

use std::path::PathBuf;

use chrono::NaiveDateTime;

use super::record::TickerRecord;

/// Timestamp format embedded in snapshot filenames.
pub const FILENAME_TIMESTAMP_FORMAT: &str = "%Y%m%d_%H%M%S";

/// An ordered table of records plus the time it was taken.
///
/// Snapshots are append-only by filename: saving always produces a new file
/// named after `taken_at`, and a loaded snapshot's file is never rewritten.
#[derive(Debug, Clone, PartialEq)]
pub struct Snapshot {
    pub taken_at: NaiveDateTime,
    pub records: Vec<TickerRecord>,
    /// File the snapshot was loaded from, if any.
    pub source: Option<PathBuf>,
}

impl Snapshot {
    #[must_use]
    pub fn new(taken_at: NaiveDateTime, records: Vec<TickerRecord>) -> Self {
        Self {
            taken_at,
            records,
            source: None,
        }
    }

    /// Find the record for `symbol`.
    #[must_use]
    pub fn get(&self, symbol: &str) -> Option<&TickerRecord> {
        self.records.iter().find(|record| record.symbol == symbol)
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.records.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// Filename for this snapshot: `<prefix><YYYYmmdd_HHMMSS>.xlsx`.
    #[must_use]
    pub fn file_name(&self, prefix: &str) -> String {
        snapshot_file_name(prefix, self.taken_at)
    }
}

/// Filename for a snapshot taken at `taken_at`.
#[must_use]
pub fn snapshot_file_name(prefix: &str, taken_at: NaiveDateTime) -> String {
    format!("{prefix}{}.xlsx", taken_at.format(FILENAME_TIMESTAMP_FORMAT))
}

/// Recover the timestamp from a snapshot filename, if it matches `prefix`.
#[must_use]
pub fn parse_snapshot_file_name(prefix: &str, file_name: &str) -> Option<NaiveDateTime> {
    let stamp = file_name.strip_prefix(prefix)?.strip_suffix(".xlsx")?;
    NaiveDateTime::parse_from_str(stamp, FILENAME_TIMESTAMP_FORMAT).ok()
}
