//! Directory of timestamped snapshot workbooks.

use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use chrono::NaiveDateTime;
use tracing::{debug, info};

use super::reader::read_snapshot;
use super::writer::SpreadsheetWriter;
use crate::domain::snapshot::parse_snapshot_file_name;
use crate::domain::Snapshot;
use crate::error::Result;
use crate::port::outbound::store::SnapshotStore;

/// Snapshots stored as `<dir>/<prefix><YYYYmmdd_HHMMSS>.xlsx`.
///
/// The newest file is found by the timestamp in its name, not by
/// modification time. Files are never overwritten.
#[derive(Debug, Clone)]
pub struct XlsxSnapshotStore {
    dir: PathBuf,
    prefix: String,
    writer: SpreadsheetWriter,
}

impl XlsxSnapshotStore {
    #[must_use]
    pub fn new(dir: impl Into<PathBuf>, prefix: impl Into<String>) -> Self {
        Self {
            dir: dir.into(),
            prefix: prefix.into(),
            writer: SpreadsheetWriter::default(),
        }
    }

    #[must_use]
    pub fn dir(&self) -> &Path {
        &self.dir
    }

    /// Path and timestamp of the newest snapshot file, if any.
    ///
    /// # Errors
    ///
    /// Returns an error when the directory exists but cannot be listed.
    pub fn latest_path(&self) -> Result<Option<(PathBuf, NaiveDateTime)>> {
        let entries = match fs::read_dir(&self.dir) {
            Ok(entries) => entries,
            Err(err) if err.kind() == io::ErrorKind::NotFound => return Ok(None),
            Err(err) => return Err(err.into()),
        };

        let mut latest: Option<(PathBuf, NaiveDateTime)> = None;
        for entry in entries {
            let entry = entry?;
            let name = entry.file_name();
            let Some(taken_at) = name
                .to_str()
                .and_then(|name| parse_snapshot_file_name(&self.prefix, name))
            else {
                continue;
            };
            if latest.as_ref().map_or(true, |(_, best)| taken_at > *best) {
                latest = Some((entry.path(), taken_at));
            }
        }
        Ok(latest)
    }
}

impl SnapshotStore for XlsxSnapshotStore {
    fn latest(&self) -> Result<Option<Snapshot>> {
        let Some((path, taken_at)) = self.latest_path()? else {
            debug!(dir = %self.dir.display(), "No prior snapshot");
            return Ok(None);
        };
        let records = read_snapshot(&path)?;
        info!(path = %path.display(), rows = records.len(), "Loaded prior snapshot");
        Ok(Some(Snapshot {
            taken_at,
            records,
            source: Some(path),
        }))
    }

    fn save(&self, snapshot: &Snapshot) -> Result<PathBuf> {
        fs::create_dir_all(&self.dir)?;
        let path = self.dir.join(snapshot.file_name(&self.prefix));
        if path.exists() {
            return Err(io::Error::new(
                io::ErrorKind::AlreadyExists,
                format!("snapshot {} already exists", path.display()),
            )
            .into());
        }
        self.writer.write(&snapshot.records, &path)?;
        info!(path = %path.display(), rows = snapshot.len(), "Saved snapshot");
        Ok(path)
    }
}
