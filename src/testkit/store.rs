//! In-memory [`SnapshotStore`].

use std::path::PathBuf;
use std::sync::Mutex;

use crate::domain::Snapshot;
use crate::error::{Result, SnapshotError};
use crate::port::outbound::store::SnapshotStore;

/// Holds an optional prior snapshot and records every save.
#[derive(Default)]
pub struct MemorySnapshotStore {
    prior: Option<Snapshot>,
    unreadable: bool,
    saved: Mutex<Vec<Snapshot>>,
}

impl MemorySnapshotStore {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn with_prior(mut self, snapshot: Snapshot) -> Self {
        self.prior = Some(snapshot);
        self
    }

    /// Loading the prior snapshot fails.
    #[must_use]
    pub fn unreadable(mut self) -> Self {
        self.unreadable = true;
        self
    }

    /// Snapshots saved so far, oldest first.
    pub fn saved(&self) -> Vec<Snapshot> {
        self.saved.lock().map(|s| s.clone()).unwrap_or_default()
    }
}

impl SnapshotStore for MemorySnapshotStore {
    fn latest(&self) -> Result<Option<Snapshot>> {
        if self.unreadable {
            return Err(SnapshotError::StaleSnapshotUnreadable {
                path: PathBuf::from("memory.xlsx"),
                column: "Ticker",
            }
            .into());
        }
        Ok(self.prior.clone())
    }

    fn save(&self, snapshot: &Snapshot) -> Result<PathBuf> {
        let mut saved = self
            .saved
            .lock()
            .map_err(|e| crate::error::Error::Parse(e.to_string()))?;
        saved.push(snapshot.clone());
        Ok(PathBuf::from(format!("memory-{}.xlsx", saved.len())))
    }
}
