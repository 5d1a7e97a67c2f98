//! Persistence port for comparison snapshots.

use std::path::PathBuf;

use crate::domain::Snapshot;
use crate::error::Result;

/// Storage for snapshots. Saving never overwrites an earlier snapshot.
pub trait SnapshotStore: Send + Sync {
    /// Most recent snapshot, or `None` when there is none yet.
    fn latest(&self) -> Result<Option<Snapshot>>;

    /// Persist `snapshot` as a new entry and return where it went.
    fn save(&self, snapshot: &Snapshot) -> Result<PathBuf>;
}
