//! Spreadsheet snapshots: writing, reading and locating the latest file.

pub mod columns;
pub mod reader;
pub mod store;
pub mod writer;

pub use reader::read_snapshot;
pub use store::XlsxSnapshotStore;
pub use writer::{presentation_order, SpreadsheetWriter};
