//! Cell-level diff-and-sync engine for spreadsheet-backed tables.
//!
//! Provides tabular snapshots, transaction-local working copies,
//! A1 address translation, change detection, and all-or-nothing
//! batch sync against a remote grid.

pub mod address;
pub mod config;
pub mod error;
pub mod grid;
pub mod sheet;
pub mod table;
pub mod transaction;
pub mod value;

pub use address::CellAddress;
pub use config::SyncConfig;
pub use error::{GridError, SheetError};
pub use grid::{RemoteGrid, ValueInputOption, ValueRange};
pub use sheet::DataSheet;
pub use table::{Snapshot, WorkingCopy};
pub use transaction::{CellChange, SyncOutcome, UpdateTransaction};
pub use value::CellValue;
