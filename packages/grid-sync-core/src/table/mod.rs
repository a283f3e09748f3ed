//! Tabular snapshots and their transaction-local working copies.

mod snapshot;
mod working_copy;

pub use snapshot::Snapshot;
pub use working_copy::WorkingCopy;
