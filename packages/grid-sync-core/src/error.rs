//! Error types for local sheet operations and remote grid writes.

use thiserror::Error;

/// Errors raised by snapshot, working copy and configuration operations.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum SheetError {
    /// Column not found in the sheet
    #[error("Column '{column}' not found")]
    ColumnNotFound { column: String },

    /// Row identifier not present in the index
    #[error("Row {row} not found")]
    RowNotFound { row: usize },

    /// Column name declared more than once
    #[error("Column '{column}' already exists")]
    DuplicateColumn { column: String },

    /// Header cell without a name
    #[error("Column at position {position} has an empty name")]
    EmptyColumnName { position: usize },

    /// Row width does not match the column count
    #[error("Row {row} has {got} values, expected {expected}")]
    RowLengthMismatch {
        row: usize,
        expected: usize,
        got: usize,
    },

    /// Row identifier declared more than once
    #[error("Row {row} already exists")]
    DuplicateRow { row: usize },

    /// Row identifier past the last addressable grid row
    #[error("Row {row} cannot be addressed on the grid")]
    RowOutOfRange { row: usize },

    /// Invalid A1 address text
    #[error("Invalid cell address '{0}'")]
    InvalidAddress(String),

    /// Configuration error
    #[error("Configuration error: {0}")]
    Config(String),
}

/// Failures reported by a [`RemoteGrid`](crate::grid::RemoteGrid) batch write.
///
/// The sync engine treats every variant the same way: the transaction is
/// reported as failed and the local snapshot is left untouched.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum GridError {
    /// Backend quota exhausted
    #[error("Rate limited: {0}")]
    RateLimited(String),

    /// Transport failure talking to the backend
    #[error("Network error: {0}")]
    Network(String),

    /// Backend rejected a range
    #[error("Invalid range '{0}'")]
    InvalidRange(String),

    /// Any other backend-side failure
    #[error("{0}")]
    Backend(String),

    /// I/O error on a file-backed grid
    #[error("I/O error: {0}")]
    Io(String),
}
