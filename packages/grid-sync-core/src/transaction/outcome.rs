use crate::error::GridError;

use super::change::CellChange;

/// Result of committing an update transaction.
///
/// Remote failures are reported here rather than as an `Err`: the
/// transaction is fail-soft, and the snapshot is left as it was.
#[derive(Debug, Clone, PartialEq)]
pub enum SyncOutcome {
    /// The working copy matched the snapshot; nothing was sent
    Unchanged,
    /// The batch was written and the snapshot now holds the changes
    Applied {
        /// Changes written, in row then column order
        changes: Vec<CellChange>,
    },
    /// The batch write failed; the snapshot is unchanged
    Failed {
        /// Error reported by the grid
        error: GridError,
        /// Changes that were submitted and not applied
        attempted: Vec<CellChange>,
    },
}

impl SyncOutcome {
    /// Returns `true` if the snapshot and grid agree after the transaction.
    pub fn is_synced(&self) -> bool {
        !self.is_failed()
    }

    /// Returns `true` if the batch write failed.
    pub fn is_failed(&self) -> bool {
        matches!(self, SyncOutcome::Failed { .. })
    }

    /// Returns the changes that were applied or attempted.
    pub fn changes(&self) -> &[CellChange] {
        match self {
            SyncOutcome::Unchanged => &[],
            SyncOutcome::Applied { changes } => changes,
            SyncOutcome::Failed { attempted, .. } => attempted,
        }
    }

    /// Returns the grid error of a failed sync.
    pub fn error(&self) -> Option<&GridError> {
        match self {
            SyncOutcome::Failed { error, .. } => Some(error),
            _ => None,
        }
    }
}
