use std::ops::{Deref, DerefMut};

use crate::grid::{RemoteGrid, ValueInputOption, ValueRange};
use crate::table::{Snapshot, WorkingCopy};

use super::change::CellChange;
use super::diff::{self, ShapeDrift};
use super::outcome::SyncOutcome;

/// Scoped update of a snapshot, synced to its grid on commit.
///
/// The transaction hands out a [`WorkingCopy`] (through `Deref`/`DerefMut`)
/// that the caller mutates freely. On [`commit`](Self::commit) the cell
/// changes are sent to the grid as one batch, and only if that write
/// succeeds are they applied to the snapshot. Dropping the transaction
/// without committing discards the working copy.
#[derive(Debug)]
pub struct UpdateTransaction<'a, G: RemoteGrid + ?Sized> {
    /// Committed data the working copy was taken from
    snapshot: &'a mut Snapshot,
    /// Grid the snapshot mirrors
    grid: &'a mut G,
    /// Rows above the first data row on the grid
    header_rows: usize,
    /// Transaction-local data
    working: WorkingCopy,
    /// Set by commit and abort so drop stays quiet
    finished: bool,
}

impl<'a, G: RemoteGrid + ?Sized> UpdateTransaction<'a, G> {
    /// Opens a transaction over `snapshot`, taking a working copy.
    pub fn new(snapshot: &'a mut Snapshot, grid: &'a mut G, header_rows: usize) -> Self {
        let working = WorkingCopy::new(snapshot);
        Self {
            snapshot,
            grid,
            header_rows,
            working,
            finished: false,
        }
    }

    /// Returns the working copy.
    pub fn working_copy(&self) -> &WorkingCopy {
        &self.working
    }

    /// Returns the working copy for mutation.
    pub fn working_copy_mut(&mut self) -> &mut WorkingCopy {
        &mut self.working
    }

    /// Returns the committed snapshot the working copy was taken from.
    pub fn original(&self) -> &Snapshot {
        &*self.snapshot
    }

    /// Computes the cell changes the working copy currently holds.
    pub fn pending_changes(&self) -> Vec<CellChange> {
        diff::calculate_updates(&*self.snapshot, &self.working, self.header_rows)
    }

    /// Builds the batch that commit would submit.
    pub fn pending_batch(&self) -> Vec<ValueRange> {
        self.pending_changes()
            .iter()
            .map(CellChange::to_value_range)
            .collect()
    }

    /// Reports column-set edits in the working copy; these are not synced.
    pub fn shape_drift(&self) -> ShapeDrift {
        diff::shape_drift(&*self.snapshot, &self.working)
    }

    /// Commits the transaction.
    ///
    /// Sends every pending change to the grid in one batch with
    /// user-entered semantics. On success the changed values are applied
    /// to the snapshot; on failure the error is logged and returned in the
    /// outcome, and the snapshot is left untouched.
    pub fn commit(mut self) -> SyncOutcome {
        self.finished = true;

        let drift = self.shape_drift();
        if !drift.is_empty() {
            tracing::warn!(
                "Structural edits are not synced (added: {:?}, removed: {:?})",
                drift.added,
                drift.removed
            );
        }

        let changes = self.pending_changes();
        if changes.is_empty() {
            tracing::debug!("No cell changes to sync");
            return SyncOutcome::Unchanged;
        }

        // Stage the new values so the swap after the write cannot fail halfway
        let mut staged = self.snapshot.copy();
        for change in &changes {
            staged.set_at(change.position, change.address.column, change.value.clone());
        }

        let batch: Vec<ValueRange> = changes.iter().map(CellChange::to_value_range).collect();
        match self
            .grid
            .batch_update(&batch, ValueInputOption::UserEntered)
        {
            Ok(()) => {
                *self.snapshot = staged;
                tracing::debug!("Synced {} cell changes", changes.len());
                SyncOutcome::Applied { changes }
            }
            Err(error) => {
                tracing::error!("Error during sheet update: {}", error);
                SyncOutcome::Failed {
                    error,
                    attempted: changes,
                }
            }
        }
    }

    /// Aborts the transaction, discarding the working copy.
    pub fn abort(mut self) {
        self.finished = true;
        tracing::debug!("Update transaction aborted");
    }
}

impl<G: RemoteGrid + ?Sized> Deref for UpdateTransaction<'_, G> {
    type Target = WorkingCopy;

    fn deref(&self) -> &Self::Target {
        &self.working
    }
}

impl<G: RemoteGrid + ?Sized> DerefMut for UpdateTransaction<'_, G> {
    fn deref_mut(&mut self) -> &mut Self::Target {
        &mut self.working
    }
}

impl<G: RemoteGrid + ?Sized> Drop for UpdateTransaction<'_, G> {
    fn drop(&mut self) {
        if !self.finished {
            tracing::debug!("Update transaction dropped without commit; discarding working copy");
        }
    }
}
