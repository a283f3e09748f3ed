//! Snapshot bound to the remote grid region it mirrors.

use std::ops::Deref;

use crate::config::SyncConfig;
use crate::error::SheetError;
use crate::grid::RemoteGrid;
use crate::table::{Snapshot, WorkingCopy};
use crate::transaction::{SyncOutcome, UpdateTransaction};

/// A snapshot of one grid region together with the grid it syncs to.
///
/// Reads go straight to the snapshot through `Deref`. Writes go through
/// [`start_update`](Self::start_update) or [`update`](Self::update), which
/// keep the snapshot and the grid consistent.
#[derive(Debug)]
pub struct DataSheet<G: RemoteGrid> {
    /// Last successfully synced data
    snapshot: Snapshot,
    /// Grid region the snapshot mirrors
    grid: G,
    /// Address mapping and load options
    config: SyncConfig,
}

impl<G: RemoteGrid> DataSheet<G> {
    /// Binds an already loaded snapshot to its grid.
    pub fn new(grid: G, snapshot: Snapshot, config: SyncConfig) -> Result<Self, SheetError> {
        config.validate()?;
        snapshot.check_addressable(config.header_rows)?;
        Ok(Self {
            snapshot,
            grid,
            config,
        })
    }

    /// Builds the snapshot from grid text read from `grid`.
    ///
    /// # Arguments
    /// * `grid` - Grid the sheet will write to
    /// * `values` - Row-major grid text, header rows included
    /// * `config` - Address mapping and load options
    pub fn from_grid_values(
        grid: G,
        values: &[Vec<String>],
        config: SyncConfig,
    ) -> Result<Self, SheetError> {
        let snapshot = Snapshot::from_grid_values(values, &config)?;
        Self::new(grid, snapshot, config)
    }

    /// Returns the committed snapshot.
    pub fn snapshot(&self) -> &Snapshot {
        &self.snapshot
    }

    /// Returns an independent copy of the committed snapshot.
    pub fn copy(&self) -> Snapshot {
        self.snapshot.copy()
    }

    /// Returns the bound grid.
    pub fn grid(&self) -> &G {
        &self.grid
    }

    /// Returns the bound grid mutably.
    ///
    /// Writes made directly through the grid are not reflected in the snapshot.
    pub fn grid_mut(&mut self) -> &mut G {
        &mut self.grid
    }

    /// Returns the sheet configuration.
    pub fn config(&self) -> &SyncConfig {
        &self.config
    }

    /// Consumes the sheet, returning its snapshot and grid.
    pub fn into_parts(self) -> (Snapshot, G) {
        (self.snapshot, self.grid)
    }

    /// Opens an update transaction over this sheet.
    ///
    /// The transaction borrows the sheet mutably, so only one can be open
    /// at a time.
    pub fn start_update(&mut self) -> UpdateTransaction<'_, G> {
        UpdateTransaction::new(&mut self.snapshot, &mut self.grid, self.config.header_rows)
    }

    /// Runs `mutate` against a working copy and syncs the result.
    ///
    /// If `mutate` returns an error nothing is diffed, written or
    /// committed, and the error is returned unchanged. Otherwise the
    /// transaction is committed and its outcome returned; a failed grid
    /// write shows up as [`SyncOutcome::Failed`], not as an `Err`.
    pub fn update<F, E>(&mut self, mutate: F) -> Result<SyncOutcome, E>
    where
        F: FnOnce(&mut WorkingCopy) -> Result<(), E>,
    {
        let mut tx = self.start_update();
        mutate(tx.working_copy_mut())?;
        Ok(tx.commit())
    }
}

impl<G: RemoteGrid> Deref for DataSheet<G> {
    type Target = Snapshot;

    fn deref(&self) -> &Self::Target {
        &self.snapshot
    }
}
