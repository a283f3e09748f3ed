//! Transaction-local mutable copy of a snapshot.

use std::ops::Deref;

use crate::error::SheetError;
use crate::value::CellValue;

use super::snapshot::Snapshot;

/// Mutable duplicate of a [`Snapshot`] handed out by a transaction.
///
/// Reads go through `Deref<Target = Snapshot>`. Cell writes are picked up
/// by the diff; structural edits (adding, dropping or renaming columns,
/// appending or dropping rows) are allowed but never synced.
#[derive(Debug, Clone, PartialEq)]
pub struct WorkingCopy {
    data: Snapshot,
}

impl WorkingCopy {
    /// Creates a working copy holding an independent copy of `snapshot`.
    pub fn new(snapshot: &Snapshot) -> Self {
        Self {
            data: snapshot.copy(),
        }
    }

    /// Writes a single cell.
    pub fn set(
        &mut self,
        row: usize,
        column: &str,
        value: impl Into<CellValue>,
    ) -> Result<(), SheetError> {
        self.data.set_cell(row, column, value.into())?;
        Ok(())
    }

    /// Clears a single cell to `Empty`.
    pub fn clear(&mut self, row: usize, column: &str) -> Result<(), SheetError> {
        self.data.set_cell(row, column, CellValue::Empty)?;
        Ok(())
    }

    /// Merges non-missing values from `other` at matching row/column pairs.
    ///
    /// Rows and columns of `other` that this copy lacks are skipped, and
    /// missing values in `other` never overwrite. Returns the number of
    /// cells written.
    pub fn update(&mut self, other: &Snapshot) -> usize {
        let mut written = 0;
        for (row_id, values) in other.rows() {
            if !self.data.contains_row(row_id) {
                continue;
            }
            for (column, value) in other.columns().iter().zip(values) {
                if value.is_missing() || !self.data.contains_column(column) {
                    continue;
                }
                if self.data.set_cell(row_id, column, value.clone()).is_ok() {
                    written += 1;
                }
            }
        }
        written
    }

    /// Appends a column filled with `fill`.
    pub fn add_column(
        &mut self,
        name: impl Into<String>,
        fill: impl Into<CellValue>,
    ) -> Result<(), SheetError> {
        self.data.push_column(name.into(), fill.into())
    }

    /// Removes a column, returning its values in row order.
    pub fn drop_column(&mut self, column: &str) -> Result<Vec<CellValue>, SheetError> {
        self.data.remove_column(column)
    }

    /// Renames a column in place, keeping its position.
    pub fn rename_column(&mut self, from: &str, to: impl Into<String>) -> Result<(), SheetError> {
        self.data.rename_column(from, to.into())
    }

    /// Appends a row, returning its new identifier.
    pub fn append_row(&mut self, values: Vec<CellValue>) -> Result<usize, SheetError> {
        self.data.push_row(values)
    }

    /// Removes a row, returning its values.
    pub fn drop_row(&mut self, row: usize) -> Result<Vec<CellValue>, SheetError> {
        self.data.remove_row(row)
    }

    /// Returns the working data as a snapshot.
    pub fn as_snapshot(&self) -> &Snapshot {
        &self.data
    }

    /// Consumes the copy, returning the working data.
    pub fn into_snapshot(self) -> Snapshot {
        self.data
    }
}

impl Deref for WorkingCopy {
    type Target = Snapshot;

    fn deref(&self) -> &Self::Target {
        &self.data
    }
}

impl From<Snapshot> for WorkingCopy {
    fn from(data: Snapshot) -> Self {
        Self { data }
    }
}
