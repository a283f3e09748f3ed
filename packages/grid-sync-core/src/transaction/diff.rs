//! Cell-level change detection between two snapshots.

use crate::address::CellAddress;
use crate::table::Snapshot;

use super::change::CellChange;

/// Columns that differ in shape between a snapshot and its working copy.
///
/// These are never synced; the diff only covers columns both sides share.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ShapeDrift {
    /// Columns present only in the working copy
    pub added: Vec<String>,
    /// Columns of the original absent from the working copy
    pub removed: Vec<String>,
}

impl ShapeDrift {
    /// Returns `true` if both sides share the same column set.
    pub fn is_empty(&self) -> bool {
        self.added.is_empty() && self.removed.is_empty()
    }
}

/// Computes the cell changes that turn `original` into `working`.
///
/// Only (row, column) pairs present in both snapshots are compared, and
/// only columns of `original` are considered. Two missing values never
/// count as a change; every other inequality does. Addresses use the
/// column ordinal of `original`. Rows whose grid row would overflow are
/// skipped with a warning.
///
/// # Arguments
/// * `original` - The committed snapshot
/// * `working` - The mutated working data
/// * `header_rows` - Rows above the first data row on the grid
pub fn calculate_updates(
    original: &Snapshot,
    working: &Snapshot,
    header_rows: usize,
) -> Vec<CellChange> {
    let shared_columns: Vec<(usize, &String)> = original
        .columns()
        .iter()
        .enumerate()
        .filter(|(_, column)| working.contains_column(column))
        .collect();

    let mut changes = Vec::new();
    for (position, (row_id, values)) in original.rows().enumerate() {
        let Ok(working_values) = working.row(row_id) else {
            continue;
        };
        let Some(origin) = CellAddress::for_cell(row_id, 0, header_rows) else {
            tracing::warn!(
                "Row {} cannot be addressed below {} header rows; skipping",
                row_id,
                header_rows
            );
            continue;
        };
        for &(ordinal, column) in &shared_columns {
            let Some(working_ordinal) = working.column_ordinal(column) else {
                continue;
            };
            let new_value = &working_values[working_ordinal];
            if values[ordinal] != *new_value {
                changes.push(CellChange {
                    row: row_id,
                    column: column.clone(),
                    address: CellAddress::new(origin.row, ordinal),
                    value: new_value.clone(),
                    position,
                });
            }
        }
    }
    changes
}

/// Lists column-set differences the diff ignores.
pub fn shape_drift(original: &Snapshot, working: &Snapshot) -> ShapeDrift {
    ShapeDrift {
        added: working
            .columns()
            .iter()
            .filter(|column| !original.contains_column(column))
            .cloned()
            .collect(),
        removed: original
            .columns()
            .iter()
            .filter(|column| !working.contains_column(column))
            .cloned()
            .collect(),
    }
}
