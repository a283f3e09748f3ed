//! In-memory grid that records every batch it receives.

use std::collections::BTreeMap;

use serde_json::Value as JsonValue;

use crate::address::CellAddress;
use crate::error::GridError;

use super::{RemoteGrid, ValueInputOption, ValueRange};

/// A recorded `batch_update` call.
#[derive(Debug, Clone, PartialEq)]
pub struct BatchCall {
    /// Ranges submitted in the call
    pub data: Vec<ValueRange>,
    /// Input option the call was made with
    pub input: ValueInputOption,
}

/// Grid kept in memory, keyed by cell address.
///
/// Every call is recorded, including failed ones. A failure can be armed
/// with [`fail_next`](Self::fail_next) to exercise sync-failure paths.
#[derive(Debug, Default)]
pub struct InMemoryGrid {
    cells: BTreeMap<CellAddress, JsonValue>,
    calls: Vec<BatchCall>,
    pending_failure: Option<GridError>,
}

impl InMemoryGrid {
    /// Creates an empty grid.
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a grid pre-filled from row-major text, starting at `A1`.
    pub fn with_values(values: &[Vec<String>]) -> Self {
        let mut grid = Self::new();
        for (row, cells) in values.iter().enumerate() {
            for (column, text) in cells.iter().enumerate() {
                if !text.is_empty() {
                    grid.cells.insert(
                        CellAddress::new(row, column),
                        JsonValue::String(text.clone()),
                    );
                }
            }
        }
        grid
    }

    /// Makes the next `batch_update` call fail with `error`.
    pub fn fail_next(&mut self, error: GridError) {
        self.pending_failure = Some(error);
    }

    /// Returns every recorded call, oldest first.
    pub fn calls(&self) -> &[BatchCall] {
        &self.calls
    }

    /// Returns the number of recorded calls.
    pub fn call_count(&self) -> usize {
        self.calls.len()
    }

    /// Returns the value stored at an A1 address.
    pub fn cell(&self, address: &str) -> Option<&JsonValue> {
        CellAddress::parse(address)
            .ok()
            .and_then(|address| self.cells.get(&address))
    }
}

impl RemoteGrid for InMemoryGrid {
    fn batch_update(
        &mut self,
        data: &[ValueRange],
        input: ValueInputOption,
    ) -> Result<(), GridError> {
        self.calls.push(BatchCall {
            data: data.to_vec(),
            input,
        });

        if let Some(error) = self.pending_failure.take() {
            return Err(error);
        }

        // Validate the whole batch before writing any of it
        let mut writes = Vec::with_capacity(data.len());
        for value_range in data {
            let origin = CellAddress::parse(&value_range.range)
                .map_err(|_| GridError::InvalidRange(value_range.range.clone()))?;
            for (row_offset, row) in value_range.values.iter().enumerate() {
                for (column_offset, value) in row.iter().enumerate() {
                    let address =
                        CellAddress::new(origin.row + row_offset, origin.column + column_offset);
                    writes.push((address, value.clone()));
                }
            }
        }

        for (address, value) in writes {
            if value.as_str() == Some("") {
                self.cells.remove(&address);
            } else {
                self.cells.insert(address, value);
            }
        }
        Ok(())
    }
}
