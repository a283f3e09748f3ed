//! Immutable-by-convention tabular snapshot.
//!
//! A snapshot holds:
//! - Column names in declared order (unique)
//! - Row identifiers in row order (stable, not positional)
//! - One cell value per (row, column) pair

use std::collections::{HashMap, HashSet};

use crate::address::CellAddress;
use crate::config::SyncConfig;
use crate::error::SheetError;
use crate::value::CellValue;

/// In-memory tabular data mirroring one grid region.
///
/// The public API is read-only. Cell values only change through
/// [`WorkingCopy`](super::WorkingCopy) mutation or a committed transaction.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Snapshot {
    /// Column names in declared order
    columns: Vec<String>,
    /// Column name to ordinal
    column_positions: HashMap<String, usize>,
    /// Row identifiers in row order
    index: Vec<usize>,
    /// Row identifier to position in `cells`
    row_positions: HashMap<usize, usize>,
    /// Row-major cell values
    cells: Vec<Vec<CellValue>>,
    /// Identifier for the next appended row; only ever grows, so ids are never reused
    next_row_id: usize,
}

impl Snapshot {
    /// Creates a snapshot with row identifiers `0..rows.len()`.
    ///
    /// # Arguments
    /// * `columns` - Column names in declared order
    /// * `rows` - Row values, each exactly `columns.len()` wide
    pub fn new<C>(columns: Vec<C>, rows: Vec<Vec<CellValue>>) -> Result<Self, SheetError>
    where
        C: Into<String>,
    {
        let index = (0..rows.len()).collect();
        Self::with_index(columns, index, rows)
    }

    /// Creates a snapshot with explicit row identifiers.
    ///
    /// # Arguments
    /// * `columns` - Column names in declared order
    /// * `index` - Row identifiers, one per row, unique
    /// * `rows` - Row values, each exactly `columns.len()` wide
    pub fn with_index<C>(
        columns: Vec<C>,
        index: Vec<usize>,
        rows: Vec<Vec<CellValue>>,
    ) -> Result<Self, SheetError>
    where
        C: Into<String>,
    {
        let columns: Vec<String> = columns.into_iter().map(Into::into).collect();
        let column_positions = column_positions(&columns)?;

        if index.len() != rows.len() {
            return Err(SheetError::RowLengthMismatch {
                row: index.len().min(rows.len()),
                expected: index.len(),
                got: rows.len(),
            });
        }

        let mut row_positions = HashMap::with_capacity(index.len());
        for (position, (&row_id, values)) in index.iter().zip(&rows).enumerate() {
            if row_positions.insert(row_id, position).is_some() {
                return Err(SheetError::DuplicateRow { row: row_id });
            }
            if values.len() != columns.len() {
                return Err(SheetError::RowLengthMismatch {
                    row: row_id,
                    expected: columns.len(),
                    got: values.len(),
                });
            }
        }

        let next_row_id = index.iter().max().map_or(0, |max| max.saturating_add(1));

        Ok(Self {
            columns,
            column_positions,
            index,
            row_positions,
            cells: rows,
            next_row_id,
        })
    }

    /// Builds a snapshot from raw grid values.
    ///
    /// The last header row supplies column names; each following row becomes
    /// a data row with identifiers counting from 0. Short rows are padded
    /// with `Empty`, since grids omit trailing blank cells.
    pub fn from_grid_values(values: &[Vec<String>], config: &SyncConfig) -> Result<Self, SheetError> {
        config.validate()?;
        let Some(header) = values.get(config.header_rows - 1) else {
            return Ok(Self::default());
        };
        let width = header.len();

        let mut rows = Vec::with_capacity(values.len().saturating_sub(config.header_rows));
        for (row_id, raw) in values.iter().skip(config.header_rows).enumerate() {
            if raw.len() > width && raw[width..].iter().any(|v| !v.is_empty()) {
                return Err(SheetError::RowLengthMismatch {
                    row: row_id,
                    expected: width,
                    got: raw.len(),
                });
            }
            let mut row: Vec<CellValue> = raw
                .iter()
                .take(width)
                .map(|text| {
                    if config.infer_types {
                        CellValue::infer(text)
                    } else if text.is_empty() {
                        CellValue::Empty
                    } else {
                        CellValue::Text(text.clone())
                    }
                })
                .collect();
            row.resize(width, CellValue::Empty);
            rows.push(row);
        }

        tracing::debug!(
            "Loaded snapshot with {} columns and {} rows",
            width,
            rows.len()
        );
        Self::new(header.clone(), rows)
    }

    /// Renders the snapshot as grid text, header row first.
    pub fn to_grid_values(&self) -> Vec<Vec<String>> {
        let mut values = Vec::with_capacity(self.cells.len() + 1);
        values.push(self.columns.clone());
        values.extend(
            self.cells
                .iter()
                .map(|row| row.iter().map(ToString::to_string).collect()),
        );
        values
    }

    /// Returns a fully independent copy of this snapshot.
    pub fn copy(&self) -> Self {
        self.clone()
    }

    /// Returns column names in declared order.
    pub fn columns(&self) -> &[String] {
        &self.columns
    }

    /// Returns row identifiers in row order.
    pub fn index(&self) -> &[usize] {
        &self.index
    }

    /// Returns the number of rows.
    pub fn row_count(&self) -> usize {
        self.index.len()
    }

    /// Returns the number of columns.
    pub fn column_count(&self) -> usize {
        self.columns.len()
    }

    /// Returns `true` if the snapshot has no rows.
    pub fn is_empty(&self) -> bool {
        self.index.is_empty()
    }

    /// Returns the ordinal of a column in declared order.
    pub fn column_ordinal(&self, column: &str) -> Option<usize> {
        self.column_positions.get(column).copied()
    }

    /// Returns `true` if the row identifier is present.
    pub fn contains_row(&self, row: usize) -> bool {
        self.row_positions.contains_key(&row)
    }

    /// Returns `true` if the column is present.
    pub fn contains_column(&self, column: &str) -> bool {
        self.column_positions.contains_key(column)
    }

    /// Reads a single cell.
    pub fn get(&self, row: usize, column: &str) -> Result<&CellValue, SheetError> {
        let (position, ordinal) = self.locate(row, column)?;
        Ok(&self.cells[position][ordinal])
    }

    /// Reads a whole row in column order.
    pub fn row(&self, row: usize) -> Result<&[CellValue], SheetError> {
        let position = self.row_position(row)?;
        Ok(&self.cells[position])
    }

    /// Iterates `(row identifier, values)` in row order.
    pub fn rows(&self) -> impl Iterator<Item = (usize, &[CellValue])> + '_ {
        self.index
            .iter()
            .copied()
            .zip(self.cells.iter().map(Vec::as_slice))
    }

    /// Translates a logical cell coordinate to its grid address.
    pub fn address_of(
        &self,
        row: usize,
        column: &str,
        header_rows: usize,
    ) -> Result<CellAddress, SheetError> {
        let ordinal = self
            .column_ordinal(column)
            .ok_or_else(|| SheetError::ColumnNotFound {
                column: column.to_string(),
            })?;
        CellAddress::for_cell(row, ordinal, header_rows).ok_or(SheetError::RowOutOfRange { row })
    }

    /// Checks that every row lands on a grid row under `header_rows`.
    pub fn check_addressable(&self, header_rows: usize) -> Result<(), SheetError> {
        match self.index.iter().max() {
            Some(&row) if CellAddress::for_cell(row, 0, header_rows).is_none() => {
                Err(SheetError::RowOutOfRange { row })
            }
            _ => Ok(()),
        }
    }

    fn row_position(&self, row: usize) -> Result<usize, SheetError> {
        self.row_positions
            .get(&row)
            .copied()
            .ok_or(SheetError::RowNotFound { row })
    }

    fn locate(&self, row: usize, column: &str) -> Result<(usize, usize), SheetError> {
        let position = self.row_position(row)?;
        let ordinal = self
            .column_ordinal(column)
            .ok_or_else(|| SheetError::ColumnNotFound {
                column: column.to_string(),
            })?;
        Ok((position, ordinal))
    }

    /// Overwrites a single cell, returning the previous value.
    pub(crate) fn set_cell(
        &mut self,
        row: usize,
        column: &str,
        value: CellValue,
    ) -> Result<CellValue, SheetError> {
        let (position, ordinal) = self.locate(row, column)?;
        Ok(std::mem::replace(&mut self.cells[position][ordinal], value))
    }

    /// Overwrites a cell by position; both indices come from this snapshot.
    pub(crate) fn set_at(&mut self, position: usize, ordinal: usize, value: CellValue) {
        self.cells[position][ordinal] = value;
    }

    pub(crate) fn push_column(&mut self, name: String, fill: CellValue) -> Result<(), SheetError> {
        if name.is_empty() {
            return Err(SheetError::EmptyColumnName {
                position: self.columns.len(),
            });
        }
        if self.contains_column(&name) {
            return Err(SheetError::DuplicateColumn { column: name });
        }
        self.column_positions.insert(name.clone(), self.columns.len());
        self.columns.push(name);
        for row in &mut self.cells {
            row.push(fill.clone());
        }
        Ok(())
    }

    pub(crate) fn remove_column(&mut self, column: &str) -> Result<Vec<CellValue>, SheetError> {
        let ordinal = self
            .column_ordinal(column)
            .ok_or_else(|| SheetError::ColumnNotFound {
                column: column.to_string(),
            })?;
        self.columns.remove(ordinal);
        self.column_positions = column_positions(&self.columns)?;
        Ok(self.cells.iter_mut().map(|row| row.remove(ordinal)).collect())
    }

    pub(crate) fn rename_column(&mut self, from: &str, to: String) -> Result<(), SheetError> {
        let ordinal = self
            .column_ordinal(from)
            .ok_or_else(|| SheetError::ColumnNotFound {
                column: from.to_string(),
            })?;
        if to.is_empty() {
            return Err(SheetError::EmptyColumnName { position: ordinal });
        }
        if from == to {
            return Ok(());
        }
        if self.contains_column(&to) {
            return Err(SheetError::DuplicateColumn { column: to });
        }
        self.column_positions.remove(from);
        self.column_positions.insert(to.clone(), ordinal);
        self.columns[ordinal] = to;
        Ok(())
    }

    pub(crate) fn push_row(&mut self, values: Vec<CellValue>) -> Result<usize, SheetError> {
        let row_id = self.next_row_id;
        if values.len() != self.columns.len() {
            return Err(SheetError::RowLengthMismatch {
                row: row_id,
                expected: self.columns.len(),
                got: values.len(),
            });
        }
        // Only reachable once the id space is exhausted
        if self.contains_row(row_id) {
            return Err(SheetError::RowOutOfRange { row: row_id });
        }
        self.next_row_id = row_id.saturating_add(1);
        self.row_positions.insert(row_id, self.index.len());
        self.index.push(row_id);
        self.cells.push(values);
        Ok(row_id)
    }

    pub(crate) fn remove_row(&mut self, row: usize) -> Result<Vec<CellValue>, SheetError> {
        let position = self.row_position(row)?;
        self.index.remove(position);
        self.row_positions = self
            .index
            .iter()
            .enumerate()
            .map(|(position, &row_id)| (row_id, position))
            .collect();
        Ok(self.cells.remove(position))
    }
}

fn column_positions(columns: &[String]) -> Result<HashMap<String, usize>, SheetError> {
    let mut seen = HashSet::with_capacity(columns.len());
    let mut positions = HashMap::with_capacity(columns.len());
    for (position, name) in columns.iter().enumerate() {
        if name.is_empty() {
            return Err(SheetError::EmptyColumnName { position });
        }
        if !seen.insert(name.as_str()) {
            return Err(SheetError::DuplicateColumn {
                column: name.clone(),
            });
        }
        positions.insert(name.clone(), position);
    }
    Ok(positions)
}
