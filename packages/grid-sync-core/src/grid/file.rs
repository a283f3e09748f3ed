//! Grid persisted as a JSON values document.
//!
//! The document has the shape of a values read response:
//! `{"values": [["col_a", "col_b"], ["1", "x"]]}`. Cells are stored as
//! text; typed values are rendered the way a user would type them.

use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::address::CellAddress;
use crate::error::GridError;
use crate::value::CellValue;

use super::{RemoteGrid, ValueInputOption, ValueRange};

#[derive(Debug, Default, Serialize, Deserialize)]
struct GridDocument {
    #[serde(default)]
    values: Vec<Vec<String>>,
}

/// Grid backed by a JSON file, rewritten on every successful batch.
#[derive(Debug)]
pub struct JsonFileGrid {
    path: PathBuf,
    document: GridDocument,
}

impl JsonFileGrid {
    /// Opens an existing grid file.
    pub fn open(path: impl AsRef<Path>) -> Result<Self, GridError> {
        let path = path.as_ref().to_path_buf();
        let content = std::fs::read_to_string(&path)
            .map_err(|e| classify_io_error(e, &format!("reading {}", path.display())))?;
        let document: GridDocument = serde_json::from_str(&content)
            .map_err(|e| GridError::Backend(format!("Invalid grid file {}: {}", path.display(), e)))?;
        Ok(Self { path, document })
    }

    /// Creates (or replaces) a grid file holding `values`.
    pub fn create(path: impl AsRef<Path>, values: Vec<Vec<String>>) -> Result<Self, GridError> {
        let grid = Self {
            path: path.as_ref().to_path_buf(),
            document: GridDocument { values },
        };
        grid.save()?;
        Ok(grid)
    }

    /// Returns the current grid text, row-major.
    pub fn values(&self) -> &[Vec<String>] {
        &self.document.values
    }

    /// Returns the backing file path.
    pub fn path(&self) -> &Path {
        &self.path
    }

    fn save(&self) -> Result<(), GridError> {
        let content = serde_json::to_string_pretty(&self.document)
            .map_err(|e| GridError::Backend(format!("Failed to encode grid: {}", e)))?;

        // Write then rename so a failed write never truncates the grid
        let tmp_path = self.path.with_extension("json.tmp");
        std::fs::write(&tmp_path, content)
            .map_err(|e| classify_io_error(e, &format!("writing {}", tmp_path.display())))?;
        std::fs::rename(&tmp_path, &self.path)
            .map_err(|e| classify_io_error(e, &format!("replacing {}", self.path.display())))?;
        Ok(())
    }
}

impl RemoteGrid for JsonFileGrid {
    fn batch_update(
        &mut self,
        data: &[ValueRange],
        input: ValueInputOption,
    ) -> Result<(), GridError> {
        let mut values = self.document.values.clone();

        for value_range in data {
            let origin = CellAddress::parse(&value_range.range)
                .map_err(|_| GridError::InvalidRange(value_range.range.clone()))?;
            for (row_offset, row) in value_range.values.iter().enumerate() {
                for (column_offset, value) in row.iter().enumerate() {
                    let text = match (input, value) {
                        (ValueInputOption::Raw, serde_json::Value::String(s)) => s.clone(),
                        _ => CellValue::from_wire(value).to_string(),
                    };
                    write_cell(
                        &mut values,
                        origin.row + row_offset,
                        origin.column + column_offset,
                        text,
                    );
                }
            }
        }

        let previous = std::mem::replace(&mut self.document.values, values);
        if let Err(e) = self.save() {
            self.document.values = previous;
            return Err(e);
        }

        tracing::debug!(
            "Wrote {} ranges to {}",
            data.len(),
            self.path.display()
        );
        Ok(())
    }
}

fn write_cell(values: &mut Vec<Vec<String>>, row: usize, column: usize, text: String) {
    if values.len() <= row {
        values.resize_with(row + 1, Vec::new);
    }
    let cells = &mut values[row];
    if cells.len() <= column {
        cells.resize(column + 1, String::new());
    }
    cells[column] = text;
}

/// Classifies I/O errors into grid error variants.
fn classify_io_error(error: std::io::Error, context: &str) -> GridError {
    match error.kind() {
        ErrorKind::WouldBlock | ErrorKind::TimedOut | ErrorKind::Interrupted => {
            GridError::Network(format!("{}: {}", context, error))
        }
        _ => GridError::Io(format!("{}: {}", context, error)),
    }
}
