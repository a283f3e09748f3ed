//! A1-style grid addressing.
//!
//! Grid rows are 1-based and the first `header_rows` rows hold the header,
//! so row identifier `r` lands on grid row `r + header_rows + 1`. Columns
//! use bijective base-26 lettering: `A..Z`, then `AA..ZZ`, then `AAA..`.

use std::fmt;

use crate::error::SheetError;

/// A single cell position on the grid, 0-based on both axes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct CellAddress {
    /// 0-based grid row (grid row 1 is `0`)
    pub row: usize,
    /// 0-based grid column (column `A` is `0`)
    pub column: usize,
}

impl CellAddress {
    /// Creates an address from 0-based grid coordinates.
    pub fn new(row: usize, column: usize) -> Self {
        Self { row, column }
    }

    /// Translates a logical (row identifier, column ordinal) pair.
    ///
    /// # Arguments
    /// * `row_id` - Snapshot row identifier (0-based)
    /// * `ordinal` - Column position in the snapshot's declared order
    /// * `header_rows` - Number of rows above the first data row
    ///
    /// Returns `None` if the grid row number would not fit in a `usize`.
    pub fn for_cell(row_id: usize, ordinal: usize, header_rows: usize) -> Option<Self> {
        let row = row_id.checked_add(header_rows)?;
        // grid_row() adds one more
        row.checked_add(1)?;
        Some(Self {
            row,
            column: ordinal,
        })
    }

    /// Parses an A1 address such as `B3` or `aa10`.
    pub fn parse(text: &str) -> Result<Self, SheetError> {
        let invalid = || SheetError::InvalidAddress(text.to_string());

        let split = text
            .find(|c: char| c.is_ascii_digit())
            .ok_or_else(invalid)?;
        let (letters, digits) = text.split_at(split);
        if letters.is_empty() || !letters.chars().all(|c| c.is_ascii_alphabetic()) {
            return Err(invalid());
        }
        if !digits.chars().all(|c| c.is_ascii_digit()) {
            return Err(invalid());
        }

        let row: usize = digits.parse().map_err(|_| invalid())?;
        if row == 0 {
            return Err(invalid());
        }
        let column = column_index(letters).ok_or_else(invalid)?;

        Ok(Self {
            row: row - 1,
            column,
        })
    }

    /// Returns the column letters of this address.
    pub fn column_letters(&self) -> String {
        column_letters(self.column)
    }

    /// Returns the 1-based grid row number.
    pub fn grid_row(&self) -> usize {
        self.row + 1
    }
}

impl fmt::Display for CellAddress {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}{}", column_letters(self.column), self.grid_row())
    }
}

/// Converts a 0-based column ordinal to its letters (`0` -> `A`, `26` -> `AA`).
pub fn column_letters(ordinal: usize) -> String {
    let mut n = ordinal as u128 + 1;
    let mut letters = Vec::new();
    while n > 0 {
        let rem = ((n - 1) % 26) as u8;
        letters.push((b'A' + rem) as char);
        n = (n - 1) / 26;
    }
    letters.iter().rev().collect()
}

/// Converts column letters back to a 0-based ordinal, case-insensitively.
///
/// Returns `None` for empty input, non-letters, or overflow.
pub fn column_index(letters: &str) -> Option<usize> {
    if letters.is_empty() {
        return None;
    }
    let mut n: usize = 0;
    for c in letters.chars() {
        if !c.is_ascii_alphabetic() {
            return None;
        }
        let digit = (c.to_ascii_uppercase() as u8 - b'A') as usize + 1;
        n = n.checked_mul(26)?.checked_add(digit)?;
    }
    Some(n - 1)
}
