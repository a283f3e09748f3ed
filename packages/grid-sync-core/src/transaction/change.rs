use crate::address::CellAddress;
use crate::grid::ValueRange;
use crate::value::CellValue;

/// A single detected cell difference between a snapshot and its working copy.
#[derive(Debug, Clone, PartialEq)]
pub struct CellChange {
    /// Row identifier of the changed cell
    pub row: usize,
    /// Column name of the changed cell
    pub column: String,
    /// Translated grid address
    pub address: CellAddress,
    /// New value taken from the working copy
    pub value: CellValue,
    /// Row position within the original snapshot
    pub(crate) position: usize,
}

impl CellChange {
    /// Builds the single-cell wire record for this change.
    ///
    /// The value is normalized, so missing values are sent as `""`.
    pub fn to_value_range(&self) -> ValueRange {
        ValueRange::single(self.address.to_string(), self.value.to_wire())
    }
}
