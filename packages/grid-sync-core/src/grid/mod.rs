//! Remote grid boundary and the bundled grid implementations.

mod file;
mod memory;

pub use file::JsonFileGrid;
pub use memory::InMemoryGrid;

use serde::{Deserialize, Serialize};
use serde_json::Value as JsonValue;

use crate::error::GridError;

/// How the backend interprets written values.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ValueInputOption {
    /// Parse values as if typed by a user (numbers, dates, formulas)
    UserEntered,
    /// Store values literally
    Raw,
}

/// One entry of a batch write: a range and the values to place in it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ValueRange {
    /// A1 address of the target range
    pub range: String,
    /// Row-major values; single-cell writes use `[[value]]`
    pub values: Vec<Vec<JsonValue>>,
}

impl ValueRange {
    /// Creates a single-cell range.
    pub fn single(range: impl Into<String>, value: JsonValue) -> Self {
        Self {
            range: range.into(),
            values: vec![vec![value]],
        }
    }
}

/// A grid-addressed backend that accepts batched cell writes.
///
/// Implementations either apply the whole batch and return `Ok(())`, or
/// fail with a [`GridError`]. The sync engine never retries.
pub trait RemoteGrid {
    /// Applies all value ranges in one request.
    fn batch_update(
        &mut self,
        data: &[ValueRange],
        input: ValueInputOption,
    ) -> Result<(), GridError>;
}

impl<G: RemoteGrid + ?Sized> RemoteGrid for &mut G {
    fn batch_update(
        &mut self,
        data: &[ValueRange],
        input: ValueInputOption,
    ) -> Result<(), GridError> {
        (**self).batch_update(data, input)
    }
}

impl<G: RemoteGrid + ?Sized> RemoteGrid for Box<G> {
    fn batch_update(
        &mut self,
        data: &[ValueRange],
        input: ValueInputOption,
    ) -> Result<(), GridError> {
        (**self).batch_update(data, input)
    }
}
