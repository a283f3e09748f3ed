//! Scalar cell values and their wire normalization.

use std::fmt;

use serde_json::Value as JsonValue;

/// Largest integer magnitude an `f64` represents exactly.
const MAX_SAFE_INTEGER: f64 = 9_007_199_254_740_992.0;

/// A single cell value held by a snapshot.
///
/// Equality treats every missing value as equal to every other missing
/// value: `Empty` and a NaN number compare equal to each other and to
/// themselves. An empty `Text` is a real value, not a missing one.
#[derive(Debug, Clone, Default)]
pub enum CellValue {
    /// No value
    #[default]
    Empty,
    /// Numeric value; NaN counts as missing
    Number(f64),
    /// Text value, possibly empty
    Text(String),
    /// Boolean value
    Bool(bool),
}

impl CellValue {
    /// Returns `true` for `Empty` and NaN numbers.
    pub fn is_missing(&self) -> bool {
        match self {
            CellValue::Empty => true,
            CellValue::Number(n) => n.is_nan(),
            _ => false,
        }
    }

    /// Parses raw grid text into a typed value.
    ///
    /// Empty text becomes `Empty`, numeric text a `Number`, `TRUE`/`FALSE`
    /// (any case) a `Bool`, anything else stays `Text`.
    pub fn infer(raw: &str) -> Self {
        if raw.is_empty() {
            return CellValue::Empty;
        }
        let trimmed = raw.trim();
        if trimmed.eq_ignore_ascii_case("true") {
            return CellValue::Bool(true);
        }
        if trimmed.eq_ignore_ascii_case("false") {
            return CellValue::Bool(false);
        }
        match trimmed.parse::<f64>() {
            // "nan" and "inf" parse as floats but are text on a grid
            Ok(n) if n.is_finite() => CellValue::Number(n),
            _ => CellValue::Text(raw.to_string()),
        }
    }

    /// Normalizes the value into the scalar form a grid accepts.
    ///
    /// Missing values become the empty string.
    pub fn to_wire(&self) -> JsonValue {
        match self {
            v if v.is_missing() => JsonValue::String(String::new()),
            CellValue::Number(n) => number_to_wire(*n),
            CellValue::Text(s) => JsonValue::String(s.clone()),
            CellValue::Bool(b) => JsonValue::Bool(*b),
            CellValue::Empty => JsonValue::String(String::new()),
        }
    }

    /// Converts a wire scalar back into a cell value.
    pub fn from_wire(value: &JsonValue) -> Self {
        match value {
            JsonValue::Null => CellValue::Empty,
            JsonValue::Bool(b) => CellValue::Bool(*b),
            JsonValue::Number(n) => n.as_f64().map_or(CellValue::Empty, CellValue::Number),
            JsonValue::String(s) => CellValue::Text(s.clone()),
            other => CellValue::Text(other.to_string()),
        }
    }
}

fn number_to_wire(n: f64) -> JsonValue {
    if n.fract() == 0.0 && n.abs() <= MAX_SAFE_INTEGER {
        JsonValue::from(n as i64)
    } else {
        serde_json::Number::from_f64(n)
            .map(JsonValue::Number)
            .unwrap_or_else(|| JsonValue::String(n.to_string()))
    }
}

impl PartialEq for CellValue {
    fn eq(&self, other: &Self) -> bool {
        match (self.is_missing(), other.is_missing()) {
            (true, true) => return true,
            (true, false) | (false, true) => return false,
            (false, false) => {}
        }
        match (self, other) {
            (CellValue::Number(a), CellValue::Number(b)) => a == b,
            (CellValue::Text(a), CellValue::Text(b)) => a == b,
            (CellValue::Bool(a), CellValue::Bool(b)) => a == b,
            _ => false,
        }
    }
}

impl fmt::Display for CellValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            v if v.is_missing() => Ok(()),
            CellValue::Number(n) if n.fract() == 0.0 && n.abs() <= MAX_SAFE_INTEGER => {
                write!(f, "{}", *n as i64)
            }
            CellValue::Number(n) => write!(f, "{}", n),
            CellValue::Text(s) => f.write_str(s),
            CellValue::Bool(true) => f.write_str("TRUE"),
            CellValue::Bool(false) => f.write_str("FALSE"),
            CellValue::Empty => Ok(()),
        }
    }
}

impl From<&str> for CellValue {
    fn from(value: &str) -> Self {
        CellValue::Text(value.to_string())
    }
}

impl From<String> for CellValue {
    fn from(value: String) -> Self {
        CellValue::Text(value)
    }
}

impl From<f64> for CellValue {
    fn from(value: f64) -> Self {
        CellValue::Number(value)
    }
}

impl From<i64> for CellValue {
    fn from(value: i64) -> Self {
        CellValue::Number(value as f64)
    }
}

impl From<i32> for CellValue {
    fn from(value: i32) -> Self {
        CellValue::Number(f64::from(value))
    }
}

impl From<bool> for CellValue {
    fn from(value: bool) -> Self {
        CellValue::Bool(value)
    }
}

impl<T: Into<CellValue>> From<Option<T>> for CellValue {
    fn from(value: Option<T>) -> Self {
        value.map_or(CellValue::Empty, Into::into)
    }
}
