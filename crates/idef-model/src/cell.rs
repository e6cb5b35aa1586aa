//! Uniform tabular input produced by source adapters.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;

/// A scalar spreadsheet cell.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum CellValue {
    #[default]
    Null,
    Bool(bool),
    Integer(i64),
    Float(f64),
    Text(String),
}

impl CellValue {
    /// Plain string conversion: null is empty, numbers are not locale-formatted,
    /// and integral floats drop the fractional part (`3.0` -> `"3"`).
    pub fn to_text(&self) -> String {
        match self {
            CellValue::Null => String::new(),
            CellValue::Bool(value) => value.to_string(),
            CellValue::Integer(value) => value.to_string(),
            CellValue::Float(value) => float_to_text(*value),
            CellValue::Text(value) => value.clone(),
        }
    }

    pub fn is_null(&self) -> bool {
        matches!(self, CellValue::Null)
    }

    /// True for null and whitespace-only text.
    pub fn is_blank(&self) -> bool {
        match self {
            CellValue::Null => true,
            CellValue::Text(value) => value.trim().is_empty(),
            _ => false,
        }
    }
}

fn float_to_text(value: f64) -> String {
    if value.is_nan() {
        "NaN".to_string()
    } else if value.is_infinite() {
        if value.is_sign_positive() {
            "Infinity".to_string()
        } else {
            "-Infinity".to_string()
        }
    } else {
        // f64's Display never uses exponent notation and omits `.0`.
        value.to_string()
    }
}

impl fmt::Display for CellValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.to_text())
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

impl From<i64> for CellValue {
    fn from(value: i64) -> Self {
        CellValue::Integer(value)
    }
}

impl From<f64> for CellValue {
    fn from(value: f64) -> Self {
        CellValue::Float(value)
    }
}

impl From<bool> for CellValue {
    fn from(value: bool) -> Self {
        CellValue::Bool(value)
    }
}

impl<T: Into<CellValue>> From<Option<T>> for CellValue {
    fn from(value: Option<T>) -> Self {
        value.map_or(CellValue::Null, Into::into)
    }
}

/// One source row: column name -> cell.
pub type RowInput = BTreeMap<String, CellValue>;

/// Build a [`RowInput`] from `(column, value)` pairs.
pub fn row<I, K, V>(cells: I) -> RowInput
where
    I: IntoIterator<Item = (K, V)>,
    K: Into<String>,
    V: Into<CellValue>,
{
    cells
        .into_iter()
        .map(|(column, value)| (column.into(), value.into()))
        .collect()
}

/// Header names plus rows, as delivered by a tabular source adapter.
///
/// Headers are expected to be trimmed, non-empty and unique; blank rows are
/// expected to be filtered out already.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct TabularData {
    pub columns: Vec<String>,
    pub rows: Vec<RowInput>,
}

impl TabularData {
    pub fn new(columns: Vec<String>, rows: Vec<RowInput>) -> Self {
        Self { columns, rows }
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    pub fn has_column(&self, name: &str) -> bool {
        self.columns.iter().any(|c| c == name)
    }
}
