//! Spreadsheet backend interface.
//!
//! The grid is a 1-based, two-dimensional table of strings. Row 1 is the
//! header row; column 1 holds the row labels.

use crate::errors::AppResult;
use std::fmt;

pub mod a1;
pub mod google;
pub mod memory;

pub use google::GoogleSheets;
pub use memory::{InMemoryBackend, InMemoryGrid};

/// A value written into a single cell.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CellValue {
    Text(String),
    Number(u64),
}

impl fmt::Display for CellValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CellValue::Text(s) => write!(f, "{}", s),
            CellValue::Number(n) => write!(f, "{}", n),
        }
    }
}

impl CellValue {
    pub fn to_json(&self) -> serde_json::Value {
        match self {
            CellValue::Text(s) => serde_json::Value::String(s.clone()),
            CellValue::Number(n) => serde_json::Value::from(*n),
        }
    }
}

/// One worksheet of an opened spreadsheet.
///
/// Reads drop trailing empty cells but keep leading ones, so the position of
/// a value in the returned vector is its 1-based index minus one.
pub trait GridHandle {
    fn column_values(&self, col: usize) -> AppResult<Vec<String>>;
    fn row_values(&self, row: usize) -> AppResult<Vec<String>>;
    /// Write a fresh row at `row`, which is the first row below all used rows.
    fn append_row(&mut self, row: usize, values: &[CellValue]) -> AppResult<()>;
    fn set_cell(&mut self, row: usize, col: usize, value: &CellValue) -> AppResult<()>;
}

/// Opens grids by spreadsheet id.
pub trait SheetsBackend {
    type Grid: GridHandle;

    fn open_by_id(&self, id: &str) -> AppResult<Self::Grid>;
}
