//! In-process grid used by tests and dry runs.

use super::{CellValue, GridHandle, SheetsBackend};
use crate::errors::{AppError, AppResult};
use std::cell::{Cell, RefCell};
use std::collections::HashMap;
use std::rc::Rc;

/// Shared handle onto an in-memory table; clones see the same cells.
#[derive(Debug, Clone, Default)]
pub struct InMemoryGrid {
    cells: Rc<RefCell<Vec<Vec<String>>>>,
    appends: Rc<Cell<usize>>,
}

fn trim_trailing(mut values: Vec<String>) -> Vec<String> {
    while values.last().is_some_and(|v| v.is_empty()) {
        values.pop();
    }
    values
}

impl InMemoryGrid {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_rows(rows: &[&[&str]]) -> Self {
        let grid = Self::new();
        *grid.cells.borrow_mut() = rows
            .iter()
            .map(|r| r.iter().map(|c| c.to_string()).collect())
            .collect();
        grid
    }

    /// Snapshot of every row, trailing empty cells removed.
    pub fn rows(&self) -> Vec<Vec<String>> {
        let mut rows: Vec<Vec<String>> = self
            .cells
            .borrow()
            .iter()
            .map(|r| trim_trailing(r.clone()))
            .collect();
        while rows.last().is_some_and(|r| r.is_empty()) {
            rows.pop();
        }
        rows
    }

    /// Number of `append_row` calls served so far.
    pub fn append_count(&self) -> usize {
        self.appends.get()
    }

    fn put(&self, row: usize, col: usize, value: String) {
        let mut cells = self.cells.borrow_mut();
        if cells.len() < row {
            cells.resize(row, Vec::new());
        }
        let r = &mut cells[row - 1];
        if r.len() < col {
            r.resize(col, String::new());
        }
        r[col - 1] = value;
    }
}

fn check_index(kind: &str, index: usize) -> AppResult<()> {
    if index == 0 {
        return Err(AppError::InvalidArgument(format!(
            "{} index is 1-based, got 0",
            kind
        )));
    }
    Ok(())
}

impl GridHandle for InMemoryGrid {
    fn column_values(&self, col: usize) -> AppResult<Vec<String>> {
        check_index("column", col)?;
        let values = self
            .cells
            .borrow()
            .iter()
            .map(|r| r.get(col - 1).cloned().unwrap_or_default())
            .collect();
        Ok(trim_trailing(values))
    }

    fn row_values(&self, row: usize) -> AppResult<Vec<String>> {
        check_index("row", row)?;
        let values = self
            .cells
            .borrow()
            .get(row - 1)
            .cloned()
            .unwrap_or_default();
        Ok(trim_trailing(values))
    }

    fn append_row(&mut self, row: usize, values: &[CellValue]) -> AppResult<()> {
        check_index("row", row)?;
        for (i, v) in values.iter().enumerate() {
            self.put(row, i + 1, v.to_string());
        }
        self.appends.set(self.appends.get() + 1);
        Ok(())
    }

    fn set_cell(&mut self, row: usize, col: usize, value: &CellValue) -> AppResult<()> {
        check_index("row", row)?;
        check_index("column", col)?;
        self.put(row, col, value.to_string());
        Ok(())
    }
}

/// Backend serving a fixed set of in-memory spreadsheets.
#[derive(Debug, Default)]
pub struct InMemoryBackend {
    sheets: HashMap<String, InMemoryGrid>,
    offline: bool,
}

impl InMemoryBackend {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a spreadsheet and return a handle onto its grid.
    pub fn add_sheet(&mut self, id: &str) -> InMemoryGrid {
        self.sheets.entry(id.to_string()).or_default().clone()
    }

    /// A backend on which every open fails, as if the network were down.
    pub fn offline() -> Self {
        Self {
            sheets: HashMap::new(),
            offline: true,
        }
    }
}

impl SheetsBackend for InMemoryBackend {
    type Grid = InMemoryGrid;

    fn open_by_id(&self, id: &str) -> AppResult<InMemoryGrid> {
        if self.offline {
            return Err(AppError::BackendUnavailable("network unreachable".into()));
        }
        self.sheets
            .get(id)
            .cloned()
            .ok_or_else(|| AppError::BackendUnavailable(format!("spreadsheet '{}' not found", id)))
    }
}
