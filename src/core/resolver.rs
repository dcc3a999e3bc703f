//! Row/column resolution against the append-only labeled grid.
//!
//! Row 1 is the header row and column 1 the date column; cell (1,1) is
//! reserved, so data rows and user columns both start at index 2.

use crate::errors::AppResult;
use crate::sheets::{CellValue, GridHandle};

const HEADER_ROW: usize = 1;
const LABEL_COL: usize = 1;

/// Position (1-based) of `label` among `values`, ignoring the reserved first slot.
fn find_label(values: &[String], label: &str) -> Option<usize> {
    values
        .iter()
        .enumerate()
        .skip(1)
        .find(|(_, v)| v.as_str() == label)
        .map(|(i, _)| i + 1)
}

pub struct Resolver;

impl Resolver {
    /// Row holding `date_label`, appending one when the date is new.
    pub fn find_or_create_row<G: GridHandle>(grid: &mut G, date_label: &str) -> AppResult<usize> {
        let dates = grid.column_values(LABEL_COL)?;
        if let Some(row) = find_label(&dates, date_label) {
            return Ok(row);
        }

        let row = dates.len().max(HEADER_ROW) + 1;
        grid.append_row(row, &[CellValue::Text(date_label.to_string())])?;
        tracing::info!(date = date_label, row, "created row");
        Ok(row)
    }

    /// Column headed by `user_label`, adding the header cell when the user is new.
    pub fn find_or_create_column<G: GridHandle>(grid: &mut G, user_label: &str) -> AppResult<usize> {
        let headers = grid.row_values(HEADER_ROW)?;
        if let Some(col) = find_label(&headers, user_label) {
            return Ok(col);
        }

        let col = headers.len().max(LABEL_COL) + 1;
        grid.set_cell(HEADER_ROW, col, &CellValue::Text(user_label.to_string()))?;
        tracing::info!(user = user_label, col, "created column");
        Ok(col)
    }

    pub fn write_cell<G: GridHandle>(
        grid: &mut G,
        row: usize,
        col: usize,
        value: &CellValue,
    ) -> AppResult<()> {
        grid.set_cell(row, col, value)
    }
}
