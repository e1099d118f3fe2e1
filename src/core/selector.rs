use crate::domain::model::{InputRow, SheetTable};
use crate::utils::error::{ProofError, Result};

/// Selects the rows of `table` eligible for correction. Fails before any
/// backend work when `column` is absent, reporting the columns that do
/// exist. Blank cells (after trimming) yield `text: None` but keep their
/// row slot so output row order never changes.
pub fn select_rows(table: &SheetTable, column: &str) -> Result<Vec<InputRow>> {
    let col = table
        .column_index(column)
        .ok_or_else(|| ProofError::SchemaError {
            column: column.to_string(),
            available: table.headers.clone(),
        })?;

    Ok(table
        .rows
        .iter()
        .enumerate()
        .map(|(index, row)| InputRow {
            index,
            // Selection looks at the trimmed cell, but the backend receives
            // the cell exactly as stored.
            text: row
                .get(col)
                .filter(|cell| !cell.trim().is_empty())
                .cloned(),
        })
        .collect())
}
