use crate::error::SelectionError;

use super::model::Table;

/// Column preferred whenever it is present.
pub const PREFERRED_COLUMN: &str = "protocol_type";

/// Columns with at most this many distinct values are treated as categorical.
pub const MAX_CATEGORIES: usize = 30;

/// Pick the column to chart. First matching rule wins:
///
/// 1. a column named [`PREFERRED_COLUMN`]
/// 2. the first text column
/// 3. the first column with at most [`MAX_CATEGORIES`] distinct non-missing values
/// 4. the first column
pub fn select_column(table: &Table) -> Result<String, SelectionError> {
    let columns = table.columns();
    let first = columns.first().ok_or(SelectionError::NoColumns)?;

    let chosen = columns
        .iter()
        .find(|c| c.name == PREFERRED_COLUMN)
        .or_else(|| columns.iter().find(|c| c.is_textual()))
        .or_else(|| columns.iter().find(|c| c.n_unique() <= MAX_CATEGORIES))
        .unwrap_or(first);

    Ok(chosen.name.clone())
}
