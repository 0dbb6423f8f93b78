use rusqlite::types::Value;

use crate::error::SqlCursorError;
use crate::types::RowValues;

/// Extract a `RowValues` from a `SQLite` row.
///
/// # Errors
///
/// Returns `SqlCursorError` if the value cannot be read from the row.
pub(crate) fn extract_row_value(
    row: &rusqlite::Row,
    idx: usize,
) -> Result<RowValues, SqlCursorError> {
    let value: Value = row.get(idx).map_err(SqlCursorError::SqliteError)?;
    match value {
        Value::Null => Ok(RowValues::Null),
        Value::Integer(i) => Ok(RowValues::Int(i)),
        Value::Real(f) => Ok(RowValues::Float(f)),
        Value::Text(s) => Ok(RowValues::Text(s)),
        Value::Blob(b) => Ok(RowValues::Blob(b)),
    }
}

/// Pull the next row off an open statement, or `None` at end of data.
///
/// # Errors
///
/// Returns `SqlCursorError` if stepping the statement or reading a column
/// fails.
pub(crate) fn fetch_row(
    rows: &mut rusqlite::Rows<'_>,
    column_count: usize,
) -> Result<Option<Vec<RowValues>>, SqlCursorError> {
    let Some(row) = rows.next()? else {
        return Ok(None);
    };
    let mut values = Vec::with_capacity(column_count);
    for idx in 0..column_count {
        values.push(extract_row_value(row, idx)?);
    }
    Ok(Some(values))
}
