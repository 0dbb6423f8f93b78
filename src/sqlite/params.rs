use rusqlite::types::Value;

use crate::error::SqlCursorError;
use crate::types::RowValues;

/// Convert a single `RowValues` to a rusqlite `Value`.
#[must_use]
pub(crate) fn row_value_to_sqlite_value(value: &RowValues) -> Value {
    match value {
        RowValues::Int(i) => Value::Integer(*i),
        RowValues::Float(f) => Value::Real(*f),
        RowValues::Text(s) => Value::Text(s.clone()),
        RowValues::Bool(b) => Value::Integer(i64::from(*b)),
        RowValues::Timestamp(dt) => Value::Text(dt.format("%F %T%.f").to_string()),
        RowValues::Null => Value::Null,
        RowValues::JSON(jval) => Value::Text(jval.to_string()),
        RowValues::Blob(bytes) => Value::Blob(bytes.clone()),
    }
}

/// Convert named parameters into the `(":name", value)` pairs `SQLite`
/// binds. A leading `:` in the supplied name is accepted as-is.
///
/// # Errors
///
/// Returns `SqlCursorError::ParameterError` for an empty parameter name.
pub(crate) fn convert_named_params(
    params: &[(&str, RowValues)],
) -> Result<Vec<(String, Value)>, SqlCursorError> {
    let mut converted = Vec::with_capacity(params.len());
    for (name, value) in params {
        if name.is_empty() || *name == ":" {
            return Err(SqlCursorError::ParameterError(
                "parameter name must not be empty".into(),
            ));
        }
        let key = if name.starts_with(':') {
            (*name).to_string()
        } else {
            format!(":{name}")
        };
        converted.push((key, row_value_to_sqlite_value(value)));
    }
    Ok(converted)
}
