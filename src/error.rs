use thiserror::Error;

#[derive(Debug, Error)]
pub enum SqlCursorError {
    /// Driver-level failure: carries the structured `SQLite` result code and
    /// message for the failed statement.
    #[error(transparent)]
    SqliteError(#[from] rusqlite::Error),

    #[error("Connection error: {0}")]
    ConnectionError(String),

    #[error("Parameter conversion error: {0}")]
    ParameterError(String),

    #[error("SQL execution error: {0}")]
    ExecutionError(String),

    #[error("Unsupported operation: {0}")]
    UnsupportedOperation(String),
}
