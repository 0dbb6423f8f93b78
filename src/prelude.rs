//! Convenient imports for common functionality.

pub use crate::error::SqlCursorError;
pub use crate::executor::{Executor, QueryResult};
pub use crate::results::row::DbRow;
pub use crate::results::rows::{Rows, RowsIter};
pub use crate::sqlite::{SqliteConnection, SqliteOptions};
pub use crate::types::RowValues;
