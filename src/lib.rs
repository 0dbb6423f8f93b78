//! Synchronous `SQLite` access layer with a replayable row cursor.
//!
//! An [`Executor`] runs parameterized SQL against a worker-owned `SQLite`
//! connection and classifies each statement as either an affected-row count
//! or a [`Rows`] cursor. The cursor iterates a forward-only statement and
//! emulates random access by re-executing the statement and replaying it
//! from the start.

pub mod error;
pub mod executor;
pub mod prelude;
pub mod results;
pub mod sqlite;
pub mod types;

pub use error::SqlCursorError;
pub use executor::{Executor, QueryResult};
pub use results::row::DbRow;
pub use results::rows::{Rows, RowsIter};
pub use sqlite::{SqliteConnection, SqliteOptions};
pub use types::RowValues;
