use std::fmt;

use rusqlite::types::Value;

use crate::error::SqlCursorError;
use crate::sqlite::config::SqliteOptions;
use crate::sqlite::worker::{ExecuteOutcome, SqliteWorker};
use crate::types::RowValues;

/// Owned `SQLite` connection backed by a dedicated worker thread.
///
/// Exclusively owned by one [`Executor`](crate::executor::Executor) at a
/// time; dropping the handle shuts the worker down and closes the database.
pub struct SqliteConnection {
    worker: SqliteWorker,
}

impl SqliteConnection {
    /// Open a database and hand the connection to a fresh worker thread.
    ///
    /// # Errors
    /// Returns [`SqlCursorError`] if the database cannot be opened, the
    /// journal pragma fails, or the worker thread cannot be spawned.
    pub fn open(options: &SqliteOptions) -> Result<Self, SqlCursorError> {
        let conn = rusqlite::Connection::open(&options.db_path)?;
        if options.journal_wal {
            conn.execute_batch("PRAGMA journal_mode = WAL;")?;
        }
        let worker = SqliteWorker::spawn(conn)?;
        Ok(Self { worker })
    }

    /// Open a private in-memory database.
    ///
    /// # Errors
    /// Returns [`SqlCursorError`] if the worker thread cannot be spawned.
    pub fn open_in_memory() -> Result<Self, SqlCursorError> {
        Self::open(&SqliteOptions::new(":memory:"))
    }

    pub(crate) fn execute(
        &self,
        query: String,
        params: Vec<(String, Value)>,
    ) -> Result<ExecuteOutcome, SqlCursorError> {
        self.worker.execute(query, params)
    }

    pub(crate) fn execute_batch(&self, query: String) -> Result<(), SqlCursorError> {
        self.worker.execute_batch(query)
    }

    pub(crate) fn begin(&self) -> Result<(), SqlCursorError> {
        self.worker.begin()
    }

    pub(crate) fn commit(&self) -> Result<(), SqlCursorError> {
        self.worker.commit()
    }

    pub(crate) fn rollback(&self) -> Result<(), SqlCursorError> {
        self.worker.rollback()
    }

    pub(crate) fn fetch_next(&self) -> Result<Option<Vec<RowValues>>, SqlCursorError> {
        self.worker.fetch_next()
    }

    pub(crate) fn restart_statement(&self) -> Result<(), SqlCursorError> {
        self.worker.restart_statement()
    }

    pub(crate) fn finish_statement(&self) {
        self.worker.finish_statement();
    }
}

impl fmt::Debug for SqliteConnection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SqliteConnection")
            .field("worker_id", &self.worker.worker_id())
            .finish()
    }
}
