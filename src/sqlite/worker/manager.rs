use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::mpsc::{self, Sender};
use std::thread;

use rusqlite::types::Value;

use crate::error::SqlCursorError;
use crate::types::RowValues;

use super::channel::{Command, ExecuteOutcome, Reply};
use super::dispatcher::run_sqlite_worker;

static NEXT_WORKER_ID: AtomicU64 = AtomicU64::new(0);

/// Handle to the thread that owns the rusqlite connection. Every method
/// sends one command and blocks on its reply.
pub(crate) struct SqliteWorker {
    sender: Sender<Command>,
    worker_id: u64,
}

impl SqliteWorker {
    /// Move the connection onto a fresh worker thread.
    ///
    /// # Errors
    /// Returns `SqlCursorError::ConnectionError` if the thread cannot be
    /// spawned.
    pub(crate) fn spawn(conn: rusqlite::Connection) -> Result<Self, SqlCursorError> {
        let (sender, receiver) = mpsc::channel::<Command>();
        let worker_id = NEXT_WORKER_ID.fetch_add(1, Ordering::Relaxed);
        thread::Builder::new()
            .name(format!("sqlite-worker-{worker_id}"))
            .spawn(move || run_sqlite_worker(conn, &receiver))
            .map_err(|err| {
                SqlCursorError::ConnectionError(format!(
                    "failed to spawn SQLite worker thread: {err}"
                ))
            })?;
        tracing::debug!(worker_id, "spawned SQLite worker");
        Ok(Self { sender, worker_id })
    }

    pub(crate) fn worker_id(&self) -> u64 {
        self.worker_id
    }

    fn send_command(&self, command: Command) -> Result<(), SqlCursorError> {
        self.sender
            .send(command)
            .map_err(|_| SqlCursorError::ConnectionError("SQLite worker closed".into()))
    }

    fn request<T>(
        &self,
        build: impl FnOnce(Reply<T>) -> Command,
        drop_message: &'static str,
    ) -> Result<T, SqlCursorError> {
        let (tx, rx) = mpsc::channel();
        self.send_command(build(tx))?;
        rx.recv()
            .map_err(|_| SqlCursorError::ConnectionError(drop_message.into()))?
    }

    pub(crate) fn execute(
        &self,
        query: String,
        params: Vec<(String, Value)>,
    ) -> Result<ExecuteOutcome, SqlCursorError> {
        self.request(
            |respond_to| Command::Execute {
                query,
                params,
                respond_to,
            },
            "SQLite worker dropped while executing query",
        )
    }

    pub(crate) fn execute_batch(&self, query: String) -> Result<(), SqlCursorError> {
        self.request(
            |respond_to| Command::ExecuteBatch { query, respond_to },
            "SQLite worker dropped while executing batch",
        )
    }

    pub(crate) fn begin(&self) -> Result<(), SqlCursorError> {
        self.request(
            |respond_to| Command::Begin { respond_to },
            "SQLite worker dropped while beginning transaction",
        )
    }

    pub(crate) fn commit(&self) -> Result<(), SqlCursorError> {
        self.request(
            |respond_to| Command::Commit { respond_to },
            "SQLite worker dropped while committing transaction",
        )
    }

    pub(crate) fn rollback(&self) -> Result<(), SqlCursorError> {
        self.request(
            |respond_to| Command::Rollback { respond_to },
            "SQLite worker dropped while rolling back transaction",
        )
    }

    pub(crate) fn fetch_next(&self) -> Result<Option<Vec<RowValues>>, SqlCursorError> {
        self.request(
            |respond_to| Command::FetchNext { respond_to },
            "SQLite worker dropped while fetching a row",
        )
    }

    pub(crate) fn restart_statement(&self) -> Result<(), SqlCursorError> {
        self.request(
            |respond_to| Command::Restart { respond_to },
            "SQLite worker dropped while restarting statement",
        )
    }

    /// Release the served statement and wait for the worker to return to its
    /// main loop. Best-effort; used from `Drop`.
    pub(crate) fn finish_statement(&self) {
        let (tx, rx) = mpsc::channel();
        if self
            .send_command(Command::Finish { respond_to: tx })
            .is_ok()
        {
            let _ = rx.recv();
        }
    }
}

impl Drop for SqliteWorker {
    fn drop(&mut self) {
        let _ = self.sender.send(Command::Shutdown);
    }
}
