use std::sync::Arc;
use std::sync::mpsc::Sender;

use rusqlite::types::Value;

use crate::error::SqlCursorError;
use crate::types::RowValues;

/// One-shot reply channel for a single command.
pub(crate) type Reply<T> = Sender<Result<T, SqlCursorError>>;

/// What executing a statement produced: an affected-row count for statements
/// without column metadata, or an open statement the worker is now serving
/// row-by-row.
pub(crate) enum ExecuteOutcome {
    RowsAffected(usize),
    Cursor {
        column_names: Arc<Vec<String>>,
        row_count: usize,
    },
}

pub(super) enum Command {
    Execute {
        query: String,
        params: Vec<(String, Value)>,
        respond_to: Reply<ExecuteOutcome>,
    },
    ExecuteBatch {
        query: String,
        respond_to: Reply<()>,
    },
    Begin {
        respond_to: Reply<()>,
    },
    Commit {
        respond_to: Reply<()>,
    },
    Rollback {
        respond_to: Reply<()>,
    },
    // Cursor commands; only meaningful while the worker is serving an open
    // statement.
    FetchNext {
        respond_to: Reply<Option<Vec<RowValues>>>,
    },
    Restart {
        respond_to: Reply<()>,
    },
    Finish {
        respond_to: Sender<()>,
    },
    Shutdown,
}
