use std::sync::Arc;
use std::sync::mpsc::Receiver;

use rusqlite::ToSql;
use rusqlite::types::Value;

use crate::error::SqlCursorError;
use crate::sqlite::query::fetch_row;

use super::channel::{Command, ExecuteOutcome, Reply};

enum Flow {
    Continue,
    Shutdown,
}

pub(super) fn run_sqlite_worker(mut conn: rusqlite::Connection, receiver: &Receiver<Command>) {
    while let Ok(command) = receiver.recv() {
        match command {
            Command::Shutdown => break,
            Command::Execute {
                query,
                params,
                respond_to,
            } => {
                if let Flow::Shutdown = run_execute(&conn, &query, &params, &respond_to, receiver)
                {
                    break;
                }
            }
            Command::ExecuteBatch { query, respond_to } => {
                let _ = respond_to.send(execute_batch(&mut conn, &query));
            }
            Command::Begin { respond_to } => {
                let _ = respond_to.send(run_transaction_statement(&conn, "BEGIN TRANSACTION"));
            }
            Command::Commit { respond_to } => {
                let _ = respond_to.send(run_transaction_statement(&conn, "COMMIT"));
            }
            Command::Rollback { respond_to } => {
                let _ = respond_to.send(run_transaction_statement(&conn, "ROLLBACK"));
            }
            Command::FetchNext { respond_to } => {
                let _ = respond_to.send(Err(no_statement_error()));
            }
            Command::Restart { respond_to } => {
                let _ = respond_to.send(Err(no_statement_error()));
            }
            Command::Finish { respond_to } => {
                let _ = respond_to.send(());
            }
        }
    }
}

/// Prepare and run one statement. A statement without column metadata is a
/// mutating statement and replies with its affected-row count; anything else
/// replies with the result shape, then parks in [`serve_cursor`] until the
/// caller releases the statement.
fn run_execute(
    conn: &rusqlite::Connection,
    query: &str,
    params: &[(String, Value)],
    respond_to: &Reply<ExecuteOutcome>,
    receiver: &Receiver<Command>,
) -> Flow {
    let mut stmt = match conn.prepare(query) {
        Ok(stmt) => stmt,
        Err(err) => {
            let _ = respond_to.send(Err(err.into()));
            return Flow::Continue;
        }
    };
    let param_refs: Vec<(&str, &dyn ToSql)> = params
        .iter()
        .map(|(name, value)| (name.as_str(), value as &dyn ToSql))
        .collect();

    if stmt.column_count() == 0 {
        let outcome = stmt
            .execute(&param_refs[..])
            .map(ExecuteOutcome::RowsAffected)
            .map_err(SqlCursorError::from);
        let _ = respond_to.send(outcome);
        return Flow::Continue;
    }

    let column_names: Arc<Vec<String>> = Arc::new(
        stmt.column_names()
            .iter()
            .map(|name| (*name).to_string())
            .collect(),
    );
    // SQLite reports no result-set size up front: establish the fixed count
    // by draining the statement once, then replay it for the cursor.
    let row_count = match count_rows(&mut stmt, &param_refs) {
        Ok(count) => count,
        Err(err) => {
            let _ = respond_to.send(Err(err));
            return Flow::Continue;
        }
    };
    let column_count = column_names.len();
    tracing::trace!(row_count, "serving statement cursor");
    let _ = respond_to.send(Ok(ExecuteOutcome::Cursor {
        column_names,
        row_count,
    }));
    serve_cursor(&mut stmt, &param_refs, column_count, receiver)
}

fn count_rows(
    stmt: &mut rusqlite::Statement<'_>,
    params: &[(&str, &dyn ToSql)],
) -> Result<usize, SqlCursorError> {
    let mut rows = stmt.query(params)?;
    let mut count = 0;
    while rows.next()?.is_some() {
        count += 1;
    }
    Ok(count)
}

/// Hold the executed statement open and answer cursor commands until the
/// cursor is released. `Restart` drops the open rows (resetting the
/// statement) and re-executes it with the same bound parameters.
fn serve_cursor(
    stmt: &mut rusqlite::Statement<'_>,
    params: &[(&str, &dyn ToSql)],
    column_count: usize,
    receiver: &Receiver<Command>,
) -> Flow {
    loop {
        let mut rows = match stmt.query(params) {
            Ok(rows) => rows,
            Err(err) => return serve_broken_statement(&err.to_string(), receiver),
        };
        loop {
            let Ok(command) = receiver.recv() else {
                return Flow::Shutdown;
            };
            match command {
                Command::FetchNext { respond_to } => {
                    let _ = respond_to.send(fetch_row(&mut rows, column_count));
                }
                Command::Restart { respond_to } => {
                    let _ = respond_to.send(Ok(()));
                    break;
                }
                Command::Finish { respond_to } => {
                    let _ = respond_to.send(());
                    return Flow::Continue;
                }
                Command::Shutdown => return Flow::Shutdown,
                other => refuse_while_serving(other),
            }
        }
    }
}

/// Replaying the statement failed after the cursor was handed out; keep
/// answering its commands with the failure until it is released.
fn serve_broken_statement(message: &str, receiver: &Receiver<Command>) -> Flow {
    loop {
        let Ok(command) = receiver.recv() else {
            return Flow::Shutdown;
        };
        match command {
            Command::FetchNext { respond_to } => {
                let _ = respond_to.send(Err(SqlCursorError::ExecutionError(message.to_string())));
            }
            Command::Restart { respond_to } => {
                let _ = respond_to.send(Err(SqlCursorError::ExecutionError(message.to_string())));
            }
            Command::Finish { respond_to } => {
                let _ = respond_to.send(());
                return Flow::Continue;
            }
            Command::Shutdown => return Flow::Shutdown,
            other => refuse_while_serving(other),
        }
    }
}

fn refuse_while_serving(command: Command) {
    match command {
        Command::Execute { respond_to, .. } => {
            let _ = respond_to.send(Err(statement_active_error()));
        }
        Command::ExecuteBatch { respond_to, .. }
        | Command::Begin { respond_to }
        | Command::Commit { respond_to }
        | Command::Rollback { respond_to } => {
            let _ = respond_to.send(Err(statement_active_error()));
        }
        // Handled by the serving loops themselves.
        Command::FetchNext { .. }
        | Command::Restart { .. }
        | Command::Finish { .. }
        | Command::Shutdown => {}
    }
}

fn execute_batch(conn: &mut rusqlite::Connection, query: &str) -> Result<(), SqlCursorError> {
    if conn.is_autocommit() {
        let tx = conn.transaction()?;
        tx.execute_batch(query)?;
        tx.commit()?;
        Ok(())
    } else {
        conn.execute_batch(query)?;
        Ok(())
    }
}

fn run_transaction_statement(
    conn: &rusqlite::Connection,
    sql: &str,
) -> Result<(), SqlCursorError> {
    conn.execute_batch(sql)?;
    Ok(())
}

fn no_statement_error() -> SqlCursorError {
    SqlCursorError::ExecutionError("no statement is being served on this connection".into())
}

fn statement_active_error() -> SqlCursorError {
    SqlCursorError::ExecutionError("a statement cursor is active on this connection".into())
}
