use crate::error::SqlCursorError;
use crate::results::rows::Rows;
use crate::sqlite::SqliteConnection;
use crate::sqlite::params::convert_named_params;
use crate::sqlite::worker::ExecuteOutcome;
use crate::types::RowValues;

/// Result of executing one statement.
#[derive(Debug)]
pub enum QueryResult<'conn> {
    /// Driver-reported number of rows changed by a mutating statement
    /// (INSERT/UPDATE/DELETE/DDL).
    RowsAffected(usize),
    /// Cursor over a SELECT's result set.
    Rows(Rows<'conn>),
}

impl<'conn> QueryResult<'conn> {
    #[must_use]
    pub fn rows_affected(&self) -> Option<usize> {
        match self {
            QueryResult::RowsAffected(count) => Some(*count),
            QueryResult::Rows(_) => None,
        }
    }

    #[must_use]
    pub fn into_rows(self) -> Option<Rows<'conn>> {
        match self {
            QueryResult::Rows(rows) => Some(rows),
            QueryResult::RowsAffected(_) => None,
        }
    }
}

/// Query, transaction, and table-maintenance entry point over one
/// exclusively owned connection.
///
/// The connection is acquired by the caller, owned by the executor for its
/// lifetime, and released (worker and all) when the executor is dropped.
#[derive(Debug)]
pub struct Executor {
    connection: SqliteConnection,
}

impl Executor {
    #[must_use]
    pub fn new(connection: SqliteConnection) -> Self {
        Self { connection }
    }

    /// Execute a statement, binding each `(name, value)` pair to the named
    /// placeholder `:name`.
    ///
    /// A statement that produces no column metadata reports its affected-row
    /// count; a SELECT hands back a [`Rows`] cursor that borrows this
    /// executor until it is dropped.
    ///
    /// # Errors
    /// Returns [`SqlCursorError`] if parameter conversion fails or the
    /// driver reports an execution failure. No partial results: a query
    /// either fully succeeds or fully fails.
    pub fn execute(
        &mut self,
        query: &str,
        params: &[(&str, RowValues)],
    ) -> Result<QueryResult<'_>, SqlCursorError> {
        tracing::debug!(query, params = params.len(), "executing statement");
        let converted = convert_named_params(params)?;
        match self.connection.execute(query.to_owned(), converted)? {
            ExecuteOutcome::RowsAffected(count) => Ok(QueryResult::RowsAffected(count)),
            ExecuteOutcome::Cursor {
                column_names,
                row_count,
            } => {
                let rows = Rows::new(&self.connection, column_names, row_count)?;
                Ok(QueryResult::Rows(rows))
            }
        }
    }

    /// Run a multi-statement SQL script. The script is wrapped in a driver
    /// transaction when the connection is in autocommit mode.
    ///
    /// # Errors
    /// Returns [`SqlCursorError`] if any statement in the script fails; the
    /// wrapping transaction rolls the script back.
    pub fn execute_batch(&mut self, sql: &str) -> Result<(), SqlCursorError> {
        self.connection.execute_batch(sql.to_owned())
    }

    /// Begin a transaction on the connection. Direct delegation: no nested
    /// transactions, no savepoints.
    ///
    /// # Errors
    /// Returns [`SqlCursorError`] if the driver refuses (e.g. a transaction
    /// is already open).
    pub fn begin_transaction(&mut self) -> Result<(), SqlCursorError> {
        self.connection.begin()
    }

    /// Commit the open transaction.
    ///
    /// # Errors
    /// Returns [`SqlCursorError`] if the driver reports a failure.
    pub fn commit(&mut self) -> Result<(), SqlCursorError> {
        self.connection.commit()
    }

    /// Roll back the open transaction.
    ///
    /// # Errors
    /// Returns [`SqlCursorError`] if the driver reports a failure.
    pub fn rollback(&mut self) -> Result<(), SqlCursorError> {
        self.connection.rollback()
    }

    /// Rename a table. The identifiers are interpolated into the SQL text
    /// as-is; callers are trusted to supply safe names.
    ///
    /// # Errors
    /// Returns [`SqlCursorError`] if the source table is missing or the
    /// target name collides.
    pub fn rename_table(&mut self, old_name: &str, new_name: &str) -> Result<(), SqlCursorError> {
        let query = format!("ALTER TABLE {old_name} RENAME TO {new_name}");
        self.execute(&query, &[])?;
        Ok(())
    }

    /// Swap two tables by renaming through a uniquely named temporary table.
    /// The three renames run as one transactional batch, so other
    /// connections observe either the old state or the new state, never a
    /// missing table. Identifiers are interpolated as-is; callers are
    /// trusted to supply safe names.
    ///
    /// # Errors
    /// Returns [`SqlCursorError`] if either table is missing; the batch
    /// rolls back and neither table is altered.
    pub fn swap_tables(&mut self, table1: &str, table2: &str) -> Result<(), SqlCursorError> {
        let tmp_table = temp_table_name(table1);
        tracing::debug!(table1, table2, tmp_table = %tmp_table, "swapping tables");
        let batch = format!(
            "ALTER TABLE {table2} RENAME TO {tmp_table};\n\
             ALTER TABLE {table1} RENAME TO {table2};\n\
             ALTER TABLE {tmp_table} RENAME TO {table1};"
        );
        self.connection.execute_batch(batch)
    }

    /// Delete every row of a table (`SQLite` has no TRUNCATE statement) and
    /// return the driver-reported count. The identifier is interpolated
    /// as-is; callers are trusted to supply a safe name.
    ///
    /// # Errors
    /// Returns [`SqlCursorError`] if the table does not exist.
    pub fn truncate(&mut self, table: &str) -> Result<usize, SqlCursorError> {
        let query = format!("DELETE FROM {table}");
        match self.execute(&query, &[])? {
            QueryResult::RowsAffected(count) => Ok(count),
            QueryResult::Rows(_) => Err(SqlCursorError::ExecutionError(
                "truncate unexpectedly produced a result set".into(),
            )),
        }
    }
}

// Unique enough for a name that exists only inside one batch: no two swaps
// in one process share a (pid, nanosecond) pair.
fn temp_table_name(table: &str) -> String {
    let pid = std::process::id();
    let nanos = std::time::SystemTime::now()
        .duration_since(std::time::UNIX_EPOCH)
        .map(|elapsed| elapsed.as_nanos())
        .unwrap_or_default();
    format!("{table}_tmp{pid}_{nanos}")
}
