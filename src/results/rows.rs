use std::sync::Arc;

use crate::error::SqlCursorError;
use crate::results::row::DbRow;
use crate::sqlite::SqliteConnection;

/// Replayable cursor over an executed forward-only `SQLite` statement.
///
/// The statement stays open on the connection's worker thread for the
/// lifetime of the cursor; the cursor mutably borrows its [`Executor`], so
/// no other statement can run on the connection until it is dropped.
///
/// Forward movement fetches from the live statement. Backward movement is
/// emulated by re-executing the statement with the same bound parameters and
/// replaying it from the first row, so `get(i)` for an earlier index costs
/// O(i) fetches rather than O(1). This favors forward-only drivers over
/// seekable cursors.
///
/// [`Executor`]: crate::executor::Executor
#[derive(Debug)]
pub struct Rows<'conn> {
    connection: &'conn SqliteConnection,
    column_names: Arc<Vec<String>>,
    count: usize,
    position: usize,
    current: Option<DbRow>,
    all: Option<Vec<DbRow>>,
}

impl<'conn> Rows<'conn> {
    /// Bind a cursor to the statement currently being served by the worker
    /// and pre-fetch the first row.
    pub(crate) fn new(
        connection: &'conn SqliteConnection,
        column_names: Arc<Vec<String>>,
        count: usize,
    ) -> Result<Self, SqlCursorError> {
        let mut rows = Self {
            connection,
            column_names,
            count,
            position: 0,
            current: None,
            all: None,
        };
        rows.current = rows.fetch_next()?;
        Ok(rows)
    }

    fn fetch_next(&self) -> Result<Option<DbRow>, SqlCursorError> {
        let values = self.connection.fetch_next()?;
        Ok(values.map(|values| DbRow::new(Arc::clone(&self.column_names), values)))
    }

    /// Total number of rows in the result set. Fixed at execution time;
    /// iteration and rewinding never change it.
    #[must_use]
    pub fn len(&self) -> usize {
        self.count
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.count == 0
    }

    /// Zero-based position of the current row. Equals [`len`](Self::len)
    /// once the cursor is exhausted.
    #[must_use]
    pub fn position(&self) -> usize {
        self.position
    }

    /// Column names of the result set.
    #[must_use]
    pub fn column_names(&self) -> &[String] {
        &self.column_names
    }

    /// The row at the current position, or `None` when the cursor is
    /// exhausted.
    #[must_use]
    pub fn current(&self) -> Option<&DbRow> {
        self.current.as_ref()
    }

    /// Fetch the next row and move the position forward. A no-op once the
    /// cursor is exhausted.
    ///
    /// The declared count and the rows actually fetchable are trusted to
    /// agree; if the statement runs dry early the cursor simply becomes
    /// exhausted.
    ///
    /// # Errors
    /// Returns [`SqlCursorError`] if fetching from the statement fails.
    pub fn advance(&mut self) -> Result<(), SqlCursorError> {
        if self.current.is_none() {
            return Ok(());
        }
        match self.fetch_next()? {
            Some(row) => {
                self.position += 1;
                self.current = Some(row);
            }
            None => {
                self.position = self.count;
                self.current = None;
            }
        }
        Ok(())
    }

    /// Re-execute the statement (same SQL, same parameters) and reset the
    /// cursor to the first row. A no-op at position 0. The only way the
    /// cursor moves backward.
    ///
    /// # Errors
    /// Returns [`SqlCursorError`] if re-executing the statement fails.
    pub fn rewind(&mut self) -> Result<(), SqlCursorError> {
        if self.position == 0 {
            return Ok(());
        }
        self.connection.restart_statement()?;
        self.position = 0;
        self.current = self.fetch_next()?;
        Ok(())
    }

    /// Random positional access by replay.
    ///
    /// Out-of-range indices return `Ok(None)` rather than an error. An index
    /// behind the current position rewinds first, then the cursor advances
    /// until the requested row is reached.
    ///
    /// # Errors
    /// Returns [`SqlCursorError`] if re-executing or fetching fails while
    /// walking to the requested index.
    pub fn get(&mut self, index: usize) -> Result<Option<DbRow>, SqlCursorError> {
        if index >= self.count {
            return Ok(None);
        }
        if index < self.position {
            self.rewind()?;
        }
        while self.position < index && self.current.is_some() {
            self.advance()?;
        }
        Ok(self.current.clone())
    }

    /// Drain the result set into an ordered, cached sequence of rows.
    ///
    /// The first call rewinds to the first row and fetches everything; every
    /// later call returns the same cached rows without touching the
    /// statement, no matter how `get` or iteration has moved the cursor in
    /// between.
    ///
    /// # Errors
    /// Returns [`SqlCursorError`] if draining the statement fails while the
    /// cache is first populated.
    pub fn materialize_all(&mut self) -> Result<&[DbRow], SqlCursorError> {
        if self.all.is_none() {
            self.rewind()?;
            let mut rows = Vec::with_capacity(self.count);
            while let Some(row) = self.current.as_ref() {
                rows.push(row.clone());
                self.advance()?;
            }
            self.all = Some(rows);
        }
        Ok(self.all.as_deref().unwrap_or_default())
    }

    /// The cursor is read-only; rows cannot be replaced through it.
    ///
    /// # Errors
    /// Always returns [`SqlCursorError::UnsupportedOperation`]; cursor state
    /// is left untouched.
    pub fn set(&mut self, _index: usize, _row: DbRow) -> Result<(), SqlCursorError> {
        Err(SqlCursorError::UnsupportedOperation(
            "setting a row through the cursor is not supported".into(),
        ))
    }

    /// The cursor is read-only; rows cannot be removed through it.
    ///
    /// # Errors
    /// Always returns [`SqlCursorError::UnsupportedOperation`]; cursor state
    /// is left untouched.
    pub fn unset(&mut self, _index: usize) -> Result<(), SqlCursorError> {
        Err(SqlCursorError::UnsupportedOperation(
            "unsetting a row through the cursor is not supported".into(),
        ))
    }

    /// Iterate from the current position. The iterator shares the cursor's
    /// position; call [`rewind`](Self::rewind) first to iterate from the
    /// start again.
    pub fn iter(&mut self) -> RowsIter<'_, 'conn> {
        RowsIter { rows: self }
    }
}

impl Drop for Rows<'_> {
    fn drop(&mut self) {
        // Releases the statement: the worker leaves its serving loop.
        self.connection.finish_statement();
    }
}

/// Iterator over a [`Rows`] cursor; reads the current row, then advances.
#[derive(Debug)]
pub struct RowsIter<'a, 'conn> {
    rows: &'a mut Rows<'conn>,
}

impl Iterator for RowsIter<'_, '_> {
    type Item = Result<DbRow, SqlCursorError>;

    fn next(&mut self) -> Option<Self::Item> {
        let row = self.rows.current()?.clone();
        if let Err(err) = self.rows.advance() {
            return Some(Err(err));
        }
        Some(Ok(row))
    }
}

impl<'a, 'conn> IntoIterator for &'a mut Rows<'conn> {
    type Item = Result<DbRow, SqlCursorError>;
    type IntoIter = RowsIter<'a, 'conn>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}
