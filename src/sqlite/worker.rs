// Worker thread that owns the rusqlite connection. Statements and their row
// iterators borrow the connection, so they can never leave this thread; the
// public handle talks to it over a command channel instead.

pub(crate) mod channel;
pub(crate) mod dispatcher;
pub(crate) mod manager;

pub(crate) use channel::ExecuteOutcome;
pub(crate) use manager::SqliteWorker;
