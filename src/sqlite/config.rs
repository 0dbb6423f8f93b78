/// Options for opening a `SQLite` database.
#[derive(Debug, Clone)]
pub struct SqliteOptions {
    pub db_path: String,
    /// Apply `PRAGMA journal_mode = WAL` after opening. Ignored by in-memory
    /// databases.
    pub journal_wal: bool,
}

impl SqliteOptions {
    #[must_use]
    pub fn new(db_path: impl Into<String>) -> Self {
        Self {
            db_path: db_path.into(),
            journal_wal: false,
        }
    }

    #[must_use]
    pub fn with_wal(mut self, journal_wal: bool) -> Self {
        self.journal_wal = journal_wal;
        self
    }
}
