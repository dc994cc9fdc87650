mod schema;

use std::path::Path;

use rusqlite::Connection;
use tracing::warn;

use crate::error::Result;
use schema::INITIAL_SCHEMA;

/// Database wrapper providing connection management and schema initialization.
pub struct Database {
    conn: Connection,
}

impl Database {
    /// Opens an in-memory SQLite database.
    ///
    /// Automatically initializes the schema on connection open.
    pub fn in_memory() -> Result<Self> {
        let conn = Connection::open_in_memory()?;
        let db = Self { conn };
        db.initialize_schema()?;
        Ok(db)
    }

    /// Opens a file-based SQLite database at the given path.
    ///
    /// Creates the database file if it does not exist.
    /// Automatically initializes the schema on connection open.
    pub fn open(path: impl AsRef<Path>) -> Result<Self> {
        let conn = Connection::open(path)?;
        let db = Self { conn };
        db.initialize_schema()?;
        Ok(db)
    }

    /// Enables foreign keys and applies the schema.
    ///
    /// Foreign keys are a per-connection setting in SQLite and must be on
    /// for the link table to reject unknown note and tag ids.
    fn initialize_schema(&self) -> Result<()> {
        self.conn.execute("PRAGMA foreign_keys = ON", [])?;
        self.conn.execute_batch(INITIAL_SCHEMA)?;
        Ok(())
    }

    /// Returns a reference to the underlying connection.
    pub fn connection(&self) -> &Connection {
        &self.conn
    }

    /// Runs `work` inside a `BEGIN IMMEDIATE` transaction.
    ///
    /// The write lock is taken up front, so two writers never interleave
    /// their statements. Commits when `work` returns `Ok`, rolls back
    /// otherwise and returns the original error.
    pub fn write_transaction<T>(&self, work: impl FnOnce(&Connection) -> Result<T>) -> Result<T> {
        let conn = &self.conn;
        conn.execute_batch("BEGIN IMMEDIATE")?;

        let result = work(conn).and_then(|value| {
            conn.execute_batch("COMMIT")?;
            Ok(value)
        });

        if let Err(e) = &result
            && !conn.is_autocommit()
        {
            warn!(error = %e, "rolling back write transaction");
            conn.execute_batch("ROLLBACK").ok();
        }

        result
    }
}
