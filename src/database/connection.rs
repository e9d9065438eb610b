//! SQLite database connection management for webmarks.
//!
//! Provides the [`Database`] struct that wraps a `rusqlite::Connection`
//! and automatically runs schema migrations on open.

use rusqlite::Connection;
use std::path::Path;

use super::migrations;

/// Core database wrapper providing SQLite connection management.
///
/// The `Database` struct owns a `rusqlite::Connection` and ensures the
/// `bookmarks` and `history` tables exist when the database is opened.
/// The connection is released when the value is dropped, on every exit
/// path. No handle is ever stored in a global or thread-local slot;
/// callers that share one database file across threads must serialize
/// access externally.
pub struct Database {
    conn: Connection,
}

impl Database {
    /// Opens (or creates) a SQLite database at the given file path and runs migrations.
    ///
    /// # Errors
    /// Returns `rusqlite::Error` if the connection cannot be established or migrations fail.
    pub fn open<P: AsRef<Path>>(path: P) -> Result<Self, rusqlite::Error> {
        let conn = Connection::open(path)?;
        let db = Self { conn };
        db.run_migrations()?;
        Ok(db)
    }

    /// Opens an in-memory SQLite database and runs migrations.
    ///
    /// Useful for testing — the database is discarded when the `Database` is dropped.
    ///
    /// # Errors
    /// Returns `rusqlite::Error` if the connection cannot be established or migrations fail.
    pub fn open_in_memory() -> Result<Self, rusqlite::Error> {
        let conn = Connection::open_in_memory()?;
        let db = Self { conn };
        db.run_migrations()?;
        Ok(db)
    }

    /// Opens the database at `path`, runs `op` against the connection, and
    /// closes the connection before returning.
    ///
    /// The connection is released on every exit path, including when `op`
    /// returns an error.
    pub fn with_connection<P, T, F>(path: P, op: F) -> Result<T, rusqlite::Error>
    where
        P: AsRef<Path>,
        F: FnOnce(&Connection) -> Result<T, rusqlite::Error>,
    {
        let db = Self::open(path)?;
        op(&db.conn)
    }

    /// Runs all schema migrations, creating tables and indexes if they do not exist.
    ///
    /// Idempotent and safe to call on every startup.
    fn run_migrations(&self) -> Result<(), rusqlite::Error> {
        migrations::run_all(&self.conn)
    }

    /// Returns a reference to the underlying `rusqlite::Connection`.
    ///
    /// This allows the managers and the exporter to execute queries
    /// against the database.
    pub fn connection(&self) -> &Connection {
        &self.conn
    }
}
