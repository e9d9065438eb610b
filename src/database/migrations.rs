//! Schema migrations for the webmarks SQLite database.
//!
//! Uses a `schema_version` table to track which migrations have been applied.
//! Each migration runs exactly once and is recorded with a timestamp.

use rusqlite::Connection;

use crate::types::bookmark::{ROOT_FOLDER_ID, ROOT_FOLDER_TITLE};

/// Current schema version. Bump this when adding a new migration.
pub const CURRENT_SCHEMA_VERSION: i32 = 1;

/// Returns the current schema version from the database (0 if table doesn't exist).
pub fn get_schema_version(conn: &Connection) -> i32 {
    conn.query_row(
        "SELECT COALESCE(MAX(version), 0) FROM schema_version",
        [],
        |row| row.get(0),
    )
    .unwrap_or(0)
}

/// Runs all pending schema migrations against the provided connection.
///
/// Migrations are versioned — each runs exactly once and is recorded in
/// the `schema_version` table. Safe to call on every startup.
///
/// # Errors
/// Returns `rusqlite::Error` if any SQL statement fails.
pub fn run_all(conn: &Connection) -> Result<(), rusqlite::Error> {
    // Enable WAL and foreign keys (always, not versioned)
    conn.execute_batch(
        "PRAGMA journal_mode = WAL;
         PRAGMA foreign_keys = ON;
         CREATE TABLE IF NOT EXISTS schema_version (
             version INTEGER PRIMARY KEY,
             applied_at INTEGER NOT NULL,
             description TEXT NOT NULL
         );",
    )?;

    let current = get_schema_version(conn);

    if current < 1 {
        migration_v1(conn)?;
        record_version(conn, 1, "Initial schema: bookmarks and history tables")?;
    }

    // The root folder row is seeded outside the versioned migrations so a
    // database whose rows were wiped by hand heals itself on the next open.
    seed_root_folder(conn)?;

    Ok(())
}

fn record_version(
    conn: &Connection,
    version: i32,
    description: &str,
) -> Result<(), rusqlite::Error> {
    let now = std::time::SystemTime::now()
        .duration_since(std::time::UNIX_EPOCH)
        .unwrap_or_default()
        .as_secs() as i64;
    conn.execute(
        "INSERT OR IGNORE INTO schema_version (version, applied_at, description) VALUES (?1, ?2, ?3)",
        rusqlite::params![version, now, description],
    )?;
    Ok(())
}

/// V1: the `bookmarks` tree table and the flat `history` table.
///
/// Folders and bookmarks share the `bookmarks` table, distinguished by the
/// `type` column (0 = bookmark, 1 = folder). `parent` points at another row's
/// `id`; the root row uses `parent = 0` so `parent != 0` filters exclude it.
fn migration_v1(conn: &Connection) -> Result<(), rusqlite::Error> {
    conn.execute_batch(
        "
        CREATE TABLE IF NOT EXISTS bookmarks (
            id INTEGER PRIMARY KEY AUTOINCREMENT,
            type INTEGER NOT NULL DEFAULT 0,
            parent INTEGER NOT NULL DEFAULT 1,
            address TEXT,
            title TEXT NOT NULL,
            creationdate TEXT NOT NULL DEFAULT (DATETIME('now')),
            updatedate TEXT NOT NULL DEFAULT (DATETIME('now')),
            sequence INTEGER NOT NULL DEFAULT 0,
            editable INTEGER NOT NULL DEFAULT 1,
            accesscount INTEGER NOT NULL DEFAULT 0,
            favicon BLOB,
            favicon_length INTEGER NOT NULL DEFAULT 0,
            favicon_w INTEGER NOT NULL DEFAULT 0,
            favicon_h INTEGER NOT NULL DEFAULT 0
        );

        CREATE INDEX IF NOT EXISTS idx_bookmarks_parent ON bookmarks(parent);

        CREATE TABLE IF NOT EXISTS history (
            id INTEGER PRIMARY KEY AUTOINCREMENT,
            address TEXT NOT NULL,
            title TEXT NOT NULL,
            counter INTEGER NOT NULL DEFAULT 1,
            visitdate TEXT NOT NULL DEFAULT (DATETIME('now')),
            favicon BLOB,
            favicon_length INTEGER NOT NULL DEFAULT 0,
            favicon_w INTEGER NOT NULL DEFAULT 0,
            favicon_h INTEGER NOT NULL DEFAULT 0
        );

        CREATE INDEX IF NOT EXISTS idx_history_address ON history(address);
        CREATE INDEX IF NOT EXISTS idx_history_visitdate ON history(visitdate);
        ",
    )
}

/// Ensures the permanent root folder row exists with its reserved id.
///
/// `INSERT OR IGNORE` keeps this idempotent: exactly one root row, created
/// lazily on first open. The root is not editable and has no parent row
/// (`parent = 0`).
fn seed_root_folder(conn: &Connection) -> Result<(), rusqlite::Error> {
    conn.execute(
        "INSERT OR IGNORE INTO bookmarks
             (id, type, parent, title, creationdate, updatedate, sequence, editable)
         VALUES (?1, 1, 0, ?2, DATETIME('now'), DATETIME('now'), 0, 0)",
        rusqlite::params![ROOT_FOLDER_ID, ROOT_FOLDER_TITLE],
    )?;
    Ok(())
}
