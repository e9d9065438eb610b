//! History manager for webmarks.
//!
//! Implements [`HistoryStore`] — recording visits, streaming, and clearing
//! browsing history rows, backed by SQLite via `rusqlite`. Unlike the
//! bookmark table, `history` is a flat relation with no tree structure.

use rusqlite::{params, Connection, OptionalExtension};

use crate::types::bookmark::Favicon;
use crate::types::errors::HistoryError;
use crate::types::history::HistoryEntry;

/// Trait defining history storage operations.
pub trait HistoryStore {
    /// Records a visit. A repeat visit to a known address increments its
    /// counter and refreshes the visit date. Returns the row id.
    fn record_visit(&mut self, url: &str, title: &str) -> Result<i64, HistoryError>;
    fn count(&self) -> Result<i64, HistoryError>;
    /// Streams every entry, most recent visit first. The visitor returns
    /// `true` to continue; `false` halts the iteration immediately.
    fn for_each(&self, visitor: &mut dyn FnMut(HistoryEntry) -> bool)
        -> Result<(), HistoryError>;
    /// Deleting an id that does not exist is success, not an error.
    fn delete_entry(&mut self, id: i64) -> Result<(), HistoryError>;
    fn delete_by_url(&mut self, url: &str) -> Result<(), HistoryError>;
    fn delete_all(&mut self) -> Result<(), HistoryError>;
    /// Deletes entries visited between `begin` and `end` (inclusive),
    /// both "YYYY-MM-DD HH:MM:SS". An empty `end` means "now".
    fn delete_between(&mut self, begin: &str, end: &str) -> Result<(), HistoryError>;
    fn get_favicon(&self, id: i64) -> Result<Option<Favicon>, HistoryError>;
}

/// History manager backed by a SQLite connection.
pub struct HistoryManager<'a> {
    conn: &'a Connection,
}

impl<'a> HistoryManager<'a> {
    /// Creates a new `HistoryManager` using the provided database connection.
    pub fn new(conn: &'a Connection) -> Self {
        Self { conn }
    }

    /// Reads a single `HistoryEntry` row into a struct.
    fn row_to_entry(row: &rusqlite::Row) -> rusqlite::Result<HistoryEntry> {
        Ok(HistoryEntry {
            id: row.get(0)?,
            address: row.get(1)?,
            title: row.get(2)?,
            visit_count: row.get(3)?,
            visit_date: row.get(4)?,
        })
    }
}

impl<'a> HistoryStore for HistoryManager<'a> {
    fn record_visit(&mut self, url: &str, title: &str) -> Result<i64, HistoryError> {
        if url.is_empty() {
            return Err(HistoryError::InvalidArgument("url is empty".to_string()));
        }

        let existing: Option<i64> = self
            .conn
            .query_row(
                "SELECT id FROM history WHERE address = ?1",
                params![url],
                |row| row.get(0),
            )
            .optional()?;

        match existing {
            Some(id) => {
                self.conn.execute(
                    "UPDATE history SET counter = counter + 1, \
                         visitdate = DATETIME('now'), title = ?1 \
                     WHERE id = ?2",
                    params![title, id],
                )?;
                Ok(id)
            }
            None => {
                self.conn.execute(
                    "INSERT INTO history (address, title, counter, visitdate) \
                     VALUES (?1, ?2, 1, DATETIME('now'))",
                    params![url, title],
                )?;
                Ok(self.conn.last_insert_rowid())
            }
        }
    }

    fn count(&self) -> Result<i64, HistoryError> {
        let count: i64 = self
            .conn
            .query_row("SELECT COUNT(*) FROM history", [], |row| row.get(0))?;
        Ok(count)
    }

    fn for_each(
        &self,
        visitor: &mut dyn FnMut(HistoryEntry) -> bool,
    ) -> Result<(), HistoryError> {
        let mut stmt = self.conn.prepare(
            "SELECT id, address, title, counter, visitdate \
             FROM history ORDER BY visitdate DESC",
        )?;
        let rows = stmt.query_map([], Self::row_to_entry)?;

        for row in rows {
            if !visitor(row?) {
                break;
            }
        }
        Ok(())
    }

    fn delete_entry(&mut self, id: i64) -> Result<(), HistoryError> {
        if id < 0 {
            return Err(HistoryError::InvalidArgument("id is negative".to_string()));
        }
        self.conn
            .execute("DELETE FROM history WHERE id = ?1", params![id])?;
        Ok(())
    }

    fn delete_by_url(&mut self, url: &str) -> Result<(), HistoryError> {
        if url.is_empty() {
            return Err(HistoryError::InvalidArgument("url is empty".to_string()));
        }
        self.conn
            .execute("DELETE FROM history WHERE address = ?1", params![url])?;
        Ok(())
    }

    fn delete_all(&mut self) -> Result<(), HistoryError> {
        self.conn.execute("DELETE FROM history", [])?;
        Ok(())
    }

    fn delete_between(&mut self, begin: &str, end: &str) -> Result<(), HistoryError> {
        if begin.is_empty() {
            return Err(HistoryError::InvalidArgument(
                "begin date is empty".to_string(),
            ));
        }
        // An empty end date means "up to now".
        let end = if end.is_empty() { "now" } else { end };
        let affected = self.conn.execute(
            "DELETE FROM history \
             WHERE visitdate BETWEEN DATETIME(?1) AND DATETIME(?2)",
            params![begin, end],
        )?;
        tracing::debug!(begin, end, affected, "deleted history rows by term");
        Ok(())
    }

    fn get_favicon(&self, id: i64) -> Result<Option<Favicon>, HistoryError> {
        if id < 0 {
            return Err(HistoryError::InvalidArgument("id is negative".to_string()));
        }
        let favicon = self
            .conn
            .query_row(
                "SELECT favicon, favicon_w, favicon_h FROM history \
                 WHERE id = ?1 AND favicon IS NOT NULL",
                params![id],
                |row| {
                    Ok(Favicon {
                        data: row.get(0)?,
                        width: row.get(1)?,
                        height: row.get(2)?,
                    })
                },
            )
            .optional()?;
        Ok(favicon)
    }
}
