//! Bookmark manager for webmarks.
//!
//! Implements [`BookmarkStore`] — CRUD, existence checks, and sibling
//! ordering over the single `bookmarks` table, backed by SQLite via
//! `rusqlite`. Folders and bookmarks share the table, distinguished by
//! the `type` column; the permanent root folder has the reserved id
//! [`ROOT_FOLDER_ID`] and is excluded from every count, listing, and
//! delete by the `parent != 0` filter.
//!
//! Uniqueness rules: a bookmark is keyed on `(address, title, parent)`,
//! a folder on `(title, parent)`. Sibling order is the append-only
//! `sequence` column; deletions leave gaps.

use rusqlite::{params, Connection, OptionalExtension};

use crate::types::bookmark::{BookmarkNode, Favicon, NodeKind, ROOT_FOLDER_ID, ROOT_FOLDER_TITLE};
use crate::types::errors::BookmarkError;

/// Trait defining the bookmark repository operations.
///
/// `BookmarkManager` is the SQLite implementation; an alternate backend
/// (e.g. a sync-service store) plugs in behind the same interface.
pub trait BookmarkStore {
    /// The reserved id of the root folder.
    fn root_folder_id(&self) -> i64 {
        ROOT_FOLDER_ID
    }

    fn add_bookmark(&mut self, url: &str, title: &str, parent_id: i64)
        -> Result<i64, BookmarkError>;
    fn add_folder(&mut self, title: &str, parent_id: i64) -> Result<i64, BookmarkError>;
    /// High-level add: resolves `folder_name` under the root (creating the
    /// folder if needed), then adds the bookmark there. An absent or empty
    /// name places the bookmark directly under the root.
    fn add_bookmark_in_folder(
        &mut self,
        url: &str,
        title: &str,
        folder_name: Option<&str>,
    ) -> Result<i64, BookmarkError>;
    fn resolve_or_create_folder(&mut self, name: &str) -> Result<i64, BookmarkError>;
    fn folder_exists(&self, name: &str) -> Result<bool, BookmarkError>;
    /// Deleting an id that does not exist is success, not an error.
    fn delete_bookmark(&mut self, id: i64) -> Result<(), BookmarkError>;
    fn delete_all_bookmarks(&mut self) -> Result<(), BookmarkError>;
    /// Number of bookmarks (not folders) directly under `folder_id`.
    fn count_at(&self, folder_id: i64) -> Result<i64, BookmarkError>;
    /// Number of folders in the whole tree, root excluded.
    fn count_folders(&self) -> Result<i64, BookmarkError>;
    /// Number of bookmarks and folders in the whole tree, root excluded.
    fn count_all(&self) -> Result<i64, BookmarkError>;
    /// Bookmarks (not folders) directly under `folder_id`, by sequence.
    fn list_at(&self, folder_id: i64) -> Result<Vec<BookmarkNode>, BookmarkError>;
    /// Every folder in the table (flat, not nested), by sequence.
    fn list_folders(&self) -> Result<Vec<BookmarkNode>, BookmarkError>;
    /// One-level fetch of all children of `folder_id`, folders and
    /// bookmarks interleaved, by sequence. The exporter recurses on this.
    fn children_of(&self, folder_id: i64) -> Result<Vec<BookmarkNode>, BookmarkError>;
    fn get_favicon(&self, id: i64) -> Result<Option<Favicon>, BookmarkError>;
    /// Stores the favicon blob inline on the row. Deliberately does not
    /// refresh `updatedate`; icon churn is not a content edit.
    fn set_favicon(&mut self, id: i64, favicon: &Favicon) -> Result<(), BookmarkError>;
    /// Streams every non-root row in sequence order. The visitor returns
    /// `true` to continue; `false` halts the iteration immediately.
    fn for_each(
        &self,
        visitor: &mut dyn FnMut(BookmarkNode) -> bool,
    ) -> Result<(), BookmarkError>;
}

/// Bookmark manager backed by a SQLite connection.
pub struct BookmarkManager<'a> {
    conn: &'a Connection,
}

const NODE_COLUMNS: &str =
    "id, type, parent, address, title, creationdate, updatedate, sequence, editable";

impl<'a> BookmarkManager<'a> {
    /// Creates a new `BookmarkManager` using the provided database connection.
    pub fn new(conn: &'a Connection) -> Self {
        Self { conn }
    }

    /// Max sequence value among direct children of `parent_id`, or 0 if none.
    /// New inserts use this plus one, so items always land last among siblings.
    fn last_sequence(&self, parent_id: i64) -> Result<i64, BookmarkError> {
        let seq: i64 = self.conn.query_row(
            "SELECT COALESCE(MAX(sequence), 0) FROM bookmarks WHERE parent = ?1",
            params![parent_id],
            |row| row.get(0),
        )?;
        Ok(seq)
    }

    /// Checks whether a folder row with the given id exists.
    fn folder_row_exists(&self, folder_id: i64) -> Result<bool, BookmarkError> {
        let count: i64 = self.conn.query_row(
            "SELECT COUNT(*) FROM bookmarks WHERE id = ?1 AND type = 1",
            params![folder_id],
            |row| row.get(0),
        )?;
        Ok(count > 0)
    }

    /// Looks up a folder by title under the given parent.
    fn folder_id_by_name(&self, name: &str, parent_id: i64) -> Result<Option<i64>, BookmarkError> {
        let id = self
            .conn
            .query_row(
                "SELECT id FROM bookmarks WHERE type = 1 AND title = ?1 AND parent = ?2",
                params![name, parent_id],
                |row| row.get(0),
            )
            .optional()?;
        Ok(id)
    }

    /// Duplicate check for bookmarks, keyed on `(address, title, parent)`.
    fn bookmark_exists(
        &self,
        url: &str,
        title: &str,
        parent_id: i64,
    ) -> Result<bool, BookmarkError> {
        let count: i64 = self.conn.query_row(
            "SELECT COUNT(*) FROM bookmarks \
             WHERE type = 0 AND address = ?1 AND title = ?2 AND parent = ?3",
            params![url, title, parent_id],
            |row| row.get(0),
        )?;
        Ok(count > 0)
    }

    /// Reads a single row into a `BookmarkNode`.
    fn row_to_node(row: &rusqlite::Row) -> rusqlite::Result<BookmarkNode> {
        let kind_column: i64 = row.get(1)?;
        let editable: i64 = row.get(8)?;
        Ok(BookmarkNode {
            id: row.get(0)?,
            kind: NodeKind::from_column(kind_column),
            parent_id: row.get(2)?,
            address: row.get(3)?,
            title: row.get(4)?,
            created_at: row.get(5)?,
            updated_at: row.get(6)?,
            sequence: row.get(7)?,
            editable: editable != 0,
        })
    }

    /// Runs a node-listing query with the shared column set.
    fn query_nodes<P: rusqlite::Params>(
        &self,
        where_clause: &str,
        bind: P,
    ) -> Result<Vec<BookmarkNode>, BookmarkError> {
        let sql = format!(
            "SELECT {} FROM bookmarks WHERE {} ORDER BY sequence",
            NODE_COLUMNS, where_clause
        );
        let mut stmt = self.conn.prepare(&sql)?;
        let rows = stmt.query_map(bind, Self::row_to_node)?;

        let mut results = Vec::new();
        for row in rows {
            results.push(row?);
        }
        Ok(results)
    }
}

impl<'a> BookmarkStore for BookmarkManager<'a> {
    /// Adds a new bookmark under an existing folder. Returns the new row id.
    fn add_bookmark(
        &mut self,
        url: &str,
        title: &str,
        parent_id: i64,
    ) -> Result<i64, BookmarkError> {
        if url.is_empty() {
            return Err(BookmarkError::InvalidArgument("url is empty".to_string()));
        }
        if title.is_empty() {
            return Err(BookmarkError::InvalidArgument("title is empty".to_string()));
        }
        if url.starts_with("file:") {
            return Err(BookmarkError::InvalidArgument(
                "local file URLs cannot be bookmarked".to_string(),
            ));
        }

        if !self.folder_row_exists(parent_id)? {
            return Err(BookmarkError::FolderNotFound(parent_id));
        }
        if self.bookmark_exists(url, title, parent_id)? {
            tracing::warn!(url, parent_id, "rejecting duplicate bookmark");
            return Err(BookmarkError::AlreadyExists(url.to_string()));
        }

        let sequence = self.last_sequence(parent_id)? + 1;
        self.conn.execute(
            "INSERT INTO bookmarks \
                 (type, parent, address, title, creationdate, updatedate, \
                  sequence, editable, accesscount) \
             VALUES (0, ?1, ?2, ?3, DATETIME('now'), DATETIME('now'), ?4, 1, 0)",
            params![parent_id, url, title, sequence],
        )?;
        Ok(self.conn.last_insert_rowid())
    }

    /// Adds a new folder under an existing folder. Returns the new row id.
    fn add_folder(&mut self, title: &str, parent_id: i64) -> Result<i64, BookmarkError> {
        if title.is_empty() {
            return Err(BookmarkError::InvalidArgument("title is empty".to_string()));
        }

        if !self.folder_row_exists(parent_id)? {
            return Err(BookmarkError::FolderNotFound(parent_id));
        }
        if self.folder_id_by_name(title, parent_id)?.is_some() {
            tracing::warn!(title, parent_id, "rejecting duplicate folder");
            return Err(BookmarkError::AlreadyExists(title.to_string()));
        }

        let sequence = self.last_sequence(parent_id)? + 1;
        self.conn.execute(
            "INSERT INTO bookmarks \
                 (type, parent, title, creationdate, updatedate, sequence, editable) \
             VALUES (1, ?1, ?2, DATETIME('now'), DATETIME('now'), ?3, 1)",
            params![parent_id, title, sequence],
        )?;
        Ok(self.conn.last_insert_rowid())
    }

    fn add_bookmark_in_folder(
        &mut self,
        url: &str,
        title: &str,
        folder_name: Option<&str>,
    ) -> Result<i64, BookmarkError> {
        let parent_id = match folder_name {
            Some(name) => self.resolve_or_create_folder(name)?,
            None => ROOT_FOLDER_ID,
        };
        self.add_bookmark(url, title, parent_id)
    }

    /// Finds the folder named `name` under the root, creating it when
    /// absent. Idempotent: the same name always resolves to the same id
    /// once created. An empty name (or the root's own title) resolves to
    /// the root id directly.
    fn resolve_or_create_folder(&mut self, name: &str) -> Result<i64, BookmarkError> {
        if name.is_empty() || name == ROOT_FOLDER_TITLE {
            return Ok(ROOT_FOLDER_ID);
        }
        if let Some(id) = self.folder_id_by_name(name, ROOT_FOLDER_ID)? {
            return Ok(id);
        }
        let id = self.add_folder(name, ROOT_FOLDER_ID)?;
        tracing::debug!(name, id, "created bookmark folder");
        Ok(id)
    }

    fn folder_exists(&self, name: &str) -> Result<bool, BookmarkError> {
        if name.is_empty() {
            return Err(BookmarkError::InvalidArgument(
                "folder name is empty".to_string(),
            ));
        }
        Ok(self.folder_id_by_name(name, ROOT_FOLDER_ID)?.is_some())
    }

    /// Removes a bookmark or folder row by id. The root row is protected
    /// by the `parent != 0` guard; deleting an absent id is a no-op.
    fn delete_bookmark(&mut self, id: i64) -> Result<(), BookmarkError> {
        if id < 0 {
            return Err(BookmarkError::InvalidArgument("id is negative".to_string()));
        }
        let affected = self.conn.execute(
            "DELETE FROM bookmarks WHERE id = ?1 AND parent != 0",
            params![id],
        )?;
        if affected == 0 {
            tracing::debug!(id, "delete_bookmark matched no row");
        }
        Ok(())
    }

    /// Removes every row except the permanent root.
    fn delete_all_bookmarks(&mut self) -> Result<(), BookmarkError> {
        self.conn
            .execute("DELETE FROM bookmarks WHERE parent != 0", [])?;
        Ok(())
    }

    fn count_at(&self, folder_id: i64) -> Result<i64, BookmarkError> {
        let count: i64 = self.conn.query_row(
            "SELECT COUNT(*) FROM bookmarks WHERE parent = ?1 AND type = 0",
            params![folder_id],
            |row| row.get(0),
        )?;
        Ok(count)
    }

    fn count_folders(&self) -> Result<i64, BookmarkError> {
        let count: i64 = self.conn.query_row(
            "SELECT COUNT(*) FROM bookmarks WHERE type = 1 AND parent != 0",
            [],
            |row| row.get(0),
        )?;
        Ok(count)
    }

    fn count_all(&self) -> Result<i64, BookmarkError> {
        let count: i64 = self.conn.query_row(
            "SELECT COUNT(*) FROM bookmarks WHERE parent != 0",
            [],
            |row| row.get(0),
        )?;
        Ok(count)
    }

    fn list_at(&self, folder_id: i64) -> Result<Vec<BookmarkNode>, BookmarkError> {
        self.query_nodes("type = 0 AND parent = ?1", params![folder_id])
    }

    fn list_folders(&self) -> Result<Vec<BookmarkNode>, BookmarkError> {
        self.query_nodes("type = 1 AND parent != 0", [])
    }

    fn children_of(&self, folder_id: i64) -> Result<Vec<BookmarkNode>, BookmarkError> {
        self.query_nodes("parent = ?1", params![folder_id])
    }

    fn get_favicon(&self, id: i64) -> Result<Option<Favicon>, BookmarkError> {
        if id < 0 {
            return Err(BookmarkError::InvalidArgument("id is negative".to_string()));
        }
        let favicon = self
            .conn
            .query_row(
                "SELECT favicon, favicon_w, favicon_h FROM bookmarks \
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

    fn set_favicon(&mut self, id: i64, favicon: &Favicon) -> Result<(), BookmarkError> {
        if id < 0 {
            return Err(BookmarkError::InvalidArgument("id is negative".to_string()));
        }
        let affected = self.conn.execute(
            "UPDATE bookmarks \
             SET favicon = ?1, favicon_length = ?2, favicon_w = ?3, favicon_h = ?4 \
             WHERE id = ?5",
            params![
                favicon.data,
                favicon.data.len() as i64,
                favicon.width,
                favicon.height,
                id
            ],
        )?;
        if affected == 0 {
            tracing::debug!(id, "set_favicon matched no row");
        }
        Ok(())
    }

    fn for_each(
        &self,
        visitor: &mut dyn FnMut(BookmarkNode) -> bool,
    ) -> Result<(), BookmarkError> {
        let sql = format!(
            "SELECT {} FROM bookmarks WHERE parent != 0 ORDER BY sequence",
            NODE_COLUMNS
        );
        let mut stmt = self.conn.prepare(&sql)?;
        let rows = stmt.query_map([], Self::row_to_node)?;

        for row in rows {
            if !visitor(row?) {
                break;
            }
        }
        Ok(())
    }
}
