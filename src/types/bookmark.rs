use serde::{Deserialize, Serialize};

/// Reserved id of the permanent root folder. The root is a real row
/// (`parent = 0`, `editable = 0`) seeded by the migrations; it is never
/// counted, listed, or deleted.
pub const ROOT_FOLDER_ID: i64 = 1;

/// Title of the root folder. Resolving this name as a folder name yields
/// `ROOT_FOLDER_ID` directly instead of creating a row.
pub const ROOT_FOLDER_TITLE: &str = "Bookmarks";

/// Discriminates the two kinds of rows sharing the `bookmarks` table.
///
/// Stored in the `type` column: 0 = bookmark, 1 = folder.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum NodeKind {
    Bookmark,
    Folder,
}

impl NodeKind {
    /// Maps the stored `type` column value to a kind. Any non-folder value
    /// is read back as a bookmark.
    pub fn from_column(value: i64) -> Self {
        if value == 1 {
            NodeKind::Folder
        } else {
            NodeKind::Bookmark
        }
    }

    /// The integer stored in the `type` column.
    pub fn as_column(self) -> i64 {
        match self {
            NodeKind::Bookmark => 0,
            NodeKind::Folder => 1,
        }
    }
}

/// One row of the `bookmarks` table: either a bookmark or a folder.
///
/// `address` is only meaningful for bookmarks; a folder's address is never
/// read. Timestamps are stored as SQLite `DATETIME('now')` text
/// ("YYYY-MM-DD HH:MM:SS", UTC).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BookmarkNode {
    pub id: i64,
    pub kind: NodeKind,
    pub parent_id: i64,
    pub address: Option<String>,
    pub title: String,
    pub created_at: String,
    pub updated_at: String,
    pub sequence: i64,
    pub editable: bool,
}

impl BookmarkNode {
    pub fn is_folder(&self) -> bool {
        self.kind == NodeKind::Folder
    }
}

/// A favicon image payload stored inline on a bookmark or history row.
///
/// The blob is always an owned copy; nothing aliases SQLite's row memory.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Favicon {
    pub data: Vec<u8>,
    pub width: i32,
    pub height: i32,
}
