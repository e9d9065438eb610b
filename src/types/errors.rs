use std::fmt;

// === BookmarkError ===

/// Errors related to bookmark storage and export operations.
#[derive(Debug)]
pub enum BookmarkError {
    /// A required string was empty, an id was negative, or the URL scheme
    /// is not storable (local-file URLs are rejected).
    InvalidArgument(String),
    /// The referenced parent folder id does not exist or is not a folder.
    FolderNotFound(i64),
    /// An identical bookmark or folder already exists under that parent.
    AlreadyExists(String),
    /// The export target path could not be opened.
    FileNotFound(String),
    /// The parent-pointer forest revisited a folder id or exceeded the
    /// depth guard during traversal.
    CorruptTree(i64),
    /// Database operation failed.
    DatabaseError(String),
}

impl fmt::Display for BookmarkError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            BookmarkError::InvalidArgument(msg) => write!(f, "Invalid argument: {}", msg),
            BookmarkError::FolderNotFound(id) => write!(f, "Bookmark folder not found: {}", id),
            BookmarkError::AlreadyExists(what) => write!(f, "Bookmark already exists: {}", what),
            BookmarkError::FileNotFound(path) => write!(f, "Export file not found: {}", path),
            BookmarkError::CorruptTree(id) => {
                write!(f, "Corrupt bookmark tree at folder: {}", id)
            }
            BookmarkError::DatabaseError(msg) => {
                write!(f, "Bookmark database error: {}", msg)
            }
        }
    }
}

impl std::error::Error for BookmarkError {}

impl From<rusqlite::Error> for BookmarkError {
    fn from(err: rusqlite::Error) -> Self {
        BookmarkError::DatabaseError(err.to_string())
    }
}

// === HistoryError ===

/// Errors related to browsing history operations.
#[derive(Debug)]
pub enum HistoryError {
    /// A required string was empty or an id was negative.
    InvalidArgument(String),
    /// Database operation failed.
    DatabaseError(String),
}

impl fmt::Display for HistoryError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            HistoryError::InvalidArgument(msg) => write!(f, "Invalid argument: {}", msg),
            HistoryError::DatabaseError(msg) => write!(f, "History database error: {}", msg),
        }
    }
}

impl std::error::Error for HistoryError {}

impl From<rusqlite::Error> for HistoryError {
    fn from(err: rusqlite::Error) -> Self {
        HistoryError::DatabaseError(err.to_string())
    }
}
