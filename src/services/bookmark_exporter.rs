//! Netscape bookmark-file exporter for webmarks.
//!
//! Walks the folder tree depth-first in sequence order and renders it as a
//! `NETSCAPE-Bookmark-file-1` document, the legacy interchange format other
//! browsers import. The preamble is reproduced byte-exact for
//! interoperability.
//!
//! Traversal is driven by an explicit frame stack instead of call-stack
//! recursion, with a visited-id set and a depth guard: a parent-pointer
//! cycle or a pathologically deep tree fails with
//! [`BookmarkError::CorruptTree`] instead of looping or overflowing.

use std::collections::HashSet;
use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::Path;

use crate::managers::bookmark_manager::BookmarkStore;
use crate::types::bookmark::BookmarkNode;
use crate::types::errors::BookmarkError;

/// Upper bound on folder nesting during export.
pub const MAX_EXPORT_DEPTH: usize = 64;

/// Fixed header of the Netscape bookmark file format. Importers match on
/// this text; do not reformat it.
const PREAMBLE: &str = "<!DOCTYPE NETSCAPE-Bookmark-file-1>\n\
<!-- This is an automatically generated file.\n\
It will be read and overwritten.\n\
Do Not Edit! -->\n\
<META HTTP-EQUIV=\"Content-Type\" CONTENT=\"text/html; charset=UTF-8\">\n\
<TITLE>Bookmarks</TITLE>\n\
<H1>Bookmarks</H1>\n\
<DL><p>\n";

/// One open folder level: the remaining children to emit and the nesting
/// depth (root children are depth 0).
struct Frame {
    children: std::vec::IntoIter<BookmarkNode>,
    depth: usize,
}

/// Renders the bookmark tree of any [`BookmarkStore`] implementation.
pub struct BookmarkExporter<'a> {
    store: &'a dyn BookmarkStore,
}

impl<'a> BookmarkExporter<'a> {
    pub fn new(store: &'a dyn BookmarkStore) -> Self {
        Self { store }
    }

    /// Exports the tree rooted at `root_folder_id` into a file at `path`.
    ///
    /// Fails with `FileNotFound` when the path cannot be opened. On a
    /// mid-export failure the partially written file is left on disk as-is.
    pub fn export_to_file<P: AsRef<Path>>(
        &self,
        root_folder_id: i64,
        path: P,
    ) -> Result<(), BookmarkError> {
        let path = path.as_ref();
        let file = File::create(path)
            .map_err(|_| BookmarkError::FileNotFound(path.display().to_string()))?;
        let mut sink = BufWriter::new(file);
        self.export_tree(root_folder_id, &mut sink)?;
        sink.flush().map_err(write_failed)?;
        tracing::debug!(path = %path.display(), "exported bookmark file");
        Ok(())
    }

    /// Writes the whole tree rooted at `root_folder_id` into `sink`:
    /// depth-first, pre-order, siblings in sequence order. Folders become
    /// nested `<DL><p>` blocks, bookmarks become `<DT><A ...>` lines.
    /// Indentation grows one tab per nesting level (cosmetic only).
    pub fn export_tree<W: Write>(
        &self,
        root_folder_id: i64,
        sink: &mut W,
    ) -> Result<(), BookmarkError> {
        sink.write_all(PREAMBLE.as_bytes()).map_err(write_failed)?;

        let mut visited: HashSet<i64> = HashSet::new();
        visited.insert(root_folder_id);

        let mut stack = vec![Frame {
            children: self.store.children_of(root_folder_id)?.into_iter(),
            depth: 0,
        }];

        while let Some(frame) = stack.last_mut() {
            let depth = frame.depth;
            match frame.children.next() {
                Some(node) if node.is_folder() => {
                    if !visited.insert(node.id) {
                        tracing::warn!(id = node.id, "folder revisited during export");
                        return Err(BookmarkError::CorruptTree(node.id));
                    }
                    if depth + 1 >= MAX_EXPORT_DEPTH {
                        return Err(BookmarkError::CorruptTree(node.id));
                    }
                    let indent = "\t".repeat(depth + 1);
                    let add_date = datetime_to_epoch(&node.created_at);
                    write!(
                        sink,
                        "{indent}<DT><H3 FOLDED ADD_DATE=\"{add_date}\">{}</H3>\n{indent}<DL><p>\n",
                        node.title
                    )
                    .map_err(write_failed)?;
                    let children = self.store.children_of(node.id)?.into_iter();
                    stack.push(Frame {
                        children,
                        depth: depth + 1,
                    });
                }
                Some(node) => {
                    let indent = "\t".repeat(depth + 1);
                    let add_date = datetime_to_epoch(&node.created_at);
                    let visit_date = datetime_to_epoch(&node.updated_at);
                    write!(
                        sink,
                        "{indent}<DT><A HREF=\"{}\" ADD_DATE=\"{add_date}\" \
                         LAST_VISIT=\"{visit_date}\" LAST_MODIFIED=\"{visit_date}\">{}</A>\n",
                        node.address.as_deref().unwrap_or(""),
                        node.title
                    )
                    .map_err(write_failed)?;
                }
                None => {
                    stack.pop();
                    let indent = "\t".repeat(depth);
                    write!(sink, "{indent}</DL><p>\n").map_err(write_failed)?;
                }
            }
        }
        Ok(())
    }
}

fn write_failed(err: std::io::Error) -> BookmarkError {
    BookmarkError::DatabaseError(format!("export write failed: {}", err))
}

/// Converts a stored "YYYY-MM-DD HH:MM:SS" timestamp to Unix epoch seconds.
///
/// Conversion failure is not fatal anywhere in the exporter: an empty,
/// missing, or unparseable date degrades to 0 and the entry is still
/// emitted.
pub fn datetime_to_epoch(datetime: &str) -> i64 {
    parse_datetime(datetime).filter(|secs| *secs >= 0).unwrap_or(0)
}

fn parse_datetime(datetime: &str) -> Option<i64> {
    let (date, time) = match datetime.split_once(' ') {
        Some((date, time)) => (date, time),
        None => (datetime, ""),
    };

    let mut parts = date.split('-');
    let year: i64 = parts.next()?.parse().ok()?;
    let month: i64 = parts.next()?.parse().ok()?;
    let day: i64 = parts.next()?.parse().ok()?;
    if parts.next().is_some() || !(1..=12).contains(&month) {
        return None;
    }
    if !(1..=days_in_month(year, month)).contains(&day) {
        return None;
    }

    let (hour, minute, second) = if time.is_empty() {
        (0, 0, 0)
    } else {
        let mut parts = time.split(':');
        let hour: i64 = parts.next()?.parse().ok()?;
        let minute: i64 = parts.next()?.parse().ok()?;
        let second: i64 = parts.next()?.parse().ok()?;
        if parts.next().is_some() || hour > 23 || minute > 59 || second > 59 {
            return None;
        }
        (hour, minute, second)
    };

    // Days-from-civil conversion (UTC), no leap seconds.
    let mut y = year;
    let mut m = month;
    if m <= 2 {
        y -= 1;
        m += 12;
    }
    let days = 365 * y + y / 4 - y / 100 + y / 400 + (153 * (m - 3) + 2) / 5 + day - 719469;
    Some(days * 86400 + hour * 3600 + minute * 60 + second)
}

fn days_in_month(year: i64, month: i64) -> i64 {
    match month {
        4 | 6 | 9 | 11 => 30,
        2 => {
            if year % 4 == 0 && (year % 100 != 0 || year % 400 == 0) {
                29
            } else {
                28
            }
        }
        _ => 31,
    }
}
