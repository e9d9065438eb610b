//! webmarks — an embedded bookmark and browsing-history data-access layer.
//!
//! Bookmarks and folders live in one flat SQLite table linked by parent
//! pointers; this crate maintains the ordered forest, materializes
//! per-folder listings, and exports the tree as a Netscape bookmark file.
//! This library crate exposes all modules for use by the demo binary and
//! integration tests.

pub mod database;
pub mod managers;
pub mod services;
pub mod types;
