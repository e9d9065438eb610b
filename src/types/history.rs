use serde::{Deserialize, Serialize};

/// A single row of the `history` table: one visited page.
///
/// `visit_date` is SQLite `DATETIME('now')` text, refreshed on every visit;
/// `visit_count` counts repeat visits to the same address.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HistoryEntry {
    pub id: i64,
    pub address: String,
    pub title: String,
    pub visit_count: i64,
    pub visit_date: String,
}
