// webmarks storage managers
// Managers wrap the SQLite connection with domain operations: the bookmark
// tree and the flat browsing history.

pub mod bookmark_manager;
pub mod history_manager;
