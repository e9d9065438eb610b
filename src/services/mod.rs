// webmarks services
// Services build on the managers without owning state of their own.

pub mod bookmark_exporter;
