// Shared type definitions for the webmarks data layer.
// Each submodule defines types used across the crate.

pub mod bookmark;
pub mod errors;
pub mod history;
