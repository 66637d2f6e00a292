//! HTTP request handlers.

/// Embedded static assets.
pub mod assets;
/// Paste submit and view endpoints.
pub mod paste;
