//! Core library for Picopaste: paste storage, identifiers, dedup and
//! admission control.

/// Per-client admission control.
pub mod admission;
/// Configuration loading and defaults.
pub mod config;
/// Shared constants.
pub mod constants;
/// Database access layer.
pub mod db;
/// Content deduplication.
pub mod dedup;
/// Application error types.
pub mod error;
/// Identifier and client models.
pub mod models;
/// Paste identifier generation.
pub mod naming;
/// Submit/fetch orchestration.
pub mod service;

#[cfg(test)]
pub(crate) mod test_support;

pub use admission::{Admission, AdmissionController};
pub use config::Config;
pub use constants::*;
pub use db::Database;
pub use dedup::DedupMode;
pub use error::AppError;
pub use models::{ClientKey, PasteId};
pub use service::PasteService;
