//! Database integration tests.

use super::*;
use crate::error::AppError;
use crate::models::PasteId;
use crate::test_support::setup_temp_db;
use std::sync::{Arc, Barrier};
use std::thread;
use tempfile::TempDir;

fn id(value: &str) -> PasteId {
    PasteId::parse(value).expect("valid id")
}
