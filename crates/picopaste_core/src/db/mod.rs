//! Database layer for Picopaste.

/// Owner lock handling.
pub mod lock;
/// Paste storage helpers.
pub mod paste;
/// redb table definitions.
pub mod tables;

use crate::error::AppError;
use std::path::{Path, PathBuf};
use std::sync::Arc;

pub use paste::{PasteScan, PasteStore};

#[cfg(test)]
mod tests;

/// Open database handle.
///
/// Owns the redb file and the directory owner lock. Open it once at process
/// start and share it through [`Arc`]; dropping the last handle closes the
/// file and releases the lock.
pub struct Database {
    pub db: Arc<redb::Database>,
    pub pastes: PasteStore,
    path: PathBuf,
    _owner_lock: lock::OwnerLockGuard,
}

impl Database {
    /// Open (or create) the database stored in directory `path`.
    ///
    /// # Returns
    /// A fully initialized [`Database`] with a consistent digest index.
    ///
    /// # Errors
    /// Returns an error if another process holds the directory, or redb cannot
    /// open the file or its tables.
    pub fn open(path: impl AsRef<Path>) -> Result<Self, AppError> {
        let path = path.as_ref().to_path_buf();
        let owner_lock = lock::acquire_owner_lock(&path)?;

        let file_path = path.join(tables::REDB_FILE_NAME);
        let db = Arc::new(redb::Database::create(&file_path)?);
        let pastes = PasteStore::new(db.clone())?;

        if pastes.needs_reconcile_digest_index()? {
            tracing::warn!("Paste digest index out of sync; rebuilding");
            let written = pastes.rebuild_digest_index()?;
            tracing::info!("Rebuilt paste digest index with {} entries", written);
        }

        Ok(Self {
            db,
            pastes,
            path,
            _owner_lock: owner_lock,
        })
    }

    /// Directory this database was opened from.
    pub fn path(&self) -> &Path {
        &self.path
    }
}
