//! Exclusive owner lock for the database directory.

use crate::constants::DB_OWNER_LOCK_FILE_NAME;
use crate::error::AppError;
use fs2::FileExt;
use std::fs::{self, File, OpenOptions};
use std::path::{Path, PathBuf};

/// Process-lifetime owner lock guard.
///
/// Keeping this value alive holds an exclusive OS lock on `db.owner.lock`.
pub struct OwnerLockGuard {
    file: File,
    lock_path: PathBuf,
}

impl Drop for OwnerLockGuard {
    fn drop(&mut self) {
        if let Err(err) = self.file.unlock() {
            tracing::warn!(
                "Failed to release owner lock {:?} during drop: {}",
                self.lock_path,
                err
            );
        }
    }
}

/// Return the owner lock file path for a database directory.
pub fn owner_lock_path(db_path: &Path) -> PathBuf {
    db_path.join(DB_OWNER_LOCK_FILE_NAME)
}

/// Acquire and hold an exclusive owner lock for the process lifetime.
///
/// # Returns
/// [`OwnerLockGuard`] that keeps the owner lock held until dropped.
///
/// # Errors
/// Returns [`AppError::StorageMessage`] when the lock file cannot be opened or
/// another process already holds it.
pub fn acquire_owner_lock(db_path: &Path) -> Result<OwnerLockGuard, AppError> {
    fs::create_dir_all(db_path).map_err(|err| {
        AppError::StorageMessage(format!(
            "Failed to create database directory '{}': {}",
            db_path.display(),
            err
        ))
    })?;
    let lock_path = owner_lock_path(db_path);
    let file = OpenOptions::new()
        .create(true)
        .read(true)
        .write(true)
        .truncate(false)
        .open(&lock_path)
        .map_err(|err| {
            AppError::StorageMessage(format!(
                "Failed to open owner lock '{}': {}",
                lock_path.display(),
                err
            ))
        })?;

    match file.try_lock_exclusive() {
        Ok(()) => Ok(OwnerLockGuard { file, lock_path }),
        Err(err)
            if matches!(
                err.kind(),
                std::io::ErrorKind::WouldBlock | std::io::ErrorKind::PermissionDenied
            ) =>
        {
            Err(AppError::StorageMessage(format!(
                "Database '{}' is already open in another Picopaste process.\n\
                Stop it first, or set PICOPASTE_DB_PATH to a different location.",
                db_path.display()
            )))
        }
        Err(err) => Err(AppError::StorageMessage(format!(
            "Failed to acquire owner lock '{}': {}",
            lock_path.display(),
            err
        ))),
    }
}
