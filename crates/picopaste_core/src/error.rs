//! Application error types for the paste store and service.
use std::time::Duration;
use thiserror::Error;

/// Top-level application error type.
#[derive(Error, Debug)]
pub enum AppError {
    #[error("Database error: {0}")]
    Database(#[from] redb::Error),

    #[error("Storage error: {0}")]
    StorageMessage(String),

    #[error("Paste content is empty")]
    EmptyContent,

    #[error("Paste size exceeds maximum of {limit} bytes")]
    PayloadTooLarge { limit: usize },

    #[error("Rate limited; retry in {}s", .retry_after.as_secs().max(1))]
    RateLimited { retry_after: Duration },

    #[error("Not found")]
    NotFound,

    /// The identifier is already mapped to content. Raised by insert-only
    /// writes and consumed by the submit retry loop.
    #[error("Paste id '{0}' already exists")]
    IdentifierTaken(String),
}

impl AppError {
    /// Whether this error originates from the storage layer rather than the
    /// request.
    ///
    /// # Returns
    /// `true` for database and storage failures.
    pub fn is_store_fault(&self) -> bool {
        matches!(self, Self::Database(_) | Self::StorageMessage(_))
    }
}

impl From<redb::DatabaseError> for AppError {
    fn from(value: redb::DatabaseError) -> Self {
        Self::Database(value.into())
    }
}

impl From<redb::TransactionError> for AppError {
    fn from(value: redb::TransactionError) -> Self {
        Self::Database(value.into())
    }
}

impl From<redb::TableError> for AppError {
    fn from(value: redb::TableError) -> Self {
        Self::Database(value.into())
    }
}

impl From<redb::StorageError> for AppError {
    fn from(value: redb::StorageError) -> Self {
        Self::Database(value.into())
    }
}

impl From<redb::CommitError> for AppError {
    fn from(value: redb::CommitError) -> Self {
        Self::Database(value.into())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn store_fault_classification_covers_storage_variants_only() {
        assert!(AppError::StorageMessage("disk gone".to_string()).is_store_fault());
        assert!(!AppError::EmptyContent.is_store_fault());
        assert!(!AppError::NotFound.is_store_fault());
        assert!(!AppError::IdentifierTaken("abcdefgh".to_string()).is_store_fault());
        assert!(!AppError::RateLimited {
            retry_after: Duration::from_secs(3)
        }
        .is_store_fault());
    }

    #[test]
    fn rate_limited_message_rounds_up_to_one_second() {
        let err = AppError::RateLimited {
            retry_after: Duration::from_millis(200),
        };
        assert_eq!(err.to_string(), "Rate limited; retry in 1s");
    }
}
