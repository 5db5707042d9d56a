//! Repository trait for administrative writes to reference data.

use crate::domain::entities::{Record, RecordKey, StoredRecord};
use crate::error::AppError;
use async_trait::async_trait;

/// Generic insert-or-replace and delete over the reference tables.
///
/// # Implementations
///
/// - [`crate::infrastructure::persistence::PgRecordStore`] - PostgreSQL implementation
/// - Test mocks available with `cfg(test)`
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait RecordStore: Send + Sync {
    /// Inserts the record, or replaces every field of the row with the same key.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::Validation`] if the record references a utility that
    /// does not exist.
    /// Returns [`AppError::Internal`] on database errors.
    async fn upsert(&self, record: Record) -> Result<StoredRecord, AppError>;

    /// Deletes the row with the given key and returns the number of rows removed.
    ///
    /// Deleting a utility cascades to its ZIP mappings and chlorine record.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::Internal`] on database errors.
    async fn delete(&self, key: RecordKey) -> Result<u64, AppError>;

    /// Deletes chlorine records marked as estimated and returns their PWSIDs.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::Internal`] on database errors.
    async fn delete_estimated_chlorine(&self) -> Result<Vec<String>, AppError>;
}
