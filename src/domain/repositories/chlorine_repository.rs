//! Repository trait for chlorine measurements.

use crate::domain::entities::ChlorineData;
use crate::error::AppError;
use async_trait::async_trait;

/// Read access to per-utility chlorine statistics.
///
/// Writes go through [`super::RecordStore`].
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait ChlorineRepository: Send + Sync {
    /// Finds the chlorine record of a utility.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::Internal`] on database errors.
    async fn find_by_pwsid(&self, pwsid: &str) -> Result<Option<ChlorineData>, AppError>;

    /// Lists every chlorine record ordered by PWSID.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::Internal`] on database errors.
    async fn list(&self) -> Result<Vec<ChlorineData>, AppError>;
}
