//! Repository trait for water utility lookups.

use crate::domain::entities::{ServedUtility, WaterUtility};
use crate::error::AppError;
use async_trait::async_trait;

/// Read access to water utilities and their ZIP code mappings.
///
/// # Implementations
///
/// - [`crate::infrastructure::persistence::PgUtilityRepository`] - PostgreSQL implementation
/// - Test mocks available with `cfg(test)`
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait UtilityRepository: Send + Sync {
    /// Finds a utility by its PWSID.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::Internal`] on database errors.
    async fn find_by_pwsid(&self, pwsid: &str) -> Result<Option<WaterUtility>, AppError>;

    /// Lists the utilities mapped to a ZIP code.
    ///
    /// Ordered primary mapping first, then by population served (largest first).
    /// An unknown ZIP code yields an empty list.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::Internal`] on database errors.
    async fn find_by_zip_code(&self, zip_code: &str) -> Result<Vec<ServedUtility>, AppError>;

    /// Lists all utilities ordered by PWSID.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::Internal`] on database errors.
    async fn list(&self, only_active: bool) -> Result<Vec<WaterUtility>, AppError>;
}
