//! Chlorine data lookup and audit service.

use std::sync::Arc;

use chrono::NaiveDate;
use serde_json::json;
use tracing::warn;

use crate::domain::audit::{AuditReport, build_audit};
use crate::domain::entities::ChlorineData;
use crate::domain::repositories::{ChlorineRepository, UtilityRepository};
use crate::error::AppError;
use crate::infrastructure::cache::CacheService;

/// Reads chlorine data through the cache (cache-aside).
///
/// Writes never go through this service; [`super::RecordService`]
/// invalidates cached entries after each write.
pub struct ChlorineService<C, U>
where
    C: ChlorineRepository + ?Sized,
    U: UtilityRepository + ?Sized,
{
    chlorine_repository: Arc<C>,
    utility_repository: Arc<U>,
    cache: Arc<dyn CacheService>,
}

impl<C, U> ChlorineService<C, U>
where
    C: ChlorineRepository + ?Sized,
    U: UtilityRepository + ?Sized,
{
    pub fn new(
        chlorine_repository: Arc<C>,
        utility_repository: Arc<U>,
        cache: Arc<dyn CacheService>,
    ) -> Self {
        Self {
            chlorine_repository,
            utility_repository,
            cache,
        }
    }

    /// Returns the chlorine record of a utility.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::NotFound`] if the utility has no chlorine data.
    /// Returns [`AppError::Internal`] on database errors.
    pub async fn chlorine_for_utility(&self, pwsid: &str) -> Result<ChlorineData, AppError> {
        match self.cache.get_chlorine(pwsid).await {
            Ok(Some(data)) => return Ok(data),
            Ok(None) => {}
            Err(e) => warn!(pwsid, error = %e, "Cache read failed"),
        }

        let data = self
            .chlorine_repository
            .find_by_pwsid(pwsid)
            .await?
            .ok_or_else(|| {
                AppError::not_found(
                    "No chlorine data available for this utility",
                    json!({ "pwsid": pwsid }),
                )
            })?;

        if let Err(e) = self.cache.set_chlorine(&data, None).await {
            warn!(pwsid, error = %e, "Cache write failed");
        }

        Ok(data)
    }

    pub async fn list(&self) -> Result<Vec<ChlorineData>, AppError> {
        self.chlorine_repository.list().await
    }

    /// Reports how fresh the chlorine data of every active utility is.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::Validation`] if `stale_after_days` is negative.
    pub async fn audit(&self, today: NaiveDate, stale_after_days: i64) -> Result<AuditReport, AppError> {
        if stale_after_days < 0 {
            return Err(AppError::bad_request(
                "stale_after_days must not be negative",
                json!({ "stale_after_days": stale_after_days }),
            ));
        }

        let utilities = self.utility_repository.list(true).await?;
        let chlorine = self.chlorine_repository.list().await?;

        Ok(build_audit(&utilities, chlorine, today, stale_after_days))
    }
}
