//! Water utility lookup service.

use std::sync::Arc;

use crate::domain::entities::{ServedUtility, WaterUtility};
use crate::domain::repositories::UtilityRepository;
use crate::error::AppError;
use crate::utils::format::is_zip_code;
use serde_json::json;

/// Resolves ZIP codes and PWSIDs to water utilities.
pub struct UtilityService<R: UtilityRepository + ?Sized> {
    repository: Arc<R>,
}

impl<R: UtilityRepository + ?Sized> UtilityService<R> {
    pub fn new(repository: Arc<R>) -> Self {
        Self { repository }
    }

    /// Lists the utilities serving a ZIP code, primary mapping first.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::Validation`] if the ZIP code is not five digits.
    /// Returns [`AppError::NotFound`] if no utility is mapped to it.
    pub async fn utilities_for_zip(&self, zip_code: &str) -> Result<Vec<ServedUtility>, AppError> {
        if !is_zip_code(zip_code) {
            return Err(AppError::bad_request(
                "Invalid zip code format",
                json!({ "zip_code": zip_code, "expected": "5 digits" }),
            ));
        }

        let utilities = self.repository.find_by_zip_code(zip_code).await?;
        if utilities.is_empty() {
            return Err(AppError::not_found(
                "No water utilities found for this zip code",
                json!({ "zip_code": zip_code }),
            ));
        }

        Ok(utilities)
    }

    /// Picks the utility a calculation for `zip_code` should use.
    ///
    /// An explicit `pwsid` must be one of the utilities mapped to the ZIP code.
    /// Without one, the primary mapping wins, falling back to the first listed.
    ///
    /// # Errors
    ///
    /// See [`Self::utilities_for_zip`]. Also returns [`AppError::NotFound`] if
    /// `pwsid` does not serve the ZIP code.
    pub async fn resolve_utility(
        &self,
        zip_code: &str,
        pwsid: Option<&str>,
    ) -> Result<ServedUtility, AppError> {
        let utilities = self.utilities_for_zip(zip_code).await?;

        let chosen = match pwsid {
            Some(pwsid) => utilities
                .into_iter()
                .find(|s| s.utility.pwsid == pwsid)
                .ok_or_else(|| {
                    AppError::not_found(
                        "Water utility does not serve this zip code",
                        json!({ "zip_code": zip_code, "pwsid": pwsid }),
                    )
                })?,
            None => {
                let index = utilities.iter().position(|s| s.is_primary).unwrap_or(0);
                utilities.into_iter().nth(index).ok_or_else(|| {
                    AppError::not_found(
                        "No water utilities found for this zip code",
                        json!({ "zip_code": zip_code }),
                    )
                })?
            }
        };

        Ok(chosen)
    }

    /// # Errors
    ///
    /// Returns [`AppError::NotFound`] if no utility has this PWSID.
    pub async fn get_utility(&self, pwsid: &str) -> Result<WaterUtility, AppError> {
        self.repository
            .find_by_pwsid(pwsid)
            .await?
            .ok_or_else(|| AppError::not_found("Water utility not found", json!({ "pwsid": pwsid })))
    }

    pub async fn list_utilities(&self, only_active: bool) -> Result<Vec<WaterUtility>, AppError> {
        self.repository.list(only_active).await
    }
}
