//! Exposure calculation service.

use std::sync::Arc;

use crate::domain::entities::{ChlorineData, ServedUtility};
use crate::domain::exposure::{CalculationResult, ExposureInput, estimate};
use crate::domain::repositories::{ChlorineRepository, UtilityRepository};
use crate::error::AppError;

use super::{ChlorineService, UtilityService};

/// A calculation for the utility serving a ZIP code.
#[derive(Debug, Clone, PartialEq)]
pub struct CalculationRequest {
    pub zip_code: String,
    /// Picks one of several utilities serving the ZIP code.
    pub pwsid: Option<String>,
    pub glasses_per_day: f64,
    pub glass_volume_liters: Option<f64>,
    pub shower_minutes: Option<f64>,
}

/// Estimate together with the data it was computed from.
#[derive(Debug, Clone, PartialEq)]
pub struct CalculationOutcome {
    pub zip_code: String,
    pub utility: ServedUtility,
    pub chlorine: ChlorineData,
    pub result: CalculationResult,
}

/// Runs exposure estimates against stored chlorine data or user-supplied levels.
pub struct CalculatorService<U, C>
where
    U: UtilityRepository + ?Sized,
    C: ChlorineRepository + ?Sized,
{
    utility_service: Arc<UtilityService<U>>,
    chlorine_service: Arc<ChlorineService<C, U>>,
    default_glass_volume_liters: f64,
}

impl<U, C> CalculatorService<U, C>
where
    U: UtilityRepository + ?Sized,
    C: ChlorineRepository + ?Sized,
{
    pub fn new(
        utility_service: Arc<UtilityService<U>>,
        chlorine_service: Arc<ChlorineService<C, U>>,
        default_glass_volume_liters: f64,
    ) -> Self {
        Self {
            utility_service,
            chlorine_service,
            default_glass_volume_liters,
        }
    }

    /// Resolves the utility for the ZIP code, loads its chlorine average and
    /// estimates exposure from it.
    ///
    /// # Errors
    ///
    /// - [`AppError::Validation`] for a malformed ZIP code or invalid consumption figures
    /// - [`AppError::NotFound`] when no utility or no chlorine data exists
    pub async fn calculate(&self, request: CalculationRequest) -> Result<CalculationOutcome, AppError> {
        let utility = self
            .utility_service
            .resolve_utility(&request.zip_code, request.pwsid.as_deref())
            .await?;

        let chlorine = self
            .chlorine_service
            .chlorine_for_utility(&utility.utility.pwsid)
            .await?;

        let input = self.input(
            chlorine.average_chlorine_ppm,
            request.glasses_per_day,
            request.glass_volume_liters,
            request.shower_minutes,
        );
        let result = estimate(&input)?;

        metrics::counter!("chlorine_calculations_total", "source" => "zip_code").increment(1);
        tracing::debug!(
            zip_code = %request.zip_code,
            pwsid = %utility.utility.pwsid,
            chlorine_ppm = chlorine.average_chlorine_ppm,
            "Calculated exposure"
        );

        Ok(CalculationOutcome {
            zip_code: request.zip_code,
            utility,
            chlorine,
            result,
        })
    }

    /// Estimates exposure from a chlorine level supplied by the caller.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::Validation`] for out-of-range inputs.
    pub fn estimate(
        &self,
        chlorine_ppm: f64,
        glasses_per_day: f64,
        glass_volume_liters: Option<f64>,
        shower_minutes: Option<f64>,
    ) -> Result<CalculationResult, AppError> {
        let input = self.input(chlorine_ppm, glasses_per_day, glass_volume_liters, shower_minutes);
        let result = estimate(&input)?;

        metrics::counter!("chlorine_calculations_total", "source" => "manual_ppm").increment(1);
        Ok(result)
    }

    fn input(
        &self,
        chlorine_ppm: f64,
        glasses_per_day: f64,
        glass_volume_liters: Option<f64>,
        shower_minutes: Option<f64>,
    ) -> ExposureInput {
        ExposureInput {
            chlorine_ppm,
            glasses_per_day,
            glass_volume_liters: glass_volume_liters.unwrap_or(self.default_glass_volume_liters),
            shower_minutes,
        }
    }
}
