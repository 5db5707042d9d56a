//! Tap-water chlorine exposure estimate.
//!
//! Converts a utility's chlorine concentration and a household's drinking and
//! showering habits into milligrams of chlorine and the volume of household
//! bleach holding the same amount.
//!
//! Everything here is a pure function of its inputs: no I/O, no shared state,
//! safe to call from any number of request handlers at once. Looking up the
//! concentration for a postal code is the caller's job (see
//! [`crate::application::services::CalculatorService`]).
//!
//! # Formulas
//!
//! ```text
//! chlorine_per_glass = chlorine_ppm * glass_volume_liters            (mg)
//! chlorine_per_year  = chlorine_per_glass * glasses_per_day * 365    (mg)
//! bleach_equivalent  = chlorine_per_year / BLEACH_CONCENTRATION      (L)
//! ```
//!
//! Shower figures are produced by [`shower`] when shower minutes are given.

pub mod constants;
pub mod shower;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use constants::{
    BLEACH_CONCENTRATION_MG_PER_LITER, DAYS_PER_YEAR, DEFAULT_GLASS_VOLUME_LITERS,
    LITERS_PER_CUP, LITERS_PER_TEASPOON,
};
pub use shower::{ShowerChlorineData, ShowerImpact};

/// Rejected estimator input.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum EstimateError {
    #[error("{field} must be {requirement}, got {value}")]
    InvalidInput {
        field: &'static str,
        requirement: &'static str,
        value: f64,
    },
}

impl EstimateError {
    fn invalid(field: &'static str, requirement: &'static str, value: f64) -> Self {
        Self::InvalidInput {
            field,
            requirement,
            value,
        }
    }
}

/// Household consumption and the concentration it is exposed to.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ExposureInput {
    /// Chlorine concentration in mg/L.
    pub chlorine_ppm: f64,
    pub glasses_per_day: f64,
    pub glass_volume_liters: f64,
    /// Daily shower length. `None` skips the shower estimate entirely.
    pub shower_minutes: Option<f64>,
}

impl ExposureInput {
    /// Creates an input with the default 8 fl oz glass and no shower.
    pub fn new(chlorine_ppm: f64, glasses_per_day: f64) -> Self {
        Self {
            chlorine_ppm,
            glasses_per_day,
            glass_volume_liters: DEFAULT_GLASS_VOLUME_LITERS,
            shower_minutes: None,
        }
    }

    pub fn with_glass_volume(mut self, liters: f64) -> Self {
        self.glass_volume_liters = liters;
        self
    }

    pub fn with_shower_minutes(mut self, minutes: f64) -> Self {
        self.shower_minutes = Some(minutes);
        self
    }

    /// Checks every field against its domain.
    ///
    /// # Errors
    ///
    /// Returns [`EstimateError::InvalidInput`] naming the first offending field.
    pub fn validate(&self) -> Result<(), EstimateError> {
        check_non_negative("chlorine_ppm", self.chlorine_ppm)?;
        check_positive("glasses_per_day", self.glasses_per_day)?;
        check_positive("glass_volume_liters", self.glass_volume_liters)?;
        if let Some(minutes) = self.shower_minutes {
            check_non_negative("shower_minutes", minutes)?;
        }
        Ok(())
    }
}

fn check_non_negative(field: &'static str, value: f64) -> Result<(), EstimateError> {
    if !value.is_finite() || value < 0.0 {
        return Err(EstimateError::invalid(field, "a finite number >= 0", value));
    }
    Ok(())
}

fn check_positive(field: &'static str, value: f64) -> Result<(), EstimateError> {
    if !value.is_finite() || value <= 0.0 {
        return Err(EstimateError::invalid(field, "a finite number > 0", value));
    }
    Ok(())
}

/// Rejects derived quantities that overflowed.
fn check_finite_output(field: &'static str, value: f64) -> Result<(), EstimateError> {
    if !value.is_finite() {
        return Err(EstimateError::invalid(
            field,
            "finite (inputs are too large)",
            value,
        ));
    }
    Ok(())
}

/// Drinking plus shower chlorine for one day.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct DailyExposure {
    pub total_daily_chlorine_mg: f64,
    pub total_daily_bleach_equivalent: f64,
    pub drinking_percentage: f64,
    pub shower_percentage: f64,
}

/// Exposure estimate for one household.
///
/// Masses are in milligrams; `bleach_equivalent` is liters of household bleach
/// per year. Shower-derived fields are `Some` exactly when the input carried
/// shower minutes.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CalculationResult {
    pub chlorine_ppm: f64,
    pub glasses_per_day: f64,
    pub glass_volume_liters: f64,
    pub chlorine_per_glass: f64,
    pub chlorine_per_day: f64,
    pub chlorine_per_year: f64,
    pub bleach_equivalent: f64,
    pub shower_minutes: Option<f64>,
    pub shower: Option<ShowerChlorineData>,
    pub daily_exposure: Option<DailyExposure>,
    pub shower_impact: Option<ShowerImpact>,
}

impl CalculationResult {
    /// Yearly drinking-water bleach equivalent as a volume.
    pub fn bleach_volume(&self) -> BleachVolume {
        BleachVolume::from_liters(self.bleach_equivalent)
    }

    /// Yearly drinking-water bleach equivalent at another concentration, with
    /// the same consumption.
    pub fn bleach_volume_at(&self, chlorine_ppm: f64) -> BleachVolume {
        let chlorine_per_year =
            chlorine_ppm * self.glass_volume_liters * self.glasses_per_day * DAYS_PER_YEAR;
        BleachVolume::from_liters(chlorine_per_year / BLEACH_CONCENTRATION_MG_PER_LITER)
    }

    /// Yearly bleach equivalent across a reported min/max concentration range.
    ///
    /// `None` unless both ends are known and give finite volumes.
    pub fn bleach_range(&self, min_ppm: Option<f64>, max_ppm: Option<f64>) -> Option<BleachRange> {
        let (min, max) = (self.bleach_volume_at(min_ppm?), self.bleach_volume_at(max_ppm?));
        (min.liters.is_finite() && max.liters.is_finite()).then_some(BleachRange { min, max })
    }
}

/// Bleach equivalents at the low and high end of a utility's readings.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BleachRange {
    pub min: BleachVolume,
    pub max: BleachVolume,
}

/// Volume of household bleach, convertible to kitchen units.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BleachVolume {
    liters: f64,
}

impl BleachVolume {
    pub fn from_liters(liters: f64) -> Self {
        Self { liters }
    }

    pub fn liters(self) -> f64 {
        self.liters
    }

    pub fn milliliters(self) -> f64 {
        self.liters * 1000.0
    }

    pub fn cups(self) -> f64 {
        self.liters / LITERS_PER_CUP
    }

    pub fn teaspoons(self) -> f64 {
        self.liters / LITERS_PER_TEASPOON
    }
}

/// Estimates drinking and (optionally) shower exposure.
///
/// # Errors
///
/// Returns [`EstimateError::InvalidInput`] when `chlorine_ppm < 0`,
/// `glasses_per_day <= 0`, `glass_volume_liters <= 0`, `shower_minutes < 0`
/// or any value is not finite. Inputs whose products overflow `f64` are
/// rejected the same way, naming the first derived field that did.
///
/// # Examples
///
/// ```
/// use chlorine_calculator::domain::exposure::{ExposureInput, estimate};
///
/// let input = ExposureInput::new(1.0, 8.0).with_glass_volume(0.25);
/// let result = estimate(&input).unwrap();
/// assert_eq!(result.chlorine_per_glass, 0.25);
/// assert!(result.shower.is_none());
/// ```
pub fn estimate(input: &ExposureInput) -> Result<CalculationResult, EstimateError> {
    input.validate()?;

    let chlorine_per_glass = input.chlorine_ppm * input.glass_volume_liters;
    let chlorine_per_day = chlorine_per_glass * input.glasses_per_day;
    let chlorine_per_year = chlorine_per_day * DAYS_PER_YEAR;
    let bleach_equivalent = chlorine_per_year / BLEACH_CONCENTRATION_MG_PER_LITER;

    check_finite_output("chlorine_per_glass", chlorine_per_glass)?;
    check_finite_output("chlorine_per_day", chlorine_per_day)?;
    check_finite_output("chlorine_per_year", chlorine_per_year)?;

    let shower = input
        .shower_minutes
        .map(|minutes| shower::absorption(minutes, input.chlorine_ppm));
    if let Some(s) = &shower {
        check_finite_output("total_chlorine_in_shower", s.total_chlorine_in_shower)?;
        check_finite_output("yearly_bleach_equivalent", s.yearly_bleach_equivalent)?;
    }

    let daily_exposure =
        shower.map(|s| combine_daily_exposure(chlorine_per_day, s.total_chlorine_absorbed));
    if let Some(d) = &daily_exposure {
        check_finite_output("total_daily_chlorine_mg", d.total_daily_chlorine_mg)?;
    }

    let shower_impact = input.shower_minutes.map(ShowerImpact::from_minutes);

    Ok(CalculationResult {
        chlorine_ppm: input.chlorine_ppm,
        glasses_per_day: input.glasses_per_day,
        glass_volume_liters: input.glass_volume_liters,
        chlorine_per_glass,
        chlorine_per_day,
        chlorine_per_year,
        bleach_equivalent,
        shower_minutes: input.shower_minutes,
        shower,
        daily_exposure,
        shower_impact,
    })
}

/// Estimates shower absorption on its own.
///
/// # Errors
///
/// Returns [`EstimateError::InvalidInput`] for negative or non-finite values.
pub fn estimate_shower(
    shower_minutes: f64,
    chlorine_ppm: f64,
) -> Result<ShowerChlorineData, EstimateError> {
    check_non_negative("shower_minutes", shower_minutes)?;
    check_non_negative("chlorine_ppm", chlorine_ppm)?;

    let data = shower::absorption(shower_minutes, chlorine_ppm);
    check_finite_output("total_chlorine_in_shower", data.total_chlorine_in_shower)?;
    check_finite_output("yearly_bleach_equivalent", data.yearly_bleach_equivalent)?;
    Ok(data)
}

/// Adds drinking and shower chlorine for one day.
///
/// When both are zero the percentage split is reported as `0 / 0`.
pub fn combine_daily_exposure(drinking_mg_per_day: f64, shower_absorbed_mg: f64) -> DailyExposure {
    let total = drinking_mg_per_day + shower_absorbed_mg;

    let (drinking_percentage, shower_percentage) = if total > 0.0 {
        (
            drinking_mg_per_day / total * 100.0,
            shower_absorbed_mg / total * 100.0,
        )
    } else {
        (0.0, 0.0)
    };

    DailyExposure {
        total_daily_chlorine_mg: total,
        total_daily_bleach_equivalent: total / BLEACH_CONCENTRATION_MG_PER_LITER,
        drinking_percentage,
        shower_percentage,
    }
}
