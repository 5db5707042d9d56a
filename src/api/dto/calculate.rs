//! DTOs for the exposure calculation endpoints.
//!
//! Numeric ranges are checked by the estimator itself, which reports the
//! offending field in the error details.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use validator::Validate;

use crate::api::dto::utility::UtilityResponse;
use crate::application::services::{CalculationOutcome, CalculationRequest};
use crate::domain::entities::ChlorineData;
use crate::domain::exposure::{BleachRange, BleachVolume, CalculationResult};
use crate::utils::format::{PWSID_RE, ZIP_CODE_RE};

#[derive(Debug, Deserialize, Validate)]
pub struct CalculateRequest {
    #[validate(regex(path = "*ZIP_CODE_RE", message = "Zip code must be 5 digits"))]
    pub zip_code: String,

    #[validate(regex(path = "*PWSID_RE", message = "Invalid PWSID format"))]
    pub pwsid: Option<String>,

    pub glasses_per_day: f64,
    pub glass_volume_liters: Option<f64>,
    pub shower_minutes: Option<f64>,
}

impl From<CalculateRequest> for CalculationRequest {
    fn from(r: CalculateRequest) -> Self {
        Self {
            zip_code: r.zip_code,
            pwsid: r.pwsid,
            glasses_per_day: r.glasses_per_day,
            glass_volume_liters: r.glass_volume_liters,
            shower_minutes: r.shower_minutes,
        }
    }
}

#[derive(Debug, Deserialize)]
pub struct EstimateRequest {
    pub chlorine_ppm: f64,
    pub glasses_per_day: f64,
    pub glass_volume_liters: Option<f64>,
    pub shower_minutes: Option<f64>,
}

/// Yearly bleach equivalent in kitchen units.
#[derive(Debug, Serialize)]
pub struct BleachDto {
    pub liters: f64,
    pub milliliters: f64,
    pub cups: f64,
    pub teaspoons: f64,
}

impl From<BleachVolume> for BleachDto {
    fn from(v: BleachVolume) -> Self {
        Self {
            liters: v.liters(),
            milliliters: v.milliliters(),
            cups: v.cups(),
            teaspoons: v.teaspoons(),
        }
    }
}

/// Yearly bleach equivalent at the utility's lowest and highest readings.
#[derive(Debug, Serialize)]
pub struct BleachRangeDto {
    pub min: BleachDto,
    pub max: BleachDto,
}

impl From<BleachRange> for BleachRangeDto {
    fn from(r: BleachRange) -> Self {
        Self {
            min: r.min.into(),
            max: r.max.into(),
        }
    }
}

/// The chlorine figures a calculation was based on.
#[derive(Debug, Serialize)]
pub struct ChlorineSource {
    pub average_chlorine_ppm: f64,
    pub min_chlorine_ppm: Option<f64>,
    pub max_chlorine_ppm: Option<f64>,
    pub sample_count: Option<i32>,
    pub last_updated: NaiveDate,
    pub data_source: String,
    pub source_url: Option<String>,
}

impl From<ChlorineData> for ChlorineSource {
    fn from(d: ChlorineData) -> Self {
        Self {
            average_chlorine_ppm: d.average_chlorine_ppm,
            min_chlorine_ppm: d.min_chlorine_ppm,
            max_chlorine_ppm: d.max_chlorine_ppm,
            sample_count: d.sample_count,
            last_updated: d.last_updated,
            data_source: d.data_source,
            source_url: d.source_url,
        }
    }
}

#[derive(Debug, Serialize)]
pub struct EstimateResponse {
    #[serde(flatten)]
    pub result: CalculationResult,
    pub bleach: BleachDto,
}

impl From<CalculationResult> for EstimateResponse {
    fn from(result: CalculationResult) -> Self {
        let bleach = result.bleach_volume().into();
        Self { result, bleach }
    }
}

#[derive(Debug, Serialize)]
pub struct CalculateResponse {
    pub zip_code: String,
    pub utility: UtilityResponse,
    pub chlorine: ChlorineSource,
    /// Present when the chlorine data reports both a minimum and a maximum.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub bleach_range: Option<BleachRangeDto>,
    #[serde(flatten)]
    pub estimate: EstimateResponse,
}

impl From<CalculationOutcome> for CalculateResponse {
    fn from(o: CalculationOutcome) -> Self {
        let bleach_range = o
            .result
            .bleach_range(o.chlorine.min_chlorine_ppm, o.chlorine.max_chlorine_ppm)
            .map(Into::into);

        Self {
            zip_code: o.zip_code,
            utility: o.utility.into(),
            chlorine: o.chlorine.into(),
            bleach_range,
            estimate: o.result.into(),
        }
    }
}
