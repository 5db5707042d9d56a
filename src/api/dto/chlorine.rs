//! DTOs for chlorine data and manual entry.

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use validator::Validate;

use crate::application::services::{ManualAction, ManualMeasurement, ManualOutcome};
use crate::domain::entities::ChlorineData;
use crate::domain::validation::QualityReport;
use crate::utils::format::PWSID_RE;

#[derive(Debug, Serialize)]
pub struct ChlorineResponse {
    pub pwsid: String,
    pub utility_name: Option<String>,
    pub average_chlorine_ppm: f64,
    pub min_chlorine_ppm: Option<f64>,
    pub max_chlorine_ppm: Option<f64>,
    pub sample_count: Option<i32>,
    pub last_updated: NaiveDate,
    pub data_source: String,
    pub notes: Option<String>,
    pub source_url: Option<String>,
    pub confidence: Option<i32>,
    pub is_estimated: bool,
    pub updated_at: DateTime<Utc>,
}

impl From<ChlorineData> for ChlorineResponse {
    fn from(d: ChlorineData) -> Self {
        let is_estimated = d.is_estimated();
        Self {
            pwsid: d.pwsid,
            utility_name: d.utility_name,
            average_chlorine_ppm: d.average_chlorine_ppm,
            min_chlorine_ppm: d.min_chlorine_ppm,
            max_chlorine_ppm: d.max_chlorine_ppm,
            sample_count: d.sample_count,
            last_updated: d.last_updated,
            data_source: d.data_source,
            notes: d.notes,
            source_url: d.source_url,
            confidence: d.confidence,
            is_estimated,
            updated_at: d.updated_at,
        }
    }
}

/// Public manual entry of a chlorine reading.
#[derive(Debug, Deserialize, Validate)]
pub struct ManualEntryRequest {
    #[validate(regex(path = "*PWSID_RE", message = "Invalid PWSID format"))]
    pub pwsid: String,

    #[validate(length(min = 1, max = 200))]
    pub utility_name: String,

    pub average_chlorine_ppm: f64,
    pub min_chlorine_ppm: Option<f64>,
    pub max_chlorine_ppm: Option<f64>,

    #[validate(range(min = 1))]
    pub sample_count: Option<i32>,

    #[validate(url(message = "Invalid URL format"))]
    pub source_url: Option<String>,

    #[validate(length(max = 2000))]
    pub notes: Option<String>,
}

impl From<ManualEntryRequest> for ManualMeasurement {
    fn from(r: ManualEntryRequest) -> Self {
        Self {
            pwsid: r.pwsid,
            utility_name: r.utility_name,
            average_chlorine_ppm: r.average_chlorine_ppm,
            min_chlorine_ppm: r.min_chlorine_ppm,
            max_chlorine_ppm: r.max_chlorine_ppm,
            sample_count: r.sample_count,
            source_url: r.source_url,
            notes: r.notes,
        }
    }
}

#[derive(Debug, Serialize)]
pub struct ManualEntryResponse {
    pub action: ManualAction,
    pub data: ChlorineResponse,
    pub quality: QualityReport,
}

impl From<ManualOutcome> for ManualEntryResponse {
    fn from(o: ManualOutcome) -> Self {
        Self {
            action: o.action,
            data: o.data.into(),
            quality: o.quality,
        }
    }
}
