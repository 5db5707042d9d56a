//! DTOs for administrative record writes.
//!
//! Records and keys are tagged by table name:
//!
//! ```json
//! { "table": "zip_code_mapping", "zip_code": "37135", "pwsid": "TN0000511", "is_primary": true }
//! ```

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use serde_with::{DisplayFromStr, serde_as};
use validator::Validate;

use crate::api::dto::chlorine::ChlorineResponse;
use crate::api::dto::utility::{UtilityResponse, ZipMappingResponse};
use crate::application::services::UpsertOutcome;
use crate::domain::entities::{
    DEFAULT_UTILITY_TYPE, NewChlorineData, NewWaterUtility, NewZipCodeMapping, Record, RecordKey,
    StoredRecord,
};
use crate::domain::validation::{QualityReport, ReplaceDecision};

fn default_true() -> bool {
    true
}

#[derive(Debug, Deserialize, Validate)]
pub struct UtilityFields {
    pub pwsid: String,
    #[validate(length(min = 1, max = 200))]
    pub utility_name: String,
    pub utility_type: Option<String>,
    pub city: Option<String>,
    #[validate(length(equal = 2))]
    pub state: Option<String>,
    pub county: Option<String>,
    #[serde(default)]
    pub population_served: i64,
    #[serde(default)]
    pub service_connections: i64,
    #[serde(default = "default_true")]
    pub is_active: bool,
}

#[derive(Debug, Deserialize, Validate)]
pub struct ChlorineFields {
    pub pwsid: String,
    pub utility_name: Option<String>,
    pub average_chlorine_ppm: f64,
    pub min_chlorine_ppm: Option<f64>,
    pub max_chlorine_ppm: Option<f64>,
    pub sample_count: Option<i32>,
    pub last_updated: NaiveDate,
    #[validate(length(min = 1))]
    pub data_source: String,
    pub notes: Option<String>,
    #[validate(url(message = "Invalid URL format"))]
    pub source_url: Option<String>,
    #[validate(range(min = 0, max = 100))]
    pub confidence: Option<i32>,
}

impl From<ChlorineFields> for NewChlorineData {
    fn from(f: ChlorineFields) -> Self {
        Self {
            pwsid: f.pwsid,
            utility_name: f.utility_name,
            average_chlorine_ppm: f.average_chlorine_ppm,
            min_chlorine_ppm: f.min_chlorine_ppm,
            max_chlorine_ppm: f.max_chlorine_ppm,
            sample_count: f.sample_count,
            last_updated: f.last_updated,
            data_source: f.data_source,
            notes: f.notes,
            source_url: f.source_url,
            confidence: f.confidence,
        }
    }
}

#[derive(Debug, Deserialize, Validate)]
pub struct ZipMappingFields {
    pub zip_code: String,
    pub pwsid: String,
    #[serde(default)]
    pub is_primary: bool,
}

/// Body of `PUT /api/admin/records`.
#[derive(Debug, Deserialize)]
#[serde(tag = "table", rename_all = "snake_case")]
pub enum RecordRequest {
    WaterUtilities(UtilityFields),
    ChlorineData(ChlorineFields),
    ZipCodeMapping(ZipMappingFields),
}

impl Validate for RecordRequest {
    fn validate(&self) -> Result<(), validator::ValidationErrors> {
        match self {
            Self::WaterUtilities(f) => f.validate(),
            Self::ChlorineData(f) => f.validate(),
            Self::ZipCodeMapping(f) => f.validate(),
        }
    }
}

impl From<RecordRequest> for Record {
    fn from(r: RecordRequest) -> Self {
        match r {
            RecordRequest::WaterUtilities(f) => Record::Utility(NewWaterUtility {
                pwsid: f.pwsid,
                utility_name: f.utility_name,
                utility_type: f
                    .utility_type
                    .unwrap_or_else(|| DEFAULT_UTILITY_TYPE.to_string()),
                city: f.city,
                state: f.state.map(|s| s.to_ascii_uppercase()),
                county: f.county,
                population_served: f.population_served,
                service_connections: f.service_connections,
                is_active: f.is_active,
            }),
            RecordRequest::ChlorineData(f) => Record::Chlorine(f.into()),
            RecordRequest::ZipCodeMapping(f) => Record::ZipMapping(NewZipCodeMapping {
                zip_code: f.zip_code,
                pwsid: f.pwsid,
                is_primary: f.is_primary,
            }),
        }
    }
}

/// Body of `DELETE /api/admin/records`.
#[derive(Debug, Deserialize)]
#[serde(tag = "table", rename_all = "snake_case")]
pub enum RecordKeyRequest {
    WaterUtilities { pwsid: String },
    ChlorineData { pwsid: String },
    ZipCodeMapping { zip_code: String, pwsid: String },
}

impl From<RecordKeyRequest> for RecordKey {
    fn from(r: RecordKeyRequest) -> Self {
        match r {
            RecordKeyRequest::WaterUtilities { pwsid } => RecordKey::Utility { pwsid },
            RecordKeyRequest::ChlorineData { pwsid } => RecordKey::Chlorine { pwsid },
            RecordKeyRequest::ZipCodeMapping { zip_code, pwsid } => {
                RecordKey::ZipMapping { zip_code, pwsid }
            }
        }
    }
}

#[serde_as]
#[derive(Debug, Default, Deserialize)]
pub struct UpsertQuery {
    #[serde_as(as = "Option<DisplayFromStr>")]
    #[serde(default)]
    pub force: Option<bool>,
}

#[derive(Debug, Serialize)]
#[serde(tag = "table", rename_all = "snake_case")]
pub enum RecordResponse {
    WaterUtilities(UtilityResponse),
    ChlorineData(ChlorineResponse),
    ZipCodeMapping(ZipMappingResponse),
}

impl From<StoredRecord> for RecordResponse {
    fn from(r: StoredRecord) -> Self {
        match r {
            StoredRecord::Utility(u) => Self::WaterUtilities(u.into()),
            StoredRecord::Chlorine(c) => Self::ChlorineData(c.into()),
            StoredRecord::ZipMapping(m) => Self::ZipCodeMapping(m.into()),
        }
    }
}

#[derive(Debug, Serialize)]
pub struct UpsertResponse {
    pub record: RecordResponse,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub quality: Option<QualityReport>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub replacement: Option<ReplaceDecision>,
}

impl From<UpsertOutcome> for UpsertResponse {
    fn from(o: UpsertOutcome) -> Self {
        Self {
            record: o.record.into(),
            quality: o.quality,
            replacement: o.replacement,
        }
    }
}

#[derive(Debug, Serialize)]
pub struct DeleteResponse {
    pub key: String,
    pub deleted: u64,
}

#[derive(Debug, Serialize)]
pub struct CleanupResponse {
    pub deleted: usize,
    pub pwsids: Vec<String>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_record_request_is_tagged_by_table() {
        let request: RecordRequest = serde_json::from_value(json!({
            "table": "zip_code_mapping",
            "zip_code": "37135",
            "pwsid": "TN0000511",
            "is_primary": true
        }))
        .unwrap();

        assert_eq!(
            Record::from(request),
            Record::ZipMapping(NewZipCodeMapping {
                zip_code: "37135".to_string(),
                pwsid: "TN0000511".to_string(),
                is_primary: true,
            })
        );
    }

    #[test]
    fn test_utility_request_defaults() {
        let request: RecordRequest = serde_json::from_value(json!({
            "table": "water_utilities",
            "pwsid": "TN0000511",
            "utility_name": "NOLENSVILLE-COLLEGE GROVE U.D.",
            "state": "tn"
        }))
        .unwrap();
        assert!(request.validate().is_ok());

        let Record::Utility(utility) = Record::from(request) else {
            panic!("expected utility record");
        };
        assert_eq!(utility.utility_type, DEFAULT_UTILITY_TYPE);
        assert_eq!(utility.state.as_deref(), Some("TN"));
        assert!(utility.is_active);
        assert_eq!(utility.population_served, 0);
    }

    #[test]
    fn test_unknown_table_is_rejected() {
        let result = serde_json::from_value::<RecordKeyRequest>(json!({
            "table": "api_tokens",
            "pwsid": "TN0000511"
        }));

        assert!(result.is_err());
    }

    #[test]
    fn test_chlorine_confidence_range() {
        let request: RecordRequest = serde_json::from_value(json!({
            "table": "chlorine_data",
            "pwsid": "TN0000511",
            "average_chlorine_ppm": 1.2,
            "last_updated": "2024-12-31",
            "data_source": "2024 CCR",
            "confidence": 150
        }))
        .unwrap();

        assert!(request.validate().is_err());
    }
}
