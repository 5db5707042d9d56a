//! DTOs for water utility lookups.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use validator::Validate;

use crate::domain::entities::{ServedUtility, WaterUtility, ZipCodeMapping};
use crate::utils::format::ZIP_CODE_RE;

#[derive(Debug, Deserialize, Validate)]
pub struct UtilitiesQuery {
    #[validate(regex(path = "*ZIP_CODE_RE", message = "Zip code must be 5 digits"))]
    pub zip: String,
}

#[derive(Debug, Serialize)]
pub struct UtilityResponse {
    pub pwsid: String,
    pub utility_name: String,
    pub utility_type: String,
    pub city: Option<String>,
    pub state: Option<String>,
    pub county: Option<String>,
    pub population_served: i64,
    pub service_connections: i64,
    pub is_active: bool,
    /// Set when the utility was found through a ZIP code.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub is_primary: Option<bool>,
    pub updated_at: DateTime<Utc>,
}

impl From<WaterUtility> for UtilityResponse {
    fn from(u: WaterUtility) -> Self {
        Self {
            pwsid: u.pwsid,
            utility_name: u.utility_name,
            utility_type: u.utility_type,
            city: u.city,
            state: u.state,
            county: u.county,
            population_served: u.population_served,
            service_connections: u.service_connections,
            is_active: u.is_active,
            is_primary: None,
            updated_at: u.updated_at,
        }
    }
}

impl From<ServedUtility> for UtilityResponse {
    fn from(s: ServedUtility) -> Self {
        Self {
            is_primary: Some(s.is_primary),
            ..s.utility.into()
        }
    }
}

#[derive(Debug, Serialize)]
pub struct UtilitiesResponse {
    pub zip_code: String,
    pub utilities: Vec<UtilityResponse>,
}

#[derive(Debug, Serialize)]
pub struct ZipMappingResponse {
    pub zip_code: String,
    pub pwsid: String,
    pub is_primary: bool,
    pub updated_at: DateTime<Utc>,
}

impl From<ZipCodeMapping> for ZipMappingResponse {
    fn from(m: ZipCodeMapping) -> Self {
        Self {
            zip_code: m.zip_code,
            pwsid: m.pwsid,
            is_primary: m.is_primary,
            updated_at: m.updated_at,
        }
    }
}
