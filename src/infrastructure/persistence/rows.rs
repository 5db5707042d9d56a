//! Database row shapes and their mapping to domain entities.

use chrono::{DateTime, NaiveDate, Utc};
use sqlx::FromRow;

use crate::domain::entities::{ChlorineData, ServedUtility, WaterUtility, ZipCodeMapping};
use crate::domain::repositories::ApiToken;

pub(crate) const UTILITY_COLUMNS: &str = "pwsid, utility_name, utility_type, city, state, county, \
     population_served, service_connections, is_active, created_at, updated_at";

pub(crate) const CHLORINE_COLUMNS: &str = "pwsid, utility_name, average_chlorine_ppm, \
     min_chlorine_ppm, max_chlorine_ppm, sample_count, last_updated, data_source, notes, \
     source_url, confidence, created_at, updated_at";

pub(crate) const TOKEN_COLUMNS: &str =
    "id, name, token_hash, created_at, last_used_at, revoked_at";

#[derive(Debug, FromRow)]
pub(crate) struct UtilityRow {
    pub pwsid: String,
    pub utility_name: String,
    pub utility_type: String,
    pub city: Option<String>,
    pub state: Option<String>,
    pub county: Option<String>,
    pub population_served: i64,
    pub service_connections: i64,
    pub is_active: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl From<UtilityRow> for WaterUtility {
    fn from(r: UtilityRow) -> Self {
        Self {
            pwsid: r.pwsid,
            utility_name: r.utility_name,
            utility_type: r.utility_type,
            city: r.city,
            state: r.state,
            county: r.county,
            population_served: r.population_served,
            service_connections: r.service_connections,
            is_active: r.is_active,
            created_at: r.created_at,
            updated_at: r.updated_at,
        }
    }
}

/// A utility row joined with the mapping flag of the ZIP code it was found by.
#[derive(Debug, FromRow)]
pub(crate) struct ServedUtilityRow {
    #[sqlx(flatten)]
    pub utility: UtilityRow,
    pub is_primary: bool,
}

impl From<ServedUtilityRow> for ServedUtility {
    fn from(r: ServedUtilityRow) -> Self {
        Self {
            utility: r.utility.into(),
            is_primary: r.is_primary,
        }
    }
}

#[derive(Debug, FromRow)]
pub(crate) struct ZipMappingRow {
    pub zip_code: String,
    pub pwsid: String,
    pub is_primary: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl From<ZipMappingRow> for ZipCodeMapping {
    fn from(r: ZipMappingRow) -> Self {
        Self {
            zip_code: r.zip_code,
            pwsid: r.pwsid,
            is_primary: r.is_primary,
            created_at: r.created_at,
            updated_at: r.updated_at,
        }
    }
}

#[derive(Debug, FromRow)]
pub(crate) struct ChlorineRow {
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
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl From<ChlorineRow> for ChlorineData {
    fn from(r: ChlorineRow) -> Self {
        Self {
            pwsid: r.pwsid,
            utility_name: r.utility_name,
            average_chlorine_ppm: r.average_chlorine_ppm,
            min_chlorine_ppm: r.min_chlorine_ppm,
            max_chlorine_ppm: r.max_chlorine_ppm,
            sample_count: r.sample_count,
            last_updated: r.last_updated,
            data_source: r.data_source,
            notes: r.notes,
            source_url: r.source_url,
            confidence: r.confidence,
            created_at: r.created_at,
            updated_at: r.updated_at,
        }
    }
}

#[derive(Debug, FromRow)]
pub(crate) struct TokenRow {
    pub id: i64,
    pub name: String,
    pub token_hash: String,
    pub created_at: DateTime<Utc>,
    pub last_used_at: Option<DateTime<Utc>>,
    pub revoked_at: Option<DateTime<Utc>>,
}

impl From<TokenRow> for ApiToken {
    fn from(r: TokenRow) -> Self {
        Self {
            id: r.id,
            name: r.name,
            token_hash: r.token_hash,
            created_at: r.created_at,
            last_used_at: r.last_used_at,
            revoked_at: r.revoked_at,
        }
    }
}
