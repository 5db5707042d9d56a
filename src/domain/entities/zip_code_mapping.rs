//! Postal code to utility links.

use chrono::{DateTime, Utc};

use super::WaterUtility;

/// Links a five-digit ZIP code to one of the utilities serving it.
///
/// A ZIP code may be served by several utilities; at most one mapping per
/// ZIP code is expected to carry `is_primary`.
#[derive(Debug, Clone, PartialEq)]
pub struct ZipCodeMapping {
    pub zip_code: String,
    pub pwsid: String,
    pub is_primary: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct NewZipCodeMapping {
    pub zip_code: String,
    pub pwsid: String,
    pub is_primary: bool,
}

/// A utility together with how it is mapped to the ZIP code that found it.
#[derive(Debug, Clone, PartialEq)]
pub struct ServedUtility {
    pub utility: WaterUtility,
    pub is_primary: bool,
}
