//! Regulated public water system.

use chrono::{DateTime, Utc};

/// Utility type recorded when an upsert does not name one.
pub const DEFAULT_UTILITY_TYPE: &str = "Community water system";

/// A public water system identified by its PWSID (e.g. `TN0000511`).
///
/// Reference data: rows only change through administrative corrections.
#[derive(Debug, Clone, PartialEq)]
pub struct WaterUtility {
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

impl WaterUtility {
    /// Two-letter state code encoded in the PWSID prefix.
    pub fn pwsid_state(&self) -> Option<&str> {
        pwsid_state(&self.pwsid)
    }
}

/// Returns the state prefix of a US PWSID, if it has one.
pub fn pwsid_state(pwsid: &str) -> Option<&str> {
    let prefix = pwsid.get(..2)?;
    prefix
        .chars()
        .all(|c| c.is_ascii_alphabetic())
        .then_some(prefix)
}

/// Input for creating or replacing a utility row.
#[derive(Debug, Clone, PartialEq)]
pub struct NewWaterUtility {
    pub pwsid: String,
    pub utility_name: String,
    pub utility_type: String,
    pub city: Option<String>,
    pub state: Option<String>,
    pub county: Option<String>,
    pub population_served: i64,
    pub service_connections: i64,
    pub is_active: bool,
}
