//! Aggregate chlorine measurements for a utility.

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

/// `data_source` value marking a measurement typed in by a person.
pub const MANUAL_ENTRY_SOURCE: &str = "Manual User Entry";

/// Per-utility chlorine statistics, usually taken from the yearly CCR.
///
/// Concentrations are in PPM (mg/L).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChlorineData {
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
    /// Quality confidence (0..=100) computed when the record was written.
    pub confidence: Option<i32>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl ChlorineData {
    pub fn is_manual_entry(&self) -> bool {
        self.data_source == MANUAL_ENTRY_SOURCE
    }

    /// True for placeholder figures that were estimated rather than measured.
    pub fn is_estimated(&self) -> bool {
        mentions_estimate(&self.data_source) || self.notes.as_deref().is_some_and(mentions_estimate)
    }

    /// Days between `last_updated` and `today`.
    pub fn age_days(&self, today: NaiveDate) -> i64 {
        (today - self.last_updated).num_days()
    }
}

fn mentions_estimate(text: &str) -> bool {
    text.to_ascii_lowercase().contains("estimated")
}

/// Input for creating or replacing the chlorine record of a utility.
#[derive(Debug, Clone, PartialEq)]
pub struct NewChlorineData {
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
}

impl NewChlorineData {
    pub fn is_manual_entry(&self) -> bool {
        self.data_source == MANUAL_ENTRY_SOURCE
    }
}
