//! Freshness audit over stored chlorine data.

use chrono::NaiveDate;
use serde::Serialize;
use std::collections::HashMap;

use crate::domain::entities::{ChlorineData, WaterUtility};
use crate::domain::validation::epa_limits::{MAXIMUM_ALLOWABLE, MINIMUM_DETECTABLE};

/// Age after which data is reported as outdated (about six months).
pub const DEFAULT_STALE_AFTER_DAYS: i64 = 180;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Freshness {
    Recent,
    Outdated,
    Missing,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AuditEntry {
    pub pwsid: String,
    pub utility_name: String,
    pub status: Freshness,
    pub last_updated: Option<NaiveDate>,
    pub age_days: Option<i64>,
    pub average_chlorine_ppm: Option<f64>,
    pub data_source: Option<String>,
    pub issues: Vec<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct AuditSummary {
    pub total_utilities: usize,
    pub with_chlorine_data: usize,
    pub recent: usize,
    pub outdated: usize,
    pub missing: usize,
    pub estimated: usize,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AuditReport {
    pub generated_on: NaiveDate,
    pub stale_after_days: i64,
    pub summary: AuditSummary,
    pub utilities: Vec<AuditEntry>,
}

/// Classifies every utility by the age of its chlorine data.
///
/// Data exactly `stale_after_days` old still counts as recent. Chlorine rows
/// for utilities not in `utilities` are ignored.
pub fn build_audit(
    utilities: &[WaterUtility],
    chlorine: Vec<ChlorineData>,
    today: NaiveDate,
    stale_after_days: i64,
) -> AuditReport {
    let mut by_pwsid: HashMap<String, ChlorineData> = chlorine
        .into_iter()
        .map(|c| (c.pwsid.clone(), c))
        .collect();

    let mut summary = AuditSummary {
        total_utilities: utilities.len(),
        ..AuditSummary::default()
    };
    let mut entries = Vec::with_capacity(utilities.len());

    for utility in utilities {
        let entry = match by_pwsid.remove(&utility.pwsid) {
            Some(data) => {
                summary.with_chlorine_data += 1;
                let age = data.age_days(today);
                let mut issues = Vec::new();

                let status = if age <= stale_after_days {
                    summary.recent += 1;
                    Freshness::Recent
                } else {
                    summary.outdated += 1;
                    issues.push(format!("Data is {age} days old (~{} months)", age / 30));
                    Freshness::Outdated
                };

                let avg = data.average_chlorine_ppm;
                if !(MINIMUM_DETECTABLE..=MAXIMUM_ALLOWABLE).contains(&avg) {
                    issues.push(format!("Suspicious chlorine level: {avg} ppm"));
                }
                if data.is_estimated() {
                    summary.estimated += 1;
                    issues.push("Estimated value, not a measured report".to_string());
                }

                AuditEntry {
                    pwsid: utility.pwsid.clone(),
                    utility_name: utility.utility_name.clone(),
                    status,
                    last_updated: Some(data.last_updated),
                    age_days: Some(age),
                    average_chlorine_ppm: Some(avg),
                    data_source: Some(data.data_source),
                    issues,
                }
            }
            None => {
                summary.missing += 1;
                AuditEntry {
                    pwsid: utility.pwsid.clone(),
                    utility_name: utility.utility_name.clone(),
                    status: Freshness::Missing,
                    last_updated: None,
                    age_days: None,
                    average_chlorine_ppm: None,
                    data_source: None,
                    issues: vec!["No chlorine data found".to_string()],
                }
            }
        };
        entries.push(entry);
    }

    AuditReport {
        generated_on: today,
        stale_after_days,
        summary,
        utilities: entries,
    }
}
