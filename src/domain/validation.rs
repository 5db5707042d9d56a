//! Quality checks for chlorine data before it is stored.
//!
//! Reports both hard errors (values that cannot be real drinking-water
//! readings) and soft warnings that lower a 0..=100 confidence score. The
//! score is stored with the record and later decides whether automated data
//! may overwrite it (see [`should_replace_existing`]).

use regex::Regex;
use serde::Serialize;
use std::sync::LazyLock;
use url::Url;

use crate::domain::entities::{ChlorineData, NewChlorineData, pwsid_state};

/// EPA regulatory limits and typical municipal ranges, in PPM.
pub mod epa_limits {
    /// Maximum residual disinfectant level for chlorine.
    pub const MAXIMUM_ALLOWABLE: f64 = 4.0;
    pub const MINIMUM_DETECTABLE: f64 = 0.1;
    /// Minimum required at distribution entry.
    pub const TYPICAL_MIN: f64 = 0.2;
    pub const TYPICAL_MAX: f64 = 2.5;
    pub const SWIMMING_POOL_MIN: f64 = 1.0;
    pub const SWIMMING_POOL_MAX: f64 = 3.0;
}

use epa_limits::{
    MAXIMUM_ALLOWABLE, MINIMUM_DETECTABLE, SWIMMING_POOL_MAX, SWIMMING_POOL_MIN, TYPICAL_MAX,
    TYPICAL_MIN,
};

/// The numeric part of a chlorine record.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ChlorineLevels {
    pub average: f64,
    pub min: Option<f64>,
    pub max: Option<f64>,
    pub sample_count: Option<i32>,
}

impl From<&NewChlorineData> for ChlorineLevels {
    fn from(d: &NewChlorineData) -> Self {
        Self {
            average: d.average_chlorine_ppm,
            min: d.min_chlorine_ppm,
            max: d.max_chlorine_ppm,
            sample_count: d.sample_count,
        }
    }
}

impl From<&ChlorineData> for ChlorineLevels {
    fn from(d: &ChlorineData) -> Self {
        Self {
            average: d.average_chlorine_ppm,
            min: d.min_chlorine_ppm,
            max: d.max_chlorine_ppm,
            sample_count: d.sample_count,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct QualityReport {
    pub is_valid: bool,
    pub confidence: i32,
    pub quality_score: i32,
    pub warnings: Vec<String>,
    pub errors: Vec<String>,
}

impl QualityReport {
    fn new() -> Self {
        Self {
            is_valid: true,
            confidence: 100,
            quality_score: 100,
            warnings: Vec::new(),
            errors: Vec::new(),
        }
    }

    fn error(&mut self, message: String) {
        self.errors.push(message);
        self.is_valid = false;
    }

    fn warn(&mut self, message: String, confidence_penalty: i32, quality_penalty: i32) {
        self.warnings.push(message);
        self.confidence -= confidence_penalty;
        self.quality_score -= quality_penalty;
    }

    /// Folds a geographic report into this one.
    pub fn merge_geographic(&mut self, geo: GeographicReport) {
        self.warnings.extend(geo.warnings);
        self.confidence = self.confidence.min(geo.confidence);
    }
}

/// Checks chlorine levels against EPA limits and internal consistency.
pub fn validate_chlorine_data(levels: &ChlorineLevels) -> QualityReport {
    let mut report = QualityReport::new();
    let avg = levels.average;

    if !avg.is_finite() {
        report.error(format!("Average chlorine {avg} is not a number"));
        return report;
    }

    if avg < MINIMUM_DETECTABLE {
        report.error(format!(
            "Average chlorine {avg} PPM is below detectable limits ({MINIMUM_DETECTABLE} PPM)"
        ));
    }
    if avg > MAXIMUM_ALLOWABLE {
        report.error(format!(
            "Average chlorine {avg} PPM exceeds EPA maximum allowable limit ({MAXIMUM_ALLOWABLE} PPM)"
        ));
    }

    if let Some(min) = levels.min {
        if min < 0.0 {
            report.error(format!("Minimum chlorine cannot be negative: {min} PPM"));
        }
        if min > MAXIMUM_ALLOWABLE {
            report.error(format!(
                "Minimum chlorine {min} PPM exceeds EPA maximum ({MAXIMUM_ALLOWABLE} PPM)"
            ));
        }
        if avg < min {
            report.error(format!(
                "Average chlorine ({avg}) cannot be less than minimum ({min})"
            ));
        }
    }

    if let Some(max) = levels.max {
        if max > MAXIMUM_ALLOWABLE {
            report.error(format!(
                "Maximum chlorine {max} PPM exceeds EPA maximum ({MAXIMUM_ALLOWABLE} PPM)"
            ));
        }
        if let Some(min) = levels.min
            && max < min
        {
            report.error(format!(
                "Maximum chlorine ({max}) cannot be less than minimum ({min})"
            ));
        }
        if avg > max {
            report.error(format!(
                "Average chlorine ({avg}) cannot be greater than maximum ({max})"
            ));
        }
    }

    if avg < TYPICAL_MIN {
        report.warn(
            format!(
                "Average chlorine {avg} PPM is below typical municipal range ({TYPICAL_MIN}-{TYPICAL_MAX} PPM)"
            ),
            20,
            15,
        );
    }
    if avg > TYPICAL_MAX {
        report.warn(
            format!(
                "Average chlorine {avg} PPM is above typical municipal range ({TYPICAL_MIN}-{TYPICAL_MAX} PPM)"
            ),
            15,
            10,
        );
    }
    if (SWIMMING_POOL_MIN..=SWIMMING_POOL_MAX).contains(&avg) {
        report.warn(
            format!(
                "Chlorine level {avg} PPM is in swimming pool range - verify this is drinking water data"
            ),
            10,
            0,
        );
    }

    if let Some(count) = levels.sample_count {
        if count < 4 {
            report.warn(
                format!(
                    "Low sample count ({count}) may indicate insufficient data for reliable average"
                ),
                10,
                5,
            );
        }
        if count > 365 {
            report.warn(
                format!("Very high sample count ({count}) - verify this is annual data"),
                5,
                0,
            );
        }
    }

    report.confidence = report.confidence.clamp(0, 100);
    report.quality_score = report.quality_score.clamp(0, 100);
    report
}

struct Pattern {
    regex: Regex,
    message: &'static str,
    penalty: i32,
}

fn pattern(re: &str, message: &'static str, penalty: i32) -> Pattern {
    Pattern {
        regex: Regex::new(re).expect("static pattern compiles"),
        message,
        penalty,
    }
}

static SUSPICIOUS_NAMES: LazyLock<Vec<Pattern>> = LazyLock::new(|| {
    vec![
        pattern(
            r"(?i)franklin.*michigan|michigan.*franklin",
            "Franklin Michigan data may be contaminating Franklin Tennessee",
            30,
        ),
        pattern(
            r"(?i)metro.*nashville|nashville.*metro",
            "Nashville Metro Water data detected - verify correct utility",
            30,
        ),
        pattern(
            r"(?i)columbus|cleveland|cincinnati",
            "Ohio utility names detected - verify state consistency",
            30,
        ),
        pattern(
            r"(?i)portland.*maine|maine.*portland",
            "Maine utility data detected - verify state consistency",
            30,
        ),
    ]
});

static WRONG_STATE_DOMAINS: LazyLock<Vec<Pattern>> = LazyLock::new(|| {
    vec![
        pattern(r"(?i)\.mi\.gov|michigan\.gov|\.mi\.us", "Michigan", 40),
        pattern(r"(?i)\.me\.gov|maine\.gov|\.me\.us", "Maine", 40),
        pattern(r"(?i)\.oh\.gov|ohio\.gov|\.oh\.us", "Ohio", 40),
        pattern(r"(?i)\.ca\.gov|california\.gov|\.ca\.us", "California", 40),
        pattern(r"(?i)nashville\.gov", "Nashville (if not Nashville utility)", 30),
    ]
});

static THIRD_PARTY_DOMAINS: LazyLock<Vec<Pattern>> = LazyLock::new(|| {
    vec![
        pattern(
            r"(?i)noviams\.com",
            "Third-party utility management site - may contain mixed data",
            15,
        ),
        pattern(r"(?i)awwa\.org", "AWWA site may contain sample/template data", 10),
        pattern(r"(?i)epa\.gov", "EPA site may contain aggregate/sample data", 5),
    ]
});

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct GeographicReport {
    pub is_consistent: bool,
    pub confidence: i32,
    pub warnings: Vec<String>,
}

/// Checks that a record's name, state and source all point at the same place.
pub fn validate_geographic_consistency(
    pwsid: &str,
    utility_name: &str,
    state: Option<&str>,
    source_url: Option<&str>,
) -> GeographicReport {
    let mut warnings = Vec::new();
    let mut confidence = 100;
    let pwsid_state = pwsid_state(pwsid);

    if let (Some(expected), Some(state)) = (pwsid_state, state)
        && !state.eq_ignore_ascii_case(expected)
    {
        warnings.push(format!(
            "State mismatch: PWSID indicates {expected}, but extracted state is {state}"
        ));
        confidence -= 50;
    }

    for p in SUSPICIOUS_NAMES.iter() {
        if p.regex.is_match(utility_name) {
            warnings.push(p.message.to_string());
            confidence -= p.penalty;
        }
    }

    if let Some(url) = source_url {
        let url_report = validate_source_url(url);
        warnings.extend(url_report.warnings);
        confidence -= url_report.confidence_penalty;
    }

    GeographicReport {
        is_consistent: confidence > 50,
        confidence: confidence.clamp(0, 100),
        warnings,
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct SourceUrlReport {
    pub warnings: Vec<String>,
    pub confidence_penalty: i32,
}

/// Flags source URLs hosted in another state or on aggregator sites.
pub fn validate_source_url(source_url: &str) -> SourceUrlReport {
    let mut warnings = Vec::new();
    let mut confidence_penalty = 0;

    let host = match Url::parse(source_url)
        .ok()
        .and_then(|u| u.host_str().map(str::to_ascii_lowercase))
    {
        Some(host) => host,
        None => {
            return SourceUrlReport {
                warnings: vec![format!("Invalid source URL format: {source_url}")],
                confidence_penalty: 20,
            };
        }
    };

    for p in WRONG_STATE_DOMAINS.iter() {
        if p.regex.is_match(&host) {
            warnings.push(format!("Source URL appears to be from {}: {host}", p.message));
            confidence_penalty += p.penalty;
        }
    }

    for p in THIRD_PARTY_DOMAINS.iter() {
        if p.regex.is_match(&host) {
            warnings.push(p.message.to_string());
            confidence_penalty += p.penalty;
        }
    }

    SourceUrlReport {
        warnings,
        confidence_penalty,
    }
}

/// Confidence assumed for records written without one.
const DEFAULT_CONFIDENCE: i32 = 50;

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ReplaceDecision {
    pub should_replace: bool,
    pub reason: String,
}

impl ReplaceDecision {
    fn replace(reason: impl Into<String>) -> Self {
        Self {
            should_replace: true,
            reason: reason.into(),
        }
    }

    fn keep(reason: impl Into<String>) -> Self {
        Self {
            should_replace: false,
            reason: reason.into(),
        }
    }
}

/// Decides whether an incoming record may overwrite the stored one.
///
/// Manual entries win over automated ones in both directions. Between two
/// records of the same kind the incoming one needs a confidence more than 20
/// points higher; ties keep the existing data.
pub fn should_replace_existing(existing: &ChlorineData, incoming: &NewChlorineData) -> ReplaceDecision {
    match (existing.is_manual_entry(), incoming.is_manual_entry()) {
        (true, false) => {
            return ReplaceDecision::keep("Preserving manual entry over automated extraction");
        }
        (false, true) => {
            return ReplaceDecision::replace(
                "Manual entry takes precedence over automated extraction",
            );
        }
        _ => {}
    }

    let existing_confidence = existing.confidence.unwrap_or(DEFAULT_CONFIDENCE);
    let new_confidence = incoming.confidence.unwrap_or(DEFAULT_CONFIDENCE);

    if new_confidence > existing_confidence + 20 {
        return ReplaceDecision::replace(format!(
            "New data has significantly higher confidence ({new_confidence} vs {existing_confidence})"
        ));
    }

    if existing_confidence > new_confidence + 10 {
        return ReplaceDecision::keep(format!(
            "Existing data has higher confidence ({existing_confidence} vs {new_confidence})"
        ));
    }

    ReplaceDecision::keep("Preserving existing data to avoid unnecessary changes")
}
