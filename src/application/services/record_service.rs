//! Administrative corrections to reference data.

use std::sync::Arc;

use chrono::NaiveDate;
use serde::Serialize;
use serde_json::json;
use tracing::{info, warn};

use crate::domain::entities::{
    ChlorineData, MANUAL_ENTRY_SOURCE, NewChlorineData, NewWaterUtility, NewZipCodeMapping,
    Record, RecordKey, StoredRecord,
};
use crate::domain::repositories::{ChlorineRepository, RecordStore, UtilityRepository};
use crate::domain::validation::{
    ChlorineLevels, QualityReport, ReplaceDecision, should_replace_existing,
    validate_chlorine_data, validate_geographic_consistency,
};
use crate::error::AppError;
use crate::infrastructure::cache::CacheService;
use crate::utils::format::{is_pwsid, is_zip_code};

/// Notes stored with a manual entry that came without any.
const DEFAULT_MANUAL_NOTES: &str =
    "Manually entered by user due to protected/restricted government PDF";

/// Result of a successful upsert.
#[derive(Debug, Clone)]
pub struct UpsertOutcome {
    pub record: StoredRecord,
    /// Present for chlorine records.
    pub quality: Option<QualityReport>,
    /// Present when an existing chlorine record was checked for replacement.
    pub replacement: Option<ReplaceDecision>,
}

/// A chlorine reading typed in by a user.
#[derive(Debug, Clone, PartialEq)]
pub struct ManualMeasurement {
    pub pwsid: String,
    pub utility_name: String,
    pub average_chlorine_ppm: f64,
    pub min_chlorine_ppm: Option<f64>,
    pub max_chlorine_ppm: Option<f64>,
    pub sample_count: Option<i32>,
    pub source_url: Option<String>,
    pub notes: Option<String>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ManualAction {
    Inserted,
    Updated,
}

#[derive(Debug, Clone)]
pub struct ManualOutcome {
    pub data: ChlorineData,
    pub action: ManualAction,
    pub quality: QualityReport,
}

/// Validates and applies upserts and deletes across the reference tables.
///
/// Every write touching chlorine data invalidates its cache entry.
pub struct RecordService<S, C, U>
where
    S: RecordStore + ?Sized,
    C: ChlorineRepository + ?Sized,
    U: UtilityRepository + ?Sized,
{
    store: Arc<S>,
    chlorine_repository: Arc<C>,
    utility_repository: Arc<U>,
    cache: Arc<dyn CacheService>,
}

impl<S, C, U> RecordService<S, C, U>
where
    S: RecordStore + ?Sized,
    C: ChlorineRepository + ?Sized,
    U: UtilityRepository + ?Sized,
{
    pub fn new(
        store: Arc<S>,
        chlorine_repository: Arc<C>,
        utility_repository: Arc<U>,
        cache: Arc<dyn CacheService>,
    ) -> Self {
        Self {
            store,
            chlorine_repository,
            utility_repository,
            cache,
        }
    }

    /// Scores a chlorine record without storing it.
    ///
    /// Geographic checks use the state of the referenced utility when it exists.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::Internal`] on database errors.
    pub async fn assess(&self, data: &NewChlorineData) -> Result<QualityReport, AppError> {
        let mut report = validate_chlorine_data(&ChlorineLevels::from(data));

        let utility = self.utility_repository.find_by_pwsid(&data.pwsid).await?;
        let name = data
            .utility_name
            .as_deref()
            .or(utility.as_ref().map(|u| u.utility_name.as_str()))
            .unwrap_or_default();
        let state = utility.as_ref().and_then(|u| u.state.as_deref());

        report.merge_geographic(validate_geographic_consistency(
            &data.pwsid,
            name,
            state,
            data.source_url.as_deref(),
        ));

        Ok(report)
    }

    /// Inserts or replaces a record.
    ///
    /// Chlorine records must pass quality validation; their confidence defaults
    /// to the computed score. An existing chlorine record is only replaced when
    /// [`should_replace_existing`] allows it, unless `force` is set.
    ///
    /// # Errors
    ///
    /// - [`AppError::Validation`] for malformed keys, failed quality checks, or a
    ///   reference to a missing utility
    /// - [`AppError::Conflict`] when the replacement policy keeps existing data
    pub async fn upsert(&self, record: Record, force: bool) -> Result<UpsertOutcome, AppError> {
        check_keys(&record)?;

        let (record, quality, replacement) = match record {
            Record::Chlorine(mut data) => {
                let quality = self.assess(&data).await?;
                if !quality.is_valid {
                    return Err(AppError::bad_request(
                        "Chlorine data failed quality validation",
                        json!({ "errors": quality.errors, "warnings": quality.warnings }),
                    ));
                }
                data.confidence = data.confidence.or(Some(quality.confidence));

                let replacement = self.check_replacement(&data, force).await?;
                (Record::Chlorine(data), Some(quality), replacement)
            }
            other => (other, None, None),
        };

        let key = record.key();
        let table = record.table();
        let stored = self.store.upsert(record).await?;

        if matches!(key, RecordKey::Chlorine { .. }) {
            self.invalidate(key.pwsid()).await;
        }

        metrics::counter!("chlorine_record_writes_total", "table" => table.as_str(), "op" => "upsert")
            .increment(1);
        info!(%key, force, "Record upserted");

        Ok(UpsertOutcome {
            record: stored,
            quality,
            replacement,
        })
    }

    async fn check_replacement(
        &self,
        data: &NewChlorineData,
        force: bool,
    ) -> Result<Option<ReplaceDecision>, AppError> {
        let Some(existing) = self.chlorine_repository.find_by_pwsid(&data.pwsid).await? else {
            return Ok(None);
        };

        let decision = should_replace_existing(&existing, data);
        if !decision.should_replace && !force {
            return Err(AppError::conflict(
                "Existing chlorine data was kept",
                json!({
                    "pwsid": data.pwsid,
                    "reason": decision.reason,
                    "hint": "retry with force=true to overwrite",
                }),
            ));
        }

        Ok(Some(decision))
    }

    /// Deletes a record and returns the number of rows removed.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::NotFound`] if no row has this key.
    pub async fn delete(&self, key: RecordKey) -> Result<u64, AppError> {
        let table = key.table();
        let label = key.to_string();
        let pwsid = key.pwsid().to_string();
        let touches_chlorine = !matches!(key, RecordKey::ZipMapping { .. });

        let removed = self.store.delete(key).await?;
        if removed == 0 {
            return Err(AppError::not_found("Record not found", json!({ "key": label })));
        }

        if touches_chlorine {
            self.invalidate(&pwsid).await;
        }

        metrics::counter!("chlorine_record_writes_total", "table" => table.as_str(), "op" => "delete")
            .increment(removed);
        info!(key = %label, removed, "Record deleted");

        Ok(removed)
    }

    /// Stores a user-entered chlorine reading for an existing utility.
    ///
    /// Manual entries always replace automated data. The reading is dated
    /// `today`.
    ///
    /// # Errors
    ///
    /// - [`AppError::Validation`] for malformed input or failed quality checks
    /// - [`AppError::NotFound`] if the utility does not exist
    pub async fn submit_manual_measurement(
        &self,
        measurement: ManualMeasurement,
        today: NaiveDate,
    ) -> Result<ManualOutcome, AppError> {
        if !is_pwsid(&measurement.pwsid) {
            return Err(invalid_pwsid(&measurement.pwsid));
        }
        if self
            .utility_repository
            .find_by_pwsid(&measurement.pwsid)
            .await?
            .is_none()
        {
            return Err(AppError::not_found(
                "Water utility not found",
                json!({ "pwsid": measurement.pwsid }),
            ));
        }

        let mut data = NewChlorineData {
            pwsid: measurement.pwsid,
            utility_name: Some(measurement.utility_name),
            average_chlorine_ppm: measurement.average_chlorine_ppm,
            min_chlorine_ppm: measurement.min_chlorine_ppm,
            max_chlorine_ppm: measurement.max_chlorine_ppm,
            sample_count: measurement.sample_count,
            last_updated: today,
            data_source: MANUAL_ENTRY_SOURCE.to_string(),
            notes: Some(
                measurement
                    .notes
                    .filter(|n| !n.trim().is_empty())
                    .unwrap_or_else(|| DEFAULT_MANUAL_NOTES.to_string()),
            ),
            source_url: measurement.source_url.filter(|u| !u.trim().is_empty()),
            confidence: None,
        };

        let quality = self.assess(&data).await?;
        if !quality.is_valid {
            return Err(AppError::bad_request(
                "Chlorine data failed quality validation",
                json!({ "errors": quality.errors, "warnings": quality.warnings }),
            ));
        }
        data.confidence = Some(quality.confidence);

        let existed = self
            .chlorine_repository
            .find_by_pwsid(&data.pwsid)
            .await?
            .is_some();

        let pwsid = data.pwsid.clone();
        let StoredRecord::Chlorine(stored) = self.store.upsert(Record::Chlorine(data)).await? else {
            return Err(AppError::internal(
                "Record store returned an unexpected record type",
                json!({ "pwsid": pwsid }),
            ));
        };
        self.invalidate(&pwsid).await;

        metrics::counter!("chlorine_record_writes_total", "table" => "chlorine_data", "op" => "manual")
            .increment(1);
        info!(pwsid = %pwsid, "Manual chlorine entry stored");

        Ok(ManualOutcome {
            data: stored,
            action: if existed {
                ManualAction::Updated
            } else {
                ManualAction::Inserted
            },
            quality,
        })
    }

    /// Deletes every chlorine record marked as estimated.
    ///
    /// Returns the PWSIDs whose data was removed.
    pub async fn cleanup_estimated(&self) -> Result<Vec<String>, AppError> {
        let removed = self.store.delete_estimated_chlorine().await?;

        for pwsid in &removed {
            self.invalidate(pwsid).await;
        }

        metrics::counter!("chlorine_record_writes_total", "table" => "chlorine_data", "op" => "cleanup")
            .increment(removed.len() as u64);
        info!(count = removed.len(), "Estimated chlorine data removed");

        Ok(removed)
    }

    async fn invalidate(&self, pwsid: &str) {
        if let Err(e) = self.cache.invalidate(pwsid).await {
            warn!(pwsid, error = %e, "Cache invalidation failed");
        }
    }
}

fn invalid_pwsid(pwsid: &str) -> AppError {
    AppError::bad_request(
        "Invalid PWSID format",
        json!({ "pwsid": pwsid, "expected": "two-letter state code followed by 7 digits" }),
    )
}

fn check_keys(record: &Record) -> Result<(), AppError> {
    match record {
        Record::Utility(NewWaterUtility {
            pwsid,
            utility_name,
            population_served,
            service_connections,
            ..
        }) => {
            if !is_pwsid(pwsid) {
                return Err(invalid_pwsid(pwsid));
            }
            if utility_name.trim().is_empty() {
                return Err(AppError::bad_request(
                    "Utility name must not be empty",
                    json!({ "pwsid": pwsid }),
                ));
            }
            if *population_served < 0 || *service_connections < 0 {
                return Err(AppError::bad_request(
                    "Population and connection counts must not be negative",
                    json!({ "pwsid": pwsid }),
                ));
            }
        }
        Record::Chlorine(NewChlorineData { pwsid, .. }) => {
            if !is_pwsid(pwsid) {
                return Err(invalid_pwsid(pwsid));
            }
        }
        Record::ZipMapping(NewZipCodeMapping {
            zip_code, pwsid, ..
        }) => {
            if !is_zip_code(zip_code) {
                return Err(AppError::bad_request(
                    "Invalid zip code format",
                    json!({ "zip_code": zip_code, "expected": "5 digits" }),
                ));
            }
            if !is_pwsid(pwsid) {
                return Err(invalid_pwsid(pwsid));
            }
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::entities::WaterUtility;
    use crate::domain::repositories::{
        MockChlorineRepository, MockRecordStore, MockUtilityRepository,
    };
    use crate::infrastructure::cache::NullCache;
    use chrono::Utc;

    fn utility() -> WaterUtility {
        let now = Utc::now();
        WaterUtility {
            pwsid: "TN0000511".to_string(),
            utility_name: "NOLENSVILLE-COLLEGE GROVE U.D.".to_string(),
            utility_type: "Community water system".to_string(),
            city: Some("Nolensville".to_string()),
            state: Some("TN".to_string()),
            county: None,
            population_served: 10_000,
            service_connections: 4_000,
            is_active: true,
            created_at: now,
            updated_at: now,
        }
    }

    fn new_chlorine(source: &str, avg: f64, confidence: Option<i32>) -> NewChlorineData {
        NewChlorineData {
            pwsid: "TN0000511".to_string(),
            utility_name: Some("NOLENSVILLE-COLLEGE GROVE U.D.".to_string()),
            average_chlorine_ppm: avg,
            min_chlorine_ppm: None,
            max_chlorine_ppm: None,
            sample_count: Some(12),
            last_updated: NaiveDate::from_ymd_opt(2024, 12, 31).unwrap(),
            data_source: source.to_string(),
            notes: None,
            source_url: None,
            confidence,
        }
    }

    fn stored(data: NewChlorineData) -> ChlorineData {
        let now = Utc::now();
        ChlorineData {
            pwsid: data.pwsid,
            utility_name: data.utility_name,
            average_chlorine_ppm: data.average_chlorine_ppm,
            min_chlorine_ppm: data.min_chlorine_ppm,
            max_chlorine_ppm: data.max_chlorine_ppm,
            sample_count: data.sample_count,
            last_updated: data.last_updated,
            data_source: data.data_source,
            notes: data.notes,
            source_url: data.source_url,
            confidence: data.confidence,
            created_at: now,
            updated_at: now,
        }
    }

    fn echo_store() -> MockRecordStore {
        let mut store = MockRecordStore::new();
        store.expect_upsert().returning(|record| match record {
            Record::Chlorine(c) => Ok(StoredRecord::Chlorine(stored(c))),
            _ => Err(AppError::internal("unexpected", json!({}))),
        });
        store
    }

    fn utilities_with_nolensville() -> MockUtilityRepository {
        let mut repo = MockUtilityRepository::new();
        repo.expect_find_by_pwsid().returning(|_| Ok(Some(utility())));
        repo
    }

    fn service(
        store: MockRecordStore,
        chlorine: MockChlorineRepository,
        utilities: MockUtilityRepository,
    ) -> RecordService<MockRecordStore, MockChlorineRepository, MockUtilityRepository> {
        RecordService::new(
            Arc::new(store),
            Arc::new(chlorine),
            Arc::new(utilities),
            Arc::new(NullCache::new()),
        )
    }

    #[tokio::test]
    async fn test_upsert_new_chlorine_fills_confidence() {
        let mut chlorine = MockChlorineRepository::new();
        chlorine.expect_find_by_pwsid().returning(|_| Ok(None));

        let outcome = service(echo_store(), chlorine, utilities_with_nolensville())
            .upsert(Record::Chlorine(new_chlorine("2024 CCR", 0.8, None)), false)
            .await
            .unwrap();

        let StoredRecord::Chlorine(data) = outcome.record else {
            panic!("expected chlorine record");
        };
        assert_eq!(data.confidence, Some(100));
        assert!(outcome.replacement.is_none());
    }

    #[tokio::test]
    async fn test_upsert_rejects_invalid_chlorine() {
        let store = MockRecordStore::new();

        let result = service(store, MockChlorineRepository::new(), utilities_with_nolensville())
            .upsert(Record::Chlorine(new_chlorine("2024 CCR", 6.0, None)), false)
            .await;

        assert!(matches!(result, Err(AppError::Validation { .. })));
    }

    #[tokio::test]
    async fn test_upsert_keeps_manual_entry_unless_forced() {
        let mut chlorine = MockChlorineRepository::new();
        chlorine
            .expect_find_by_pwsid()
            .returning(|_| Ok(Some(stored(new_chlorine(MANUAL_ENTRY_SOURCE, 1.0, Some(60))))));

        let svc = service(echo_store(), chlorine, utilities_with_nolensville());

        let refused = svc
            .upsert(Record::Chlorine(new_chlorine("2025 CCR", 0.8, Some(100))), false)
            .await;
        assert!(matches!(refused, Err(AppError::Conflict { .. })));

        let forced = svc
            .upsert(Record::Chlorine(new_chlorine("2025 CCR", 0.8, Some(100))), true)
            .await
            .unwrap();
        assert_eq!(forced.replacement.map(|d| d.should_replace), Some(false));
    }

    #[tokio::test]
    async fn test_upsert_rejects_bad_zip_mapping() {
        let result = service(
            MockRecordStore::new(),
            MockChlorineRepository::new(),
            MockUtilityRepository::new(),
        )
        .upsert(
            Record::ZipMapping(NewZipCodeMapping {
                zip_code: "371".to_string(),
                pwsid: "TN0000511".to_string(),
                is_primary: true,
            }),
            false,
        )
        .await;

        assert!(matches!(result, Err(AppError::Validation { .. })));
    }

    #[tokio::test]
    async fn test_delete_missing_record_is_not_found() {
        let mut store = MockRecordStore::new();
        store.expect_delete().times(1).returning(|_| Ok(0));

        let result = service(store, MockChlorineRepository::new(), MockUtilityRepository::new())
            .delete(RecordKey::Chlorine {
                pwsid: "TN0000511".to_string(),
            })
            .await;

        assert!(matches!(result, Err(AppError::NotFound { .. })));
    }

    #[tokio::test]
    async fn test_manual_measurement_is_marked_and_dated() {
        let mut chlorine = MockChlorineRepository::new();
        chlorine
            .expect_find_by_pwsid()
            .returning(|_| Ok(Some(stored(new_chlorine("2024 CCR", 1.2, Some(90))))));

        let today = NaiveDate::from_ymd_opt(2025, 3, 1).unwrap();
        let outcome = service(echo_store(), chlorine, utilities_with_nolensville())
            .submit_manual_measurement(
                ManualMeasurement {
                    pwsid: "TN0000511".to_string(),
                    utility_name: "NOLENSVILLE-COLLEGE GROVE U.D.".to_string(),
                    average_chlorine_ppm: 0.9,
                    min_chlorine_ppm: Some(0.5),
                    max_chlorine_ppm: Some(1.4),
                    sample_count: Some(24),
                    source_url: Some(String::new()),
                    notes: None,
                },
                today,
            )
            .await
            .unwrap();

        assert_eq!(outcome.action, ManualAction::Updated);
        assert!(outcome.data.is_manual_entry());
        assert_eq!(outcome.data.last_updated, today);
        assert_eq!(outcome.data.notes.as_deref(), Some(DEFAULT_MANUAL_NOTES));
        assert_eq!(outcome.data.source_url, None);
    }

    #[tokio::test]
    async fn test_manual_measurement_requires_utility() {
        let mut utilities = MockUtilityRepository::new();
        utilities.expect_find_by_pwsid().returning(|_| Ok(None));

        let result = service(MockRecordStore::new(), MockChlorineRepository::new(), utilities)
            .submit_manual_measurement(
                ManualMeasurement {
                    pwsid: "TN0000999".to_string(),
                    utility_name: "Unknown".to_string(),
                    average_chlorine_ppm: 1.0,
                    min_chlorine_ppm: None,
                    max_chlorine_ppm: None,
                    sample_count: None,
                    source_url: None,
                    notes: None,
                },
                NaiveDate::from_ymd_opt(2025, 3, 1).unwrap(),
            )
            .await;

        assert!(matches!(result, Err(AppError::NotFound { .. })));
    }

    #[tokio::test]
    async fn test_cleanup_estimated_returns_removed_pwsids() {
        let mut store = MockRecordStore::new();
        store
            .expect_delete_estimated_chlorine()
            .times(1)
            .returning(|| Ok(vec!["TN0000001".to_string(), "TN0000002".to_string()]));

        let removed = service(store, MockChlorineRepository::new(), MockUtilityRepository::new())
            .cleanup_estimated()
            .await
            .unwrap();

        assert_eq!(removed.len(), 2);
    }
}
