//! PostgreSQL implementation of the administrative record store.

use async_trait::async_trait;
use sqlx::PgPool;
use std::sync::Arc;

use super::rows::{CHLORINE_COLUMNS, ChlorineRow, UTILITY_COLUMNS, UtilityRow, ZipMappingRow};
use crate::domain::entities::{
    NewChlorineData, NewWaterUtility, NewZipCodeMapping, Record, RecordKey, StoredRecord,
};
use crate::domain::repositories::RecordStore;
use crate::error::AppError;

/// Upserts use `INSERT ... ON CONFLICT DO UPDATE` keyed on each table's
/// primary key, so a write either creates the row or replaces all its fields.
pub struct PgRecordStore {
    pool: Arc<PgPool>,
}

impl PgRecordStore {
    pub fn new(pool: Arc<PgPool>) -> Self {
        Self { pool }
    }

    async fn upsert_utility(&self, u: NewWaterUtility) -> Result<StoredRecord, AppError> {
        let sql = format!(
            r#"
            INSERT INTO water_utilities
                (pwsid, utility_name, utility_type, city, state, county,
                 population_served, service_connections, is_active)
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9)
            ON CONFLICT (pwsid) DO UPDATE SET
                utility_name = EXCLUDED.utility_name,
                utility_type = EXCLUDED.utility_type,
                city = EXCLUDED.city,
                state = EXCLUDED.state,
                county = EXCLUDED.county,
                population_served = EXCLUDED.population_served,
                service_connections = EXCLUDED.service_connections,
                is_active = EXCLUDED.is_active,
                updated_at = NOW()
            RETURNING {UTILITY_COLUMNS}
            "#
        );

        let row = sqlx::query_as::<_, UtilityRow>(&sql)
            .bind(u.pwsid)
            .bind(u.utility_name)
            .bind(u.utility_type)
            .bind(u.city)
            .bind(u.state)
            .bind(u.county)
            .bind(u.population_served)
            .bind(u.service_connections)
            .bind(u.is_active)
            .fetch_one(self.pool.as_ref())
            .await?;

        Ok(StoredRecord::Utility(row.into()))
    }

    async fn upsert_chlorine(&self, c: NewChlorineData) -> Result<StoredRecord, AppError> {
        let sql = format!(
            r#"
            INSERT INTO chlorine_data
                (pwsid, utility_name, average_chlorine_ppm, min_chlorine_ppm, max_chlorine_ppm,
                 sample_count, last_updated, data_source, notes, source_url, confidence)
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11)
            ON CONFLICT (pwsid) DO UPDATE SET
                utility_name = EXCLUDED.utility_name,
                average_chlorine_ppm = EXCLUDED.average_chlorine_ppm,
                min_chlorine_ppm = EXCLUDED.min_chlorine_ppm,
                max_chlorine_ppm = EXCLUDED.max_chlorine_ppm,
                sample_count = EXCLUDED.sample_count,
                last_updated = EXCLUDED.last_updated,
                data_source = EXCLUDED.data_source,
                notes = EXCLUDED.notes,
                source_url = EXCLUDED.source_url,
                confidence = EXCLUDED.confidence,
                updated_at = NOW()
            RETURNING {CHLORINE_COLUMNS}
            "#
        );

        let row = sqlx::query_as::<_, ChlorineRow>(&sql)
            .bind(c.pwsid)
            .bind(c.utility_name)
            .bind(c.average_chlorine_ppm)
            .bind(c.min_chlorine_ppm)
            .bind(c.max_chlorine_ppm)
            .bind(c.sample_count)
            .bind(c.last_updated)
            .bind(c.data_source)
            .bind(c.notes)
            .bind(c.source_url)
            .bind(c.confidence)
            .fetch_one(self.pool.as_ref())
            .await?;

        Ok(StoredRecord::Chlorine(row.into()))
    }

    async fn upsert_zip_mapping(&self, m: NewZipCodeMapping) -> Result<StoredRecord, AppError> {
        let row = sqlx::query_as::<_, ZipMappingRow>(
            r#"
            INSERT INTO zip_code_mapping (zip_code, pwsid, is_primary)
            VALUES ($1, $2, $3)
            ON CONFLICT (zip_code, pwsid) DO UPDATE SET
                is_primary = EXCLUDED.is_primary,
                updated_at = NOW()
            RETURNING zip_code, pwsid, is_primary, created_at, updated_at
            "#,
        )
        .bind(m.zip_code)
        .bind(m.pwsid)
        .bind(m.is_primary)
        .fetch_one(self.pool.as_ref())
        .await?;

        Ok(StoredRecord::ZipMapping(row.into()))
    }
}

#[async_trait]
impl RecordStore for PgRecordStore {
    async fn upsert(&self, record: Record) -> Result<StoredRecord, AppError> {
        match record {
            Record::Utility(u) => self.upsert_utility(u).await,
            Record::Chlorine(c) => self.upsert_chlorine(c).await,
            Record::ZipMapping(m) => self.upsert_zip_mapping(m).await,
        }
    }

    async fn delete(&self, key: RecordKey) -> Result<u64, AppError> {
        let result = match &key {
            RecordKey::Utility { pwsid } => {
                sqlx::query("DELETE FROM water_utilities WHERE pwsid = $1")
                    .bind(pwsid)
                    .execute(self.pool.as_ref())
                    .await?
            }
            RecordKey::Chlorine { pwsid } => {
                sqlx::query("DELETE FROM chlorine_data WHERE pwsid = $1")
                    .bind(pwsid)
                    .execute(self.pool.as_ref())
                    .await?
            }
            RecordKey::ZipMapping { zip_code, pwsid } => {
                sqlx::query("DELETE FROM zip_code_mapping WHERE zip_code = $1 AND pwsid = $2")
                    .bind(zip_code)
                    .bind(pwsid)
                    .execute(self.pool.as_ref())
                    .await?
            }
        };

        Ok(result.rows_affected())
    }

    async fn delete_estimated_chlorine(&self) -> Result<Vec<String>, AppError> {
        let pwsids = sqlx::query_scalar::<_, String>(
            r#"
            DELETE FROM chlorine_data
            WHERE data_source ILIKE '%estimated%' OR notes ILIKE '%estimated%'
            RETURNING pwsid
            "#,
        )
        .fetch_all(self.pool.as_ref())
        .await?;

        Ok(pwsids)
    }
}
