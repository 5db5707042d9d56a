//! PostgreSQL implementation of the utility repository.

use async_trait::async_trait;
use sqlx::PgPool;
use std::sync::Arc;

use super::rows::{ServedUtilityRow, UTILITY_COLUMNS, UtilityRow};
use crate::domain::entities::{ServedUtility, WaterUtility};
use crate::domain::repositories::UtilityRepository;
use crate::error::AppError;

pub struct PgUtilityRepository {
    pool: Arc<PgPool>,
}

impl PgUtilityRepository {
    pub fn new(pool: Arc<PgPool>) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl UtilityRepository for PgUtilityRepository {
    async fn find_by_pwsid(&self, pwsid: &str) -> Result<Option<WaterUtility>, AppError> {
        let sql = format!("SELECT {UTILITY_COLUMNS} FROM water_utilities WHERE pwsid = $1");

        let row = sqlx::query_as::<_, UtilityRow>(&sql)
            .bind(pwsid)
            .fetch_optional(self.pool.as_ref())
            .await?;

        Ok(row.map(Into::into))
    }

    async fn find_by_zip_code(&self, zip_code: &str) -> Result<Vec<ServedUtility>, AppError> {
        let rows = sqlx::query_as::<_, ServedUtilityRow>(
            r#"
            SELECT w.pwsid, w.utility_name, w.utility_type, w.city, w.state, w.county,
                   w.population_served, w.service_connections, w.is_active,
                   w.created_at, w.updated_at, z.is_primary
            FROM zip_code_mapping z
            JOIN water_utilities w ON w.pwsid = z.pwsid
            WHERE z.zip_code = $1
            ORDER BY z.is_primary DESC, w.population_served DESC, w.pwsid
            "#,
        )
        .bind(zip_code)
        .fetch_all(self.pool.as_ref())
        .await?;

        Ok(rows.into_iter().map(Into::into).collect())
    }

    async fn list(&self, only_active: bool) -> Result<Vec<WaterUtility>, AppError> {
        let sql = format!(
            "SELECT {UTILITY_COLUMNS} FROM water_utilities \
             WHERE ($1 = FALSE OR is_active) ORDER BY pwsid"
        );

        let rows = sqlx::query_as::<_, UtilityRow>(&sql)
            .bind(only_active)
            .fetch_all(self.pool.as_ref())
            .await?;

        Ok(rows.into_iter().map(Into::into).collect())
    }
}
