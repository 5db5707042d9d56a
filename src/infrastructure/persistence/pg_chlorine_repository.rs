//! PostgreSQL implementation of the chlorine repository.

use async_trait::async_trait;
use sqlx::PgPool;
use std::sync::Arc;

use super::rows::{CHLORINE_COLUMNS, ChlorineRow};
use crate::domain::entities::ChlorineData;
use crate::domain::repositories::ChlorineRepository;
use crate::error::AppError;

pub struct PgChlorineRepository {
    pool: Arc<PgPool>,
}

impl PgChlorineRepository {
    pub fn new(pool: Arc<PgPool>) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl ChlorineRepository for PgChlorineRepository {
    async fn find_by_pwsid(&self, pwsid: &str) -> Result<Option<ChlorineData>, AppError> {
        let sql = format!("SELECT {CHLORINE_COLUMNS} FROM chlorine_data WHERE pwsid = $1");

        let row = sqlx::query_as::<_, ChlorineRow>(&sql)
            .bind(pwsid)
            .fetch_optional(self.pool.as_ref())
            .await?;

        Ok(row.map(Into::into))
    }

    async fn list(&self) -> Result<Vec<ChlorineData>, AppError> {
        let sql = format!("SELECT {CHLORINE_COLUMNS} FROM chlorine_data ORDER BY pwsid");

        let rows = sqlx::query_as::<_, ChlorineRow>(&sql)
            .fetch_all(self.pool.as_ref())
            .await?;

        Ok(rows.into_iter().map(Into::into).collect())
    }
}
