//! No-op cache implementation for testing or disabled caching.

use super::service::{CacheResult, CacheService};
use crate::domain::entities::ChlorineData;
use async_trait::async_trait;
use tracing::debug;

/// A cache that stores nothing. Every read is a miss.
///
/// Used when `REDIS_URL` is unset, when Redis is unreachable at startup,
/// and in tests.
pub struct NullCache;

impl NullCache {
    pub fn new() -> Self {
        debug!("Using NullCache (caching disabled)");
        Self
    }
}

impl Default for NullCache {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl CacheService for NullCache {
    async fn get_chlorine(&self, _pwsid: &str) -> CacheResult<Option<ChlorineData>> {
        Ok(None)
    }

    async fn set_chlorine(&self, _data: &ChlorineData, _ttl_seconds: Option<u64>) -> CacheResult<()> {
        Ok(())
    }

    async fn invalidate(&self, _pwsid: &str) -> CacheResult<()> {
        Ok(())
    }

    async fn health_check(&self) -> bool {
        true
    }
}
