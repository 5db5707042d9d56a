//! Cache service trait and error types.

use async_trait::async_trait;
use thiserror::Error;

use crate::domain::entities::ChlorineData;

/// Errors that can occur during cache operations.
#[derive(Debug, Error)]
pub enum CacheError {
    #[error("Cache connection error: {0}")]
    Connection(String),
    #[error("Cache serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

/// Result type for cache operations.
pub type CacheResult<T> = Result<T, CacheError>;

/// Cache for chlorine records keyed by PWSID.
///
/// Implementations are fail-open: a broken backend reads as a miss and
/// swallows writes, so lookups degrade to the database.
///
/// # Implementations
///
/// - [`crate::infrastructure::cache::RedisCache`] - Redis-backed cache with TTL support
/// - [`crate::infrastructure::cache::NullCache`] - No-op implementation for disabled caching
#[async_trait]
pub trait CacheService: Send + Sync {
    /// Returns the cached record, or `None` on miss or backend error.
    async fn get_chlorine(&self, pwsid: &str) -> CacheResult<Option<ChlorineData>>;

    /// Stores a record. `ttl_seconds = None` uses the implementation default.
    async fn set_chlorine(&self, data: &ChlorineData, ttl_seconds: Option<u64>) -> CacheResult<()>;

    /// Drops the cached record of a utility after it was written or deleted.
    async fn invalidate(&self, pwsid: &str) -> CacheResult<()>;

    /// Used by the health endpoint.
    async fn health_check(&self) -> bool;
}
