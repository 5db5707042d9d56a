//! Redis-backed cache implementation.

use super::service::{CacheError, CacheResult, CacheService};
use crate::domain::entities::ChlorineData;
use async_trait::async_trait;
use redis::{AsyncCommands, Client, aio::ConnectionManager};
use tracing::{debug, info, warn};

const KEY_PREFIX: &str = "chlorine:";

/// Redis cache storing chlorine records as JSON strings.
///
/// Uses `ConnectionManager` for automatic reconnection. Runtime errors are
/// logged and reported as misses.
pub struct RedisCache {
    client: ConnectionManager,
    default_ttl: u64,
}

impl RedisCache {
    /// Connects to Redis and verifies the connection with a PING.
    ///
    /// `default_ttl_seconds` comes from `CACHE_TTL_SECONDS`.
    ///
    /// # Errors
    ///
    /// Returns [`CacheError::Connection`] if the URL is invalid, the connection cannot
    /// be established, or the PING fails.
    pub async fn connect(redis_url: &str, default_ttl_seconds: u64) -> CacheResult<Self> {
        info!("Connecting to Redis");

        let client = Client::open(redis_url)
            .map_err(|e| CacheError::Connection(format!("Failed to create Redis client: {e}")))?;

        let manager = ConnectionManager::new(client)
            .await
            .map_err(|e| CacheError::Connection(format!("Failed to connect to Redis: {e}")))?;

        let mut test_conn = manager.clone();
        test_conn
            .ping::<()>()
            .await
            .map_err(|e| CacheError::Connection(format!("Redis PING failed: {e}")))?;

        info!("Connected to Redis");

        Ok(Self {
            client: manager,
            default_ttl: default_ttl_seconds,
        })
    }

    fn build_key(pwsid: &str) -> String {
        format!("{KEY_PREFIX}{pwsid}")
    }
}

#[async_trait]
impl CacheService for RedisCache {
    async fn get_chlorine(&self, pwsid: &str) -> CacheResult<Option<ChlorineData>> {
        let key = Self::build_key(pwsid);
        let mut conn = self.client.clone();

        let raw = match conn.get::<_, Option<String>>(&key).await {
            Ok(raw) => raw,
            Err(e) => {
                warn!(pwsid, error = %e, "Redis GET failed");
                return Ok(None);
            }
        };

        match raw {
            Some(json) => match serde_json::from_str::<ChlorineData>(&json) {
                Ok(data) => {
                    debug!(pwsid, "Cache HIT");
                    Ok(Some(data))
                }
                Err(e) => {
                    warn!(pwsid, error = %e, "Discarding undecodable cache entry");
                    let _ = conn.del::<_, i32>(&key).await;
                    Ok(None)
                }
            },
            None => {
                debug!(pwsid, "Cache MISS");
                Ok(None)
            }
        }
    }

    async fn set_chlorine(&self, data: &ChlorineData, ttl_seconds: Option<u64>) -> CacheResult<()> {
        let key = Self::build_key(&data.pwsid);
        let payload = serde_json::to_string(data)?;
        let ttl = ttl_seconds.unwrap_or(self.default_ttl);
        let mut conn = self.client.clone();

        if let Err(e) = conn.set_ex::<_, _, ()>(&key, payload, ttl).await {
            warn!(pwsid = %data.pwsid, error = %e, "Redis SET failed");
        } else {
            debug!(pwsid = %data.pwsid, ttl, "Cache SET");
        }
        Ok(())
    }

    async fn invalidate(&self, pwsid: &str) -> CacheResult<()> {
        let key = Self::build_key(pwsid);
        let mut conn = self.client.clone();

        match conn.del::<_, i32>(&key).await {
            Ok(deleted) if deleted > 0 => debug!(pwsid, "Cache INVALIDATE"),
            Ok(_) => {}
            Err(e) => warn!(pwsid, error = %e, "Redis DEL failed"),
        }
        Ok(())
    }

    async fn health_check(&self) -> bool {
        let mut conn = self.client.clone();
        conn.ping::<()>().await.is_ok()
    }
}
