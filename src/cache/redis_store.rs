//! Redis cache backend.

use std::time::Duration;

use async_trait::async_trait;
use redis::aio::ConnectionManager;
use redis::AsyncCommands;

use super::CacheStore;
use crate::error_handling::CacheError;

/// Keys fetched per SCAN round trip.
const SCAN_BATCH: usize = 100;

/// Store backed by a Redis `ConnectionManager` (reconnects on its own).
#[derive(Clone)]
pub struct RedisCache {
    manager: ConnectionManager,
}

impl RedisCache {
    /// Opens a managed connection and confirms it with `PING`.
    ///
    /// # Errors
    ///
    /// Returns an error if the URL is invalid, the server refuses the
    /// connection, or nothing answers within `timeout`.
    pub async fn connect(url: &str, timeout: Duration) -> Result<Self, CacheError> {
        let client = redis::Client::open(url)?;
        let connect = async {
            let mut manager = ConnectionManager::new(client).await?;
            let _pong: String = redis::cmd("PING").query_async(&mut manager).await?;
            Ok::<_, CacheError>(manager)
        };
        let manager = tokio::time::timeout(timeout, connect)
            .await
            .map_err(|_| CacheError::Timeout(timeout))??;
        Ok(Self { manager })
    }

    /// Collects every key matching `prefix*` with non-blocking SCAN.
    async fn scan_keys(&self, prefix: &str) -> Result<Vec<String>, CacheError> {
        let mut conn = self.manager.clone();
        let pattern = format!("{prefix}*");
        let mut keys = Vec::new();
        let mut cursor = 0u64;
        loop {
            let (next, batch): (u64, Vec<String>) = redis::cmd("SCAN")
                .arg(cursor)
                .arg("MATCH")
                .arg(&pattern)
                .arg("COUNT")
                .arg(SCAN_BATCH)
                .query_async(&mut conn)
                .await?;
            keys.extend(batch);
            cursor = next;
            if cursor == 0 {
                break;
            }
        }
        Ok(keys)
    }
}

#[async_trait]
impl CacheStore for RedisCache {
    async fn get(&self, key: &str) -> Result<Option<String>, CacheError> {
        let mut conn = self.manager.clone();
        let value: Option<String> = conn.get(key).await?;
        Ok(value)
    }

    async fn set(&self, key: &str, value: String, ttl: Duration) -> Result<(), CacheError> {
        let mut conn = self.manager.clone();
        let seconds = ttl.as_secs().max(1);
        let _: () = conn.set_ex(key, value, seconds).await?;
        Ok(())
    }

    async fn count(&self, prefix: &str) -> Result<u64, CacheError> {
        Ok(self.scan_keys(prefix).await?.len() as u64)
    }

    async fn clear(&self, prefix: &str) -> Result<u64, CacheError> {
        let keys = self.scan_keys(prefix).await?;
        if keys.is_empty() {
            return Ok(0);
        }
        let mut conn = self.manager.clone();
        let removed: u64 = conn.del(keys).await?;
        Ok(removed)
    }
}
