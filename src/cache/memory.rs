//! In-process cache backend.

use std::collections::HashMap;
use std::time::{Duration, Instant};

use async_trait::async_trait;
use tokio::sync::RwLock;

use super::CacheStore;
use crate::error_handling::CacheError;

/// Map-backed store with per-entry expiry.
///
/// Expired entries are invisible to reads and dropped on the next write.
#[derive(Default)]
pub struct MemoryCache {
    entries: RwLock<HashMap<String, (String, Instant)>>,
}

impl MemoryCache {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl CacheStore for MemoryCache {
    async fn get(&self, key: &str) -> Result<Option<String>, CacheError> {
        let entries = self.entries.read().await;
        Ok(entries
            .get(key)
            .filter(|(_, expires_at)| *expires_at > Instant::now())
            .map(|(value, _)| value.clone()))
    }

    async fn set(&self, key: &str, value: String, ttl: Duration) -> Result<(), CacheError> {
        let now = Instant::now();
        let mut entries = self.entries.write().await;
        entries.retain(|_, (_, expires_at)| *expires_at > now);
        entries.insert(key.to_string(), (value, now + ttl));
        Ok(())
    }

    async fn count(&self, prefix: &str) -> Result<u64, CacheError> {
        let now = Instant::now();
        let entries = self.entries.read().await;
        Ok(entries
            .iter()
            .filter(|(key, (_, expires_at))| key.starts_with(prefix) && *expires_at > now)
            .count() as u64)
    }

    async fn clear(&self, prefix: &str) -> Result<u64, CacheError> {
        let mut entries = self.entries.write().await;
        let before = entries.len();
        entries.retain(|key, _| !key.starts_with(prefix));
        Ok((before - entries.len()) as u64)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_set_then_get() {
        let cache = MemoryCache::new();
        cache
            .set("a:1", "one".into(), Duration::from_secs(60))
            .await
            .unwrap();
        assert_eq!(cache.get("a:1").await.unwrap().as_deref(), Some("one"));
        assert!(cache.get("a:2").await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_expired_entries_are_misses() {
        let cache = MemoryCache::new();
        cache
            .set("a:1", "one".into(), Duration::from_millis(20))
            .await
            .unwrap();
        tokio::time::sleep(Duration::from_millis(50)).await;
        assert!(cache.get("a:1").await.unwrap().is_none());
        assert_eq!(cache.count("a:").await.unwrap(), 0);
    }

    #[tokio::test]
    async fn test_count_and_clear_by_prefix() {
        let cache = MemoryCache::new();
        let ttl = Duration::from_secs(60);
        cache.set("a:1", "x".into(), ttl).await.unwrap();
        cache.set("a:2", "x".into(), ttl).await.unwrap();
        cache.set("b:1", "x".into(), ttl).await.unwrap();

        assert_eq!(cache.count("a:").await.unwrap(), 2);
        assert_eq!(cache.clear("a:").await.unwrap(), 2);
        assert_eq!(cache.count("a:").await.unwrap(), 0);
        assert_eq!(cache.count("b:").await.unwrap(), 1);
    }
}
