//! Result cache.
//!
//! Typed facade over a key-value backend:
//! - Validation outcomes keyed by URL (`Valid` / `Invalid` TTL classes)
//! - Domain histories keyed by the requested domain (`History` TTL class)
//!
//! Records are stored as JSON envelopes `{cached_at, record}` under
//! `url_reputation:<kind>:<id>`. A missing or failing backend turns every
//! call into a miss.

mod memory;
mod redis_store;

use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};
use strum_macros::{AsRefStr, Display, EnumIter};

use crate::config::{Config, CACHE_CONNECT_TIMEOUT, CACHE_KEY_HASH_THRESHOLD, CACHE_KEY_PREFIX};
use crate::error_handling::CacheError;
use crate::models::{DomainHistory, ValidationOutcome};

pub use memory::MemoryCache;
pub use redis_store::RedisCache;

/// Key-value backend with per-entry expiry.
#[async_trait]
pub trait CacheStore: Send + Sync {
    async fn get(&self, key: &str) -> Result<Option<String>, CacheError>;
    async fn set(&self, key: &str, value: String, ttl: Duration) -> Result<(), CacheError>;
    /// Number of live entries whose key starts with `prefix`.
    async fn count(&self, prefix: &str) -> Result<u64, CacheError>;
    /// Removes entries whose key starts with `prefix`, returning how many.
    async fn clear(&self, prefix: &str) -> Result<u64, CacheError>;
}

/// Record family, used as the middle key segment.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Display, AsRefStr, EnumIter)]
#[strum(serialize_all = "lowercase")]
pub enum CacheKind {
    Validation,
    History,
}

/// Expiry class of a cached record.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TtlClass {
    Valid,
    Invalid,
    History,
}

#[derive(Debug, Serialize, Deserialize)]
struct CacheEnvelope<T> {
    cached_at: DateTime<Utc>,
    record: T,
}

/// Entry counts reported by [`ReputationCache::stats`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CacheStats {
    pub enabled: bool,
    pub validation_entries: u64,
    pub history_entries: u64,
    pub total_entries: u64,
}

/// Builds the backend key for a record.
///
/// Ids longer than `CACHE_KEY_HASH_THRESHOLD` characters are replaced by their
/// SHA-256 hex digest.
pub fn cache_key(kind: CacheKind, id: &str) -> String {
    if id.chars().count() > CACHE_KEY_HASH_THRESHOLD {
        let digest = Sha256::digest(id.as_bytes());
        let hex: String = digest.iter().map(|byte| format!("{byte:02x}")).collect();
        format!("{CACHE_KEY_PREFIX}:{kind}:{hex}")
    } else {
        format!("{CACHE_KEY_PREFIX}:{kind}:{id}")
    }
}

fn kind_prefix(kind: CacheKind) -> String {
    format!("{CACHE_KEY_PREFIX}:{kind}:")
}

/// Cache of evaluation results, safe to share across tasks.
#[derive(Clone)]
pub struct ReputationCache {
    store: Option<Arc<dyn CacheStore>>,
    ttl_valid: Duration,
    ttl_invalid: Duration,
    ttl_history: Duration,
}

impl ReputationCache {
    pub fn new(store: Option<Arc<dyn CacheStore>>, config: &Config) -> Self {
        Self {
            store,
            ttl_valid: config.ttl_valid,
            ttl_invalid: config.ttl_invalid,
            ttl_history: config.ttl_history,
        }
    }

    /// Connects to the configured backend.
    ///
    /// With a `redis_url` the cache uses Redis, or runs disabled if the server
    /// cannot be reached. Without one it keeps entries in process.
    pub async fn connect(config: &Config) -> Self {
        let Some(url) = config.redis_url.as_deref() else {
            log::info!("No cache server configured, using in-process cache");
            return Self::in_memory(config);
        };

        match RedisCache::connect(url, CACHE_CONNECT_TIMEOUT).await {
            Ok(store) => {
                log::info!("Connected to cache at {url}");
                Self::new(Some(Arc::new(store)), config)
            }
            Err(e) => {
                log::warn!("Cache unavailable at {url}, continuing without caching: {e}");
                Self::disabled(config)
            }
        }
    }

    pub fn in_memory(config: &Config) -> Self {
        Self::new(Some(Arc::new(MemoryCache::new())), config)
    }

    /// A cache that never stores anything.
    pub fn disabled(config: &Config) -> Self {
        Self::new(None, config)
    }

    pub fn is_enabled(&self) -> bool {
        self.store.is_some()
    }

    fn ttl(&self, class: TtlClass) -> Duration {
        match class {
            TtlClass::Valid => self.ttl_valid,
            TtlClass::Invalid => self.ttl_invalid,
            TtlClass::History => self.ttl_history,
        }
    }

    /// Reads a record, treating backend and decoding failures as misses.
    pub async fn get<T: DeserializeOwned>(&self, kind: CacheKind, id: &str) -> Option<T> {
        let store = self.store.as_ref()?;
        let key = cache_key(kind, id);

        let raw = match store.get(&key).await {
            Ok(raw) => raw?,
            Err(e) => {
                log::debug!("Cache read failed for {key}: {e}");
                return None;
            }
        };

        match serde_json::from_str::<CacheEnvelope<T>>(&raw) {
            Ok(envelope) => {
                log::debug!("Cache hit for {key} (cached at {})", envelope.cached_at);
                Some(envelope.record)
            }
            Err(e) => {
                log::debug!("Discarding unreadable cache entry {key}: {e}");
                None
            }
        }
    }

    /// Writes a record with the TTL of `class`. Failures are logged and dropped.
    pub async fn set<T: Serialize>(&self, kind: CacheKind, id: &str, record: &T, class: TtlClass) {
        let Some(store) = self.store.as_ref() else {
            return;
        };
        let key = cache_key(kind, id);
        let envelope = CacheEnvelope {
            cached_at: Utc::now(),
            record,
        };

        let result = match serde_json::to_string(&envelope) {
            Ok(payload) => store.set(&key, payload, self.ttl(class)).await,
            Err(e) => Err(e.into()),
        };
        if let Err(e) = result {
            log::debug!("Cache write failed for {key}: {e}");
        }
    }

    pub async fn get_validation(&self, url: &str) -> Option<ValidationOutcome> {
        self.get(CacheKind::Validation, url).await
    }

    /// Stores an outcome under its URL; the TTL class follows `is_valid`.
    pub async fn set_validation(&self, outcome: &ValidationOutcome) {
        let class = if outcome.is_valid {
            TtlClass::Valid
        } else {
            TtlClass::Invalid
        };
        self.set(CacheKind::Validation, &outcome.url, outcome, class)
            .await;
    }

    pub async fn get_history(&self, domain: &str) -> Option<DomainHistory> {
        self.get(CacheKind::History, domain).await
    }

    pub async fn set_history(&self, domain: &str, history: &DomainHistory) {
        self.set(CacheKind::History, domain, history, TtlClass::History)
            .await;
    }

    /// Entry counts per kind. Unreadable counts are reported as zero.
    pub async fn stats(&self) -> CacheStats {
        let Some(store) = self.store.as_ref() else {
            return CacheStats {
                enabled: false,
                validation_entries: 0,
                history_entries: 0,
                total_entries: 0,
            };
        };

        let count = |kind: CacheKind| async move {
            store.count(&kind_prefix(kind)).await.unwrap_or_else(|e| {
                log::debug!("Cache count failed for {kind}: {e}");
                0
            })
        };
        let validation_entries = count(CacheKind::Validation).await;
        let history_entries = count(CacheKind::History).await;

        CacheStats {
            enabled: true,
            validation_entries,
            history_entries,
            total_entries: validation_entries + history_entries,
        }
    }

    /// Removes every cached record, returning how many were removed.
    pub async fn clear(&self) -> u64 {
        let Some(store) = self.store.as_ref() else {
            return 0;
        };
        match store.clear(&format!("{CACHE_KEY_PREFIX}:")).await {
            Ok(removed) => removed,
            Err(e) => {
                log::warn!("Cache clear failed: {e}");
                0
            }
        }
    }
}
