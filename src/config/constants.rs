//! Configuration constants.
//!
//! This module defines all configuration constants used throughout the engine,
//! including timeouts, size limits, upstream endpoints and cache lifetimes.

use std::time::Duration;

/// Per-probe request timeout in seconds
pub const DEFAULT_TIMEOUT_SECS: u64 = 10;
/// Per-source timeout for registration and archive lookups in seconds
pub const DEFAULT_LOOKUP_TIMEOUT_SECS: u64 = 15;
/// Maximum URL evaluations running at once in a batch
pub const DEFAULT_MAX_CONCURRENCY: usize = 10;

// Network operation timeouts
/// TCP connection timeout in seconds
pub const TCP_CONNECT_TIMEOUT_SECS: u64 = 5;
/// TLS handshake timeout in seconds
pub const TLS_HANDSHAKE_TIMEOUT_SECS: u64 = 5;

/// Default User-Agent string for outbound probes and lookups.
///
/// Users can override this via the `--user-agent` CLI flag.
pub const DEFAULT_USER_AGENT: &str = "URL-Reputation-Checker/1.0";

// Redirect handling
/// Maximum number of redirect hops to follow
/// Prevents infinite redirect loops and excessive request chains
pub const MAX_REDIRECT_HOPS: usize = 10;

// Response body limits
/// Maximum response body bytes kept for content heuristics (2MB)
/// Bytes beyond this are still counted toward the content length but not stored
pub const MAX_RESPONSE_BODY_SIZE: usize = 2 * 1024 * 1024;

/// Maximum URL length (2048 characters), matching common browser and server limits.
pub const MAX_URL_LENGTH: usize = 2048;

// Upstream data sources
/// RDAP bootstrap endpoint; the registrable domain is appended to it.
pub const DEFAULT_RDAP_ENDPOINT: &str = "https://rdap.org/domain/";
/// Wayback Machine CDX index endpoint.
pub const DEFAULT_ARCHIVE_ENDPOINT: &str = "https://web.archive.org/cdx/search/cdx";
/// Maximum rows requested from the CDX index.
/// Rows come back oldest first, so the earliest snapshot is always included and
/// the snapshot count saturates at this value (well above the top scoring bracket).
pub const ARCHIVE_SNAPSHOT_LIMIT: usize = 5000;

// Cache
/// Cache key namespace
pub const CACHE_KEY_PREFIX: &str = "url_reputation";
/// Identifiers longer than this are replaced by their SHA-256 digest in cache keys
pub const CACHE_KEY_HASH_THRESHOLD: usize = 200;
/// Retention for outcomes of URLs that validated (24 hours)
pub const CACHE_TTL_VALID: Duration = Duration::from_secs(24 * 60 * 60);
/// Retention for outcomes of URLs that failed validation (1 hour)
pub const CACHE_TTL_INVALID: Duration = Duration::from_secs(60 * 60);
/// Retention for domain history records (7 days, registration data changes infrequently)
pub const CACHE_TTL_HISTORY: Duration = Duration::from_secs(7 * 24 * 60 * 60);
/// Timeout for establishing the cache backend connection
pub const CACHE_CONNECT_TIMEOUT: Duration = Duration::from_secs(5);

// Evaluation log
/// Number of evaluations retained by the evaluation log
pub const EVALUATION_LOG_CAPACITY: usize = 1000;
/// Number of most recent evaluations listed in the report
pub const REPORT_RECENT_ENTRIES: usize = 50;

/// Default port for the HTTP surface
pub const DEFAULT_SERVER_PORT: u16 = 8765;
