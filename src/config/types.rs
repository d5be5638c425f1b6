//! Configuration types.
//!
//! This module defines the enums and the library configuration struct. CLI
//! parsing lives in the binary and converts into [`Config`].

use std::time::Duration;

use clap::ValueEnum;

use crate::config::constants::{
    CACHE_TTL_HISTORY, CACHE_TTL_INVALID, CACHE_TTL_VALID, DEFAULT_ARCHIVE_ENDPOINT,
    DEFAULT_LOOKUP_TIMEOUT_SECS, DEFAULT_MAX_CONCURRENCY, DEFAULT_RDAP_ENDPOINT,
    DEFAULT_TIMEOUT_SECS, DEFAULT_USER_AGENT, EVALUATION_LOG_CAPACITY,
};

/// Logging level for the application.
///
/// Controls the verbosity of log output, from most restrictive (Error) to most
/// verbose (Trace).
#[derive(Clone, Debug, ValueEnum)]
pub enum LogLevel {
    /// Only error messages
    Error,
    /// Error and warning messages
    Warn,
    /// Error, warning, and informational messages
    Info,
    /// All messages except trace
    Debug,
    /// All messages including trace
    Trace,
}

impl From<LogLevel> for log::LevelFilter {
    fn from(l: LogLevel) -> Self {
        match l {
            LogLevel::Error => log::LevelFilter::Error,
            LogLevel::Warn => log::LevelFilter::Warn,
            LogLevel::Info => log::LevelFilter::Info,
            LogLevel::Debug => log::LevelFilter::Debug,
            LogLevel::Trace => log::LevelFilter::Trace,
        }
    }
}

/// Log output format.
///
/// Controls how log messages are formatted:
/// - `Plain`: Human-readable format with colors (default)
/// - `Json`: Structured JSON format for machine parsing
#[derive(Clone, Debug, ValueEnum)]
pub enum LogFormat {
    /// Human-readable format with colors (default)
    Plain,
    /// Structured JSON format for machine parsing
    Json,
}

/// Library configuration (no CLI dependencies).
///
/// Every setting the engine consumes is passed in through this struct; no core
/// component reads environment variables on its own.
///
/// # Examples
///
/// ```no_run
/// use url_reputation::Config;
///
/// let config = Config {
///     timeout_seconds: 5,
///     redis_url: Some("redis://localhost:6379".to_string()),
///     ..Default::default()
/// };
/// ```
#[derive(Debug, Clone)]
pub struct Config {
    /// Log level
    pub log_level: LogLevel,

    /// Log format
    pub log_format: LogFormat,

    /// Per-probe request timeout in seconds
    pub timeout_seconds: u64,

    /// Per-source timeout for registration and archive lookups in seconds
    pub lookup_timeout_seconds: u64,

    /// HTTP User-Agent header value for probes and lookups
    pub user_agent: String,

    /// Maximum URL evaluations running at once
    pub max_concurrency: usize,

    /// Cache backend address (`redis://...`). `None` keeps an in-process cache.
    pub redis_url: Option<String>,

    /// RDAP endpoint the registrable domain is appended to
    pub rdap_endpoint: String,

    /// Wayback CDX index endpoint
    pub archive_endpoint: String,

    /// Cache retention for valid outcomes
    pub ttl_valid: Duration,

    /// Cache retention for invalid outcomes
    pub ttl_invalid: Duration,

    /// Cache retention for domain history
    pub ttl_history: Duration,

    /// Number of evaluations kept for the report
    pub history_capacity: usize,
}

impl Config {
    /// Probe timeout as a `Duration`.
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_seconds)
    }

    /// Lookup timeout as a `Duration`.
    pub fn lookup_timeout(&self) -> Duration {
        Duration::from_secs(self.lookup_timeout_seconds)
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            log_level: LogLevel::Info,
            log_format: LogFormat::Plain,
            timeout_seconds: DEFAULT_TIMEOUT_SECS,
            lookup_timeout_seconds: DEFAULT_LOOKUP_TIMEOUT_SECS,
            user_agent: DEFAULT_USER_AGENT.to_string(),
            max_concurrency: DEFAULT_MAX_CONCURRENCY,
            redis_url: None,
            rdap_endpoint: DEFAULT_RDAP_ENDPOINT.to_string(),
            archive_endpoint: DEFAULT_ARCHIVE_ENDPOINT.to_string(),
            ttl_valid: CACHE_TTL_VALID,
            ttl_invalid: CACHE_TTL_INVALID,
            ttl_history: CACHE_TTL_HISTORY,
            history_capacity: EVALUATION_LOG_CAPACITY,
        }
    }
}
