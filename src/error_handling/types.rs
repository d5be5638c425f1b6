//! Error type definitions.

use log::SetLoggerError;
use reqwest::Error as ReqwestError;
use thiserror::Error;

/// Error types for initialization failures.
#[derive(Error, Debug)]
#[allow(clippy::enum_variant_names)] // All variants end with "Error" by convention
pub enum InitializationError {
    /// Error initializing the logger.
    #[error("Logger initialization error: {0}")]
    LoggerError(#[from] SetLoggerError),

    /// Error initializing the HTTP client.
    #[error("HTTP client initialization error: {0}")]
    HttpClientError(#[from] ReqwestError),
}

/// Failure of an upstream data source (registration records or archive index).
#[derive(Error, Debug)]
pub enum SourceError {
    /// The upstream answered with a non-success status.
    #[error("{source_name} returned HTTP {status}")]
    Status {
        source_name: &'static str,
        status: u16,
    },

    /// The request could not be completed.
    #[error("{source_name} request failed: {error}")]
    Transport {
        source_name: &'static str,
        #[source]
        error: ReqwestError,
    },

    /// The upstream answered with a body we could not decode.
    #[error("{source_name} returned an unreadable payload: {detail}")]
    Decode {
        source_name: &'static str,
        detail: String,
    },
}

/// Failure of a cache backend call.
///
/// Never surfaced to callers of the engine: the cache facade logs and treats
/// these as misses.
#[derive(Error, Debug)]
pub enum CacheError {
    #[error("redis error: {0}")]
    Redis(#[from] redis::RedisError),

    #[error("cache entry could not be (de)serialized: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("cache backend did not answer within {0:?}")]
    Timeout(std::time::Duration),
}

/// Failure of the validation probe before a final response was read.
#[derive(Error, Debug)]
pub enum ProbeError {
    /// Transport-level failure (DNS, connect, TLS, timeout, body read).
    #[error("{}", describe_chain(.0))]
    Http(#[from] ReqwestError),

    /// A redirect pointed somewhere the probe cannot follow.
    #[error("invalid redirect location '{0}'")]
    Redirect(String),

    /// The redirect chain did not settle within the hop limit.
    #[error("exceeded maximum of {0} redirects")]
    TooManyRedirects(usize),
}

impl ProbeError {
    /// Whether the failure was a timeout.
    pub fn is_timeout(&self) -> bool {
        matches!(self, ProbeError::Http(e) if e.is_timeout())
    }
}

/// Renders an error with its full source chain (`outer: inner: root`).
///
/// reqwest's own `Display` stops at "error sending request", which hides the
/// actual cause (DNS failure, refused connection, certificate problem).
pub fn describe_chain(error: &dyn std::error::Error) -> String {
    let mut message = error.to_string();
    let mut source = error.source();
    while let Some(cause) = source {
        let cause_text = cause.to_string();
        if !message.contains(&cause_text) {
            message.push_str(": ");
            message.push_str(&cause_text);
        }
        source = cause.source();
    }
    message
}

impl SourceError {
    /// Wraps a reqwest error for the named source.
    pub fn transport(source_name: &'static str, error: ReqwestError) -> Self {
        SourceError::Transport { source_name, error }
    }

    /// Wraps a decoding failure for the named source.
    pub fn decode(source_name: &'static str, detail: impl ToString) -> Self {
        SourceError::Decode {
            source_name,
            detail: detail.to_string(),
        }
    }
}
