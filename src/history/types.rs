//! Source records and the traits upstream lookups implement.

use async_trait::async_trait;

use crate::error_handling::SourceError;

/// Registration data as reported upstream, before date normalization.
///
/// Date fields keep every value the registry returned, in upstream order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RegistrationRecord {
    pub creation_dates: Vec<String>,
    pub expiration_dates: Vec<String>,
    pub registrar: Option<String>,
}

/// Archive index summary for one URL.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ArchiveRecord {
    /// Earliest capture timestamp (`YYYYMMDDHHMMSS`).
    pub earliest_timestamp: Option<String>,
    pub total_snapshots: u64,
}

/// Looks up registration records for a registrable domain.
#[async_trait]
pub trait RegistrationSource: Send + Sync {
    /// `Ok(None)` when the registry has no record of the domain.
    async fn lookup(&self, domain: &str) -> Result<Option<RegistrationRecord>, SourceError>;
}

/// Looks up archived captures of a URL.
#[async_trait]
pub trait ArchiveSource: Send + Sync {
    async fn lookup(&self, url: &str) -> Result<ArchiveRecord, SourceError>;
}
