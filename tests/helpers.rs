// Shared test helpers: in-process history sources and evaluator construction.

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use url_reputation::history::{
    ArchiveRecord, ArchiveSource, DomainHistoryResolver, RegistrationRecord, RegistrationSource,
};
use url_reputation::{Config, Evaluator, ReputationCache, SourceError, UrlValidator};

/// Registration source returning a fixed creation date and counting calls.
#[derive(Default)]
pub struct FakeRegistry {
    pub calls: AtomicUsize,
}

#[async_trait]
impl RegistrationSource for FakeRegistry {
    async fn lookup(&self, _domain: &str) -> Result<Option<RegistrationRecord>, SourceError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        Ok(Some(RegistrationRecord {
            creation_dates: vec!["2010-06-01T00:00:00Z".to_string()],
            expiration_dates: vec!["2030-06-01T00:00:00Z".to_string()],
            registrar: Some("Test Registrar LLC".to_string()),
        }))
    }
}

/// Registration source that always fails.
#[allow(dead_code)] // Used by some test files
pub struct BrokenRegistry;

#[async_trait]
impl RegistrationSource for BrokenRegistry {
    async fn lookup(&self, _domain: &str) -> Result<Option<RegistrationRecord>, SourceError> {
        Err(SourceError::decode("RDAP", "unexpected end of input"))
    }
}

/// Archive source with a fixed snapshot count, counting calls.
pub struct FakeArchive {
    pub calls: AtomicUsize,
    pub snapshots: u64,
}

impl FakeArchive {
    pub fn with_snapshots(snapshots: u64) -> Self {
        Self {
            calls: AtomicUsize::new(0),
            snapshots,
        }
    }
}

#[async_trait]
impl ArchiveSource for FakeArchive {
    async fn lookup(&self, _url: &str) -> Result<ArchiveRecord, SourceError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        Ok(ArchiveRecord {
            earliest_timestamp: Some("20100701000000".to_string()),
            total_snapshots: self.snapshots,
        })
    }
}

/// Builds an evaluator over the given sources with a no-redirect probe client.
pub fn build_evaluator(
    registration: Arc<dyn RegistrationSource>,
    archive: Arc<dyn ArchiveSource>,
    probe_timeout: Duration,
    cache: ReputationCache,
) -> Evaluator {
    let client = reqwest::Client::builder()
        .redirect(reqwest::redirect::Policy::none())
        .timeout(probe_timeout)
        .build()
        .expect("Failed to build test HTTP client");
    Evaluator::new(
        UrlValidator::new(Arc::new(client), probe_timeout),
        DomainHistoryResolver::new(registration, archive, Duration::from_secs(5)),
        cache,
        Config::default().max_concurrency,
    )
}

/// A well-formed page long enough to pass the content checks.
#[allow(dead_code)] // Used by some test files
pub const GOOD_PAGE: &str = "<!DOCTYPE html><html><head><title>Team handbook</title></head>\
<body><h1>Team handbook</h1><p>How we plan, review and ship work, with links to the \
tools and rotations each team member needs.</p></body></html>";
