//! Domain history resolution.
//!
//! Combines two independent upstream sources into a [`DomainHistory`]:
//! - Registration records (RDAP) for the registrable domain
//! - Archive captures (Wayback CDX) for the URL as given
//!
//! Both lookups run concurrently, each under its own timeout. A failing or slow
//! source only blanks its own fields.

mod parse;
mod rdap;
mod types;
mod wayback;

use std::future::Future;
use std::sync::Arc;
use std::time::Duration;

use chrono::{DateTime, Utc};

use crate::config::Config;
use crate::domain::registrable_domain;
use crate::error_handling::SourceError;
use crate::models::DomainHistory;

pub use rdap::RdapSource;
pub use types::{ArchiveRecord, ArchiveSource, RegistrationRecord, RegistrationSource};
pub use wayback::WaybackSource;

use parse::{first_parseable, parse_archive_timestamp};

/// Resolves registration and archive history for URLs and bare domains.
#[derive(Clone)]
pub struct DomainHistoryResolver {
    registration: Arc<dyn RegistrationSource>,
    archive: Arc<dyn ArchiveSource>,
    lookup_timeout: Duration,
}

impl DomainHistoryResolver {
    pub fn new(
        registration: Arc<dyn RegistrationSource>,
        archive: Arc<dyn ArchiveSource>,
        lookup_timeout: Duration,
    ) -> Self {
        Self {
            registration,
            archive,
            lookup_timeout,
        }
    }

    /// Resolver backed by the configured RDAP and CDX endpoints.
    pub fn from_config(client: Arc<reqwest::Client>, config: &Config) -> Self {
        Self::new(
            Arc::new(RdapSource::new(
                Arc::clone(&client),
                config.rdap_endpoint.clone(),
            )),
            Arc::new(WaybackSource::new(client, config.archive_endpoint.clone())),
            config.lookup_timeout(),
        )
    }

    /// Resolves the history of a URL or bare domain.
    ///
    /// Never fails: any source error or timeout leaves that source's fields empty.
    pub async fn resolve(&self, url: &str) -> DomainHistory {
        let url = url.trim();
        let domain = registrable_domain(url);
        log::debug!("Resolving history for {domain} ({url})");

        let (registration, archive) = tokio::join!(
            isolate("registration", self.lookup_timeout, self.registration.lookup(&domain)),
            isolate("archive", self.lookup_timeout, self.archive.lookup(url)),
        );

        from_parts(domain, registration.flatten(), archive, Utc::now())
    }
}

/// Runs one source lookup under a timeout, logging and discarding failures.
async fn isolate<T>(
    source: &str,
    timeout: Duration,
    lookup: impl Future<Output = Result<T, SourceError>>,
) -> Option<T> {
    match tokio::time::timeout(timeout, lookup).await {
        Ok(Ok(value)) => Some(value),
        Ok(Err(e)) => {
            log::info!("{source} lookup failed: {e}");
            None
        }
        Err(_) => {
            log::info!("{source} lookup timed out after {timeout:?}");
            None
        }
    }
}

/// Builds a history from whatever the sources returned.
///
/// `age_days` is whole days between the creation date and `now`, present only
/// when a creation date parsed.
pub fn from_parts(
    domain: String,
    registration: Option<RegistrationRecord>,
    archive: Option<ArchiveRecord>,
    now: DateTime<Utc>,
) -> DomainHistory {
    let mut history = DomainHistory::empty(domain);

    if let Some(record) = registration {
        history.creation_date = first_parseable(&record.creation_dates);
        history.expiration_date = first_parseable(&record.expiration_dates);
        history.registrar = record.registrar;
        history.age_days = history
            .creation_date
            .map(|created| (now - created).num_days());
    }

    if let Some(record) = archive {
        history.wayback_first_snapshot = record
            .earliest_timestamp
            .as_deref()
            .and_then(parse_archive_timestamp);
        history.wayback_total_snapshots = record.total_snapshots;
    }

    history
}
