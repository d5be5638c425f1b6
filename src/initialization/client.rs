//! HTTP client initialization.

use std::sync::Arc;

use reqwest::ClientBuilder;

use crate::config::{Config, MAX_REDIRECT_HOPS};

/// Initializes the shared HTTP client.
///
/// Creates a `reqwest::Client` configured with:
/// - User-Agent header from the config
/// - Per-request timeout from the config
/// - Redirects disabled so the validator can count hops itself
/// - Rustls TLS backend with the webpki trust store
///
///
/// # Errors
///
/// Returns a `reqwest::Error` if client creation fails.
pub fn init_client(config: &Config) -> Result<Arc<reqwest::Client>, reqwest::Error> {
    let client = ClientBuilder::new()
        .redirect(reqwest::redirect::Policy::none())
        .timeout(config.timeout())
        .user_agent(config.user_agent.clone())
        .use_rustls_tls()
        .build()?;
    Ok(Arc::new(client))
}

/// Initializes the client used for registration and archive lookups.
///
/// Unlike the probe client this one follows redirects (RDAP bootstrap
/// services answer with a redirect to the authoritative server) and uses the
/// lookup timeout.
///
/// # Errors
///
/// Returns a `reqwest::Error` if client creation fails.
pub fn init_lookup_client(config: &Config) -> Result<Arc<reqwest::Client>, reqwest::Error> {
    let client = ClientBuilder::new()
        .redirect(reqwest::redirect::Policy::limited(MAX_REDIRECT_HOPS))
        .timeout(config.lookup_timeout())
        .user_agent(config.user_agent.clone())
        .use_rustls_tls()
        .build()?;
    Ok(Arc::new(client))
}
