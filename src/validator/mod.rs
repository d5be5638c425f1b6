//! URL validation probe.
//!
//! This module performs one live probe per URL and turns what it observed into a
//! [`ValidationOutcome`]:
//! - Syntax check (no network traffic for malformed input)
//! - GET with manually tracked redirects, bounded by the configured timeout
//! - TLS handshake confirmation at STANDARD depth and above
//! - Content heuristics for 200 responses at STANDARD depth and above
//! - URL pattern heuristics at COMPREHENSIVE depth
//!
//! Failures never escape as errors; they become warnings. Probes are not retried.

mod content;
mod tls;

use std::sync::Arc;
use std::time::{Duration, Instant};

use reqwest::header::{CONTENT_TYPE, LOCATION};
use url::Url;

use crate::config::{MAX_REDIRECT_HOPS, MAX_RESPONSE_BODY_SIZE};
use crate::error_handling::ProbeError;
use crate::models::{
    ConfidenceLevel, OutcomeMetadata, ValidationDepth, ValidationOutcome, VALID_STATUS_CODES,
};
use crate::patterns::{detect_suspicious_patterns, is_syntactically_valid_url};

pub use content::{content_warnings, PARKING_PAGE_PHRASES};
pub use tls::verify_tls_handshake;

pub const WARNING_INVALID_FORMAT: &str = "Invalid URL format";
pub const WARNING_TIMEOUT: &str = "Request timeout";

/// Redirect statuses the probe follows.
const REDIRECT_STATUSES: &[u16] = &[301, 302, 303, 307, 308];

/// What one probe observed at the end of its redirect chain.
#[derive(Debug)]
struct Probe {
    final_url: Url,
    redirect_count: u32,
    status_code: u16,
    content_type: String,
    body: Vec<u8>,
    content_length: u64,
}

/// Issues validation probes over a shared HTTP client.
///
/// The client must have automatic redirects disabled (see
/// [`crate::initialization::init_client`]) so hops can be counted.
#[derive(Clone)]
pub struct UrlValidator {
    client: Arc<reqwest::Client>,
    timeout: Duration,
}

impl UrlValidator {
    /// Creates a validator that bounds every probe by `timeout`.
    pub fn new(client: Arc<reqwest::Client>, timeout: Duration) -> Self {
        Self { client, timeout }
    }

    /// Configured probe timeout.
    pub fn timeout(&self) -> Duration {
        self.timeout
    }

    /// Validates a single URL at the requested depth.
    ///
    /// Always returns an outcome. Malformed URLs return immediately without any
    /// network traffic; timeouts report the configured timeout as response time.
    pub async fn validate(&self, url: &str, depth: ValidationDepth) -> ValidationOutcome {
        if !is_syntactically_valid_url(url) {
            log::debug!("Rejecting malformed URL: {url}");
            return ValidationOutcome::failed(url, 0.0, WARNING_INVALID_FORMAT.to_string());
        }

        let start = Instant::now();
        let probe = match tokio::time::timeout(self.timeout, self.probe(url)).await {
            Ok(Ok(probe)) => probe,
            Ok(Err(e)) if e.is_timeout() => return self.timed_out(url),
            Err(_) => return self.timed_out(url),
            Ok(Err(e)) => {
                log::info!("Probe failed for {url}: {e}");
                return ValidationOutcome::failed(
                    url,
                    start.elapsed().as_secs_f64(),
                    format!("Request failed: {e}"),
                );
            }
        };
        let response_time = start.elapsed().as_secs_f64();

        let is_valid = VALID_STATUS_CODES.contains(&probe.status_code);
        let text = String::from_utf8_lossy(&probe.body);

        let ssl_valid = self.ssl_status(&probe.final_url, depth).await;

        let mut warnings = Vec::new();
        if depth >= ValidationDepth::Standard && probe.status_code == 200 {
            warnings.extend(content_warnings(&text));
        }
        if depth == ValidationDepth::Comprehensive {
            warnings.extend(detect_suspicious_patterns(&probe.final_url, &text));
        }

        log::debug!(
            "Probed {url}: status {} in {:.3}s, {} warning(s)",
            probe.status_code,
            response_time,
            warnings.len()
        );

        ValidationOutcome {
            url: url.to_string(),
            is_valid,
            status_code: probe.status_code,
            response_time,
            content_length: probe.content_length,
            ssl_valid,
            domain_age_days: None,
            first_seen_date: None,
            wayback_snapshots: 0,
            reputation_score: 0.0,
            confidence_level: ConfidenceLevel::classify(is_valid, warnings.len()),
            warnings,
            metadata: OutcomeMetadata {
                final_url: probe.final_url.to_string(),
                redirect_count: probe.redirect_count,
                content_type: probe.content_type,
            },
            error: None,
        }
    }

    fn timed_out(&self, url: &str) -> ValidationOutcome {
        log::info!("Probe timed out for {url} after {:?}", self.timeout);
        ValidationOutcome::failed(
            url,
            self.timeout.as_secs_f64(),
            WARNING_TIMEOUT.to_string(),
        )
    }

    /// Follows redirects up to `MAX_REDIRECT_HOPS` and reads the final body.
    ///
    /// A redirect arriving once the hop limit is used up fails the probe.
    async fn probe(&self, url: &str) -> Result<Probe, ProbeError> {
        let mut current = Url::parse(url).map_err(|_| ProbeError::Redirect(url.to_string()))?;
        let mut redirect_count: u32 = 0;

        loop {
            let response = self.client.get(current.clone()).send().await?;
            let status_code = response.status().as_u16();

            if REDIRECT_STATUSES.contains(&status_code) {
                if let Some(location) = response.headers().get(LOCATION) {
                    if redirect_count as usize >= MAX_REDIRECT_HOPS {
                        return Err(ProbeError::TooManyRedirects(MAX_REDIRECT_HOPS));
                    }
                    let location = location
                        .to_str()
                        .map_err(|_| ProbeError::Redirect(format!("{location:?}")))?;
                    let next = current
                        .join(location)
                        .map_err(|_| ProbeError::Redirect(location.to_string()))?;
                    if !matches!(next.scheme(), "http" | "https") {
                        return Err(ProbeError::Redirect(next.to_string()));
                    }
                    current = next;
                    redirect_count += 1;
                    continue;
                }
                log::warn!(
                    "Redirect status {} for {} but no Location header",
                    status_code,
                    current
                );
            }

            let content_type = response
                .headers()
                .get(CONTENT_TYPE)
                .and_then(|value| value.to_str().ok())
                .unwrap_or("unknown")
                .to_string();
            let (body, content_length) = read_capped_body(response).await?;

            return Ok(Probe {
                final_url: current,
                redirect_count,
                status_code,
                content_type,
                body,
                content_length,
            });
        }
    }

    /// `https` final URLs count as TLS-valid; STANDARD+ also requires a handshake.
    async fn ssl_status(&self, final_url: &Url, depth: ValidationDepth) -> bool {
        if final_url.scheme() != "https" {
            return false;
        }
        if depth < ValidationDepth::Standard {
            return true;
        }
        self.confirm_tls(final_url).await
    }

    async fn confirm_tls(&self, final_url: &Url) -> bool {
        let (Some(host), Some(port)) = (final_url.host_str(), final_url.port_or_known_default())
        else {
            return false;
        };
        match verify_tls_handshake(host, port).await {
            Ok(()) => true,
            Err(e) => {
                log::info!("TLS verification failed for {final_url}: {e}");
                false
            }
        }
    }
}

/// Streams the body, keeping at most `MAX_RESPONSE_BODY_SIZE` bytes.
///
/// Returns the kept prefix and the total number of bytes received.
async fn read_capped_body(mut response: reqwest::Response) -> Result<(Vec<u8>, u64), ProbeError> {
    let mut body = Vec::new();
    let mut total: u64 = 0;
    while let Some(chunk) = response.chunk().await? {
        total += chunk.len() as u64;
        let room = MAX_RESPONSE_BODY_SIZE.saturating_sub(body.len());
        body.extend_from_slice(&chunk[..chunk.len().min(room)]);
    }
    if total > MAX_RESPONSE_BODY_SIZE as u64 {
        log::debug!("Response body of {total} bytes truncated to {MAX_RESPONSE_BODY_SIZE}");
    }
    Ok((body, total))
}

#[cfg(test)]
mod tests {
    include!("tests.rs");
}
