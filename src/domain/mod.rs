//! Domain extraction and normalization utilities.
//!
//! This module extracts registrable domains from URLs using the Public Suffix
//! List (PSL), so `sub.example.co.uk` resolves to `example.co.uk`.
//!
//! Key functions:
//! - `extract_domain()` - Extracts the registrable domain from a URL, failing on IPs
//! - `registrable_domain()` - Infallible variant used by the history resolver

use anyhow::{Context, Result};
use url::{Host, Url};

/// Extracts the registrable domain from a URL using the Public Suffix List.
///
/// # Arguments
///
/// * `url` - The URL to extract the domain from
///
/// # Returns
///
/// The registrable domain (e.g., "example.com" from "https://www.example.com/path")
///
/// # Errors
///
/// Returns an error if the URL cannot be parsed, has no host, is an IP address,
/// or the host has no registrable part (e.g. it is itself a public suffix).
pub fn extract_domain(url: &str) -> Result<String> {
    let parsed = Url::parse(url).with_context(|| format!("Failed to parse URL: {}", url))?;

    let host = match parsed.host() {
        Some(Host::Domain(domain)) => domain.to_lowercase(),
        Some(Host::Ipv4(_)) | Some(Host::Ipv6(_)) => {
            return Err(anyhow::anyhow!(
                "IP addresses do not have registrable domains: {}",
                parsed.host_str().unwrap_or_default()
            ));
        }
        None => return Err(anyhow::anyhow!("URL '{}' has no host component", url)),
    };

    let host = host.trim_end_matches('.');
    psl::domain_str(host)
        .map(str::to_string)
        .ok_or_else(|| anyhow::anyhow!("No registrable domain found in URL: {}", url))
}

/// Resolves the registrable domain for a URL or a bare domain name.
///
/// Bare names are read as `https://<name>`. When the PSL cannot produce a
/// registrable domain (IP literals, bare public suffixes), the lower-cased host
/// is returned; input that has no host at all is returned trimmed and lower-cased.
pub fn registrable_domain(input: &str) -> String {
    let input = input.trim();
    let candidate = if input.contains("://") {
        input.to_string()
    } else {
        format!("https://{input}")
    };

    if let Ok(domain) = extract_domain(&candidate) {
        return domain;
    }

    match Url::parse(&candidate) {
        Ok(parsed) => parsed
            .host_str()
            .map(|host| host.trim_end_matches('.').to_lowercase())
            .unwrap_or_else(|| input.to_lowercase()),
        Err(_) => input.to_lowercase(),
    }
}
