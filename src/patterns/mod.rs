//! URL pattern heuristics.
//!
//! Pure functions with no I/O:
//! - `is_syntactically_valid_url()` - absolute http(s) URL with a plausible host
//! - `detect_suspicious_patterns()` - path/host heuristics for fabricated or lookalike URLs
//! - `edit_distance()` / `is_likely_typosquat()` - domain similarity checks

use once_cell::sync::Lazy;
use regex::Regex;
use url::{Host, Url};

use crate::config::MAX_URL_LENGTH;

/// Well-known domains checked for lookalike registrations.
pub const TYPOSQUAT_WATCHLIST: &[&str] = &["github.com", "google.com", "microsoft.com", "amazon.com"];

/// Paths shaped like content that generative systems commonly invent.
static FABRICATED_PATH_PATTERNS: Lazy<Vec<Regex>> = Lazy::new(|| {
    [
        r"/blog/\d{4}/\d{2}/\d{2}/[a-z-]+",
        r"/docs/v\d+\.\d+\.\d+/api",
        r"/research/papers/\d{4}/",
        r"/products/[a-z]+-[a-z]+-[a-z]+-[a-z]+",
    ]
    .iter()
    .map(|pattern| Regex::new(pattern).expect("fabricated path pattern must compile"))
    .collect()
});

/// Path segment count above which a path is considered unusually deep.
const MAX_PATH_SEGMENTS: usize = 6;
/// Host label count above which a host has excessive subdomains.
const MAX_HOST_LABELS: usize = 3;
/// Largest edit distance still treated as a lookalike.
const TYPOSQUAT_MAX_DISTANCE: usize = 2;

pub const WARNING_FABRICATED_PATH: &str = "URL pattern commonly seen in AI hallucinations";
pub const WARNING_DEEP_PATH: &str = "Unusually deep URL path structure";
pub const WARNING_EXCESSIVE_SUBDOMAINS: &str = "Excessive subdomains";

/// Checks that a string is a well-formed absolute http(s) URL with a usable host.
///
/// The host must be an IP literal or a domain name of at least two labels whose
/// top-level label is alphabetic (or an IDNA `xn--` label).
pub fn is_syntactically_valid_url(candidate: &str) -> bool {
    if candidate.is_empty()
        || candidate.len() > MAX_URL_LENGTH
        || candidate.chars().any(char::is_whitespace)
    {
        return false;
    }

    let parsed = match Url::parse(candidate) {
        Ok(parsed) => parsed,
        Err(_) => return false,
    };

    if !matches!(parsed.scheme(), "http" | "https") {
        return false;
    }

    match parsed.host() {
        Some(Host::Ipv4(_)) | Some(Host::Ipv6(_)) => true,
        Some(Host::Domain(domain)) => is_plausible_domain(domain),
        None => false,
    }
}

fn is_plausible_domain(domain: &str) -> bool {
    let domain = domain.strip_suffix('.').unwrap_or(domain);
    let labels: Vec<&str> = domain.split('.').collect();
    if labels.len() < 2 {
        return false;
    }

    let labels_ok = labels.iter().all(|label| {
        !label.is_empty()
            && label.len() <= 63
            && !label.starts_with('-')
            && !label.ends_with('-')
            && label
                .chars()
                .all(|c| c.is_ascii_alphanumeric() || c == '-')
    });
    if !labels_ok {
        return false;
    }

    let tld = labels[labels.len() - 1];
    tld.len() >= 2 && (tld.chars().all(|c| c.is_ascii_alphabetic()) || tld.starts_with("xn--"))
}

/// Runs the path and host heuristics against a URL.
///
/// Warnings are returned in detection order: fabricated path shape, path depth,
/// subdomain count, then typosquatting. Host checks only apply to domain names.
/// The body is accepted so callers can hand over everything they observed, but
/// none of the current heuristics read it.
pub fn detect_suspicious_patterns(url: &Url, _body: &str) -> Vec<String> {
    let mut warnings = Vec::new();
    let path = url.path().to_lowercase();

    if FABRICATED_PATH_PATTERNS
        .iter()
        .any(|pattern| pattern.is_match(&path))
    {
        warnings.push(WARNING_FABRICATED_PATH.to_string());
    }

    let segments = path.split('/').filter(|segment| !segment.is_empty()).count();
    if segments > MAX_PATH_SEGMENTS {
        warnings.push(WARNING_DEEP_PATH.to_string());
    }

    // IP literals have no labels to count or misspell
    if let Some(Host::Domain(host)) = url.host() {
        let host = host.to_lowercase();
        if host.split('.').count() > MAX_HOST_LABELS {
            warnings.push(WARNING_EXCESSIVE_SUBDOMAINS.to_string());
        }

        if let Some(target) = TYPOSQUAT_WATCHLIST
            .iter()
            .find(|target| is_likely_typosquat(&host, target))
        {
            warnings.push(format!("Possible typosquatting of {target}"));
        }
    }

    warnings
}

/// Levenshtein distance (single-character inserts, deletes and substitutions).
pub fn edit_distance(a: &str, b: &str) -> usize {
    let a: Vec<char> = a.chars().collect();
    let b: Vec<char> = b.chars().collect();
    // Keep the row over the shorter string
    let (long, short) = if a.len() >= b.len() { (a, b) } else { (b, a) };

    let mut previous: Vec<usize> = (0..=short.len()).collect();
    let mut current = vec![0usize; short.len() + 1];

    for (i, long_char) in long.iter().enumerate() {
        current[0] = i + 1;
        for (j, short_char) in short.iter().enumerate() {
            let substitution = previous[j] + usize::from(long_char != short_char);
            let insertion = previous[j + 1] + 1;
            let deletion = current[j] + 1;
            current[j + 1] = substitution.min(insertion).min(deletion);
        }
        std::mem::swap(&mut previous, &mut current);
    }

    previous[short.len()]
}

/// Whether `host` looks like a deliberate misspelling of `target`.
///
/// Compares the labels before the first dot, so `gihub.com` matches `github.com`
/// while `github.com` itself never does.
pub fn is_likely_typosquat(host: &str, target: &str) -> bool {
    if host == target {
        return false;
    }
    let host_base = host.split('.').next().unwrap_or(host);
    let target_base = target.split('.').next().unwrap_or(target);
    let distance = edit_distance(host_base, target_base);
    distance > 0 && distance <= TYPOSQUAT_MAX_DISTANCE
}
