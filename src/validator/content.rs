//! Body heuristics for placeholder and parked pages.

use once_cell::sync::Lazy;
use regex::Regex;

/// Bodies shorter than this (in characters) look like placeholders.
const MIN_CONTENT_CHARS: usize = 100;

/// Boilerplate found on parked or for-sale domains, matched case-insensitively.
pub const PARKING_PAGE_PHRASES: &[&str] = &[
    "domain for sale",
    "this domain is parked",
    "buy this domain",
    "domain parking",
    "under construction",
    "coming soon",
];

pub const WARNING_SHORT_CONTENT: &str = "Very short content - possible placeholder page";
pub const WARNING_INVALID_HTML: &str = "Invalid HTML structure";

static HTML_ROOT_TAG: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?i)<html[\s>/]").expect("html tag pattern must compile"));
static BODY_TAG: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?i)<body[\s>/]").expect("body tag pattern must compile"));

/// Checks a 200 response body for placeholder signals.
///
/// Returns warnings in order: short content, first parking phrase, markup structure.
pub fn content_warnings(body: &str) -> Vec<String> {
    let mut warnings = Vec::new();

    if body.chars().count() < MIN_CONTENT_CHARS {
        warnings.push(WARNING_SHORT_CONTENT.to_string());
    }

    let lowered = body.to_lowercase();
    if let Some(phrase) = PARKING_PAGE_PHRASES
        .iter()
        .find(|phrase| lowered.contains(*phrase))
    {
        warnings.push(format!("Possible parking page: '{phrase}' found"));
    }

    if !has_document_structure(body) {
        warnings.push(WARNING_INVALID_HTML.to_string());
    }

    warnings
}

/// Whether the markup carries both a root `<html>` tag and a `<body>` tag.
///
/// Checked on the raw source: an HTML5 parser would synthesize both elements
/// for any input, which hides exactly the pages this is meant to catch.
fn has_document_structure(body: &str) -> bool {
    HTML_ROOT_TAG.is_match(body) && BODY_TAG.is_match(body)
}
