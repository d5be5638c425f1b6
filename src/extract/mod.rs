//! Link extraction from HTML and free text.
//!
//! HTML content is parsed with `scraper` for link-bearing attributes; every
//! input is additionally scanned with regexes for bare, Markdown and quoted
//! URLs. Results are absolute http(s) URLs, deduplicated and sorted.

use std::collections::BTreeSet;

use once_cell::sync::Lazy;
use regex::Regex;
use scraper::{Html, Selector};
use serde::{Deserialize, Serialize};
use strum_macros::{AsRefStr, Display, EnumString};
use url::Url;

use crate::patterns::is_syntactically_valid_url;

/// How to interpret content handed to [`extract_links`].
#[derive(
    Debug,
    Clone,
    Copy,
    Default,
    PartialEq,
    Eq,
    Serialize,
    Deserialize,
    Display,
    AsRefStr,
    EnumString,
)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase", ascii_case_insensitive)]
pub enum ContentHint {
    Html,
    Text,
    #[default]
    Auto,
}

/// Element/attribute pairs that carry a URL.
static LINK_ATTRIBUTES: Lazy<Vec<(Selector, &'static str)>> = Lazy::new(|| {
    [
        ("a[href]", "href"),
        ("link[href]", "href"),
        ("img[src]", "src"),
        ("script[src]", "src"),
    ]
    .iter()
    .map(|(selector, attribute)| {
        (
            Selector::parse(selector).expect("link selector must parse"),
            *attribute,
        )
    })
    .collect()
});

static META_REFRESH: Lazy<Selector> =
    Lazy::new(|| Selector::parse("meta[http-equiv]").expect("meta selector must parse"));

static REFRESH_TARGET: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?i)url\s*=\s*([^;]+)").expect("refresh pattern must compile"));

static BARE_URL: Lazy<Regex> = Lazy::new(|| {
    Regex::new(
        r"(?i)https?://(?:www\.)?[-a-z0-9@:%._+~#=]{1,256}\.[a-z0-9()]{1,6}\b[-a-z0-9()@:%_+.~#?&/=]*",
    )
    .expect("bare URL pattern must compile")
});

static MARKDOWN_LINK: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"\[([^\]]+)\]\(([^)]+)\)").expect("markdown pattern must compile"));

static QUOTED_URL: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r#"(?i)["']?(https?://[^"'\s<>]+)["']?"#).expect("quoted URL pattern must compile")
});

/// Extracts every web link from `content`.
///
/// Relative references in HTML are resolved against `base_url` when given and
/// dropped otherwise.
pub fn extract_links(content: &str, hint: ContentHint, base_url: Option<&str>) -> Vec<String> {
    let is_html = match hint {
        ContentHint::Html => true,
        ContentHint::Text => false,
        ContentHint::Auto => looks_like_html(content),
    };
    let base = base_url.and_then(|base| Url::parse(base).ok());

    let mut candidates = BTreeSet::new();
    if is_html {
        candidates.extend(html_links(content, base.as_ref()));
    }
    candidates.extend(text_links(content));

    let links: Vec<String> = candidates
        .into_iter()
        .filter(|link| is_web_link(link))
        .collect();
    log::debug!(
        "Extracted {} link(s) from {} bytes of {} content",
        links.len(),
        content.len(),
        if is_html { "html" } else { "text" }
    );
    links
}

/// Sorted, unique, lower-cased hosts of the given URLs. Unparseable URLs are skipped.
pub fn extract_domains<S: AsRef<str>>(urls: &[S]) -> Vec<String> {
    urls.iter()
        .filter_map(|url| Url::parse(url.as_ref()).ok())
        .filter_map(|url| url.host_str().map(str::to_lowercase))
        .collect::<BTreeSet<_>>()
        .into_iter()
        .collect()
}

fn looks_like_html(content: &str) -> bool {
    let lowered = content.to_lowercase();
    lowered.contains("<html") || lowered.contains("<body") || lowered.contains("<a href")
}

fn html_links(content: &str, base: Option<&Url>) -> Vec<String> {
    let document = Html::parse_document(content);
    let mut links = Vec::new();

    for (selector, attribute) in LINK_ATTRIBUTES.iter() {
        for element in document.select(selector) {
            if let Some(value) = element.value().attr(attribute) {
                links.extend(resolve(value, base));
            }
        }
    }

    for element in document.select(&META_REFRESH) {
        let is_refresh = element
            .value()
            .attr("http-equiv")
            .is_some_and(|value| value.eq_ignore_ascii_case("refresh"));
        if !is_refresh {
            continue;
        }
        let target = element
            .value()
            .attr("content")
            .and_then(|content| REFRESH_TARGET.captures(content))
            .and_then(|captures| captures.get(1))
            .map(|target| target.as_str().trim().trim_matches(|c| c == '"' || c == '\''));
        if let Some(target) = target {
            links.extend(resolve(target, base));
        }
    }

    links
}

/// Absolute references are kept verbatim; relative ones need a base.
fn resolve(reference: &str, base: Option<&Url>) -> Option<String> {
    let reference = reference.trim();
    if reference.is_empty() || reference.starts_with('#') {
        return None;
    }
    if Url::parse(reference).is_ok() {
        return Some(reference.to_string());
    }
    base.and_then(|base| base.join(reference).ok())
        .map(|url| url.to_string())
}

fn text_links(content: &str) -> Vec<String> {
    let bare = BARE_URL.find_iter(content).map(|m| m.as_str());
    let markdown = MARKDOWN_LINK
        .captures_iter(content)
        .filter_map(|captures| captures.get(2))
        .map(|target| target.as_str())
        .filter(|target| target.starts_with("http://") || target.starts_with("https://"));
    let quoted = QUOTED_URL
        .captures_iter(content)
        .filter_map(|captures| captures.get(1))
        .map(|m| m.as_str());

    bare.chain(markdown)
        .chain(quoted)
        .map(trim_trailing_punctuation)
        .map(str::to_string)
        .collect()
}

/// Drops sentence punctuation and unbalanced closing parentheses picked up by
/// the text patterns.
fn trim_trailing_punctuation(candidate: &str) -> &str {
    let mut trimmed = candidate.trim_end_matches(['.', ',', ';', ':', '!', '?']);
    while trimmed.ends_with(')') && trimmed.matches(')').count() > trimmed.matches('(').count() {
        trimmed = trimmed[..trimmed.len() - 1].trim_end_matches(['.', ',', ';', ':', '!', '?']);
    }
    trimmed
}

fn is_web_link(link: &str) -> bool {
    let lowered = link.to_ascii_lowercase();
    (lowered.starts_with("http://") || lowered.starts_with("https://"))
        && is_syntactically_valid_url(link)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::str::FromStr;

    #[test]
    fn test_html_anchor_links() {
        let html = r#"<html><body>
            <a href="https://example.com">Example</a>
            <a href="https://test.com">Test</a>
        </body></html>"#;
        assert_eq!(
            extract_links(html, ContentHint::Html, None),
            vec!["https://example.com", "https://test.com"]
        );
    }

    #[test]
    fn test_html_link_bearing_elements() {
        let html = r#"<html><head>
            <link rel="stylesheet" href="https://example.com/style.css">
            <script src="https://example.com/script.js"></script>
            <meta http-equiv="refresh" content="0; url=https://example.com/redirect">
        </head><body>
            <a href="https://example.com/page">Link</a>
            <img src="https://example.com/photo.jpg" alt="Photo">
        </body></html>"#;
        assert_eq!(
            extract_links(html, ContentHint::Html, None),
            vec![
                "https://example.com/page",
                "https://example.com/photo.jpg",
                "https://example.com/redirect",
                "https://example.com/script.js",
                "https://example.com/style.css",
            ]
        );
    }

    #[test]
    fn test_relative_links_resolved_against_base() {
        let html = r#"<html><body>
            <a href="/page">Relative</a>
            <a href="page.html">Same level</a>
            <a href="https://example.com">Absolute</a>
        </body></html>"#;
        let links = extract_links(html, ContentHint::Html, Some("https://base.com/"));
        assert_eq!(
            links,
            vec![
                "https://base.com/page",
                "https://base.com/page.html",
                "https://example.com"
            ]
        );
    }

    #[test]
    fn test_relative_links_without_base_are_dropped() {
        let html = r#"<html><body><a href="/page">Relative</a></body></html>"#;
        assert!(extract_links(html, ContentHint::Html, None).is_empty());
    }

    #[test]
    fn test_meta_refresh_quoted_target() {
        let html = r#"<html><head>
            <meta http-equiv="Refresh" content="5;url='https://test.com'">
        </head></html>"#;
        assert_eq!(
            extract_links(html, ContentHint::Html, None),
            vec!["https://test.com"]
        );
    }

    #[test]
    fn test_text_bare_and_markdown_links() {
        let text = "Check out https://example.com for more info.\n\
                    Here's a [link](https://docs.example.org/guide).\n\
                    Another [test link](http://test.com \"Test Title\").";
        assert_eq!(
            extract_links(text, ContentHint::Text, None),
            vec![
                "http://test.com",
                "https://docs.example.org/guide",
                "https://example.com"
            ]
        );
    }

    #[test]
    fn test_text_quoted_links() {
        let text = "The URL is \"https://example.com\"\nAnother one: 'http://test.com'";
        assert_eq!(
            extract_links(text, ContentHint::Text, None),
            vec!["http://test.com", "https://example.com"]
        );
    }

    #[test]
    fn test_duplicates_removed_across_sources() {
        let html = r#"<a href="https://example.com">Link 1</a>
            <a href="https://example.com">Link 2</a>
            Text with https://example.com again"#;
        assert_eq!(
            extract_links(html, ContentHint::Auto, None),
            vec!["https://example.com"]
        );
    }

    #[test]
    fn test_non_web_schemes_and_anchors_filtered() {
        let html = r##"<a href="">Empty</a>
            <a href="javascript:void(0)">JavaScript</a>
            <a href="mailto:test@example.com">Email</a>
            <a href="tel:+1234567890">Phone</a>
            <a href="#anchor">Anchor</a>
            <a href="ftp://example.com/file">FTP</a>
            <a href="https://example.com">Valid</a>"##;
        assert_eq!(
            extract_links(html, ContentHint::Html, None),
            vec!["https://example.com"]
        );
    }

    #[test]
    fn test_malformed_html_still_yields_links() {
        let html = r#"<html><body>
            <a href="https://example.com">Valid link
            <a href="https://test.com"
        "#;
        let links = extract_links(html, ContentHint::Html, None);
        assert!(links.contains(&"https://example.com".to_string()));
    }

    #[test]
    fn test_auto_detection() {
        assert!(looks_like_html("<html>content</html>"));
        assert!(looks_like_html("<BODY>content</BODY>"));
        assert!(looks_like_html(r#"<a href="test">link</a>"#));
        assert!(!looks_like_html("Just plain text"));
    }

    #[test]
    fn test_empty_content() {
        assert!(extract_links("", ContentHint::Auto, None).is_empty());
    }

    #[test]
    fn test_trailing_punctuation_trimmed() {
        assert_eq!(trim_trailing_punctuation("https://example.com)."), "https://example.com");
        assert_eq!(
            trim_trailing_punctuation("https://en.wikipedia.org/wiki/Rust_(language)"),
            "https://en.wikipedia.org/wiki/Rust_(language)"
        );
        assert_eq!(trim_trailing_punctuation("https://example.com/a,"), "https://example.com/a");
    }

    #[test]
    fn test_content_hint_parsing() {
        assert_eq!(ContentHint::from_str("HTML").unwrap(), ContentHint::Html);
        assert_eq!(ContentHint::from_str("text").unwrap(), ContentHint::Text);
        assert_eq!(ContentHint::default(), ContentHint::Auto);
        assert!(ContentHint::from_str("pdf").is_err());
    }

    #[test]
    fn test_extract_domains_sorted_unique_lowercase() {
        let urls = [
            "https://example.com/page1",
            "https://EXAMPLE.COM/page3",
            "https://subdomain.example.com/other",
            "http://test.com:8080/path",
            "https://another.org",
            "not a url",
        ];
        assert_eq!(
            extract_domains(&urls),
            vec![
                "another.org",
                "example.com",
                "subdomain.example.com",
                "test.com"
            ]
        );
    }
}
