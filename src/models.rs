//! Value objects produced by the evaluation engine.
//!
//! All records are plain owned data. The orchestrator never mutates an outcome
//! in place; enrichment consumes one record and returns a new one.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use strum_macros::{AsRefStr, Display, EnumIter, EnumString};

/// Status codes that count as a reachable URL.
pub const VALID_STATUS_CODES: &[u16] = &[200, 201, 202, 203, 204, 301, 302, 307, 308];

/// How much trust to place in a validation outcome.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Display, AsRefStr, EnumIter,
)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase")]
pub enum ConfidenceLevel {
    High,
    Medium,
    Low,
}

impl ConfidenceLevel {
    /// Classifies an outcome from its validity and warning count.
    ///
    /// A failed probe is a confident negative, so invalid outcomes are always `High`.
    pub fn classify(is_valid: bool, warning_count: usize) -> Self {
        if !is_valid {
            return ConfidenceLevel::High;
        }
        match warning_count {
            0 => ConfidenceLevel::High,
            1..=2 => ConfidenceLevel::Medium,
            _ => ConfidenceLevel::Low,
        }
    }
}

/// How thorough a validation probe is.
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    PartialOrd,
    Ord,
    Serialize,
    Deserialize,
    Display,
    EnumString,
    EnumIter,
)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase", ascii_case_insensitive)]
pub enum ValidationDepth {
    /// Status code and scheme only
    Basic,
    /// Adds the TLS handshake and content heuristics
    Standard,
    /// Adds URL pattern heuristics
    Comprehensive,
}

/// Response details recorded for every outcome.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OutcomeMetadata {
    /// URL reached after following redirects
    pub final_url: String,
    /// Number of redirects followed
    pub redirect_count: u32,
    /// `Content-Type` of the final response, or `"unknown"`
    pub content_type: String,
}

impl OutcomeMetadata {
    /// Metadata for a probe that never produced a response.
    pub fn unreached(url: &str) -> Self {
        Self {
            final_url: url.to_string(),
            redirect_count: 0,
            content_type: "unknown".to_string(),
        }
    }
}

/// Result of validating one URL, optionally enriched with reputation data.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ValidationOutcome {
    pub url: String,
    pub is_valid: bool,
    /// 0 when no response was obtained
    pub status_code: u16,
    /// Wall-clock probe time in seconds
    pub response_time: f64,
    /// Body length in bytes
    pub content_length: u64,
    pub ssl_valid: bool,
    pub domain_age_days: Option<i64>,
    pub first_seen_date: Option<DateTime<Utc>>,
    pub wayback_snapshots: u64,
    pub reputation_score: f64,
    pub confidence_level: ConfidenceLevel,
    /// In detection order
    pub warnings: Vec<String>,
    pub metadata: OutcomeMetadata,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl ValidationOutcome {
    /// Outcome for a probe that produced no response.
    pub fn failed(url: &str, response_time: f64, warning: String) -> Self {
        Self {
            url: url.to_string(),
            is_valid: false,
            status_code: 0,
            response_time,
            content_length: 0,
            ssl_valid: false,
            domain_age_days: None,
            first_seen_date: None,
            wayback_snapshots: 0,
            reputation_score: 0.0,
            confidence_level: ConfidenceLevel::High,
            warnings: vec![warning],
            metadata: OutcomeMetadata::unreached(url),
            error: None,
        }
    }

    /// Outcome returned when evaluation itself broke down.
    pub fn degraded(url: &str, error: impl Into<String>) -> Self {
        Self {
            url: url.to_string(),
            is_valid: false,
            status_code: 0,
            response_time: 0.0,
            content_length: 0,
            ssl_valid: false,
            domain_age_days: None,
            first_seen_date: None,
            wayback_snapshots: 0,
            reputation_score: 0.0,
            confidence_level: ConfidenceLevel::Low,
            warnings: Vec::new(),
            metadata: OutcomeMetadata::unreached(url),
            error: Some(error.into()),
        }
    }

    /// Returns a new outcome carrying the domain history signals and score.
    pub fn with_reputation(self, history: &DomainHistory, score: f64) -> Self {
        Self {
            domain_age_days: history.age_days,
            first_seen_date: history.wayback_first_snapshot,
            wayback_snapshots: history.wayback_total_snapshots,
            reputation_score: score,
            ..self
        }
    }
}

/// Historical signals about a registrable domain.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DomainHistory {
    /// Registrable domain, lower-cased, no subdomain
    pub domain: String,
    pub creation_date: Option<DateTime<Utc>>,
    pub expiration_date: Option<DateTime<Utc>>,
    pub registrar: Option<String>,
    pub wayback_first_snapshot: Option<DateTime<Utc>>,
    pub wayback_total_snapshots: u64,
    /// Only present when the creation date is known
    pub age_days: Option<i64>,
}

impl DomainHistory {
    /// History with no signals from either source.
    pub fn empty(domain: impl Into<String>) -> Self {
        Self {
            domain: domain.into(),
            creation_date: None,
            expiration_date: None,
            registrar: None,
            wayback_first_snapshot: None,
            wayback_total_snapshots: 0,
            age_days: None,
        }
    }
}

/// Summary of checking every link extracted from a piece of content.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LinkCheckReport {
    pub extracted_links: Vec<String>,
    pub valid_links: Vec<ValidationOutcome>,
    pub invalid_links: Vec<String>,
    pub summary: LinkCheckSummary,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LinkCheckSummary {
    pub total_links: usize,
    pub valid_count: usize,
    pub invalid_count: usize,
    pub average_reputation_score: f64,
    pub recommendation: String,
}

impl LinkCheckReport {
    /// Splits evaluated outcomes into valid and invalid links and summarizes them.
    ///
    /// The average score only covers links that validated.
    pub fn from_outcomes(extracted_links: Vec<String>, outcomes: Vec<ValidationOutcome>) -> Self {
        if extracted_links.is_empty() {
            return Self {
                extracted_links,
                valid_links: Vec::new(),
                invalid_links: Vec::new(),
                summary: LinkCheckSummary {
                    total_links: 0,
                    valid_count: 0,
                    invalid_count: 0,
                    average_reputation_score: 0.0,
                    recommendation: "No links found in content".to_string(),
                },
            };
        }

        let (valid_links, invalid): (Vec<_>, Vec<_>) =
            outcomes.into_iter().partition(|outcome| outcome.is_valid);
        let invalid_links: Vec<String> = invalid.into_iter().map(|outcome| outcome.url).collect();

        let average_reputation_score = if valid_links.is_empty() {
            0.0
        } else {
            valid_links.iter().map(|o| o.reputation_score).sum::<f64>() / valid_links.len() as f64
        };

        Self {
            summary: LinkCheckSummary {
                total_links: extracted_links.len(),
                valid_count: valid_links.len(),
                invalid_count: invalid_links.len(),
                average_reputation_score,
                recommendation: recommendation(average_reputation_score).to_string(),
            },
            extracted_links,
            valid_links,
            invalid_links,
        }
    }
}

fn recommendation(average_score: f64) -> &'static str {
    if average_score >= 80.0 {
        "Links appear highly reputable"
    } else if average_score >= 60.0 {
        "Links have moderate reputation - verify important ones"
    } else if average_score >= 40.0 {
        "Links have low reputation - exercise caution"
    } else {
        "Links appear suspicious - high risk of hallucination"
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::str::FromStr;
    use strum::IntoEnumIterator;

    fn valid_outcome(url: &str, score: f64) -> ValidationOutcome {
        ValidationOutcome {
            is_valid: true,
            status_code: 200,
            reputation_score: score,
            warnings: Vec::new(),
            ..ValidationOutcome::failed(url, 0.1, String::new())
        }
    }

    #[test]
    fn test_confidence_boundaries() {
        assert_eq!(ConfidenceLevel::classify(true, 0), ConfidenceLevel::High);
        assert_eq!(ConfidenceLevel::classify(true, 1), ConfidenceLevel::Medium);
        assert_eq!(ConfidenceLevel::classify(true, 2), ConfidenceLevel::Medium);
        assert_eq!(ConfidenceLevel::classify(true, 3), ConfidenceLevel::Low);
        assert_eq!(ConfidenceLevel::classify(true, 4), ConfidenceLevel::Low);
    }

    #[test]
    fn test_confidence_invalid_always_high() {
        for count in 0..=4 {
            assert_eq!(
                ConfidenceLevel::classify(false, count),
                ConfidenceLevel::High
            );
        }
    }

    #[test]
    fn test_confidence_serializes_lowercase() {
        for level in ConfidenceLevel::iter() {
            let json = serde_json::to_string(&level).unwrap();
            assert_eq!(json, format!("\"{}\"", level));
        }
    }

    #[test]
    fn test_validation_depth_parsing() {
        assert_eq!(
            ValidationDepth::from_str("COMPREHENSIVE").unwrap(),
            ValidationDepth::Comprehensive
        );
        assert_eq!(
            ValidationDepth::from_str("basic").unwrap(),
            ValidationDepth::Basic
        );
        assert!(ValidationDepth::from_str("deep").is_err());
        assert!(ValidationDepth::Basic < ValidationDepth::Standard);
        assert!(ValidationDepth::Standard < ValidationDepth::Comprehensive);
    }

    #[test]
    fn test_failed_outcome_shape() {
        let outcome = ValidationOutcome::failed("not-a-url", 0.0, "Invalid URL format".into());
        assert!(!outcome.is_valid);
        assert_eq!(outcome.status_code, 0);
        assert_eq!(outcome.warnings, vec!["Invalid URL format".to_string()]);
        assert_eq!(outcome.confidence_level, ConfidenceLevel::High);
        assert_eq!(outcome.metadata.content_type, "unknown");
        assert_eq!(outcome.metadata.final_url, "not-a-url");
    }

    #[test]
    fn test_degraded_outcome_shape() {
        let outcome = ValidationOutcome::degraded("https://example.com", "task panicked");
        assert!(!outcome.is_valid);
        assert_eq!(outcome.reputation_score, 0.0);
        assert!(outcome.warnings.is_empty());
        assert_eq!(outcome.confidence_level, ConfidenceLevel::Low);
        assert_eq!(outcome.error.as_deref(), Some("task panicked"));
    }

    #[test]
    fn test_with_reputation_copies_history_fields() {
        let snapshot = DateTime::parse_from_rfc3339("2010-05-01T00:00:00Z")
            .unwrap()
            .with_timezone(&Utc);
        let history = DomainHistory {
            age_days: Some(4000),
            wayback_first_snapshot: Some(snapshot),
            wayback_total_snapshots: 321,
            ..DomainHistory::empty("example.com")
        };
        let outcome = valid_outcome("https://example.com", 0.0).with_reputation(&history, 87.0);
        assert_eq!(outcome.domain_age_days, Some(4000));
        assert_eq!(outcome.first_seen_date, Some(snapshot));
        assert_eq!(outcome.wayback_snapshots, 321);
        assert_eq!(outcome.reputation_score, 87.0);
        assert!(outcome.is_valid);
    }

    #[test]
    fn test_outcome_json_keys() {
        let outcome = valid_outcome("https://example.com", 50.0);
        let value = serde_json::to_value(&outcome).unwrap();
        for key in [
            "url",
            "is_valid",
            "status_code",
            "response_time",
            "content_length",
            "ssl_valid",
            "domain_age_days",
            "first_seen_date",
            "wayback_snapshots",
            "reputation_score",
            "confidence_level",
            "warnings",
            "metadata",
        ] {
            assert!(value.get(key).is_some(), "missing key {key}");
        }
        assert!(value.get("error").is_none());
        assert_eq!(value["metadata"]["content_type"], "unknown");
    }

    #[test]
    fn test_link_report_no_links() {
        let report = LinkCheckReport::from_outcomes(Vec::new(), Vec::new());
        assert_eq!(report.summary.total_links, 0);
        assert_eq!(report.summary.recommendation, "No links found in content");
    }

    #[test]
    fn test_link_report_averages_valid_only() {
        let links = vec![
            "https://a.example".to_string(),
            "https://b.example".to_string(),
            "https://c.example".to_string(),
        ];
        let outcomes = vec![
            valid_outcome("https://a.example", 90.0),
            valid_outcome("https://b.example", 70.0),
            ValidationOutcome::failed("https://c.example", 1.0, "Request timeout".into()),
        ];
        let report = LinkCheckReport::from_outcomes(links, outcomes);
        assert_eq!(report.summary.total_links, 3);
        assert_eq!(report.summary.valid_count, 2);
        assert_eq!(report.summary.invalid_count, 1);
        assert_eq!(report.invalid_links, vec!["https://c.example".to_string()]);
        assert_eq!(report.summary.average_reputation_score, 80.0);
        assert_eq!(
            report.summary.recommendation,
            "Links appear highly reputable"
        );
    }

    #[test]
    fn test_recommendation_thresholds() {
        assert_eq!(recommendation(80.0), "Links appear highly reputable");
        assert_eq!(
            recommendation(60.0),
            "Links have moderate reputation - verify important ones"
        );
        assert_eq!(
            recommendation(40.0),
            "Links have low reputation - exercise caution"
        );
        assert_eq!(
            recommendation(39.9),
            "Links appear suspicious - high risk of hallucination"
        );
    }
}
