//! Archive lookups against the Wayback Machine CDX index.

use std::sync::Arc;

use async_trait::async_trait;

use super::types::{ArchiveRecord, ArchiveSource};
use crate::config::ARCHIVE_SNAPSHOT_LIMIT;
use crate::error_handling::SourceError;

const SOURCE_NAME: &str = "Wayback CDX";

/// Queries a CDX endpoint for capture timestamps of a URL.
///
/// Counts saturate at `ARCHIVE_SNAPSHOT_LIMIT`, which is far above the
/// highest archive scoring threshold.
pub struct WaybackSource {
    client: Arc<reqwest::Client>,
    endpoint: String,
}

impl WaybackSource {
    pub fn new(client: Arc<reqwest::Client>, endpoint: impl Into<String>) -> Self {
        Self {
            client,
            endpoint: endpoint.into(),
        }
    }
}

#[async_trait]
impl ArchiveSource for WaybackSource {
    async fn lookup(&self, url: &str) -> Result<ArchiveRecord, SourceError> {
        log::debug!("CDX lookup: {url}");
        let limit = ARCHIVE_SNAPSHOT_LIMIT.to_string();

        let response = self
            .client
            .get(&self.endpoint)
            .query(&[
                ("url", url),
                ("output", "json"),
                ("fl", "timestamp"),
                ("limit", limit.as_str()),
            ])
            .send()
            .await
            .map_err(|e| SourceError::transport(SOURCE_NAME, e))?;

        let status = response.status();
        if !status.is_success() {
            return Err(SourceError::Status {
                source_name: SOURCE_NAME,
                status: status.as_u16(),
            });
        }

        let body = response
            .text()
            .await
            .map_err(|e| SourceError::transport(SOURCE_NAME, e))?;
        parse_cdx_rows(&body)
    }
}

/// Summarizes a CDX JSON response (`[["timestamp"], ["2001..."], ...]`).
fn parse_cdx_rows(body: &str) -> Result<ArchiveRecord, SourceError> {
    // The index answers an empty body when it has never seen the URL
    if body.trim().is_empty() {
        return Ok(ArchiveRecord::default());
    }

    let rows: Vec<Vec<String>> =
        serde_json::from_str(body).map_err(|e| SourceError::decode(SOURCE_NAME, e))?;

    let timestamps: Vec<&str> = rows
        .iter()
        .filter_map(|row| row.first())
        .map(String::as_str)
        .filter(|value| *value != "timestamp")
        .collect();

    Ok(ArchiveRecord {
        earliest_timestamp: timestamps.iter().min().map(|ts| ts.to_string()),
        total_snapshots: timestamps.len() as u64,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use wiremock::matchers::{method, query_param};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    #[test]
    fn test_parse_cdx_rows_skips_header_and_finds_earliest() {
        let body = r#"[["timestamp"],["20050101000000"],["19990312120000"],["20200101000000"]]"#;
        let record = parse_cdx_rows(body).expect("valid payload");
        assert_eq!(record.total_snapshots, 3);
        assert_eq!(record.earliest_timestamp.as_deref(), Some("19990312120000"));
    }

    #[test]
    fn test_parse_cdx_rows_empty_responses() {
        assert_eq!(parse_cdx_rows("").expect("empty body"), ArchiveRecord::default());
        assert_eq!(parse_cdx_rows("[]").expect("empty array"), ArchiveRecord::default());
        assert_eq!(
            parse_cdx_rows(r#"[["timestamp"]]"#).expect("header only"),
            ArchiveRecord::default()
        );
    }

    #[test]
    fn test_parse_cdx_rows_rejects_unexpected_shape() {
        let err = parse_cdx_rows(r#"{"error": "blocked"}"#).unwrap_err();
        assert!(matches!(err, SourceError::Decode { .. }));
    }

    #[tokio::test]
    async fn test_lookup_sends_cdx_query() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(query_param("url", "https://example.com/page"))
            .and(query_param("output", "json"))
            .and(query_param("fl", "timestamp"))
            .respond_with(
                ResponseTemplate::new(200)
                    .set_body_string(r#"[["timestamp"],["20100101000000"],["20090101000000"]]"#),
            )
            .expect(1)
            .mount(&server)
            .await;

        let source = WaybackSource::new(Arc::new(reqwest::Client::new()), server.uri());
        let record = source
            .lookup("https://example.com/page")
            .await
            .expect("lookup succeeds");
        assert_eq!(record.total_snapshots, 2);
        assert_eq!(record.earliest_timestamp.as_deref(), Some("20090101000000"));
    }

    #[tokio::test]
    async fn test_lookup_rate_limited_is_status_error() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .respond_with(ResponseTemplate::new(429))
            .mount(&server)
            .await;

        let source = WaybackSource::new(Arc::new(reqwest::Client::new()), server.uri());
        let err = source.lookup("https://example.com/").await.unwrap_err();
        assert!(matches!(err, SourceError::Status { status: 429, .. }));
    }
}
