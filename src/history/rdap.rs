//! Registration lookups over RDAP (RFC 9083 JSON responses).

use std::sync::Arc;

use async_trait::async_trait;
use reqwest::header::ACCEPT;
use reqwest::StatusCode;
use serde::Deserialize;
use serde_json::Value;

use super::types::{RegistrationRecord, RegistrationSource};
use crate::error_handling::SourceError;

const SOURCE_NAME: &str = "RDAP";

#[derive(Debug, Deserialize)]
struct RdapDomain {
    #[serde(default)]
    events: Vec<RdapEvent>,
    #[serde(default)]
    entities: Vec<RdapEntity>,
}

#[derive(Debug, Deserialize)]
struct RdapEvent {
    #[serde(rename = "eventAction")]
    action: String,
    #[serde(rename = "eventDate")]
    date: Option<String>,
}

#[derive(Debug, Deserialize)]
struct RdapEntity {
    #[serde(default)]
    roles: Vec<String>,
    #[serde(rename = "vcardArray")]
    vcard: Option<Value>,
}

/// Queries an RDAP service at `{endpoint}{domain}`.
pub struct RdapSource {
    client: Arc<reqwest::Client>,
    endpoint: String,
}

impl RdapSource {
    pub fn new(client: Arc<reqwest::Client>, endpoint: impl Into<String>) -> Self {
        Self {
            client,
            endpoint: endpoint.into(),
        }
    }
}

#[async_trait]
impl RegistrationSource for RdapSource {
    async fn lookup(&self, domain: &str) -> Result<Option<RegistrationRecord>, SourceError> {
        let url = format!("{}{}", self.endpoint, domain);
        log::debug!("RDAP lookup: {url}");

        let response = self
            .client
            .get(&url)
            .header(ACCEPT, "application/rdap+json, application/json")
            .send()
            .await
            .map_err(|e| SourceError::transport(SOURCE_NAME, e))?;

        let status = response.status();
        if status == StatusCode::NOT_FOUND {
            log::debug!("RDAP has no record for {domain}");
            return Ok(None);
        }
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
        parse_rdap_domain(&body).map(Some)
    }
}

/// Extracts event dates and the registrar name from an RDAP domain object.
fn parse_rdap_domain(body: &str) -> Result<RegistrationRecord, SourceError> {
    let domain: RdapDomain =
        serde_json::from_str(body).map_err(|e| SourceError::decode(SOURCE_NAME, e))?;

    let mut record = RegistrationRecord::default();
    for event in domain.events {
        let Some(date) = event.date else { continue };
        match event.action.as_str() {
            "registration" => record.creation_dates.push(date),
            "expiration" => record.expiration_dates.push(date),
            _ => {}
        }
    }

    record.registrar = domain
        .entities
        .iter()
        .filter(|entity| entity.roles.iter().any(|role| role == "registrar"))
        .find_map(|entity| entity.vcard.as_ref().and_then(vcard_full_name));

    Ok(record)
}

/// Reads the `fn` property of a jCard (`["vcard", [[name, params, type, value], ...]]`).
fn vcard_full_name(vcard: &Value) -> Option<String> {
    vcard
        .get(1)?
        .as_array()?
        .iter()
        .filter_map(Value::as_array)
        .find(|property| property.first().and_then(Value::as_str) == Some("fn"))
        .and_then(|property| property.get(3))
        .and_then(Value::as_str)
        .map(str::trim)
        .filter(|name| !name.is_empty())
        .map(str::to_string)
}

#[cfg(test)]
mod tests {
    use super::*;
    use wiremock::matchers::{method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    const EXAMPLE_RDAP: &str = r#"{
        "objectClassName": "domain",
        "ldhName": "EXAMPLE.COM",
        "events": [
            {"eventAction": "registration", "eventDate": "1995-08-14T04:00:00Z"},
            {"eventAction": "expiration", "eventDate": "2026-08-13T04:00:00Z"},
            {"eventAction": "last changed", "eventDate": "2025-08-14T07:01:44Z"}
        ],
        "entities": [
            {
                "objectClassName": "entity",
                "roles": ["registrar"],
                "vcardArray": ["vcard", [
                    ["version", {}, "text", "4.0"],
                    ["fn", {}, "text", "RESERVED-Internet Assigned Numbers Authority"]
                ]]
            }
        ]
    }"#;

    #[test]
    fn test_parse_rdap_domain_events_and_registrar() {
        let record = parse_rdap_domain(EXAMPLE_RDAP).expect("valid payload");
        assert_eq!(record.creation_dates, vec!["1995-08-14T04:00:00Z"]);
        assert_eq!(record.expiration_dates, vec!["2026-08-13T04:00:00Z"]);
        assert_eq!(
            record.registrar.as_deref(),
            Some("RESERVED-Internet Assigned Numbers Authority")
        );
    }

    #[test]
    fn test_parse_rdap_domain_ignores_non_registrar_entities() {
        let body = r#"{
            "entities": [
                {"roles": ["abuse"], "vcardArray": ["vcard", [["fn", {}, "text", "Abuse Desk"]]]}
            ]
        }"#;
        let record = parse_rdap_domain(body).expect("valid payload");
        assert!(record.registrar.is_none());
        assert!(record.creation_dates.is_empty());
    }

    #[test]
    fn test_parse_rdap_domain_keeps_multiple_dates_in_order() {
        let body = r#"{
            "events": [
                {"eventAction": "registration", "eventDate": "garbage"},
                {"eventAction": "registration", "eventDate": "2003-01-01T00:00:00Z"},
                {"eventAction": "registration"}
            ]
        }"#;
        let record = parse_rdap_domain(body).expect("valid payload");
        assert_eq!(record.creation_dates, vec!["garbage", "2003-01-01T00:00:00Z"]);
    }

    #[test]
    fn test_parse_rdap_domain_rejects_non_json() {
        let err = parse_rdap_domain("<html>rate limited</html>").unwrap_err();
        assert!(matches!(err, SourceError::Decode { .. }));
    }

    #[tokio::test]
    async fn test_lookup_against_mock_endpoint() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/domain/example.com"))
            .respond_with(ResponseTemplate::new(200).set_body_string(EXAMPLE_RDAP))
            .mount(&server)
            .await;

        let source = RdapSource::new(
            Arc::new(reqwest::Client::new()),
            format!("{}/domain/", server.uri()),
        );
        let record = source
            .lookup("example.com")
            .await
            .expect("lookup succeeds")
            .expect("record present");
        assert_eq!(record.creation_dates.len(), 1);
    }

    #[tokio::test]
    async fn test_lookup_not_found_is_none() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .respond_with(ResponseTemplate::new(404))
            .mount(&server)
            .await;

        let source = RdapSource::new(Arc::new(reqwest::Client::new()), format!("{}/", server.uri()));
        let result = source.lookup("unregistered.example").await.expect("404 is not an error");
        assert!(result.is_none());
    }

    #[tokio::test]
    async fn test_lookup_server_error_is_status_error() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .respond_with(ResponseTemplate::new(503))
            .mount(&server)
            .await;

        let source = RdapSource::new(Arc::new(reqwest::Client::new()), format!("{}/", server.uri()));
        let err = source.lookup("example.com").await.unwrap_err();
        assert_eq!(err.to_string(), "RDAP returned HTTP 503");
    }
}
