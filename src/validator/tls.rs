//! TLS handshake verification.
//!
//! Opens a dedicated TCP connection and completes a rustls handshake against
//! the webpki trust store. Nothing is sent after the handshake.

use std::sync::Arc;
use std::time::Duration;

use anyhow::Result;
use rustls::pki_types::ServerName;
use tokio::net::TcpStream;
use tokio_rustls::rustls::{ClientConfig, RootCertStore};
use tokio_rustls::TlsConnector;

use crate::config::{TCP_CONNECT_TIMEOUT_SECS, TLS_HANDSHAKE_TIMEOUT_SECS};

/// Verifies that `host:port` completes a TLS handshake with a trusted certificate.
///
/// # Errors
///
/// Returns an error if:
/// - The host is not a valid server name
/// - TCP connection fails or times out
/// - The TLS handshake fails (untrusted chain, name mismatch, expired) or times out
pub async fn verify_tls_handshake(host: &str, port: u16) -> Result<()> {
    // IPv6 literals come out of `Url::host_str` bracketed
    let host = host.trim_start_matches('[').trim_end_matches(']').to_string();
    log::debug!("Verifying TLS handshake for {host}:{port}");

    let mut root_store = RootCertStore::empty();
    root_store.extend(webpki_roots::TLS_SERVER_ROOTS.iter().cloned());

    let config = ClientConfig::builder_with_provider(Arc::new(
        rustls::crypto::ring::default_provider(),
    ))
    .with_safe_default_protocol_versions()?
    .with_root_certificates(root_store)
    .with_no_client_auth();

    let server_name = ServerName::try_from(host.clone())
        .map_err(|e| anyhow::anyhow!("Invalid server name {}: {}", host, e))?;

    let sock = match tokio::time::timeout(
        Duration::from_secs(TCP_CONNECT_TIMEOUT_SECS),
        TcpStream::connect((host.as_str(), port)),
    )
    .await
    {
        Ok(Ok(sock)) => sock,
        Ok(Err(e)) => {
            return Err(anyhow::anyhow!(
                "Failed to connect to {}:{} - {}",
                host,
                port,
                e
            ));
        }
        Err(_) => {
            return Err(anyhow::anyhow!(
                "TCP connection timeout for {}:{} ({}s)",
                host,
                port,
                TCP_CONNECT_TIMEOUT_SECS
            ));
        }
    };

    let connector = TlsConnector::from(Arc::new(config));
    match tokio::time::timeout(
        Duration::from_secs(TLS_HANDSHAKE_TIMEOUT_SECS),
        connector.connect(server_name, sock),
    )
    .await
    {
        Ok(Ok(_stream)) => {
            log::debug!("TLS handshake succeeded for {host}:{port}");
            Ok(())
        }
        Ok(Err(e)) => Err(anyhow::anyhow!("TLS handshake failed for {}: {}", host, e)),
        Err(_) => Err(anyhow::anyhow!(
            "TLS handshake timeout for {} ({}s)",
            host,
            TLS_HANDSHAKE_TIMEOUT_SECS
        )),
    }
}
