//! Application initialization and resource setup.
//!
//! This module provides functions to initialize all shared resources:
//! - HTTP client (manual redirect tracking, timeouts, user agent)
//! - Logger
//! - Crypto provider for the TLS handshake check
//! - Concurrency semaphore for the HTTP surface

mod client;
mod logger;

use std::sync::Arc;

use rustls::crypto::{ring::default_provider, CryptoProvider};
use tokio::sync::Semaphore;

// Re-export public API
pub use client::{init_client, init_lookup_client};
pub use logger::init_logger_with;

/// Initializes a semaphore for controlling concurrency.
///
/// The HTTP surface shares one semaphore across requests so that concurrent
/// batch calls cannot multiply outbound traffic beyond the configured limit.
///
/// # Arguments
///
/// * `count` - Maximum number of concurrent operations allowed
pub fn init_semaphore(count: usize) -> Arc<Semaphore> {
    Arc::new(Semaphore::new(count.max(1)))
}

/// Initializes the crypto provider for TLS operations.
///
/// Installs the `ring` provider as the process default for `rustls`. The
/// handshake check builds its own config from the same provider, so this only
/// matters for code that relies on the process default.
pub fn init_crypto_provider() {
    // The return value is ignored because reinstalling the provider is harmless
    let _ = CryptoProvider::install_default(default_provider());
}
