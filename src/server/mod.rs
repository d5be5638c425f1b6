//! HTTP surface for the evaluation engine.
//!
//! Endpoints:
//! - `POST /validate` - single STANDARD-depth probe
//! - `POST /reputation` - full evaluation of a list of URLs
//! - `POST /extract` - extract links from content and evaluate them
//! - `GET /domain/{domain}` - domain history
//! - `GET /report` - Markdown report of returned outcomes
//! - `GET /cache/stats` - cache entry counts

mod handlers;
mod types;

use std::sync::Arc;

use axum::routing::{get, post};
use axum::Router;

use crate::evaluate::Evaluator;
use crate::initialization::init_semaphore;
use crate::report::EvaluationLog;
use handlers::{
    cache_stats_handler, domain_history_handler, extract_handler, report_handler,
    reputation_handler, validate_handler,
};
pub use types::{AppState, ExtractRequest, ReputationRequest, ValidateRequest};

impl AppState {
    /// State with a fresh evaluation log of `log_capacity` entries.
    pub fn new(evaluator: Evaluator, log_capacity: usize, batch_concurrency: usize) -> Self {
        Self {
            evaluator,
            log: Arc::new(EvaluationLog::new(log_capacity)),
            batch_permits: init_semaphore(batch_concurrency),
        }
    }
}

/// Builds the router over shared state
pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/validate", post(validate_handler))
        .route("/reputation", post(reputation_handler))
        .route("/extract", post(extract_handler))
        .route("/domain/{domain}", get(domain_history_handler))
        .route("/report", get(report_handler))
        .route("/cache/stats", get(cache_stats_handler))
        .with_state(state)
}

/// Binds `127.0.0.1:port` and serves until the process exits
pub async fn start_server(port: u16, state: AppState) -> Result<(), anyhow::Error> {
    let listener = tokio::net::TcpListener::bind(format!("127.0.0.1:{}", port))
        .await
        .map_err(|e| anyhow::anyhow!("Failed to bind server to port {}: {}", port, e))?;

    log::info!("URL reputation server listening on http://127.0.0.1:{}/", port);

    axum::serve(listener, router(state))
        .await
        .map_err(|e| anyhow::anyhow!("Server error: {}", e))?;

    Ok(())
}

#[cfg(test)]
mod tests {
    include!("tests.rs");
}
