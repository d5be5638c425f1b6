//! Server state and request bodies.

use std::sync::Arc;

use serde::Deserialize;
use tokio::sync::Semaphore;

use crate::evaluate::Evaluator;
use crate::extract::ContentHint;
use crate::report::EvaluationLog;

/// Shared state for the HTTP surface
#[derive(Clone)]
pub struct AppState {
    pub evaluator: Evaluator,
    /// Outcomes returned by this server, for `/report`
    pub log: Arc<EvaluationLog>,
    /// Bounds batch evaluations running at once across all requests
    pub batch_permits: Arc<Semaphore>,
}

/// Body of `POST /validate`
#[derive(Debug, Deserialize)]
pub struct ValidateRequest {
    pub url: String,
}

/// Body of `POST /reputation`
#[derive(Debug, Deserialize)]
pub struct ReputationRequest {
    pub urls: Vec<String>,
}

/// Body of `POST /extract`
#[derive(Debug, Deserialize)]
pub struct ExtractRequest {
    pub content: String,
    #[serde(default)]
    pub content_type: ContentHint,
    pub base_url: Option<String>,
}
