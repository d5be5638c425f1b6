//! Handlers that probe URLs.

use axum::extract::State;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;

use super::super::types::{AppState, ExtractRequest, ReputationRequest, ValidateRequest};
use crate::extract::extract_links;
use crate::models::{LinkCheckReport, ValidationOutcome};

/// Single STANDARD-depth probe, no reputation data and no caching.
///
/// Unscored, so it stays out of the evaluation log.
pub async fn validate_handler(
    State(state): State<AppState>,
    Json(request): Json<ValidateRequest>,
) -> Json<ValidationOutcome> {
    Json(state.evaluator.validate(&request.url).await)
}

/// Full evaluation of every URL, in request order
pub async fn reputation_handler(
    State(state): State<AppState>,
    Json(request): Json<ReputationRequest>,
) -> Response {
    match evaluate_urls(&state, &request.urls).await {
        Ok(outcomes) => Json(outcomes).into_response(),
        Err(response) => response,
    }
}

/// Extracts links from the submitted content and evaluates each one
pub async fn extract_handler(
    State(state): State<AppState>,
    Json(request): Json<ExtractRequest>,
) -> Response {
    let links = extract_links(
        &request.content,
        request.content_type,
        request.base_url.as_deref(),
    );
    log::debug!("Extracted {} link(s) for evaluation", links.len());

    match evaluate_urls(&state, &links).await {
        Ok(outcomes) => Json(LinkCheckReport::from_outcomes(links, outcomes)).into_response(),
        Err(response) => response,
    }
}

async fn evaluate_urls(state: &AppState, urls: &[String]) -> Result<Vec<ValidationOutcome>, Response> {
    if urls.is_empty() {
        return Ok(Vec::new());
    }

    let _permit = state.batch_permits.acquire().await.map_err(|e| {
        log::error!("Batch semaphore closed: {e}");
        (StatusCode::SERVICE_UNAVAILABLE, "Server is shutting down").into_response()
    })?;

    let outcomes = state.evaluator.evaluate_batch(urls).await;
    state.log.record_all(&outcomes);
    Ok(outcomes)
}
