//! Read-only handlers.

use axum::extract::{Path, State};
use axum::http::header;
use axum::response::IntoResponse;
use axum::Json;
use chrono::Utc;

use super::super::types::AppState;
use crate::cache::CacheStats;
use crate::models::DomainHistory;

/// Registration and archive history of a domain (or URL)
pub async fn domain_history_handler(
    State(state): State<AppState>,
    Path(domain): Path<String>,
) -> Json<DomainHistory> {
    Json(state.evaluator.domain_history(&domain).await)
}

/// Markdown report of outcomes returned by this server
pub async fn report_handler(State(state): State<AppState>) -> impl IntoResponse {
    (
        [(header::CONTENT_TYPE, "text/markdown; charset=utf-8")],
        state.log.render_report(Utc::now()),
    )
}

pub async fn cache_stats_handler(State(state): State<AppState>) -> Json<CacheStats> {
    Json(state.evaluator.cache().stats().await)
}
