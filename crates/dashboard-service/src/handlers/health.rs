//! Health and metrics endpoints.
//!
//! - `GET /health` - Returns 200 if the process is running (liveness)
//! - `GET /ready` - Returns 200 once the identity list has loaded,
//!   503 otherwise (readiness)
//! - `GET /metrics` - Prometheus text format

use crate::state::AppState;
use axum::extract::State;
use axum::http::StatusCode;
use metrics_exporter_prometheus::PrometheusHandle;
use std::sync::Arc;

/// Liveness probe handler.
pub async fn liveness_handler(State(state): State<Arc<AppState>>) -> StatusCode {
    if state.health.is_live() {
        StatusCode::OK
    } else {
        StatusCode::SERVICE_UNAVAILABLE
    }
}

/// Readiness probe handler.
///
/// Not ready until the first successful identity-list fetch has primed
/// the monitor registry, and during shutdown.
pub async fn readiness_handler(State(state): State<Arc<AppState>>) -> StatusCode {
    if state.health.is_ready() {
        StatusCode::OK
    } else {
        StatusCode::SERVICE_UNAVAILABLE
    }
}

/// Prometheus metrics handler.
pub async fn metrics_handler(State(handle): State<PrometheusHandle>) -> String {
    handle.render()
}
