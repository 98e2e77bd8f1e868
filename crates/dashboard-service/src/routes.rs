//! HTTP routes for the dashboard service.
//!
//! Defines the Axum router over [`AppState`].

use crate::handlers;
use crate::state::AppState;
use axum::{
    routing::{delete, get},
    Router,
};
use metrics_exporter_prometheus::PrometheusHandle;
use std::sync::Arc;
use std::time::Duration;
use tower_http::{timeout::TimeoutLayer, trace::TraceLayer};

/// Request timeout for the whole API surface.
const REQUEST_TIMEOUT: Duration = Duration::from_secs(30);

/// Build the application routes.
///
/// Creates an Axum router with:
/// - `/health` - Liveness probe - public, unversioned
/// - `/ready` - Readiness probe - public, unversioned
/// - `/metrics` - Prometheus metrics endpoint - public, unversioned
/// - `/api/v1/streams` - Identity list and creation
/// - `/api/v1/streams/{player}` - Identity deletion
/// - `/api/v1/streams/{player}/urls` - Publish/play URL rendering
/// - `/api/v1/publishers` - Grouped publisher cards
/// - `TraceLayer` for request logging
/// - 30 second request timeout
pub fn build_routes(state: Arc<AppState>, metrics_handle: PrometheusHandle) -> Router {
    // Operational endpoints (unversioned)
    let operational_routes = Router::new()
        .route("/health", get(handlers::liveness_handler))
        .route("/ready", get(handlers::readiness_handler))
        .with_state(state.clone());

    // Metrics route with its own state
    let metrics_routes = Router::new()
        .route("/metrics", get(handlers::metrics_handler))
        .with_state(metrics_handle);

    // Dashboard API
    let api_routes = Router::new()
        .route(
            "/api/v1/streams",
            get(handlers::list_streams).post(handlers::create_stream),
        )
        .route("/api/v1/streams/:player", delete(handlers::delete_stream))
        .route("/api/v1/streams/:player/urls", get(handlers::stream_urls))
        .route("/api/v1/publishers", get(handlers::list_publishers))
        .with_state(state);

    operational_routes
        .merge(metrics_routes)
        .merge(api_routes)
        .layer(TraceLayer::new_for_http())
        .layer(TimeoutLayer::new(REQUEST_TIMEOUT))
}
