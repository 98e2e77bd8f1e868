//! Publisher card handlers.

use crate::state::AppState;
use axum::extract::State;
use axum::Json;
use monitor::PublisherCard;
use std::sync::Arc;

/// Handler for GET /api/v1/publishers
///
/// One card per distinct publisher key, in first-seen order: status
/// pill, stats grid (null while offline), and the seconds-until-refresh
/// countdown. This is the payload the dashboard frontend polls to
/// render publisher cards.
pub async fn list_publishers(State(state): State<Arc<AppState>>) -> Json<Vec<PublisherCard>> {
    Json(state.registry.lock().await.cards())
}
