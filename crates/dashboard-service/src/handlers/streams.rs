//! Stream identity handlers.
//!
//! Implements the identity CRUD surface:
//!
//! - `GET /api/v1/streams` - Current identity list
//! - `POST /api/v1/streams` - Create an identity (missing keys are
//!   generated server-side)
//! - `DELETE /api/v1/streams/{player}` - Delete one identity
//! - `GET /api/v1/streams/{player}/urls` - Rendered publish/play URLs
//!
//! Mutations are proxied to the relay and followed by an identity
//! refresh, so the publisher monitors converge immediately instead of
//! waiting for the background sync tick.

use crate::errors::DashboardError;
use crate::state::AppState;
use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::Json;
use common::stream_key::{generate_player_key, generate_publisher_key};
use common::stream_urls::StreamUrls;
use common::types::StreamIdentity;
use serde::Deserialize;
use std::sync::Arc;
use tracing::{info, instrument};

/// Request body for creating a stream identity.
///
/// Both keys are optional: an omitted key is generated. `publisher`
/// may also be supplied alone to add a player to an existing group.
#[derive(Debug, Deserialize)]
pub struct CreateStreamRequest {
    #[serde(default)]
    pub publisher: Option<String>,
    #[serde(default)]
    pub player: Option<String>,
    #[serde(default)]
    pub description: Option<String>,
}

/// Handler for GET /api/v1/streams
///
/// Serves the cached identity list; the cache follows CRUD operations
/// immediately and out-of-band changes within one sync interval.
pub async fn list_streams(State(state): State<Arc<AppState>>) -> Json<Vec<StreamIdentity>> {
    Json(state.identities.read().await.clone())
}

/// Handler for POST /api/v1/streams
///
/// # Response
///
/// - 201 Created: identity registered on the relay
/// - 400 Bad Request: invalid body, blank key, or publisher == player
/// - 409 Conflict: the player key is already registered
/// - 503 Service Unavailable: relay unreachable
#[instrument(skip_all, name = "dashboard.streams.create")]
pub async fn create_stream(
    State(state): State<Arc<AppState>>,
    body: axum::body::Bytes,
) -> Result<(StatusCode, Json<StreamIdentity>), DashboardError> {
    // Deserialize manually to return 400 (not Axum's default 422)
    let request: CreateStreamRequest = serde_json::from_slice(&body)
        .map_err(|e| DashboardError::BadRequest(format!("Invalid request body: {e}")))?;

    let identity = build_identity(request)?;

    state.relay.create_stream_id(&identity).await?;
    // A failed refresh is not a failed create: the background sync
    // converges the monitors on the next tick.
    if let Err(error) = state.refresh_identities().await {
        tracing::warn!(
            target: "dashboard.streams",
            error = %error,
            "Identity refresh after create failed"
        );
    }

    info!(
        target: "dashboard.streams",
        publisher = %identity.publisher,
        player = %identity.player,
        "Stream identity created"
    );
    Ok((StatusCode::CREATED, Json(identity)))
}

/// Validate the request and fill in generated keys.
fn build_identity(request: CreateStreamRequest) -> Result<StreamIdentity, DashboardError> {
    let publisher = match request.publisher {
        Some(publisher) => {
            let publisher = publisher.trim().to_string();
            if publisher.is_empty() {
                return Err(DashboardError::BadRequest(
                    "Publisher ID must not be blank".to_string(),
                ));
            }
            publisher
        }
        None => generate_publisher_key(),
    };

    let player = match request.player {
        Some(player) => {
            let player = player.trim().to_string();
            if player.is_empty() {
                return Err(DashboardError::BadRequest(
                    "Player ID must not be blank".to_string(),
                ));
            }
            player
        }
        None => generate_player_key(),
    };

    if publisher == player {
        return Err(DashboardError::BadRequest(
            "Publisher and Player IDs must be different".to_string(),
        ));
    }

    let description = request
        .description
        .map(|d| d.trim().to_string())
        .filter(|d| !d.is_empty());

    Ok(StreamIdentity {
        publisher,
        player,
        description,
    })
}

/// Handler for DELETE /api/v1/streams/{player}
///
/// # Response
///
/// - 204 No Content: identity removed
/// - 404 Not Found: unknown player key
/// - 503 Service Unavailable: relay unreachable
#[instrument(skip_all, name = "dashboard.streams.delete", fields(player = %player))]
pub async fn delete_stream(
    State(state): State<Arc<AppState>>,
    Path(player): Path<String>,
) -> Result<StatusCode, DashboardError> {
    state.relay.delete_stream_id(&player).await?;
    if let Err(error) = state.refresh_identities().await {
        tracing::warn!(
            target: "dashboard.streams",
            error = %error,
            "Identity refresh after delete failed"
        );
    }

    info!(target: "dashboard.streams", player = %player, "Stream identity deleted");
    Ok(StatusCode::NO_CONTENT)
}

/// Handler for GET /api/v1/streams/{player}/urls
///
/// Renders the publish/play URLs an operator pastes into encoder and
/// player configuration.
pub async fn stream_urls(
    State(state): State<Arc<AppState>>,
    Path(player): Path<String>,
) -> Result<Json<StreamUrls>, DashboardError> {
    let identities = state.identities.read().await;
    let identity = identities
        .iter()
        .find(|identity| identity.player == player)
        .ok_or_else(|| DashboardError::NotFound(format!("Unknown player '{player}'")))?;

    Ok(Json(state.config.relay_endpoints().stream_urls(identity)))
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used)]
mod tests {
    use super::*;
    use common::stream_key::{PLAYER_KEY_PREFIX, PUBLISHER_KEY_PREFIX};

    #[test]
    fn test_build_identity_generates_missing_keys() {
        let identity = build_identity(CreateStreamRequest {
            publisher: None,
            player: None,
            description: None,
        })
        .unwrap();

        assert!(identity.publisher.starts_with(PUBLISHER_KEY_PREFIX));
        assert!(identity.player.starts_with(PLAYER_KEY_PREFIX));
        assert_ne!(identity.publisher, identity.player);
    }

    #[test]
    fn test_build_identity_keeps_supplied_keys_trimmed() {
        let identity = build_identity(CreateStreamRequest {
            publisher: Some("  live_studio ".to_string()),
            player: Some("play_lobby".to_string()),
            description: Some("  Main feed ".to_string()),
        })
        .unwrap();

        assert_eq!(identity.publisher, "live_studio");
        assert_eq!(identity.player, "play_lobby");
        assert_eq!(identity.description.as_deref(), Some("Main feed"));
    }

    #[test]
    fn test_build_identity_prefilled_publisher_generates_player() {
        let identity = build_identity(CreateStreamRequest {
            publisher: Some("live_studio".to_string()),
            player: None,
            description: None,
        })
        .unwrap();

        assert_eq!(identity.publisher, "live_studio");
        assert!(identity.player.starts_with(PLAYER_KEY_PREFIX));
    }

    #[test]
    fn test_build_identity_rejects_identical_keys() {
        let result = build_identity(CreateStreamRequest {
            publisher: Some("same_key".to_string()),
            player: Some("same_key".to_string()),
            description: None,
        });

        assert!(matches!(result, Err(DashboardError::BadRequest(_))));
    }

    #[test]
    fn test_build_identity_rejects_blank_keys() {
        let result = build_identity(CreateStreamRequest {
            publisher: Some("   ".to_string()),
            player: None,
            description: None,
        });

        assert!(matches!(result, Err(DashboardError::BadRequest(_))));
    }

    #[test]
    fn test_build_identity_drops_blank_description() {
        let identity = build_identity(CreateStreamRequest {
            publisher: None,
            player: None,
            description: Some("   ".to_string()),
        })
        .unwrap();

        assert_eq!(identity.description, None);
    }
}
