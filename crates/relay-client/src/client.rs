//! The relay management API client.

use crate::error::RelayClientError;
use async_trait::async_trait;
use common::types::{StatsSnapshot, StreamIdentity};
use monitor::{StatsFetchError, StatsSource};
use reqwest::StatusCode;
use serde::de::DeserializeOwned;
use serde::Deserialize;
use std::time::Duration;
use tracing::{debug, instrument};

/// Default connection timeout for the HTTP client.
const DEFAULT_CONNECT_TIMEOUT: Duration = Duration::from_secs(5);

/// Response envelope used by every relay management endpoint.
#[derive(Debug, Deserialize)]
struct ApiEnvelope<T> {
    status: String,
    data: Option<T>,
    #[serde(default)]
    message: Option<String>,
}

impl<T> ApiEnvelope<T> {
    /// Unwrap a success envelope, or turn an error envelope into
    /// `InvalidResponse` with the relay's message.
    fn into_data(self) -> Result<Option<T>, RelayClientError> {
        if self.status == "success" {
            Ok(self.data)
        } else {
            Err(RelayClientError::InvalidResponse(
                self.message
                    .unwrap_or_else(|| "relay returned an error envelope".to_string()),
            ))
        }
    }
}

/// Client for the relay management API.
///
/// Cheap to clone (the underlying connection pool is shared) and safe
/// to call concurrently from multiple monitors.
#[derive(Debug, Clone)]
pub struct RelayClient {
    http: reqwest::Client,
    base_url: String,
}

impl RelayClient {
    /// Create a client for the relay at `base_url`.
    ///
    /// # Errors
    ///
    /// Returns `RelayClientError::Configuration` if the HTTP client
    /// cannot be built.
    pub fn new(
        base_url: impl Into<String>,
        timeout: Duration,
    ) -> Result<Self, RelayClientError> {
        let http = reqwest::Client::builder()
            .timeout(timeout)
            .connect_timeout(DEFAULT_CONNECT_TIMEOUT)
            .build()
            .map_err(|e| {
                RelayClientError::Configuration(format!("Failed to build HTTP client: {e}"))
            })?;

        let base_url = base_url.into().trim_end_matches('/').to_string();
        Ok(Self { http, base_url })
    }

    /// Fetch the full stream identity list.
    ///
    /// # Errors
    ///
    /// `RelayClientError::Transport` when the relay is unreachable or
    /// answers with a non-success status.
    #[instrument(skip_all, name = "relay.list_stream_ids")]
    pub async fn list_stream_ids(&self) -> Result<Vec<StreamIdentity>, RelayClientError> {
        let url = format!("{}/api/streams", self.base_url);
        let response = self
            .http
            .get(&url)
            .send()
            .await
            .map_err(|e| RelayClientError::Transport(e.to_string()))?;

        let envelope: ApiEnvelope<Vec<StreamIdentity>> =
            decode_success_body(response).await?;
        Ok(envelope.into_data()?.unwrap_or_default())
    }

    /// Register a new stream identity on the relay.
    ///
    /// # Errors
    ///
    /// `RelayClientError::Conflict` if the player key is taken.
    #[instrument(skip_all, name = "relay.create_stream_id", fields(player = %identity.player))]
    pub async fn create_stream_id(
        &self,
        identity: &StreamIdentity,
    ) -> Result<(), RelayClientError> {
        let url = format!("{}/api/streams", self.base_url);
        let response = self
            .http
            .post(&url)
            .json(identity)
            .send()
            .await
            .map_err(|e| RelayClientError::Transport(e.to_string()))?;

        if response.status() == StatusCode::CONFLICT {
            let message = error_message(response).await;
            return Err(RelayClientError::Conflict(message));
        }
        let envelope: ApiEnvelope<StreamIdentity> = decode_success_body(response).await?;
        let _ = envelope.into_data()?;

        debug!(target: "relay.client", player = %identity.player, "Stream identity created");
        Ok(())
    }

    /// Delete the identity owning `player`.
    ///
    /// # Errors
    ///
    /// `RelayClientError::NotFound` if the relay does not know the key.
    #[instrument(skip_all, name = "relay.delete_stream_id", fields(player = %player))]
    pub async fn delete_stream_id(&self, player: &str) -> Result<(), RelayClientError> {
        let url = format!("{}/api/streams/{player}", self.base_url);
        let response = self
            .http
            .delete(&url)
            .send()
            .await
            .map_err(|e| RelayClientError::Transport(e.to_string()))?;

        if response.status() == StatusCode::NOT_FOUND {
            let message = error_message(response).await;
            return Err(RelayClientError::NotFound(message));
        }
        let envelope: ApiEnvelope<serde::de::IgnoredAny> =
            decode_success_body(response).await?;
        let _ = envelope.into_data()?;

        debug!(target: "relay.client", player = %player, "Stream identity deleted");
        Ok(())
    }

    /// Fetch the current stats for `player`.
    ///
    /// `Ok(None)` means the relay answered but the publisher is not
    /// live (or the player key is unknown — the dashboard treats both
    /// as offline).
    ///
    /// # Errors
    ///
    /// `RelayClientError::Transport` when the relay is unreachable or
    /// answers with a non-success status.
    #[instrument(skip_all, name = "relay.player_stats", fields(player = %player))]
    pub async fn player_stats(
        &self,
        player: &str,
    ) -> Result<Option<StatsSnapshot>, RelayClientError> {
        let url = format!("{}/api/stats/{player}", self.base_url);
        let response = self
            .http
            .get(&url)
            .send()
            .await
            .map_err(|e| RelayClientError::Transport(e.to_string()))?;

        if response.status() == StatusCode::NOT_FOUND {
            return Ok(None);
        }
        let envelope: ApiEnvelope<StatsSnapshot> = decode_success_body(response).await?;
        envelope.into_data()
    }
}

/// Require a success status and decode the envelope body.
async fn decode_success_body<T: DeserializeOwned>(
    response: reqwest::Response,
) -> Result<ApiEnvelope<T>, RelayClientError> {
    let status = response.status();
    if !status.is_success() {
        return Err(RelayClientError::Transport(format!(
            "relay answered {status}"
        )));
    }
    response
        .json()
        .await
        .map_err(|e| RelayClientError::InvalidResponse(e.to_string()))
}

/// Best-effort extraction of the message from an error envelope.
async fn error_message(response: reqwest::Response) -> String {
    match response.json::<ApiEnvelope<serde::de::IgnoredAny>>().await {
        Ok(envelope) => envelope
            .message
            .unwrap_or_else(|| "relay returned an error envelope".to_string()),
        Err(e) => format!("undecodable error response: {e}"),
    }
}

#[async_trait]
impl StatsSource for RelayClient {
    async fn fetch_stats(
        &self,
        player_id: &str,
    ) -> Result<Option<StatsSnapshot>, StatsFetchError> {
        self.player_stats(player_id)
            .await
            .map_err(|e| StatsFetchError::Transport(e.to_string()))
    }
}
