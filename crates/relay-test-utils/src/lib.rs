//! Mock relay management API for integration tests.
//!
//! Provides [`MockRelayServer`], a real axum listener on a random port
//! backed by in-memory state, so client and service tests exercise
//! actual HTTP instead of stubbed transports. Test code drives liveness
//! through [`MockRelayServer::set_live`]/[`set_offline`] and asserts on
//! the per-player stats fetch counters.
//!
//! [`set_offline`]: MockRelayServer::set_offline

#![warn(clippy::pedantic)]

use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::routing::{delete, get};
use axum::{Json, Router};
use common::types::{StatsSnapshot, StreamIdentity};
use serde::Serialize;
use std::collections::HashMap;
use std::net::SocketAddr;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex};
use tokio::task::JoinHandle;

/// Response envelope used by the relay management API.
#[derive(Debug, Serialize)]
struct Envelope<T: Serialize> {
    status: &'static str,
    #[serde(skip_serializing_if = "Option::is_none")]
    data: Option<T>,
    #[serde(skip_serializing_if = "Option::is_none")]
    message: Option<String>,
}

impl<T: Serialize> Envelope<T> {
    fn success(data: T) -> Self {
        Self {
            status: "success",
            data: Some(data),
            message: None,
        }
    }

    fn error(message: impl Into<String>) -> Self {
        Self {
            status: "error",
            data: None,
            message: Some(message.into()),
        }
    }
}

#[derive(Default)]
struct RelayState {
    identities: Mutex<Vec<StreamIdentity>>,
    /// Live publishers, keyed by publisher key.
    live: Mutex<HashMap<String, StatsSnapshot>>,
    /// Stats fetches observed, keyed by player key.
    stats_calls: Mutex<HashMap<String, u32>>,
    /// When set, the stats endpoint answers 500.
    fail_stats: AtomicBool,
}

/// Test harness for spawning a mock relay management API.
///
/// # Example
/// ```rust,ignore
/// let relay = MockRelayServer::spawn().await?;
/// relay.add_identity(StreamIdentity::new("live_a", "play_1"));
/// relay.set_live("live_a", snapshot);
///
/// let client = RelayClient::new(relay.url(), Duration::from_secs(2))?;
/// let stats = client.fetch_stats("play_1").await?;
/// ```
pub struct MockRelayServer {
    addr: SocketAddr,
    state: Arc<RelayState>,
    _handle: JoinHandle<()>,
}

impl MockRelayServer {
    /// Spawn the mock relay on a random local port.
    ///
    /// # Errors
    ///
    /// Returns an error if the listener cannot be bound.
    pub async fn spawn() -> Result<Self, anyhow::Error> {
        let state = Arc::new(RelayState::default());

        let app = Router::new()
            .route("/api/streams", get(list_streams).post(create_stream))
            .route("/api/streams/:player", delete(delete_stream))
            .route("/api/stats/:player", get(player_stats))
            .with_state(Arc::clone(&state));

        let listener = tokio::net::TcpListener::bind("127.0.0.1:0")
            .await
            .map_err(|e| anyhow::anyhow!("Failed to bind mock relay: {e}"))?;
        let addr = listener
            .local_addr()
            .map_err(|e| anyhow::anyhow!("Failed to get local address: {e}"))?;

        let handle = tokio::spawn(async move {
            let _ = axum::serve(listener, app).await;
        });

        Ok(Self {
            addr,
            state,
            _handle: handle,
        })
    }

    /// Base URL of the mock relay, e.g. `http://127.0.0.1:49152`.
    #[must_use]
    pub fn url(&self) -> String {
        format!("http://{}", self.addr)
    }

    /// Register an identity directly in the backing store.
    pub fn add_identity(&self, identity: StreamIdentity) {
        if let Ok(mut identities) = self.state.identities.lock() {
            identities.push(identity);
        }
    }

    /// Current identity list.
    #[must_use]
    pub fn identities(&self) -> Vec<StreamIdentity> {
        self.state
            .identities
            .lock()
            .map(|identities| identities.clone())
            .unwrap_or_default()
    }

    /// Mark a publisher live with the given stats.
    pub fn set_live(&self, publisher: &str, stats: StatsSnapshot) {
        if let Ok(mut live) = self.state.live.lock() {
            live.insert(publisher.to_string(), stats);
        }
    }

    /// Mark a publisher offline.
    pub fn set_offline(&self, publisher: &str) {
        if let Ok(mut live) = self.state.live.lock() {
            live.remove(publisher);
        }
    }

    /// Make the stats endpoint fail with 500 (transport-level failure
    /// from the client's perspective).
    pub fn set_stats_failing(&self, fail: bool) {
        self.state.fail_stats.store(fail, Ordering::SeqCst);
    }

    /// Number of stats fetches observed for `player`.
    #[must_use]
    pub fn stats_calls_for(&self, player: &str) -> u32 {
        self.state
            .stats_calls
            .lock()
            .map(|calls| calls.get(player).copied().unwrap_or(0))
            .unwrap_or(0)
    }
}

async fn list_streams(
    State(state): State<Arc<RelayState>>,
) -> Json<Envelope<Vec<StreamIdentity>>> {
    let identities = state
        .identities
        .lock()
        .map(|identities| identities.clone())
        .unwrap_or_default();
    Json(Envelope::success(identities))
}

async fn create_stream(
    State(state): State<Arc<RelayState>>,
    Json(identity): Json<StreamIdentity>,
) -> (StatusCode, Json<Envelope<StreamIdentity>>) {
    let Ok(mut identities) = state.identities.lock() else {
        return (
            StatusCode::INTERNAL_SERVER_ERROR,
            Json(Envelope::error("state poisoned")),
        );
    };
    if identities.iter().any(|i| i.player == identity.player) {
        return (
            StatusCode::CONFLICT,
            Json(Envelope::error(format!(
                "Stream ID with player '{}' already exists",
                identity.player
            ))),
        );
    }
    identities.push(identity.clone());
    (StatusCode::CREATED, Json(Envelope::success(identity)))
}

async fn delete_stream(
    State(state): State<Arc<RelayState>>,
    Path(player): Path<String>,
) -> (StatusCode, Json<Envelope<()>>) {
    let Ok(mut identities) = state.identities.lock() else {
        return (
            StatusCode::INTERNAL_SERVER_ERROR,
            Json(Envelope::error("state poisoned")),
        );
    };
    let before = identities.len();
    identities.retain(|i| i.player != player);
    if identities.len() == before {
        return (
            StatusCode::NOT_FOUND,
            Json(Envelope::error(format!("Unknown player '{player}'"))),
        );
    }
    (StatusCode::OK, Json(Envelope::success(())))
}

async fn player_stats(
    State(state): State<Arc<RelayState>>,
    Path(player): Path<String>,
) -> (StatusCode, Json<Envelope<StatsSnapshot>>) {
    if state.fail_stats.load(Ordering::SeqCst) {
        return (
            StatusCode::INTERNAL_SERVER_ERROR,
            Json(Envelope::error("relay stats unavailable")),
        );
    }

    if let Ok(mut calls) = state.stats_calls.lock() {
        *calls.entry(player.clone()).or_insert(0) += 1;
    }

    let publisher = state.identities.lock().ok().and_then(|identities| {
        identities
            .iter()
            .find(|i| i.player == player)
            .map(|i| i.publisher.clone())
    });
    let Some(publisher) = publisher else {
        return (
            StatusCode::NOT_FOUND,
            Json(Envelope::error(format!("Unknown player '{player}'"))),
        );
    };

    let stats = state
        .live
        .lock()
        .ok()
        .and_then(|live| live.get(&publisher).cloned());
    match stats {
        Some(stats) => (StatusCode::OK, Json(Envelope::success(stats))),
        // Known player, publisher not currently live
        None => (
            StatusCode::OK,
            Json(Envelope {
                status: "success",
                data: None,
                message: None,
            }),
        ),
    }
}
