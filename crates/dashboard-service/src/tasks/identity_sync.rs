//! Identity synchronization background task.
//!
//! Periodically re-fetches the stream identity list from the relay and
//! converges the monitor registry on it, so identities created or
//! deleted outside this dashboard start or stop being monitored within
//! one interval.
//!
//! # Graceful Shutdown
//!
//! The task supports graceful shutdown via a cancellation token. When
//! the token is cancelled, the task completes its current iteration and
//! exits cleanly.

use crate::state::AppState;
use std::sync::Arc;
use std::time::Duration;
use tokio_util::sync::CancellationToken;
use tracing::{debug, info, instrument};

/// Start the identity sync background task.
///
/// Runs until the cancellation token is triggered. A failed list fetch
/// is logged and retried on the next tick; the running monitors keep
/// polling against the last known grouping in the meantime.
///
/// # Arguments
///
/// * `state` - Shared application state
/// * `interval` - Sync cadence (from configuration)
/// * `cancel_token` - Token for graceful shutdown
#[instrument(skip_all, name = "dashboard.task.identity_sync")]
pub async fn start_identity_sync(
    state: Arc<AppState>,
    interval: Duration,
    cancel_token: CancellationToken,
) {
    info!(
        target: "dashboard.task.identity_sync",
        interval_secs = interval.as_secs(),
        "Starting identity sync task"
    );

    let mut ticker = tokio::time::interval(interval);
    ticker.set_missed_tick_behavior(tokio::time::MissedTickBehavior::Skip);

    loop {
        tokio::select! {
            _ = ticker.tick() => {
                match state.refresh_identities().await {
                    Ok(()) => {
                        debug!(
                            target: "dashboard.task.identity_sync",
                            "Identity list synchronized"
                        );
                    }
                    Err(e) => {
                        // Log error but continue - the relay might recover
                        tracing::error!(
                            target: "dashboard.task.identity_sync",
                            error = %e,
                            "Failed to synchronize identity list"
                        );
                    }
                }
            }
            () = cancel_token.cancelled() => {
                info!(
                    target: "dashboard.task.identity_sync",
                    "Identity sync task received shutdown signal, exiting"
                );
                break;
            }
        }
    }

    info!(
        target: "dashboard.task.identity_sync",
        "Identity sync task stopped"
    );
}
