//! The stats-fetch contract consumed by the poll loop.

use async_trait::async_trait;
use common::types::StatsSnapshot;
use thiserror::Error;

/// Errors a stats source can produce.
///
/// There is deliberately no richer taxonomy here: the poll loop folds
/// every failure into an "offline" verdict, so sources only need to say
/// that the fetch did not complete.
#[derive(Debug, Clone, Error)]
pub enum StatsFetchError {
    /// Transport-level failure (connection refused, timeout, non-success
    /// response from the relay).
    #[error("Transport error: {0}")]
    Transport(String),
}

/// A source of per-player transport statistics.
///
/// `Ok(None)` means the fetch completed but the publisher behind
/// `player_id` is not currently live. Implementations must be idempotent
/// and side-effect-free from the poller's perspective; the poll loop
/// calls `fetch_stats` at most once per subject per interval.
#[async_trait]
pub trait StatsSource: Send + Sync {
    /// Fetch the current stats for `player_id`.
    async fn fetch_stats(
        &self,
        player_id: &str,
    ) -> Result<Option<StatsSnapshot>, StatsFetchError>;
}
