//! Liveness classification and the adaptive interval policy.
//!
//! A publisher going offline is a routine, user-visible steady state,
//! not an exceptional condition, so fetch failures never propagate past
//! this module: they collapse into the same verdict as "no stats
//! available". The classifier cannot tell "never published" apart from
//! "publisher stopped"; both render as offline.

use crate::source::StatsFetchError;
use common::types::StatsSnapshot;
use std::time::Duration;

/// Poll interval while a publisher is online.
pub const ONLINE_POLL_INTERVAL: Duration = Duration::from_millis(5_000);

/// Poll interval while a publisher is offline. Idle publishers are
/// polled at half the rate to cut network and render overhead.
pub const OFFLINE_POLL_INTERVAL: Duration = Duration::from_millis(10_000);

/// Verdict derived from one stats-fetch outcome.
#[derive(Debug, Clone, PartialEq)]
pub struct Verdict {
    /// The snapshot carried by a successful fetch; `None` when offline.
    pub snapshot: Option<StatsSnapshot>,
    /// Whether the publisher is currently emitting stats.
    pub is_online: bool,
}

/// Classify one stats-fetch outcome.
#[must_use]
pub fn classify(outcome: Result<Option<StatsSnapshot>, StatsFetchError>) -> Verdict {
    match outcome {
        Ok(Some(snapshot)) => Verdict {
            snapshot: Some(snapshot),
            is_online: true,
        },
        Ok(None) | Err(_) => Verdict {
            snapshot: None,
            is_online: false,
        },
    }
}

/// Poll interval for the given liveness.
///
/// These are the only two values `PollState::poll_interval` ever holds,
/// and the interval changes only as a synchronous consequence of a poll
/// outcome.
#[must_use]
pub fn poll_interval(is_online: bool) -> Duration {
    if is_online {
        ONLINE_POLL_INTERVAL
    } else {
        OFFLINE_POLL_INTERVAL
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used)]
mod tests {
    use super::*;

    fn snapshot() -> StatsSnapshot {
        StatsSnapshot {
            bitrate_kbps: 2500,
            uptime_seconds: 90,
            rtt_ms: 12.5,
            pkt_recv_loss: 0,
            pkt_recv_drop: 0,
            recv_rate_mbps: 2.4,
        }
    }

    #[test]
    fn test_successful_fetch_with_payload_is_online() {
        let verdict = classify(Ok(Some(snapshot())));

        assert!(verdict.is_online);
        assert_eq!(verdict.snapshot, Some(snapshot()));
    }

    #[test]
    fn test_absent_payload_is_offline() {
        let verdict = classify(Ok(None));

        assert!(!verdict.is_online);
        assert_eq!(verdict.snapshot, None);
    }

    #[test]
    fn test_transport_failure_is_offline() {
        let verdict = classify(Err(StatsFetchError::Transport(
            "connection refused".to_string(),
        )));

        assert!(!verdict.is_online);
        assert_eq!(verdict.snapshot, None);
    }

    #[test]
    fn test_interval_policy() {
        assert_eq!(poll_interval(true), ONLINE_POLL_INTERVAL);
        assert_eq!(poll_interval(false), OFFLINE_POLL_INTERVAL);
        assert_eq!(ONLINE_POLL_INTERVAL, Duration::from_millis(5_000));
        assert_eq!(OFFLINE_POLL_INTERVAL, Duration::from_millis(10_000));
    }
}
