//! Serializable dashboard card models.
//!
//! One card per publisher group, assembled from the group's current
//! poll state and countdown value. Offline cards render a status pill
//! only; the stats grid is suppressed (`stats` is null on the wire), a
//! single failed poll never surfaces as an error message.

use crate::poll::PollState;
use common::types::{StatsSnapshot, StreamIdentity};
use serde::Serialize;

/// Liveness pill shown on a publisher card.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum PublisherStatus {
    /// Publisher is currently emitting stats.
    Online,
    /// Publisher is not live (or has never published).
    Offline,
}

/// One publisher group as the dashboard renders it.
#[derive(Debug, Clone, Serialize)]
pub struct PublisherCard {
    /// The shared publisher key.
    pub publisher: String,
    /// Member identities, in dashboard order.
    pub players: Vec<StreamIdentity>,
    /// Liveness pill.
    pub status: PublisherStatus,
    /// Stats grid contents; `None` (JSON null) whenever offline.
    pub stats: Option<StatsSnapshot>,
    /// Pre-formatted uptime for the stats grid, e.g. `"1h 2m 3s"`.
    pub uptime_display: Option<String>,
    /// Pre-formatted ingest bitrate, e.g. `"2.50 Mbps"`.
    pub bitrate_display: Option<String>,
    /// Countdown display value.
    pub seconds_until_refresh: u64,
    /// Current poll cadence, for the refresh tooltip.
    pub poll_interval_ms: u64,
}

impl PublisherCard {
    /// Assemble a card from a group's live monitoring state.
    #[must_use]
    pub fn assemble(
        publisher: &str,
        members: &[StreamIdentity],
        state: &PollState,
        seconds_until_refresh: u64,
    ) -> Self {
        let status = if state.is_online {
            PublisherStatus::Online
        } else {
            PublisherStatus::Offline
        };
        let stats = state.last_snapshot.clone().filter(|_| state.is_online);
        let uptime_display = stats.as_ref().map(|s| format_uptime(s.uptime_seconds));
        let bitrate_display = stats.as_ref().map(|s| format_bitrate(s.bitrate_kbps));

        Self {
            publisher: publisher.to_string(),
            players: members.to_vec(),
            status,
            stats,
            uptime_display,
            bitrate_display,
            seconds_until_refresh,
            poll_interval_ms: u64::try_from(state.poll_interval.as_millis())
                .unwrap_or(u64::MAX),
        }
    }
}

/// Format an uptime for the stats grid, e.g. `"1h 2m 3s"`.
#[must_use]
pub fn format_uptime(seconds: u64) -> String {
    let hours = seconds / 3600;
    let minutes = (seconds % 3600) / 60;
    let secs = seconds % 60;
    format!("{hours}h {minutes}m {secs}s")
}

/// Format an ingest bitrate for the stats grid: Kbps below 1000,
/// otherwise Mbps with two decimals.
#[must_use]
#[allow(clippy::cast_precision_loss)]
pub fn format_bitrate(kbps: u64) -> String {
    if kbps >= 1000 {
        format!("{:.2} Mbps", kbps as f64 / 1000.0)
    } else {
        format!("{kbps} Kbps")
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used)]
mod tests {
    use super::*;
    use crate::liveness::{OFFLINE_POLL_INTERVAL, ONLINE_POLL_INTERVAL};
    use tokio::time::Instant;

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

    #[tokio::test]
    async fn test_online_card_carries_stats() {
        let state = PollState {
            last_snapshot: Some(snapshot()),
            is_online: true,
            last_update: Instant::now(),
            poll_interval: ONLINE_POLL_INTERVAL,
        };
        let members = vec![StreamIdentity::new("live_a", "play_1")];

        let card = PublisherCard::assemble("live_a", &members, &state, 5);

        assert_eq!(card.status, PublisherStatus::Online);
        assert_eq!(card.stats, Some(snapshot()));
        assert_eq!(card.uptime_display.as_deref(), Some("0h 1m 30s"));
        assert_eq!(card.bitrate_display.as_deref(), Some("2.50 Mbps"));
        assert_eq!(card.seconds_until_refresh, 5);
        assert_eq!(card.poll_interval_ms, 5_000);
    }

    #[tokio::test]
    async fn test_offline_card_suppresses_stats_grid() {
        let state = PollState {
            last_snapshot: None,
            is_online: false,
            last_update: Instant::now(),
            poll_interval: OFFLINE_POLL_INTERVAL,
        };
        let members = vec![StreamIdentity::new("live_a", "play_1")];

        let card = PublisherCard::assemble("live_a", &members, &state, 10);

        assert_eq!(card.status, PublisherStatus::Offline);
        assert_eq!(card.stats, None);
        assert_eq!(card.uptime_display, None);
        assert_eq!(card.bitrate_display, None);
        assert_eq!(card.poll_interval_ms, 10_000);

        let json = serde_json::to_value(&card).unwrap();
        assert_eq!(json["status"], "offline");
        assert!(json["stats"].is_null());
    }

    #[test]
    fn test_format_uptime() {
        assert_eq!(format_uptime(0), "0h 0m 0s");
        assert_eq!(format_uptime(90), "0h 1m 30s");
        assert_eq!(format_uptime(3_723), "1h 2m 3s");
    }

    #[test]
    fn test_format_bitrate() {
        assert_eq!(format_bitrate(800), "800 Kbps");
        assert_eq!(format_bitrate(2500), "2.50 Mbps");
        assert_eq!(format_bitrate(1000), "1.00 Mbps");
    }
}
