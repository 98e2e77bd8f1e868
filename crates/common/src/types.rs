//! Common data types for Watchtower components.
//!
//! Wire-facing structs use the relay management API's camelCase field
//! names via serde renames, so the same types serve both the relay
//! client and the dashboard JSON surface.

use serde::{Deserialize, Serialize};

/// One publisher/player key pair registered on the relay.
///
/// The `player` key is globally unique (relay-enforced). Multiple
/// identities may share one `publisher` key; those form a publisher
/// group on the dashboard. Identities are immutable once created and
/// removed only by explicit deletion.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StreamIdentity {
    /// Publisher key the sender uses to push the stream.
    pub publisher: String,
    /// Player key a viewer uses to pull the stream.
    pub player: String,
    /// Optional operator-facing note ("Main studio feed").
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
}

impl StreamIdentity {
    /// Create an identity without a description.
    #[must_use]
    pub fn new(publisher: impl Into<String>, player: impl Into<String>) -> Self {
        Self {
            publisher: publisher.into(),
            player: player.into(),
            description: None,
        }
    }
}

/// Transport statistics for a live publisher, produced by one stats
/// fetch and superseded by the next.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StatsSnapshot {
    /// Ingest bitrate in Kbps.
    #[serde(rename = "bitrate")]
    pub bitrate_kbps: u64,

    /// Seconds since the publisher connected.
    #[serde(rename = "uptime")]
    pub uptime_seconds: u64,

    /// Round-trip time to the sender in milliseconds.
    #[serde(rename = "rtt")]
    pub rtt_ms: f64,

    /// Packets lost on the receive path.
    #[serde(rename = "pktRcvLoss")]
    pub pkt_recv_loss: u64,

    /// Packets dropped on the receive path.
    #[serde(rename = "pktRcvDrop")]
    pub pkt_recv_drop: u64,

    /// Receive rate in Mbps.
    #[serde(rename = "mbpsRecvRate")]
    pub recv_rate_mbps: f64,
}
