//! Publish/play URL rendering for stream identities.
//!
//! The relay listens for senders and players on two separate SRT ports;
//! the stream key travels in the `streamid` query parameter. These URLs
//! are what operators paste into their encoder or player.

use crate::types::StreamIdentity;
use serde::Serialize;

/// Publicly reachable SRT endpoints of the relay.
#[derive(Debug, Clone)]
pub struct RelayEndpoints {
    /// Hostname or IP the relay is reachable at from outside.
    pub host: String,
    /// UDP port the relay accepts publishers on.
    pub sender_port: u16,
    /// UDP port the relay serves players on.
    pub player_port: u16,
}

/// Rendered URLs for one stream identity.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct StreamUrls {
    /// URL the sender pushes to.
    pub publish_url: String,
    /// URL a viewer pulls from.
    pub play_url: String,
}

impl RelayEndpoints {
    /// Render the publish and play URLs for `identity`.
    #[must_use]
    pub fn stream_urls(&self, identity: &StreamIdentity) -> StreamUrls {
        StreamUrls {
            publish_url: format!(
                "srt://{}:{}?streamid={}",
                self.host, self.sender_port, identity.publisher
            ),
            play_url: format!(
                "srt://{}:{}?streamid={}",
                self.host, self.player_port, identity.player
            ),
        }
    }
}
