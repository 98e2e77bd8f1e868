//! HTTP client for the SRT relay management API.
//!
//! The relay exposes a small JSON API for stream identity CRUD and
//! per-player transport statistics. Every response is wrapped in a
//! `{ "status": "success"|"error", "data"?, "message"? }` envelope.
//!
//! [`RelayClient`] is stateless and cheap to clone; one instance is
//! safely shared by every publisher monitor. It also implements
//! [`monitor::StatsSource`], which is how the poll loops consume it:
//! a completed fetch with no payload is `Ok(None)` (publisher not
//! live), while transport failures and non-success responses surface
//! as errors for the liveness classifier to fold into "offline".

#![warn(clippy::pedantic)]

mod client;
mod error;

pub use client::RelayClient;
pub use error::RelayClientError;
