//! Common types shared across Watchtower components.

#![warn(clippy::pedantic)]

/// Module for shared domain types
pub mod types;

/// Module for stream key generation
pub mod stream_key;

/// Module for publish/play URL rendering
pub mod stream_urls;
