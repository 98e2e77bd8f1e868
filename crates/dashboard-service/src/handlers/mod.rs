//! Axum request handlers for the dashboard API.

pub mod health;
pub mod publishers;
pub mod streams;

pub use health::{liveness_handler, metrics_handler, readiness_handler};
pub use publishers::list_publishers;
pub use streams::{create_stream, delete_stream, list_streams, stream_urls};
