//! Watchtower Dashboard Service Library
//!
//! This library provides the HTTP dashboard for an SRT media relay:
//!
//! - Stream identity management (publisher/player key pairs) proxied to
//!   the relay's management API, with server-side key generation
//! - One adaptive poll loop per distinct on-screen publisher, owned by
//!   a [`monitor::MonitorRegistry`]
//! - A JSON card feed (`/api/v1/publishers`) combining liveness, the
//!   stats grid, and the per-card refresh countdown
//! - A background task that keeps the monitored groups converged on
//!   the relay's identity list
//!
//! # Modules
//!
//! - [`config`] - Service configuration from environment
//! - [`errors`] - Error types with appropriate HTTP status codes
//! - [`handlers`] - Axum request handlers
//! - [`observability`] - Health state and Prometheus metrics
//! - [`routes`] - Router construction
//! - [`state`] - Shared application state
//! - [`tasks`] - Background identity synchronization

#![warn(clippy::pedantic)]

pub mod config;
pub mod errors;
pub mod handlers;
pub mod observability;
pub mod routes;
pub mod state;
pub mod tasks;
