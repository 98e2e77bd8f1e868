//! Observability for the dashboard service.
//!
//! - [`health`] - Liveness/readiness state for Kubernetes-style probes
//! - [`metrics`] - Prometheus recorder initialization

pub mod health;
pub mod metrics;

pub use health::HealthState;
pub use metrics::init_metrics_recorder;
