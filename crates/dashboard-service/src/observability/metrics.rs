//! Metrics recorder initialization.
//!
//! All metrics follow Prometheus naming conventions with a
//! `watchtower_` prefix:
//!
//! - `watchtower_polls_total{result}` - poll outcomes, recorded by the
//!   monitor crate (`result` is bounded to `online`/`offline`)
//! - `watchtower_publisher_groups` - currently monitored groups
//!
//! The rendered text format is served at `GET /metrics`.

use metrics_exporter_prometheus::{PrometheusBuilder, PrometheusHandle};

/// Initialize the global Prometheus metrics recorder and return the
/// handle for serving metrics via HTTP.
///
/// Must be called once, before any metrics are recorded.
///
/// # Errors
///
/// Returns an error if the recorder fails to install (e.g., already
/// installed).
pub fn init_metrics_recorder() -> Result<PrometheusHandle, String> {
    PrometheusBuilder::new()
        .install_recorder()
        .map_err(|e| format!("Failed to install Prometheus metrics recorder: {e}"))
}
