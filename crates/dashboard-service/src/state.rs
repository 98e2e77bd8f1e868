//! Shared application state.

use crate::config::Config;
use crate::observability::HealthState;
use common::types::StreamIdentity;
use monitor::MonitorRegistry;
use relay_client::{RelayClient, RelayClientError};
use std::sync::Arc;
use tokio::sync::{Mutex, RwLock};
use tracing::debug;

/// Application state shared across all handlers and background tasks.
pub struct AppState {
    /// Service configuration.
    pub config: Config,

    /// Client for the relay management API.
    pub relay: RelayClient,

    /// The publisher monitors, one per distinct publisher key.
    pub registry: Mutex<MonitorRegistry>,

    /// Cached identity list, refreshed on CRUD and by the sync task.
    pub identities: RwLock<Vec<StreamIdentity>>,

    /// Health state for liveness/readiness probes.
    pub health: HealthState,
}

impl AppState {
    /// Create the application state with an empty registry.
    #[must_use]
    pub fn new(config: Config, relay: RelayClient) -> Arc<Self> {
        let source: Arc<dyn monitor::StatsSource> = Arc::new(relay.clone());
        Arc::new(Self {
            config,
            relay,
            registry: Mutex::new(MonitorRegistry::new(source)),
            identities: RwLock::new(Vec::new()),
            health: HealthState::new(),
        })
    }

    /// Re-fetch the identity list from the relay and converge the
    /// monitor registry on it.
    ///
    /// The first successful refresh marks the service ready.
    ///
    /// # Errors
    ///
    /// Returns the relay client error when the list fetch fails; the
    /// cached list and running monitors are left untouched in that
    /// case.
    pub async fn refresh_identities(&self) -> Result<(), RelayClientError> {
        let identities = self.relay.list_stream_ids().await?;

        let mut registry = self.registry.lock().await;
        registry.sync(&identities).await;
        drop(registry);

        debug!(
            target: "dashboard.state",
            identities = identities.len(),
            "Identity list refreshed"
        );

        *self.identities.write().await = identities;
        self.health.set_ready();
        Ok(())
    }
}
