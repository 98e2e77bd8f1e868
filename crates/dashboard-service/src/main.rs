//! Watchtower Dashboard Service
//!
//! HTTP dashboard for an SRT media relay: stream identity management
//! plus live per-publisher transport statistics with adaptive polling.
//!
//! # Startup Flow
//!
//! 1. Load configuration from environment
//! 2. Initialize Prometheus metrics recorder
//! 3. Build the relay management API client
//! 4. Attempt the initial identity load (readiness flips on the first
//!    success; a failure here is retried by the sync task)
//! 5. Spawn the identity sync background task
//! 6. Serve the HTTP API until SIGINT/SIGTERM
//! 7. On shutdown: cancel background tasks, stop every publisher
//!    monitor, exit

#![warn(clippy::pedantic)]

use dashboard_service::config::Config;
use dashboard_service::observability::init_metrics_recorder;
use dashboard_service::routes::build_routes;
use dashboard_service::state::AppState;
use dashboard_service::tasks::start_identity_sync;
use relay_client::RelayClient;
use tokio::signal;
use tokio_util::sync::CancellationToken;
use tracing::{error, info, warn};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Initialize tracing
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "dashboard_service=debug,monitor=debug,tower_http=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    info!("Starting Watchtower dashboard service");

    // Load configuration
    let config = Config::from_env().map_err(|e| {
        error!("Failed to load configuration: {}", e);
        e
    })?;

    info!(
        bind_address = %config.bind_address,
        relay_api_url = %config.relay_api_url,
        relay_public_host = %config.relay_public_host,
        srt_sender_port = config.srt_sender_port,
        srt_player_port = config.srt_player_port,
        identity_sync_interval_seconds = config.identity_sync_interval_seconds,
        "Configuration loaded successfully"
    );

    // Initialize Prometheus metrics recorder before any metrics are
    // recorded
    let metrics_handle = init_metrics_recorder().map_err(|e| {
        error!(error = %e, "Failed to install Prometheus metrics recorder");
        e
    })?;
    info!("Prometheus metrics recorder initialized");

    // Build the relay client and application state
    let relay = RelayClient::new(config.relay_api_url.clone(), config.relay_http_timeout())
        .map_err(|e| {
            error!(error = %e, "Failed to build relay client");
            e
        })?;
    let state = AppState::new(config.clone(), relay);

    // Initial identity load. Not fatal: the service starts not-ready
    // and the sync task keeps retrying until the relay answers.
    match state.refresh_identities().await {
        Ok(()) => info!("Initial identity list loaded"),
        Err(e) => warn!(
            error = %e,
            "Initial identity load failed; will retry in the background"
        ),
    }

    // Spawn the identity sync task with a child cancellation token
    let shutdown_token = CancellationToken::new();
    let sync_task = tokio::spawn(start_identity_sync(
        state.clone(),
        config.identity_sync_interval(),
        shutdown_token.child_token(),
    ));

    // Serve the HTTP API
    let app = build_routes(state.clone(), metrics_handle);
    let listener = tokio::net::TcpListener::bind(&config.bind_address)
        .await
        .map_err(|e| {
            error!(bind_address = %config.bind_address, error = %e, "Failed to bind");
            e
        })?;
    info!(bind_address = %config.bind_address, "Dashboard API listening");

    let serve_token = shutdown_token.clone();
    axum::serve(listener, app)
        .with_graceful_shutdown(async move {
            shutdown_signal().await;
            serve_token.cancel();
        })
        .await?;

    // Drain: stop background work and every publisher monitor so no
    // timer fires into the torn-down service
    info!("Shutting down");
    state.health.set_not_ready();
    shutdown_token.cancel();
    let _ = sync_task.await;
    state.registry.lock().await.shutdown().await;
    info!("Shutdown complete");

    Ok(())
}

/// Wait for SIGINT or SIGTERM.
async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = signal::ctrl_c().await {
            error!(error = %e, "Failed to install SIGINT handler");
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match signal::unix::signal(signal::unix::SignalKind::terminate()) {
            Ok(mut stream) => {
                stream.recv().await;
            }
            Err(e) => error!(error = %e, "Failed to install SIGTERM handler"),
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        () = ctrl_c => info!("Received SIGINT"),
        () = terminate => info!("Received SIGTERM"),
    }
}
