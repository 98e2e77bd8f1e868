//! Dashboard service configuration.
//!
//! Configuration is loaded from environment variables. The only
//! required variable is `RELAY_API_URL`; everything else has a
//! sensible default for a single-host deployment.

use common::stream_urls::RelayEndpoints;
use std::collections::HashMap;
use std::env;
use std::time::Duration;
use thiserror::Error;

/// Default HTTP bind address for the dashboard API.
pub const DEFAULT_BIND_ADDRESS: &str = "0.0.0.0:3000";

/// Default public hostname rendered into stream URLs.
pub const DEFAULT_RELAY_PUBLIC_HOST: &str = "localhost";

/// Default SRT port the relay accepts publishers on.
pub const DEFAULT_SRT_SENDER_PORT: u16 = 4001;

/// Default SRT port the relay serves players on.
pub const DEFAULT_SRT_PLAYER_PORT: u16 = 4000;

/// Default cadence of the background identity-list sync.
pub const DEFAULT_IDENTITY_SYNC_INTERVAL_SECONDS: u64 = 30;

/// Default request timeout for calls to the relay management API.
pub const DEFAULT_RELAY_HTTP_TIMEOUT_SECONDS: u64 = 10;

/// Dashboard service configuration.
///
/// Loaded from environment variables with sensible defaults. Nothing
/// here is secret, so the derived Debug output is safe to log.
#[derive(Debug, Clone)]
pub struct Config {
    /// HTTP bind address (default: "0.0.0.0:3000").
    pub bind_address: String,

    /// Base URL of the relay management API (required).
    pub relay_api_url: String,

    /// Hostname rendered into publish/play URLs (default: "localhost").
    pub relay_public_host: String,

    /// SRT port publishers connect to (default: 4001).
    pub srt_sender_port: u16,

    /// SRT port players connect to (default: 4000).
    pub srt_player_port: u16,

    /// Seconds between background identity-list syncs (default: 30).
    pub identity_sync_interval_seconds: u64,

    /// Request timeout for relay API calls in seconds (default: 10).
    pub relay_http_timeout_seconds: u64,
}

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Missing required environment variable: {0}")]
    MissingEnvVar(String),

    #[error("Invalid configuration value: {0}")]
    InvalidValue(String),
}

impl Config {
    /// Load configuration from environment variables.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::MissingEnvVar` if `RELAY_API_URL` is not
    /// set.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_vars(&env::vars().collect())
    }

    /// Load configuration from a `HashMap` (for testing).
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::MissingEnvVar` if `RELAY_API_URL` is not
    /// present in `vars`.
    pub fn from_vars(vars: &HashMap<String, String>) -> Result<Self, ConfigError> {
        let relay_api_url = vars
            .get("RELAY_API_URL")
            .ok_or_else(|| ConfigError::MissingEnvVar("RELAY_API_URL".to_string()))?
            .clone();

        let bind_address = vars
            .get("DASHBOARD_BIND_ADDRESS")
            .cloned()
            .unwrap_or_else(|| DEFAULT_BIND_ADDRESS.to_string());

        let relay_public_host = vars
            .get("RELAY_PUBLIC_HOST")
            .cloned()
            .unwrap_or_else(|| DEFAULT_RELAY_PUBLIC_HOST.to_string());

        let srt_sender_port = vars
            .get("SRT_SENDER_PORT")
            .and_then(|s| s.parse().ok())
            .unwrap_or(DEFAULT_SRT_SENDER_PORT);

        let srt_player_port = vars
            .get("SRT_PLAYER_PORT")
            .and_then(|s| s.parse().ok())
            .unwrap_or(DEFAULT_SRT_PLAYER_PORT);

        let identity_sync_interval_seconds = vars
            .get("IDENTITY_SYNC_INTERVAL_SECONDS")
            .and_then(|s| s.parse().ok())
            .unwrap_or(DEFAULT_IDENTITY_SYNC_INTERVAL_SECONDS);

        let relay_http_timeout_seconds = vars
            .get("RELAY_HTTP_TIMEOUT_SECONDS")
            .and_then(|s| s.parse().ok())
            .unwrap_or(DEFAULT_RELAY_HTTP_TIMEOUT_SECONDS);

        Ok(Config {
            bind_address,
            relay_api_url,
            relay_public_host,
            srt_sender_port,
            srt_player_port,
            identity_sync_interval_seconds,
            relay_http_timeout_seconds,
        })
    }

    /// The SRT endpoints rendered into publish/play URLs.
    #[must_use]
    pub fn relay_endpoints(&self) -> RelayEndpoints {
        RelayEndpoints {
            host: self.relay_public_host.clone(),
            sender_port: self.srt_sender_port,
            player_port: self.srt_player_port,
        }
    }

    /// The identity sync cadence as a `Duration`.
    #[must_use]
    pub fn identity_sync_interval(&self) -> Duration {
        Duration::from_secs(self.identity_sync_interval_seconds)
    }

    /// The relay HTTP timeout as a `Duration`.
    #[must_use]
    pub fn relay_http_timeout(&self) -> Duration {
        Duration::from_secs(self.relay_http_timeout_seconds)
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used)]
mod tests {
    use super::*;

    fn base_vars() -> HashMap<String, String> {
        HashMap::from([(
            "RELAY_API_URL".to_string(),
            "http://localhost:8080".to_string(),
        )])
    }

    #[test]
    fn test_from_vars_success_with_defaults() {
        let vars = base_vars();

        let config = Config::from_vars(&vars).expect("Config should load successfully");

        assert_eq!(config.relay_api_url, "http://localhost:8080");
        assert_eq!(config.bind_address, DEFAULT_BIND_ADDRESS);
        assert_eq!(config.relay_public_host, DEFAULT_RELAY_PUBLIC_HOST);
        assert_eq!(config.srt_sender_port, DEFAULT_SRT_SENDER_PORT);
        assert_eq!(config.srt_player_port, DEFAULT_SRT_PLAYER_PORT);
        assert_eq!(
            config.identity_sync_interval_seconds,
            DEFAULT_IDENTITY_SYNC_INTERVAL_SECONDS
        );
        assert_eq!(
            config.relay_http_timeout_seconds,
            DEFAULT_RELAY_HTTP_TIMEOUT_SECONDS
        );
    }

    #[test]
    fn test_from_vars_success_with_custom_values() {
        let mut vars = base_vars();
        vars.insert(
            "DASHBOARD_BIND_ADDRESS".to_string(),
            "127.0.0.1:3001".to_string(),
        );
        vars.insert("RELAY_PUBLIC_HOST".to_string(), "relay.example.com".to_string());
        vars.insert("SRT_SENDER_PORT".to_string(), "5001".to_string());
        vars.insert("SRT_PLAYER_PORT".to_string(), "5000".to_string());
        vars.insert("IDENTITY_SYNC_INTERVAL_SECONDS".to_string(), "5".to_string());
        vars.insert("RELAY_HTTP_TIMEOUT_SECONDS".to_string(), "2".to_string());

        let config = Config::from_vars(&vars).expect("Config should load successfully");

        assert_eq!(config.bind_address, "127.0.0.1:3001");
        assert_eq!(config.relay_public_host, "relay.example.com");
        assert_eq!(config.srt_sender_port, 5001);
        assert_eq!(config.srt_player_port, 5000);
        assert_eq!(config.identity_sync_interval_seconds, 5);
        assert_eq!(config.relay_http_timeout_seconds, 2);
    }

    #[test]
    fn test_from_vars_missing_relay_api_url() {
        let vars = HashMap::new();

        let result = Config::from_vars(&vars);
        assert!(matches!(result, Err(ConfigError::MissingEnvVar(v)) if v == "RELAY_API_URL"));
    }

    #[test]
    fn test_relay_endpoints_from_config() {
        let mut vars = base_vars();
        vars.insert("RELAY_PUBLIC_HOST".to_string(), "relay.example.com".to_string());

        let config = Config::from_vars(&vars).expect("Config should load successfully");
        let endpoints = config.relay_endpoints();

        assert_eq!(endpoints.host, "relay.example.com");
        assert_eq!(endpoints.sender_port, DEFAULT_SRT_SENDER_PORT);
        assert_eq!(endpoints.player_port, DEFAULT_SRT_PLAYER_PORT);
    }

    #[test]
    fn test_unparsable_port_falls_back_to_default() {
        let mut vars = base_vars();
        vars.insert("SRT_SENDER_PORT".to_string(), "not-a-port".to_string());

        let config = Config::from_vars(&vars).expect("Config should load successfully");
        assert_eq!(config.srt_sender_port, DEFAULT_SRT_SENDER_PORT);
    }
}
