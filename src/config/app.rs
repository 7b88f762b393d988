//! Application configuration structures.

use std::net::IpAddr;
use std::path::Path;
use std::time::Duration;

use serde::{Deserialize, Serialize};

use super::validation::ConfigError;

/// Default poll interval (60 seconds).
pub const DEFAULT_INTERVAL: Duration = Duration::from_secs(60);

/// Default per-request fetch timeout (10 seconds).
pub const DEFAULT_FETCH_TIMEOUT: Duration = Duration::from_secs(10);

/// Default endpoint url file path.
pub const DEFAULT_URL_FILE: &str = "urls.txt";

fn default_url_file() -> String {
    DEFAULT_URL_FILE.to_string()
}

// =============================================================================
// Server Configuration
// =============================================================================

/// Web server configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ServerConfig {
    /// Server bind address (default: "0.0.0.0").
    pub bind: String,

    /// Server port (default: 8080).
    pub port: u16,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            bind: "0.0.0.0".to_string(),
            port: 8080,
        }
    }
}

// =============================================================================
// Poller Configuration
// =============================================================================

/// Queue polling configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct PollerConfig {
    /// Time between collection cycles (default: 60s).
    #[serde(with = "humantime_serde")]
    pub interval: Duration,

    /// Per-request timeout for endpoint fetches (default: 10s).
    #[serde(with = "humantime_serde")]
    pub fetch_timeout: Duration,

    /// Path to the endpoint url file, one url per line (default: "urls.txt").
    pub url_file: String,
}

impl Default for PollerConfig {
    fn default() -> Self {
        Self {
            interval: DEFAULT_INTERVAL,
            fetch_timeout: DEFAULT_FETCH_TIMEOUT,
            url_file: default_url_file(),
        }
    }
}

// =============================================================================
// Application Configuration
// =============================================================================

/// Top-level application configuration.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    /// Web server configuration.
    pub server: ServerConfig,

    /// Queue polling configuration.
    pub poller: PollerConfig,
}

impl AppConfig {
    /// Load configuration from a YAML file.
    ///
    /// # Errors
    /// Returns `ConfigError` if the file cannot be read, parsed, or validated.
    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path.as_ref())?;
        let config: Self = serde_yaml::from_str(&content)?;
        config.validate()?;
        Ok(config)
    }

    /// Validate configuration values.
    ///
    /// # Errors
    /// Returns `ConfigError::ValidationError` if any field is invalid.
    pub fn validate(&self) -> Result<(), ConfigError> {
        // Validate server bind address
        self.server.bind.parse::<IpAddr>().map_err(|_| {
            ConfigError::ValidationError(format!(
                "invalid server bind address: '{}'",
                self.server.bind
            ))
        })?;

        // Validate server port
        if self.server.port == 0 {
            return Err(ConfigError::ValidationError(
                "server port must be non-zero".to_string(),
            ));
        }

        // Validate poll interval
        if self.poller.interval.is_zero() {
            return Err(ConfigError::ValidationError(
                "poller interval must be positive".to_string(),
            ));
        }

        // Validate fetch timeout
        if self.poller.fetch_timeout.is_zero() {
            return Err(ConfigError::ValidationError(
                "poller fetch_timeout must be positive".to_string(),
            ));
        }

        // Validate url file path
        if self.poller.url_file.trim().is_empty() {
            return Err(ConfigError::ValidationError(
                "poller url_file cannot be empty".to_string(),
            ));
        }

        Ok(())
    }
}
