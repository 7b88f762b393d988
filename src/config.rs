//! Configuration module for the exporter.
//!
//! Provides YAML-based configuration loading and validation for:
//! - Server settings (port, bind address)
//! - Poller settings (poll interval, fetch timeout, endpoint url file)
//!
//! The endpoint url file itself is loaded through [`load_url_file`].

mod app;
mod urls;
mod validation;

pub use app::{AppConfig, PollerConfig, ServerConfig};
pub use urls::load_url_file;
pub use validation::ConfigError;

// Re-export constants
pub use app::{DEFAULT_FETCH_TIMEOUT, DEFAULT_INTERVAL};
