//! Queue status fetching.
//!
//! One HTTP GET per endpoint per cycle. Any failure (non-200 status,
//! transport error, timeout, undecodable body) degrades to an empty
//! document for that endpoint and is reported through the log, so a single
//! unreachable endpoint cannot abort a collection cycle. The next cycle is
//! the retry mechanism.

use std::time::Duration;

use reqwest::{Client, StatusCode};

use crate::config::ConfigError;

/// Queue status document as decoded from an endpoint response, keyed by
/// metric name in document order.
///
/// An empty document means "no data obtained this cycle": either the queue
/// reported nothing or the fetch failed. Callers cannot tell the two apart.
pub type QueueStats = serde_json::Map<String, serde_json::Value>;

/// Fetches queue status documents from Gradle server endpoints.
///
/// Holds one shared HTTP client; requests are bounded by the configured
/// timeout so an unreachable endpoint delays a cycle by at most that long.
#[derive(Debug, Clone)]
pub struct QueueFetcher {
    client: Client,
}

impl QueueFetcher {
    /// Create a fetcher whose requests are bounded by `timeout`.
    ///
    /// # Errors
    /// Returns `ConfigError` if the HTTP client cannot be built.
    pub fn new(timeout: Duration) -> Result<Self, ConfigError> {
        let client = Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| {
                ConfigError::ValidationError(format!("failed to build HTTP client: {}", e))
            })?;

        Ok(Self { client })
    }

    /// Fetch one endpoint's queue status document.
    ///
    /// Always returns a (possibly empty) document, never an error.
    pub async fn fetch(&self, url: &str) -> QueueStats {
        tracing::info!(url = %url, "Requesting Gradle url");

        let response = match self.client.get(url).send().await {
            Ok(response) => response,
            Err(e) => {
                tracing::error!(url = %url, error = %e, "Connection error to Gradle url");
                return QueueStats::new();
            }
        };

        let status = response.status();
        if status != StatusCode::OK {
            tracing::error!(url = %url, status = %status, "Cannot request Gradle url");
            return QueueStats::new();
        }

        match response.json::<QueueStats>().await {
            Ok(stats) => stats,
            Err(e) => {
                tracing::error!(url = %url, error = %e, "Undecodable queue status body");
                QueueStats::new()
            }
        }
    }
}
