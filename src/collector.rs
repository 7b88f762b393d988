//! Collector Layer
//!
//! Queue metric collection. A fetcher turns one endpoint into a (possibly
//! empty) status document and the renderer turns documents into exposition
//! lines. The poll loop drives both and publishes one concatenated snapshot
//! per cycle.
//!
//! # Architecture
//!
//! - [`QueueFetcher`]: one HTTP GET + JSON decode per endpoint
//! - [`render_queue_stats`]: exposition line rendering
//! - [`QueuePoller`] / [`PollerHandle`]: poll cadence and graceful shutdown
//!
//! # Example
//!
//! ```rust,no_run
//! use std::sync::Arc;
//! use std::time::Duration;
//! use gradle_queue_exporter::collector::{QueueFetcher, QueuePoller};
//! use gradle_queue_exporter::snapshot::SnapshotStore;
//!
//! # fn main() -> Result<(), Box<dyn std::error::Error>> {
//! # tokio::runtime::Runtime::new()?.block_on(async {
//! let snapshots = Arc::new(SnapshotStore::new());
//! let fetcher = QueueFetcher::new(Duration::from_secs(10))?;
//! let poller = QueuePoller::new(
//!     vec!["http://gradle.example.com/queue".to_string()],
//!     fetcher,
//!     Arc::clone(&snapshots),
//!     Duration::from_secs(60),
//! );
//! let handle = poller.spawn();
//! // ... serve snapshots.current() ...
//! handle.shutdown().await;
//! # Ok::<(), Box<dyn std::error::Error>>(())
//! # })
//! # }
//! ```

mod fetcher;
mod poller;
mod render;

pub use fetcher::{QueueFetcher, QueueStats};
pub use poller::{DEFAULT_SHUTDOWN_TIMEOUT, MIN_INTERVAL, PollerHandle, QueuePoller};
pub use render::{METRIC_PREFIX, render_queue_stats};
