//! Gradle build-ingestion queue exporter.
//!
//! Polls a set of Gradle Enterprise servers for their build-ingestion queue
//! status documents and re-exposes the most recently fetched values in
//! Prometheus exposition format. One process runs the collection loop and
//! the read-only serving endpoint concurrently.
//!
//! # Architecture
//!
//! - **Config**: YAML file with CLI/env overrides, endpoint url file loading
//! - **Collector**: per-endpoint HTTP fetch, exposition rendering, poll loop
//! - **Snapshot**: atomic publication of the latest rendered snapshot
//! - **Server**: read-only Axum endpoints serving the published snapshot
//!
//! The crate can be used as a library (see [`collector::QueuePoller`] and
//! [`server::create_router`]) or run as the `gradle-queue-exporter` binary.

pub mod collector;
pub mod config;
pub mod server;
pub mod snapshot;

pub use collector::{PollerHandle, QueueFetcher, QueuePoller, QueueStats, render_queue_stats};
pub use config::{AppConfig, ConfigError, PollerConfig, ServerConfig, load_url_file};
pub use snapshot::{INITIAL_SNAPSHOT, SnapshotStore};
