//! Collection loop and lifecycle.
//!
//! One background task owns the polling cadence: every cycle fetches each
//! configured endpoint in order, renders the results, and publishes the
//! concatenated snapshot atomically. A shutdown signal abandons any
//! in-flight cycle, so a partial snapshot is never published.

use std::sync::Arc;
use std::time::Duration;

use tokio::sync::watch;
use tokio::task::JoinHandle;
use tokio::time::MissedTickBehavior;

use crate::collector::{QueueFetcher, render_queue_stats};
use crate::snapshot::SnapshotStore;

/// Default timeout for graceful shutdown (5 seconds).
pub const DEFAULT_SHUTDOWN_TIMEOUT: Duration = Duration::from_secs(5);

/// Minimum allowed poll interval (1 second).
pub const MIN_INTERVAL: Duration = Duration::from_secs(1);

/// Periodically collects queue metrics from every configured endpoint.
///
/// The endpoint list is fixed at construction; no cycle mutates it.
pub struct QueuePoller {
    endpoints: Vec<String>,
    fetcher: QueueFetcher,
    snapshots: Arc<SnapshotStore>,
    interval: Duration,
}

impl QueuePoller {
    /// Create a poller over a fixed endpoint list.
    ///
    /// The interval is clamped to a minimum of 1 second.
    pub fn new(
        endpoints: Vec<String>,
        fetcher: QueueFetcher,
        snapshots: Arc<SnapshotStore>,
        interval: Duration,
    ) -> Self {
        let interval = if interval < MIN_INTERVAL {
            tracing::warn!(min_interval = ?MIN_INTERVAL,
                "Poll interval is less than minimum allowed. Using minimum duration."
            );
            MIN_INTERVAL
        } else {
            interval
        };

        Self {
            endpoints,
            fetcher,
            snapshots,
            interval,
        }
    }

    /// Run one collection cycle over every endpoint, in order.
    ///
    /// The returned buffer is the next snapshot; endpoints that failed this
    /// cycle contribute nothing to it.
    pub async fn collect_cycle(&self) -> String {
        let mut snapshot = String::new();
        for url in &self.endpoints {
            let stats = self.fetcher.fetch(url).await;
            snapshot.push_str(&render_queue_stats(&stats, url));
        }
        snapshot
    }

    /// Spawn the background collection task.
    ///
    /// The first cycle starts immediately; subsequent cycles run once per
    /// interval. The returned handle signals and joins the task on shutdown.
    pub fn spawn(self) -> PollerHandle {
        let (shutdown_tx, mut shutdown_rx) = watch::channel(false);

        let task = tokio::spawn(async move {
            let mut ticker = tokio::time::interval(self.interval);
            ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);

            loop {
                tokio::select! {
                    _ = shutdown_rx.changed() => break,
                    _ = ticker.tick() => {}
                }

                tokio::select! {
                    // Abandon the in-flight cycle; never publish a partial one.
                    _ = shutdown_rx.changed() => break,
                    snapshot = self.collect_cycle() => {
                        tracing::debug!(
                            endpoints = self.endpoints.len(),
                            bytes = snapshot.len(),
                            "Publishing snapshot"
                        );
                        self.snapshots.publish(snapshot);
                    }
                }
            }

            tracing::info!("Queue poller stopped");
        });

        PollerHandle {
            shutdown: shutdown_tx,
            task,
        }
    }
}

impl std::fmt::Debug for QueuePoller {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("QueuePoller")
            .field("endpoints", &self.endpoints)
            .field("interval", &self.interval)
            .finish_non_exhaustive()
    }
}

/// Handle for stopping the background collection task.
///
/// Dropping the handle without calling [`PollerHandle::shutdown`] also stops
/// the task, but without waiting for it to finish.
#[derive(Debug)]
pub struct PollerHandle {
    shutdown: watch::Sender<bool>,
    task: JoinHandle<()>,
}

impl PollerHandle {
    /// Signal the poller and wait for it to stop, with the default timeout.
    pub async fn shutdown(self) {
        self.shutdown_with_timeout(DEFAULT_SHUTDOWN_TIMEOUT).await;
    }

    /// Signal the poller and wait for it to stop, aborting on timeout.
    pub async fn shutdown_with_timeout(mut self, timeout: Duration) {
        let _ = self.shutdown.send(true);

        match tokio::time::timeout(timeout, &mut self.task).await {
            Ok(Ok(())) => tracing::info!("Queue poller shutdown complete"),
            Ok(Err(e)) => tracing::error!(error = %e, "Queue poller task failed"),
            Err(_) => {
                tracing::warn!("Queue poller shutdown timed out; aborting task");
                self.task.abort();
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::snapshot::INITIAL_SNAPSHOT;
    use wiremock::matchers::{method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    async fn queue_server(status: u16, body: &str) -> MockServer {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/queue"))
            .respond_with(ResponseTemplate::new(status).set_body_raw(body, "application/json"))
            .mount(&server)
            .await;
        server
    }

    fn poller(endpoints: Vec<String>, snapshots: Arc<SnapshotStore>) -> QueuePoller {
        let fetcher = QueueFetcher::new(Duration::from_secs(2)).unwrap();
        QueuePoller::new(endpoints, fetcher, snapshots, Duration::from_secs(60))
    }

    #[tokio::test]
    async fn test_cycle_skips_failing_endpoint() {
        let healthy = queue_server(200, r#"{"pending": 1}"#).await;
        let failing = queue_server(500, "").await;

        let healthy_url = format!("{}/queue", healthy.uri());
        let failing_url = format!("{}/queue", failing.uri());

        let snapshots = Arc::new(SnapshotStore::new());
        let poller = poller(
            vec![healthy_url.clone(), failing_url],
            Arc::clone(&snapshots),
        );

        let snapshot = poller.collect_cycle().await;
        assert_eq!(
            snapshot,
            format!("gradle_ingest_queue_pending{{url=\"{}\"}} 1\n", healthy_url)
        );
    }

    #[tokio::test]
    async fn test_cycle_concatenates_in_endpoint_order() {
        let first = queue_server(200, r#"{"pending": 1}"#).await;
        let second = queue_server(200, r#"{"pending": 2}"#).await;

        let first_url = format!("{}/queue", first.uri());
        let second_url = format!("{}/queue", second.uri());

        let snapshots = Arc::new(SnapshotStore::new());
        let poller = poller(
            vec![first_url.clone(), second_url.clone()],
            Arc::clone(&snapshots),
        );

        let snapshot = poller.collect_cycle().await;
        assert_eq!(
            snapshot,
            format!(
                "gradle_ingest_queue_pending{{url=\"{}\"}} 1\ngradle_ingest_queue_pending{{url=\"{}\"}} 2\n",
                first_url, second_url
            )
        );
    }

    #[tokio::test]
    async fn test_first_cycle_publishes_immediately() {
        let server = queue_server(200, r#"{"pending": 7}"#).await;
        let url = format!("{}/queue", server.uri());

        let snapshots = Arc::new(SnapshotStore::new());
        // 60s interval: only the immediate first cycle can publish in time.
        let handle = poller(vec![url.clone()], Arc::clone(&snapshots)).spawn();

        tokio::time::sleep(Duration::from_millis(300)).await;
        assert_eq!(
            snapshots.current().as_str(),
            format!("gradle_ingest_queue_pending{{url=\"{}\"}} 7\n", url)
        );

        handle.shutdown().await;
    }

    #[tokio::test]
    async fn test_shutdown_joins_task() {
        let server = queue_server(200, r#"{"pending": 0}"#).await;
        let url = format!("{}/queue", server.uri());

        let snapshots = Arc::new(SnapshotStore::new());
        let handle = poller(vec![url], Arc::clone(&snapshots)).spawn();

        // Completes well within the shutdown timeout or the test would hang.
        handle.shutdown().await;
    }

    #[tokio::test]
    async fn test_all_endpoints_failing_publishes_empty_snapshot() {
        let failing = queue_server(503, "").await;
        let url = format!("{}/queue", failing.uri());

        let snapshots = Arc::new(SnapshotStore::new());
        let handle = poller(vec![url], Arc::clone(&snapshots)).spawn();

        tokio::time::sleep(Duration::from_millis(300)).await;
        // A completed cycle replaces the sentinel even when nothing was fetched.
        assert_ne!(snapshots.current().as_str(), INITIAL_SNAPSHOT);
        assert_eq!(snapshots.current().as_str(), "");

        handle.shutdown().await;
    }

    #[test]
    fn test_interval_clamped_to_minimum() {
        let snapshots = Arc::new(SnapshotStore::new());
        let fetcher = QueueFetcher::new(Duration::from_secs(1)).unwrap();
        let poller = QueuePoller::new(
            vec!["http://gradle.example.com/queue".to_string()],
            fetcher,
            snapshots,
            Duration::from_millis(100),
        );

        assert_eq!(poller.interval, MIN_INTERVAL);
    }
}
