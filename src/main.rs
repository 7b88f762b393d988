//! Exporter binary entry point.
//!
//! Wires configuration, the background queue poller, and the web server
//! together. Core functionality is provided by the `gradle_queue_exporter`
//! library crate.

use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;

use clap::Parser;
use gradle_queue_exporter::{
    collector::{PollerHandle, QueueFetcher, QueuePoller},
    config::{AppConfig, load_url_file},
    server::{AppState, create_router},
    snapshot::SnapshotStore,
};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

/// Prometheus exporter for the Gradle Enterprise build-ingestion queue.
#[derive(Parser, Debug)]
#[command(name = "gradle-queue-exporter", version, about, long_about = None)]
struct Cli {
    /// Path to configuration file
    #[arg(short, long, env = "APP_CONFIG")]
    config: Option<String>,

    /// Port to be listened (overrides config file)
    #[arg(short, long, env = "APP_PORT")]
    port: Option<u16>,

    /// Time between metric collection cycles (overrides config file)
    #[arg(short = 't', long, env = "APP_CHECK_INTERVAL", value_parser = humantime::parse_duration)]
    interval: Option<Duration>,

    /// Per-request timeout for endpoint fetches (overrides config file)
    #[arg(long, env = "APP_FETCH_TIMEOUT", value_parser = humantime::parse_duration)]
    fetch_timeout: Option<Duration>,

    /// File with endpoint urls, one url per line (overrides config file)
    #[arg(short = 'f', long, env = "APP_URL_FILE")]
    url_file: Option<String>,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Initialize tracing
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "info,gradle_queue_exporter=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    tracing::info!("Gradle build-ingestion queue exporter");

    // Parse CLI arguments
    let cli = Cli::parse();

    // Load configuration from file, if given
    let mut config = match cli.config {
        Some(ref path) => {
            tracing::info!("Loading configuration from: {}", path);
            AppConfig::load(path)?
        }
        None => AppConfig::default(),
    };

    // Apply CLI/env overrides (CLI > ENV > config file)
    if let Some(port) = cli.port {
        config.server.port = port;
    }
    if let Some(interval) = cli.interval {
        config.poller.interval = interval;
    }
    if let Some(fetch_timeout) = cli.fetch_timeout {
        config.poller.fetch_timeout = fetch_timeout;
    }
    if let Some(url_file) = cli.url_file {
        config.poller.url_file = url_file;
    }
    config.validate()?;

    tracing::info!(
        "Server: {}:{}, poll interval: {:?}, url file: {}",
        config.server.bind,
        config.server.port,
        config.poller.interval,
        config.poller.url_file,
    );

    // Load the endpoint list; an empty list is fatal since the exporter
    // could never produce a metric.
    let endpoints = load_url_file(&config.poller.url_file)?;
    tracing::info!(count = endpoints.len(), "Loaded endpoint urls");

    // Shared snapshot state, seeded with the startup sentinel
    let snapshots = Arc::new(SnapshotStore::new());

    // Start the background poller
    let fetcher = QueueFetcher::new(config.poller.fetch_timeout)?;
    let poller = QueuePoller::new(
        endpoints,
        fetcher,
        Arc::clone(&snapshots),
        config.poller.interval,
    );
    let poller_handle = poller.spawn();
    tracing::info!("Queue poller started");

    // Build Axum router
    let app = create_router(AppState { snapshots });

    // Parse bind address
    let addr: SocketAddr = format!("{}:{}", config.server.bind, config.server.port).parse()?;

    tracing::info!("Web server listening on: http://{}", addr);
    tracing::info!("Press Ctrl+C to shutdown");

    // Start server with graceful shutdown
    let listener = tokio::net::TcpListener::bind(addr).await?;

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal(poller_handle))
        .await?;

    tracing::info!("Shutdown complete");
    Ok(())
}

/// Setup graceful shutdown signal handler.
///
/// The poller is joined before the server finishes shutting down, so no
/// orphaned fetch outlives the process.
async fn shutdown_signal(poller: PollerHandle) {
    let ctrl_c = async {
        tokio::signal::ctrl_c()
            .await
            .expect("failed to install Ctrl+C handler");
    };

    #[cfg(unix)]
    let terminate = async {
        tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate())
            .expect("failed to install signal handler")
            .recv()
            .await;
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {
            tracing::info!("Received Ctrl+C signal");
        }
        _ = terminate => {
            tracing::info!("Received terminate signal");
        }
    }

    tracing::info!("Shutting down queue poller...");
    poller.shutdown().await;
}
