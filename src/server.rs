//! Web server module for the exporter.
//!
//! Serves the published snapshot on `/metrics`, plus liveness/readiness
//! probes and a minimal index page. Handlers only read already-published
//! state; they never trigger or wait on a collection cycle.

use std::sync::Arc;

use axum::{
    Json, Router,
    extract::State,
    http::{StatusCode, header},
    response::{Html, IntoResponse, Response},
    routing::get,
};
use serde::Serialize;
use tower_http::{
    cors::CorsLayer,
    trace::{DefaultMakeSpan, TraceLayer},
};

use crate::snapshot::{INITIAL_SNAPSHOT, SnapshotStore};

/// Shared application state.
#[derive(Clone)]
pub struct AppState {
    pub snapshots: Arc<SnapshotStore>,
}

/// Health check response.
#[derive(Serialize)]
struct HealthResponse {
    status: String,
}

/// Create the Axum router with all routes.
pub fn create_router(state: AppState) -> Router {
    let app_state = Arc::new(state);

    Router::new()
        .route("/", get(index_handler))
        .route("/healthz", get(healthz_handler))
        .route("/readyz", get(readyz_handler))
        .route("/metrics", get(metrics_handler))
        .layer(TraceLayer::new_for_http().make_span_with(DefaultMakeSpan::default()))
        .layer(CorsLayer::permissive())
        .with_state(app_state)
}

/// Index page pointing at the metrics endpoint.
async fn index_handler() -> Html<&'static str> {
    Html(
        "<html><head><title>Gradle queue exporter</title></head>\
         <body><h1>Gradle queue exporter</h1>\
         <p><a href=\"/metrics\">metrics</a></p></body></html>",
    )
}

/// Liveness probe.
async fn healthz_handler() -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "ok".to_string(),
    })
}

/// Readiness probe: ready once a first collection cycle has published.
async fn readyz_handler(State(state): State<Arc<AppState>>) -> Response {
    if state.snapshots.current().as_str() == INITIAL_SNAPSHOT {
        (
            StatusCode::SERVICE_UNAVAILABLE,
            Json(HealthResponse {
                status: "not_ready".to_string(),
            }),
        )
            .into_response()
    } else {
        Json(HealthResponse {
            status: "ok".to_string(),
        })
        .into_response()
    }
}

/// Serve the current snapshot verbatim.
async fn metrics_handler(State(state): State<Arc<AppState>>) -> Response {
    let snapshot = state.snapshots.current();
    (
        [(header::CONTENT_TYPE, "text/plain; charset=utf-8")],
        snapshot.as_str().to_owned(),
    )
        .into_response()
}
