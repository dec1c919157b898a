// src/metrics/server.rs

//! Pull-based HTTP exporter for the gauge registry.

use std::net::SocketAddr;

use axum::Router;
use axum::extract::State;
use axum::http::header;
use axum::response::IntoResponse;
use axum::routing::get;
use tokio::net::TcpListener;
use tokio::task::JoinHandle;
use tracing::{error, info};

use crate::errors::{AnticronError, Result};
use crate::metrics::GaugeRegistry;

const CONTENT_TYPE: &str = "text/plain; version=0.0.4; charset=utf-8";

/// Bind the exporter on all interfaces at `port` (`0` picks a free port).
pub async fn bind(port: u16) -> Result<TcpListener> {
    TcpListener::bind(SocketAddr::from(([0, 0, 0, 0], port)))
        .await
        .map_err(AnticronError::MetricsServer)
}

/// Router serving the registry at `/metrics` and `/`.
pub fn router(registry: GaugeRegistry) -> Router {
    Router::new()
        .route("/", get(metrics))
        .route("/metrics", get(metrics))
        .with_state(registry)
}

/// Serve the exporter in a background task.
pub fn spawn_server(listener: TcpListener, registry: GaugeRegistry) -> JoinHandle<()> {
    let addr = listener.local_addr().ok();
    info!(?addr, "metrics endpoint listening");

    tokio::spawn(async move {
        if let Err(e) = axum::serve(listener, router(registry)).await {
            error!(error = %e, "metrics server stopped");
        }
    })
}

async fn metrics(State(registry): State<GaugeRegistry>) -> impl IntoResponse {
    ([(header::CONTENT_TYPE, CONTENT_TYPE)], registry.render())
}
