//! REST API for a computed simulation.
//!
//! Provides three GET endpoints:
//! - `/state`: configuration, GCR, daily summary and sample count
//! - `/series`: per-minute samples with optional range filtering
//! - `/charts`: the DC power and GHI-versus-crop chart series

mod handlers;
mod types;

use std::io;
use std::net::SocketAddr;
use std::sync::Arc;

use axum::Router;
use axum::routing::get;
use tracing::info;

use crate::sim::types::Simulation;

/// Immutable application state shared across all request handlers.
///
/// Constructed once after the pipeline run completes and wrapped in `Arc`;
/// all data is read-only, so no locks are needed.
pub struct AppState {
    /// The served run.
    pub simulation: Simulation,
}

/// Builds the axum router with all API routes.
pub fn router(state: Arc<AppState>) -> Router {
    Router::new()
        .route("/state", get(handlers::get_state))
        .route("/series", get(handlers::get_series))
        .route("/charts", get(handlers::get_charts))
        .with_state(state)
}

/// Binds to the given address and serves the API until the process exits.
///
/// # Errors
///
/// Returns an `io::Error` if the listener cannot bind or the server fails.
pub async fn serve(state: Arc<AppState>, addr: SocketAddr) -> io::Result<()> {
    let app = router(state);
    let listener = tokio::net::TcpListener::bind(addr).await?;
    info!(%addr, "API server listening");
    axum::serve(listener, app).await
}
