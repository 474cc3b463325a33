//! Axum server setup and router configuration.

use crate::api::webhook;
use crate::shutdown::shutdown_signal;
use crate::state::AppState;
use axum::{
    Json, Router,
    extract::State,
    response::IntoResponse,
    routing::{get, post},
};
use gbrelay_core::config::RelayMode;
use serde::Serialize;
use std::net::SocketAddr;
use tokio::net::TcpListener;

/// Path GameBoost delivers webhooks to.
pub const WEBHOOK_PATH: &str = "/webhook/gameboost";

/// Build the main application router.
///
/// The webhook handler is chosen once from the configured [`RelayMode`].
pub fn build_router(state: AppState) -> Router {
    let webhook_route = match state.mode {
        RelayMode::Strict => post(webhook::receive_strict),
        RelayMode::Lenient => post(webhook::receive_lenient),
    };

    Router::new()
        // Health check endpoint
        .route("/health", get(health_check))
        .route(WEBHOOK_PATH, webhook_route)
        // Add state to all routes
        .with_state(state)
}

/// Health check response.
#[derive(Serialize)]
struct HealthResponse {
    status: &'static str,
    version: &'static str,
    mode: RelayMode,
}

/// Simple health check - returns OK if the server is running.
async fn health_check(State(state): State<AppState>) -> impl IntoResponse {
    Json(HealthResponse {
        status: "healthy",
        version: env!("CARGO_PKG_VERSION"),
        mode: state.mode,
    })
}

/// Run the server with graceful shutdown support.
pub async fn run_server(router: Router, addr: SocketAddr) -> Result<(), std::io::Error> {
    let listener = TcpListener::bind(addr).await?;
    tracing::info!("Server listening on {}", addr);

    axum::serve(listener, router)
        .with_graceful_shutdown(shutdown_signal())
        .await
}
