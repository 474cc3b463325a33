//! GameBoost webhook handlers.
//!
//! Strict mode authenticates the delivery, acknowledges it straight away
//! and leaves dedup and the Discord call to the background relay
//! processor. GameBoost only sees `401` or `200 {"received": true}`.
//!
//! Lenient mode does no authentication or dedup and sends the notification
//! before answering: `200` sent, `204` event not relayed, `500` delivery failed.

use axum::{Json, extract::State, http::StatusCode, response::IntoResponse};
use gbrelay_core::events::RelayJob;
use gbrelay_core::processors::RelayOutcome;
use serde::Serialize;

use crate::api::extractors::{UnverifiedDelivery, VerifiedDelivery};
use crate::state::AppState;

/// Acknowledgement body for accepted deliveries.
#[derive(Debug, Serialize)]
pub struct Ack {
    pub received: bool,
}

/// `POST /webhook/gameboost` in strict mode.
pub async fn receive_strict(
    State(state): State<AppState>,
    VerifiedDelivery(event): VerifiedDelivery,
) -> impl IntoResponse {
    let webhook_id = event.webhook_id();

    match state.relay_jobs.send(RelayJob::new(event)).await {
        Ok(()) => tracing::debug!(%webhook_id, "Queued relay job"),
        Err(e) => tracing::error!(%webhook_id, error = %e, "Failed to queue relay job"),
    }

    (StatusCode::OK, Json(Ack { received: true }))
}

/// `POST /webhook/gameboost` in lenient mode.
pub async fn receive_lenient(
    State(state): State<AppState>,
    UnverifiedDelivery(event): UnverifiedDelivery,
) -> StatusCode {
    match state.relay.relay_direct(&event).await {
        RelayOutcome::Processed | RelayOutcome::Deduped => StatusCode::OK,
        RelayOutcome::Ignored => StatusCode::NO_CONTENT,
        RelayOutcome::Failed(_) => StatusCode::INTERNAL_SERVER_ERROR,
    }
}
