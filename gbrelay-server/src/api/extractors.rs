//! Custom Axum extractors for GameBoost deliveries.
//!
//! Provides:
//! - `VerifiedDelivery`: checks the `User-Agent` and the HMAC signature
//!   before parsing the body (strict mode).
//! - `UnverifiedDelivery`: parses the body without any checks (lenient mode).
//!
//! All cryptographic operations are delegated to [`gbrelay_sdk::signature`].

use axum::{
    extract::{FromRequest, Request},
    http::{HeaderMap, StatusCode, header::USER_AGENT},
    response::{IntoResponse, Response},
};
use gbrelay_sdk::objects::OrderEvent;
use gbrelay_sdk::signature::{GAMEBOOST_USER_AGENT, SIGNATURE_HEADERS};

use crate::state::AppState;

/// Largest request body accepted from GameBoost.
const MAX_BODY_BYTES: usize = 1024 * 1024;

/// Errors that can occur while extracting a delivery.
#[derive(Debug, thiserror::Error)]
pub enum DeliveryRejection {
    #[error("unexpected User-Agent")]
    InvalidUserAgent,
    #[error("signature verification failed")]
    InvalidSignature,
    #[error("failed to read request body")]
    BodyReadError,
    #[error("invalid JSON body: {0}")]
    JsonError(#[from] serde_json::Error),
}

impl IntoResponse for DeliveryRejection {
    fn into_response(self) -> Response {
        match self {
            DeliveryRejection::InvalidUserAgent | DeliveryRejection::InvalidSignature => {
                StatusCode::UNAUTHORIZED.into_response()
            }
            DeliveryRejection::BodyReadError => {
                (StatusCode::BAD_REQUEST, "failed to read request body").into_response()
            }
            DeliveryRejection::JsonError(_) => {
                (StatusCode::BAD_REQUEST, "invalid JSON body").into_response()
            }
        }
    }
}

/// The first signature header present, in [`SIGNATURE_HEADERS`] order.
fn signature_header(headers: &HeaderMap) -> Option<String> {
    SIGNATURE_HEADERS
        .iter()
        .find_map(|name| headers.get(*name))
        .and_then(|value| value.to_str().ok())
        .map(str::to_owned)
}

async fn read_body(req: Request) -> Result<axum::body::Bytes, DeliveryRejection> {
    axum::body::to_bytes(req.into_body(), MAX_BODY_BYTES)
        .await
        .map_err(|_| DeliveryRejection::BodyReadError)
}

/// An Axum extractor that authenticates a GameBoost delivery.
///
/// The `User-Agent` must be exactly `GameBoost Server`; otherwise the
/// request is rejected before the body is read. The signature is then
/// checked against the raw body bytes:
///
/// ```text
/// signature: {hex(HMAC-SHA256(raw_body, gameboost_secret))}
/// ```
pub struct VerifiedDelivery(pub OrderEvent);

impl FromRequest<AppState> for VerifiedDelivery {
    type Rejection = DeliveryRejection;

    async fn from_request(req: Request, state: &AppState) -> Result<Self, Self::Rejection> {
        let user_agent = req
            .headers()
            .get(USER_AGENT)
            .and_then(|value| value.to_str().ok());
        if user_agent != Some(GAMEBOOST_USER_AGENT) {
            tracing::warn!(user_agent = ?user_agent, "Invalid User-Agent");
            return Err(DeliveryRejection::InvalidUserAgent);
        }

        let signature = signature_header(req.headers());
        let body = read_body(req).await?;

        let gameboost = state.config.gameboost.read().await;
        let verified = gameboost.verify(&body, signature.as_deref());
        drop(gameboost);

        if let Err(e) = verified {
            tracing::warn!(error = %e, "Invalid signature");
            return Err(DeliveryRejection::InvalidSignature);
        }

        Ok(VerifiedDelivery(serde_json::from_slice(&body)?))
    }
}

/// An Axum extractor that parses a delivery without authenticating it.
pub struct UnverifiedDelivery(pub OrderEvent);

impl<S: Send + Sync> FromRequest<S> for UnverifiedDelivery {
    type Rejection = DeliveryRejection;

    async fn from_request(req: Request, _state: &S) -> Result<Self, Self::Rejection> {
        let body = read_body(req).await?;
        Ok(UnverifiedDelivery(serde_json::from_slice(&body)?))
    }
}
