//! HTTP API.
//!
//! # Endpoints
//!
//! - `POST /webhook/gameboost`: receive a GameBoost order webhook
//! - `GET /health`: liveness and relay mode, routed in [`crate::server`]

pub mod extractors;
pub mod webhook;
