//! Order notifications.
//!
//! [`format`] turns an [`Order`] into a Discord message and [`discord`]
//! posts it. The [`Notifier`] trait is the seam the relay sends through.

pub mod discord;
pub mod format;

pub use discord::DiscordNotifier;
pub use format::{build_message, status_color};

use gbrelay_sdk::objects::Order;
use thiserror::Error;
use url::Url;

/// Errors that can occur while delivering a notification.
#[derive(Debug, Error)]
pub enum DeliveryError {
    /// The request never got a response (DNS, TLS, timeout, ...).
    #[error("HTTP request error: {0}")]
    Request(#[from] reqwest::Error),

    /// The webhook answered with a non-2xx status.
    #[error("webhook rejected notification with status {status}: {body}")]
    Rejected { status: u16, body: String },

    #[error("failed to format timestamp: {0}")]
    Timestamp(#[from] time::error::Format),
}

/// Sends an order notification to an outbound webhook.
#[async_trait::async_trait]
pub trait Notifier: Send + Sync {
    async fn send(&self, order: &Order, webhook_url: &Url) -> Result<(), DeliveryError>;
}
