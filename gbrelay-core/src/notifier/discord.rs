//! Discord incoming-webhook client.

use super::{DeliveryError, Notifier, format::build_message};
use gbrelay_sdk::objects::Order;
use time::OffsetDateTime;
use tracing::debug;
use url::Url;

/// Posts order notifications to a Discord incoming webhook.
#[derive(Debug, Clone)]
pub struct DiscordNotifier {
    http_client: reqwest::Client,
}

impl DiscordNotifier {
    pub fn new() -> Self {
        Self::with_client(
            reqwest::Client::builder()
                .timeout(std::time::Duration::from_secs(30))
                .build()
                .unwrap_or_else(|_| reqwest::Client::new()),
        )
    }

    pub fn with_client(http_client: reqwest::Client) -> Self {
        Self { http_client }
    }
}

impl Default for DiscordNotifier {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait::async_trait]
impl Notifier for DiscordNotifier {
    async fn send(&self, order: &Order, webhook_url: &Url) -> Result<(), DeliveryError> {
        let message = build_message(order, OffsetDateTime::now_utc())?;

        let response = self
            .http_client
            .post(webhook_url.clone())
            .json(&message)
            .send()
            .await?;

        let status = response.status();
        debug!(status = %status, order_id = %order.order_id(), "Discord webhook responded");

        if status.is_success() {
            Ok(())
        } else {
            let body = response.text().await.unwrap_or_default();
            Err(DeliveryError::Rejected {
                status: status.as_u16(),
                body,
            })
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use httpmock::prelude::*;

    fn order() -> Order {
        let mut order = Order::with_id(42_i64);
        order.status = Some("pending".to_owned());
        order
    }

    #[tokio::test]
    async fn test_posts_json_message() {
        let server = MockServer::start_async().await;
        let mock = server
            .mock_async(|when, then| {
                when.method(POST)
                    .path("/api/webhooks/1/token")
                    .header("content-type", "application/json")
                    .json_body_partial(r#"{"username": "GameBoost Bot"}"#);
                then.status(204);
            })
            .await;

        let url = Url::parse(&server.url("/api/webhooks/1/token")).unwrap();
        DiscordNotifier::new().send(&order(), &url).await.unwrap();

        mock.assert_async().await;
    }

    #[tokio::test]
    async fn test_non_success_status_is_rejected() {
        let server = MockServer::start_async().await;
        server
            .mock_async(|when, then| {
                when.method(POST).path("/api/webhooks/1/gone");
                then.status(404).body("Unknown Webhook");
            })
            .await;

        let url = Url::parse(&server.url("/api/webhooks/1/gone")).unwrap();
        let err = DiscordNotifier::new().send(&order(), &url).await.unwrap_err();
        match err {
            DeliveryError::Rejected { status, body } => {
                assert_eq!(status, 404);
                assert_eq!(body, "Unknown Webhook");
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[tokio::test]
    async fn test_unreachable_host_is_request_error() {
        let url = Url::parse("http://127.0.0.1:9/api/webhooks/1/token").unwrap();
        let err = DiscordNotifier::new().send(&order(), &url).await.unwrap_err();
        assert!(matches!(err, DeliveryError::Request(_)));
    }
}
