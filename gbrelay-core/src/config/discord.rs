//! Discord configuration.

use url::Url;

/// Outbound Discord incoming-webhook target.
#[derive(Debug, Clone)]
pub struct DiscordConfig {
    pub webhook_url: Url,
}

impl DiscordConfig {
    pub fn new(webhook_url: Url) -> Self {
        Self { webhook_url }
    }
}
