//! TOML file configuration structures.
//!
//! These structs directly map to the `gbrelay.toml` file format. Every
//! field is optional because environment variables can supply it instead.

use gbrelay_core::config::RelayMode;
use serde::{Deserialize, Serialize};
use std::net::SocketAddr;

/// Root configuration structure as read from the TOML file.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct FileConfig {
    #[serde(default)]
    pub server: ServerConfig,
    #[serde(default)]
    pub gameboost: GameBoostConfig,
    #[serde(default)]
    pub discord: DiscordConfig,
}

/// Server configuration section.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ServerConfig {
    /// The address and port to listen on (e.g., "0.0.0.0:5000").
    pub listen: Option<SocketAddr>,
    pub mode: Option<RelayMode>,
}

/// GameBoost section: inbound authentication.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct GameBoostConfig {
    /// Shared HMAC secret.
    pub secret: Option<String>,
    /// Skip signature verification.
    #[serde(default)]
    pub test_mode: bool,
}

/// Discord section: outbound notification target.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct DiscordConfig {
    pub webhook_url: Option<String>,
}
