//! Configuration types for the order relay.
//!
//! These types represent the validated runtime configuration used by the
//! server. The actual config loading/parsing is handled by the server crate.

mod discord;
mod gameboost;
mod server;

pub use discord::DiscordConfig;
pub use gameboost::GameBoostConfig;
pub use server::{RelayMode, ServerConfig, UnknownRelayMode};

use std::sync::Arc;
use tokio::sync::RwLock;

/// Shared configuration state with separate locks for each section.
///
/// The `gameboost` and `discord` sections are swapped on reload; `server`
/// is fixed once the listener is bound.
#[derive(Clone)]
pub struct SharedConfig {
    /// Listen address and relay mode.
    pub server: Arc<RwLock<ServerConfig>>,
    /// Inbound authentication (shared secret, test mode).
    pub gameboost: Arc<RwLock<GameBoostConfig>>,
    /// Outbound notification target.
    pub discord: Arc<RwLock<DiscordConfig>>,
}

impl SharedConfig {
    pub fn new(server: ServerConfig, gameboost: GameBoostConfig, discord: DiscordConfig) -> Self {
        Self {
            server: Arc::new(RwLock::new(server)),
            gameboost: Arc::new(RwLock::new(gameboost)),
            discord: Arc::new(RwLock::new(discord)),
        }
    }
}
