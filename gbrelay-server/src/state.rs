//! Application state shared across all request handlers.

use gbrelay_core::config::{RelayMode, SharedConfig};
use gbrelay_core::events::RelayJobSender;
use gbrelay_core::processors::OrderRelay;

/// Application state that is shared across all request handlers.
///
/// This is cloneable and cheap to pass around (everything is behind Arc).
#[derive(Clone)]
pub struct AppState {
    /// Runtime configuration (sections can be reloaded via SIGHUP).
    pub config: SharedConfig,
    /// Fixed at startup; selects the webhook handler.
    pub mode: RelayMode,
    /// Used directly by the lenient handler.
    pub relay: OrderRelay,
    /// Queue feeding the background relay processor (strict mode).
    pub relay_jobs: RelayJobSender,
}

impl AppState {
    pub fn new(
        config: SharedConfig,
        mode: RelayMode,
        relay: OrderRelay,
        relay_jobs: RelayJobSender,
    ) -> Self {
        Self {
            config,
            mode,
            relay,
            relay_jobs,
        }
    }
}
