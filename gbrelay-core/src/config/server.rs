//! Server configuration.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::net::SocketAddr;
use std::str::FromStr;

/// How the webhook endpoint treats incoming deliveries.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RelayMode {
    /// Authenticate, acknowledge immediately, dedupe and deliver in the background.
    #[default]
    Strict,
    /// No authentication or dedup; deliver before replying.
    Lenient,
}

impl RelayMode {
    /// Port used when none is configured.
    pub fn default_port(self) -> u16 {
        match self {
            RelayMode::Strict => 5000,
            RelayMode::Lenient => 3000,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            RelayMode::Strict => "strict",
            RelayMode::Lenient => "lenient",
        }
    }
}

impl fmt::Display for RelayMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, thiserror::Error)]
#[error("unknown relay mode `{0}` (expected `strict` or `lenient`)")]
pub struct UnknownRelayMode(String);

impl FromStr for RelayMode {
    type Err = UnknownRelayMode;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "strict" => Ok(RelayMode::Strict),
            "lenient" => Ok(RelayMode::Lenient),
            _ => Err(UnknownRelayMode(s.to_owned())),
        }
    }
}

/// Server configuration with runtime values.
#[derive(Debug, Clone)]
pub struct ServerConfig {
    /// The address and port to listen on.
    pub listen: SocketAddr,
    pub mode: RelayMode,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_mode_parsing() {
        assert_eq!("strict".parse::<RelayMode>().unwrap(), RelayMode::Strict);
        assert_eq!(" Lenient ".parse::<RelayMode>().unwrap(), RelayMode::Lenient);
        assert!("loose".parse::<RelayMode>().is_err());
    }

    #[test]
    fn test_default_ports() {
        assert_eq!(RelayMode::Strict.default_port(), 5000);
        assert_eq!(RelayMode::Lenient.default_port(), 3000);
        assert_eq!(RelayMode::default(), RelayMode::Strict);
    }
}
