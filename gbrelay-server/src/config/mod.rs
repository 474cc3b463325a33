//! Configuration module for gbrelay-server.
//!
//! Configuration is layered, later sources winning:
//! 1. the optional TOML file
//! 2. environment variables (`DISCORD_WEBHOOK_URL`, `GAMEBOOST_SECRET`,
//!    `TEST_MODE`, `PORT`, `RELAY_MODE`)
//! 3. command-line overrides

pub mod file;

use crate::config::file::FileConfig;
use gbrelay_core::config::{
    DiscordConfig, GameBoostConfig, RelayMode, ServerConfig, SharedConfig, UnknownRelayMode,
};
use std::net::{IpAddr, Ipv4Addr, SocketAddr};
use std::path::{Path, PathBuf};
use thiserror::Error;
use url::Url;

pub const ENV_WEBHOOK_URL: &str = "DISCORD_WEBHOOK_URL";
pub const ENV_SECRET: &str = "GAMEBOOST_SECRET";
pub const ENV_TEST_MODE: &str = "TEST_MODE";
pub const ENV_PORT: &str = "PORT";
pub const ENV_MODE: &str = "RELAY_MODE";

const DEFAULT_HOST: IpAddr = IpAddr::V4(Ipv4Addr::UNSPECIFIED);

/// Errors that can occur during configuration loading.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read config file: {0}")]
    IoError(#[from] std::io::Error),

    #[error("failed to parse config file: {0}")]
    ParseError(#[from] toml::de::Error),

    #[error("invalid PORT value `{0}`")]
    InvalidPort(String),

    #[error(transparent)]
    InvalidMode(#[from] UnknownRelayMode),

    #[error("DISCORD_WEBHOOK_URL is not set")]
    MissingWebhookUrl,

    #[error("invalid Discord webhook URL: {0}")]
    InvalidWebhookUrl(#[from] url::ParseError),

    #[error("GAMEBOOST_SECRET is required in strict mode unless TEST_MODE=true")]
    MissingSecret,

    #[error("validation error: {0}")]
    ValidationError(String),
}

/// Values given on the command line; they take precedence over everything.
#[derive(Debug, Clone, Copy, Default)]
pub struct CliOverrides {
    pub listen: Option<SocketAddr>,
    pub mode: Option<RelayMode>,
}

/// Loaded configuration result containing all parts.
#[derive(Debug, Clone)]
pub struct LoadedConfig {
    pub server: ServerConfig,
    pub gameboost: GameBoostConfig,
    pub discord: DiscordConfig,
}

impl LoadedConfig {
    /// Convert into a SharedConfig with Arc<RwLock<T>> wrappers.
    pub fn into_shared(self) -> SharedConfig {
        SharedConfig::new(self.server, self.gameboost, self.discord)
    }
}

/// Configuration loader that handles the complete loading process.
pub struct ConfigLoader {
    config_path: Option<PathBuf>,
    overrides: CliOverrides,
}

impl ConfigLoader {
    /// Create a new config loader.
    pub fn new(config_path: Option<impl AsRef<Path>>, overrides: CliOverrides) -> Self {
        Self {
            config_path: config_path.map(|p| p.as_ref().to_path_buf()),
            overrides,
        }
    }

    /// Load the configuration from the file and the process environment.
    pub fn load(&self) -> Result<LoadedConfig, ConfigError> {
        self.load_with_env(|key| std::env::var(key).ok())
    }

    /// Reload the configuration (used during SIGHUP).
    pub fn reload(&self) -> Result<LoadedConfig, ConfigError> {
        self.load()
    }

    /// Load the configuration, resolving environment variables through `env`.
    pub fn load_with_env(
        &self,
        env: impl Fn(&str) -> Option<String>,
    ) -> Result<LoadedConfig, ConfigError> {
        let file_config = match &self.config_path {
            Some(path) => toml::from_str(&std::fs::read_to_string(path)?)?,
            None => FileConfig::default(),
        };
        self.build(file_config, env)
    }

    fn build(
        &self,
        file_config: FileConfig,
        env: impl Fn(&str) -> Option<String>,
    ) -> Result<LoadedConfig, ConfigError> {
        let env = |key: &str| env(key).filter(|value| !value.is_empty());

        let mode = match (self.overrides.mode, env(ENV_MODE)) {
            (Some(mode), _) => mode,
            (None, Some(value)) => value.parse()?,
            (None, None) => file_config.server.mode.unwrap_or_default(),
        };

        let listen = match (self.overrides.listen, env(ENV_PORT)) {
            (Some(listen), _) => listen,
            (None, Some(port)) => {
                let port: u16 = port.trim().parse().map_err(|_| ConfigError::InvalidPort(port))?;
                let host = file_config.server.listen.map_or(DEFAULT_HOST, |l| l.ip());
                SocketAddr::new(host, port)
            }
            (None, None) => file_config
                .server
                .listen
                .unwrap_or_else(|| SocketAddr::new(DEFAULT_HOST, mode.default_port())),
        };

        let secret = env(ENV_SECRET).or(file_config.gameboost.secret);
        let test_mode = env(ENV_TEST_MODE)
            .map_or(file_config.gameboost.test_mode, |value| value == "true");

        let webhook_url = env(ENV_WEBHOOK_URL)
            .or(file_config.discord.webhook_url)
            .ok_or(ConfigError::MissingWebhookUrl)?;
        let webhook_url = parse_webhook_url(&webhook_url)?;

        let secret = secret.filter(|s| !s.is_empty());
        if mode == RelayMode::Strict && !test_mode && secret.is_none() {
            return Err(ConfigError::MissingSecret);
        }

        Ok(LoadedConfig {
            server: ServerConfig { listen, mode },
            gameboost: GameBoostConfig::new(secret.map(String::into_bytes), test_mode),
            discord: DiscordConfig::new(webhook_url),
        })
    }
}

fn parse_webhook_url(raw: &str) -> Result<Url, ConfigError> {
    let url = Url::parse(raw.trim())?;
    match url.scheme() {
        "http" | "https" => Ok(url),
        other => Err(ConfigError::ValidationError(format!(
            "Discord webhook URL must use http or https, got `{other}`"
        ))),
    }
}
