//! GameBoost Order Relay Server
//!
//! Receives GameBoost order webhooks and forwards purchases to a Discord channel.

mod api;
mod config;
mod server;
mod shutdown;
mod state;

use clap::Parser;
use config::{CliOverrides, ConfigLoader};
use gbrelay_core::config::RelayMode;
use gbrelay_core::dedup::DedupTracker;
use gbrelay_core::events::relay_job_channel;
use gbrelay_core::notifier::DiscordNotifier;
use gbrelay_core::processors::{OrderRelay, RelayProcessor};
use server::{build_router, run_server};
use shutdown::spawn_config_reload_handler;
use state::AppState;
use std::net::SocketAddr;
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;
use tracing_subscriber::{EnvFilter, layer::SubscriberExt, util::SubscriberInitExt};

/// How long queued relay jobs get to finish after the listener closes.
const DRAIN_TIMEOUT: Duration = Duration::from_secs(35);

/// GameBoost Order Relay - forwards GameBoost order webhooks to Discord
#[derive(Parser, Debug)]
#[command(name = "gbrelay-server")]
#[command(version, about, long_about = None)]
struct Args {
    /// Path to an optional TOML configuration file
    #[arg(short, long, env = "GBRELAY_CONFIG")]
    config: Option<PathBuf>,

    /// Override the listen address (e.g., 0.0.0.0:5000)
    #[arg(short, long)]
    listen: Option<SocketAddr>,

    /// Override the relay mode (strict or lenient)
    #[arg(short, long)]
    mode: Option<RelayMode>,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // A missing .env file is fine
    let _ = dotenvy::dotenv();

    init_tracing();

    let args = Args::parse();

    tracing::info!("Starting gbrelay-server v{}", env!("CARGO_PKG_VERSION"));

    // Load configuration
    let overrides = CliOverrides {
        listen: args.listen,
        mode: args.mode,
    };
    let config_loader = Arc::new(ConfigLoader::new(args.config.as_ref(), overrides));
    let loaded_config = config_loader.load().map_err(|e| {
        tracing::error!("Failed to load configuration: {}", e);
        e
    })?;

    let listen_addr = loaded_config.server.listen;
    let mode = loaded_config.server.mode;
    if loaded_config.gameboost.test_mode && mode == RelayMode::Strict {
        tracing::warn!("TEST_MODE is enabled, webhook signatures will not be checked");
    }
    match &args.config {
        Some(path) => tracing::info!(%mode, "Configuration loaded from {:?}", path),
        None => tracing::info!(%mode, "Configuration loaded from environment"),
    }

    let shared_config = loaded_config.into_shared();

    // Relay pipeline
    let relay = OrderRelay::new(
        DedupTracker::new(),
        Arc::new(DiscordNotifier::new()),
        shared_config.discord.clone(),
    );
    let (relay_jobs, relay_job_rx) = relay_job_channel();
    let processor = tokio::spawn(RelayProcessor::new(relay.clone(), relay_job_rx).run());

    // Spawn config reload handler (listens for SIGHUP)
    let shutdown_notify = spawn_config_reload_handler(shared_config.clone(), config_loader);

    // Build the router; it owns the only job sender
    let state = AppState::new(shared_config, mode, relay, relay_jobs);
    let router = build_router(state);

    tracing::info!("Starting HTTP server on {}", listen_addr);
    let result = run_server(router, listen_addr).await;

    // Signal the config reload handler to stop
    shutdown_notify.notify_one();

    // The router is gone, so the job queue is closed; let queued jobs finish
    tracing::info!("Draining relay jobs...");
    match tokio::time::timeout(DRAIN_TIMEOUT, processor).await {
        Ok(Ok(())) => tracing::info!("Relay processor stopped"),
        Ok(Err(e)) => tracing::error!("Relay processor task failed: {}", e),
        Err(_) => tracing::warn!("Timed out waiting for relay jobs, some notifications may be lost"),
    }
    tracing::info!("Server shutdown complete");

    result.map_err(Into::into)
}

/// Initialize the tracing subscriber with environment-based filtering.
fn init_tracing() {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new("info,tower_http=debug"));

    tracing_subscriber::registry()
        .with(filter)
        .with(tracing_subscriber::fmt::layer())
        .init();
}
