//! Grok session relay.
//!
//! A reverse proxy in front of a fixed upstream web service and its asset
//! host, holding a small set of session cookies in memory.
//!
//! # Architecture Overview
//!
//! ```text
//!                              ┌──────────────────────────────────────────────────┐
//!                              │                    RELAY                          │
//!     Client Request           │  ┌─────────┐    ┌──────────────┐                  │
//!     ─────────────────────────┼─▶│  http   │───▶│   routing    │                  │
//!                              │  │ server  │    │ route table  │                  │
//!                              │  └─────────┘    └──────┬───────┘                  │
//!                              │          ┌─────────────┼──────────────┐           │
//!                              │          ▼             ▼              ▼           │
//!                              │   ┌────────────┐ ┌──────────┐  ┌────────────┐     │
//!                              │   │ /api/sync  │ │  shell   │  │  upstream  │     │
//!                              │   │/api/account│ │ document │  │  resolver  │     │
//!                              │   └─────┬──────┘ └──────────┘  └─────┬──────┘     │
//!                              │         ▼                            ▼            │
//!                              │   ┌────────────┐               ┌────────────┐     │
//!                              │   │ credential │               │  reqwest   │◀────┼──── Upstream
//!                              │   │   store    │               │  client    │     │
//!                              │   └────────────┘               └─────┬──────┘     │
//!     Client Response          │                                      ▼            │
//!     ◀────────────────────────┼──────────────────────────────  ┌────────────┐     │
//!                              │                                │  rewrite   │     │
//!                              │                                │  stream    │     │
//!                              │                                └────────────┘     │
//!                              └──────────────────────────────────────────────────┘
//! ```

use clap::Parser;
use std::path::PathBuf;

use grok_relay::config::{load_config, RelayConfig};
use grok_relay::observability::logging;

#[derive(Parser)]
#[command(name = "grok-relay")]
#[command(about = "Session-injecting reverse proxy for Grok", long_about = None)]
struct Args {
    /// TOML configuration file; defaults apply when omitted.
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Override the listener bind address.
    #[arg(short, long)]
    bind: Option<String>,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let args = Args::parse();

    let mut config = match &args.config {
        Some(path) => load_config(path)?,
        None => RelayConfig::default(),
    };
    if let Some(bind) = args.bind {
        config.listener.bind_address = bind;
    }

    logging::init_logging(&config.observability);

    tracing::info!("grok-relay v{} starting", env!("CARGO_PKG_VERSION"));
    tracing::info!(
        bind_address = %config.listener.bind_address,
        primary_origin = %config.upstream.primary_origin,
        asset_origin = %config.upstream.asset_origin,
        shell = %config.shell.path,
        metrics_enabled = config.observability.metrics_enabled,
        "Configuration loaded"
    );

    grok_relay::lifecycle::run(config).await?;

    tracing::info!("Shutdown complete");
    Ok(())
}
