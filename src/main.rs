//! wedsite: multi-tenant wedding websites.
//!
//! # Architecture Overview
//!
//! ```text
//!                     ┌──────────────────────────────────────────────────────┐
//!                     │                       WEDSITE                        │
//!                     │                                                      │
//!   Client Request    │  ┌──────────┐    ┌────────────┐    ┌──────────────┐  │
//!   ──────────────────┼─▶│ hostname │───▶│    http    │───▶│   handlers   │  │
//!   john.example.com  │  │ rewrite  │    │   router   │    │ render / api │  │
//!                     │  └──────────┘    └────────────┘    └──────┬───────┘  │
//!                     │                                           │          │
//!                     │                     ┌─────────────────────┼───────┐  │
//!                     │                     ▼                     ▼       │  │
//!                     │              ┌────────────┐      ┌──────────────┐ │  │
//!                     │              │ templates  │      │  site store  │ │  │
//!                     │              └────────────┘      └──────────────┘ │  │
//!                     │                                                   │  │
//!                     │  ┌─────────────┐  GET render   ┌──────────────┐   │  │
//!                     │  │   publish   │──────────────▶│  self (http) │   │  │
//!                     │  │  pipeline   │  PUT snapshot ┌──────────────┐   │  │
//!                     │  └─────────────┘──────────────▶│   KV cache   │   │  │
//!                     │                                └──────────────┘   │  │
//!                     └──────────────────────────────────────────────────────┘
//! ```

use std::path::PathBuf;
use std::sync::Arc;

use clap::Parser;
use tokio::net::TcpListener;

use wedsite::http::HttpServer;
use wedsite::lifecycle::{signals, startup, Shutdown};

#[derive(Parser, Debug)]
#[command(author, version, about = "Multi-tenant wedding website service")]
struct Args {
    /// Path to a TOML config file (also read from WEDSITE_CONFIG)
    #[arg(short, long)]
    config: Option<PathBuf>,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let args = Args::parse();

    let config = startup::load_configuration(args.config.as_deref())?;
    startup::init_observability(&config)?;

    tracing::info!(version = env!("CARGO_PKG_VERSION"), "wedsite starting");
    tracing::info!(
        bind_address = %config.listener.bind_address,
        primary_domain = %config.domain.primary_domain,
        base_url = %config.base_url(),
        cache_configured = config.cache.credentials().is_some(),
        auto_rebuild = config.rebuild.auto_rebuild,
        "Configuration loaded"
    );

    let store = startup::load_store(&config)?;
    let config = Arc::new(config);

    let listener = TcpListener::bind(&config.listener.bind_address).await?;
    tracing::info!(address = %listener.local_addr()?, "Listening for connections");

    let shutdown = Arc::new(Shutdown::new());
    signals::spawn_signal_listener(shutdown.clone());

    let server = HttpServer::new(config.clone(), store.clone())?;
    server.run(listener, shutdown.wait()).await?;

    if let Err(e) = store.save_to_file() {
        tracing::error!(error = %e, "Failed to save site snapshot");
    }

    tracing::info!("Shutdown complete");
    Ok(())
}
