//! Onramp payment gateway.
//!
//! Customer-facing invoice flow in front of the Onramp white-label API.
//!
//! # Architecture Overview
//!
//! ```text
//!     Browser                 ┌──────────────────────────────────────────┐
//!     ────────────────────────┼─▶ http (pages, views) ─▶ flow            │
//!                             │        │                   │             │
//!                             │        ▼                   ▼             │
//!                             │     session           onramp client ─────┼──▶ Onramp API
//!                             │                    (envelope + signer)   │
//!                             │                                          │
//!     Operator ───────────────┼─▶ admin (basic auth) ─▶ flow / client    │
//!                             │                                          │
//!                             │  config · observability · lifecycle      │
//!                             └──────────────────────────────────────────┘
//! ```

use clap::Parser;
use std::path::PathBuf;
use tokio::net::TcpListener;

use onramp_gateway::config::load_config;
use onramp_gateway::lifecycle::signals::spawn_signal_handler;
use onramp_gateway::observability::{logging, metrics};
use onramp_gateway::{HttpServer, Shutdown};

#[derive(Parser)]
#[command(name = "onramp-gateway")]
#[command(about = "Invoice gateway for the Onramp white-label API", long_about = None)]
struct Args {
    /// Optional TOML configuration file. Environment variables override it.
    #[arg(short, long)]
    config: Option<PathBuf>,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let args = Args::parse();

    let config = match load_config(args.config.as_deref()) {
        Ok(config) => config,
        Err(e) => {
            eprintln!("Configuration error: {}", e);
            std::process::exit(1);
        }
    };

    logging::init(&config.observability);
    tracing::info!(version = env!("CARGO_PKG_VERSION"), "onramp-gateway starting");

    tracing::info!(
        bind_address = %config.listener.bind_address,
        base_url = %config.provider.base_url,
        chain = %config.provider.chain,
        receive_address_set = config.provider.receive_address.is_some(),
        admin_enabled = config.admin.enabled(),
        "Configuration loaded"
    );

    if config.observability.metrics_enabled {
        match config.observability.metrics_address.parse() {
            Ok(addr) => metrics::init_metrics(addr),
            Err(_) => tracing::error!(
                metrics_address = %config.observability.metrics_address,
                "Failed to parse metrics address"
            ),
        }
    }

    let listener = TcpListener::bind(&config.listener.bind_address).await?;
    tracing::info!(address = %listener.local_addr()?, "Listening for connections");

    let shutdown = Shutdown::new();
    spawn_signal_handler(shutdown.clone());

    let server = HttpServer::new(config)?;
    server.run(listener, shutdown.subscribe()).await?;

    tracing::info!("Shutdown complete");
    Ok(())
}
