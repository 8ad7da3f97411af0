//! Payment Platform REST Gateway
//!
//! A gateway exposing a REST surface over the platform's backend RPC
//! services (cards, withdrawals, top-ups), built with Tokio and Axum.
//!
//! # Architecture Overview
//!
//! ```text
//!                         ┌────────────────────────────────────────────┐
//!                         │                  GATEWAY                    │
//!                         │                                             │
//!  Client Request         │  ┌──────────┐   ┌──────────┐   ┌─────────┐ │
//!  ───────────────────────┼─▶│   http   │──▶│ pipeline │──▶│ backend │─┼──▶ Backend
//!                         │  │ handlers │   │ dispatch │   │ client  │ │    RPC
//!                         │  └──────────┘   └────┬─────┘   └─────────┘ │
//!                         │                      │                      │
//!  Client Response        │                      ▼                      │
//!  ◀──────────────────────┼── typed payload ┌──────────────┐           │
//!                         │   or ApiError   │observability │           │
//!                         │                 │ span+metrics │           │
//!                         │                 └──────────────┘           │
//!                         │  ┌────────────────────────────────────┐    │
//!                         │  │  config   lifecycle   error model  │    │
//!                         │  └────────────────────────────────────┘    │
//!                         └────────────────────────────────────────────┘
//! ```

use std::path::PathBuf;

use clap::Parser;
use tokio::net::TcpListener;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use payment_gateway::config::{load_config, GatewayConfig};
use payment_gateway::observability::metrics::init_metrics;
use payment_gateway::HttpServer;

/// Command-line arguments.
#[derive(Debug, Parser)]
#[command(name = "payment-gateway", about = "REST gateway for the payment platform")]
struct Args {
    /// Path to the TOML configuration file. Defaults apply when omitted.
    #[arg(long)]
    config: Option<PathBuf>,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Initialize tracing subscriber
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "payment_gateway=debug,tower_http=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    tracing::info!("payment-gateway v0.1.0 starting");

    let args = Args::parse();
    let config = match &args.config {
        Some(path) => load_config(path)?,
        None => GatewayConfig::default(),
    };

    tracing::info!(
        bind_address = %config.listener.bind_address,
        backend_url = %config.backend.base_url,
        request_timeout_secs = config.timeouts.request_secs,
        "Configuration loaded"
    );

    // Bind TCP listener
    let listener = TcpListener::bind(&config.listener.bind_address).await?;
    let local_addr = listener.local_addr()?;

    tracing::info!(address = %local_addr, "Listening for connections");

    // Initialize metrics exposition
    if config.observability.metrics_enabled {
        match config.observability.metrics_address.parse() {
            Ok(addr) => init_metrics(addr),
            Err(_) => {
                tracing::error!(
                    metrics_address = %config.observability.metrics_address,
                    "Failed to parse metrics address"
                );
            }
        }
    }

    // Create and run HTTP server
    let server = HttpServer::new(config)?;
    server.run(listener).await?;

    tracing::info!("Shutdown complete");
    Ok(())
}
