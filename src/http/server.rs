//! HTTP server setup and configuration.
//!
//! # Responsibilities
//! - Create the Axum router with one route per logical operation
//! - Wire up middleware (tracing, timeout, request ID)
//! - Bind the server to a listener and serve until shutdown
//!
//! # Design Decisions
//! - Handlers reach the backend through trait objects, so tests swap in
//!   in-memory services without touching the router
//! - Per-request state never crosses requests; the only shared state is the
//!   process-wide metrics recorder

use std::sync::Arc;
use std::time::Duration;

use axum::Router;
use tokio::net::TcpListener;
use tower_http::timeout::TimeoutLayer;
use tower_http::trace::TraceLayer;

use crate::backend::{CardsService, RpcClient, TopupsService, WithdrawsService};
use crate::config::GatewayConfig;
use crate::http::request::RequestIdLayer;
use crate::http::{cards, topups, withdraws};
use crate::lifecycle::signals::shutdown_signal;

/// Application state injected into handlers.
#[derive(Clone)]
pub struct AppState {
    pub cards: Arc<dyn CardsService>,
    pub withdraws: Arc<dyn WithdrawsService>,
    pub topups: Arc<dyn TopupsService>,
}

impl AppState {
    /// State backed by the wire client from configuration.
    pub fn from_config(config: &GatewayConfig) -> Result<Self, reqwest::Error> {
        let client = Arc::new(RpcClient::new(&config.backend)?);
        Ok(Self {
            cards: client.clone(),
            withdraws: client.clone(),
            topups: client,
        })
    }
}

/// Build the full router: resource routes under `/api`, middleware outermost.
pub fn build_router(config: &GatewayConfig, state: AppState) -> Router {
    let api = Router::new()
        .nest("/cards", cards::routes())
        .nest("/withdraws", withdraws::routes())
        .nest("/topups", topups::routes());

    Router::new()
        .nest("/api", api)
        .with_state(state)
        .layer(TimeoutLayer::new(Duration::from_secs(
            config.timeouts.request_secs,
        )))
        .layer(RequestIdLayer)
        .layer(TraceLayer::new_for_http())
}

/// HTTP server for the gateway.
pub struct HttpServer {
    router: Router,
    config: GatewayConfig,
}

impl HttpServer {
    /// Create a server whose handlers call the configured backend.
    pub fn new(config: GatewayConfig) -> Result<Self, reqwest::Error> {
        let state = AppState::from_config(&config)?;
        let router = build_router(&config, state);
        Ok(Self { router, config })
    }

    /// Run the server, accepting connections on the given listener.
    pub async fn run(self, listener: TcpListener) -> Result<(), std::io::Error> {
        let addr = listener.local_addr()?;
        tracing::info!(address = %addr, "HTTP server starting");

        axum::serve(listener, self.router)
            .with_graceful_shutdown(shutdown_signal())
            .await?;

        tracing::info!("HTTP server stopped");
        Ok(())
    }

    /// Get a reference to the config.
    pub fn config(&self) -> &GatewayConfig {
        &self.config
    }
}
