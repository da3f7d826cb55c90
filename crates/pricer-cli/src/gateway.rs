//! Gateway command: serves the query engine over HTTP.
//!
//! Startup sequence:
//! 1. Engine is built by the caller (catalog + client factory)
//! 2. Router is assembled with a permissive CORS layer
//! 3. Listener binds `host:port` from the gateway config
//! 4. Ctrl+C triggers graceful shutdown

use std::sync::Arc;

use anyhow::Result;
use axum::routing::{get, post};
use axum::Router;
use colored::Colorize;
use thiserror::Error;
use tokio::net::TcpListener;
use tower_http::cors::{Any, CorsLayer};
use tracing::info;

use pricer_core::config::GatewayConfig;
use pricer_engine::QueryEngine;

use crate::routes;

/// Shared state handed to every handler.
pub struct AppState {
    engine: Arc<QueryEngine>,
}

impl AppState {
    pub fn new(engine: Arc<QueryEngine>) -> Self {
        Self { engine }
    }

    pub fn engine(&self) -> &QueryEngine {
        &self.engine
    }
}

#[derive(Debug, Error)]
pub enum ServerError {
    #[error("failed to bind {addr}: {source}")]
    Bind {
        addr: String,
        #[source]
        source: std::io::Error,
    },
    #[error("server error: {0}")]
    Serve(#[source] std::io::Error),
}

/// Build the gateway router over `state`.
pub fn router(state: Arc<AppState>) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    Router::new()
        .route("/health", get(routes::health))
        .route("/api/models", get(routes::list_models))
        .route(
            "/api/models/provider/{provider}",
            get(routes::list_models_by_provider),
        )
        .route("/api/providers", get(routes::list_providers))
        .route(
            "/api/get_best_price_for_prompt",
            post(routes::best_price_for_prompt),
        )
        .route("/api/send_prompt", post(routes::send_prompt))
        .route("/api-docs", get(routes::api_docs))
        .layer(cors)
        .with_state(state)
}

/// Bind and serve until Ctrl+C.
pub async fn serve(engine: Arc<QueryEngine>, gateway: &GatewayConfig) -> Result<(), ServerError> {
    let addr = format!("{}:{}", gateway.host, gateway.port);
    info!(%addr, "Binding gateway");

    let app = router(Arc::new(AppState::new(engine)));

    let listener = TcpListener::bind((gateway.host.as_str(), gateway.port))
        .await
        .map_err(|source| ServerError::Bind {
            addr: addr.clone(),
            source,
        })?;
    info!(%addr, "Gateway ready to accept connections");

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .map_err(ServerError::Serve)
}

/// Run the gateway command: print the banner, then serve.
pub async fn run(engine: Arc<QueryEngine>, gateway: &GatewayConfig) -> Result<()> {
    let catalog = engine.catalog();
    println!();
    println!(
        "{}  v{}",
        "Pricer gateway".cyan().bold(),
        env!("CARGO_PKG_VERSION").dimmed()
    );
    println!(
        "  Catalog: {} models from {} providers",
        catalog.len(),
        catalog.providers().len()
    );
    println!("  Listening on http://{}:{}", gateway.host, gateway.port);
    println!("  {}", "Press Ctrl+C to stop.".dimmed());
    println!();

    serve(engine, gateway).await?;

    println!("{}", "Gateway stopped.".dimmed());
    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!(error = %e, "failed to listen for Ctrl+C");
        std::future::pending::<()>().await;
    }
    info!("Shutdown signal received");
}
