#![forbid(unsafe_code)]
#![cfg_attr(docsrs, feature(doc_cfg))]
#![doc = include_str!("../README.md")]

mod config;
mod provider;
mod server;

use std::process;

use anyhow::Context;
use axum::Router;
use ragengine_server::handler::routes;
use ragengine_server::middleware::{RouterObservabilityExt, RouterRecoveryExt};
use ragengine_server::service::ServiceState;

use crate::config::{Cli, MiddlewareConfig};

// Tracing target constants
pub const TRACING_TARGET_SERVER_STARTUP: &str = "ragengine_cli::server::startup";
pub const TRACING_TARGET_SERVER_SHUTDOWN: &str = "ragengine_cli::server::shutdown";
pub const TRACING_TARGET_CONFIG: &str = "ragengine_cli::config";

#[tokio::main]
async fn main() {
    let Err(error) = run().await else {
        tracing::info!(
            target: TRACING_TARGET_SERVER_SHUTDOWN,
            "application terminated successfully"
        );
        process::exit(0);
    };

    if tracing::enabled!(tracing::Level::ERROR) {
        tracing::error!(
            target: TRACING_TARGET_SERVER_SHUTDOWN,
            error = %error,
            "application terminated with error"
        );
    } else {
        eprintln!("Error: {error:#}");
    }

    process::exit(1);
}

/// Main application entry point.
async fn run() -> anyhow::Result<()> {
    let cli = Cli::init();

    Cli::init_tracing();
    cli.log();
    cli.validate()?;

    let embedder =
        provider::create_embedding(&cli.service).context("failed to create embedding provider")?;
    let state = ServiceState::new(&cli.service, embedder)
        .await
        .context("failed to create service state")?;
    let router = create_router(state.clone(), &cli.middleware);

    server::serve(router, cli.server).await?;

    state
        .manager
        .persist_all()
        .await
        .context("failed to persist namespaces on shutdown")?;

    Ok(())
}

/// Creates the router with all middleware layers applied.
///
/// Middleware is applied in reverse order (last added = outermost):
/// 1. Recovery (outermost) - catches panics and enforces timeouts
/// 2. Observability - request IDs, tracing spans and timing
/// 3. Routes (innermost) - actual request handlers
fn create_router(state: ServiceState, middleware: &MiddlewareConfig) -> Router {
    routes()
        .with_state(state)
        .with_timing()
        .with_observability()
        .with_recovery(&middleware.recovery)
}
