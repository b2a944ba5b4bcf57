//! CRUD API server.
//!
//! # Architecture Overview
//!
//! ```text
//!     Client Request
//!     ─────────────▶ request id ─▶ trace ─▶ security headers ─▶ cors
//!                    ─▶ rate limit ─▶ compression ─▶ body limit ─▶ router
//!                                                                    │
//!                         ┌──────────────────────────────────────────┤
//!                         ▼                                          ▼
//!               /crud-operations/*                     /crud-operations/relational/*
//!               crud::document handlers                crud::relational handlers
//!                         │                                          │
//!                         ▼                                          ▼
//!               store::DocumentStore                   store::RelationalStore
//!               (SQLite `documents` JSON rows)          (SQLite `lists` table)
//! ```

use std::path::PathBuf;

use clap::Parser;
use tokio::net::TcpListener;

use crud_api::config::load_config;
use crud_api::lifecycle::{signals, startup, Shutdown};
use crud_api::observability::{logging, metrics};
use crud_api::HttpServer;

#[derive(Parser, Debug)]
#[command(name = "crud-api", version, about = "CRUD REST API for lists")]
struct Cli {
    /// Path to a TOML config file
    #[arg(short, long, env = "CRUD_API_CONFIG")]
    config: Option<PathBuf>,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();
    let config = load_config(cli.config.as_deref())?;

    logging::init_logging(&config.observability, config.is_production());

    tracing::info!(
        mode = %config.mode,
        version = env!("CARGO_PKG_VERSION"),
        "crud-api starting"
    );

    let state = startup::build_state(&config)?;

    if config.observability.metrics_enabled {
        match config.observability.metrics_address.parse() {
            Ok(addr) => {
                if let Err(e) = metrics::init_metrics(addr) {
                    tracing::error!(error = %e, "Failed to start metrics endpoint");
                }
            }
            Err(_) => tracing::error!(
                metrics_address = %config.observability.metrics_address,
                "Failed to parse metrics address"
            ),
        }
    }

    let listener = TcpListener::bind(config.socket_addr()).await?;
    let local_addr = listener.local_addr()?;

    tracing::info!("Bootstrap succeeded");
    tracing::info!(url = %format!("http://{local_addr}"), "Listening for connections");

    let shutdown = Shutdown::new();
    let receiver = shutdown.subscribe();
    let signal_task = tokio::spawn(async move {
        let signal = signals::wait_for_signal().await;
        tracing::info!(signal, "Shutdown requested");
        shutdown.trigger();
    });

    HttpServer::new(config, state).run(listener, receiver).await?;

    signal_task.abort();
    tracing::info!("Shutdown complete");
    Ok(())
}
