//! Eventbrite Gateway
//!
//! Relays a fixed set of event operations to the Eventbrite REST API.
//!
//! # Architecture Overview
//!
//! ```text
//!     Client Request     ┌──────────────────────────────────────────────┐
//!     ───────────────────┼─▶ request id ─▶ trace ─▶ timeout ─▶ limit    │
//!                        │                                   │          │
//!                        │                                   ▼          │
//!                        │                        handlers (Operation)  │
//!                        │                                   │          │
//!                        │                                   ▼          │
//!                        │                  route table (URL, payload)  │
//!                        │                                   │          │
//!     Client Response    │                                   ▼          │
//!     ◀──────────────────┼── {status, body} | {error} ◀─ upstream client ┼──▶ Eventbrite
//!                        └──────────────────────────────────────────────┘
//! ```

use std::path::PathBuf;

use clap::Parser;
use tokio::net::TcpListener;

use eventbrite_gateway::config::validation::validate_config;
use eventbrite_gateway::config::{load_config, ConfigError};
use eventbrite_gateway::lifecycle::{signals, Shutdown};
use eventbrite_gateway::observability::{logging, metrics};
use eventbrite_gateway::HttpServer;

#[derive(Parser)]
#[command(name = "eventbrite-gateway")]
#[command(about = "HTTP gateway relaying event operations to Eventbrite", long_about = None)]
struct Cli {
    /// TOML configuration file. Defaults apply when omitted.
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Listen address, overriding file and environment.
    #[arg(short, long)]
    listen: Option<String>,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();

    let mut config = load_config(cli.config.as_deref())?;
    if let Some(listen) = cli.listen {
        config.listener.bind_address = listen;
        validate_config(&config).map_err(ConfigError::Validation)?;
    }

    logging::init_logging(&config.observability)?;
    tracing::info!("eventbrite-gateway v{} starting", env!("CARGO_PKG_VERSION"));

    tracing::info!(
        bind_address = %config.listener.bind_address,
        upstream = %config.upstream.base_url,
        org_id = %config.upstream.org_id,
        upstream_timeout_secs = config.upstream.request_timeout_secs,
        request_timeout_secs = config.timeouts.request_secs,
        mirror_upstream_status = config.responses.mirror_upstream_status,
        "Configuration loaded"
    );

    if config.observability.metrics_enabled {
        // Validation already checked that the address parses.
        let addr = config.observability.metrics_address.parse()?;
        if let Err(e) = metrics::init_metrics(addr) {
            tracing::error!(error = %e, "Failed to start metrics endpoint");
        }
    }

    let listener = TcpListener::bind(&config.listener.bind_address).await?;
    tracing::info!(address = %listener.local_addr()?, "Listening for connections");

    let shutdown = Shutdown::new();
    let server = HttpServer::new(config)?;
    let stopped = shutdown.notified();

    let signal_shutdown = shutdown.clone();
    tokio::spawn(async move {
        signals::shutdown_on_signal(&signal_shutdown).await;
    });

    server.run(listener, stopped).await?;

    tracing::info!("Shutdown complete");
    Ok(())
}
