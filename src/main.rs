//! sentinel-flow service entry point.
//!
//! # Architecture Overview
//!
//! ```text
//!   POST /api/trace/flow
//!   ───────────────────▶ ┌──────────┐    ┌────────────┐    ┌───────────────┐
//!                        │   http   │───▶│   tracer   │───▶│  blockchain   │──▶ Explorer API
//!   ◀─────────────────── │ boundary │◀───│ BFS engine │◀───│ explorer +    │◀── (txlist)
//!   FlowResult JSON      └──────────┘    └────────────┘    │ retries       │
//!                                                          └───────────────┘
//!   config (TOML + env, hot reload) · observability (tracing, Prometheus) · lifecycle
//! ```

use clap::Parser;
use std::net::SocketAddr;
use std::path::PathBuf;
use tokio::net::TcpListener;
use tokio::sync::mpsc;

use sentinel_flow::config::loader::{default_config, load_config};
use sentinel_flow::config::watcher::ConfigWatcher;
use sentinel_flow::observability::{logging, metrics};
use sentinel_flow::{HttpServer, Shutdown};

#[derive(Parser)]
#[command(name = "sentinel-flow")]
#[command(about = "Traces fund movement between addresses", long_about = None)]
struct Args {
    /// Path to a TOML config file. Watched for changes when given.
    #[arg(short, long)]
    config: Option<PathBuf>,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let args = Args::parse();

    let config = match &args.config {
        Some(path) => load_config(path)?,
        None => default_config(),
    };

    logging::init_logging(&config.observability);
    tracing::info!("sentinel-flow v{} starting", env!("CARGO_PKG_VERSION"));

    tracing::info!(
        bind_address = %config.listener.bind_address,
        explorer = %config.explorer.base_url,
        has_api_key = config.explorer.api_key.is_some(),
        default_max_hops = config.tracer.default_max_hops,
        request_timeout_secs = config.timeouts.request_secs,
        "Configuration loaded"
    );

    if config.observability.metrics_enabled {
        match config.observability.metrics_address.parse::<SocketAddr>() {
            Ok(addr) => metrics::init_metrics(addr),
            Err(_) => tracing::error!(
                metrics_address = %config.observability.metrics_address,
                "Failed to parse metrics address"
            ),
        }
    }

    // The watcher must outlive the server.
    let (config_updates, _watcher) = match &args.config {
        Some(path) => {
            let (watcher, updates) = ConfigWatcher::new(path);
            match watcher.run() {
                Ok(w) => (updates, Some(w)),
                Err(e) => {
                    tracing::warn!(error = %e, "Config hot reload unavailable");
                    (updates, None)
                }
            }
        }
        None => {
            let (_, updates) = mpsc::unbounded_channel();
            (updates, None)
        }
    };

    let listener = TcpListener::bind(&config.listener.bind_address).await?;
    tracing::info!(address = %listener.local_addr()?, "Listening for connections");

    let shutdown = Shutdown::new();
    let server_shutdown = shutdown.subscribe();
    shutdown.trigger_on_signal();

    let server = HttpServer::new(config)?;
    server.run(listener, config_updates, server_shutdown).await?;

    tracing::info!("Shutdown complete");
    Ok(())
}
