//! Edge request logger (demonstration server)
//!
//! # Architecture Overview
//!
//! ```text
//!     Client Request      ┌───────────────────────────────────────────────┐
//!     ───────────────────▶│ trace → request id → request logging → handler│
//!                         │                          │                    │
//!     Client Response     │                          ▼                    │
//!     ◀───────────────────│                   RequestLogger               │
//!                         │          (defaults + lines + set_meta)        │
//!                         └──────────────────────────┬────────────────────┘
//!                                                    │ flush (spawned)
//!                                                    ▼
//!                                        POST /logs/ingest?tag&hostname&now
//!                                              ingestion API
//! ```

use std::path::PathBuf;
use clap::Parser;
use tokio::net::TcpListener;
use tokio::sync::mpsc;

use edge_request_logger::config::loader::{load_config, parse_config};
use edge_request_logger::config::watcher::ConfigWatcher;
use edge_request_logger::lifecycle::signals::spawn_signal_handler;
use edge_request_logger::observability::{logging, metrics};
use edge_request_logger::{EdgeServer, Shutdown};

#[derive(Parser)]
#[command(name = "edge-logger")]
#[command(about = "Edge HTTP service that ships per-request logs to an ingestion API", long_about = None)]
struct Cli {
    /// TOML config file. Without one, defaults and environment overrides apply.
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Reload the config file when it changes.
    #[arg(long)]
    watch: bool,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();

    let config = match &cli.config {
        Some(path) => load_config(path)?,
        None => parse_config("", |name| std::env::var(name).ok())?,
    };

    logging::init_logging(&config.observability)?;
    tracing::info!("edge-logger v{} starting", env!("CARGO_PKG_VERSION"));
    tracing::info!(
        bind_address = %config.server.bind_address,
        app = %config.logger.app_name,
        env = ?config.logger.environment,
        endpoint = %config.ingestion.endpoint,
        "Configuration loaded"
    );

    if config.observability.metrics_enabled {
        match config.observability.metrics_address.parse() {
            Ok(addr) => {
                if let Err(e) = metrics::init_metrics(addr) {
                    tracing::error!(error = %e, "Failed to start metrics exporter");
                }
            }
            Err(_) => tracing::error!(
                metrics_address = %config.observability.metrics_address,
                "Failed to parse metrics address"
            ),
        }
    }

    // Keep the watcher alive for the lifetime of the server.
    let (_watcher, config_updates) = match (&cli.config, cli.watch) {
        (Some(path), true) => {
            let (watcher, updates) = ConfigWatcher::new(path);
            (Some(watcher.run()?), updates)
        }
        _ => {
            let (_, updates) = mpsc::unbounded_channel();
            (None, updates)
        }
    };

    let listener = TcpListener::bind(&config.server.bind_address).await?;
    tracing::info!(address = %listener.local_addr()?, "Listening for connections");

    let shutdown = Shutdown::new();
    spawn_signal_handler(&shutdown);

    let server = EdgeServer::new(config);
    server.run(listener, config_updates, shutdown.subscribe()).await?;

    tracing::info!("Shutdown complete");
    Ok(())
}
