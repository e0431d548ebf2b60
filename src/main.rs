//! Trip Log API server.
//!
//! # Architecture Overview
//!
//! ```text
//!                        ┌──────────────────────────────────────────────┐
//!                        │                  TRIPLOG                     │
//!                        │                                              │
//!     Client Request     │  ┌─────────┐    ┌──────────────────────┐     │
//!     ───────────────────┼─▶│  http   │───▶│ routing (route table)│     │
//!                        │  │ server  │    └──────────┬───────────┘     │
//!                        │  └─────────┘               │                 │
//!                        │          ┌─────────────────┼──────────┐      │
//!                        │          ▼                 ▼          ▼      │
//!                        │   /api/trips/...    /api/logs/...   /admin   │
//!                        │   TripViewSet       LogSheetViewSet  group   │
//!                        │          └────────┬────────┘                 │
//!                        │                   ▼                          │
//!                        │            resources::Store                  │
//!                        │                                              │
//!                        │  config · observability · lifecycle          │
//!                        └──────────────────────────────────────────────┘
//! ```

use clap::Parser;
use std::path::PathBuf;
use tokio::net::TcpListener;

use triplog::config::{load_config, AppConfig};
use triplog::http::HttpServer;
use triplog::lifecycle::{build_application, signals, Shutdown};
use triplog::observability::{logging, metrics};

#[derive(Parser)]
#[command(name = "triplog")]
#[command(about = "HTTP API for trips and driver log sheets", long_about = None)]
struct Cli {
    /// TOML configuration file; built-in defaults are used when omitted.
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Print the route table and exit.
    #[arg(long)]
    print_routes: bool,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();

    let config = match &cli.config {
        Some(path) => load_config(path)?,
        None => AppConfig::default(),
    };

    logging::init_logging(&config.observability);

    tracing::info!("triplog v{} starting", env!("CARGO_PKG_VERSION"));
    tracing::info!(
        bind_address = %config.listener.bind_address,
        api_prefix = %config.routing.api_prefix,
        admin_prefix = %config.routing.admin_prefix,
        request_timeout_secs = config.timeouts.request_secs,
        "Configuration loaded"
    );

    let app = build_application(&config)?;

    if cli.print_routes {
        println!("{}", app.table);
        return Ok(());
    }

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
    let server = HttpServer::new(config, app.router);
    let server_shutdown = shutdown.subscribe();

    let mut server_task = tokio::spawn(server.run(listener, server_shutdown));

    tokio::select! {
        result = &mut server_task => result??,
        _ = signals::forward_signals(&shutdown) => server_task.await??,
    }

    tracing::info!("Shutdown complete");
    Ok(())
}
