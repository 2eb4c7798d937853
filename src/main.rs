//! Layered console dev server.
//!
//! # Architecture Overview
//!
//! ```text
//!                         ┌──────────────────────────────────────────────┐
//!                         │                DEV SERVER                    │
//!                         │                                              │
//!     Client Request      │  ┌─────────┐    ┌──────────┐                 │
//!     ────────────────────┼─▶│  http   │───▶│  proxy   │─── match ───────┼──▶ api / agent
//!                         │  │ server  │    │  table   │                 │    backends
//!                         │  └─────────┘    └────┬─────┘                 │
//!                         │                      │ no match              │
//!                         │                      ▼                       │
//!                         │               ┌──────────────┐               │
//!     Client Response     │               │  navigation  │               │
//!     ◀───────────────────┼───────────────│  route tree  │               │
//!                         │               │  + shell     │               │
//!                         │               └──────────────┘               │
//!                         │                                              │
//!                         │  config · lifecycle · observability · admin  │
//!                         └──────────────────────────────────────────────┘
//! ```

use std::path::PathBuf;
use std::process::ExitCode;
use std::sync::Arc;

use clap::Parser;
use tokio::net::TcpListener;

use layer_console::config::load_or_default;
use layer_console::http::HttpServer;
use layer_console::lifecycle::{prepare, signals, Shutdown};
use layer_console::observability::{logging, metrics};

#[derive(Parser)]
#[command(name = "layer-console")]
#[command(about = "Layered operations console dev server", long_about = None)]
struct Args {
    /// TOML configuration file; built-in defaults when omitted
    #[arg(short, long, env = "CONSOLE_CONFIG")]
    config: Option<PathBuf>,
}

#[tokio::main]
async fn main() -> ExitCode {
    let args = Args::parse();

    let config = match load_or_default(args.config.as_deref()) {
        Ok(config) => config,
        Err(e) => {
            eprintln!("Failed to load configuration: {}", e);
            return ExitCode::FAILURE;
        }
    };

    logging::init_logging(&config.observability);
    tracing::info!(version = env!("CARGO_PKG_VERSION"), "layer-console starting");

    let console = match prepare(config) {
        Ok(console) => console,
        Err(e) => {
            tracing::error!(error = %e, "Startup aborted");
            return ExitCode::FAILURE;
        }
    };

    let observability = &console.config.observability;
    if observability.metrics_enabled {
        match observability.metrics_address.parse() {
            Ok(addr) => metrics::init_metrics(addr),
            Err(_) => tracing::error!(
                metrics_address = %observability.metrics_address,
                "Failed to parse metrics address"
            ),
        }
    }

    let bind_address = console.config.server.bind_address.clone();
    let listener = match TcpListener::bind(&bind_address).await {
        Ok(listener) => listener,
        Err(e) => {
            tracing::error!(address = %bind_address, error = %e, "Failed to bind");
            return ExitCode::FAILURE;
        }
    };

    let shutdown = Arc::new(Shutdown::new());
    signals::forward_to(shutdown.clone());

    let server = HttpServer::new(console);
    if let Err(e) = server.run(listener, shutdown.subscribe()).await {
        tracing::error!(error = %e, "Server error");
        return ExitCode::FAILURE;
    }

    tracing::info!("Shutdown complete");
    ExitCode::SUCCESS
}
