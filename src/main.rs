//! Order relay (v1)
//!
//! Backend for the order-taking web form.
//!
//! # Architecture Overview
//!
//! ```text
//!                        ┌──────────────────────────────────────────────┐
//!                        │                 ORDER RELAY                  │
//!   Browser form         │  ┌─────────┐    ┌──────────────┐             │
//!   ─────────────────────┼─▶│  http   │───▶│ carrier      │─────────────┼──▶ Carrier API
//!                        │  │ server  │    │ lookup proxy │             │   (cities,
//!                        │  └────┬────┘    └──────────────┘             │    warehouses)
//!                        │       │         ┌──────────────┐  ┌───────┐  │
//!                        │       └────────▶│ order intake │─▶│  bot  │──┼──▶ Bot API
//!                        │                 │ + validation │  │client │  │   (operator chat)
//!                        │                 └──────────────┘  └───────┘  │
//!                        │  config · observability · resilience ·       │
//!                        │  security · lifecycle                        │
//!                        └──────────────────────────────────────────────┘
//! ```

use std::path::PathBuf;
use std::process::ExitCode;

use clap::Parser;

use order_relay::config::{load_config, ObservabilityConfig};
use order_relay::lifecycle::{self, Shutdown};
use order_relay::observability::logging::init_logging;

#[derive(Parser)]
#[command(name = "order-relay")]
#[command(about = "Relay for carrier lookups and order notifications", long_about = None)]
struct Cli {
    /// Path to a TOML config file.
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Emit logs as JSON regardless of the config file.
    #[arg(long)]
    json_logs: bool,
}

#[tokio::main]
async fn main() -> ExitCode {
    let cli = Cli::parse();
    let _ = dotenvy::dotenv();

    let config = match load_config(cli.config.as_deref()) {
        Ok(config) => config,
        Err(e) => {
            init_logging(&ObservabilityConfig::default());
            tracing::error!(error = %e, "Invalid configuration");
            return ExitCode::FAILURE;
        }
    };

    let mut observability = config.observability.clone();
    if cli.json_logs {
        observability.log_format = order_relay::config::LogFormat::Json;
    }
    init_logging(&observability);

    tracing::info!(
        version = env!("CARGO_PKG_VERSION"),
        bind_address = %config.listener.bind_address,
        upstream_timeout_secs = config.timeouts.upstream_secs,
        "order-relay starting"
    );

    let shutdown = Shutdown::new();
    shutdown.trigger_on_signal();

    match lifecycle::start(config, &shutdown).await {
        Ok(()) => {
            tracing::info!("Shutdown complete");
            ExitCode::SUCCESS
        }
        Err(e) => {
            tracing::error!(error = %e, "Order relay stopped");
            ExitCode::FAILURE
        }
    }
}
