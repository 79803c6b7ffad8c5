//! Slice router server.
//!
//! # Architecture Overview
//!
//! ```text
//!     Client Request
//!     ──────────────▶ http::server (axum, trace + timeout layers)
//!                          │
//!                          ▼
//!                    routing::Router ── middleware chain (root, then
//!                          │             longest matching slice mount)
//!                          ▼
//!                    route table ──▶ endpoint resolved from the owning
//!                          │         slice's container at boot
//!                          ▼
//!     Client Response ◀── NormalizedResponse
//! ```

use std::path::PathBuf;
use std::process::ExitCode;

use clap::Parser;

use slice_router::config::{load_config, AppConfig};
use slice_router::lifecycle::startup;
use slice_router::observability::logging;
use slice_router::MiddlewareRegistry;

#[derive(Parser)]
#[command(name = "slice-router")]
#[command(version, about = "Serve slice-based applications from a TOML config", long_about = None)]
struct Cli {
    /// Path to the TOML configuration file (defaults are used when omitted)
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Load, validate and build the router, print its routes, then exit
    #[arg(long)]
    check: bool,
}

#[tokio::main]
async fn main() -> ExitCode {
    let cli = Cli::parse();
    match run(cli).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            tracing::error!(error = %e, "Startup failed");
            eprintln!("error: {}", e);
            ExitCode::FAILURE
        }
    }
}

async fn run(cli: Cli) -> Result<(), startup::StartupError> {
    let middleware = MiddlewareRegistry::with_builtins();
    let config = match &cli.config {
        Some(path) => load_config(path, &middleware)?,
        None => AppConfig::default(),
    };

    logging::init(&config.observability);
    tracing::info!(
        version = env!("CARGO_PKG_VERSION"),
        bind_address = %config.server.bind_address,
        slices = config.slices.len(),
        "slice-router starting"
    );

    let router = startup::build_router(&config, &middleware)?;

    if cli.check {
        for route in router.routes() {
            println!("{:<7} {:<32} {}", route.method.as_str(), route.path, route.endpoint);
        }
        return Ok(());
    }

    startup::run(config, router).await
}
