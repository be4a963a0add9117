//! Users service.
//!
//! A small CRUD service for a `users` resource with health and metrics
//! endpoints, built with Tokio, Axum and sqlx.

use std::path::PathBuf;

use clap::Parser;
use tokio::net::TcpListener;

use users_api::config::load_config;
use users_api::lifecycle::{signals, Lifecycle};
use users_api::observability::logging::init_logging;

#[derive(Parser)]
#[command(name = "users-api")]
#[command(about = "HTTP users service with health and metrics endpoints", long_about = None)]
struct Cli {
    /// Optional TOML configuration file. Environment variables take precedence.
    #[arg(short, long)]
    config: Option<PathBuf>,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();

    let config = load_config(cli.config.as_deref())?;
    init_logging(config.observability.log_format);

    tracing::info!(
        version = env!("CARGO_PKG_VERSION"),
        bind_address = %config.listener.bind_address(),
        database_configured = !config.database.url.is_empty(),
        request_timeout_secs = config.timeouts.request_secs,
        shutdown_grace_secs = config.timeouts.shutdown_grace_secs,
        "Configuration loaded"
    );

    let listener = TcpListener::bind(config.listener.bind_address()).await?;
    tracing::info!(
        address = %listener.local_addr()?,
        "Listening for connections"
    );

    Lifecycle::new(config).run(listener, signals::termination()).await?;

    tracing::info!("Shutdown complete");
    Ok(())
}
