//! strata-server binary.
//!
//! Serves a single commit log over HTTP.
//!
//! ```bash
//! strata-server --address 127.0.0.1:8080 ./data
//! ```

use std::net::SocketAddr;
use std::path::PathBuf;
use std::sync::Arc;

use anyhow::Result;
use clap::Parser;
use tracing::info;
use tracing_subscriber::EnvFilter;

use strata_log::{Config, Log};
use strata_server::{create_router, serve, AppState, ServerConfig};

/// Single-node commit log served over HTTP.
#[derive(Parser)]
#[command(name = "strata-server")]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Path to the log's data directory.
    #[arg(default_value = "./data")]
    data_dir: PathBuf,

    /// Address to bind to.
    #[arg(short, long, default_value = "127.0.0.1:8080")]
    address: SocketAddr,

    /// Per-segment store file limit in bytes (0 = default).
    #[arg(long, default_value_t = 0)]
    max_store_bytes: u64,

    /// Per-segment index file limit in bytes (0 = default).
    #[arg(long, default_value_t = 0)]
    max_index_bytes: u64,
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| "info".into()))
        .init();

    let config = ServerConfig::new(cli.address, cli.data_dir).with_log_config(
        Config::default()
            .with_max_store_bytes(cli.max_store_bytes)
            .with_max_index_bytes(cli.max_index_bytes),
    );

    info!(data_dir = %config.data_dir.display(), "opening commit log");
    let log = Arc::new(Log::new(&config.data_dir, config.log)?);

    let router = create_router(AppState::new(Arc::clone(&log)));
    serve(router, config.bind_addr).await?;

    // Graceful shutdown reached: flush buffers and truncate indexes so the
    // next start recovers cleanly.
    log.close()?;
    info!("log closed");

    Ok(())
}
