//! strata-server: HTTP front end for the strata commit log
//!
//! Exposes the commit log over three routes:
//!
//! - `POST /produce` — append a record, returning its offset
//! - `GET /consume/{offset}` — read the record at an offset
//! - `GET /health` — liveness probe
//!
//! The log is an explicitly owned [`Arc<Log>`] injected into handlers
//! through axum state; nothing here is process-global.
//!
//! # Example
//!
//! ```ignore
//! use std::sync::Arc;
//! use strata_log::{Config, Log};
//! use strata_server::{create_router, serve, AppState};
//!
//! let log = Arc::new(Log::new("./data", Config::default())?);
//! let router = create_router(AppState::new(log));
//! serve(router, "127.0.0.1:8080".parse()?).await?;
//! ```

mod config;
mod handlers;
mod health;
mod models;

pub use config::ServerConfig;
pub use health::{HealthResponse, HealthStatus};
pub use models::{ConsumeResponse, ProduceRequest, ProduceResponse, WireRecord};

use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Instant;

use axum::routing::{get, post};
use axum::Router;
use tracing::info;

use strata_log::Log;

/// Shared state handed to every handler.
#[derive(Clone)]
pub struct AppState {
    /// The commit log behind the API.
    pub log: Arc<Log>,
    /// Server start time, for uptime reporting.
    started: Instant,
}

impl AppState {
    /// Creates the handler state around an owned log.
    pub fn new(log: Arc<Log>) -> Self {
        Self {
            log,
            started: Instant::now(),
        }
    }
}

/// Builds the API router.
pub fn create_router(state: AppState) -> Router {
    Router::new()
        .route("/produce", post(handlers::produce))
        .route("/consume/:offset", get(handlers::consume))
        .route("/health", get(handlers::health))
        .with_state(state)
}

/// Serves the router until a shutdown signal arrives.
pub async fn serve(router: Router, addr: SocketAddr) -> std::io::Result<()> {
    let listener = tokio::net::TcpListener::bind(addr).await?;
    info!(%addr, "listening");

    axum::serve(listener, router)
        .with_graceful_shutdown(shutdown_signal())
        .await
}

async fn shutdown_signal() {
    tokio::signal::ctrl_c()
        .await
        .expect("failed to install ctrl-c handler");
    info!("shutdown signal received");
}
