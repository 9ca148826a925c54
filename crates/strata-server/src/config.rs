//! Server configuration.

use std::net::SocketAddr;
use std::path::PathBuf;

/// Configuration for the HTTP front end and the log it owns.
#[derive(Debug, Clone)]
pub struct ServerConfig {
    /// Address to bind to.
    pub bind_addr: SocketAddr,
    /// Directory holding the log's segment files.
    pub data_dir: PathBuf,
    /// Commit log limits.
    pub log: strata_log::Config,
}

impl ServerConfig {
    /// Creates a server configuration with default log limits.
    pub fn new(bind_addr: impl Into<SocketAddr>, data_dir: impl Into<PathBuf>) -> Self {
        Self {
            bind_addr: bind_addr.into(),
            data_dir: data_dir.into(),
            log: strata_log::Config::default(),
        }
    }

    /// Sets the commit log limits.
    #[must_use]
    pub fn with_log_config(mut self, log: strata_log::Config) -> Self {
        self.log = log;
        self
    }
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            bind_addr: "127.0.0.1:8080".parse().expect("valid address"),
            data_dir: PathBuf::from("./data"),
            log: strata_log::Config::default(),
        }
    }
}
