//! Liveness endpoint payloads.

use serde::{Deserialize, Serialize};

/// Health check status.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum HealthStatus {
    /// The service is healthy.
    Ok,
    /// The service is unhealthy.
    Unhealthy,
}

/// Response body of `GET /health`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HealthResponse {
    /// Overall status.
    pub status: HealthStatus,
    /// Server version.
    pub version: String,
    /// Uptime in seconds.
    pub uptime_seconds: u64,
    /// Lowest readable offset, absent while the log is unavailable.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub lowest_offset: Option<u64>,
    /// Highest occupied offset, absent while the log is unavailable.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub highest_offset: Option<u64>,
}
