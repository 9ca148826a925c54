//! HTTP handlers for the commit log API.

use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::Json;
use tracing::error;

use strata_log::Error;

use crate::health::{HealthResponse, HealthStatus};
use crate::models::{ConsumeResponse, ProduceRequest, ProduceResponse, WireRecord};
use crate::AppState;

/// `POST /produce` — append a record, returning its assigned offset.
pub async fn produce(
    State(state): State<AppState>,
    Json(req): Json<ProduceRequest>,
) -> Result<Json<ProduceResponse>, StatusCode> {
    let offset = state.log.append(req.record.value).map_err(|err| {
        error!(error = %err, "append failed");
        StatusCode::INTERNAL_SERVER_ERROR
    })?;

    Ok(Json(ProduceResponse { offset }))
}

/// `GET /consume/{offset}` — read the record at an offset.
///
/// Offsets outside the log map to 404; everything else is a server fault.
pub async fn consume(
    State(state): State<AppState>,
    Path(offset): Path<u64>,
) -> Result<Json<ConsumeResponse>, StatusCode> {
    match state.log.read(offset) {
        Ok(record) => Ok(Json(ConsumeResponse {
            record: WireRecord {
                offset: record.offset(),
                value: record.into_value(),
            },
        })),
        Err(Error::OffsetOutOfRange { .. }) => Err(StatusCode::NOT_FOUND),
        Err(err) => {
            error!(error = %err, offset, "read failed");
            Err(StatusCode::INTERNAL_SERVER_ERROR)
        }
    }
}

/// `GET /health` — liveness probe with the log's offset bounds.
pub async fn health(State(state): State<AppState>) -> Json<HealthResponse> {
    let lowest = state.log.lowest_offset().ok();
    let highest = state.log.highest_offset().ok();

    let status = if lowest.is_some() {
        HealthStatus::Ok
    } else {
        HealthStatus::Unhealthy
    };

    Json(HealthResponse {
        status,
        version: env!("CARGO_PKG_VERSION").to_string(),
        uptime_seconds: state.started.elapsed().as_secs(),
        lowest_offset: lowest,
        highest_offset: highest,
    })
}
