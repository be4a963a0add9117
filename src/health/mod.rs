//! Health checking.
//!
//! # State Transitions
//! ```text
//! no store configured      → Ok
//! store ping within bound  → Ok
//! store ping fails/expires → Degraded (503)
//! ```
//!
//! # Design Decisions
//! - The probe is bounded; a hanging store reads as degraded, not as a hang
//! - Health is computed per request, nothing is cached

use std::time::Duration;

use axum::{extract::State, http::StatusCode, Json};
use serde::Serialize;

use crate::http::server::AppState;
use crate::store::UserStore;

/// Outcome of a health probe.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum HealthStatus {
    Ok,
    Degraded,
}

impl HealthStatus {
    pub fn status_code(self) -> StatusCode {
        match self {
            HealthStatus::Ok => StatusCode::OK,
            HealthStatus::Degraded => StatusCode::SERVICE_UNAVAILABLE,
        }
    }
}

/// Response body: `{"status":"ok"}` or `{"status":"degraded"}`.
#[derive(Debug, Serialize)]
pub struct HealthBody {
    pub status: HealthStatus,
}

/// Probe the store, if any, within `timeout`.
pub async fn check(store: Option<&dyn UserStore>, timeout: Duration) -> HealthStatus {
    let Some(store) = store else {
        return HealthStatus::Ok;
    };

    match store.ping_within(timeout).await {
        Ok(()) => HealthStatus::Ok,
        Err(e) => {
            tracing::warn!(error = %e, "Health check failed");
            HealthStatus::Degraded
        }
    }
}

/// `GET /health`
pub async fn health(State(state): State<AppState>) -> (StatusCode, Json<HealthBody>) {
    let status = check(state.store.as_deref(), state.health_timeout).await;
    (status.status_code(), Json(HealthBody { status }))
}
