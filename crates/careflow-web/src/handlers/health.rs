//! Liveness probe.

use axum::{extract::State, Json};
use serde::Serialize;

use crate::state::SharedState;

#[derive(Debug, Serialize)]
pub struct HealthRes {
    pub status: &'static str,
    pub version: &'static str,
    pub active_sessions: usize,
}

/// GET /api/health
pub async fn health(State(state): State<SharedState>) -> Json<HealthRes> {
    Json(HealthRes {
        status: "ok",
        version: env!("CARGO_PKG_VERSION"),
        active_sessions: state.sessions.len(),
    })
}
