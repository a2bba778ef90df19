//! Session lifecycle API.

use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::IntoResponse,
    Json,
};
use chrono::{DateTime, Utc};
use serde::Serialize;
use uuid::Uuid;

use careflow_common::ApiError;
use crate::state::{AppEvent, SharedState};

#[derive(Debug, Serialize)]
pub struct SessionCreated {
    pub session_id: Uuid,
    pub created_at: DateTime<Utc>,
}

/// POST /api/sessions
pub async fn api_create_session(
    State(state): State<SharedState>,
) -> Result<impl IntoResponse, ApiError> {
    let session = state.open_session()?;
    let body = SessionCreated { session_id: session.id, created_at: session.created_at };
    Ok((StatusCode::CREATED, Json(body)))
}

/// DELETE /api/sessions/{id}
pub async fn api_close_session(
    State(state): State<SharedState>,
    Path(session_id): Path<Uuid>,
) -> Result<StatusCode, ApiError> {
    state.sessions.remove(session_id)?;
    state.publish(AppEvent::SessionClosed { session_id });
    Ok(StatusCode::NO_CONTENT)
}
