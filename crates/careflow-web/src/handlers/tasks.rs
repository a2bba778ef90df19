//! Task intake and ranked listing API.

use axum::{
    extract::{rejection::JsonRejection, Path, Query, State},
    http::StatusCode,
    response::IntoResponse,
    Json,
};
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};
use uuid::Uuid;

use careflow_common::{ApiError, NewTask};
use careflow_ranker::{BoardSummary, PatientTask};
use crate::session::Session;
use crate::state::{AppEvent, AppState, SharedState};

#[derive(Deserialize, Default)]
pub struct ListQuery {
    pub limit: Option<usize>,
}

#[derive(Debug, Serialize)]
pub struct RankedTask {
    pub rank: usize,
    #[serde(flatten)]
    pub task: PatientTask,
}

/// Reject input the intake form would not have let through.
pub(crate) fn validate_intake(input: &NewTask, max_age: u8) -> Result<(), ApiError> {
    if input.age > max_age {
        return Err(ApiError::BadRequest(format!(
            "age {} is outside 0..={max_age}",
            input.age
        )));
    }
    Ok(())
}

/// Add a validated task to the session's board and notify subscribers.
pub(crate) fn record_task(state: &AppState, session: &Session, input: NewTask) -> PatientTask {
    let task = session.add_task(input);
    debug!(
        session = %session.id,
        patient_id = %task.patient_id,
        score = task.priority_score(),
        "task recorded"
    );
    state.publish(AppEvent::TaskAdded {
        session_id: session.id,
        patient_id: task.patient_id.clone(),
        name: task.name.clone(),
        condition: task.condition,
        score: task.priority_score(),
    });
    task
}

/// Ranked view of a session's board, limited to `limit` rows (0 = all).
pub(crate) fn ranked_tasks(session: &Session, limit: usize) -> Vec<RankedTask> {
    session.with_board(|board| {
        let ranked = if limit == 0 { board.list_by_priority_desc() } else { board.top(limit) };
        ranked
            .into_iter()
            .enumerate()
            .map(|(i, task)| RankedTask { rank: i + 1, task: task.clone() })
            .collect()
    })
}

/// GET /api/sessions/{id}/tasks — tasks by descending priority
pub async fn api_list_tasks(
    State(state): State<SharedState>,
    Path(session_id): Path<Uuid>,
    Query(query): Query<ListQuery>,
) -> Result<impl IntoResponse, ApiError> {
    let session = state.sessions.get(session_id)?;
    let limit = query.limit.unwrap_or(state.config.intake.default_limit);
    Ok(Json(ranked_tasks(&session, limit)))
}

/// POST /api/sessions/{id}/tasks — score and add one task
///
/// A body that fails to deserialize (age out of `u8` range, non-numeric age,
/// missing fields) is a 400 with the usual JSON error body.
pub async fn api_add_task(
    State(state): State<SharedState>,
    Path(session_id): Path<Uuid>,
    payload: Result<Json<NewTask>, JsonRejection>,
) -> Result<impl IntoResponse, ApiError> {
    let session = state.sessions.get(session_id)?;
    let Json(input) = payload.inspect_err(|e| {
        warn!(session = %session_id, error = %e.body_text(), "task body rejected");
    })?;
    validate_intake(&input, state.config.intake.max_age)?;
    let task = record_task(&state, &session, input);
    Ok((StatusCode::CREATED, Json(task)))
}

/// GET /api/sessions/{id}/summary — tier counts
pub async fn api_summary(
    State(state): State<SharedState>,
    Path(session_id): Path<Uuid>,
) -> Result<Json<BoardSummary>, ApiError> {
    let session = state.sessions.get(session_id)?;
    Ok(Json(session.with_board(|board| board.summary())))
}

#[cfg(test)]
mod tests {
    use super::*;
    use careflow_common::Condition;

    fn intake(age: u8) -> NewTask {
        NewTask {
            patient_id: "1".into(),
            name: "A".into(),
            age,
            condition: Condition::Stable,
            vitals: String::new(),
            lab_results: String::new(),
        }
    }

    #[test]
    fn test_age_bounds() {
        assert!(validate_intake(&intake(0), 120).is_ok());
        assert!(validate_intake(&intake(120), 120).is_ok());
        assert!(matches!(validate_intake(&intake(121), 120), Err(ApiError::BadRequest(_))));
    }
}
