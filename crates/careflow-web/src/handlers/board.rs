//! Triage board page: intake sidebar form plus the ranked task table.

use axum::{
    extract::{Path, State},
    response::{Html, Redirect},
    Form,
};
use serde::Deserialize;
use tracing::warn;
use uuid::Uuid;

use careflow_common::{ApiError, Condition, NewTask};
use careflow_ranker::BoardSummary;
use crate::handlers::tasks::{ranked_tasks, record_task, validate_intake, RankedTask};
use crate::state::SharedState;

/// Navigation HTML shared across pages
pub const NAV_HTML: &str = r#"<nav class="sidebar">
    <a href="/" class="brand">Careflow</a>
    <a href="/" class="nav-link">New board</a>
    <a href="/api/health" class="nav-link">Health</a>
</nav>"#;

#[derive(Deserialize)]
pub struct TaskForm {
    #[serde(default)]
    pub patient_id: String,
    #[serde(default)]
    pub name: String,
    /// Kept as text so a malformed number becomes a 400, not an extractor rejection
    #[serde(default)]
    pub age: String,
    #[serde(default)]
    pub condition: String,
    #[serde(default)]
    pub vitals: String,
    #[serde(default)]
    pub lab_results: String,
}

impl TaskForm {
    fn into_new_task(self) -> Result<NewTask, ApiError> {
        let age = self.age.trim().parse::<u8>().map_err(|_| {
            ApiError::BadRequest(format!("age must be a whole number, got {:?}", self.age))
        })?;
        Ok(NewTask {
            patient_id: self.patient_id,
            name: self.name,
            age,
            condition: Condition::from(self.condition.as_str()),
            vitals: self.vitals,
            lab_results: self.lab_results,
        })
    }
}

/// GET / — open a fresh board
pub async fn index(State(state): State<SharedState>) -> Result<Redirect, ApiError> {
    let session = state.open_session()?;
    Ok(Redirect::to(&format!("/sessions/{}", session.id)))
}

/// GET /sessions/{id}
pub async fn board_page(
    State(state): State<SharedState>,
    Path(session_id): Path<Uuid>,
) -> Result<Html<String>, ApiError> {
    let session = state.sessions.get(session_id)?;
    let rows = ranked_tasks(&session, 0);
    let summary = session.with_board(|board| board.summary());
    Ok(Html(render_board(session_id, state.config.intake.max_age, &summary, &rows)))
}

/// POST /sessions/{id}/tasks — form submission, then back to the board
pub async fn board_submit(
    State(state): State<SharedState>,
    Path(session_id): Path<Uuid>,
    Form(form): Form<TaskForm>,
) -> Result<Redirect, ApiError> {
    let session = state.sessions.get(session_id)?;
    let input = form.into_new_task().inspect_err(|e| {
        warn!(session = %session_id, error = %e, "intake form rejected");
    })?;
    validate_intake(&input, state.config.intake.max_age)?;
    record_task(&state, &session, input);
    Ok(Redirect::to(&format!("/sessions/{session_id}")))
}

fn escape_html(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    for c in s.chars() {
        match c {
            '&'  => out.push_str("&amp;"),
            '<'  => out.push_str("&lt;"),
            '>'  => out.push_str("&gt;"),
            '"'  => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            _    => out.push(c),
        }
    }
    out
}

fn condition_badge(condition: Condition) -> &'static str {
    match condition {
        Condition::Critical => r#"<span class="badge badge-danger">Critical</span>"#,
        Condition::Serious  => r#"<span class="badge badge-warning">Serious</span>"#,
        Condition::Stable   => r#"<span class="badge badge-success">Stable</span>"#,
    }
}

fn render_board(session_id: Uuid, max_age: u8, summary: &BoardSummary, rows: &[RankedTask]) -> String {
    let rows_html = if rows.is_empty() {
        r#"<tr><td colspan="9" class="text-center text-muted">No tasks yet. Add a patient from the sidebar.</td></tr>"#.to_string()
    } else {
        rows.iter().map(|row| {
            let t = &row.task;
            format!(r#"
            <tr>
                <td><span class="rank-badge">#{}</span></td>
                <td>{}</td>
                <td style="font-weight: 700;">{}</td>
                <td>{}</td>
                <td>{}</td>
                <td>{}</td>
                <td>{}</td>
                <td class="text-muted">{}</td>
                <td><span class="score-value">{}</span></td>
            </tr>"#,
                row.rank,
                escape_html(&t.patient_id),
                escape_html(&t.name),
                t.age,
                condition_badge(t.condition),
                escape_html(&t.vitals),
                escape_html(&t.lab_results),
                t.created_at().format("%H:%M:%S UTC"),
                t.priority_score())
        }).collect()
    };

    let options: String = Condition::ALL.iter()
        .map(|c| format!(r#"<option value="{0}">{0}</option>"#, c.as_str()))
        .collect();

    let highest = summary.highest_score
        .map(|s| s.to_string())
        .unwrap_or_else(|| "—".to_string());

    format!(r#"<!DOCTYPE html>
<html lang="en">
<head>
    <meta charset="UTF-8">
    <meta name="viewport" content="width=device-width, initial-scale=1">
    <title>Triage Board — Careflow</title>
    <link rel="stylesheet" href="/static/css/main.css">
</head>
<body>
<div class="app-container">
{nav}
<aside class="intake">
    <h2>Add Patient Task</h2>
    <form method="post" action="/sessions/{session_id}/tasks">
        <label>Patient ID <input name="patient_id" required></label>
        <label>Name <input name="name"></label>
        <label>Age <input name="age" type="number" min="0" max="{max_age}" step="1" value="0" required></label>
        <label>Condition <select name="condition">{options}</select></label>
        <label>Vitals <textarea name="vitals"></textarea></label>
        <label>Lab Results <textarea name="lab_results"></textarea></label>
        <button type="submit" class="btn btn-primary">Add Task</button>
    </form>
</aside>
<main class="main-content">
    <div class="page-header">
        <h1 class="page-title">Prioritized Tasks</h1>
        <p class="text-muted">Score = vitals length + lab results length + condition bonus</p>
    </div>

    <div class="stats-grid">
        <div class="stat-card"><div class="stat-value">{total}</div><div class="stat-label">Tasks</div></div>
        <div class="stat-card"><div class="stat-value">{critical}</div><div class="stat-label">Critical</div></div>
        <div class="stat-card"><div class="stat-value">{serious}</div><div class="stat-label">Serious</div></div>
        <div class="stat-card"><div class="stat-value">{stable}</div><div class="stat-label">Stable</div></div>
        <div class="stat-card"><div class="stat-value">{highest}</div><div class="stat-label">Top Score</div></div>
    </div>

    <div class="card">
        <table class="table">
            <thead>
                <tr>
                    <th>Rank</th><th>Patient ID</th><th>Name</th><th>Age</th>
                    <th>Condition</th><th>Vitals</th><th>Lab Results</th><th>Added</th><th>Priority</th>
                </tr>
            </thead>
            <tbody>{rows_html}</tbody>
        </table>
    </div>
</main>
</div>
<script>
    new EventSource("/api/sessions/{session_id}/events").onmessage = (e) => {{
        if (JSON.parse(e.data).type === "session_closed") location.href = "/";
        else location.reload();
    }};
</script>
</body>
</html>"#,
        nav = NAV_HTML,
        total = summary.total,
        critical = summary.critical,
        serious = summary.serious,
        stable = summary.stable,
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use careflow_ranker::PatientTask;

    fn form(age: &str, condition: &str) -> TaskForm {
        TaskForm {
            patient_id: "1".into(),
            name: "A".into(),
            age: age.into(),
            condition: condition.into(),
            vitals: "BP120".into(),
            lab_results: "WBC5".into(),
        }
    }

    #[test]
    fn test_form_parses_age_and_condition() {
        let task = form(" 30 ", "Unknown").into_new_task().unwrap();
        assert_eq!(task.age, 30);
        assert_eq!(task.condition, Condition::Stable);
    }

    #[test]
    fn test_form_rejects_malformed_age() {
        assert!(matches!(form("thirty", "Stable").into_new_task(), Err(ApiError::BadRequest(_))));
        assert!(matches!(form("-1", "Stable").into_new_task(), Err(ApiError::BadRequest(_))));
        assert!(matches!(form("", "Stable").into_new_task(), Err(ApiError::BadRequest(_))));
    }

    #[test]
    fn test_escape_html() {
        assert_eq!(escape_html("<b>\"x\" & 'y'</b>"), "&lt;b&gt;&quot;x&quot; &amp; &#39;y&#39;&lt;/b&gt;");
    }

    #[test]
    fn test_render_empty_board() {
        let html = render_board(Uuid::nil(), 120, &BoardSummary::default(), &[]);
        assert!(html.contains("No tasks yet"));
        assert!(html.contains(r#"max="120""#));
        assert!(html.contains(r#"<option value="Critical">Critical</option>"#));
    }

    #[test]
    fn test_render_row_shows_added_time() {
        let task = PatientTask::score(form("30", "Serious").into_new_task().unwrap());
        let added = task.created_at().format("%H:%M:%S UTC").to_string();
        let rows = [RankedTask { rank: 1, task }];
        let html = render_board(Uuid::nil(), 120, &BoardSummary::default(), &rows);
        assert!(html.contains("<th>Added</th>"));
        assert!(html.contains(&format!(r#"<td class="text-muted">{added}</td>"#)));
        assert!(html.contains(r#"<span class="score-value">14</span>"#));
        assert!(!html.contains("No tasks yet"));
    }
}
