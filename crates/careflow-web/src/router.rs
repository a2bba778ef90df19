//! Axum router — maps all URL paths to handlers.

use axum::{
    Router,
    routing::{delete, get, post},
};
use tower_http::{
    services::ServeDir,
    cors::CorsLayer,
    trace::TraceLayer,
    compression::CompressionLayer,
};
use std::sync::Arc;
use crate::state::{AppState, SharedState};
use crate::handlers::{
    board::{index, board_page, board_submit},
    sessions::{api_create_session, api_close_session},
    tasks::{api_list_tasks, api_add_task, api_summary},
    health::health,
};
use crate::sse::session_events;

/// Build and return the full Axum router.
pub fn build_router(state: AppState) -> Router {
    let static_dir = state.config.server.static_dir.clone();
    let shared: SharedState = Arc::new(state);

    Router::new()
        // Pages
        .route("/",                     get(index))
        .route("/sessions/{id}",        get(board_page))
        .route("/sessions/{id}/tasks",  post(board_submit))

        // SSE streaming
        .route("/api/sessions/{id}/events", get(session_events))

        // API endpoints
        .route("/api/health",               get(health))
        .route("/api/sessions",             post(api_create_session))
        .route("/api/sessions/{id}",        delete(api_close_session))
        .route("/api/sessions/{id}/tasks",  get(api_list_tasks).post(api_add_task))
        .route("/api/sessions/{id}/summary", get(api_summary))

        // Static files
        .nest_service("/static", ServeDir::new(static_dir))

        // Middleware
        .layer(CorsLayer::permissive())
        .layer(CompressionLayer::new())
        .layer(TraceLayer::new_for_http())
        .with_state(shared)
}
