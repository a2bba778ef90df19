//! Server-Sent Events (SSE) streaming for live board updates.

use axum::extract::{Path, State};
use axum::response::sse::{Event, KeepAlive, Sse};
use futures_util::stream::{self, Stream};
use std::convert::Infallible;
use std::time::Duration;
use tokio::sync::broadcast::{self, error::RecvError};
use tracing::debug;
use uuid::Uuid;

use careflow_common::ApiError;
use crate::state::{AppEvent, SharedState};

/// GET /api/sessions/{id}/events — events for one session only.
///
/// The stream ends right after the session's `session_closed` event.
pub async fn session_events(
    State(state): State<SharedState>,
    Path(session_id): Path<Uuid>,
) -> Result<Sse<impl Stream<Item = Result<Event, Infallible>>>, ApiError> {
    // 404 before opening the stream
    state.sessions.get(session_id)?;

    let rx = state.subscribe();
    let stream = stream::unfold(Some(rx), move |rx| async move {
        let mut rx = rx?;
        let event = next_for_session(&mut rx, session_id).await?;
        let closed = matches!(event, AppEvent::SessionClosed { .. });
        let data = serde_json::to_string(&event).unwrap_or_default();
        let frame: Result<Event, Infallible> = Ok(Event::default().data(data));
        if closed {
            debug!(session = %session_id, "event stream finished");
            Some((frame, None))
        } else {
            Some((frame, Some(rx)))
        }
    });

    Ok(Sse::new(stream).keep_alive(
        KeepAlive::new()
            .interval(Duration::from_secs(15))
            .text("ping"),
    ))
}

/// Next event addressed to `session_id`; `None` once the channel is gone.
async fn next_for_session(
    rx: &mut broadcast::Receiver<AppEvent>,
    session_id: Uuid,
) -> Option<AppEvent> {
    loop {
        match rx.recv().await {
            Ok(event) if event.session_id() == session_id => return Some(event),
            Ok(_) => continue,
            // Lagged receivers skip the missed events
            Err(RecvError::Lagged(skipped)) => {
                debug!(session = %session_id, skipped, "event subscriber lagged");
            }
            Err(RecvError::Closed) => return None,
        }
    }
}
