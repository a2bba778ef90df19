//! Shared application state for the web server.

use std::sync::Arc;
use tokio::sync::broadcast;
use serde::Serialize;
use uuid::Uuid;

use careflow_common::error::Result;
use careflow_common::{CareflowConfig, Condition};
use crate::session::{Session, SessionRegistry};

/// Events pushed to connected clients via SSE.
#[derive(Debug, Clone, Serialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum AppEvent {
    /// A task was added to a session's board
    TaskAdded {
        session_id: Uuid,
        patient_id: String,
        name: String,
        condition: Condition,
        score: u64,
    },
    /// A session was closed or evicted; its event streams end after this
    SessionClosed { session_id: Uuid },
}

impl AppEvent {
    pub fn session_id(&self) -> Uuid {
        match self {
            AppEvent::TaskAdded { session_id, .. } => *session_id,
            AppEvent::SessionClosed { session_id } => *session_id,
        }
    }
}

/// Shared state injected into every Axum handler.
pub struct AppState {
    pub config: CareflowConfig,
    pub sessions: SessionRegistry,
    /// Broadcast channel for SSE push events
    pub event_tx: broadcast::Sender<AppEvent>,
}

impl AppState {
    pub fn new(config: CareflowConfig) -> Self {
        let (event_tx, _) = broadcast::channel(256);
        let sessions = SessionRegistry::new(
            config.sessions.max_sessions,
            config.sessions.idle_ttl(),
        );
        Self { config, sessions, event_tx }
    }

    pub fn subscribe(&self) -> broadcast::Receiver<AppEvent> {
        self.event_tx.subscribe()
    }

    /// Open a session, telling subscribers of any session evicted to make room.
    pub fn open_session(&self) -> Result<Arc<Session>> {
        let opened = self.sessions.create()?;
        for session_id in opened.evicted {
            self.publish(AppEvent::SessionClosed { session_id });
        }
        Ok(opened.session)
    }

    /// Fire-and-forget; having no subscribers is not an error.
    pub fn publish(&self, event: AppEvent) {
        let _ = self.event_tx.send(event);
    }
}

pub type SharedState = Arc<AppState>;
