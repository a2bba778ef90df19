//! careflow-web — Web surface for Careflow.
//! Provides a per-session triage board with:
//!   - Patient task intake form
//!   - Priority-ranked task table
//!   - JSON API for sessions, tasks and tier summaries
//!   - Live task events over SSE

pub mod router;
pub mod handlers;
pub mod session;
pub mod state;
pub mod sse;
