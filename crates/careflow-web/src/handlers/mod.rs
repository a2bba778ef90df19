//! HTTP handlers for all web routes.

pub mod board;
pub mod sessions;
pub mod tasks;
pub mod health;
