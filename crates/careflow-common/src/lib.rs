//! careflow-common — Shared types, errors, and configuration used across all Careflow crates.

pub mod error;
pub mod entities;
pub mod config;

// Re-export commonly used types
pub use config::{CareflowConfig, ServerConfig, SessionConfig, IntakeConfig, LoggingConfig};
pub use entities::{Condition, NewTask};
pub use error::{ApiError, CareflowError};
