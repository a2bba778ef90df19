//! Configuration loading for Careflow.
//!
//! Reads careflow.toml from the current directory or the path in the
//! CAREFLOW_CONFIG env var. Every field has a default, so a missing file or a
//! partial file still yields a usable config.

use serde::{Deserialize, Serialize};
use std::net::SocketAddr;
use std::path::Path;

use crate::error::{CareflowError, Result};

pub const CONFIG_ENV_VAR: &str = "CAREFLOW_CONFIG";
pub const DEFAULT_CONFIG_PATH: &str = "careflow.toml";

/// Complete service configuration.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct CareflowConfig {
    #[serde(default)]
    pub server: ServerConfig,

    #[serde(default)]
    pub sessions: SessionConfig,

    #[serde(default)]
    pub intake: IntakeConfig,

    #[serde(default)]
    pub logging: LoggingConfig,
}

// ── Server ───────────────────────────────────────────────────────────────────

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ServerConfig {
    #[serde(default = "default_host")]
    pub host: String,

    #[serde(default = "default_port")]
    pub port: u16,

    /// Directory served under /static
    #[serde(default = "default_static_dir")]
    pub static_dir: String,
}

fn default_host()       -> String { "127.0.0.1".to_string() }
fn default_port()       -> u16    { 3001 }
fn default_static_dir() -> String { "static".to_string() }

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
            static_dir: default_static_dir(),
        }
    }
}

impl ServerConfig {
    pub fn socket_addr(&self) -> Result<SocketAddr> {
        format!("{}:{}", self.host, self.port)
            .parse()
            .map_err(|e| CareflowError::Config(format!("invalid bind address {}:{}: {e}", self.host, self.port)))
    }
}

// ── Sessions ─────────────────────────────────────────────────────────────────

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SessionConfig {
    /// Upper bound on concurrently open UI sessions
    #[serde(default = "default_max_sessions")]
    pub max_sessions: usize,

    /// Sessions untouched for longer than this are evicted when a new one opens
    #[serde(default = "default_idle_ttl_secs")]
    pub idle_ttl_secs: u64,
}

fn default_max_sessions()  -> usize { 1024 }
fn default_idle_ttl_secs() -> u64   { 30 * 60 }

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            max_sessions: default_max_sessions(),
            idle_ttl_secs: default_idle_ttl_secs(),
        }
    }
}

impl SessionConfig {
    pub fn idle_ttl(&self) -> std::time::Duration {
        std::time::Duration::from_secs(self.idle_ttl_secs)
    }
}

// ── Intake ───────────────────────────────────────────────────────────────────

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct IntakeConfig {
    /// Inclusive upper bound for the age field
    #[serde(default = "default_max_age")]
    pub max_age: u8,

    /// Rows returned by listings when the caller gives no limit (0 = all)
    #[serde(default)]
    pub default_limit: usize,
}

fn default_max_age() -> u8 { 120 }

impl Default for IntakeConfig {
    fn default() -> Self {
        Self { max_age: default_max_age(), default_limit: 0 }
    }
}

// ── Logging ──────────────────────────────────────────────────────────────────

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LoggingConfig {
    /// EnvFilter directive used when RUST_LOG is unset
    #[serde(default = "default_log_filter")]
    pub filter: String,
}

fn default_log_filter() -> String { "careflow=debug,info".to_string() }

impl Default for LoggingConfig {
    fn default() -> Self {
        Self { filter: default_log_filter() }
    }
}

// ── Loading ──────────────────────────────────────────────────────────────────

impl CareflowConfig {
    /// Load configuration.
    /// Reads `.env` if present, then checks CAREFLOW_CONFIG, then the current
    /// directory. A missing file falls back to defaults.
    pub fn load() -> Result<Self> {
        let _ = dotenvy::dotenv();

        let path = std::env::var(CONFIG_ENV_VAR)
            .unwrap_or_else(|_| DEFAULT_CONFIG_PATH.to_string());

        if !Path::new(&path).exists() {
            tracing::warn!(path = %path, "config file not found, using defaults");
            return Ok(Self::default());
        }

        let config = Self::from_toml_file(&path)?;
        tracing::info!(path = %path, "configuration loaded");
        Ok(config)
    }

    pub fn from_toml_file(path: impl AsRef<Path>) -> Result<Self> {
        let content = std::fs::read_to_string(path)?;
        Self::from_toml_str(&content)
    }

    pub fn from_toml_str(content: &str) -> Result<Self> {
        let config: Self = toml::from_str(content)?;
        config.validate()?;
        Ok(config)
    }

    /// Load from YAML file
    pub fn from_yaml(path: impl AsRef<Path>) -> Result<Self> {
        let content = std::fs::read_to_string(path)?;
        let config: Self = serde_yaml::from_str(&content)?;
        config.validate()?;
        Ok(config)
    }

    pub fn to_toml_string(&self) -> Result<String> {
        toml::to_string_pretty(self).map_err(|e| CareflowError::Config(e.to_string()))
    }

    pub fn validate(&self) -> Result<()> {
        if self.server.port == 0 {
            return Err(CareflowError::Config("server.port must be non-zero".into()));
        }
        if self.sessions.max_sessions == 0 {
            return Err(CareflowError::Config("sessions.max_sessions must be at least 1".into()));
        }
        if self.sessions.idle_ttl_secs == 0 {
            return Err(CareflowError::Config("sessions.idle_ttl_secs must be at least 1".into()));
        }
        if self.intake.max_age > 150 {
            return Err(CareflowError::Config(format!(
                "intake.max_age {} is outside the plausible range (<= 150)",
                self.intake.max_age
            )));
        }
        Ok(())
    }
}

// ── Tests ─────────────────────────────────────────────────────────────────────
