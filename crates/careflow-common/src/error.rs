use axum::{
    extract::rejection::JsonRejection,
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use thiserror::Error;
use uuid::Uuid;

#[derive(Debug, Error)]
pub enum CareflowError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("TOML parse error: {0}")]
    TomlParse(#[from] toml::de::Error),

    #[error("YAML parse error: {0}")]
    YamlParse(#[from] serde_yaml::Error),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Session not found: {0}")]
    SessionNotFound(Uuid),

    #[error("Session limit reached ({0} active sessions)")]
    SessionLimitReached(usize),

    #[error("Invalid input: {0}")]
    InvalidInput(String),

    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

pub type Result<T> = std::result::Result<T, CareflowError>;

/// Errors surfaced to HTTP clients. Every variant renders as
/// `{ "error": "<message>" }` with the matching status code.
#[derive(Debug, Error)]
pub enum ApiError {
    #[error("{0}")]
    NotFound(String),

    #[error("{0}")]
    BadRequest(String),

    #[error("{0}")]
    Unavailable(String),

    #[error("{0}")]
    Internal(String),
}

impl ApiError {
    pub fn status(&self) -> StatusCode {
        match self {
            ApiError::NotFound(_)    => StatusCode::NOT_FOUND,
            ApiError::BadRequest(_)  => StatusCode::BAD_REQUEST,
            ApiError::Unavailable(_) => StatusCode::SERVICE_UNAVAILABLE,
            ApiError::Internal(_)    => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl From<CareflowError> for ApiError {
    fn from(err: CareflowError) -> Self {
        match err {
            CareflowError::SessionNotFound(_)     => ApiError::NotFound(err.to_string()),
            CareflowError::SessionLimitReached(_) => ApiError::Unavailable(err.to_string()),
            CareflowError::InvalidInput(_)        => ApiError::BadRequest(err.to_string()),
            other                                 => ApiError::Internal(other.to_string()),
        }
    }
}

/// Malformed JSON bodies (bad syntax, wrong types, out-of-range numbers)
/// are client errors like any other invalid input.
impl From<JsonRejection> for ApiError {
    fn from(rejection: JsonRejection) -> Self {
        ApiError::BadRequest(rejection.body_text())
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status();
        if status.is_server_error() {
            tracing::error!(%status, error = %self, "request failed");
        } else {
            tracing::warn!(%status, error = %self, "request rejected");
        }
        let body = Json(serde_json::json!({ "error": self.to_string() }));
        (status, body).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_session_errors_map_to_client_statuses() {
        let missing: ApiError = CareflowError::SessionNotFound(Uuid::nil()).into();
        assert_eq!(missing.status(), StatusCode::NOT_FOUND);

        let full: ApiError = CareflowError::SessionLimitReached(4).into();
        assert_eq!(full.status(), StatusCode::SERVICE_UNAVAILABLE);

        let bad: ApiError = CareflowError::InvalidInput("age".into()).into();
        assert_eq!(bad.status(), StatusCode::BAD_REQUEST);
    }

    #[test]
    fn test_config_error_is_internal() {
        let err: ApiError = CareflowError::Config("port must be non-zero".into()).into();
        assert_eq!(err.status(), StatusCode::INTERNAL_SERVER_ERROR);
        assert!(err.to_string().contains("port must be non-zero"));
    }
}
