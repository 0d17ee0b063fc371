use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;

/// App-wide error type. Every fallible function returns `Result<T, AppError>`.
/// Converts into an axum response so handlers can use `?` all the way down.
#[derive(Debug, thiserror::Error)]
pub enum AppError {
    #[error("Validation error: {0}")]
    Validation(String),

    #[error("Not found: {0}")]
    NotFound(String),

    /// Failure from the draft backend or the generative-AI API. The inner
    /// string is logged but never shown to clients verbatim.
    #[error("Upstream error: {0}")]
    Upstream(String),

    /// The model returned malformed output where structured output was
    /// required (e.g. the refinement stage expected `{title, poem}` JSON).
    #[error("Parse error: {0}")]
    Parse(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    Serde(#[from] serde_json::Error),

    #[error("{0}")]
    Internal(String),
}

impl AppError {
    /// Stable machine-readable kind string, mirrored in the response body.
    pub fn kind(&self) -> &'static str {
        match self {
            AppError::Validation(_) => "validation",
            AppError::NotFound(_) => "not_found",
            AppError::Upstream(_) => "upstream",
            AppError::Parse(_) => "parse",
            AppError::Io(_) => "io",
            AppError::Serde(_) => "serde",
            AppError::Internal(_) => "internal",
        }
    }

    fn status(&self) -> StatusCode {
        match self {
            AppError::Validation(_) => StatusCode::BAD_REQUEST,
            AppError::NotFound(_) => StatusCode::NOT_FOUND,
            _ => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    /// Message safe to put on the wire. Upstream internals stay in the logs.
    pub fn client_message(&self) -> String {
        match self {
            AppError::Upstream(_) => "Failed to generate poem".to_string(),
            other => other.to_string(),
        }
    }
}

/// All handler errors become `{ error, kind }` JSON with an appropriate
/// status code. No raw errors cross the external interface.
impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        if matches!(self, AppError::Upstream(_)) {
            tracing::error!(kind = self.kind(), "upstream failure: {}", self);
        }
        let body = Json(serde_json::json!({
            "error": self.client_message(),
            "kind": self.kind(),
        }));
        (self.status(), body).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_kind_strings() {
        assert_eq!(AppError::Validation("x".into()).kind(), "validation");
        assert_eq!(AppError::NotFound("x".into()).kind(), "not_found");
        assert_eq!(AppError::Upstream("x".into()).kind(), "upstream");
        assert_eq!(AppError::Parse("x".into()).kind(), "parse");
    }

    #[test]
    fn test_status_mapping() {
        assert_eq!(AppError::Validation("x".into()).status(), StatusCode::BAD_REQUEST);
        assert_eq!(AppError::NotFound("x".into()).status(), StatusCode::NOT_FOUND);
        assert_eq!(
            AppError::Upstream("x".into()).status(),
            StatusCode::INTERNAL_SERVER_ERROR
        );
    }

    #[test]
    fn test_upstream_message_is_generic() {
        let err = AppError::Upstream("connection refused to 10.0.0.5:8000".into());
        assert_eq!(err.client_message(), "Failed to generate poem");
        // Non-upstream errors keep their message
        let err = AppError::Validation("style is required".into());
        assert!(err.client_message().contains("style is required"));
    }
}
