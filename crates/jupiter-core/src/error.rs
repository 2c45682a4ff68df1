use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};

/// Render the JSON error envelope shared by every service:
/// `{"kind": "...", "message": "..."}`.
pub fn error_response(status: StatusCode, kind: &str, message: &str) -> Response {
    let body = serde_json::json!({
        "kind": kind,
        "message": message,
    });
    (status, axum::Json(body)).into_response()
}

/// Errors raised by shared request plumbing (extractors, middleware).
#[derive(Debug, thiserror::Error)]
pub enum AppError {
    /// Missing or rejected credentials. The message is safe to show to clients.
    #[error("{0}")]
    Unauthorized(&'static str),
    #[error("internal server error")]
    Internal(#[from] anyhow::Error),
}

impl AppError {
    pub fn kind(&self) -> &'static str {
        match self {
            Self::Unauthorized(_) => "UNAUTHORIZED",
            Self::Internal(_) => "INTERNAL",
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = match &self {
            AppError::Unauthorized(_) => StatusCode::UNAUTHORIZED,
            AppError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        };
        // TraceLayer already records every request's status; only 500s carry a
        // cause worth logging here.
        if let Self::Internal(ref e) = self {
            tracing::error!(error = %format!("{e:#}"), kind = "INTERNAL", "internal error");
        }
        error_response(status, self.kind(), &self.to_string())
    }
}
