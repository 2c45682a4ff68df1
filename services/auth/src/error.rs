use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};

use jupiter_core::error::error_response;

/// Auth service error variants.
///
/// Messages are fixed strings: wrong, expired and missing codes all read the
/// same, and storage or delivery causes never reach the client.
#[derive(Debug, thiserror::Error)]
pub enum AuthServiceError {
    #[error("invalid input: {0}")]
    InvalidInput(String),
    #[error("invalid code")]
    InvalidCode,
    #[error("invalid token")]
    Unauthorized,
    #[error("conflict")]
    Conflict,
    #[error("failed to deliver email")]
    Delivery(#[source] anyhow::Error),
    #[error("internal error")]
    Internal(#[from] anyhow::Error),
}

impl AuthServiceError {
    pub fn kind(&self) -> &'static str {
        match self {
            Self::InvalidInput(_) => "INVALID_INPUT",
            Self::InvalidCode => "INVALID_CODE",
            Self::Unauthorized => "UNAUTHORIZED",
            Self::Conflict => "CONFLICT",
            Self::Delivery(_) => "DELIVERY_FAILURE",
            Self::Internal(_) => "INTERNAL",
        }
    }

    pub fn status(&self) -> StatusCode {
        match self {
            Self::InvalidInput(_) => StatusCode::BAD_REQUEST,
            Self::InvalidCode | Self::Unauthorized => StatusCode::UNAUTHORIZED,
            Self::Conflict => StatusCode::CONFLICT,
            Self::Delivery(_) | Self::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl IntoResponse for AuthServiceError {
    fn into_response(self) -> Response {
        // 4xx are expected client errors and TraceLayer records their status.
        // Opaque failures need their cause chain in the log.
        match &self {
            Self::Internal(e) => {
                tracing::error!(error = %format!("{e:#}"), kind = self.kind(), "internal error");
            }
            Self::Delivery(e) => {
                tracing::error!(error = %format!("{e:#}"), kind = self.kind(), "email delivery failed");
            }
            _ => {}
        }
        error_response(self.status(), self.kind(), &self.to_string())
    }
}
