//! Bearer access-token gate for protected routes.
//!
//! [`require_access_token`] verifies the `Authorization` header and stores the
//! caller's identity in request extensions; handlers behind it read that
//! identity with the [`AuthenticatedUser`] extractor. No store is consulted.

use std::sync::Arc;

use axum::extract::{FromRequestParts, Request, State};
use axum::middleware::Next;
use axum::response::Response;
use http::header::AUTHORIZATION;
use http::request::Parts;

use jupiter_core::error::AppError;
use jupiter_domain::id::UserId;

use crate::token::TokenCodec;

const BEARER_PREFIX: &str = "Bearer ";

/// Identity of the caller, attached by [`require_access_token`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AuthenticatedUser {
    pub user_id: UserId,
    pub email: String,
}

/// Credential part of an `Authorization` value: the literal `"Bearer "` prefix
/// is stripped when present. Returns `None` when nothing is left.
pub fn bearer_credential(header_value: &str) -> Option<&str> {
    let token = header_value
        .strip_prefix(BEARER_PREFIX)
        .unwrap_or(header_value);
    (!token.is_empty()).then_some(token)
}

/// Middleware verifying the bearer access token.
///
/// Apply with `axum::middleware::from_fn_with_state(codec, require_access_token)`.
pub async fn require_access_token(
    State(tokens): State<Arc<TokenCodec>>,
    mut request: Request,
    next: Next,
) -> Result<Response, AppError> {
    let token = request
        .headers()
        .get(AUTHORIZATION)
        .and_then(|v| v.to_str().ok())
        .and_then(bearer_credential)
        .ok_or(AppError::Unauthorized("No token provided"))?;

    let identity = tokens.verify_access_token(token).map_err(|e| {
        tracing::debug!(error = %e, "access token rejected");
        AppError::Unauthorized("Invalid token")
    })?;

    request.extensions_mut().insert(AuthenticatedUser {
        user_id: identity.user_id,
        email: identity.email,
    });
    Ok(next.run(request).await)
}

impl<S> FromRequestParts<S> for AuthenticatedUser
where
    S: Send + Sync,
{
    type Rejection = AppError;

    // axum-core 0.5 declares `fn -> impl Future + Send`; read the extension
    // synchronously and return a 'static future.
    //
    // A missing identity means the route was mounted without
    // `require_access_token`, which is a server bug rather than a bad request.
    fn from_request_parts(
        parts: &mut Parts,
        _state: &S,
    ) -> impl std::future::Future<Output = Result<Self, Self::Rejection>> + Send {
        let user = parts.extensions.get::<AuthenticatedUser>().cloned();
        let path = parts.uri.path().to_owned();
        async move {
            user.ok_or_else(|| {
                AppError::Internal(anyhow::anyhow!(
                    "{path} extracts AuthenticatedUser without require_access_token"
                ))
            })
        }
    }
}
