use std::convert::Infallible;
use std::net::SocketAddr;

use axum::Json;
use axum::extract::{ConnectInfo, FromRequest, FromRequestParts, Request};
use axum::http::request::Parts;
use serde::de::DeserializeOwned;

use crate::error::AuthServiceError;

const X_FORWARDED_FOR: &str = "x-forwarded-for";

/// `Json<T>` whose rejection renders as [`AuthServiceError::InvalidInput`].
pub struct ValidJson<T>(pub T);

impl<T, S> FromRequest<S> for ValidJson<T>
where
    T: DeserializeOwned,
    S: Send + Sync,
{
    type Rejection = AuthServiceError;

    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        let Json(value) = Json::<T>::from_request(req, state)
            .await
            .map_err(|rejection| AuthServiceError::InvalidInput(rejection.body_text()))?;
        Ok(Self(value))
    }
}

/// Reject addresses that are empty or have no `@`.
pub fn validate_email(email: &str) -> Result<&str, AuthServiceError> {
    let email = email.trim();
    if email.is_empty() || !email.contains('@') {
        return Err(AuthServiceError::InvalidInput("invalid email".to_owned()));
    }
    Ok(email)
}

/// Address recorded on new sessions: the first `X-Forwarded-For` hop, then
/// the TCP peer, then `"unknown"`.
///
/// The header is taken from any peer without checking who sent it, so the
/// value is informational only. Deploy behind a proxy that overwrites
/// `X-Forwarded-For`; exposed directly, clients can record any address they like.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClientAddress(pub String);

impl<S> FromRequestParts<S> for ClientAddress
where
    S: Send + Sync,
{
    type Rejection = Infallible;

    fn from_request_parts(
        parts: &mut Parts,
        _state: &S,
    ) -> impl std::future::Future<Output = Result<Self, Self::Rejection>> + Send {
        let forwarded = parts
            .headers
            .get(X_FORWARDED_FOR)
            .and_then(|v| v.to_str().ok())
            .and_then(|v| v.split(',').next())
            .map(str::trim)
            .filter(|v| !v.is_empty())
            .map(str::to_owned);
        let address = forwarded
            .or_else(|| {
                parts
                    .extensions
                    .get::<ConnectInfo<SocketAddr>>()
                    .map(|ConnectInfo(addr)| addr.ip().to_string())
            })
            .unwrap_or_else(|| "unknown".to_owned());
        async move { Ok(Self(address)) }
    }
}
