use std::sync::Arc;

use tracing::{info, warn};

use jupiter_auth_types::token::{RefreshIdentity, TokenCodec};
use jupiter_domain::id::SessionId;

use crate::domain::repository::{SessionRepository, UserRepository};
use crate::domain::types::Session;
use crate::error::AuthServiceError;

/// What a logout call did. Logout always succeeds for the caller; this exists
/// so the handler can log which case it hit.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RevokeOutcome {
    Revoked { sessions: u64 },
    Skipped(SkipReason),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SkipReason {
    MissingCookie,
    InvalidToken,
    SessionNotFound,
    StoreError,
}

impl From<SkipReason> for RevokeOutcome {
    fn from(reason: SkipReason) -> Self {
        Self::Skipped(reason)
    }
}

/// Verify a refresh token and resolve the session it names.
///
/// The session row is the authority: a well-signed token whose session was
/// deleted resolves to `SessionNotFound`.
async fn resolve_session<S: SessionRepository>(
    tokens: &TokenCodec,
    sessions: &S,
    refresh_token: Option<&str>,
) -> Result<Session, SkipReason> {
    let token = refresh_token.ok_or(SkipReason::MissingCookie)?;
    let RefreshIdentity { session_id, .. } = tokens
        .verify_refresh_token(token)
        .map_err(|_| SkipReason::InvalidToken)?;
    match sessions.find_by_id(session_id).await {
        Ok(Some(session)) => Ok(session),
        Ok(None) => Err(SkipReason::SessionNotFound),
        Err(e) => {
            warn!(session_id = %session_id, error = ?e, "session lookup failed");
            Err(SkipReason::StoreError)
        }
    }
}

// ── Refresh ──────────────────────────────────────────────────────────────────

#[derive(Debug)]
pub struct RefreshOutput {
    pub session_id: SessionId,
    pub access_token: String,
    pub access_token_exp: u64,
    pub refresh_token: String,
}

pub struct RefreshTokenUseCase<S: SessionRepository, U: UserRepository> {
    pub sessions: S,
    pub users: U,
    pub tokens: Arc<TokenCodec>,
}

impl<S: SessionRepository, U: UserRepository> RefreshTokenUseCase<S, U> {
    /// Rotate the refresh token of a live session and mint a new access token.
    ///
    /// On failure the named session is revoked if the token could be parsed.
    /// The caller clears the cookie either way.
    pub async fn execute(
        &self,
        refresh_token: Option<&str>,
    ) -> Result<RefreshOutput, AuthServiceError> {
        let result = self.rotate(refresh_token).await;
        if let Err(ref e) = result {
            self.revoke_after_failure(refresh_token, e).await;
        }
        result
    }

    async fn rotate(&self, refresh_token: Option<&str>) -> Result<RefreshOutput, AuthServiceError> {
        let token = refresh_token.ok_or(AuthServiceError::Unauthorized)?;
        let identity = self
            .tokens
            .verify_refresh_token(token)
            .map_err(|_| AuthServiceError::Unauthorized)?;

        let session = self
            .sessions
            .find_by_id(identity.session_id)
            .await?
            .ok_or(AuthServiceError::Unauthorized)?;
        let user = self
            .users
            .find_by_id(session.user_id)
            .await?
            .ok_or(AuthServiceError::Unauthorized)?;

        let refresh = self
            .tokens
            .sign_refresh_token(session.id)
            .map_err(|e| AuthServiceError::Internal(e.into()))?;
        let access = self
            .tokens
            .sign_access_token(user.id, &user.email)
            .map_err(|e| AuthServiceError::Internal(e.into()))?;

        info!(user_id = %user.id, session_id = %session.id, "refresh token rotated");
        Ok(RefreshOutput {
            session_id: session.id,
            access_token: access.token,
            access_token_exp: access.exp,
            refresh_token: refresh.token,
        })
    }

    async fn revoke_after_failure(&self, refresh_token: Option<&str>, cause: &AuthServiceError) {
        // Only a session that failed to authenticate is revoked. A store or
        // signing failure leaves it alive so the client can retry.
        if !matches!(cause, AuthServiceError::Unauthorized) {
            return;
        }
        let Some(identity) = refresh_token.and_then(|t| self.tokens.verify_refresh_token(t).ok())
        else {
            return;
        };
        match self.sessions.delete(identity.session_id).await {
            Ok(removed) => info!(
                session_id = %identity.session_id,
                removed,
                cause = cause.kind(),
                "session revoked after failed refresh"
            ),
            Err(e) => warn!(
                session_id = %identity.session_id,
                error = ?e,
                "failed to revoke session after failed refresh"
            ),
        }
    }
}

// ── Logout ───────────────────────────────────────────────────────────────────

pub struct LogoutUseCase<S: SessionRepository> {
    pub sessions: S,
    pub tokens: Arc<TokenCodec>,
}

impl<S: SessionRepository> LogoutUseCase<S> {
    /// Delete the session named by the refresh token. Never fails.
    pub async fn execute(&self, refresh_token: Option<&str>) -> RevokeOutcome {
        let session = match resolve_session(&self.tokens, &self.sessions, refresh_token).await {
            Ok(session) => session,
            Err(reason) => return reason.into(),
        };
        match self.sessions.delete(session.id).await {
            Ok(sessions) => {
                info!(user_id = %session.user_id, session_id = %session.id, "session revoked");
                RevokeOutcome::Revoked { sessions }
            }
            Err(e) => {
                warn!(session_id = %session.id, error = ?e, "session delete failed");
                SkipReason::StoreError.into()
            }
        }
    }
}

// ── LogoutAllSessions ────────────────────────────────────────────────────────

pub struct LogoutAllSessionsUseCase<S: SessionRepository> {
    pub sessions: S,
    pub tokens: Arc<TokenCodec>,
}

impl<S: SessionRepository> LogoutAllSessionsUseCase<S> {
    /// Delete every session of the user owning the named session. Never fails.
    pub async fn execute(&self, refresh_token: Option<&str>) -> RevokeOutcome {
        let session = match resolve_session(&self.tokens, &self.sessions, refresh_token).await {
            Ok(session) => session,
            Err(reason) => return reason.into(),
        };
        match self.sessions.delete_all_for_user(session.user_id).await {
            Ok(sessions) => {
                info!(user_id = %session.user_id, sessions, "all sessions revoked");
                RevokeOutcome::Revoked { sessions }
            }
            Err(e) => {
                warn!(user_id = %session.user_id, error = ?e, "session delete failed");
                SkipReason::StoreError.into()
            }
        }
    }
}
