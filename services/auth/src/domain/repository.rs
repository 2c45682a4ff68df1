#![allow(async_fn_in_trait)]

use jupiter_domain::id::{SessionId, UserId};

use crate::domain::email::{EmailTemplate, TemplateVars};
use crate::domain::types::{OneTimeCode, Session, User};
use crate::error::AuthServiceError;

/// Persistence for one-time login codes, keyed by email.
pub trait OneTimeCodeRepository: Send + Sync {
    /// Insert or replace the code for `code.email` in one atomic statement.
    /// Returns the code now stored, which is authoritative under races.
    async fn upsert(&self, code: &OneTimeCode) -> Result<String, AuthServiceError>;

    async fn find_by_email(&self, email: &str) -> Result<Option<OneTimeCode>, AuthServiceError>;

    /// Delete the code for `email`. Deleting a missing code is not an error.
    /// Returns the number of rows removed (0 or 1).
    async fn delete(&self, email: &str) -> Result<u64, AuthServiceError>;
}

/// Persistence for login sessions.
pub trait SessionRepository: Send + Sync {
    /// Persist a new session and return it with its generated id.
    async fn create(
        &self,
        user_id: UserId,
        client_address: &str,
    ) -> Result<Session, AuthServiceError>;

    async fn find_by_id(&self, id: SessionId) -> Result<Option<Session>, AuthServiceError>;

    /// Delete one session. Idempotent; returns the number of rows removed (0 or 1).
    async fn delete(&self, id: SessionId) -> Result<u64, AuthServiceError>;

    /// Delete every session owned by `user_id`. Returns the number removed.
    async fn delete_all_for_user(&self, user_id: UserId) -> Result<u64, AuthServiceError>;
}

/// User directory.
pub trait UserRepository: Send + Sync {
    async fn find_by_email(&self, email: &str) -> Result<Option<User>, AuthServiceError>;

    async fn find_by_id(&self, id: UserId) -> Result<Option<User>, AuthServiceError>;

    /// Create a user. Fails with [`AuthServiceError::Conflict`] if the email is taken.
    async fn create(&self, email: &str) -> Result<User, AuthServiceError>;
}

/// Outbound email delivery.
pub trait Notifier: Send + Sync {
    async fn send(
        &self,
        to: &str,
        template: EmailTemplate,
        vars: &TemplateVars,
    ) -> anyhow::Result<()>;
}
