use std::sync::Arc;

use tracing::info;

use jupiter_auth_types::token::TokenCodec;
use jupiter_domain::id::SessionId;

use crate::domain::email::{EmailTemplate, OneTimePasswordVars};
use crate::domain::repository::{Notifier, OneTimeCodeRepository, SessionRepository, UserRepository};
use crate::domain::types::User;
use crate::error::AuthServiceError;
use crate::usecase::one_time_code::OneTimeCodeStore;

// ── RequestLogin ─────────────────────────────────────────────────────────────

pub struct RequestLoginUseCase<C: OneTimeCodeRepository, N: Notifier> {
    pub codes: OneTimeCodeStore<C>,
    pub notifier: N,
}

impl<C: OneTimeCodeRepository, N: Notifier> RequestLoginUseCase<C, N> {
    /// Issue a code for `email` and mail it.
    ///
    /// If delivery fails the code stays issued; asking again replaces it.
    pub async fn execute(&self, email: &str) -> Result<(), AuthServiceError> {
        let code = self.codes.issue(email).await?;

        let vars = OneTimePasswordVars { code }.into();
        self.notifier
            .send(email, EmailTemplate::OneTimePassword, &vars)
            .await
            .map_err(AuthServiceError::Delivery)?;

        info!("one-time code issued");
        Ok(())
    }
}

// ── Login ────────────────────────────────────────────────────────────────────

pub struct LoginInput {
    pub email: String,
    pub code: String,
    pub client_address: String,
}

#[derive(Debug)]
pub struct LoginOutput {
    pub user: User,
    pub session_id: SessionId,
    pub access_token: String,
    pub access_token_exp: u64,
    pub refresh_token: String,
}

pub struct LoginUseCase<C, U, S>
where
    C: OneTimeCodeRepository,
    U: UserRepository,
    S: SessionRepository,
{
    pub codes: OneTimeCodeStore<C>,
    pub users: U,
    pub sessions: S,
    pub tokens: Arc<TokenCodec>,
}

impl<C, U, S> LoginUseCase<C, U, S>
where
    C: OneTimeCodeRepository,
    U: UserRepository,
    S: SessionRepository,
{
    pub async fn execute(&self, input: LoginInput) -> Result<LoginOutput, AuthServiceError> {
        // 1. Burn the code; every failure reads as InvalidCode.
        self.codes.consume(&input.email, &input.code).await?;

        // 2. Resolve or create the user
        let user = self.find_or_create_user(&input.email).await?;

        // 3. Open a session
        let session = self.sessions.create(user.id, &input.client_address).await?;
        info!(user_id = %user.id, session_id = %session.id, "session created");

        // 4. Mint the token pair
        let refresh = self
            .tokens
            .sign_refresh_token(session.id)
            .map_err(|e| AuthServiceError::Internal(e.into()))?;
        let access = self
            .tokens
            .sign_access_token(user.id, &user.email)
            .map_err(|e| AuthServiceError::Internal(e.into()))?;

        Ok(LoginOutput {
            user,
            session_id: session.id,
            access_token: access.token,
            access_token_exp: access.exp,
            refresh_token: refresh.token,
        })
    }

    /// Lookup-then-create is not atomic: a concurrent first login for the same
    /// email may win the insert, in which case its row is read back.
    async fn find_or_create_user(&self, email: &str) -> Result<User, AuthServiceError> {
        if let Some(user) = self.users.find_by_email(email).await? {
            return Ok(user);
        }
        match self.users.create(email).await {
            Ok(user) => {
                info!(user_id = %user.id, "user created");
                Ok(user)
            }
            Err(AuthServiceError::Conflict) => self
                .users
                .find_by_email(email)
                .await?
                .ok_or_else(|| anyhow::anyhow!("user missing after conflicting insert").into()),
            Err(e) => Err(e),
        }
    }
}
