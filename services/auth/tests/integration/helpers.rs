use std::collections::HashMap;
use std::sync::{Arc, Mutex};

use chrono::{DateTime, Duration, Utc};

use jupiter_auth::domain::email::{EmailTemplate, TemplateVars};
use jupiter_auth::domain::repository::{
    Notifier, OneTimeCodeRepository, SessionRepository, UserRepository,
};
use jupiter_auth::domain::types::{OneTimeCode, Session, User};
use jupiter_auth::error::AuthServiceError;
use jupiter_auth::usecase::login::{LoginUseCase, RequestLoginUseCase};
use jupiter_auth::usecase::one_time_code::OneTimeCodeStore;
use jupiter_auth::usecase::session::{
    LogoutAllSessionsUseCase, LogoutUseCase, RefreshTokenUseCase,
};
use jupiter_auth_types::token::TokenCodec;
use jupiter_domain::id::{SessionId, UserId};
use jupiter_testing::auth::test_codec;

fn store_failure() -> AuthServiceError {
    AuthServiceError::Internal(anyhow::anyhow!("store unavailable"))
}

// ── MockOneTimeCodeRepo ──────────────────────────────────────────────────────

#[derive(Clone, Default)]
pub struct MockOneTimeCodeRepo {
    pub codes: Arc<Mutex<HashMap<String, OneTimeCode>>>,
}

impl MockOneTimeCodeRepo {
    pub fn with(codes: Vec<OneTimeCode>) -> Self {
        let repo = Self::default();
        repo.codes
            .lock()
            .unwrap()
            .extend(codes.into_iter().map(|c| (c.email.clone(), c)));
        repo
    }

    pub fn get(&self, email: &str) -> Option<OneTimeCode> {
        self.codes.lock().unwrap().get(email).cloned()
    }
}

impl OneTimeCodeRepository for MockOneTimeCodeRepo {
    async fn upsert(&self, code: &OneTimeCode) -> Result<String, AuthServiceError> {
        self.codes
            .lock()
            .unwrap()
            .insert(code.email.clone(), code.clone());
        Ok(code.code.clone())
    }

    async fn find_by_email(&self, email: &str) -> Result<Option<OneTimeCode>, AuthServiceError> {
        Ok(self.get(email))
    }

    async fn delete(&self, email: &str) -> Result<u64, AuthServiceError> {
        Ok(self.codes.lock().unwrap().remove(email).map_or(0, |_| 1))
    }
}

// ── MockSessionRepo ──────────────────────────────────────────────────────────

#[derive(Clone, Default)]
pub struct MockSessionRepo {
    pub sessions: Arc<Mutex<Vec<Session>>>,
    /// Every call fails with an internal error.
    pub broken: bool,
}

impl MockSessionRepo {
    pub fn broken() -> Self {
        Self {
            broken: true,
            ..Self::default()
        }
    }

    pub fn all(&self) -> Vec<Session> {
        self.sessions.lock().unwrap().clone()
    }

    pub fn contains(&self, id: SessionId) -> bool {
        self.sessions.lock().unwrap().iter().any(|s| s.id == id)
    }
}

impl SessionRepository for MockSessionRepo {
    async fn create(
        &self,
        user_id: UserId,
        client_address: &str,
    ) -> Result<Session, AuthServiceError> {
        if self.broken {
            return Err(store_failure());
        }
        let session = Session {
            id: SessionId::generate(),
            user_id,
            client_address: client_address.to_owned(),
            created_at: Utc::now(),
        };
        self.sessions.lock().unwrap().push(session.clone());
        Ok(session)
    }

    async fn find_by_id(&self, id: SessionId) -> Result<Option<Session>, AuthServiceError> {
        if self.broken {
            return Err(store_failure());
        }
        Ok(self
            .sessions
            .lock()
            .unwrap()
            .iter()
            .find(|s| s.id == id)
            .cloned())
    }

    async fn delete(&self, id: SessionId) -> Result<u64, AuthServiceError> {
        if self.broken {
            return Err(store_failure());
        }
        let mut sessions = self.sessions.lock().unwrap();
        let before = sessions.len();
        sessions.retain(|s| s.id != id);
        Ok((before - sessions.len()) as u64)
    }

    async fn delete_all_for_user(&self, user_id: UserId) -> Result<u64, AuthServiceError> {
        if self.broken {
            return Err(store_failure());
        }
        let mut sessions = self.sessions.lock().unwrap();
        let before = sessions.len();
        sessions.retain(|s| s.user_id != user_id);
        Ok((before - sessions.len()) as u64)
    }
}

// ── MockUserRepo ─────────────────────────────────────────────────────────────

#[derive(Clone, Default)]
pub struct MockUserRepo {
    pub users: Arc<Mutex<Vec<User>>>,
    /// Inserted just before `create` runs, as if a concurrent login won the race.
    pub racing_insert: Option<User>,
    /// Lookups fail with an internal error.
    pub broken: bool,
}

impl MockUserRepo {
    pub fn with(users: Vec<User>) -> Self {
        Self {
            users: Arc::new(Mutex::new(users)),
            racing_insert: None,
            broken: false,
        }
    }

    pub fn broken() -> Self {
        Self {
            broken: true,
            ..Self::default()
        }
    }

    pub fn all(&self) -> Vec<User> {
        self.users.lock().unwrap().clone()
    }
}

impl UserRepository for MockUserRepo {
    async fn find_by_email(&self, email: &str) -> Result<Option<User>, AuthServiceError> {
        if self.broken {
            return Err(store_failure());
        }
        Ok(self
            .users
            .lock()
            .unwrap()
            .iter()
            .find(|u| u.email == email)
            .cloned())
    }

    async fn find_by_id(&self, id: UserId) -> Result<Option<User>, AuthServiceError> {
        if self.broken {
            return Err(store_failure());
        }
        Ok(self
            .users
            .lock()
            .unwrap()
            .iter()
            .find(|u| u.id == id)
            .cloned())
    }

    async fn create(&self, email: &str) -> Result<User, AuthServiceError> {
        let mut users = self.users.lock().unwrap();
        if let Some(winner) = &self.racing_insert {
            if !users.iter().any(|u| u.id == winner.id) {
                users.push(winner.clone());
            }
        }
        if users.iter().any(|u| u.email == email) {
            return Err(AuthServiceError::Conflict);
        }
        let user = test_user(email);
        users.push(user.clone());
        Ok(user)
    }
}

// ── RecordingNotifier ────────────────────────────────────────────────────────

#[derive(Debug, Clone)]
pub struct SentEmail {
    pub to: String,
    pub template: EmailTemplate,
    pub html: String,
}

#[derive(Clone, Default)]
pub struct RecordingNotifier {
    pub sent: Arc<Mutex<Vec<SentEmail>>>,
    pub fail: bool,
}

impl RecordingNotifier {
    pub fn failing() -> Self {
        Self {
            fail: true,
            ..Self::default()
        }
    }

    pub fn sent(&self) -> Vec<SentEmail> {
        self.sent.lock().unwrap().clone()
    }
}

impl Notifier for RecordingNotifier {
    async fn send(
        &self,
        to: &str,
        template: EmailTemplate,
        vars: &TemplateVars,
    ) -> anyhow::Result<()> {
        if self.fail {
            anyhow::bail!("smtp relay refused connection");
        }
        self.sent.lock().unwrap().push(SentEmail {
            to: to.to_owned(),
            template,
            html: template.render(vars),
        });
        Ok(())
    }
}

// ── Harness ──────────────────────────────────────────────────────────────────

/// In-memory stores shared by every use case built from it.
pub struct Harness {
    pub codes: MockOneTimeCodeRepo,
    pub users: MockUserRepo,
    pub sessions: MockSessionRepo,
    pub notifier: RecordingNotifier,
    pub tokens: Arc<TokenCodec>,
}

impl Default for Harness {
    fn default() -> Self {
        Self {
            codes: MockOneTimeCodeRepo::default(),
            users: MockUserRepo::default(),
            sessions: MockSessionRepo::default(),
            notifier: RecordingNotifier::default(),
            tokens: Arc::new(test_codec()),
        }
    }
}

impl Harness {
    pub fn request_login(&self) -> RequestLoginUseCase<MockOneTimeCodeRepo, RecordingNotifier> {
        RequestLoginUseCase {
            codes: OneTimeCodeStore::new(self.codes.clone()),
            notifier: self.notifier.clone(),
        }
    }

    pub fn login(&self) -> LoginUseCase<MockOneTimeCodeRepo, MockUserRepo, MockSessionRepo> {
        LoginUseCase {
            codes: OneTimeCodeStore::new(self.codes.clone()),
            users: self.users.clone(),
            sessions: self.sessions.clone(),
            tokens: self.tokens.clone(),
        }
    }

    pub fn refresh(&self) -> RefreshTokenUseCase<MockSessionRepo, MockUserRepo> {
        RefreshTokenUseCase {
            sessions: self.sessions.clone(),
            users: self.users.clone(),
            tokens: self.tokens.clone(),
        }
    }

    pub fn logout(&self) -> LogoutUseCase<MockSessionRepo> {
        LogoutUseCase {
            sessions: self.sessions.clone(),
            tokens: self.tokens.clone(),
        }
    }

    pub fn logout_all(&self) -> LogoutAllSessionsUseCase<MockSessionRepo> {
        LogoutAllSessionsUseCase {
            sessions: self.sessions.clone(),
            tokens: self.tokens.clone(),
        }
    }
}

// ── Test fixture helpers ─────────────────────────────────────────────────────

pub const TEST_EMAIL: &str = "a@x.com";
pub const TEST_CLIENT_ADDRESS: &str = "203.0.113.7";

pub fn test_user(email: &str) -> User {
    User {
        id: UserId::generate(),
        email: email.to_owned(),
        created_at: Utc::now(),
    }
}

pub fn test_code(email: &str, code: &str, expires_at: DateTime<Utc>) -> OneTimeCode {
    OneTimeCode {
        email: email.to_owned(),
        code: code.to_owned(),
        expires_at,
    }
}

/// A code for `email` valid for the usual fifteen days.
pub fn fresh_code(email: &str, code: &str) -> OneTimeCode {
    test_code(email, code, Utc::now() + Duration::days(15))
}

/// Pull the six-digit code out of a rendered one-time password email.
pub fn code_from_email(html: &str) -> String {
    let (_, rest) = html
        .split_once("Your one-time password is: ")
        .expect("code line in email body");
    rest.chars().take(6).collect()
}
