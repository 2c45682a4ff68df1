use std::sync::Arc;

use sea_orm::DatabaseConnection;

use jupiter_auth_types::cookie::CookieSettings;
use jupiter_auth_types::token::TokenCodec;

use crate::infra::db::{DbOneTimeCodeRepository, DbSessionRepository, DbUserRepository};
use crate::infra::email::EmailNotifier;
use crate::usecase::one_time_code::OneTimeCodeStore;

/// Shared application state passed to every handler via axum `State`.
#[derive(Clone)]
pub struct AppState {
    pub db: DatabaseConnection,
    pub tokens: Arc<TokenCodec>,
    pub cookies: CookieSettings,
    pub notifier: EmailNotifier,
}

impl AppState {
    pub fn one_time_codes(&self) -> OneTimeCodeStore<DbOneTimeCodeRepository> {
        OneTimeCodeStore::new(DbOneTimeCodeRepository {
            db: self.db.clone(),
        })
    }

    pub fn session_repo(&self) -> DbSessionRepository {
        DbSessionRepository {
            db: self.db.clone(),
        }
    }

    pub fn user_repo(&self) -> DbUserRepository {
        DbUserRepository {
            db: self.db.clone(),
        }
    }
}
