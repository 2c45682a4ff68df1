use anyhow::Context as _;
use chrono::Utc;
use sea_orm::{
    ActiveModelTrait, ActiveValue::Set, ColumnTrait, DatabaseConnection, EntityTrait,
    QueryFilter, SqlErr, sea_query::OnConflict,
};

use jupiter_auth_schema::{one_time_codes, sessions, users};
use jupiter_domain::id::{SessionId, UserId};

use crate::domain::repository::{OneTimeCodeRepository, SessionRepository, UserRepository};
use crate::domain::types::{OneTimeCode, Session, User};
use crate::error::AuthServiceError;

// ── One-time code repository ──────────────────────────────────────────────────

#[derive(Clone)]
pub struct DbOneTimeCodeRepository {
    pub db: DatabaseConnection,
}

impl OneTimeCodeRepository for DbOneTimeCodeRepository {
    async fn upsert(&self, code: &OneTimeCode) -> Result<String, AuthServiceError> {
        let now = Utc::now();
        let row = one_time_codes::ActiveModel {
            email: Set(code.email.clone()),
            code: Set(code.code.clone()),
            expires_at: Set(code.expires_at),
            created_at: Set(now),
            updated_at: Set(now),
        };
        let stored = one_time_codes::Entity::insert(row)
            .on_conflict(
                OnConflict::column(one_time_codes::Column::Email)
                    .update_columns([
                        one_time_codes::Column::Code,
                        one_time_codes::Column::ExpiresAt,
                        one_time_codes::Column::UpdatedAt,
                    ])
                    .to_owned(),
            )
            .exec_with_returning(&self.db)
            .await
            .context("upsert one-time code")?;
        Ok(stored.code)
    }

    async fn find_by_email(&self, email: &str) -> Result<Option<OneTimeCode>, AuthServiceError> {
        let model = one_time_codes::Entity::find_by_id(email.to_owned())
            .one(&self.db)
            .await
            .context("find one-time code")?;
        Ok(model.map(|m| OneTimeCode {
            email: m.email,
            code: m.code,
            expires_at: m.expires_at,
        }))
    }

    async fn delete(&self, email: &str) -> Result<u64, AuthServiceError> {
        let result = one_time_codes::Entity::delete_by_id(email.to_owned())
            .exec(&self.db)
            .await
            .context("delete one-time code")?;
        Ok(result.rows_affected)
    }
}

// ── Session repository ────────────────────────────────────────────────────────

#[derive(Clone)]
pub struct DbSessionRepository {
    pub db: DatabaseConnection,
}

impl SessionRepository for DbSessionRepository {
    async fn create(
        &self,
        user_id: UserId,
        client_address: &str,
    ) -> Result<Session, AuthServiceError> {
        let model = sessions::ActiveModel {
            id: Set(SessionId::generate().0),
            user_id: Set(user_id.0),
            client_address: Set(client_address.to_owned()),
            created_at: Set(Utc::now()),
        }
        .insert(&self.db)
        .await
        .context("insert session")?;
        Ok(session_from_model(model))
    }

    async fn find_by_id(&self, id: SessionId) -> Result<Option<Session>, AuthServiceError> {
        let model = sessions::Entity::find_by_id(id.0)
            .one(&self.db)
            .await
            .context("find session")?;
        Ok(model.map(session_from_model))
    }

    async fn delete(&self, id: SessionId) -> Result<u64, AuthServiceError> {
        let result = sessions::Entity::delete_by_id(id.0)
            .exec(&self.db)
            .await
            .context("delete session")?;
        Ok(result.rows_affected)
    }

    async fn delete_all_for_user(&self, user_id: UserId) -> Result<u64, AuthServiceError> {
        let result = sessions::Entity::delete_many()
            .filter(sessions::Column::UserId.eq(user_id.0))
            .exec(&self.db)
            .await
            .context("delete sessions for user")?;
        Ok(result.rows_affected)
    }
}

fn session_from_model(model: sessions::Model) -> Session {
    Session {
        id: SessionId(model.id),
        user_id: UserId(model.user_id),
        client_address: model.client_address,
        created_at: model.created_at,
    }
}

// ── User repository ───────────────────────────────────────────────────────────

#[derive(Clone)]
pub struct DbUserRepository {
    pub db: DatabaseConnection,
}

impl UserRepository for DbUserRepository {
    async fn find_by_email(&self, email: &str) -> Result<Option<User>, AuthServiceError> {
        let model = users::Entity::find()
            .filter(users::Column::Email.eq(email))
            .one(&self.db)
            .await
            .context("find user by email")?;
        Ok(model.map(user_from_model))
    }

    async fn find_by_id(&self, id: UserId) -> Result<Option<User>, AuthServiceError> {
        let model = users::Entity::find_by_id(id.0)
            .one(&self.db)
            .await
            .context("find user by id")?;
        Ok(model.map(user_from_model))
    }

    async fn create(&self, email: &str) -> Result<User, AuthServiceError> {
        let inserted = users::ActiveModel {
            id: Set(UserId::generate().0),
            email: Set(email.to_owned()),
            created_at: Set(Utc::now()),
        }
        .insert(&self.db)
        .await;

        match inserted {
            Ok(model) => Ok(user_from_model(model)),
            Err(err) if matches!(err.sql_err(), Some(SqlErr::UniqueConstraintViolation(_))) => {
                Err(AuthServiceError::Conflict)
            }
            Err(err) => Err(anyhow::Error::new(err).context("insert user").into()),
        }
    }
}

fn user_from_model(model: users::Model) -> User {
    User {
        id: UserId(model.id),
        email: model.email,
        created_at: model.created_at,
    }
}
