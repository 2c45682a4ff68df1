use chrono::{Duration, Utc};
use rand::RngExt;

use crate::domain::repository::OneTimeCodeRepository;
use crate::domain::types::{ONE_TIME_CODE_LEN, ONE_TIME_CODE_TTL_DAYS, OneTimeCode};
use crate::error::AuthServiceError;

/// Six independent uniform decimal digits; repeats allowed.
pub fn generate_code() -> String {
    let mut rng = rand::rng();
    (0..ONE_TIME_CODE_LEN)
        .map(|_| char::from(b'0' + rng.random_range(0..10u8)))
        .collect()
}

/// Issues and consumes single-use login codes on top of a repository.
pub struct OneTimeCodeStore<C: OneTimeCodeRepository> {
    pub codes: C,
}

impl<C: OneTimeCodeRepository> OneTimeCodeStore<C> {
    pub fn new(codes: C) -> Self {
        Self { codes }
    }

    /// Mint a code for `email`, replacing any outstanding one.
    pub async fn issue(&self, email: &str) -> Result<String, AuthServiceError> {
        let code = OneTimeCode {
            email: email.to_owned(),
            code: generate_code(),
            expires_at: Utc::now() + Duration::days(ONE_TIME_CODE_TTL_DAYS),
        };
        self.codes.upsert(&code).await
    }

    /// Check `submitted` against the stored code and delete it on success.
    ///
    /// Absent, mismatched and expired codes all fail with
    /// [`AuthServiceError::InvalidCode`]. An expired code is deleted as well.
    ///
    /// The delete decides the winner: of two concurrent calls that both see a
    /// matching code, only the one that removes the row succeeds.
    pub async fn consume(&self, email: &str, submitted: &str) -> Result<(), AuthServiceError> {
        let stored = self
            .codes
            .find_by_email(email)
            .await?
            .ok_or(AuthServiceError::InvalidCode)?;

        if stored.is_expired_at(Utc::now()) {
            self.codes.delete(email).await?;
            return Err(AuthServiceError::InvalidCode);
        }
        if !stored.matches(submitted) {
            return Err(AuthServiceError::InvalidCode);
        }

        if self.codes.delete(email).await? == 0 {
            return Err(AuthServiceError::InvalidCode);
        }
        Ok(())
    }
}
