use chrono::{DateTime, Utc};

use jupiter_domain::id::{SessionId, UserId};

/// Number of digits in a one-time login code.
pub const ONE_TIME_CODE_LEN: usize = 6;

/// One-time code lifetime in days. Deliberately long; keep as is.
pub const ONE_TIME_CODE_TTL_DAYS: i64 = 15;

/// User identity as known to the auth service.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct User {
    pub id: UserId,
    pub email: String,
    pub created_at: DateTime<Utc>,
}

/// Outstanding login code for an email address.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OneTimeCode {
    pub email: String,
    pub code: String,
    pub expires_at: DateTime<Utc>,
}

impl OneTimeCode {
    /// A code is dead from `expires_at` onwards.
    pub fn is_expired_at(&self, now: DateTime<Utc>) -> bool {
        now >= self.expires_at
    }

    /// Exact, constant-time comparison against a submitted code.
    pub fn matches(&self, submitted: &str) -> bool {
        constant_time_eq::constant_time_eq(self.code.as_bytes(), submitted.as_bytes())
    }
}

/// Server-side login session; one refresh-token lineage.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Session {
    pub id: SessionId,
    pub user_id: UserId,
    pub client_address: String,
    pub created_at: DateTime<Utc>,
}
