//! Access- and refresh-token signing and verification.
//!
//! Both token families are HS256 JWTs, each with its own secret and lifetime:
//!
//! | Family  | Claims                    | Lifetime |
//! |---------|---------------------------|----------|
//! | access  | `sub` (user id), `email`  | 10 min   |
//! | refresh | `session_id`, `jti`       | 10 days  |
//!
//! Verification is a pure function of secret and token. A refresh token that
//! verifies here can still name a session that no longer exists; callers must
//! look the session up before trusting it.

use std::fmt;

use jsonwebtoken::errors::ErrorKind;
use jsonwebtoken::{
    Algorithm, DecodingKey, EncodingKey, Header, Validation, decode, encode, get_current_timestamp,
};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};

use uuid::Uuid;

use jupiter_domain::id::{SessionId, UserId};

/// Access-token lifetime in seconds (10 minutes).
pub const ACCESS_TOKEN_TTL_SECS: u64 = 10 * 60;

/// Refresh-token lifetime in seconds (10 days). Also the refresh cookie Max-Age.
pub const REFRESH_TOKEN_TTL_SECS: u64 = 10 * 24 * 60 * 60;

/// Errors returned by [`TokenCodec`].
#[derive(Debug, thiserror::Error)]
pub enum TokenError {
    #[error("invalid signature")]
    InvalidSignature,
    #[error("token expired")]
    Expired,
    #[error("malformed token")]
    Malformed,
    #[error("failed to sign token")]
    Signing(#[source] jsonwebtoken::errors::Error),
}

/// The two signing secrets, loaded once at startup.
#[derive(Clone)]
pub struct TokenSecrets {
    pub access_token_secret: String,
    pub refresh_token_secret: String,
}

impl fmt::Debug for TokenSecrets {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TokenSecrets")
            .field("access_token_secret", &"<redacted>")
            .field("refresh_token_secret", &"<redacted>")
            .finish()
    }
}

/// Access-token claims.
#[derive(Debug, Serialize, Deserialize)]
pub struct AccessClaims {
    /// User id (UUID string).
    pub sub: String,
    pub email: String,
    /// Expiration, seconds since UNIX epoch.
    pub exp: u64,
}

/// Refresh-token claims.
#[derive(Debug, Serialize, Deserialize)]
pub struct RefreshClaims {
    /// Session id (UUID string).
    pub session_id: String,
    /// Random token id; keeps tokens rotated within the same second distinct.
    pub jti: String,
    pub exp: u64,
}

/// A freshly signed token and its absolute expiry.
#[derive(Debug, Clone)]
pub struct IssuedToken {
    pub token: String,
    pub exp: u64,
}

/// Identity carried by a verified access token.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AccessIdentity {
    pub user_id: UserId,
    pub email: String,
    pub exp: u64,
}

/// Session named by a verified refresh token.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RefreshIdentity {
    pub session_id: SessionId,
    pub exp: u64,
}

#[derive(Clone)]
struct KeyPair {
    encoding: EncodingKey,
    decoding: DecodingKey,
}

impl KeyPair {
    fn from_secret(secret: &str) -> Self {
        Self {
            encoding: EncodingKey::from_secret(secret.as_bytes()),
            decoding: DecodingKey::from_secret(secret.as_bytes()),
        }
    }
}

/// Signs and verifies both token families.
#[derive(Clone)]
pub struct TokenCodec {
    access: KeyPair,
    refresh: KeyPair,
    validation: Validation,
}

impl fmt::Debug for TokenCodec {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TokenCodec").finish_non_exhaustive()
    }
}

impl TokenCodec {
    pub fn new(secrets: &TokenSecrets) -> Self {
        if secrets.access_token_secret == secrets.refresh_token_secret {
            tracing::warn!("access and refresh token secrets are identical");
        }

        // No leeway: a token is rejected as soon as its stated lifetime ends.
        let mut validation = Validation::new(Algorithm::HS256);
        validation.validate_exp = true;
        validation.leeway = 0;
        validation.set_required_spec_claims(&["exp"]);

        Self {
            access: KeyPair::from_secret(&secrets.access_token_secret),
            refresh: KeyPair::from_secret(&secrets.refresh_token_secret),
            validation,
        }
    }

    pub fn sign_access_token(&self, user_id: UserId, email: &str) -> Result<IssuedToken, TokenError> {
        self.sign_access_token_at(user_id, email, get_current_timestamp())
    }

    /// Sign an access token as if issued at `issued_at` (seconds since epoch).
    pub fn sign_access_token_at(
        &self,
        user_id: UserId,
        email: &str,
        issued_at: u64,
    ) -> Result<IssuedToken, TokenError> {
        let exp = issued_at + ACCESS_TOKEN_TTL_SECS;
        let claims = AccessClaims {
            sub: user_id.to_string(),
            email: email.to_owned(),
            exp,
        };
        let token = sign(&claims, &self.access.encoding)?;
        Ok(IssuedToken { token, exp })
    }

    pub fn verify_access_token(&self, token: &str) -> Result<AccessIdentity, TokenError> {
        let claims: AccessClaims = self.verify(token, &self.access.decoding)?;
        let user_id = claims.sub.parse().map_err(|_| TokenError::Malformed)?;
        Ok(AccessIdentity {
            user_id,
            email: claims.email,
            exp: claims.exp,
        })
    }

    pub fn sign_refresh_token(&self, session_id: SessionId) -> Result<IssuedToken, TokenError> {
        self.sign_refresh_token_at(session_id, get_current_timestamp())
    }

    pub fn sign_refresh_token_at(
        &self,
        session_id: SessionId,
        issued_at: u64,
    ) -> Result<IssuedToken, TokenError> {
        let exp = issued_at + REFRESH_TOKEN_TTL_SECS;
        let claims = RefreshClaims {
            session_id: session_id.to_string(),
            jti: Uuid::new_v4().to_string(),
            exp,
        };
        let token = sign(&claims, &self.refresh.encoding)?;
        Ok(IssuedToken { token, exp })
    }

    pub fn verify_refresh_token(&self, token: &str) -> Result<RefreshIdentity, TokenError> {
        let claims: RefreshClaims = self.verify(token, &self.refresh.decoding)?;
        let session_id = claims
            .session_id
            .parse()
            .map_err(|_| TokenError::Malformed)?;
        Ok(RefreshIdentity {
            session_id,
            exp: claims.exp,
        })
    }

    fn verify<T: DeserializeOwned>(&self, token: &str, key: &DecodingKey) -> Result<T, TokenError> {
        decode::<T>(token, key, &self.validation)
            .map(|data| data.claims)
            .map_err(|e| match e.kind() {
                ErrorKind::ExpiredSignature => TokenError::Expired,
                ErrorKind::InvalidSignature => TokenError::InvalidSignature,
                _ => TokenError::Malformed,
            })
    }
}

fn sign<T: Serialize>(claims: &T, key: &EncodingKey) -> Result<String, TokenError> {
    encode(&Header::new(Algorithm::HS256), claims, key).map_err(TokenError::Signing)
}
