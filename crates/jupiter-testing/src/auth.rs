//! Auth helpers for tests that call protected routes.

use http::header::AUTHORIZATION;
use http::{HeaderMap, HeaderValue};
use uuid::Uuid;

use jupiter_auth_types::token::{TokenCodec, TokenSecrets};
use jupiter_domain::id::UserId;

pub const TEST_ACCESS_TOKEN_SECRET: &str = "test-access-secret-for-unit-tests-only";
pub const TEST_REFRESH_TOKEN_SECRET: &str = "test-refresh-secret-for-unit-tests-only";

pub fn test_secrets() -> TokenSecrets {
    TokenSecrets {
        access_token_secret: TEST_ACCESS_TOKEN_SECRET.to_owned(),
        refresh_token_secret: TEST_REFRESH_TOKEN_SECRET.to_owned(),
    }
}

/// Codec signing with the fixed test secrets.
pub fn test_codec() -> TokenCodec {
    TokenCodec::new(&test_secrets())
}

/// Caller identity presented as a bearer access token.
pub struct MockAuth {
    pub user_id: UserId,
    pub email: String,
}

impl MockAuth {
    pub fn new(email: &str) -> Self {
        Self {
            user_id: UserId(Uuid::new_v4()),
            email: email.to_owned(),
        }
    }

    /// `Authorization: Bearer <access token>` signed by `codec`.
    pub fn headers(&self, codec: &TokenCodec) -> HeaderMap {
        let issued = codec
            .sign_access_token(self.user_id, &self.email)
            .expect("sign test access token");
        let mut map = HeaderMap::new();
        map.insert(
            AUTHORIZATION,
            HeaderValue::from_str(&format!("Bearer {}", issued.token))
                .expect("token is a valid header value"),
        );
        map
    }
}
