use anyhow::Context as _;

use jupiter_auth_types::token::TokenSecrets;
use jupiter_core::config::{optional_var, parsed_var_or, required_var};

/// Resend API credentials. Present only when `RESEND_API_KEY` is set.
#[derive(Clone)]
pub struct ResendConfig {
    pub api_key: String,
    /// Sender address. Env var: `FROM_EMAIL`.
    pub from_email: String,
}

impl std::fmt::Debug for ResendConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ResendConfig")
            .field("api_key", &"<redacted>")
            .field("from_email", &self.from_email)
            .finish()
    }
}

/// Auth service configuration loaded from environment variables.
#[derive(Debug)]
pub struct AuthConfig {
    /// PostgreSQL connection URL.
    pub database_url: String,
    /// `ACCESS_TOKEN_SECRET` and `REFRESH_TOKEN_SECRET`.
    pub token_secrets: TokenSecrets,
    /// TCP port to listen on (default 3112). Env var: `AUTH_PORT`.
    pub auth_port: u16,
    /// `RUN_MODE=debug` drops the `Secure` cookie attribute for plain-HTTP development.
    pub debug_mode: bool,
    /// Optional cookie domain attribute. Env var: `COOKIE_DOMAIN`.
    pub cookie_domain: Option<String>,
    pub resend: Option<ResendConfig>,
}

impl AuthConfig {
    pub fn from_env() -> anyhow::Result<Self> {
        let token_secrets = TokenSecrets {
            access_token_secret: required_var("ACCESS_TOKEN_SECRET")?,
            refresh_token_secret: required_var("REFRESH_TOKEN_SECRET")?,
        };

        let resend = match optional_var("RESEND_API_KEY") {
            Some(api_key) => Some(ResendConfig {
                api_key,
                from_email: required_var("FROM_EMAIL")
                    .context("FROM_EMAIL is required when RESEND_API_KEY is set")?,
            }),
            None => None,
        };

        Ok(Self {
            database_url: required_var("DATABASE_URL")?,
            token_secrets,
            auth_port: parsed_var_or("AUTH_PORT", 3112)?,
            debug_mode: optional_var("RUN_MODE").is_some_and(|m| m.eq_ignore_ascii_case("debug")),
            cookie_domain: optional_var("COOKIE_DOMAIN"),
            resend,
        })
    }
}
