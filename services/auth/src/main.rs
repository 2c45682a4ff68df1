use std::net::SocketAddr;
use std::sync::Arc;

use anyhow::Context as _;
use sea_orm::Database;
use tracing::{info, warn};

use jupiter_auth::config::AuthConfig;
use jupiter_auth::infra::email::{EmailNotifier, LogNotifier, ResendNotifier};
use jupiter_auth::router::build_router;
use jupiter_auth::state::AppState;
use jupiter_auth_types::cookie::CookieSettings;
use jupiter_auth_types::token::TokenCodec;
use jupiter_core::tracing::init_tracing;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    init_tracing();

    let config = AuthConfig::from_env().context("load auth config")?;

    let db = Database::connect(&config.database_url)
        .await
        .context("connect to database")?;

    let notifier = match config.resend {
        Some(resend) => EmailNotifier::Resend(ResendNotifier::new(resend.api_key, resend.from_email)),
        None => {
            warn!("RESEND_API_KEY not set, emails will only be logged");
            EmailNotifier::Log(LogNotifier)
        }
    };
    if config.debug_mode {
        warn!("debug mode: refresh-token cookie is sent without the Secure attribute");
    }

    let state = AppState {
        db,
        tokens: Arc::new(TokenCodec::new(&config.token_secrets)),
        cookies: CookieSettings::new(config.debug_mode, config.cookie_domain),
        notifier,
    };

    let router = build_router(state);
    let addr = format!("0.0.0.0:{}", config.auth_port);
    let listener = tokio::net::TcpListener::bind(&addr)
        .await
        .with_context(|| format!("bind {addr}"))?;

    info!("auth service listening on {addr}");
    axum::serve(
        listener,
        router.into_make_service_with_connect_info::<SocketAddr>(),
    )
    .await
    .context("server error")?;
    Ok(())
}
