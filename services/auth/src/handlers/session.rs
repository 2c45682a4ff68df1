use axum::{Json, extract::State, http::StatusCode, response::IntoResponse};
use axum_extra::extract::CookieJar;
use tracing::debug;

use jupiter_auth_types::cookie::{
    clear_refresh_token_cookie, refresh_token_from, set_refresh_token_cookie,
};

use crate::error::AuthServiceError;
use crate::handlers::login::{AccessTokenResponse, token_expires_header};
use crate::state::AppState;
use crate::usecase::session::{LogoutAllSessionsUseCase, LogoutUseCase, RefreshTokenUseCase};

// ── POST /auth/refresh ────────────────────────────────────────────────────────

/// Failures carry a cleared cookie so the client stops replaying a dead token.
pub async fn refresh(
    State(state): State<AppState>,
    jar: CookieJar,
) -> Result<impl IntoResponse, (CookieJar, AuthServiceError)> {
    let refresh_token = refresh_token_from(&jar);

    let usecase = RefreshTokenUseCase {
        sessions: state.session_repo(),
        users: state.user_repo(),
        tokens: state.tokens.clone(),
    };
    match usecase.execute(refresh_token.as_deref()).await {
        Ok(out) => {
            let jar = set_refresh_token_cookie(jar, out.refresh_token, &state.cookies);
            Ok((
                jar,
                token_expires_header(out.access_token_exp),
                Json(AccessTokenResponse {
                    access_token: out.access_token,
                }),
            ))
        }
        Err(e) => Err((clear_refresh_token_cookie(jar, &state.cookies), e)),
    }
}

// ── POST /auth/logout ─────────────────────────────────────────────────────────

pub async fn logout(State(state): State<AppState>, jar: CookieJar) -> impl IntoResponse {
    let refresh_token = refresh_token_from(&jar);

    let usecase = LogoutUseCase {
        sessions: state.session_repo(),
        tokens: state.tokens.clone(),
    };
    let outcome = usecase.execute(refresh_token.as_deref()).await;
    debug!(?outcome, "logout");

    (
        StatusCode::NO_CONTENT,
        clear_refresh_token_cookie(jar, &state.cookies),
    )
}

// ── POST /auth/logout-all-sessions ────────────────────────────────────────────

pub async fn logout_all_sessions(
    State(state): State<AppState>,
    jar: CookieJar,
) -> impl IntoResponse {
    let refresh_token = refresh_token_from(&jar);

    let usecase = LogoutAllSessionsUseCase {
        sessions: state.session_repo(),
        tokens: state.tokens.clone(),
    };
    let outcome = usecase.execute(refresh_token.as_deref()).await;
    debug!(?outcome, "logout all sessions");

    (
        StatusCode::NO_CONTENT,
        clear_refresh_token_cookie(jar, &state.cookies),
    )
}
