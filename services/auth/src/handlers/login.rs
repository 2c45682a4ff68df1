use axum::{
    Json,
    extract::State,
    http::{HeaderName, HeaderValue},
    response::IntoResponse,
};
use axum_extra::extract::CookieJar;
use serde::{Deserialize, Serialize};

use jupiter_auth_types::cookie::set_refresh_token_cookie;

use crate::error::AuthServiceError;
use crate::handlers::extract::{ClientAddress, ValidJson, validate_email};
use crate::state::AppState;
use crate::usecase::login::{LoginInput, LoginUseCase, RequestLoginUseCase};

pub const X_ACCESS_TOKEN_EXPIRES: &str = "x-access-token-expires";

pub(crate) fn token_expires_header(exp: u64) -> [(HeaderName, HeaderValue); 1] {
    [(
        HeaderName::from_static(X_ACCESS_TOKEN_EXPIRES),
        HeaderValue::from(exp),
    )]
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AccessTokenResponse {
    pub access_token: String,
}

// ── POST /auth/request-login ──────────────────────────────────────────────────

#[derive(Deserialize)]
pub struct RequestLoginRequest {
    pub email: String,
}

#[derive(Serialize)]
pub struct MessageResponse {
    pub message: &'static str,
}

pub async fn request_login(
    State(state): State<AppState>,
    ValidJson(body): ValidJson<RequestLoginRequest>,
) -> Result<Json<MessageResponse>, AuthServiceError> {
    let email = validate_email(&body.email)?;

    let usecase = RequestLoginUseCase {
        codes: state.one_time_codes(),
        notifier: state.notifier.clone(),
    };
    usecase.execute(email).await?;

    Ok(Json(MessageResponse {
        message: "One-Time Password sent",
    }))
}

// ── POST /auth/login ──────────────────────────────────────────────────────────

#[derive(Deserialize)]
pub struct LoginRequest {
    pub email: String,
    pub code: String,
}

pub async fn login(
    State(state): State<AppState>,
    ClientAddress(client_address): ClientAddress,
    jar: CookieJar,
    ValidJson(body): ValidJson<LoginRequest>,
) -> Result<impl IntoResponse, AuthServiceError> {
    let email = validate_email(&body.email)?;

    let usecase = LoginUseCase {
        codes: state.one_time_codes(),
        users: state.user_repo(),
        sessions: state.session_repo(),
        tokens: state.tokens.clone(),
    };
    let out = usecase
        .execute(LoginInput {
            email: email.to_owned(),
            code: body.code,
            client_address,
        })
        .await?;

    let jar = set_refresh_token_cookie(jar, out.refresh_token, &state.cookies);
    Ok((
        jar,
        token_expires_header(out.access_token_exp),
        Json(AccessTokenResponse {
            access_token: out.access_token,
        }),
    ))
}
