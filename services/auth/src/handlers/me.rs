use axum::Json;
use serde::Serialize;

use jupiter_auth_types::bearer::AuthenticatedUser;
use jupiter_domain::id::UserId;

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
pub struct MeResponse {
    pub user_id: UserId,
    pub email: String,
}

/// `GET /auth/me`. Echoes the identity the access-token gate attached.
pub async fn me(user: AuthenticatedUser) -> Json<MeResponse> {
    Json(MeResponse {
        user_id: user.user_id,
        email: user.email,
    })
}
