use axum::{
    Router, middleware,
    routing::{get, post},
};
use tower_http::trace::TraceLayer;

use jupiter_auth_types::bearer::require_access_token;
use jupiter_core::middleware::{propagate_request_id_layer, request_id_layer};

use crate::handlers::{
    health::{healthz, readyz},
    login::{login, request_login},
    me::me,
    session::{logout, logout_all_sessions, refresh},
};
use crate::state::AppState;

pub fn build_router(state: AppState) -> Router {
    let protected = Router::new()
        .route("/auth/me", get(me))
        .route_layer(middleware::from_fn_with_state(
            state.tokens.clone(),
            require_access_token,
        ));

    Router::new()
        // Health
        .route("/healthz", get(healthz))
        .route("/readyz", get(readyz))
        // Login
        .route("/auth/request-login", post(request_login))
        .route("/auth/login", post(login))
        // Session
        .route("/auth/refresh", post(refresh))
        .route("/auth/logout", post(logout))
        .route("/auth/logout-all-sessions", post(logout_all_sessions))
        .merge(protected)
        .with_state(state)
        .layer(propagate_request_id_layer())
        .layer(TraceLayer::new_for_http())
        .layer(request_id_layer())
}
