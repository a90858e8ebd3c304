use axum::{
    extract::DefaultBodyLimit,
    routing::{get, post},
    Router,
};

use crate::features::auth::handlers::{self, AuthState};

/// Public auth routes (no session required)
pub fn public_routes(state: AuthState) -> Router {
    let body_limit = state.max_body_size;
    Router::new()
        .route("/api/auth/login", post(handlers::login))
        .route("/api/auth/logout", post(handlers::logout))
        .route(
            "/api/auth/register",
            post(handlers::register).layer(DefaultBodyLimit::max(body_limit)),
        )
        .with_state(state)
}

/// Protected auth routes (behind the session gate)
pub fn protected_routes(state: AuthState) -> Router {
    Router::new()
        .route("/api/auth/me", get(handlers::get_me))
        .with_state(state)
}
