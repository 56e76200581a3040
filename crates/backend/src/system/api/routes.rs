use axum::{
    routing::{get, post},
    Router,
};

use super::handlers;
use crate::shared::state::AppState;

/// Sign-in routes, reachable without a token
pub fn public_routes() -> Router<AppState> {
    Router::new()
        .route("/api/auth/token/", post(handlers::auth::login))
        .route("/api/auth/refresh/", post(handlers::auth::refresh))
        .route("/api/auth/logout/", post(handlers::auth::logout))
}

/// Profile, navigation and user management; the caller adds the auth layer
pub fn protected_routes() -> Router<AppState> {
    Router::new()
        .route("/api/profile/", get(handlers::auth::profile))
        .route("/api/navigation/", get(handlers::navigation::session))
        // ========================================
        // USERS (writes admin only)
        // ========================================
        .route(
            "/api/users/",
            get(handlers::users::list).post(handlers::users::create),
        )
        .route(
            "/api/users/:id/",
            get(handlers::users::get_by_id)
                .put(handlers::users::update)
                .delete(handlers::users::delete),
        )
        .route(
            "/api/users/:id/change-password/",
            post(handlers::users::change_password),
        )
}
