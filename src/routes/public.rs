use crate::{AppState, handlers};
use axum::{
    Router,
    routing::{get, post},
};

/// Public Router Module
///
/// Endpoints reachable without a session: the gateway into a session (register,
/// login, admin login) and the read-only item listing.
pub fn public_routes() -> Router<AppState> {
    Router::new()
        // GET /health
        // Liveness probe for load balancers.
        .route("/health", get(|| async { "ok" }))
        // POST /auth/register
        // New accounts are always students and are logged in on success.
        .route("/auth/register", post(handlers::register))
        // POST /auth/login
        .route("/auth/login", post(handlers::login))
        // POST /auth/admin/login
        // Same as login, refused for non-admin accounts.
        .route("/auth/admin/login", post(handlers::admin_login))
        // GET /items?q=...&type=...&status=...
        .route("/items", get(handlers::get_items))
}
