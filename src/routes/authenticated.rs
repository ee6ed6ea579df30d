use crate::{AppState, handlers};
use axum::{
    Router,
    routing::{get, post},
};

/// Authenticated Router Module
///
/// Everything a logged-in student can do. The router is layered with the
/// authentication middleware in `create_router`; handlers that need the caller's
/// identity also take `AuthUser` directly.
pub fn authenticated_routes() -> Router<AppState> {
    Router::<AppState>::new()
        // POST /auth/logout
        // Closes the session behind the bearer token.
        .route("/auth/logout", post(handlers::logout))
        // GET /me
        .route("/me", get(handlers::get_me))
        // GET /me/items
        // The caller's own reports, filterable like the public listing.
        .route("/me/items", get(handlers::get_my_items))
        // POST /items
        // Report a lost or found item; it starts out pending.
        .route("/items", post(handlers::create_item))
        // GET /items/{id}
        .route("/items/{id}", get(handlers::get_item))
}
