use crate::{AppState, handlers};
use axum::{
    Router,
    routing::{get, put},
};

/// Admin Router Module
///
/// Moderation endpoints. `create_router` wraps this router in the admin middleware,
/// and the status update is checked again by the item repository.
pub fn admin_routes() -> Router<AppState> {
    Router::new()
        // GET /admin/stats
        // Pending/verified/resolved and lost/found counts for the dashboard.
        .route("/stats", get(handlers::get_admin_stats))
        // GET /admin/items?q=...&type=...&status=...
        // Every item, with the status actions still available for each.
        .route("/items", get(handlers::get_admin_items))
        // PUT /admin/items/{id}/status
        // Verify or resolve an item, recording the acting admin.
        .route("/items/{id}/status", put(handlers::update_item_status))
}
