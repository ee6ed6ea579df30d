use axum::{
    Router,
    extract::{FromRef, Request},
    http::HeaderName,
    middleware::{self, Next},
    response::Response,
};
use std::{sync::Arc, time::Duration};
use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;

use tower::ServiceBuilder;
use tower_http::{
    cors::{Any, CorsLayer},
    request_id::{MakeRequestUuid, PropagateRequestIdLayer, SetRequestIdLayer},
    trace::{DefaultOnResponse, TraceLayer},
};
use tracing::{Level, Span};

// --- Module Structure ---

// Domain: directory, sessions, items, access rules, search.
pub mod directory;
pub mod filter;
pub mod inflight;
pub mod models;
pub mod policy;
pub mod repository;
pub mod seed;
pub mod session;

// HTTP surface and ambient concerns.
pub mod auth;
pub mod config;
pub mod error;
pub mod handlers;

// Module for routing segregation (Public, Authenticated, Admin).
pub mod routes;
use auth::{AdminUser, AuthUser};
use routes::{admin, authenticated, public};

// --- Public Re-exports ---

pub use config::AppConfig;
pub use directory::UserDirectory;
pub use error::AppError;
pub use repository::{InMemoryItemRepository, ItemRepository, ItemState};
pub use session::{
    JsonFileSessionStore, MemorySessionStore, SessionManager, SessionState, SessionStoreState,
};

/// ApiDoc
///
/// OpenAPI document for every handler and wire schema, served at `/api-docs/openapi.json`.
#[derive(OpenApi)]
#[openapi(
    paths(
        handlers::register, handlers::login, handlers::admin_login, handlers::logout,
        handlers::get_me, handlers::get_items, handlers::get_my_items, handlers::get_item,
        handlers::create_item, handlers::get_admin_items, handlers::get_admin_stats,
        handlers::update_item_status
    ),
    components(
        schemas(
            models::User, models::Role, models::Item, models::ItemType, models::ItemStatus,
            models::RegisterRequest, models::LoginRequest, models::NewItemRequest,
            models::UpdateStatusRequest, models::SessionResponse, models::AdminItem,
            models::AdminDashboardStats, error::ErrorBody,
        )
    ),
    tags(
        (name = "lost-and-found", description = "Campus Lost & Found API")
    )
)]
struct ApiDoc;

/// AppState
///
/// The composition root. Owns the session manager (which owns the user directory)
/// and the item repository; handlers receive them through axum's state rather than
/// through globals, and the two services never reference each other.
#[derive(Clone)]
pub struct AppState {
    pub items: ItemState,
    pub sessions: SessionState,
    pub config: AppConfig,
}

impl AppState {
    /// build
    ///
    /// Wires the services from configuration, seeding demo data when enabled.
    /// Persisted sessions are not loaded here; call `sessions.restore()` afterwards.
    pub fn build(config: AppConfig, store: SessionStoreState) -> Self {
        let (users, items) = if config.seed_demo_data {
            (seed::demo_users(), seed::demo_items())
        } else {
            (Vec::new(), Vec::new())
        };

        let directory = Arc::new(UserDirectory::with_users(users));
        let sessions = Arc::new(SessionManager::new(
            directory,
            store,
            config.latency.auth,
            Duration::from_secs(config.session_ttl_secs),
        ));
        let items = Arc::new(InMemoryItemRepository::with_items(
            items,
            config.latency.add_item,
            config.latency.update_status,
        )) as ItemState;

        Self {
            items,
            sessions,
            config,
        }
    }
}

// --- Axum FromRef Extractor Implementations ---

impl FromRef<AppState> for ItemState {
    fn from_ref(app_state: &AppState) -> ItemState {
        app_state.items.clone()
    }
}

impl FromRef<AppState> for SessionState {
    fn from_ref(app_state: &AppState) -> SessionState {
        app_state.sessions.clone()
    }
}

impl FromRef<AppState> for AppConfig {
    fn from_ref(app_state: &AppState) -> AppConfig {
        app_state.config.clone()
    }
}

/// auth_middleware
///
/// Rejects the request unless `AuthUser` can be extracted (401 with a redirect to
/// the login page).
async fn auth_middleware(_auth_user: AuthUser, request: Request, next: Next) -> Response {
    next.run(request).await
}

/// admin_middleware
///
/// As `auth_middleware`, but a session without the admin role gets 403 with a
/// redirect to the dashboard.
async fn admin_middleware(_admin: AdminUser, request: Request, next: Next) -> Response {
    next.run(request).await
}

/// create_router
///
/// Assembles the routing structure, applies the access guards per route group and
/// the observability layers around everything.
pub fn create_router(state: AppState) -> Router {
    let cors = CorsLayer::new()
        .allow_methods(Any)
        .allow_origin(Any)
        .allow_headers(Any);

    let x_request_id = HeaderName::from_static("x-request-id");

    let base_router = Router::new()
        .merge(SwaggerUi::new("/swagger-ui").url("/api-docs/openapi.json", ApiDoc::openapi()))
        .merge(public::public_routes())
        .merge(
            authenticated::authenticated_routes().route_layer(middleware::from_fn_with_state(
                state.clone(),
                auth_middleware,
            )),
        )
        .nest(
            "/admin",
            admin::admin_routes().route_layer(middleware::from_fn_with_state(
                state.clone(),
                admin_middleware,
            )),
        )
        .with_state(state);

    base_router
        .layer(
            ServiceBuilder::new()
                .layer(SetRequestIdLayer::new(x_request_id.clone(), MakeRequestUuid))
                .layer(
                    TraceLayer::new_for_http()
                        .make_span_with(trace_span_logger)
                        .on_response(
                            DefaultOnResponse::new()
                                .level(Level::INFO)
                                .latency_unit(tower_http::LatencyUnit::Millis),
                        ),
                )
                .layer(PropagateRequestIdLayer::new(x_request_id)),
        )
        .layer(cors)
}

/// trace_span_logger
///
/// Span for one HTTP request, correlated by the `x-request-id` header.
fn trace_span_logger(request: &axum::http::Request<axum::body::Body>) -> Span {
    let request_id = request
        .headers()
        .get("x-request-id")
        .and_then(|value| value.to_str().ok())
        .unwrap_or("unknown");

    tracing::info_span!(
        "http_request",
        method = ?request.method(),
        uri = ?request.uri(),
        req_id = %request_id,
    )
}
