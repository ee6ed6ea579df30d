use campus_lost_found::{
    AppState, JsonFileSessionStore, SessionStoreState,
    config::{AppConfig, Env},
    create_router,
};
use std::sync::Arc;
use tokio::net::TcpListener;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

/// main
///
/// Entry point: configuration, logging, composition of the services, session
/// restore, then the HTTP server.
#[tokio::main]
async fn main() {
    // 1. Configuration (fail-fast on missing production secrets)
    dotenv::dotenv().ok();
    let config = AppConfig::load();

    // 2. Logging: RUST_LOG wins, otherwise sensible development defaults.
    let env_filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| "campus_lost_found=debug,tower_http=info,axum=trace".into());

    match config.env {
        Env::Local => {
            tracing_subscriber::registry()
                .with(env_filter)
                .with(tracing_subscriber::fmt::layer().pretty())
                .init();
        }
        Env::Production => {
            tracing_subscriber::registry()
                .with(env_filter)
                .with(tracing_subscriber::fmt::layer().json())
                .init();
        }
    }

    tracing::info!("Application starting in {:?} mode", config.env);
    if config.seed_demo_data {
        tracing::info!("Demo users and items will be seeded");
    }
    if config.header_bypass_enabled() {
        tracing::warn!(
            "x-user-id header authentication is ON: any client can act as any user. \
             Set APP_ENV=production for deployments."
        );
    }

    // 3. Composition root
    let store = Arc::new(JsonFileSessionStore::new(&config.session_store_path)) as SessionStoreState;
    let bind_addr = config.bind_addr.clone();
    let app_state = AppState::build(config, store);

    // 4. Sessions from the previous run. A damaged store is not worth refusing to start over.
    if let Err(e) = app_state.sessions.restore().await {
        tracing::error!("Could not restore persisted sessions: {}", e);
    }

    // 5. Router and server
    let app = create_router(app_state);

    let listener = TcpListener::bind(&bind_addr)
        .await
        .expect("FATAL: Failed to bind the HTTP listener. Check BIND_ADDR.");

    tracing::info!("Listening on {}", bind_addr);
    tracing::info!("API Documentation (Swagger UI) available at: http://{}/swagger-ui", bind_addr);

    if let Err(e) = axum::serve(listener, app).await {
        tracing::error!("HTTP server terminated: {}", e);
    }
}
