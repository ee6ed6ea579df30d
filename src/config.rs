use std::{env, path::PathBuf, time::Duration};

/// AppConfig
///
/// Holds the application's entire configuration state. Loaded once at startup and
/// shared read-only through the `AppState` via FromRef.
#[derive(Clone, Debug)]
pub struct AppConfig {
    // Runtime environment marker. Controls the `x-user-id` development bypass and log format.
    pub env: Env,
    // Address the HTTP listener binds to.
    pub bind_addr: String,
    // Secret used to sign and validate session tokens (HS256).
    pub jwt_secret: String,
    // Lifetime of an issued session token, in seconds.
    pub session_ttl_secs: u64,
    // JSON document holding the persisted session records.
    pub session_store_path: PathBuf,
    // Simulated latency applied by the session manager and item repository.
    pub latency: Latency,
    // Load the demo directory and item list at startup.
    pub seed_demo_data: bool,
}

/// Env
///
/// Defines the runtime context, switching between development conveniences
/// (header bypass, pretty logs, demo data) and production behaviour.
#[derive(Clone, PartialEq, Debug)]
pub enum Env {
    Local,
    Production,
}

/// Latency
///
/// Artificial delays emulating a remote backend. Every mutating operation waits
/// this long before touching state. All zero in `Default`, which is what tests use.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct Latency {
    pub auth: Duration,
    pub add_item: Duration,
    pub update_status: Duration,
}

impl Latency {
    pub fn from_millis(auth: u64, add_item: u64, update_status: u64) -> Self {
        Self {
            auth: Duration::from_millis(auth),
            add_item: Duration::from_millis(add_item),
            update_status: Duration::from_millis(update_status),
        }
    }
}

impl Default for AppConfig {
    /// default
    ///
    /// Provides a safe, non-panicking AppConfig instance primarily used for test setup:
    /// local mode, no simulated latency, no demo data.
    fn default() -> Self {
        Self {
            env: Env::Local,
            bind_addr: "127.0.0.1:3000".to_string(),
            jwt_secret: "super-secure-test-secret-value-local".to_string(),
            session_ttl_secs: 86_400,
            session_store_path: PathBuf::from("data/sessions.json"),
            latency: Latency::default(),
            seed_demo_data: false,
        }
    }
}

impl AppConfig {
    /// Whether the `x-user-id` header is accepted as a login. True in `Env::Local`,
    /// which is also what an unset `APP_ENV` selects: anyone who can reach the port
    /// may then act as any directory user, the seeded admin included.
    pub fn header_bypass_enabled(&self) -> bool {
        self.env == Env::Local
    }

    /// load
    ///
    /// Reads the configuration from environment variables (after `.env` has been applied).
    /// `APP_ENV` defaults to `local`; deployments must set it to `production`.
    ///
    /// # Panics
    /// Panics in production when `JWT_SECRET` is missing, so the service never starts
    /// signing sessions with a known development key.
    pub fn load() -> Self {
        let env_str = env::var("APP_ENV").unwrap_or_else(|_| "local".to_string());
        let env = match env_str.as_str() {
            "production" => Env::Production,
            _ => Env::Local,
        };

        let jwt_secret = match env {
            Env::Production => {
                env::var("JWT_SECRET").expect("FATAL: JWT_SECRET must be set in production.")
            }
            Env::Local => env::var("JWT_SECRET")
                .unwrap_or_else(|_| "super-secure-test-secret-value-local".to_string()),
        };

        let latency = Latency::from_millis(
            read_u64("AUTH_LATENCY_MS", 1000),
            read_u64("ADD_ITEM_LATENCY_MS", 1000),
            read_u64("STATUS_LATENCY_MS", 800),
        );

        let seed_default = env == Env::Local;
        let seed_demo_data = env::var("SEED_DEMO_DATA")
            .ok()
            .map(|v| matches!(v.as_str(), "1" | "true" | "yes"))
            .unwrap_or(seed_default);

        Self {
            bind_addr: env::var("BIND_ADDR").unwrap_or_else(|_| "0.0.0.0:3000".to_string()),
            jwt_secret,
            session_ttl_secs: read_u64("SESSION_TTL_SECS", 86_400),
            session_store_path: env::var("SESSION_STORE_PATH")
                .map(PathBuf::from)
                .unwrap_or_else(|_| PathBuf::from("data/sessions.json")),
            latency,
            seed_demo_data,
            env,
        }
    }
}

// Unparseable values fall back to the default rather than aborting startup.
fn read_u64(key: &str, default: u64) -> u64 {
    match env::var(key) {
        Ok(raw) => raw.trim().parse().unwrap_or_else(|_| {
            tracing::warn!("ignoring invalid {}={:?}, using {}", key, raw, default);
            default
        }),
        Err(_) => default,
    }
}
