use campus_lost_found::{AppConfig, config::Env};
use serial_test::serial;
use std::{env, panic, path::PathBuf, time::Duration};

// --- Setup/Teardown Utilities ---

const CONFIG_VARS: [&str; 9] = [
    "APP_ENV",
    "JWT_SECRET",
    "BIND_ADDR",
    "SESSION_STORE_PATH",
    "SESSION_TTL_SECS",
    "AUTH_LATENCY_MS",
    "ADD_ITEM_LATENCY_MS",
    "STATUS_LATENCY_MS",
    "SEED_DEMO_DATA",
];

/// Runs `test` with a clean configuration environment and restores the previous values afterwards.
fn run_with_env<T, R>(test: T) -> R
where
    T: FnOnce() -> R + panic::UnwindSafe,
{
    let originals: Vec<(String, Option<String>)> = CONFIG_VARS
        .iter()
        .map(|&var| (var.to_string(), env::var(var).ok()))
        .collect();

    unsafe {
        for var in CONFIG_VARS {
            env::remove_var(var);
        }
    }

    let result = panic::catch_unwind(test);

    for (key, original_value) in originals.into_iter().rev() {
        unsafe {
            if let Some(val) = original_value {
                env::set_var(&key, val);
            } else {
                env::remove_var(&key);
            }
        }
    }

    match result {
        Ok(value) => value,
        Err(e) => panic::resume_unwind(e),
    }
}

// --- Tests ---

#[test]
#[serial]
fn test_app_config_production_fail_fast() {
    let result = run_with_env(|| {
        panic::catch_unwind(|| {
            unsafe {
                env::set_var("APP_ENV", "production");
            }
            // JWT_SECRET is missing
            AppConfig::load()
        })
    });

    assert!(
        result.is_err(),
        "Production config loading should panic on a missing JWT secret"
    );
}

#[test]
#[serial]
fn test_app_config_local_env_defaults() {
    let config = run_with_env(|| {
        unsafe {
            env::set_var("APP_ENV", "local");
        }
        AppConfig::load()
    });

    assert_eq!(config.env, Env::Local);
    assert_eq!(config.jwt_secret, "super-secure-test-secret-value-local");
    assert_eq!(config.bind_addr, "0.0.0.0:3000");
    assert_eq!(config.session_store_path, PathBuf::from("data/sessions.json"));
    assert_eq!(config.session_ttl_secs, 86_400);
    assert_eq!(config.latency.auth, Duration::from_millis(1000));
    assert_eq!(config.latency.add_item, Duration::from_millis(1000));
    assert_eq!(config.latency.update_status, Duration::from_millis(800));
    assert!(config.seed_demo_data, "demo data is seeded locally by default");
}

#[test]
#[serial]
fn test_app_config_production_with_secret() {
    let config = run_with_env(|| {
        unsafe {
            env::set_var("APP_ENV", "production");
            env::set_var("JWT_SECRET", "prod-secret");
        }
        AppConfig::load()
    });

    assert_eq!(config.env, Env::Production);
    assert_eq!(config.jwt_secret, "prod-secret");
    assert!(!config.seed_demo_data, "production starts with an empty directory");
}

#[test]
#[serial]
fn test_app_config_overrides() {
    let config = run_with_env(|| {
        unsafe {
            env::set_var("AUTH_LATENCY_MS", "0");
            env::set_var("STATUS_LATENCY_MS", "25");
            env::set_var("ADD_ITEM_LATENCY_MS", "not-a-number");
            env::set_var("SEED_DEMO_DATA", "false");
            env::set_var("SESSION_STORE_PATH", "/tmp/lf/sessions.json");
            env::set_var("BIND_ADDR", "127.0.0.1:8080");
        }
        AppConfig::load()
    });

    assert_eq!(config.latency.auth, Duration::ZERO);
    assert_eq!(config.latency.update_status, Duration::from_millis(25));
    // Invalid values fall back to the default.
    assert_eq!(config.latency.add_item, Duration::from_millis(1000));
    assert!(!config.seed_demo_data);
    assert_eq!(config.session_store_path, PathBuf::from("/tmp/lf/sessions.json"));
    assert_eq!(config.bind_addr, "127.0.0.1:8080");
}

#[test]
fn test_default_config_is_test_friendly() {
    let config = AppConfig::default();
    assert_eq!(config.env, Env::Local);
    assert_eq!(config.latency.auth, Duration::ZERO);
    assert_eq!(config.latency.add_item, Duration::ZERO);
    assert_eq!(config.latency.update_status, Duration::ZERO);
    assert!(!config.seed_demo_data);
}

#[test]
#[serial]
fn test_unset_app_env_enables_header_bypass() {
    let config = run_with_env(AppConfig::load);

    assert_eq!(config.env, Env::Local);
    assert!(
        config.header_bypass_enabled(),
        "an unset APP_ENV runs in local mode with the x-user-id bypass"
    );
}

#[test]
#[serial]
fn test_production_disables_header_bypass() {
    let config = run_with_env(|| {
        unsafe {
            env::set_var("APP_ENV", "production");
            env::set_var("JWT_SECRET", "prod-secret");
        }
        AppConfig::load()
    });

    assert!(!config.header_bypass_enabled());
}
