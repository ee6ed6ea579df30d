use axum::{
    extract::FromRequestParts,
    http::{Method, Request, StatusCode, Uri, header, request::Parts},
};
use campus_lost_found::{
    AppConfig, AppError, AppState, MemorySessionStore,
    auth::{AdminUser, AuthUser, Claims, issue_token},
    config::Env,
    policy::Denial,
};
use jsonwebtoken::{EncodingKey, Header, encode};
use std::{sync::Arc, time::SystemTime};
use uuid::Uuid;

// --- Helper Functions ---

const TEST_JWT_SECRET: &str = "test-secret-value-1234567890";

fn create_app_state(env: Env) -> AppState {
    let config = AppConfig {
        env,
        jwt_secret: TEST_JWT_SECRET.to_string(),
        seed_demo_data: true,
        ..AppConfig::default()
    };
    AppState::build(config, Arc::new(MemorySessionStore::new()))
}

/// Helper to get the mutable Parts struct from a generated Request
fn get_request_parts(method: Method, uri: Uri) -> Parts {
    let request = Request::builder()
        .method(method)
        .uri(uri)
        .body(axum::body::Body::empty())
        .unwrap();
    let (parts, _) = request.into_parts();
    parts
}

fn with_bearer(token: &str) -> Parts {
    let mut parts = get_request_parts(Method::GET, "/".parse().unwrap());
    parts.headers.insert(
        header::AUTHORIZATION,
        header::HeaderValue::from_str(&format!("Bearer {}", token)).unwrap(),
    );
    parts
}

fn with_user_header(user_id: &str) -> Parts {
    let mut parts = get_request_parts(Method::GET, "/".parse().unwrap());
    parts.headers.insert(
        header::HeaderName::from_static("x-user-id"),
        header::HeaderValue::from_str(user_id).unwrap(),
    );
    parts
}

async fn login_token(state: &AppState, email: &str) -> (String, Uuid) {
    let session = state.sessions.login(email, "any", false).await.unwrap();
    let token = issue_token(&state.config, &session).unwrap();
    (token, session.id)
}

// --- Tests ---

#[tokio::test]
async fn test_auth_success_with_valid_jwt() {
    let state = create_app_state(Env::Production);
    let (token, session_id) = login_token(&state, "john@university.edu").await;

    let mut parts = with_bearer(&token);
    let auth_user = AuthUser::from_request_parts(&mut parts, &state).await;

    let auth_user = auth_user.expect("valid session token must authenticate");
    assert_eq!(auth_user.user.email, "john@university.edu");
    assert_eq!(auth_user.session_id, Some(session_id));
}

#[tokio::test]
async fn test_auth_failure_with_missing_header() {
    let state = create_app_state(Env::Production);

    let mut parts = get_request_parts(Method::GET, "/".parse().unwrap());
    let err = AuthUser::from_request_parts(&mut parts, &state)
        .await
        .unwrap_err();

    assert!(matches!(err, AppError::Denied(Denial::LoginRequired)));
    assert_eq!(err.status_code(), StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn test_auth_failure_after_logout() {
    let state = create_app_state(Env::Production);
    let (token, session_id) = login_token(&state, "john@university.edu").await;

    state.sessions.logout(session_id).await.unwrap();

    let mut parts = with_bearer(&token);
    let err = AuthUser::from_request_parts(&mut parts, &state)
        .await
        .unwrap_err();
    assert!(matches!(err, AppError::Denied(Denial::LoginRequired)));
}

#[tokio::test]
async fn test_auth_failure_with_foreign_signature() {
    let state = create_app_state(Env::Production);
    let session = state
        .sessions
        .login("john@university.edu", "any", false)
        .await
        .unwrap();

    let now = SystemTime::now()
        .duration_since(SystemTime::UNIX_EPOCH)
        .unwrap()
        .as_secs() as usize;
    let claims = Claims {
        sub: session.user.id.clone(),
        sid: session.id,
        iat: now,
        exp: now + 3600,
    };
    let forged = encode(
        &Header::default(),
        &claims,
        &EncodingKey::from_secret(b"some-other-secret"),
    )
    .unwrap();

    let mut parts = with_bearer(&forged);
    let err = AuthUser::from_request_parts(&mut parts, &state)
        .await
        .unwrap_err();

    assert!(matches!(err, AppError::Token(_)));
    assert_eq!(err.status_code(), StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn test_local_bypass_success() {
    let state = create_app_state(Env::Local);

    let mut parts = with_user_header("1");
    let auth_user = AuthUser::from_request_parts(&mut parts, &state)
        .await
        .unwrap();

    assert_eq!(auth_user.user.email, "admin@university.edu");
    assert!(auth_user.user.is_admin());
    assert_eq!(auth_user.session_id, None);
}

#[tokio::test]
async fn test_local_bypass_disabled_in_prod() {
    let state = create_app_state(Env::Production);

    // Provide ONLY the local bypass header
    let mut parts = with_user_header("1");
    let err = AuthUser::from_request_parts(&mut parts, &state)
        .await
        .unwrap_err();

    assert_eq!(err.status_code(), StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn test_admin_extractor_refuses_student() {
    let state = create_app_state(Env::Production);
    let (token, _) = login_token(&state, "jane@university.edu").await;

    let mut parts = with_bearer(&token);
    let err = AdminUser::from_request_parts(&mut parts, &state)
        .await
        .unwrap_err();

    assert!(matches!(err, AppError::Denied(Denial::AdminRequired)));
    assert_eq!(err.status_code(), StatusCode::FORBIDDEN);
}

#[tokio::test]
async fn test_admin_extractor_accepts_admin() {
    let state = create_app_state(Env::Production);
    let (token, _) = login_token(&state, "admin@university.edu").await;

    let mut parts = with_bearer(&token);
    let AdminUser(user) = AdminUser::from_request_parts(&mut parts, &state)
        .await
        .unwrap();

    assert_eq!(user.id, "1");
}
