use axum::{
    extract::{FromRef, FromRequestParts},
    http::{header, request::Parts},
};
use jsonwebtoken::{DecodingKey, EncodingKey, Header, Validation, decode, encode};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::{
    config::AppConfig,
    error::AppError,
    models::User,
    policy::{self, Denial, Requirement},
    session::{Session, SessionState},
};

/// Claims
///
/// Payload of a session token. `sid` ties the token to a server-side session, so
/// logging out invalidates the token before it expires.
#[derive(Debug, Serialize, Deserialize)]
pub struct Claims {
    /// Subject: the user id the session was opened for.
    pub sub: String,
    /// Session id, checked against the session manager on every request.
    pub sid: Uuid,
    pub exp: usize,
    pub iat: usize,
}

/// issue_token
///
/// Signs an HS256 token for a freshly opened session.
pub fn issue_token(config: &AppConfig, session: &Session) -> Result<String, AppError> {
    let iat = session.created_at.timestamp().max(0) as usize;
    let claims = Claims {
        sub: session.user.id.clone(),
        sid: session.id,
        iat,
        exp: iat + config.session_ttl_secs as usize,
    };
    let key = EncodingKey::from_secret(config.jwt_secret.as_bytes());
    // An encoding failure is a server fault, not a bad credential.
    encode(&Header::default(), &claims, &key).map_err(|e| AppError::Signing(e.to_string()))
}

fn decode_token(config: &AppConfig, token: &str) -> Result<Claims, AppError> {
    let key = DecodingKey::from_secret(config.jwt_secret.as_bytes());
    let mut validation = Validation::default();
    validation.validate_exp = true;
    Ok(decode::<Claims>(token, &key, &validation)?.claims)
}

/// AuthUser
///
/// The resolved identity of an authenticated request. `session_id` is `None` only
/// for the local development bypass.
///
/// # Security
/// In `Env::Local` (the default when `APP_ENV` is unset) an `x-user-id` header is
/// trusted without a token, so `x-user-id: 1` acts as the seeded admin. Never expose
/// a local-mode instance; see `AppConfig::header_bypass_enabled`.
#[derive(Debug, Clone)]
pub struct AuthUser {
    pub user: User,
    pub session_id: Option<Uuid>,
}

/// AuthUser Extractor Implementation
///
/// 1. Local bypass: in `Env::Local` an `x-user-id` header naming a directory user is enough.
/// 2. Bearer token: signature and expiry are validated.
/// 3. Session lookup: the token's session must still be open and belong to `sub`.
///
/// A request without credentials is rejected with `Denial::LoginRequired`.
impl<S> FromRequestParts<S> for AuthUser
where
    S: Send + Sync,
    SessionState: FromRef<S>,
    AppConfig: FromRef<S>,
{
    type Rejection = AppError;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let sessions = SessionState::from_ref(state);
        let config = AppConfig::from_ref(state);

        if config.header_bypass_enabled() {
            if let Some(id) = parts
                .headers
                .get("x-user-id")
                .and_then(|value| value.to_str().ok())
            {
                if let Some(user) = sessions.directory().get(id).await {
                    return Ok(AuthUser {
                        user,
                        session_id: None,
                    });
                }
            }
        }
        // Production, or the bypass header named nobody: fall through to the token.

        let token = parts
            .headers
            .get(header::AUTHORIZATION)
            .and_then(|value| value.to_str().ok())
            .and_then(|value| value.strip_prefix("Bearer "))
            .ok_or(AppError::Denied(Denial::LoginRequired))?;

        let claims = decode_token(&config, token)?;

        let session = sessions
            .current(claims.sid)
            .await
            .filter(|s| s.user.id == claims.sub)
            .ok_or_else(|| {
                tracing::debug!(session_id = %claims.sid, "token refers to a closed session");
                AppError::Denied(Denial::LoginRequired)
            })?;

        Ok(AuthUser {
            user: session.user,
            session_id: Some(session.id),
        })
    }
}

/// AdminUser
///
/// An `AuthUser` that also holds the admin role. Anyone else is refused with
/// `Denial::AdminRequired` (redirect to the dashboard).
#[derive(Debug, Clone)]
pub struct AdminUser(pub User);

impl<S> FromRequestParts<S> for AdminUser
where
    S: Send + Sync,
    SessionState: FromRef<S>,
    AppConfig: FromRef<S>,
{
    type Rejection = AppError;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let AuthUser { user, .. } = AuthUser::from_request_parts(parts, state).await?;
        policy::authorize(Some(&user), Requirement::Admin)?;
        Ok(AdminUser(user))
    }
}
