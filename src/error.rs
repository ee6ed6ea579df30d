use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde::{Deserialize, Serialize};
use thiserror::Error;
use utoipa::ToSchema;

use crate::policy::Denial;

/// AppError
///
/// Every failure a request can end in. The taxonomy stays coarse on purpose where
/// the client must not learn more: an unknown email and a missing admin role are
/// both `InvalidCredentials`.
#[derive(Error, Debug)]
pub enum AppError {
    #[error("{0}")]
    Validation(String),

    #[error("Invalid email or password")]
    InvalidCredentials,

    #[error("Registration failed. Email may already be in use.")]
    EmailTaken,

    #[error("access denied")]
    Denied(Denial),

    #[error("Item {0} not found")]
    ItemNotFound(u64),

    #[error("A request for {0} is already in progress")]
    InFlight(String),

    #[error("Invalid or expired session token")]
    Token(#[from] jsonwebtoken::errors::Error),

    #[error("Could not sign session token: {0}")]
    Signing(String),

    #[error("Session store error: {0}")]
    Persistence(String),
}

impl From<std::io::Error> for AppError {
    fn from(e: std::io::Error) -> Self {
        AppError::Persistence(e.to_string())
    }
}

impl From<serde_json::Error> for AppError {
    fn from(e: serde_json::Error) -> Self {
        AppError::Persistence(e.to_string())
    }
}

impl From<Denial> for AppError {
    fn from(d: Denial) -> Self {
        AppError::Denied(d)
    }
}

/// ErrorBody
///
/// JSON body of every error response. `redirect` tells the client where to send
/// the user (login page, dashboard, item listing) when there is an obvious place.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct ErrorBody {
    pub error: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub redirect: Option<String>,
}

impl AppError {
    pub fn status_code(&self) -> StatusCode {
        match self {
            AppError::Validation(_) => StatusCode::BAD_REQUEST,
            AppError::InvalidCredentials | AppError::Token(_) => StatusCode::UNAUTHORIZED,
            AppError::EmailTaken | AppError::InFlight(_) => StatusCode::CONFLICT,
            AppError::Denied(Denial::LoginRequired) => StatusCode::UNAUTHORIZED,
            AppError::Denied(Denial::AdminRequired) => StatusCode::FORBIDDEN,
            AppError::ItemNotFound(_) => StatusCode::NOT_FOUND,
            AppError::Signing(_) | AppError::Persistence(_) => {
                StatusCode::INTERNAL_SERVER_ERROR
            }
        }
    }

    fn body(&self) -> ErrorBody {
        match self {
            AppError::Denied(d) => ErrorBody {
                error: match d {
                    Denial::LoginRequired => "Authentication required".to_string(),
                    Denial::AdminRequired => "Administrator access required".to_string(),
                },
                redirect: Some(d.redirect_target().to_string()),
            },
            AppError::Token(_) => ErrorBody {
                error: self.to_string(),
                redirect: Some(Denial::LoginRequired.redirect_target().to_string()),
            },
            AppError::ItemNotFound(_) => ErrorBody {
                error: self.to_string(),
                redirect: Some("/items".to_string()),
            },
            // Server-side details stay in the logs.
            AppError::Signing(_) | AppError::Persistence(_) => ErrorBody {
                error: "Internal error".to_string(),
                redirect: None,
            },
            _ => ErrorBody {
                error: self.to_string(),
                redirect: None,
            },
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        match &self {
            AppError::Persistence(detail) => {
                tracing::error!("session persistence failed: {}", detail)
            }
            AppError::Signing(detail) => tracing::error!("token signing failed: {}", detail),
            _ => {}
        }
        (self.status_code(), Json(self.body())).into_response()
    }
}
