use axum::extract::rejection::JsonRejection;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use serde_json::json;
use thiserror::Error;

use blog_auth::{AuthError, PasswordError, TokenError};
use blog_core::DomainError;
use blog_store::StoreError;

/// Everything a handler can fail with.
///
/// Client-facing detail is decided in [`ApiError::into_response`]; the full
/// error is only ever logged.
#[derive(Debug, Error)]
pub enum ApiError {
    #[error(transparent)]
    Domain(#[from] DomainError),

    #[error(transparent)]
    Auth(#[from] AuthError),

    #[error(transparent)]
    Store(#[from] StoreError),

    #[error(transparent)]
    Password(#[from] PasswordError),

    #[error(transparent)]
    Token(#[from] TokenError),

    #[error("invalid request body: {0}")]
    Body(#[from] JsonRejection),

    #[error("{0} not found")]
    NotFound(String),

    #[error("invalid email or password")]
    InvalidCredentials,
}

impl ApiError {
    pub fn not_found(resource: impl Into<String>) -> Self {
        Self::NotFound(resource.into())
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        match self {
            ApiError::Domain(e) => match e {
                DomainError::Validation(msg) => {
                    json_error(StatusCode::BAD_REQUEST, "validation_error", msg)
                }
                DomainError::InvalidId(msg) => json_error(StatusCode::BAD_REQUEST, "invalid_id", msg),
            },
            ApiError::Auth(e) => auth_error_to_response(e),
            ApiError::Store(StoreError::Conflict(field)) => json_error(
                StatusCode::CONFLICT,
                "conflict",
                format!("{field} already in use"),
            ),
            ApiError::Store(e @ StoreError::Unavailable(_)) => {
                tracing::error!(error = %e, "storage failure");
                internal_error()
            }
            ApiError::Password(e) => {
                tracing::error!(error = %e, "password hashing failed");
                internal_error()
            }
            ApiError::Token(e) => {
                tracing::error!(error = %e, "credential issue failed");
                internal_error()
            }
            ApiError::Body(rejection) => {
                json_error(StatusCode::BAD_REQUEST, "invalid_body", rejection.body_text())
            }
            ApiError::NotFound(resource) => json_error(
                StatusCode::NOT_FOUND,
                "not_found",
                format!("{resource} not found"),
            ),
            ApiError::InvalidCredentials => json_error(
                StatusCode::UNAUTHORIZED,
                "invalid_credentials",
                "invalid email or password",
            ),
        }
    }
}

/// Map an auth failure to a response.
///
/// Unauthenticated callers get one uniform body whatever the cause; the cause
/// is logged instead.
pub fn auth_error_to_response(err: AuthError) -> Response {
    match err {
        AuthError::Unauthenticated(reason) => {
            tracing::warn!(reason = %reason, "request rejected: unauthenticated");
            unauthenticated()
        }
        AuthError::MalformedClaims(msg) => {
            tracing::warn!(reason = %msg, "request rejected: malformed claims");
            unauthenticated()
        }
        e @ AuthError::PermissionDenied { .. } => {
            json_error(StatusCode::FORBIDDEN, "forbidden", e.to_string())
        }
        e @ AuthError::NotFound { .. } => json_error(StatusCode::NOT_FOUND, "not_found", e.to_string()),
        AuthError::ConfigurationFault(msg) => {
            tracing::error!(reason = %msg, "configuration fault");
            internal_error()
        }
    }
}

pub fn unauthenticated() -> Response {
    json_error(
        StatusCode::UNAUTHORIZED,
        "unauthenticated",
        "missing or invalid credentials",
    )
}

fn internal_error() -> Response {
    json_error(
        StatusCode::INTERNAL_SERVER_ERROR,
        "internal_error",
        "internal server error",
    )
}

pub fn json_error(status: StatusCode, code: &'static str, message: impl Into<String>) -> Response {
    (
        status,
        axum::Json(json!({
            "status": status.as_u16(),
            "error": code,
            "message": message.into(),
        })),
    )
        .into_response()
}
