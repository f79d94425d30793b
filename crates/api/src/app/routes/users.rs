use std::sync::Arc;

use axum::{
    Json,
    extract::{Extension, rejection::JsonRejection},
    http::{HeaderMap, HeaderValue, StatusCode, header::AUTHORIZATION},
    response::Response,
};
use chrono::Utc;
use serde_json::json;

use blog_auth::{AuthError, hash_password, verify_password};
use blog_core::{NewUser, model::validate_password};
use blog_store::PrincipalField;

use crate::app::dto::{self, RegisteredUser};
use crate::app::errors::ApiError;
use crate::app::services::AppServices;

pub async fn register(
    Extension(services): Extension<Arc<AppServices>>,
    body: Result<Json<dto::RegisterRequest>, JsonRejection>,
) -> Result<Response, ApiError> {
    let Json(body) = body?;

    validate_password(&body.password)?;
    // Validate before paying for the hash.
    let unhashed = NewUser::new(&body.username, &body.email, String::new())?;
    let new_user = NewUser {
        password_hash: hash_password(&body.password)?,
        ..unhashed
    };

    let user = services.store.save_user(new_user)?;
    tracing::info!(user_id = %user.id, username = %user.username, "user registered");

    Ok(dto::envelope(
        StatusCode::CREATED,
        "user created",
        json!({ "user": RegisteredUser::from(user) }),
    ))
}

pub async fn login(
    Extension(services): Extension<Arc<AppServices>>,
    body: Result<Json<dto::LoginRequest>, JsonRejection>,
) -> Result<Response, ApiError> {
    let Json(body) = body?;

    let user = services
        .store
        .find_principal_by(PrincipalField::Email, &body.email)?
        .ok_or_else(|| AuthError::not_found("user with that email"))?;

    if !verify_password(&user.password_hash, &body.password) {
        tracing::info!(user_id = %user.id, "login rejected: wrong password");
        return Err(ApiError::InvalidCredentials);
    }

    let token = services.codec.issue(&user.username, Utc::now())?;
    tracing::info!(user_id = %user.id, "login succeeded");

    let mut res = dto::envelope(StatusCode::OK, "login successful", json!({ "token": token }));
    if let Ok(v) = HeaderValue::from_str(&format!("Bearer {token}")) {
        res.headers_mut().insert(AUTHORIZATION, v);
    }
    Ok(res)
}

pub async fn profile(
    Extension(services): Extension<Arc<AppServices>>,
    headers: HeaderMap,
) -> Result<Response, ApiError> {
    let user = crate::authz::resolve_user(&services, &headers)?;
    Ok(dto::envelope(StatusCode::OK, "success", json!({ "user": user })))
}
