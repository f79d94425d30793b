use axum::{
    extract::State,
    http::{HeaderName, HeaderValue, Request, header::AUTHORIZATION},
    middleware::Next,
    response::Response,
};
use chrono::Utc;
use tracing::Instrument;
use uuid::Uuid;

use blog_auth::SessionVerifier;

use crate::app::errors;

pub const X_REQUEST_ID: HeaderName = HeaderName::from_static("x-request-id");

#[derive(Clone)]
pub struct AuthState {
    pub verifier: SessionVerifier,
}

/// Session gate for every protected route.
///
/// A rejected request never reaches its handler. When the credential is close
/// to expiry, the renewed one is returned in the response `Authorization`
/// header.
pub async fn session_middleware(
    State(state): State<AuthState>,
    req: Request<axum::body::Body>,
    next: Next,
) -> Response {
    let header = match req.headers().get(AUTHORIZATION).map(|v| v.to_str()) {
        None => None,
        Some(Ok(v)) => Some(v),
        Some(Err(_)) => {
            tracing::warn!("request rejected: authorization header is not visible ascii");
            return errors::unauthenticated();
        }
    };

    let admission = match state.verifier.verify(header, Utc::now()) {
        Ok(a) => a,
        Err(e) => return errors::auth_error_to_response(e),
    };

    let mut res = next.run(req).await;

    if let Some(token) = admission.renewed {
        match HeaderValue::from_str(&format!("Bearer {token}")) {
            Ok(v) => {
                res.headers_mut().insert(AUTHORIZATION, v);
            }
            Err(e) => tracing::warn!(error = %e, "renewed credential is not a valid header value"),
        }
    }

    res
}

/// Tag each request with a UUIDv7 correlation id, echoed as `x-request-id`.
pub async fn request_id(req: Request<axum::body::Body>, next: Next) -> Response {
    let id = Uuid::now_v7().to_string();

    let span = tracing::info_span!("request", request_id = %id);
    let mut res = next.run(req).instrument(span).await;

    if let Ok(v) = HeaderValue::from_str(&id) {
        res.headers_mut().insert(X_REQUEST_ID, v);
    }
    res
}
