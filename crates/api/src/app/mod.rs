//! HTTP API application wiring (Axum router + service wiring).
//!
//! - `services.rs`: shared state (store, token codec, identity resolver)
//! - `routes/`: HTTP routes + handlers (one file per resource)
//! - `dto.rs`: request DTOs and the success envelope
//! - `errors.rs`: consistent error responses

use std::sync::Arc;

use axum::{
    Extension, Router,
    http::{
        Method,
        header::{ACCEPT, AUTHORIZATION, CONTENT_TYPE},
    },
    routing::get,
};
use tower::ServiceBuilder;
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;

use blog_auth::{SessionVerifier, TokenCodec};
use blog_store::BlogStore;

use crate::middleware;

pub mod dto;
pub mod errors;
pub mod routes;
pub mod services;

/// Build the full HTTP router (public entrypoint used by `main.rs`).
pub fn build_app(codec: Arc<TokenCodec>, store: Arc<dyn BlogStore>) -> Router {
    let services = Arc::new(services::AppServices::new(store, codec.clone()));
    let auth_state = middleware::AuthState {
        verifier: SessionVerifier::new(codec),
    };

    // Protected routes: the session gate runs only for matched routes.
    let protected = routes::protected_router().route_layer(
        axum::middleware::from_fn_with_state(auth_state, middleware::session_middleware),
    );

    Router::new()
        .route("/health", get(routes::system::health))
        .merge(routes::public_router())
        .merge(protected)
        .layer(Extension(services))
        .layer(
            ServiceBuilder::new()
                .layer(TraceLayer::new_for_http())
                .layer(axum::middleware::from_fn(middleware::request_id))
                .layer(cors()),
        )
}

/// Any origin; `Authorization` is exposed so browsers can read renewed
/// credentials.
fn cors() -> CorsLayer {
    CorsLayer::new()
        .allow_origin(Any)
        .allow_methods([
            Method::GET,
            Method::POST,
            Method::PUT,
            Method::DELETE,
            Method::OPTIONS,
        ])
        .allow_headers([ACCEPT, AUTHORIZATION, CONTENT_TYPE])
        .expose_headers([AUTHORIZATION])
}

#[cfg(test)]
mod tests {
    use std::sync::atomic::{AtomicUsize, Ordering};

    use axum::body::Body;
    use axum::http::{Request, StatusCode};
    use chrono::{Duration, Utc};
    use tower::ServiceExt;

    use blog_store::InMemoryStore;

    use super::*;

    static HITS: AtomicUsize = AtomicUsize::new(0);

    async fn counted() -> &'static str {
        HITS.fetch_add(1, Ordering::SeqCst);
        "reached"
    }

    fn gated(codec: Arc<TokenCodec>, handler: axum::routing::MethodRouter) -> Router {
        let state = middleware::AuthState {
            verifier: SessionVerifier::new(codec),
        };
        Router::new()
            .route("/gated", handler)
            .route_layer(axum::middleware::from_fn_with_state(
                state,
                middleware::session_middleware,
            ))
    }

    #[tokio::test]
    async fn rejected_requests_never_reach_the_handler() {
        let codec = Arc::new(TokenCodec::new("oneshot-secret").unwrap());
        let other = TokenCodec::new("some-other-secret").unwrap();
        let expired = codec
            .issue("alice", Utc::now() - Duration::minutes(16))
            .unwrap();
        let foreign = other.issue("alice", Utc::now()).unwrap();

        for header in [
            None,
            Some(String::new()),
            Some("Bearer".to_string()),
            Some(format!("Bearer {expired}")),
            Some(format!("Bearer {foreign}")),
            Some("Bearer not.a.token".to_string()),
        ] {
            let mut req = Request::builder().uri("/gated");
            if let Some(h) = &header {
                req = req.header(AUTHORIZATION, h);
            }
            let res = gated(codec.clone(), get(counted))
                .oneshot(req.body(Body::empty()).unwrap())
                .await
                .unwrap();
            assert_eq!(res.status(), StatusCode::UNAUTHORIZED, "{header:?}");
        }
        assert_eq!(HITS.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn fresh_credential_passes_without_renewal() {
        let codec = Arc::new(TokenCodec::new("oneshot-secret").unwrap());
        let token = codec.issue("alice", Utc::now()).unwrap();

        let res = gated(codec, get(|| async { "reached" }))
            .oneshot(
                Request::builder()
                    .uri("/gated")
                    .header(AUTHORIZATION, format!("Bearer {token}"))
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();

        assert_eq!(res.status(), StatusCode::OK);
        assert!(res.headers().get(AUTHORIZATION).is_none());
    }

    #[tokio::test]
    async fn every_response_carries_a_request_id() {
        let codec = Arc::new(TokenCodec::new("oneshot-secret").unwrap());
        let app = build_app(codec, Arc::new(InMemoryStore::new()));

        let res = app
            .oneshot(Request::builder().uri("/health").body(Body::empty()).unwrap())
            .await
            .unwrap();

        assert_eq!(res.status(), StatusCode::OK);
        assert!(res.headers().contains_key(middleware::X_REQUEST_ID));
    }
}
