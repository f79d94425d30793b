use axum::{
    Router,
    routing::{get, post, put},
};

pub mod comments;
pub mod posts;
pub mod system;
pub mod users;

/// Endpoints reachable without a credential.
pub fn public_router() -> Router {
    Router::new()
        .route("/api/users/register", post(users::register))
        .route("/api/users/login", post(users::login))
}

/// Endpoints behind the session gate.
pub fn protected_router() -> Router {
    Router::new()
        .route("/api/users/profile", get(users::profile))
        .route("/api/posts", get(posts::list_posts).post(posts::create_post))
        .route(
            "/api/posts/:id",
            get(posts::get_post)
                .put(posts::update_post)
                .delete(posts::delete_post),
        )
        .route(
            "/api/posts/:id/comments",
            get(comments::list_comments).post(comments::add_comment),
        )
        .route(
            "/api/comments/:id",
            put(comments::update_comment).delete(comments::delete_comment),
        )
}
