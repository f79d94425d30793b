use std::sync::Arc;

use axum::{
    Json,
    extract::{Extension, Path, Query, rejection::JsonRejection},
    http::{HeaderMap, StatusCode},
    response::Response,
};
use chrono::Utc;
use serde_json::json;

use blog_core::{NewPost, PostId, PostPatch};

use crate::app::dto;
use crate::app::errors::ApiError;
use crate::app::services::AppServices;
use crate::authz::{authorize_owner, resolve_caller};

pub async fn create_post(
    Extension(services): Extension<Arc<AppServices>>,
    headers: HeaderMap,
    body: Result<Json<dto::CreatePostRequest>, JsonRejection>,
) -> Result<Response, ApiError> {
    let caller = resolve_caller(&services, &headers)?;
    let Json(body) = body?;

    let new_post = NewPost::new(caller.user_id(), &body.title, &body.content)?;
    let post = services.store.create_post(new_post, Utc::now())?;
    tracing::info!(post_id = %post.id, author = %caller.user_id(), "post created");

    Ok(dto::envelope(
        StatusCode::CREATED,
        "successfully created post",
        json!({ "post": post }),
    ))
}

pub async fn list_posts(
    Extension(services): Extension<Arc<AppServices>>,
    Query(query): Query<dto::ListQuery>,
) -> Result<Response, ApiError> {
    let posts = services.store.list_posts(query.page(), query.search())?;
    Ok(dto::envelope(StatusCode::OK, "success", json!({ "posts": posts })))
}

pub async fn get_post(
    Extension(services): Extension<Arc<AppServices>>,
    Path(id): Path<String>,
) -> Result<Response, ApiError> {
    let id: PostId = id.parse()?;
    let post = services
        .store
        .get_post(id)?
        .ok_or_else(|| ApiError::not_found(format!("post {id}")))?;

    Ok(dto::envelope(StatusCode::OK, "success", json!({ "post": post })))
}

pub async fn update_post(
    Extension(services): Extension<Arc<AppServices>>,
    headers: HeaderMap,
    Path(id): Path<String>,
    body: Result<Json<dto::UpdatePostRequest>, JsonRejection>,
) -> Result<Response, ApiError> {
    let caller = resolve_caller(&services, &headers)?;
    let id: PostId = id.parse()?;

    let existing = services.store.get_post(id)?;
    authorize_owner("post", id, existing.as_ref(), &caller)?;

    let Json(body) = body?;
    let patch = PostPatch::new(body.title.as_deref(), body.content.as_deref())?;

    let post = services
        .store
        .update_post(id, &patch, Utc::now())?
        .ok_or_else(|| ApiError::not_found(format!("post {id}")))?;
    tracing::info!(post_id = %id, "post updated");

    Ok(dto::envelope(
        StatusCode::OK,
        "successfully updated post",
        json!({ "post": post }),
    ))
}

pub async fn delete_post(
    Extension(services): Extension<Arc<AppServices>>,
    headers: HeaderMap,
    Path(id): Path<String>,
) -> Result<Response, ApiError> {
    let caller = resolve_caller(&services, &headers)?;
    let id: PostId = id.parse()?;

    let existing = services.store.get_post(id)?;
    authorize_owner("post", id, existing.as_ref(), &caller)?;

    if !services.store.delete_post(id)? {
        return Err(ApiError::not_found(format!("post {id}")));
    }
    tracing::info!(post_id = %id, "post deleted");

    Ok(dto::envelope(
        StatusCode::OK,
        "successfully deleted post",
        json!({ "postId": id }),
    ))
}
