use std::sync::Arc;

use axum::{
    Json,
    extract::{Extension, Path, Query, rejection::JsonRejection},
    http::{HeaderMap, StatusCode},
    response::Response,
};
use chrono::Utc;
use serde_json::json;

use blog_core::{CommentId, NewComment, PostId, model::validate_comment};

use crate::app::dto;
use crate::app::errors::ApiError;
use crate::app::services::AppServices;
use crate::authz::{authorize_owner, resolve_caller};

pub async fn list_comments(
    Extension(services): Extension<Arc<AppServices>>,
    Path(post_id): Path<String>,
    Query(query): Query<dto::ListQuery>,
) -> Result<Response, ApiError> {
    let post_id: PostId = post_id.parse()?;
    if services.store.get_post(post_id)?.is_none() {
        return Err(ApiError::not_found(format!("post {post_id}")));
    }

    let comments = services.store.list_comments(post_id, query.page())?;
    Ok(dto::envelope(
        StatusCode::OK,
        "success",
        json!({ "comments": comments }),
    ))
}

pub async fn add_comment(
    Extension(services): Extension<Arc<AppServices>>,
    headers: HeaderMap,
    Path(post_id): Path<String>,
    body: Result<Json<dto::CommentRequest>, JsonRejection>,
) -> Result<Response, ApiError> {
    let caller = resolve_caller(&services, &headers)?;
    let post_id: PostId = post_id.parse()?;
    let Json(body) = body?;

    let new_comment = NewComment::new(post_id, caller.user_id(), &body.content)?;
    let comment = services
        .store
        .add_comment(new_comment, Utc::now())?
        .ok_or_else(|| ApiError::not_found(format!("post {post_id}")))?;
    tracing::info!(comment_id = %comment.id, post_id = %post_id, "comment added");

    Ok(dto::envelope(
        StatusCode::CREATED,
        "successfully added comment",
        json!({ "comment": comment }),
    ))
}

pub async fn update_comment(
    Extension(services): Extension<Arc<AppServices>>,
    headers: HeaderMap,
    Path(id): Path<String>,
    body: Result<Json<dto::CommentRequest>, JsonRejection>,
) -> Result<Response, ApiError> {
    let caller = resolve_caller(&services, &headers)?;
    let id: CommentId = id.parse()?;

    let existing = services.store.get_comment(id)?;
    authorize_owner("comment", id, existing.as_ref(), &caller)?;

    let Json(body) = body?;
    let content = validate_comment(&body.content)?;

    let comment = services
        .store
        .update_comment(id, &content, Utc::now())?
        .ok_or_else(|| ApiError::not_found(format!("comment {id}")))?;

    Ok(dto::envelope(
        StatusCode::OK,
        "successfully updated comment",
        json!({ "comment": comment }),
    ))
}

pub async fn delete_comment(
    Extension(services): Extension<Arc<AppServices>>,
    headers: HeaderMap,
    Path(id): Path<String>,
) -> Result<Response, ApiError> {
    let caller = resolve_caller(&services, &headers)?;
    let id: CommentId = id.parse()?;

    let existing = services.store.get_comment(id)?;
    authorize_owner("comment", id, existing.as_ref(), &caller)?;

    if !services.store.delete_comment(id)? {
        return Err(ApiError::not_found(format!("comment {id}")));
    }

    Ok(dto::envelope(
        StatusCode::OK,
        "successfully deleted comment",
        json!({ "commentId": id }),
    ))
}
