use axum::extract::State;
use serde::Deserialize;

use crate::api::{ApiResponse, ApiResult};
use crate::auth::{authorize_mutation, Principal};
use crate::database::models::{Comment, CommentChanges, NewComment};
use crate::error::ApiError;
use crate::handlers::extract::{require_non_empty, IdPath, Validate, ValidJson};
use crate::AppState;

/// Body of POST /comments. Any `user_id` in the body is ignored; the author
/// is always the caller.
#[derive(Debug, Deserialize)]
pub struct CreateCommentRequest {
    pub thread_id: i32,
    pub content: String,
}

impl Validate for CreateCommentRequest {
    fn validate(&self) -> Result<(), ApiError> {
        require_non_empty(&self.content, "Content")
    }
}

#[derive(Debug, Deserialize)]
pub struct UpdateCommentRequest {
    pub content: String,
}

impl Validate for UpdateCommentRequest {
    fn validate(&self) -> Result<(), ApiError> {
        require_non_empty(&self.content, "Content")
    }
}

async fn load_comment(state: &AppState, id: i32) -> Result<Comment, ApiError> {
    state
        .store
        .comment_by_id(id)
        .await?
        .ok_or_else(|| ApiError::not_found("Comment not found"))
}

/// GET /comments/:id
pub async fn get_comment(
    State(state): State<AppState>,
    _principal: Principal,
    IdPath(id): IdPath,
) -> ApiResult<Comment> {
    let comment = load_comment(&state, id).await?;
    Ok(ApiResponse::success(
        comment,
        format!("Comment retrieved successfully with ID {}", id),
    ))
}

/// POST /comments
pub async fn create_comment(
    State(state): State<AppState>,
    principal: Principal,
    ValidJson(request): ValidJson<CreateCommentRequest>,
) -> ApiResult<Comment> {
    let user_id = principal.user_id()?;

    if state.store.thread_by_id(request.thread_id).await?.is_none() {
        return Err(ApiError::not_found("Thread not found"));
    }

    let comment = state
        .store
        .create_comment(NewComment {
            content: request.content,
            user_id,
            thread_id: request.thread_id,
        })
        .await?;

    tracing::info!(
        "Comment {} created by user {} on thread {}",
        comment.id,
        user_id,
        comment.thread_id
    );
    Ok(ApiResponse::created(comment, "Comment created successfully"))
}

/// PUT /comments/:id - owner only
pub async fn update_comment(
    State(state): State<AppState>,
    principal: Principal,
    IdPath(id): IdPath,
    ValidJson(request): ValidJson<UpdateCommentRequest>,
) -> ApiResult<Comment> {
    let comment = load_comment(&state, id).await?;
    authorize_mutation(&principal, &comment, "update", "comment")?;

    let updated = state
        .store
        .update_comment(
            id,
            CommentChanges {
                content: request.content,
            },
        )
        .await?
        .ok_or_else(|| ApiError::not_found("Comment not found"))?;

    Ok(ApiResponse::success(updated, "Comment updated successfully"))
}

/// DELETE /comments/:id - owner only
pub async fn delete_comment(
    State(state): State<AppState>,
    principal: Principal,
    IdPath(id): IdPath,
) -> ApiResult<()> {
    let comment = load_comment(&state, id).await?;
    authorize_mutation(&principal, &comment, "delete", "comment")?;

    if !state.store.delete_comment(id).await? {
        return Err(ApiError::not_found("Comment not found"));
    }

    Ok(ApiResponse::message("Comment deleted successfully"))
}
