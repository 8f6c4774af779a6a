use axum::extract::State;

use crate::api::{ApiResponse, ApiResult};
use crate::auth::Principal;
use crate::database::models::{Comment, Thread, User};
use crate::error::ApiError;
use crate::handlers::extract::IdPath;
use crate::AppState;

async fn ensure_user(state: &AppState, id: i32) -> Result<User, ApiError> {
    state
        .store
        .user_by_id(id)
        .await?
        .ok_or_else(|| ApiError::not_found("User not found"))
}

/// GET /users/:id
pub async fn get_user(
    State(state): State<AppState>,
    _principal: Principal,
    IdPath(id): IdPath,
) -> ApiResult<User> {
    let user = ensure_user(&state, id).await?;
    Ok(ApiResponse::success(user, "User retrieved successfully"))
}

/// GET /users/:id/threads
pub async fn user_threads(
    State(state): State<AppState>,
    _principal: Principal,
    IdPath(id): IdPath,
) -> ApiResult<Vec<Thread>> {
    ensure_user(&state, id).await?;
    let threads = state.store.threads_by_user(id).await?;
    Ok(ApiResponse::success(
        threads,
        format!("Threads retrieved successfully for user {}", id),
    ))
}

/// GET /users/:id/comments, newest first
pub async fn user_comments(
    State(state): State<AppState>,
    _principal: Principal,
    IdPath(id): IdPath,
) -> ApiResult<Vec<Comment>> {
    ensure_user(&state, id).await?;
    let comments = state.store.comments_by_user(id).await?;
    Ok(ApiResponse::success(
        comments,
        format!("Comments retrieved successfully for user {}", id),
    ))
}

/// DELETE /users/:id
///
/// Any authenticated caller may delete a user; the store cascades to the
/// user's threads and comments.
pub async fn delete_user(
    State(state): State<AppState>,
    principal: Principal,
    IdPath(id): IdPath,
) -> ApiResult<()> {
    if !state.store.delete_user(id).await? {
        return Err(ApiError::not_found("User not found"));
    }

    tracing::info!("User {} deleted by {}", id, principal.subject());
    Ok(ApiResponse::message("User deleted successfully"))
}
