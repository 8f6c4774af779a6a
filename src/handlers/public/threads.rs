use axum::extract::State;
use serde::Deserialize;

use crate::api::{ApiResponse, ApiResult};
use crate::database::models::{Comment, NewThread, Thread};
use crate::error::ApiError;
use crate::handlers::extract::{require_non_empty, IdPath, Validate, ValidJson};
use crate::AppState;

#[derive(Debug, Deserialize)]
pub struct CreateThreadRequest {
    pub user_id: i32,
    pub title: String,
    pub content: String,
    #[serde(default)]
    pub category_id: Option<i32>,
}

impl Validate for CreateThreadRequest {
    fn validate(&self) -> Result<(), ApiError> {
        require_non_empty(&self.title, "Title")?;
        require_non_empty(&self.content, "Content")
    }
}

/// GET /threads
pub async fn list_threads(State(state): State<AppState>) -> ApiResult<Vec<Thread>> {
    let threads = state.store.list_threads().await?;
    Ok(ApiResponse::success(threads, "Threads retrieved successfully"))
}

/// GET /threads/:id
pub async fn get_thread(State(state): State<AppState>, IdPath(id): IdPath) -> ApiResult<Thread> {
    let thread = state
        .store
        .thread_by_id(id)
        .await?
        .ok_or_else(|| ApiError::not_found("Thread not found"))?;

    Ok(ApiResponse::success(
        thread,
        format!("Thread retrieved successfully with ID {}", id),
    ))
}

/// POST /threads
///
/// The author is taken from the body; an unknown user or category is a 400.
pub async fn create_thread(
    State(state): State<AppState>,
    ValidJson(request): ValidJson<CreateThreadRequest>,
) -> ApiResult<Thread> {
    let thread = state
        .store
        .create_thread(NewThread {
            user_id: request.user_id,
            title: request.title,
            content: request.content,
            category_id: request.category_id,
        })
        .await?;

    tracing::info!("Thread {} created by user {}", thread.id, thread.user_id);
    Ok(ApiResponse::created(thread, "Thread created successfully"))
}

/// GET /threads/:id/comments
pub async fn thread_comments(
    State(state): State<AppState>,
    IdPath(id): IdPath,
) -> ApiResult<Vec<Comment>> {
    if state.store.thread_by_id(id).await?.is_none() {
        return Err(ApiError::not_found("Thread not found"));
    }

    let comments = state.store.comments_by_thread(id).await?;
    Ok(ApiResponse::success(
        comments,
        format!("Comments retrieved successfully for thread ID {}", id),
    ))
}
