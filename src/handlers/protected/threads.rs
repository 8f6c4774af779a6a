use axum::extract::State;
use serde::Deserialize;

use crate::api::{ApiResponse, ApiResult};
use crate::auth::{authorize_mutation, Principal};
use crate::database::models::{Thread, ThreadChanges};
use crate::error::ApiError;
use crate::handlers::extract::{require_non_empty, IdPath, Validate, ValidJson};
use crate::AppState;

#[derive(Debug, Deserialize)]
pub struct UpdateThreadRequest {
    pub title: String,
    pub content: String,
    #[serde(default)]
    pub category_id: Option<i32>,
}

impl Validate for UpdateThreadRequest {
    fn validate(&self) -> Result<(), ApiError> {
        require_non_empty(&self.title, "Title")?;
        require_non_empty(&self.content, "Content")
    }
}

async fn load_thread(state: &AppState, id: i32) -> Result<Thread, ApiError> {
    state
        .store
        .thread_by_id(id)
        .await?
        .ok_or_else(|| ApiError::not_found("Thread not found"))
}

/// PUT /threads/:id - owner only
pub async fn update_thread(
    State(state): State<AppState>,
    principal: Principal,
    IdPath(id): IdPath,
    ValidJson(request): ValidJson<UpdateThreadRequest>,
) -> ApiResult<Thread> {
    let thread = load_thread(&state, id).await?;
    authorize_mutation(&principal, &thread, "update", "thread")?;

    let updated = state
        .store
        .update_thread(
            id,
            ThreadChanges {
                title: request.title,
                content: request.content,
                category_id: request.category_id,
            },
        )
        .await?
        .ok_or_else(|| ApiError::not_found("Thread not found"))?;

    Ok(ApiResponse::success(updated, "Thread updated successfully"))
}

/// DELETE /threads/:id - owner only, removes the thread's comments too
pub async fn delete_thread(
    State(state): State<AppState>,
    principal: Principal,
    IdPath(id): IdPath,
) -> ApiResult<()> {
    let thread = load_thread(&state, id).await?;
    authorize_mutation(&principal, &thread, "delete", "thread")?;

    if !state.store.delete_thread(id).await? {
        return Err(ApiError::not_found("Thread not found"));
    }

    tracing::info!("Thread {} deleted by user {}", id, thread.user_id);
    Ok(ApiResponse::message("Thread deleted successfully"))
}
