use axum::extract::State;

use crate::api::{ApiResponse, ApiResult};
use crate::database::models::{Category, Thread};
use crate::error::ApiError;
use crate::handlers::extract::IdPath;
use crate::AppState;

/// GET /categories
pub async fn list_categories(State(state): State<AppState>) -> ApiResult<Vec<Category>> {
    let categories = state.store.list_categories().await?;
    Ok(ApiResponse::success(
        categories,
        "Categories retrieved successfully",
    ))
}

/// GET /categories/:id
pub async fn get_category(
    State(state): State<AppState>,
    IdPath(id): IdPath,
) -> ApiResult<Category> {
    let category = state
        .store
        .category_by_id(id)
        .await?
        .ok_or_else(|| ApiError::not_found("Category not found"))?;

    Ok(ApiResponse::success(
        category,
        "Category retrieved successfully",
    ))
}

/// GET /categories/:id/threads
pub async fn category_threads(
    State(state): State<AppState>,
    IdPath(id): IdPath,
) -> ApiResult<Vec<Thread>> {
    if state.store.category_by_id(id).await?.is_none() {
        return Err(ApiError::not_found("Category not found"));
    }

    let threads = state.store.threads_by_category(id).await?;
    Ok(ApiResponse::success(
        threads,
        format!("Threads retrieved successfully for category {}", id),
    ))
}
