use axum::{extract::State, http::StatusCode};
use chrono::Utc;
use serde_json::{json, Value};

use crate::api::ApiResponse;
use crate::AppState;

/// GET /health - 200 when the store answers, 503 otherwise
pub async fn health(State(state): State<AppState>) -> ApiResponse<Value> {
    let now = Utc::now();

    match state.store.ping().await {
        Ok(()) => ApiResponse::success(
            json!({ "status": "ok", "timestamp": now, "database": "ok" }),
            "Service is healthy",
        ),
        Err(e) => {
            tracing::error!("Health check failed: {}", e);
            let mut response = ApiResponse::success(
                json!({ "status": "degraded", "timestamp": now, "database": "unavailable" }),
                "Database unavailable",
            );
            response.status_code = StatusCode::SERVICE_UNAVAILABLE;
            response
        }
    }
}
