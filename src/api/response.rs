use axum::{
    http::StatusCode,
    response::{IntoResponse, Json, Response},
};
use serde::Serialize;
use serde_json::{json, Value};

use crate::error::ApiError;

/// Envelope returned by every resource handler:
/// `{ "payload": { "data": ... }, "messages": [...] }`
#[derive(Debug)]
pub struct ApiResponse<T: Serialize> {
    pub data: Option<T>,
    pub messages: Vec<String>,
    pub status_code: StatusCode,
}

impl<T: Serialize> ApiResponse<T> {
    /// 200 with data
    pub fn success(data: T, message: impl Into<String>) -> Self {
        Self {
            data: Some(data),
            messages: vec![message.into()],
            status_code: StatusCode::OK,
        }
    }

    /// 201 with the created resource
    pub fn created(data: T, message: impl Into<String>) -> Self {
        Self {
            status_code: StatusCode::CREATED,
            ..Self::success(data, message)
        }
    }
}

impl ApiResponse<()> {
    /// 200 carrying only a message, no data
    pub fn message(message: impl Into<String>) -> Self {
        Self {
            data: None,
            messages: vec![message.into()],
            status_code: StatusCode::OK,
        }
    }
}

impl<T: Serialize> ApiResponse<T> {
    fn envelope(&self) -> Result<Value, serde_json::Error> {
        let mut payload = serde_json::Map::new();
        if let Some(data) = &self.data {
            payload.insert("data".to_string(), serde_json::to_value(data)?);
        }

        Ok(json!({
            "payload": payload,
            "messages": self.messages,
        }))
    }
}

impl<T: Serialize> IntoResponse for ApiResponse<T> {
    fn into_response(self) -> Response {
        match self.envelope() {
            Ok(body) => (self.status_code, Json(body)).into_response(),
            Err(e) => {
                tracing::error!("Failed to serialize response data: {}", e);
                ApiError::internal_server_error("Failed to encode response").into_response()
            }
        }
    }
}

pub type ApiResult<T> = Result<ApiResponse<T>, ApiError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn data_is_nested_under_payload() {
        let body = ApiResponse::success(vec![1, 2], "Threads retrieved successfully")
            .envelope()
            .unwrap();
        assert_eq!(body["payload"]["data"], json!([1, 2]));
        assert_eq!(body["messages"][0], "Threads retrieved successfully");
    }

    #[test]
    fn message_only_omits_data() {
        let body = ApiResponse::message("Thread deleted successfully")
            .envelope()
            .unwrap();
        assert_eq!(body["payload"], json!({}));
        assert!(body["payload"].get("data").is_none());
    }

    #[test]
    fn empty_list_serializes_as_array() {
        let body = ApiResponse::success(Vec::<i32>::new(), "ok").envelope().unwrap();
        assert_eq!(body["payload"]["data"], json!([]));
    }

    #[test]
    fn created_sets_status() {
        let response = ApiResponse::created(1, "User created successfully").into_response();
        assert_eq!(response.status(), StatusCode::CREATED);
    }
}
