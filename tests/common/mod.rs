#![allow(dead_code)]

use std::sync::Arc;

use anyhow::{Context, Result};
use axum::{
    body::Body,
    http::{header, Method, Request, StatusCode},
    Router,
};
use serde_json::{json, Value};
use tower::ServiceExt;

use forum_api::config::AppConfig;
use forum_api::database::MemoryStore;
use forum_api::AppState;

pub const SECRET: &str = "integration-test-secret";

/// Router wired to a fresh in-memory store.
pub struct TestApp {
    router: Router,
}

pub struct TestResponse {
    pub status: StatusCode,
    pub body: Value,
}

impl TestApp {
    pub fn new() -> Self {
        let config = AppConfig::from_lookup(|key| match key {
            "JWT_SECRET" => Some(SECRET.to_string()),
            "DATABASE_URL" => Some("postgres://unused@localhost/forum".to_string()),
            _ => None,
        })
        .expect("test config");

        let state = AppState::new(Arc::new(MemoryStore::new()), &config);
        Self {
            router: forum_api::app(state, &config.security.cors_origins),
        }
    }

    pub async fn send(
        &self,
        method: Method,
        uri: &str,
        token: Option<&str>,
        body: Option<Value>,
    ) -> Result<TestResponse> {
        let mut builder = Request::builder().method(method).uri(uri);
        if let Some(token) = token {
            builder = builder.header(header::AUTHORIZATION, format!("Bearer {}", token));
        }
        let request = match body {
            Some(body) => builder
                .header(header::CONTENT_TYPE, "application/json")
                .body(Body::from(body.to_string()))?,
            None => builder.body(Body::empty())?,
        };
        self.send_request(request).await
    }

    /// Send a prebuilt request, for cases the helpers do not cover
    /// (odd headers, raw bodies).
    pub async fn send_request(&self, request: Request<Body>) -> Result<TestResponse> {
        let response = self
            .router
            .clone()
            .oneshot(request)
            .await
            .context("router call failed")?;

        let status = response.status();
        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX).await?;
        let body = if bytes.is_empty() {
            Value::Null
        } else {
            serde_json::from_slice(&bytes).context("response body is not JSON")?
        };

        Ok(TestResponse { status, body })
    }

    pub async fn get(&self, uri: &str, token: Option<&str>) -> Result<TestResponse> {
        self.send(Method::GET, uri, token, None).await
    }

    pub async fn post(&self, uri: &str, token: Option<&str>, body: Value) -> Result<TestResponse> {
        self.send(Method::POST, uri, token, Some(body)).await
    }

    pub async fn put(&self, uri: &str, token: Option<&str>, body: Value) -> Result<TestResponse> {
        self.send(Method::PUT, uri, token, Some(body)).await
    }

    pub async fn delete(&self, uri: &str, token: Option<&str>) -> Result<TestResponse> {
        self.send(Method::DELETE, uri, token, None).await
    }

    /// Register `username` with password `password123` and return its id.
    pub async fn register(&self, username: &str) -> Result<i32> {
        let res = self
            .post(
                "/users",
                None,
                json!({
                    "username": username,
                    "email": format!("{}@example.com", username),
                    "password": "password123",
                }),
            )
            .await?;
        anyhow::ensure!(
            res.status == StatusCode::CREATED,
            "register {} failed: {} {}",
            username,
            res.status,
            res.body
        );
        data_id(&res.body)
    }

    pub async fn login(&self, username: &str) -> Result<String> {
        let res = self
            .post(
                "/login",
                None,
                json!({ "username": username, "password": "password123" }),
            )
            .await?;
        anyhow::ensure!(
            res.status == StatusCode::OK,
            "login {} failed: {} {}",
            username,
            res.status,
            res.body
        );
        res.body["token"]
            .as_str()
            .map(str::to_string)
            .context("login response has no token")
    }

    /// Register and log in; returns `(user_id, token)`.
    pub async fn user(&self, username: &str) -> Result<(i32, String)> {
        let id = self.register(username).await?;
        let token = self.login(username).await?;
        Ok((id, token))
    }

    pub async fn create_thread(&self, user_id: i32, title: &str) -> Result<i32> {
        let res = self
            .post(
                "/threads",
                None,
                json!({
                    "user_id": user_id,
                    "title": title,
                    "content": format!("{} body", title),
                    "category_id": 1,
                }),
            )
            .await?;
        anyhow::ensure!(
            res.status == StatusCode::CREATED,
            "create thread failed: {} {}",
            res.status,
            res.body
        );
        data_id(&res.body)
    }

    pub async fn create_comment(&self, token: &str, thread_id: i32, content: &str) -> Result<i32> {
        let res = self
            .post(
                "/comments",
                Some(token),
                json!({ "thread_id": thread_id, "content": content }),
            )
            .await?;
        anyhow::ensure!(
            res.status == StatusCode::CREATED,
            "create comment failed: {} {}",
            res.status,
            res.body
        );
        data_id(&res.body)
    }
}

/// `payload.data.id` of an envelope response.
pub fn data_id(body: &Value) -> Result<i32> {
    let id = body["payload"]["data"]["id"]
        .as_i64()
        .with_context(|| format!("no payload.data.id in {}", body))?;
    Ok(i32::try_from(id)?)
}
