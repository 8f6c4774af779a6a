// POST /users

use axum::extract::State;
use serde::Deserialize;

use crate::api::{ApiResponse, ApiResult};
use crate::auth::password::hash_password;
use crate::database::models::{NewUser, User};
use crate::error::ApiError;
use crate::handlers::extract::{require_non_empty, Validate, ValidJson};
use crate::AppState;

#[derive(Debug, Deserialize)]
pub struct RegisterRequest {
    pub username: String,
    pub email: String,
    pub password: String,
}

impl Validate for RegisterRequest {
    fn validate(&self) -> Result<(), ApiError> {
        require_non_empty(&self.username, "Username")?;
        require_non_empty(&self.email, "Email")?;
        require_non_empty(&self.password, "Password")
    }
}

/// Register a new account. The response never includes the password hash.
pub async fn register(
    State(state): State<AppState>,
    ValidJson(request): ValidJson<RegisterRequest>,
) -> ApiResult<User> {
    let password_hash = hash_password(&request.password)?;

    let user = state
        .store
        .create_user(NewUser {
            username: request.username,
            email: request.email,
            password_hash,
        })
        .await?;

    tracing::info!("Registered user {} ({})", user.id, user.username);
    Ok(ApiResponse::created(user, "User created successfully"))
}
