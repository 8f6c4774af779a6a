// POST /login

use axum::{extract::State, Json};
use serde::{Deserialize, Serialize};

use crate::auth::password::verify_password;
use crate::error::ApiError;
use crate::handlers::extract::{require_non_empty, Validate, ValidJson};
use crate::AppState;

#[derive(Debug, Deserialize)]
pub struct LoginRequest {
    pub username: String,
    pub password: String,
}

impl Validate for LoginRequest {
    fn validate(&self) -> Result<(), ApiError> {
        require_non_empty(&self.username, "Username")?;
        require_non_empty(&self.password, "Password")
    }
}

/// Bare `{ "token": ... }`, the one response outside the envelope.
#[derive(Debug, Serialize)]
pub struct LoginResponse {
    pub token: String,
}

/// Exchange a username and password for a 24 hour session token.
///
/// Unknown usernames and wrong passwords get the same 401 so the response
/// does not reveal which usernames exist.
pub async fn login(
    State(state): State<AppState>,
    ValidJson(request): ValidJson<LoginRequest>,
) -> Result<Json<LoginResponse>, ApiError> {
    let invalid = || ApiError::unauthorized("Invalid credentials");

    let record = state
        .store
        .credentials_by_username(&request.username)
        .await?
        .ok_or_else(invalid)?;

    if !verify_password(&request.password, &record.password_hash)? {
        tracing::info!("Failed login for {}", record.username);
        return Err(invalid());
    }

    let token = state.issuer.issue(record.id)?;
    tracing::info!("User {} logged in", record.id);

    Ok(Json(LoginResponse { token }))
}
