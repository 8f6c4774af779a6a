use axum::{
    async_trait,
    extract::{FromRequestParts, Request, State},
    http::{header::AUTHORIZATION, request::Parts, HeaderMap},
    middleware::Next,
    response::Response,
};

use crate::auth::Principal;
use crate::error::ApiError;
use crate::AppState;

/// Auth gate for protected routes.
///
/// Rejects with 401 before any handler runs unless the request carries
/// `Authorization: Bearer <token>` with a token that verifies and has not
/// expired. On success the caller's [`Principal`] is stored in the request
/// extensions.
pub async fn require_auth(
    State(state): State<AppState>,
    mut request: Request,
    next: Next,
) -> Result<Response, ApiError> {
    let token = extract_bearer(request.headers(), state.log_auth_diagnostics)?;

    let claims = state.validator.validate(token).map_err(|e| {
        tracing::debug!("Token rejected: {}", e);
        ApiError::unauthorized("Invalid or expired token")
    })?;

    if state.log_auth_diagnostics {
        tracing::debug!(subject = %claims.user_id, "Token accepted");
    }

    request.extensions_mut().insert(Principal::from(claims));
    Ok(next.run(request).await)
}

fn extract_bearer(headers: &HeaderMap, diagnostics: bool) -> Result<&str, ApiError> {
    let value = headers
        .get(AUTHORIZATION)
        .ok_or_else(|| ApiError::unauthorized("Authorization header is required"))?;

    let raw = value
        .to_str()
        .map_err(|_| ApiError::unauthorized("Authorization header format must be Bearer {token}"))?;

    if diagnostics {
        tracing::debug!(authorization = %raw, "Authorization header received");
    }

    parse_bearer(raw)
}

/// Split a header value of the exact shape `Bearer <token>`.
///
/// The scheme is matched case-insensitively; anything other than two
/// single-space separated parts is rejected.
pub fn parse_bearer(raw: &str) -> Result<&str, ApiError> {
    let parts: Vec<&str> = raw.split(' ').collect();

    match parts.as_slice() {
        [scheme, token] if scheme.eq_ignore_ascii_case("bearer") && !token.is_empty() => {
            Ok(token)
        }
        _ => Err(ApiError::unauthorized(
            "Authorization header format must be Bearer {token}",
        )),
    }
}

#[async_trait]
impl<S> FromRequestParts<S> for Principal
where
    S: Send + Sync,
{
    type Rejection = ApiError;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        parts
            .extensions
            .get::<Principal>()
            .cloned()
            .ok_or_else(|| ApiError::unauthorized("Authentication required"))
    }
}
