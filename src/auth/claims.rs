use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};

use crate::error::ApiError;

/// Payload signed into every session token.
///
/// The subject travels as a string under `user_id`, which is what browser
/// clients decode to find the signed-in user.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Claims {
    pub user_id: String,
    pub iat: i64,
    pub exp: i64,
}

impl Claims {
    pub fn new(user_id: i32, issued_at: DateTime<Utc>, lifetime: Duration) -> Self {
        Self {
            user_id: user_id.to_string(),
            iat: issued_at.timestamp(),
            exp: (issued_at + lifetime).timestamp(),
        }
    }
}

/// Identity of the caller, available to handlers only behind the auth gate.
///
/// Holds the token subject exactly as it was signed; handlers that need the
/// numeric id go through [`Principal::user_id`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Principal {
    subject: String,
}

impl Principal {
    pub fn subject(&self) -> &str {
        &self.subject
    }

    pub fn user_id(&self) -> Result<i32, ApiError> {
        self.subject
            .parse()
            .map_err(|_| ApiError::unauthorized("User ID is invalid"))
    }
}

impl From<Claims> for Principal {
    fn from(claims: Claims) -> Self {
        Self {
            subject: claims.user_id,
        }
    }
}
