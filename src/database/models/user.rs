use serde::{Deserialize, Serialize};
use sqlx::FromRow;

/// Public view of a user. The password hash never leaves the store through
/// this type.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, FromRow)]
pub struct User {
    pub id: i32,
    pub username: String,
    pub email: String,
}

/// What login needs to check a password.
#[derive(Debug, Clone, FromRow)]
pub struct CredentialRecord {
    pub id: i32,
    pub username: String,
    pub password_hash: String,
}

#[derive(Debug, Clone)]
pub struct NewUser {
    pub username: String,
    pub email: String,
    pub password_hash: String,
}
