pub mod memory;
pub mod models;
pub mod postgres;
pub mod store;

pub use memory::MemoryStore;
pub use postgres::PgStore;
pub use store::ForumStore;

use thiserror::Error;

/// Categories every fresh forum starts with.
pub const PREDEFINED_CATEGORIES: &[&str] = &[
    "Technology",
    "Health",
    "Education",
    "Science",
    "Sports",
    "Travel",
    "Entertainment",
];

/// Errors surfaced by a [`ForumStore`]
#[derive(Debug, Error)]
pub enum StoreError {
    #[error("Not found: {0}")]
    NotFound(String),

    /// Unique constraint violated (username or email taken)
    #[error("Conflict: {0}")]
    Conflict(String),

    /// Foreign key points at a row that does not exist
    #[error("Invalid reference: {0}")]
    InvalidReference(String),

    #[error(transparent)]
    Sqlx(sqlx::Error),
}

impl From<sqlx::Error> for StoreError {
    fn from(err: sqlx::Error) -> Self {
        if let sqlx::Error::Database(db_err) = &err {
            if db_err.is_unique_violation() {
                return StoreError::Conflict(match db_err.constraint() {
                    Some(c) if c.contains("email") => "Email is already registered".to_string(),
                    Some(c) if c.contains("username") => "Username is already taken".to_string(),
                    _ => db_err.message().to_string(),
                });
            }
            if db_err.is_foreign_key_violation() {
                return StoreError::InvalidReference(match db_err.constraint() {
                    Some(c) if c.contains("category") => "Category does not exist".to_string(),
                    Some(c) if c.contains("thread") => "Thread does not exist".to_string(),
                    Some(c) if c.contains("user") => "User does not exist".to_string(),
                    _ => db_err.message().to_string(),
                });
            }
        }
        StoreError::Sqlx(err)
    }
}
