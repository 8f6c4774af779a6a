use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

use crate::auth::Owned;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, FromRow)]
pub struct Thread {
    pub id: i32,
    pub user_id: i32,
    pub title: String,
    pub content: String,
    pub created_at: NaiveDateTime,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub updated_at: Option<NaiveDateTime>,
    pub category_id: Option<i32>,
}

impl Owned for Thread {
    fn owner_id(&self) -> i32 {
        self.user_id
    }
}

#[derive(Debug, Clone)]
pub struct NewThread {
    pub user_id: i32,
    pub title: String,
    pub content: String,
    pub category_id: Option<i32>,
}

/// Editable fields of a thread. Owner and creation time are fixed.
#[derive(Debug, Clone)]
pub struct ThreadChanges {
    pub title: String,
    pub content: String,
    pub category_id: Option<i32>,
}
