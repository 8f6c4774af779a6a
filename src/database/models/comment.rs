use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

use crate::auth::Owned;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, FromRow)]
pub struct Comment {
    pub id: i32,
    pub content: String,
    pub created_at: NaiveDateTime,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub updated_at: Option<NaiveDateTime>,
    pub user_id: i32,
    pub thread_id: i32,
}

impl Owned for Comment {
    fn owner_id(&self) -> i32 {
        self.user_id
    }
}

#[derive(Debug, Clone)]
pub struct NewComment {
    pub content: String,
    pub user_id: i32,
    pub thread_id: i32,
}

#[derive(Debug, Clone)]
pub struct CommentChanges {
    pub content: String,
}
