use async_trait::async_trait;

use super::models::{
    Category, Comment, CommentChanges, CredentialRecord, NewComment, NewThread, NewUser, Thread,
    ThreadChanges, User,
};
use super::StoreError;

/// Persistence for users, categories, threads and comments.
///
/// Lookups return `Ok(None)` for a missing row; updates return `Ok(None)` and
/// deletes `Ok(false)` when the target row is gone. Every mutation is a single
/// statement that either applies fully or not at all.
#[async_trait]
pub trait ForumStore: Send + Sync {
    async fn ping(&self) -> Result<(), StoreError>;

    // Users
    async fn create_user(&self, user: NewUser) -> Result<User, StoreError>;
    async fn user_by_id(&self, id: i32) -> Result<Option<User>, StoreError>;
    async fn credentials_by_username(
        &self,
        username: &str,
    ) -> Result<Option<CredentialRecord>, StoreError>;
    /// Cascades to the user's threads and comments.
    async fn delete_user(&self, id: i32) -> Result<bool, StoreError>;

    // Categories
    async fn list_categories(&self) -> Result<Vec<Category>, StoreError>;
    async fn category_by_id(&self, id: i32) -> Result<Option<Category>, StoreError>;

    // Threads
    async fn list_threads(&self) -> Result<Vec<Thread>, StoreError>;
    async fn thread_by_id(&self, id: i32) -> Result<Option<Thread>, StoreError>;
    async fn threads_by_user(&self, user_id: i32) -> Result<Vec<Thread>, StoreError>;
    async fn threads_by_category(&self, category_id: i32) -> Result<Vec<Thread>, StoreError>;
    async fn create_thread(&self, thread: NewThread) -> Result<Thread, StoreError>;
    async fn update_thread(
        &self,
        id: i32,
        changes: ThreadChanges,
    ) -> Result<Option<Thread>, StoreError>;
    /// Cascades to the thread's comments.
    async fn delete_thread(&self, id: i32) -> Result<bool, StoreError>;

    // Comments
    async fn comments_by_thread(&self, thread_id: i32) -> Result<Vec<Comment>, StoreError>;
    /// Newest first.
    async fn comments_by_user(&self, user_id: i32) -> Result<Vec<Comment>, StoreError>;
    async fn comment_by_id(&self, id: i32) -> Result<Option<Comment>, StoreError>;
    async fn create_comment(&self, comment: NewComment) -> Result<Comment, StoreError>;
    async fn update_comment(
        &self,
        id: i32,
        changes: CommentChanges,
    ) -> Result<Option<Comment>, StoreError>;
    async fn delete_comment(&self, id: i32) -> Result<bool, StoreError>;
}
