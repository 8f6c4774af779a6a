use std::collections::BTreeMap;

use async_trait::async_trait;
use chrono::{NaiveDateTime, Utc};
use tokio::sync::RwLock;

use super::models::{
    Category, Comment, CommentChanges, CredentialRecord, NewComment, NewThread, NewUser, Thread,
    ThreadChanges, User,
};
use super::store::ForumStore;
use super::{StoreError, PREDEFINED_CATEGORIES};

#[derive(Debug, Clone)]
struct UserRow {
    id: i32,
    username: String,
    email: String,
    password_hash: String,
}

impl UserRow {
    fn public(&self) -> User {
        User {
            id: self.id,
            username: self.username.clone(),
            email: self.email.clone(),
        }
    }
}

#[derive(Default)]
struct Tables {
    users: BTreeMap<i32, UserRow>,
    categories: BTreeMap<i32, Category>,
    threads: BTreeMap<i32, Thread>,
    comments: BTreeMap<i32, Comment>,
    last_id: i32,
}

impl Tables {
    fn next_id(&mut self) -> i32 {
        self.last_id += 1;
        self.last_id
    }

    fn check_category(&self, category_id: Option<i32>) -> Result<(), StoreError> {
        match category_id {
            Some(id) if !self.categories.contains_key(&id) => Err(StoreError::InvalidReference(
                "Category does not exist".to_string(),
            )),
            _ => Ok(()),
        }
    }
}

/// Process-local store with the same constraints as the SQL schema: unique
/// username and email, foreign keys, and cascading deletes.
///
/// Ids come from one shared sequence, so they are unique across tables.
pub struct MemoryStore {
    tables: RwLock<Tables>,
}

impl MemoryStore {
    /// Empty store seeded with the predefined categories
    pub fn new() -> Self {
        let mut tables = Tables::default();
        for name in PREDEFINED_CATEGORIES {
            let id = tables.next_id();
            tables.categories.insert(
                id,
                Category {
                    id,
                    name: name.to_string(),
                },
            );
        }
        Self {
            tables: RwLock::new(tables),
        }
    }
}

impl Default for MemoryStore {
    fn default() -> Self {
        Self::new()
    }
}

fn now() -> NaiveDateTime {
    Utc::now().naive_utc()
}

#[async_trait]
impl ForumStore for MemoryStore {
    async fn ping(&self) -> Result<(), StoreError> {
        Ok(())
    }

    async fn create_user(&self, user: NewUser) -> Result<User, StoreError> {
        let mut tables = self.tables.write().await;

        if tables.users.values().any(|u| u.username == user.username) {
            return Err(StoreError::Conflict("Username is already taken".to_string()));
        }
        if tables.users.values().any(|u| u.email == user.email) {
            return Err(StoreError::Conflict("Email is already registered".to_string()));
        }

        let id = tables.next_id();
        let row = UserRow {
            id,
            username: user.username,
            email: user.email,
            password_hash: user.password_hash,
        };
        let created = row.public();
        tables.users.insert(id, row);
        Ok(created)
    }

    async fn user_by_id(&self, id: i32) -> Result<Option<User>, StoreError> {
        let tables = self.tables.read().await;
        Ok(tables.users.get(&id).map(UserRow::public))
    }

    async fn credentials_by_username(
        &self,
        username: &str,
    ) -> Result<Option<CredentialRecord>, StoreError> {
        let tables = self.tables.read().await;
        Ok(tables
            .users
            .values()
            .find(|u| u.username == username)
            .map(|u| CredentialRecord {
                id: u.id,
                username: u.username.clone(),
                password_hash: u.password_hash.clone(),
            }))
    }

    async fn delete_user(&self, id: i32) -> Result<bool, StoreError> {
        let mut tables = self.tables.write().await;
        if tables.users.remove(&id).is_none() {
            return Ok(false);
        }

        tables.threads.retain(|_, t| t.user_id != id);
        let Tables {
            threads, comments, ..
        } = &mut *tables;
        comments.retain(|_, c| c.user_id != id && threads.contains_key(&c.thread_id));
        Ok(true)
    }

    async fn list_categories(&self) -> Result<Vec<Category>, StoreError> {
        let tables = self.tables.read().await;
        Ok(tables.categories.values().cloned().collect())
    }

    async fn category_by_id(&self, id: i32) -> Result<Option<Category>, StoreError> {
        let tables = self.tables.read().await;
        Ok(tables.categories.get(&id).cloned())
    }

    async fn list_threads(&self) -> Result<Vec<Thread>, StoreError> {
        let tables = self.tables.read().await;
        Ok(tables.threads.values().cloned().collect())
    }

    async fn thread_by_id(&self, id: i32) -> Result<Option<Thread>, StoreError> {
        let tables = self.tables.read().await;
        Ok(tables.threads.get(&id).cloned())
    }

    async fn threads_by_user(&self, user_id: i32) -> Result<Vec<Thread>, StoreError> {
        let tables = self.tables.read().await;
        Ok(tables
            .threads
            .values()
            .filter(|t| t.user_id == user_id)
            .cloned()
            .collect())
    }

    async fn threads_by_category(&self, category_id: i32) -> Result<Vec<Thread>, StoreError> {
        let tables = self.tables.read().await;
        Ok(tables
            .threads
            .values()
            .filter(|t| t.category_id == Some(category_id))
            .cloned()
            .collect())
    }

    async fn create_thread(&self, thread: NewThread) -> Result<Thread, StoreError> {
        let mut tables = self.tables.write().await;

        if !tables.users.contains_key(&thread.user_id) {
            return Err(StoreError::InvalidReference("User does not exist".to_string()));
        }
        tables.check_category(thread.category_id)?;

        let id = tables.next_id();
        let created = Thread {
            id,
            user_id: thread.user_id,
            title: thread.title,
            content: thread.content,
            created_at: now(),
            updated_at: None,
            category_id: thread.category_id,
        };
        tables.threads.insert(id, created.clone());
        Ok(created)
    }

    async fn update_thread(
        &self,
        id: i32,
        changes: ThreadChanges,
    ) -> Result<Option<Thread>, StoreError> {
        let mut tables = self.tables.write().await;
        tables.check_category(changes.category_id)?;

        Ok(tables.threads.get_mut(&id).map(|thread| {
            thread.title = changes.title;
            thread.content = changes.content;
            thread.category_id = changes.category_id;
            thread.updated_at = Some(now());
            thread.clone()
        }))
    }

    async fn delete_thread(&self, id: i32) -> Result<bool, StoreError> {
        let mut tables = self.tables.write().await;
        if tables.threads.remove(&id).is_none() {
            return Ok(false);
        }
        tables.comments.retain(|_, c| c.thread_id != id);
        Ok(true)
    }

    async fn comments_by_thread(&self, thread_id: i32) -> Result<Vec<Comment>, StoreError> {
        let tables = self.tables.read().await;
        Ok(tables
            .comments
            .values()
            .filter(|c| c.thread_id == thread_id)
            .cloned()
            .collect())
    }

    async fn comments_by_user(&self, user_id: i32) -> Result<Vec<Comment>, StoreError> {
        let tables = self.tables.read().await;
        let mut comments: Vec<Comment> = tables
            .comments
            .values()
            .filter(|c| c.user_id == user_id)
            .cloned()
            .collect();
        comments.sort_by(|a, b| b.created_at.cmp(&a.created_at).then(b.id.cmp(&a.id)));
        Ok(comments)
    }

    async fn comment_by_id(&self, id: i32) -> Result<Option<Comment>, StoreError> {
        let tables = self.tables.read().await;
        Ok(tables.comments.get(&id).cloned())
    }

    async fn create_comment(&self, comment: NewComment) -> Result<Comment, StoreError> {
        let mut tables = self.tables.write().await;

        if !tables.users.contains_key(&comment.user_id) {
            return Err(StoreError::InvalidReference("User does not exist".to_string()));
        }
        if !tables.threads.contains_key(&comment.thread_id) {
            return Err(StoreError::InvalidReference("Thread does not exist".to_string()));
        }

        let id = tables.next_id();
        let created = Comment {
            id,
            content: comment.content,
            created_at: now(),
            updated_at: None,
            user_id: comment.user_id,
            thread_id: comment.thread_id,
        };
        tables.comments.insert(id, created.clone());
        Ok(created)
    }

    async fn update_comment(
        &self,
        id: i32,
        changes: CommentChanges,
    ) -> Result<Option<Comment>, StoreError> {
        let mut tables = self.tables.write().await;
        Ok(tables.comments.get_mut(&id).map(|comment| {
            comment.content = changes.content;
            comment.updated_at = Some(now());
            comment.clone()
        }))
    }

    async fn delete_comment(&self, id: i32) -> Result<bool, StoreError> {
        let mut tables = self.tables.write().await;
        Ok(tables.comments.remove(&id).is_some())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn new_user(name: &str) -> NewUser {
        NewUser {
            username: name.to_string(),
            email: format!("{}@example.com", name),
            password_hash: "hash".to_string(),
        }
    }

    fn new_thread(user_id: i32, category_id: Option<i32>) -> NewThread {
        NewThread {
            user_id,
            title: "Title".to_string(),
            content: "Body".to_string(),
            category_id,
        }
    }

    #[tokio::test]
    async fn seeds_predefined_categories() {
        let store = MemoryStore::new();
        let names: Vec<String> = store
            .list_categories()
            .await
            .unwrap()
            .into_iter()
            .map(|c| c.name)
            .collect();
        assert_eq!(names, PREDEFINED_CATEGORIES);
    }

    #[tokio::test]
    async fn duplicate_username_or_email_conflicts() {
        let store = MemoryStore::new();
        store.create_user(new_user("alice")).await.unwrap();

        let same_name = store.create_user(new_user("alice")).await;
        assert!(matches!(same_name, Err(StoreError::Conflict(_))));

        let mut same_email = new_user("alice2");
        same_email.email = "alice@example.com".to_string();
        assert!(matches!(
            store.create_user(same_email).await,
            Err(StoreError::Conflict(_))
        ));
    }

    #[tokio::test]
    async fn thread_requires_existing_user_and_category() {
        let store = MemoryStore::new();
        let user = store.create_user(new_user("bob")).await.unwrap();

        assert!(matches!(
            store.create_thread(new_thread(user.id + 100, None)).await,
            Err(StoreError::InvalidReference(_))
        ));
        assert!(matches!(
            store.create_thread(new_thread(user.id, Some(-1))).await,
            Err(StoreError::InvalidReference(_))
        ));
        assert!(store.create_thread(new_thread(user.id, Some(1))).await.is_ok());
    }

    #[tokio::test]
    async fn deleting_user_cascades() {
        let store = MemoryStore::new();
        let author = store.create_user(new_user("author")).await.unwrap();
        let reader = store.create_user(new_user("reader")).await.unwrap();
        let thread = store.create_thread(new_thread(author.id, None)).await.unwrap();
        let reply = store
            .create_comment(NewComment {
                content: "hi".to_string(),
                user_id: reader.id,
                thread_id: thread.id,
            })
            .await
            .unwrap();

        assert!(store.delete_user(author.id).await.unwrap());
        assert!(store.thread_by_id(thread.id).await.unwrap().is_none());
        assert!(store.comment_by_id(reply.id).await.unwrap().is_none());
        assert!(!store.delete_user(author.id).await.unwrap());
    }

    #[tokio::test]
    async fn update_sets_updated_at() {
        let store = MemoryStore::new();
        let user = store.create_user(new_user("carol")).await.unwrap();
        let thread = store.create_thread(new_thread(user.id, None)).await.unwrap();
        assert!(thread.updated_at.is_none());

        let updated = store
            .update_thread(
                thread.id,
                ThreadChanges {
                    title: "New".to_string(),
                    content: "Text".to_string(),
                    category_id: Some(2),
                },
            )
            .await
            .unwrap()
            .unwrap();
        assert_eq!(updated.title, "New");
        assert_eq!(updated.user_id, user.id);
        assert!(updated.updated_at.is_some());

        assert!(store
            .update_comment(9999, CommentChanges { content: "x".into() })
            .await
            .unwrap()
            .is_none());
    }
}
