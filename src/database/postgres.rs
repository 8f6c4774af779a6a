use async_trait::async_trait;
use sqlx::{postgres::PgPoolOptions, PgPool};
use tracing::info;

use super::models::{
    Category, Comment, CommentChanges, CredentialRecord, NewComment, NewThread, NewUser, Thread,
    ThreadChanges, User,
};
use super::store::ForumStore;
use super::{StoreError, PREDEFINED_CATEGORIES};
use crate::config::DatabaseConfig;

const THREAD_COLUMNS: &str = "id, user_id, title, content, created_at, updated_at, category_id";
const COMMENT_COLUMNS: &str = "id, content, created_at, updated_at, user_id, thread_id";

const SCHEMA: &[&str] = &[
    r#"
    CREATE TABLE IF NOT EXISTS users (
        id SERIAL PRIMARY KEY,
        username VARCHAR(255) NOT NULL UNIQUE,
        email VARCHAR(255) NOT NULL UNIQUE,
        password_hash TEXT NOT NULL
    )"#,
    r#"
    CREATE TABLE IF NOT EXISTS categories (
        id SERIAL PRIMARY KEY,
        name VARCHAR(255) NOT NULL UNIQUE
    )"#,
    r#"
    CREATE TABLE IF NOT EXISTS threads (
        id SERIAL PRIMARY KEY,
        user_id INT NOT NULL REFERENCES users(id) ON DELETE CASCADE,
        title VARCHAR(255) NOT NULL,
        content TEXT NOT NULL,
        created_at TIMESTAMP NOT NULL DEFAULT CURRENT_TIMESTAMP,
        updated_at TIMESTAMP,
        category_id INT REFERENCES categories(id) ON DELETE SET NULL
    )"#,
    r#"
    CREATE TABLE IF NOT EXISTS comments (
        id SERIAL PRIMARY KEY,
        content TEXT NOT NULL,
        created_at TIMESTAMP NOT NULL DEFAULT CURRENT_TIMESTAMP,
        updated_at TIMESTAMP,
        user_id INT NOT NULL REFERENCES users(id) ON DELETE CASCADE,
        thread_id INT NOT NULL REFERENCES threads(id) ON DELETE CASCADE
    )"#,
];

/// PostgreSQL-backed store over a shared connection pool
#[derive(Clone)]
pub struct PgStore {
    pool: PgPool,
}

impl PgStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Open the pool with the configured size and recycling policy
    pub async fn connect(config: &DatabaseConfig) -> Result<Self, StoreError> {
        info!(
            "Connecting to database {} (max {} connections, lifetime {}s)",
            redact_url(&config.url),
            config.max_connections,
            config.max_lifetime_secs
        );

        let pool = PgPoolOptions::new()
            .max_connections(config.max_connections)
            .min_connections(config.min_connections)
            .idle_timeout(Some(config.idle_timeout()))
            .max_lifetime(Some(config.max_lifetime()))
            .acquire_timeout(config.connect_timeout())
            .connect(&config.url)
            .await?;

        Ok(Self::new(pool))
    }

    pub fn pool(&self) -> &PgPool {
        &self.pool
    }

    /// Create tables if they do not exist and seed the predefined categories
    pub async fn bootstrap(&self) -> Result<(), StoreError> {
        for statement in SCHEMA {
            sqlx::query(statement).execute(&self.pool).await?;
        }

        for name in PREDEFINED_CATEGORIES {
            sqlx::query("INSERT INTO categories (name) VALUES ($1) ON CONFLICT (name) DO NOTHING")
                .bind(*name)
                .execute(&self.pool)
                .await?;
        }

        info!("All tables are set up and categories seeded");
        Ok(())
    }

    pub async fn close(&self) {
        self.pool.close().await;
    }
}

#[async_trait]
impl ForumStore for PgStore {
    async fn ping(&self) -> Result<(), StoreError> {
        sqlx::query("SELECT 1").execute(&self.pool).await?;
        Ok(())
    }

    async fn create_user(&self, user: NewUser) -> Result<User, StoreError> {
        let created = sqlx::query_as::<_, User>(
            "INSERT INTO users (username, email, password_hash) VALUES ($1, $2, $3) \
             RETURNING id, username, email",
        )
        .bind(&user.username)
        .bind(&user.email)
        .bind(&user.password_hash)
        .fetch_one(&self.pool)
        .await?;
        Ok(created)
    }

    async fn user_by_id(&self, id: i32) -> Result<Option<User>, StoreError> {
        let user = sqlx::query_as::<_, User>("SELECT id, username, email FROM users WHERE id = $1")
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;
        Ok(user)
    }

    async fn credentials_by_username(
        &self,
        username: &str,
    ) -> Result<Option<CredentialRecord>, StoreError> {
        let record = sqlx::query_as::<_, CredentialRecord>(
            "SELECT id, username, password_hash FROM users WHERE username = $1",
        )
        .bind(username)
        .fetch_optional(&self.pool)
        .await?;
        Ok(record)
    }

    async fn delete_user(&self, id: i32) -> Result<bool, StoreError> {
        let result = sqlx::query("DELETE FROM users WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }

    async fn list_categories(&self) -> Result<Vec<Category>, StoreError> {
        let categories = sqlx::query_as::<_, Category>("SELECT id, name FROM categories ORDER BY id")
            .fetch_all(&self.pool)
            .await?;
        Ok(categories)
    }

    async fn category_by_id(&self, id: i32) -> Result<Option<Category>, StoreError> {
        let category = sqlx::query_as::<_, Category>("SELECT id, name FROM categories WHERE id = $1")
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;
        Ok(category)
    }

    async fn list_threads(&self) -> Result<Vec<Thread>, StoreError> {
        let sql = format!("SELECT {} FROM threads ORDER BY id", THREAD_COLUMNS);
        let threads = sqlx::query_as::<_, Thread>(&sql)
            .fetch_all(&self.pool)
            .await?;
        Ok(threads)
    }

    async fn thread_by_id(&self, id: i32) -> Result<Option<Thread>, StoreError> {
        let sql = format!("SELECT {} FROM threads WHERE id = $1", THREAD_COLUMNS);
        let thread = sqlx::query_as::<_, Thread>(&sql)
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;
        Ok(thread)
    }

    async fn threads_by_user(&self, user_id: i32) -> Result<Vec<Thread>, StoreError> {
        let sql = format!(
            "SELECT {} FROM threads WHERE user_id = $1 ORDER BY id",
            THREAD_COLUMNS
        );
        let threads = sqlx::query_as::<_, Thread>(&sql)
            .bind(user_id)
            .fetch_all(&self.pool)
            .await?;
        Ok(threads)
    }

    async fn threads_by_category(&self, category_id: i32) -> Result<Vec<Thread>, StoreError> {
        let sql = format!(
            "SELECT {} FROM threads WHERE category_id = $1 ORDER BY id",
            THREAD_COLUMNS
        );
        let threads = sqlx::query_as::<_, Thread>(&sql)
            .bind(category_id)
            .fetch_all(&self.pool)
            .await?;
        Ok(threads)
    }

    async fn create_thread(&self, thread: NewThread) -> Result<Thread, StoreError> {
        let sql = format!(
            "INSERT INTO threads (user_id, title, content, created_at, category_id) \
             VALUES ($1, $2, $3, NOW(), $4) RETURNING {}",
            THREAD_COLUMNS
        );
        let created = sqlx::query_as::<_, Thread>(&sql)
            .bind(thread.user_id)
            .bind(&thread.title)
            .bind(&thread.content)
            .bind(thread.category_id)
            .fetch_one(&self.pool)
            .await?;
        Ok(created)
    }

    async fn update_thread(
        &self,
        id: i32,
        changes: ThreadChanges,
    ) -> Result<Option<Thread>, StoreError> {
        let sql = format!(
            "UPDATE threads SET title = $1, content = $2, category_id = $3, updated_at = NOW() \
             WHERE id = $4 RETURNING {}",
            THREAD_COLUMNS
        );
        let updated = sqlx::query_as::<_, Thread>(&sql)
            .bind(&changes.title)
            .bind(&changes.content)
            .bind(changes.category_id)
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;
        Ok(updated)
    }

    async fn delete_thread(&self, id: i32) -> Result<bool, StoreError> {
        let result = sqlx::query("DELETE FROM threads WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }

    async fn comments_by_thread(&self, thread_id: i32) -> Result<Vec<Comment>, StoreError> {
        let sql = format!(
            "SELECT {} FROM comments WHERE thread_id = $1 ORDER BY id",
            COMMENT_COLUMNS
        );
        let comments = sqlx::query_as::<_, Comment>(&sql)
            .bind(thread_id)
            .fetch_all(&self.pool)
            .await?;
        Ok(comments)
    }

    async fn comments_by_user(&self, user_id: i32) -> Result<Vec<Comment>, StoreError> {
        let sql = format!(
            "SELECT {} FROM comments WHERE user_id = $1 ORDER BY created_at DESC, id DESC",
            COMMENT_COLUMNS
        );
        let comments = sqlx::query_as::<_, Comment>(&sql)
            .bind(user_id)
            .fetch_all(&self.pool)
            .await?;
        Ok(comments)
    }

    async fn comment_by_id(&self, id: i32) -> Result<Option<Comment>, StoreError> {
        let sql = format!("SELECT {} FROM comments WHERE id = $1", COMMENT_COLUMNS);
        let comment = sqlx::query_as::<_, Comment>(&sql)
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;
        Ok(comment)
    }

    async fn create_comment(&self, comment: NewComment) -> Result<Comment, StoreError> {
        let sql = format!(
            "INSERT INTO comments (content, created_at, user_id, thread_id) \
             VALUES ($1, NOW(), $2, $3) RETURNING {}",
            COMMENT_COLUMNS
        );
        let created = sqlx::query_as::<_, Comment>(&sql)
            .bind(&comment.content)
            .bind(comment.user_id)
            .bind(comment.thread_id)
            .fetch_one(&self.pool)
            .await?;
        Ok(created)
    }

    async fn update_comment(
        &self,
        id: i32,
        changes: CommentChanges,
    ) -> Result<Option<Comment>, StoreError> {
        let sql = format!(
            "UPDATE comments SET content = $1, updated_at = NOW() WHERE id = $2 RETURNING {}",
            COMMENT_COLUMNS
        );
        let updated = sqlx::query_as::<_, Comment>(&sql)
            .bind(&changes.content)
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;
        Ok(updated)
    }

    async fn delete_comment(&self, id: i32) -> Result<bool, StoreError> {
        let result = sqlx::query("DELETE FROM comments WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }
}

/// Render a connection string for logs with any password masked
pub fn redact_url(raw: &str) -> String {
    match url::Url::parse(raw) {
        Ok(mut parsed) => {
            if parsed.password().is_some() {
                let _ = parsed.set_password(Some("****"));
            }
            parsed.to_string()
        }
        Err(_) => "<unparseable database url>".to_string(),
    }
}
