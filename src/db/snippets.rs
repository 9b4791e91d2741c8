use crate::db::models::Snippet;
use crate::error::{AppError, AppResult};
use sqlx::SqlitePool;

const INSERT_SNIPPET: &str = "INSERT INTO snippets (title, content, created, expires)
     VALUES (?, ?, datetime('now'), datetime('now', '+' || ? || ' days'))";

const GET_SNIPPET: &str = "SELECT id, title, content, created, expires FROM snippets
     WHERE expires > datetime('now') AND id = ?";

const LATEST_SNIPPETS: &str = "SELECT id, title, content, created, expires FROM snippets
     WHERE expires > datetime('now')
     ORDER BY id DESC
     LIMIT 10";

/// Snippet persistence
///
/// Expiry is always computed by the database clock so every server instance
/// agrees on when a snippet stops being visible.
#[derive(Clone)]
pub struct SnippetStore {
    pool: SqlitePool,
}

impl SnippetStore {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }

    /// Insert a snippet that expires `expires_days` from now and return its id.
    ///
    /// The insert runs in its own transaction. Any failure drops `tx`
    /// without committing, which rolls it back.
    pub async fn insert(&self, title: &str, content: &str, expires_days: i64) -> AppResult<i64> {
        let mut tx = self.pool.begin().await?;

        let result = sqlx::query(INSERT_SNIPPET)
            .bind(title)
            .bind(content)
            .bind(expires_days)
            .execute(&mut *tx)
            .await?;

        tx.commit().await?;

        let id = result.last_insert_rowid();
        if id < 1 {
            return Err(AppError::Internal(format!("unexpected snippet id {}", id)));
        }

        tracing::debug!(id, expires_days, "snippet inserted");
        Ok(id)
    }

    /// Fetch a live snippet.
    ///
    /// Expired and never-existing ids both come back as `AppError::NoRecord`.
    pub async fn get(&self, id: i64) -> AppResult<Snippet> {
        sqlx::query_as::<_, Snippet>(GET_SNIPPET)
            .bind(id)
            .fetch_one(&self.pool)
            .await
            .map_err(|e| match e {
                sqlx::Error::RowNotFound => AppError::NoRecord,
                _ => AppError::Database(e),
            })
    }

    /// Up to ten live snippets, newest id first.
    pub async fn latest(&self) -> AppResult<Vec<Snippet>> {
        let snippets = sqlx::query_as::<_, Snippet>(LATEST_SNIPPETS)
            .fetch_all(&self.pool)
            .await?;

        Ok(snippets)
    }
}
