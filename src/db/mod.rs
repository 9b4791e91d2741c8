//! # Database Module
//!
//! - `models`: Row types (Snippet, User)
//! - `snippets`: `SnippetStore`, transactional insert and live-snippet reads
//! - `users`: `UserStore`, signup, credential checks and existence lookups
//!
//! Both stores hold a clone of the same `SqlitePool`. sqlx prepares each
//! statement once per pooled connection and caches it, so any statement may
//! run on any connection.

pub mod models;
pub mod snippets;
pub mod users;

use crate::error::AppResult;
use sqlx::sqlite::{SqlitePool, SqlitePoolOptions};

/// Connect to the database and bring the schema up to date.
pub async fn connect(database_url: &str) -> AppResult<SqlitePool> {
    let pool = SqlitePool::connect(database_url).await?;
    migrate(&pool).await?;
    Ok(pool)
}

/// Open a private in-memory database with the schema applied.
///
/// Every SQLite in-memory connection is its own database, so the pool is
/// pinned to one connection that is never recycled.
pub async fn connect_in_memory() -> AppResult<SqlitePool> {
    let pool = SqlitePoolOptions::new()
        .max_connections(1)
        .idle_timeout(None)
        .max_lifetime(None)
        .connect("sqlite::memory:")
        .await?;
    migrate(&pool).await?;
    Ok(pool)
}

async fn migrate(pool: &SqlitePool) -> AppResult<()> {
    sqlx::migrate!("./migrations").run(pool).await?;
    Ok(())
}
