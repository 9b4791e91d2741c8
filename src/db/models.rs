//! # Database Models
//!
//! Row types for the `snippets` and `users` tables.
//!
//! Timestamps are written by SQLite (`datetime('now')`, always UTC) and
//! decoded into `chrono::DateTime<Utc>` by sqlx.

use chrono::{DateTime, Utc};
use serde::Serialize;

/// A stored, time-limited text entry
///
/// A snippet is only ever returned while `expires` is in the future. Rows
/// are never updated; expired rows simply stop matching queries.
#[derive(Debug, Clone, Serialize, sqlx::FromRow)]
pub struct Snippet {
    /// Auto-generated positive identifier
    pub id: i64,

    /// At most 100 characters, never blank
    pub title: String,

    pub content: String,

    /// Set by the database at insert time
    pub created: DateTime<Utc>,

    /// `created` plus 1, 7 or 365 days, also computed by the database
    pub expires: DateTime<Utc>,
}

/// A registered account
///
/// `hashed_password` holds a bcrypt hash, never the plaintext, and is
/// skipped when the struct is serialized.
#[derive(Debug, Clone, Serialize, sqlx::FromRow)]
pub struct User {
    pub id: i64,
    pub name: String,

    /// Unique across all users (index `users_uc_email`)
    pub email: String,

    #[serde(skip_serializing)]
    pub hashed_password: String,

    pub created: DateTime<Utc>,
}
