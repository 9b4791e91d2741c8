use crate::db::models::User;
use crate::error::{AppError, AppResult};
use sqlx::SqlitePool;

/// bcrypt work factor used for every stored password
pub const PASSWORD_COST: u32 = 12;

const INSERT_USER: &str = "INSERT INTO users (name, email, hashed_password, created)
     VALUES (?, ?, ?, datetime('now'))";

const FIND_BY_EMAIL: &str =
    "SELECT id, name, email, hashed_password, created FROM users WHERE email = ?";

const EXISTS: &str = "SELECT id FROM users WHERE id = ?";

/// Account persistence and credential checks
#[derive(Clone)]
pub struct UserStore {
    pool: SqlitePool,
}

impl UserStore {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }

    /// Register a new account.
    ///
    /// The password is hashed before it gets anywhere near the database. A
    /// collision on the unique email index is reported as
    /// `AppError::DuplicateEmail`; every other failure passes through.
    pub async fn insert(&self, name: &str, email: &str, password: &str) -> AppResult<()> {
        let hashed_password = hash_password(password.to_string()).await?;

        let mut tx = self.pool.begin().await?;

        sqlx::query(INSERT_USER)
            .bind(name)
            .bind(email)
            .bind(&hashed_password)
            .execute(&mut *tx)
            .await
            .map_err(|e| match e {
                sqlx::Error::Database(ref db) if db.is_unique_violation() => {
                    AppError::DuplicateEmail
                }
                _ => AppError::Database(e),
            })?;

        tx.commit().await?;

        tracing::info!(email, "user registered");
        Ok(())
    }

    /// Check an email/password pair and return the matching user id.
    ///
    /// An unknown email and a wrong password both yield
    /// `AppError::InvalidCredentials`.
    pub async fn authenticate(&self, email: &str, password: &str) -> AppResult<i64> {
        let user = sqlx::query_as::<_, User>(FIND_BY_EMAIL)
            .bind(email)
            .fetch_one(&self.pool)
            .await
            .map_err(|e| match e {
                sqlx::Error::RowNotFound => AppError::InvalidCredentials,
                _ => AppError::Database(e),
            })?;

        if !verify_password(password.to_string(), user.hashed_password).await? {
            return Err(AppError::InvalidCredentials);
        }

        Ok(user.id)
    }

    /// Whether an account with this id still exists.
    pub async fn exists(&self, id: i64) -> AppResult<bool> {
        let found: Option<i64> = sqlx::query_scalar(EXISTS)
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;

        Ok(found.is_some())
    }
}

// bcrypt is deliberately slow; keep it off the async workers.

async fn hash_password(password: String) -> AppResult<String> {
    tokio::task::spawn_blocking(move || bcrypt::hash(password, PASSWORD_COST))
        .await
        .map_err(|e| AppError::Internal(format!("hash task failed: {}", e)))?
        .map_err(AppError::from)
}

async fn verify_password(password: String, hash: String) -> AppResult<bool> {
    tokio::task::spawn_blocking(move || bcrypt::verify(password, &hash))
        .await
        .map_err(|e| AppError::Internal(format!("verify task failed: {}", e)))?
        .map_err(AppError::from)
}
