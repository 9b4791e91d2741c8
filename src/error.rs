//! # Error Handling
//!
//! This module defines the application error type and how each kind of
//! failure turns into an HTTP response.
//!
//! ## Error Categories
//! - **Client input**: undecodable form bodies (400). Field validation
//!   failures never become an `AppError`; handlers re-render the form.
//! - **Not found**: missing or expired snippets, unknown routes (404)
//! - **Domain sentinels**: `NoRecord`, `DuplicateEmail`, `InvalidCredentials`.
//!   Call sites match on these variants, never on message text.
//! - **Server faults**: storage, session, template and hashing failures.
//!   Logged with a stack trace, answered with a generic 500.

use std::backtrace::Backtrace;

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
};
use thiserror::Error;

/// Application-wide error type
///
/// The `#[from]` conversions let store and handler code use `?` directly on
/// sqlx, session, template and bcrypt results.
#[derive(Error, Debug)]
pub enum AppError {
    /// Database errors (SQLx library errors)
    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),

    /// Schema migration failed at startup
    #[error("Migration error: {0}")]
    Migration(#[from] sqlx::migrate::MigrateError),

    /// Session store load/save failures
    #[error("Session error: {0}")]
    Session(#[from] tower_sessions::session::Error),

    /// Template lookup or execution failures
    #[error("Template error: {0}")]
    Template(#[from] minijinja::Error),

    /// Filesystem failures while loading templates at startup
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Password hashing failures (not mismatches, see `InvalidCredentials`)
    #[error("Password hash error: {0}")]
    PasswordHash(#[from] bcrypt::BcryptError),

    /// No live row matched the lookup. Expired and never-existing snippets
    /// are deliberately indistinguishable.
    #[error("models: no matching record found")]
    NoRecord,

    /// Insert collided with the unique index on `users.email`
    #[error("models: duplicate email")]
    DuplicateEmail,

    /// Unknown email or wrong password; the two are never told apart
    #[error("models: invalid credentials")]
    InvalidCredentials,

    /// Form body could not be decoded into the expected fields (400)
    #[error("Bad request: {0}")]
    BadRequest(String),

    /// Resource not found (404)
    #[error("Not found")]
    NotFound,

    /// Unexpected internal condition (500)
    #[error("Internal server error: {0}")]
    Internal(String),
}

impl AppError {
    pub fn status(&self) -> StatusCode {
        match self {
            AppError::BadRequest(_) => StatusCode::BAD_REQUEST,
            AppError::NotFound | AppError::NoRecord => StatusCode::NOT_FOUND,
            AppError::InvalidCredentials => StatusCode::UNAUTHORIZED,
            AppError::DuplicateEmail => StatusCode::CONFLICT,
            _ => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

/// Convert AppError into an HTTP response
///
/// Client-side errors answer with the bare status text. Everything that
/// maps to a 500 is logged in full, together with a stack trace, and the
/// caller only ever sees "Internal Server Error".
impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = self.status();

        if status.is_server_error() {
            tracing::error!("{}\n{}", self, Backtrace::force_capture());
        } else {
            tracing::debug!(%status, "client error: {}", self);
        }

        status_text_response(status)
    }
}

/// Plain-text response carrying only the canonical reason phrase.
pub fn status_text_response(status: StatusCode) -> Response {
    let text = status.canonical_reason().unwrap_or("Error");
    (status, text.to_string()).into_response()
}

/// Convenience type alias for Results using AppError
pub type AppResult<T> = Result<T, AppError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn sentinels_map_to_client_statuses() {
        assert_eq!(AppError::NoRecord.status(), StatusCode::NOT_FOUND);
        assert_eq!(AppError::NotFound.status(), StatusCode::NOT_FOUND);
        assert_eq!(
            AppError::BadRequest("expires".into()).status(),
            StatusCode::BAD_REQUEST
        );
    }

    #[test]
    fn storage_errors_are_generic_500s() {
        let response = AppError::Database(sqlx::Error::PoolClosed).into_response();
        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);

        let response = AppError::Internal("boom".into()).into_response();
        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
    }
}
