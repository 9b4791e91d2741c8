//! # Sessions
//!
//! Server-side session state lives in the `tower_sessions` table of the
//! application database. The cookie carries only the opaque session id and
//! is marked HttpOnly (and Secure unless explicitly disabled for local
//! development).
//!
//! `SessionManagerLayer` loads the session lazily on first access and saves
//! it after the inner service returns, whatever the response was, so
//! mutations made before an early redirect or an error still persist.
//!
//! Two requests carrying the same session id race at the store; the later
//! save wins.
//!
//! A session lives for a fixed [`SESSION_LIFETIME_HOURS`] from the moment
//! it first holds data, restarting whenever the id is rotated. The deadline
//! is kept inside the session itself and re-applied as an absolute expiry on
//! every request that touches it, so later writes never push it back.

use axum::extract::FromRequestParts;
use axum::http::request::Parts;
use time::{Duration, OffsetDateTime};
use tower_sessions::{cookie::SameSite, Expiry, Session, SessionManagerLayer};
use tower_sessions_sqlx_store::SqliteStore;

use crate::error::{AppError, AppResult};
use crate::middleware::auth::AuthStatus;
use sqlx::SqlitePool;

/// Session key holding the logged-in user's id
pub const AUTHENTICATED_USER_ID: &str = "authenticated_user_id";

/// Session key holding the one-shot flash message
pub const FLASH: &str = "flash";

/// Session key holding the unix time at which the session dies
const DEADLINE: &str = "deadline";

/// Sessions live for 12 hours from creation or id rotation.
pub const SESSION_LIFETIME_HOURS: i64 = 12;

/// Create the session table if needed and build the session layer.
pub async fn session_layer(
    pool: SqlitePool,
    secure: bool,
) -> AppResult<SessionManagerLayer<SqliteStore>> {
    let store = session_store(pool).await?;

    // Only applies to a session that was never given a deadline.
    Ok(SessionManagerLayer::new(store)
        .with_secure(secure)
        .with_http_only(true)
        .with_same_site(SameSite::Lax)
        .with_expiry(Expiry::OnInactivity(Duration::hours(SESSION_LIFETIME_HOURS))))
}

pub async fn session_store(pool: SqlitePool) -> AppResult<SqliteStore> {
    let store = SqliteStore::new(pool);
    store.migrate().await?;
    Ok(store)
}

/// Re-apply a stored deadline as the session's absolute expiry.
async fn pin_deadline(session: &Session) -> AppResult<()> {
    if let Some(ts) = session.get::<i64>(DEADLINE).await? {
        session.set_expiry(Some(Expiry::AtDateTime(from_unix(ts)?)));
    }
    Ok(())
}

/// Give the session a fresh deadline of now plus the full lifetime.
async fn start_lifetime(session: &Session) -> AppResult<()> {
    let deadline = OffsetDateTime::now_utc() + Duration::hours(SESSION_LIFETIME_HOURS);
    let ts = deadline.unix_timestamp();
    session.insert(DEADLINE, ts).await?;
    session.set_expiry(Some(Expiry::AtDateTime(from_unix(ts)?)));
    Ok(())
}

fn from_unix(ts: i64) -> AppResult<OffsetDateTime> {
    OffsetDateTime::from_unix_timestamp(ts)
        .map_err(|e| AppError::Internal(format!("bad session deadline {}: {}", ts, e)))
}

/// Per-request scope handed explicitly to every page handler.
///
/// Bundles the session handle with the authentication status resolved by
/// the `authenticate` middleware. Requests that never went through that
/// middleware are anonymous.
#[derive(Clone)]
pub struct RequestContext {
    pub session: Session,
    pub auth: AuthStatus,
}

impl<S> FromRequestParts<S> for RequestContext
where
    S: Send + Sync,
{
    type Rejection = AppError;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let session = Session::from_request_parts(parts, state)
            .await
            .map_err(|(_, msg)| AppError::Internal(msg.to_string()))?;

        let auth = parts
            .extensions
            .get::<AuthStatus>()
            .copied()
            .unwrap_or_default();

        pin_deadline(&session).await?;

        Ok(Self { session, auth })
    }
}

impl RequestContext {
    pub fn is_authenticated(&self) -> bool {
        self.auth.is_authenticated()
    }

    /// Read and clear the flash message.
    pub async fn pop_flash(&self) -> AppResult<Option<String>> {
        Ok(self.session.remove::<String>(FLASH).await?)
    }

    pub async fn put_flash(&self, message: &str) -> AppResult<()> {
        if self.session.get::<i64>(DEADLINE).await?.is_none() {
            start_lifetime(&self.session).await?;
        }
        self.session.insert(FLASH, message).await?;
        Ok(())
    }

    /// Bind the session to a user under a fresh id, so a token issued
    /// before login can never be reused after it.
    pub async fn log_in(&self, user_id: i64) -> AppResult<()> {
        self.session.cycle_id().await?;
        start_lifetime(&self.session).await?;
        self.session.insert(AUTHENTICATED_USER_ID, user_id).await?;
        Ok(())
    }

    /// Forget the user and rotate the id. Harmless on anonymous sessions.
    pub async fn log_out(&self) -> AppResult<()> {
        self.session.remove::<i64>(AUTHENTICATED_USER_ID).await?;
        self.session.cycle_id().await?;
        start_lifetime(&self.session).await?;
        Ok(())
    }
}
