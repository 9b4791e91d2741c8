use crate::error::AppError;
use crate::session::AUTHENTICATED_USER_ID;
use crate::state::AppState;
use axum::{
    extract::{Request, State},
    http::{header, HeaderValue},
    middleware::Next,
    response::{IntoResponse, Redirect, Response},
};
use tower_sessions::Session;

/// Where unauthenticated visitors of protected routes are sent.
pub const LOGIN_PATH: &str = "/user/login";

/// Authentication status of one request, resolved once by [`authenticate`].
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum AuthStatus {
    #[default]
    Anonymous,
    Authenticated,
}

impl AuthStatus {
    pub fn is_authenticated(self) -> bool {
        self == AuthStatus::Authenticated
    }
}

/// Resolve the session's user id into an [`AuthStatus`] request extension.
///
/// A session pointing at a user that no longer exists is treated as
/// anonymous rather than as an error. A storage failure during the lookup
/// ends the request with a 500 and never marks it authenticated.
pub async fn authenticate(
    State(state): State<AppState>,
    session: Session,
    mut request: Request,
    next: Next,
) -> Result<Response, AppError> {
    let user_id: i64 = session.get(AUTHENTICATED_USER_ID).await?.unwrap_or(0);
    if user_id == 0 {
        return Ok(next.run(request).await);
    }

    if state.users.exists(user_id).await? {
        request.extensions_mut().insert(AuthStatus::Authenticated);
    } else {
        tracing::debug!(user_id, "session refers to a user that no longer exists");
    }

    Ok(next.run(request).await)
}

/// Gate for protected routes.
///
/// Anonymous requests are redirected to the login page and the handler
/// never runs. Authenticated responses are marked `Cache-Control: no-store`.
pub async fn require_auth(request: Request, next: Next) -> Response {
    let status = request
        .extensions()
        .get::<AuthStatus>()
        .copied()
        .unwrap_or_default();

    if !status.is_authenticated() {
        return Redirect::to(LOGIN_PATH).into_response();
    }

    let mut response = next.run(request).await;
    response
        .headers_mut()
        .insert(header::CACHE_CONTROL, HeaderValue::from_static("no-store"));
    response
}
