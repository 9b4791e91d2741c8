//! # Routes
//!
//! | Method | Path               | Auth     |
//! |--------|--------------------|----------|
//! | GET    | /                  | any      |
//! | GET    | /snippet/view/{id} | any      |
//! | GET    | /snippet/create    | required |
//! | POST   | /snippet/create    | required |
//! | GET    | /user/signup       | any      |
//! | POST   | /user/signup       | any      |
//! | GET    | /user/login        | any      |
//! | POST   | /user/login        | any      |
//! | POST   | /user/logout       | required |
//!
//! Layers added later wrap the ones added before them, so the outermost
//! stage is the last `.layer` call.

use std::path::Path;

use axum::{
    middleware,
    routing::{get, post},
    Router,
};
use tower_http::{catch_panic::CatchPanicLayer, services::ServeDir};
use tower_sessions::SessionManagerLayer;
use tower_sessions_sqlx_store::SqliteStore;

use crate::handlers::{self, snippets::*, users::*};
use crate::middleware::{
    auth::{authenticate, require_auth},
    headers::secure_headers,
    logging::log_request,
    recover::handle_panic,
};
use crate::state::AppState;

/// Assemble the full application.
pub fn routes(
    state: AppState,
    sessions: SessionManagerLayer<SqliteStore>,
    static_dir: impl AsRef<Path>,
) -> Router {
    let protected = Router::new()
        .route(
            "/snippet/create",
            get(snippet_create).post(snippet_create_post),
        )
        .route("/user/logout", post(logout_post))
        .route_layer(middleware::from_fn(require_auth));

    let pages = Router::new()
        .route("/", get(home))
        .route("/snippet/view/{id}", get(snippet_view))
        .route("/user/signup", get(signup).post(signup_post))
        .route("/user/login", get(login).post(login_post))
        .merge(protected)
        .route_layer(middleware::from_fn_with_state(state.clone(), authenticate))
        .layer(sessions);

    Router::new()
        .merge(pages)
        .nest_service("/static", ServeDir::new(static_dir))
        .fallback(handlers::not_found)
        .layer(middleware::from_fn(secure_headers))
        .layer(middleware::from_fn(log_request))
        .layer(CatchPanicLayer::custom(handle_panic))
        .with_state(state)
}
