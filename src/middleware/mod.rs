//! # Middleware Module
//!
//! The request pipeline, outermost first:
//!
//! 1. `recover`: turns panics anywhere downstream into one 500, which
//!    carries the security headers too
//! 2. `logging`: one line per request
//! 3. `headers`: fixed security headers on every response
//! 4. session load/save (`crate::session::session_layer`)
//! 5. `auth::authenticate`: resolves the session's user into an `AuthStatus`
//! 6. `auth::require_auth`: protected routes only
//!
//! Stages 4-6 wrap the page routes only; static files and the 404
//! fallback never touch the session. The chain is assembled in
//! `crate::routes`.

pub mod auth;
pub mod headers;
pub mod logging;
pub mod recover;
