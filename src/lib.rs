//! # Snippetbox
//!
//! A server where registered users create, view and list short-lived text
//! snippets behind session-based authentication.
//!
//! - `config`: environment-driven settings
//! - `db`: SQLite pool, migrations, snippet and user stores
//! - `error`: `AppError` and its HTTP mapping
//! - `forms` / `validator`: form decoding and field validation
//! - `handlers`: per-route logic
//! - `middleware`: recovery, logging, security headers, authentication
//! - `routes`: the assembled router
//! - `session`: session layer and the per-request `RequestContext`
//! - `state`: the shared dependency bundle
//! - `templates`: the precompiled page cache

pub mod config;
pub mod db;
pub mod error;
pub mod forms;
pub mod handlers;
pub mod middleware;
pub mod routes;
pub mod session;
pub mod state;
pub mod templates;
pub mod validator;
