//! # HTTP Request Handlers
//!
//! - `snippets`: home page, snippet view, snippet creation
//! - `users`: signup, login, logout
//!
//! ## Handler Pattern
//! Handlers take the shared `AppState`, the explicit `RequestContext`
//! (session + authentication status) and any path or form input, then
//! either render a page or redirect. They return `AppResult<Response>`;
//! server faults bubble up as `AppError` and become a logged 500.

pub mod snippets;
pub mod users;

use axum::{
    http::StatusCode,
    response::{Html, IntoResponse, Response},
};

use crate::error::{status_text_response, AppResult};
use crate::session::RequestContext;
use crate::state::AppState;
use crate::templates::TemplateData;

/// Template data every page starts from. Pops the flash message.
pub async fn template_data(ctx: &RequestContext) -> AppResult<TemplateData> {
    let flash = ctx.pop_flash().await?;
    Ok(TemplateData::new(flash, ctx.is_authenticated()))
}

/// Render a cached page with the given status.
///
/// The page is rendered in full before the response is built, so a
/// failing template yields a clean 500 instead of a truncated page.
pub fn render(
    state: &AppState,
    status: StatusCode,
    page: &str,
    data: &TemplateData,
) -> AppResult<Response> {
    let body = state.templates.render(page, data)?;
    Ok((status, Html(body)).into_response())
}

/// Fallback for unmatched routes
pub async fn not_found() -> Response {
    status_text_response(StatusCode::NOT_FOUND)
}
