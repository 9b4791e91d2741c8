use crate::error::{AppError, AppResult};
use crate::forms::{DecodedForm, SnippetCreateForm};
use crate::handlers::{render, template_data};
use crate::session::RequestContext;
use crate::state::AppState;
use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::{IntoResponse, Redirect, Response},
};

/// GET / - the ten newest live snippets
pub async fn home(State(state): State<AppState>, ctx: RequestContext) -> AppResult<Response> {
    let snippets = state.snippets.latest().await?;

    let mut data = template_data(&ctx).await?;
    data.snippets = snippets;

    render(&state, StatusCode::OK, "home.html", &data)
}

/// GET /snippet/view/{id}
///
/// Non-numeric or non-positive ids are 404s, same as expired or missing
/// snippets.
pub async fn snippet_view(
    State(state): State<AppState>,
    ctx: RequestContext,
    Path(id): Path<String>,
) -> AppResult<Response> {
    let id = match id.parse::<i64>() {
        Ok(id) if id >= 1 => id,
        _ => return Err(AppError::NotFound),
    };

    let snippet = state.snippets.get(id).await?;

    let mut data = template_data(&ctx).await?;
    data.snippet = Some(snippet);

    render(&state, StatusCode::OK, "view.html", &data)
}

/// GET /snippet/create
pub async fn snippet_create(
    State(state): State<AppState>,
    ctx: RequestContext,
) -> AppResult<Response> {
    let data = template_data(&ctx)
        .await?
        .with_form(&SnippetCreateForm::default());

    render(&state, StatusCode::OK, "create.html", &data)
}

/// POST /snippet/create
///
/// Invalid input re-renders the form with its field errors and a 422.
pub async fn snippet_create_post(
    State(state): State<AppState>,
    ctx: RequestContext,
    DecodedForm(mut form): DecodedForm<SnippetCreateForm>,
) -> AppResult<Response> {
    if !form.validate() {
        let data = template_data(&ctx).await?.with_form(&form);
        return render(&state, StatusCode::UNPROCESSABLE_ENTITY, "create.html", &data);
    }

    let id = state
        .snippets
        .insert(&form.title, &form.content, form.expires)
        .await?;

    ctx.put_flash("Snippet successfully created!").await?;

    Ok(Redirect::to(&format!("/snippet/view/{}", id)).into_response())
}
