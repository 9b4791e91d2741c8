//! # User Handlers
//!
//! Signup, login and logout. Login and logout both rotate the session id.

use crate::error::{AppError, AppResult};
use crate::forms::{DecodedForm, LoginForm, SignupForm};
use crate::handlers::{render, template_data};
use crate::session::RequestContext;
use crate::state::AppState;
use axum::{
    extract::State,
    http::StatusCode,
    response::{IntoResponse, Redirect, Response},
};

/// Shown for both unknown emails and wrong passwords
pub const INVALID_CREDENTIALS: &str = "Email or password is incorrect";

/// GET /user/signup
pub async fn signup(State(state): State<AppState>, ctx: RequestContext) -> AppResult<Response> {
    let data = template_data(&ctx).await?.with_form(&SignupForm::default());
    render(&state, StatusCode::OK, "signup.html", &data)
}

/// POST /user/signup
///
/// A taken email is reported on the email field, like any other
/// validation failure.
pub async fn signup_post(
    State(state): State<AppState>,
    ctx: RequestContext,
    DecodedForm(mut form): DecodedForm<SignupForm>,
) -> AppResult<Response> {
    if !form.validate() {
        let data = template_data(&ctx).await?.with_form(&form);
        return render(&state, StatusCode::UNPROCESSABLE_ENTITY, "signup.html", &data);
    }

    match state.users.insert(&form.name, &form.email, &form.password).await {
        Ok(()) => {}
        Err(AppError::DuplicateEmail) => {
            form.validator
                .add_field_error("email", "Email address is already in use");
            let data = template_data(&ctx).await?.with_form(&form);
            return render(&state, StatusCode::UNPROCESSABLE_ENTITY, "signup.html", &data);
        }
        Err(e) => return Err(e),
    }

    ctx.put_flash("Your signup was successful. Please log in.")
        .await?;

    Ok(Redirect::to("/user/login").into_response())
}

/// GET /user/login
pub async fn login(State(state): State<AppState>, ctx: RequestContext) -> AppResult<Response> {
    let data = template_data(&ctx).await?.with_form(&LoginForm::default());
    render(&state, StatusCode::OK, "login.html", &data)
}

/// POST /user/login
pub async fn login_post(
    State(state): State<AppState>,
    ctx: RequestContext,
    DecodedForm(mut form): DecodedForm<LoginForm>,
) -> AppResult<Response> {
    if !form.validate() {
        let data = template_data(&ctx).await?.with_form(&form);
        return render(&state, StatusCode::UNPROCESSABLE_ENTITY, "login.html", &data);
    }

    let user_id = match state.users.authenticate(&form.email, &form.password).await {
        Ok(id) => id,
        Err(AppError::InvalidCredentials) => {
            form.validator.add_non_field_error(INVALID_CREDENTIALS);
            let data = template_data(&ctx).await?.with_form(&form);
            return render(&state, StatusCode::UNPROCESSABLE_ENTITY, "login.html", &data);
        }
        Err(e) => return Err(e),
    };

    ctx.log_in(user_id).await?;
    tracing::info!(user_id, "user logged in");

    Ok(Redirect::to("/").into_response())
}

/// POST /user/logout
pub async fn logout_post(ctx: RequestContext) -> AppResult<Response> {
    ctx.log_out().await?;
    ctx.put_flash("You've been logged out successfully!").await?;

    Ok(Redirect::to("/").into_response())
}
