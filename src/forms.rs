//! # Form Objects
//!
//! Request-scoped structures holding decoded form input together with a
//! [`Validator`]. They are never persisted. Passwords are skipped when a
//! form is serialized into template data, so a re-rendered form never
//! echoes one back.

use axum::{
    extract::{FromRequest, Request},
    Form,
};
use serde::{de::DeserializeOwned, Deserialize, Serialize};

use crate::error::AppError;
use crate::validator::{self, Validator, EMAIL_RX};

const BLANK: &str = "This field cannot be blank";

/// Expiry choices offered by the create form, in days
pub const EXPIRY_DAYS: [i64; 3] = [1, 7, 365];

/// URL-encoded body decoder whose failures are plain 400 client errors.
///
/// A field that cannot be coerced to its declared type (e.g.
/// `expires=soon`) rejects the request before any handler code runs.
pub struct DecodedForm<T>(pub T);

impl<T, S> FromRequest<S> for DecodedForm<T>
where
    T: DeserializeOwned + Send,
    S: Send + Sync,
{
    type Rejection = AppError;

    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        let Form(value) = Form::<T>::from_request(req, state)
            .await
            .map_err(|rejection| AppError::BadRequest(rejection.body_text()))?;

        Ok(DecodedForm(value))
    }
}

#[derive(Debug, Serialize, Deserialize)]
pub struct SnippetCreateForm {
    #[serde(default)]
    pub title: String,
    #[serde(default)]
    pub content: String,
    pub expires: i64,
    #[serde(skip_deserializing)]
    pub validator: Validator,
}

impl Default for SnippetCreateForm {
    fn default() -> Self {
        Self {
            title: String::new(),
            content: String::new(),
            expires: 365,
            validator: Validator::default(),
        }
    }
}

impl SnippetCreateForm {
    pub fn validate(&mut self) -> bool {
        let v = &mut self.validator;
        v.check_field(validator::not_blank(&self.title), "title", BLANK);
        v.check_field(
            validator::max_chars(&self.title, 100),
            "title",
            "This field cannot be more than 100 characters long",
        );
        v.check_field(validator::not_blank(&self.content), "content", BLANK);
        v.check_field(
            validator::permitted_value(self.expires, &EXPIRY_DAYS),
            "expires",
            "This field must equal 1, 7 or 365",
        );
        v.valid()
    }
}

#[derive(Debug, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct SignupForm {
    pub name: String,
    pub email: String,
    #[serde(skip_serializing)]
    pub password: String,
    #[serde(skip_deserializing)]
    pub validator: Validator,
}

impl SignupForm {
    pub fn validate(&mut self) -> bool {
        let v = &mut self.validator;
        v.check_field(validator::not_blank(&self.name), "name", BLANK);
        v.check_field(validator::not_blank(&self.email), "email", BLANK);
        v.check_field(
            validator::matches(&self.email, &EMAIL_RX),
            "email",
            "This field must be a valid email address",
        );
        v.check_field(validator::not_blank(&self.password), "password", BLANK);
        v.check_field(
            validator::min_chars(&self.password, 8),
            "password",
            "This field must be at least 8 characters long",
        );
        v.valid()
    }
}

#[derive(Debug, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct LoginForm {
    pub email: String,
    #[serde(skip_serializing)]
    pub password: String,
    #[serde(skip_deserializing)]
    pub validator: Validator,
}

impl LoginForm {
    pub fn validate(&mut self) -> bool {
        let v = &mut self.validator;
        v.check_field(validator::not_blank(&self.email), "email", BLANK);
        v.check_field(
            validator::matches(&self.email, &EMAIL_RX),
            "email",
            "This field must be a valid email address",
        );
        v.check_field(validator::not_blank(&self.password), "password", BLANK);
        v.valid()
    }
}
