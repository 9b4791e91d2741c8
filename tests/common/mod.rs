#![allow(dead_code)]

use anyhow::{Context, Result};
use axum::{
    body::Body,
    http::{header, HeaderMap, Request, StatusCode},
    Router,
};
use http_body_util::BodyExt;
use tower::ServiceExt;

use snippetbox::db;
use snippetbox::routes::routes;
use snippetbox::session::session_layer;
use snippetbox::state::AppState;
use snippetbox::templates::TemplateCache;

pub const PASSWORD: &str = "pa55word!";

/// The full application over a private in-memory database, driven
/// in-process. Behaves like a browser with a cookie jar of one: the
/// session cookie from the last response is sent with the next request.
pub struct TestApp {
    pub router: Router,
    pub state: AppState,
    cookie: Option<String>,
}

pub struct TestResponse {
    pub status: StatusCode,
    pub headers: HeaderMap,
    pub body: String,
}

impl TestResponse {
    pub fn location(&self) -> Option<&str> {
        self.headers
            .get(header::LOCATION)
            .and_then(|v| v.to_str().ok())
    }
}

impl TestApp {
    pub async fn spawn() -> Result<Self> {
        let pool = db::connect_in_memory().await?;
        let templates = TemplateCache::new(concat!(env!("CARGO_MANIFEST_DIR"), "/ui/html"))?;
        let state = AppState::from_parts(pool.clone(), templates);
        let sessions = session_layer(pool, false).await?;
        let router = routes(
            state.clone(),
            sessions,
            concat!(env!("CARGO_MANIFEST_DIR"), "/ui/static"),
        );

        Ok(Self {
            router,
            state,
            cookie: None,
        })
    }

    pub fn session_cookie(&self) -> Option<&str> {
        self.cookie.as_deref()
    }

    /// Expiry recorded by the store for the current session cookie.
    pub async fn session_expiry(&self) -> Result<String> {
        let id = self
            .session_cookie()
            .and_then(|c| c.strip_prefix("id="))
            .context("no session cookie")?;

        let expiry: String =
            sqlx::query_scalar("SELECT CAST(expiry_date AS TEXT) FROM tower_sessions WHERE id = ?")
                .bind(id)
                .fetch_one(&self.state.db)
                .await?;
        Ok(expiry)
    }

    pub async fn get(&mut self, path: &str) -> Result<TestResponse> {
        let request = self.request("GET", path).body(Body::empty())?;
        self.send(request).await
    }

    /// POST an urlencoded form. Values must not contain `&`, `=`, `%` or `+`.
    pub async fn post_form(&mut self, path: &str, fields: &[(&str, &str)]) -> Result<TestResponse> {
        let body = fields
            .iter()
            .map(|(k, v)| format!("{}={}", k, v.replace(' ', "+")))
            .collect::<Vec<_>>()
            .join("&");

        let request = self
            .request("POST", path)
            .header(header::CONTENT_TYPE, "application/x-www-form-urlencoded")
            .body(Body::from(body))?;
        self.send(request).await
    }

    pub async fn signup(&mut self, name: &str, email: &str) -> Result<TestResponse> {
        self.post_form(
            "/user/signup",
            &[("name", name), ("email", email), ("password", PASSWORD)],
        )
        .await
    }

    pub async fn login(&mut self, email: &str, password: &str) -> Result<TestResponse> {
        self.post_form("/user/login", &[("email", email), ("password", password)])
            .await
    }

    /// Sign up and log in a fresh user; returns the login response.
    pub async fn signed_in(&mut self, email: &str) -> Result<TestResponse> {
        let res = self.signup("Test User", email).await?;
        anyhow::ensure!(res.status == StatusCode::SEE_OTHER, "signup failed: {}", res.status);

        let res = self.login(email, PASSWORD).await?;
        anyhow::ensure!(res.status == StatusCode::SEE_OTHER, "login failed: {}", res.status);
        Ok(res)
    }

    fn request(&self, method: &str, path: &str) -> axum::http::request::Builder {
        let builder = Request::builder().method(method).uri(path);
        match &self.cookie {
            Some(cookie) => builder.header(header::COOKIE, cookie),
            None => builder,
        }
    }

    async fn send(&mut self, request: Request<Body>) -> Result<TestResponse> {
        let response = self.router.clone().oneshot(request).await?;

        for value in response.headers().get_all(header::SET_COOKIE) {
            let value = value.to_str().context("non-ascii cookie")?;
            if let Some(pair) = value.split(';').next() {
                if pair.starts_with("id=") {
                    self.cookie = Some(pair.to_string());
                }
            }
        }

        let status = response.status();
        let headers = response.headers().clone();
        let bytes = response.into_body().collect().await?.to_bytes();

        Ok(TestResponse {
            status,
            headers,
            body: String::from_utf8(bytes.to_vec())?,
        })
    }
}
