//! # Template Cache
//!
//! Every page under `pages/` is compiled once at startup together with
//! `base.html` and all of `partials/` into its own `minijinja::Environment`.
//! Requests only ever look pages up and execute them; nothing is parsed
//! after [`TemplateCache::new`] returns.
//!
//! ## Layout
//! ```text
//! ui/html/
//! ├── base.html          layout, defines `title` and `main` blocks
//! ├── partials/*.html    included by base (nav, ...)
//! └── pages/*.html       each `{% extends "base.html" %}`
//! ```

use std::collections::HashMap;
use std::fs;
use std::path::{Path, PathBuf};

use chrono::{DateTime, Datelike, Utc};
use minijinja::{Environment, ErrorKind};
use serde::Serialize;

use crate::db::models::Snippet;
use crate::error::{AppError, AppResult};

/// Compiled page templates keyed by page file name (e.g. `"home.html"`).
///
/// Read-only after construction, shared across requests behind an `Arc`.
pub struct TemplateCache {
    pages: HashMap<String, Environment<'static>>,
}

impl TemplateCache {
    /// Build the cache from a template root directory.
    ///
    /// Any unreadable file or template syntax error fails startup.
    pub fn new(dir: impl AsRef<Path>) -> AppResult<Self> {
        let dir = dir.as_ref();
        let base = fs::read_to_string(dir.join("base.html"))?;
        let partials = html_files(&dir.join("partials"))?
            .into_iter()
            .map(|path| {
                let name = format!("partials/{}", file_name(&path));
                fs::read_to_string(&path).map(|source| (name, source))
            })
            .collect::<Result<Vec<_>, _>>()?;

        let mut pages = HashMap::new();
        for page in html_files(&dir.join("pages"))? {
            let name = file_name(&page);

            let mut env = Environment::new();
            env.add_filter("human_date", human_date);
            env.add_template_owned("base.html", base.clone())?;
            for (partial, source) in &partials {
                env.add_template_owned(partial.clone(), source.clone())?;
            }
            env.add_template_owned(name.clone(), fs::read_to_string(&page)?)?;

            pages.insert(name, env);
        }

        tracing::info!(pages = pages.len(), dir = %dir.display(), "template cache built");
        Ok(Self { pages })
    }

    /// Execute a page into a complete string.
    ///
    /// An unregistered page name is a server error, not a 404. Nothing is
    /// returned unless rendering ran to completion.
    pub fn render<T: Serialize>(&self, page: &str, data: &T) -> AppResult<String> {
        let env = self
            .pages
            .get(page)
            .ok_or_else(|| AppError::Internal(format!("the template {} does not exist", page)))?;

        let body = env.get_template(page)?.render(data)?;
        Ok(body)
    }
}

/// Payload shared by every page.
#[derive(Debug, Default, Serialize)]
pub struct TemplateData {
    pub current_year: i32,
    pub flash: Option<String>,
    pub is_authenticated: bool,
    pub form: Option<minijinja::Value>,
    pub snippet: Option<Snippet>,
    pub snippets: Vec<Snippet>,
}

impl TemplateData {
    pub fn new(flash: Option<String>, is_authenticated: bool) -> Self {
        Self {
            current_year: Utc::now().year(),
            flash,
            is_authenticated,
            ..Default::default()
        }
    }

    pub fn with_form<F: Serialize>(mut self, form: &F) -> Self {
        self.form = Some(minijinja::Value::from_serialize(form));
        self
    }
}

/// `{{ snippet.created | human_date }}` → "05 Mar 2024 at 17:09"
fn human_date(value: String) -> Result<String, minijinja::Error> {
    let parsed = DateTime::parse_from_rfc3339(&value).map_err(|e| {
        minijinja::Error::new(ErrorKind::InvalidOperation, format!("not a timestamp: {}", e))
    })?;

    Ok(parsed.with_timezone(&Utc).format("%d %b %Y at %H:%M").to_string())
}

fn html_files(dir: &Path) -> std::io::Result<Vec<PathBuf>> {
    let mut files = Vec::new();
    for entry in fs::read_dir(dir)? {
        let path = entry?.path();
        if path.extension().is_some_and(|ext| ext == "html") {
            files.push(path);
        }
    }
    files.sort();
    Ok(files)
}

fn file_name(path: &Path) -> String {
    path.file_name()
        .map(|name| name.to_string_lossy().into_owned())
        .unwrap_or_default()
}
