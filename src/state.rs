//! # Application State
//!
//! The dependency bundle handed to the router with `with_state`. Built
//! once in `main` (or a test harness) and cloned per request; every field
//! is either a pool handle or an `Arc`, so clones are cheap and no
//! process-wide singletons exist.

use crate::config::Config;
use crate::db::{self, snippets::SnippetStore, users::UserStore};
use crate::error::AppResult;
use crate::templates::TemplateCache;
use sqlx::sqlite::SqlitePool;
use std::sync::Arc;

#[derive(Clone)]
pub struct AppState {
    /// Shared connection pool, also backing the session store
    pub db: SqlitePool,

    pub snippets: SnippetStore,
    pub users: UserStore,

    /// Compiled pages, read-only after startup
    pub templates: Arc<TemplateCache>,
}

impl AppState {
    /// Connect to the database, migrate it and compile every template.
    ///
    /// # Errors
    /// Returns an error if the database is unreachable, a migration fails,
    /// or any template cannot be read or parsed.
    pub async fn new(config: &Config) -> AppResult<Self> {
        let db = db::connect(&config.database_url).await?;
        let templates = TemplateCache::new(&config.template_dir)?;

        Ok(Self::from_parts(db, templates))
    }

    pub fn from_parts(db: SqlitePool, templates: TemplateCache) -> Self {
        AppState {
            snippets: SnippetStore::new(db.clone()),
            users: UserStore::new(db.clone()),
            db,
            templates: Arc::new(templates),
        }
    }

    /// Close every pooled connection. Call once, after the server stops.
    pub async fn close(&self) {
        self.db.close().await;
        tracing::info!("database pool closed");
    }
}
