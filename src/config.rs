//! # Configuration Management
//!
//! Configuration comes from the environment, optionally seeded from a
//! `.env` file.
//!
//! ## Environment Variables
//! - `HOST`: Server bind address (default: 127.0.0.1)
//! - `PORT`: Server port (default: 4000)
//! - `DATABASE_URL`: SQLite database connection string
//! - `STATIC_DIR`: Directory served under `/static`
//! - `TEMPLATE_DIR`: Directory holding `base.html`, `partials/` and `pages/`
//! - `SESSION_SECURE`: Whether the session cookie carries the Secure flag

use anyhow::Result;
use std::env;
use std::path::PathBuf;

/// Application configuration
#[derive(Debug, Clone)]
pub struct Config {
    /// Server host/IP address to bind to
    pub host: String,

    /// Server port number
    pub port: u16,

    /// SQLite database connection URL
    /// Format: "sqlite:filename.db?mode=rwc"
    pub database_url: String,

    /// Root of the static assets (css, images)
    pub static_dir: PathBuf,

    /// Root of the HTML templates
    pub template_dir: PathBuf,

    /// Secure flag on the session cookie. Only turn this off for local
    /// plain-HTTP development.
    pub session_secure: bool,
}

impl Config {
    /// Load configuration from environment variables
    ///
    /// Missing variables fall back to defaults; malformed `PORT` or
    /// `SESSION_SECURE` values are errors.
    ///
    /// ## Example .env file
    /// ```text
    /// HOST=127.0.0.1
    /// PORT=4000
    /// DATABASE_URL=sqlite:snippetbox.db?mode=rwc
    /// STATIC_DIR=./ui/static
    /// TEMPLATE_DIR=./ui/html
    /// ```
    pub fn from_env() -> Result<Self> {
        dotenvy::dotenv().ok();

        Ok(Config {
            host: env::var("HOST").unwrap_or_else(|_| "127.0.0.1".to_string()),

            port: env::var("PORT")
                .unwrap_or_else(|_| "4000".to_string())
                .parse()?,

            database_url: env::var("DATABASE_URL")
                .unwrap_or_else(|_| "sqlite:snippetbox.db?mode=rwc".to_string()),

            static_dir: env::var("STATIC_DIR")
                .unwrap_or_else(|_| "./ui/static".to_string())
                .into(),

            template_dir: env::var("TEMPLATE_DIR")
                .unwrap_or_else(|_| "./ui/html".to_string())
                .into(),

            session_secure: env::var("SESSION_SECURE")
                .unwrap_or_else(|_| "true".to_string())
                .parse()?,
        })
    }

    /// Get the socket address to bind the server to, e.g. "127.0.0.1:4000"
    pub fn bind_address(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}
