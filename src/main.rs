//! # Snippetbox Server
//!
//! Entry point: logging, configuration, shared state, the session
//! clean-up task, then the HTTP server.

use std::net::SocketAddr;

use snippetbox::config::Config;
use snippetbox::routes::routes;
use snippetbox::session::{session_layer, session_store};
use snippetbox::state::AppState;
use tower_sessions::ExpiredDeletion;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // RUST_LOG overrides the default filter
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "info,snippetbox=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let config = Config::from_env()?;
    tracing::info!("Configuration loaded: {:?}", config);

    let app_state = AppState::new(&config).await?;
    tracing::info!("Application state initialized");

    // Expired session rows are invisible to the store but still occupy the
    // table; sweep them hourly.
    let sweeper = session_store(app_state.db.clone()).await?;
    tokio::spawn(async move {
        let mut interval = tokio::time::interval(std::time::Duration::from_secs(3600));
        loop {
            interval.tick().await;
            tracing::debug!("Deleting expired sessions");
            if let Err(e) = sweeper.delete_expired().await {
                tracing::error!("Session cleanup failed: {:?}", e);
            }
        }
    });

    let sessions = session_layer(app_state.db.clone(), config.session_secure).await?;
    let app = routes(app_state.clone(), sessions, &config.static_dir);

    let bind_addr = config.bind_address();
    tracing::info!("Starting server on {}", bind_addr);

    let listener = tokio::net::TcpListener::bind(&bind_addr).await?;
    axum::serve(
        listener,
        app.into_make_service_with_connect_info::<SocketAddr>(),
    )
    .with_graceful_shutdown(shutdown_signal())
    .await?;

    app_state.close().await;
    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!("Failed to listen for shutdown signal: {:?}", e);
    }
    tracing::info!("Shutting down");
}
