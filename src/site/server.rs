//! Site server setup and initialization

use std::sync::Arc;

use anyhow::{Context, Result};
use tokio::net::TcpListener;

use crate::config::Config;
use crate::content::ContentRepository;

use super::router;
use super::state::AppState;

/// Serve the site until `shutdown` resolves
pub async fn start_server(
    config: &Config,
    repo: Arc<dyn ContentRepository>,
    shutdown: impl std::future::Future<Output = ()> + Send + 'static,
) -> Result<()> {
    let bind_addr = config.bind_addr;
    let state = AppState::new(config, repo);

    tracing::debug!(
        posts_per_page = state.theme.site.posts_per_page,
        max_depth = state.theme.max_depth,
        moderation = state.moderation,
        "Theme ready"
    );

    let app = router(state);

    tracing::info!("Starting site on {}", bind_addr);

    let listener = TcpListener::bind(bind_addr)
        .await
        .context("Failed to bind to address")?;

    tracing::info!("Site listening on http://{}", bind_addr);

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown)
        .await
        .context("Server error")?;

    tracing::info!("Site server shut down gracefully");
    Ok(())
}
