// OTT Trendy - review site with threaded comments
//
// Serves listing pages, single posts and comment threads rendered from a
// content repository.
//
// Architecture:
// - Site server (axum): resolves requests to templates, handles form posts
// - Theme (maud): pure render functions for layout, listings and comments
// - Content (rusqlite + r2d2): posts, tags and comments in SQLite
// - Config: env > ~/.config/ott-trendy/config.toml > defaults

mod cli;
mod config;
mod content;
mod demo;
mod logging;
mod site;
mod theme;

use anyhow::{Context, Result};
use chrono::Utc;
use cli::Action;
use config::Config;
use content::{ContentRepository, SqliteRepository};
use std::sync::Arc;

fn open_repository(config: &Config, demo_mode: bool) -> Result<SqliteRepository> {
    let repo = if demo_mode {
        SqliteRepository::in_memory().context("Failed to create in-memory database")?
    } else {
        SqliteRepository::open(&config.db_path)
            .with_context(|| format!("Failed to open {}", config.db_path.display()))?
    };
    Ok(repo.with_utc_offset(config.site.utc_offset()))
}

#[tokio::main]
async fn main() -> Result<()> {
    // Handle CLI commands first (config --show, --reset, --path)
    // If a command was handled, exit early
    let Some(action) = cli::handle_cli()? else {
        return Ok(());
    };

    // Ensure config template exists (helps users discover options)
    Config::ensure_config_exists();

    let config = Config::from_env()?;

    // The guard must be kept alive for the duration of the program to ensure logs flush
    let _file_guard = logging::init(&config.logging);

    match action {
        Action::Seed => {
            let repo = open_repository(&config, false)?;
            let summary = demo::seed(&repo, Utc::now())?;
            println!(
                "Seeded {} posts and {} comments into {}",
                summary.items,
                summary.comments,
                config.db_path.display()
            );
            Ok(())
        }
        Action::Serve { demo: demo_mode } => {
            let repo = open_repository(&config, demo_mode)?;
            if demo_mode {
                tracing::info!("Running in DEMO MODE - in-memory database with sample posts");
                demo::seed(&repo, Utc::now())?;
            } else {
                tracing::info!(
                    "Content database: {} ({} posts)",
                    config.db_path.display(),
                    repo.count_items()?
                );
            }

            let repo: Arc<dyn ContentRepository> = Arc::new(repo);
            site::start_server(&config, repo, async {
                if let Err(e) = tokio::signal::ctrl_c().await {
                    tracing::error!("Failed to listen for Ctrl+C: {}", e);
                }
                tracing::info!("Shutting down...");
            })
            .await
        }
    }
}
