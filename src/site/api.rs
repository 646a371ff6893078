// Health endpoint - liveness plus a content count

use axum::{extract::State, Json};
use serde::Serialize;

use super::error::SiteError;
use super::state::AppState;
use crate::config::VERSION;

/// Response for the health endpoint
#[derive(Debug, Serialize)]
pub struct HealthResponse {
    pub status: &'static str,
    pub version: &'static str,
    /// Published posts in the repository
    pub items: u64,
}

/// GET /api/health - Check that the repository answers
pub async fn health(State(state): State<AppState>) -> Result<Json<HealthResponse>, SiteError> {
    let repo = state.repo.clone();
    let items = tokio::task::spawn_blocking(move || repo.count_items()).await??;

    Ok(Json(HealthResponse {
        status: "ok",
        version: VERSION,
        items,
    }))
}
