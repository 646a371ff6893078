//! Shared state handed to every request handler

use std::sync::Arc;

use axum::extract::FromRef;
use axum_extra::extract::cookie::Key;

use super::access::cookie_key;
use crate::config::Config;
use crate::content::ContentRepository;
use crate::theme::Theme;

/// Cheap to clone; everything behind an `Arc`
#[derive(Clone)]
pub struct AppState {
    pub repo: Arc<dyn ContentRepository>,
    pub theme: Arc<Theme>,
    /// New comments wait for approval when set
    pub moderation: bool,
    /// Signs the comment author cookie
    pub cookie_key: Key,
}

impl AppState {
    pub fn new(config: &Config, repo: Arc<dyn ContentRepository>) -> Self {
        Self {
            repo,
            theme: Arc::new(Theme::from_config(config)),
            moderation: config.comments.moderation,
            cookie_key: cookie_key(config.comments.cookie_secret.as_deref()),
        }
    }
}

// SignedCookieJar pulls its key from here
impl FromRef<AppState> for Key {
    fn from_ref(state: &AppState) -> Self {
        state.cookie_key.clone()
    }
}
