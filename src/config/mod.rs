//! Configuration for the site server
//!
//! Configuration is loaded in order of precedence:
//! 1. Environment variables (highest priority)
//! 2. Config file (~/.config/ott-trendy/config.toml)
//! 3. Built-in defaults (lowest priority)

use anyhow::Context;
use serde::Deserialize;
use std::net::SocketAddr;
use std::path::{Path, PathBuf};

// ─────────────────────────────────────────────────────────────────────────────
// Submodules
// ─────────────────────────────────────────────────────────────────────────────

mod observability;
mod serialization;
mod site;


// ─────────────────────────────────────────────────────────────────────────────
// Re-exports
// ─────────────────────────────────────────────────────────────────────────────

pub use observability::{FileLogging, LogRotation, LoggingConfig};
pub use site::{CommentsConfig, FileComments, FileSite, MenuItem, SiteConfig};

// ─────────────────────────────────────────────────────────────────────────────
// Constants
// ─────────────────────────────────────────────────────────────────────────────

/// Version info
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

const DEFAULT_BIND: &str = "127.0.0.1:8080";
const DEFAULT_DB_PATH: &str = "./data/ott-trendy.db";

// ─────────────────────────────────────────────────────────────────────────────
// Application Configuration
// ─────────────────────────────────────────────────────────────────────────────

/// Application configuration
#[derive(Debug, Clone)]
pub struct Config {
    /// Address to bind the site server to
    pub bind_addr: SocketAddr,

    /// SQLite content database
    pub db_path: PathBuf,

    /// Site identity and listing settings
    pub site: SiteConfig,

    /// Comment threading and moderation
    pub comments: CommentsConfig,

    /// Logging configuration
    pub logging: LoggingConfig,

    /// Primary navigation entries, in display order
    pub menu: Vec<MenuItem>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            bind_addr: SocketAddr::from(([127, 0, 0, 1], 8080)),
            db_path: PathBuf::from(DEFAULT_DB_PATH),
            site: SiteConfig::default(),
            comments: CommentsConfig::default(),
            logging: LoggingConfig::default(),
            menu: site::default_menu(),
        }
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// File Configuration (deserialization layer)
// ─────────────────────────────────────────────────────────────────────────────

/// Config file structure
#[derive(Debug, Deserialize, Default)]
pub(crate) struct FileConfig {
    pub bind_addr: Option<String>,
    pub db_path: Option<String>,

    /// Optional [site] section
    pub site: Option<FileSite>,

    /// Optional [comments] section
    pub comments: Option<FileComments>,

    /// Optional [logging] section
    pub logging: Option<FileLogging>,

    /// Optional [[menu]] entries
    pub menu: Option<Vec<MenuItem>>,
}

// ─────────────────────────────────────────────────────────────────────────────
// Configuration Loading
// ─────────────────────────────────────────────────────────────────────────────

impl Config {
    /// Get the config file path: ~/.config/ott-trendy/config.toml
    /// Uses Unix-style ~/.config on all platforms for consistency
    pub fn config_path() -> Option<PathBuf> {
        dirs::home_dir().map(|p| p.join(".config").join("ott-trendy").join("config.toml"))
    }

    /// Create config file with defaults if it doesn't exist
    pub fn ensure_config_exists() {
        let Some(path) = Self::config_path() else {
            return;
        };

        if path.exists() {
            return;
        }

        if let Some(parent) = path.parent() {
            if std::fs::create_dir_all(parent).is_err() {
                return; // Config is optional
            }
        }

        let _ = std::fs::write(&path, Self::default().to_toml());
    }

    /// Read the config file. A missing file means defaults; a file that
    /// exists but cannot be read or parsed is an error, so a typo never
    /// silently falls back to defaults.
    fn load_file_config(path: &Path) -> anyhow::Result<FileConfig> {
        match std::fs::read_to_string(path) {
            Ok(contents) => toml::from_str(&contents).with_context(|| {
                format!(
                    "Failed to parse {} (check quoting, true/false values and section names)",
                    path.display()
                )
            }),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(FileConfig::default()),
            Err(e) => Err(e).with_context(|| format!("Cannot read {}", path.display())),
        }
    }

    /// Load configuration: env > file > defaults
    pub fn from_env() -> anyhow::Result<Self> {
        let file = match Self::config_path() {
            Some(path) => Self::load_file_config(&path)?,
            None => FileConfig::default(),
        };
        Self::from_sources(file, |key| std::env::var(key).ok())
    }

    /// Merge a parsed file with an environment lookup
    pub(crate) fn from_sources(
        file: FileConfig,
        env: impl Fn(&str) -> Option<String>,
    ) -> anyhow::Result<Self> {
        // Bind address: env > file > default
        let bind_raw = env("OTT_BIND")
            .or(file.bind_addr)
            .unwrap_or_else(|| DEFAULT_BIND.to_string());
        let bind_addr = bind_raw
            .parse()
            .with_context(|| format!("Invalid bind address '{}'", bind_raw))?;

        // Database path: env > file > default
        let db_path = env("OTT_DB_PATH")
            .or(file.db_path)
            .map(PathBuf::from)
            .unwrap_or_else(|| PathBuf::from(DEFAULT_DB_PATH));

        let mut site = SiteConfig::from_file(file.site);
        if let Some(name) = env("OTT_SITE_NAME") {
            site.name = name;
        }

        let mut comments = CommentsConfig::from_file(file.comments);
        if let Some(secret) = env("OTT_COOKIE_SECRET").filter(|s| !s.is_empty()) {
            comments.cookie_secret = Some(secret);
        }
        let logging = LoggingConfig::from_file(file.logging);
        let menu = file.menu.unwrap_or_else(site::default_menu);

        Ok(Self {
            bind_addr,
            db_path,
            site,
            comments,
            logging,
            menu,
        })
    }
}
