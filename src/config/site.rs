//! Site identity, listing and comment settings

use chrono::{FixedOffset, Offset, Utc};
use serde::Deserialize;

// ─────────────────────────────────────────────────────────────────────────────
// Site
// ─────────────────────────────────────────────────────────────────────────────

/// Site identity and listing settings
#[derive(Debug, Clone)]
pub struct SiteConfig {
    /// Shown in the header brand, footer and `<title>`
    pub name: String,
    /// Tagline under the generic index heading
    pub description: String,
    /// `<html lang>` value
    pub language: String,
    pub home_heading: String,
    pub home_tagline: String,
    /// Second footer line
    pub attribution: String,
    /// Optional stylesheet URL linked from `<head>`
    pub stylesheet: Option<String>,
    pub posts_per_page: u32,
    /// Words kept in an automatic excerpt
    pub excerpt_length: usize,
    /// Appended to a truncated excerpt
    pub excerpt_more: String,
    /// Offset used to display dates and resolve date archives
    pub utc_offset_hours: i32,
}

impl Default for SiteConfig {
    fn default() -> Self {
        Self {
            name: "OTT Trendy".to_string(),
            description: "OTT 리뷰와 추천".to_string(),
            language: "ko-KR".to_string(),
            home_heading: "최신 포스트".to_string(),
            home_tagline: "OTT 리뷰를 빠르게 훑어보세요.".to_string(),
            attribution: "Powered by ott-trendy".to_string(),
            stylesheet: None,
            posts_per_page: 10,
            excerpt_length: 28,
            excerpt_more: "...".to_string(),
            utc_offset_hours: 9,
        }
    }
}

impl SiteConfig {
    /// Display offset; out-of-range hours fall back to UTC
    pub fn utc_offset(&self) -> FixedOffset {
        FixedOffset::east_opt(self.utc_offset_hours * 3600).unwrap_or_else(|| Utc.fix())
    }
}

/// Site settings as loaded from config file
#[derive(Debug, Deserialize, Default)]
pub struct FileSite {
    pub name: Option<String>,
    pub description: Option<String>,
    pub language: Option<String>,
    pub home_heading: Option<String>,
    pub home_tagline: Option<String>,
    pub attribution: Option<String>,
    pub stylesheet: Option<String>,
    pub posts_per_page: Option<u32>,
    pub excerpt_length: Option<usize>,
    pub excerpt_more: Option<String>,
    pub utc_offset_hours: Option<i32>,
}

impl SiteConfig {
    /// Create from file config with defaults
    pub fn from_file(file: Option<FileSite>) -> Self {
        let file = file.unwrap_or_default();
        let defaults = Self::default();

        Self {
            name: file.name.unwrap_or(defaults.name),
            description: file.description.unwrap_or(defaults.description),
            language: file.language.unwrap_or(defaults.language),
            home_heading: file.home_heading.unwrap_or(defaults.home_heading),
            home_tagline: file.home_tagline.unwrap_or(defaults.home_tagline),
            attribution: file.attribution.unwrap_or(defaults.attribution),
            stylesheet: file.stylesheet.filter(|s| !s.is_empty()),
            posts_per_page: file
                .posts_per_page
                .filter(|n| *n > 0)
                .unwrap_or(defaults.posts_per_page),
            excerpt_length: file
                .excerpt_length
                .filter(|n| *n > 0)
                .unwrap_or(defaults.excerpt_length),
            excerpt_more: file.excerpt_more.unwrap_or(defaults.excerpt_more),
            utc_offset_hours: file
                .utc_offset_hours
                .filter(|h| (-23..=23).contains(h))
                .unwrap_or(defaults.utc_offset_hours),
        }
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Comments
// ─────────────────────────────────────────────────────────────────────────────

/// Comment threading and moderation
#[derive(Debug, Clone)]
pub struct CommentsConfig {
    /// Deepest nesting level; deeper replies are shown flat at this level
    pub max_depth: u32,
    /// Hold new comments as pending until approved
    pub moderation: bool,
    /// Key for signing the comment author cookie. A random key is drawn at
    /// startup when unset, so pending previews end with the process.
    pub cookie_secret: Option<String>,
}

impl Default for CommentsConfig {
    fn default() -> Self {
        Self {
            max_depth: 3,
            moderation: true,
            cookie_secret: None,
        }
    }
}

/// Comment settings as loaded from config file
#[derive(Debug, Deserialize, Default)]
pub struct FileComments {
    pub max_depth: Option<u32>,
    pub moderation: Option<bool>,
    pub cookie_secret: Option<String>,
}

impl CommentsConfig {
    /// Create from file config with defaults
    pub fn from_file(file: Option<FileComments>) -> Self {
        let file = file.unwrap_or_default();
        let defaults = Self::default();

        Self {
            max_depth: file
                .max_depth
                .filter(|d| *d > 0)
                .unwrap_or(defaults.max_depth),
            moderation: file.moderation.unwrap_or(defaults.moderation),
            cookie_secret: file.cookie_secret.filter(|s| !s.is_empty()),
        }
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Menu
// ─────────────────────────────────────────────────────────────────────────────

/// One primary navigation link
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct MenuItem {
    pub label: String,
    pub url: String,
}

pub(super) fn default_menu() -> Vec<MenuItem> {
    vec![MenuItem {
        label: "홈".to_string(),
        url: "/".to_string(),
    }]
}
