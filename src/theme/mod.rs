//! HTML theme: layout shell, listing cards, single posts and comment threads
//!
//! Everything here is a pure function of its inputs. There is no "current
//! post" cursor; each renderer receives the item, tree or page it draws.
//!
//! # Module Organization
//!
//! - `strings` - Localized UI literals (Korean defaults)
//! - `excerpt` - Tag stripping and word truncation for cards
//! - `layout` - Header/footer document shell
//! - `listing` - Post cards, listing heads and empty states
//! - `pagination` - Numbered pager links
//! - `single` - Full post with thumbnail, tags and password form
//! - `comments` - Comment tree walker, default comment card and form

mod comments;
mod excerpt;
mod layout;
mod listing;
mod pagination;
mod single;
mod strings;

pub use comments::{theme_comment, CommentFormState, ReplyArgs};
pub use listing::{ArchiveTitle, ListingKind, ListingView, PageBase};
pub use single::{Access, SingleView};
pub use strings::Strings;

use chrono::{DateTime, Utc};
use maud::Markup;

use crate::config::{Config, MenuItem, SiteConfig};
use crate::content::CommentNode;

/// Renders the card for one comment. The tree walker owns the surrounding
/// `<li>` and nesting, so a callback only draws the comment itself.
pub type CommentCallback = fn(&Theme, &CommentNode, &ReplyArgs) -> Markup;

/// Per-request values the layout needs
#[derive(Debug, Clone)]
pub struct Chrome {
    pub now: DateTime<Utc>,
    /// Prefills the header search box
    pub search_query: Option<String>,
}

impl Chrome {
    pub fn new(now: DateTime<Utc>) -> Self {
        Self {
            now,
            search_query: None,
        }
    }

    pub fn with_search(mut self, query: impl Into<String>) -> Self {
        self.search_query = Some(query.into());
        self
    }
}

/// Site-wide rendering settings, built once at startup
#[derive(Clone)]
pub struct Theme {
    pub site: SiteConfig,
    pub menu: Vec<MenuItem>,
    pub max_depth: u32,
    pub strings: Strings,
    pub comment_callback: CommentCallback,
}

impl std::fmt::Debug for Theme {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Theme")
            .field("site", &self.site.name)
            .field("max_depth", &self.max_depth)
            .finish_non_exhaustive()
    }
}

impl Theme {
    pub fn from_config(config: &Config) -> Self {
        Self {
            site: config.site.clone(),
            menu: config.menu.clone(),
            max_depth: config.comments.max_depth.max(1),
            strings: Strings::default(),
            comment_callback: theme_comment,
        }
    }

    /// Swap the comment card renderer
    pub fn with_comment_callback(mut self, callback: CommentCallback) -> Self {
        self.comment_callback = callback;
        self
    }

    /// `YYYY.MM.DD` in the site's offset
    pub fn format_date(&self, ts: &DateTime<Utc>) -> String {
        ts.with_timezone(&self.site.utc_offset())
            .format("%Y.%m.%d")
            .to_string()
    }

    /// `HH:MM` in the site's offset
    pub fn format_time(&self, ts: &DateTime<Utc>) -> String {
        ts.with_timezone(&self.site.utc_offset())
            .format("%H:%M")
            .to_string()
    }

    pub fn listing_page(&self, view: &ListingView, chrome: &Chrome) -> Markup {
        listing::page(self, view, chrome)
    }

    pub fn single_page(&self, view: &SingleView, chrome: &Chrome) -> Markup {
        single::page(self, view, chrome)
    }
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;
    use crate::content::ContentItem;
    use chrono::TimeZone;

    pub(crate) fn sample_item(id: i64, slug: &str) -> ContentItem {
        ContentItem {
            id,
            slug: slug.to_string(),
            title: format!("{} 리뷰", slug),
            published_at: Utc.with_ymd_and_hms(2025, 3, 4, 15, 30, 0).unwrap(),
            body: "<p>본문입니다.</p>".to_string(),
            excerpt: None,
            thumbnail: None,
            password: None,
            comments_open: true,
            comment_count: 0,
        }
    }

    pub(crate) fn sample_theme() -> Theme {
        Theme::from_config(&Config::default())
    }

    pub(crate) fn chrome() -> Chrome {
        Chrome::new(Utc.with_ymd_and_hms(2026, 5, 1, 0, 0, 0).unwrap())
    }

    #[test]
    fn test_dates_use_site_offset() {
        let theme = sample_theme();
        // 15:30 UTC on Mar 4 is 00:30 on Mar 5 in UTC+9
        let ts = Utc.with_ymd_and_hms(2025, 3, 4, 15, 30, 0).unwrap();
        assert_eq!(theme.format_date(&ts), "2025.03.05");
        assert_eq!(theme.format_time(&ts), "00:30");
    }

    #[test]
    fn test_max_depth_from_config() {
        let mut config = Config::default();
        config.comments.max_depth = 5;
        assert_eq!(Theme::from_config(&config).max_depth, 5);
    }
}
