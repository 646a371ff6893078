//! Content model: posts, tags and comments as read from the repository
//!
//! Every value here is an immutable snapshot for one render pass. The
//! repository owns the data; the theme only borrows it.

mod repository;
mod sqlite;
mod tree;

pub use repository::{CommentFields, ContentRepository, FieldError, ValidationErrors};
pub use sqlite::{NewItem, SqliteRepository};
pub use tree::{CommentNode, CommentTree};

use chrono::{DateTime, Utc};

// ─────────────────────────────────────────────────────────────────────────────
// Items and tags
// ─────────────────────────────────────────────────────────────────────────────

/// Featured image attached to a post
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Thumbnail {
    pub url: String,
    pub alt: String,
}

/// A published post
#[derive(Debug, Clone)]
pub struct ContentItem {
    pub id: i64,
    pub slug: String,
    pub title: String,
    pub published_at: DateTime<Utc>,
    /// Trusted HTML authored in the admin
    pub body: String,
    /// Hand-written excerpt; when absent the theme derives one from `body`
    pub excerpt: Option<String>,
    pub thumbnail: Option<Thumbnail>,
    /// Post password, if the post is protected
    pub password: Option<String>,
    pub comments_open: bool,
    /// Approved comments only
    pub comment_count: u32,
}

impl ContentItem {
    /// Path of the single-post page
    pub fn permalink(&self) -> String {
        format!("/posts/{}", self.slug)
    }

    pub fn is_protected(&self) -> bool {
        self.password.as_deref().is_some_and(|p| !p.is_empty())
    }
}

/// A post tag
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Tag {
    pub id: i64,
    pub slug: String,
    pub name: String,
}

impl Tag {
    pub fn link(&self) -> String {
        format!("/tag/{}", self.slug)
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Comments
// ─────────────────────────────────────────────────────────────────────────────

/// Moderation state of a comment
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ApprovalState {
    Pending,
    Approved,
}

impl ApprovalState {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Pending => "pending",
            Self::Approved => "approved",
        }
    }

    pub fn from_str(s: &str) -> Self {
        match s {
            "approved" => Self::Approved,
            _ => Self::Pending,
        }
    }
}

/// A stored comment. Depth is not stored; it is assigned when the tree is built.
#[derive(Debug, Clone)]
pub struct Comment {
    pub id: i64,
    pub item_id: i64,
    pub parent_id: Option<i64>,
    pub author: String,
    pub author_url: Option<String>,
    pub body: String,
    pub created_at: DateTime<Utc>,
    pub state: ApprovalState,
}

impl Comment {
    pub fn is_pending(&self) -> bool {
        self.state == ApprovalState::Pending
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Queries
// ─────────────────────────────────────────────────────────────────────────────

/// Which posts a listing shows
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ListFilter {
    All,
    Tag(String),
    Date {
        year: i32,
        month: Option<u32>,
        day: Option<u32>,
    },
    Search(String),
}

/// One page of a listing query
#[derive(Debug, Clone, Default)]
pub struct ItemPage {
    pub items: Vec<ContentItem>,
    pub total_pages: u32,
}

/// Pager state for a listing
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Pagination {
    pub current: u32,
    pub total: u32,
}

impl Pagination {
    pub fn new(current: u32, total: u32) -> Self {
        Self { current, total }
    }

    pub fn has_prev(&self) -> bool {
        self.current > 1
    }

    pub fn has_next(&self) -> bool {
        self.current < self.total
    }

    /// Only listings spanning more than one page get controls
    pub fn is_needed(&self) -> bool {
        self.total > 1
    }
}

/// Number of pages needed for `total` items
pub fn page_count(total: u64, per_page: u32) -> u32 {
    if per_page == 0 {
        return 0;
    }
    total.div_ceil(per_page as u64) as u32
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_page_count() {
        assert_eq!(page_count(0, 10), 0);
        assert_eq!(page_count(10, 10), 1);
        assert_eq!(page_count(11, 10), 2);
        assert_eq!(page_count(5, 0), 0);
    }

    #[test]
    fn test_pagination_bounds() {
        let p = Pagination::new(1, 3);
        assert!(!p.has_prev());
        assert!(p.has_next());
        assert!(p.is_needed());

        let last = Pagination::new(3, 3);
        assert!(last.has_prev());
        assert!(!last.has_next());

        assert!(!Pagination::new(1, 1).is_needed());
    }

    #[test]
    fn test_protected_requires_non_empty_password() {
        let mut item = crate::theme::tests::sample_item(1, "a");
        assert!(!item.is_protected());
        item.password = Some(String::new());
        assert!(!item.is_protected());
        item.password = Some("secret".to_string());
        assert!(item.is_protected());
    }
}
