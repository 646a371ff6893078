//! The repository seam between the theme and wherever posts live

use std::collections::BTreeMap;

use super::{Comment, ContentItem, ItemPage, ListFilter, Tag};

/// Read side used by the templates plus the single write the site performs
/// (comment submission). Implementations must be usable from blocking tasks.
pub trait ContentRepository: Send + Sync {
    /// One page (1-based) of posts matching `filter`, newest first
    fn list_items(&self, filter: &ListFilter, page: u32, per_page: u32)
        -> anyhow::Result<ItemPage>;

    fn get_item(&self, slug: &str) -> anyhow::Result<Option<ContentItem>>;

    fn get_item_by_id(&self, id: i64) -> anyhow::Result<Option<ContentItem>>;

    fn get_tags(&self, item_id: i64) -> anyhow::Result<Vec<Tag>>;

    /// Display name of a tag archive subject
    fn tag_name(&self, slug: &str) -> anyhow::Result<Option<String>>;

    /// Approved comments for the item, plus pending ones written by `viewer_email`
    fn get_comments(&self, item_id: i64, viewer_email: Option<&str>)
        -> anyhow::Result<Vec<Comment>>;

    /// Store a comment. The outer error is a storage failure; the inner one
    /// carries per-field validation problems.
    fn submit_comment(
        &self,
        item_id: i64,
        fields: &CommentFields,
        moderation: bool,
    ) -> anyhow::Result<Result<Comment, ValidationErrors>>;

    fn count_items(&self) -> anyhow::Result<u64>;
}

// ─────────────────────────────────────────────────────────────────────────────
// Comment submission
// ─────────────────────────────────────────────────────────────────────────────

/// Values entered in the comment form
#[derive(Debug, Clone, Default)]
pub struct CommentFields {
    pub author: String,
    pub email: String,
    pub url: String,
    pub body: String,
    /// Comment being replied to
    pub parent_id: Option<i64>,
}

impl CommentFields {
    /// Field-level checks that need no storage access
    pub fn validate(&self) -> ValidationErrors {
        let mut errors = ValidationErrors::default();

        if self.author.trim().is_empty() {
            errors.add("author", FieldError::Required);
        }

        let email = self.email.trim();
        if email.is_empty() {
            errors.add("email", FieldError::Required);
        } else if !is_email_shaped(email) {
            errors.add("email", FieldError::InvalidEmail);
        }

        let url = self.url.trim();
        if !url.is_empty() && !is_http_url(url) {
            errors.add("url", FieldError::InvalidUrl);
        }

        if self.body.trim().is_empty() {
            errors.add("comment", FieldError::Required);
        }

        errors
    }

    /// Normalised optional url
    pub fn url(&self) -> Option<&str> {
        let url = self.url.trim();
        (!url.is_empty()).then_some(url)
    }
}

fn email_pattern() -> &'static regex::Regex {
    static PATTERN: std::sync::OnceLock<regex::Regex> = std::sync::OnceLock::new();
    PATTERN.get_or_init(|| {
        regex::Regex::new(r"^[^\s@]+@[^\s@]+\.[^\s@.]+$").expect("email pattern is valid")
    })
}

pub(crate) fn is_email_shaped(s: &str) -> bool {
    email_pattern().is_match(s)
}

fn is_http_url(s: &str) -> bool {
    let rest = s
        .strip_prefix("https://")
        .or_else(|| s.strip_prefix("http://"));
    rest.is_some_and(|r| !r.is_empty() && !r.contains(char::is_whitespace))
}

/// What went wrong with a single form field
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FieldError {
    Required,
    InvalidEmail,
    InvalidUrl,
    /// Reply target is not a comment on this post
    InvalidParent,
}

/// Per-field validation errors keyed by form field name
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ValidationErrors {
    fields: BTreeMap<&'static str, FieldError>,
}

impl ValidationErrors {
    pub fn add(&mut self, field: &'static str, error: FieldError) {
        // First problem per field wins
        self.fields.entry(field).or_insert(error);
    }

    pub fn get(&self, field: &str) -> Option<FieldError> {
        self.fields.get(field).copied()
    }

    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }

    pub fn len(&self) -> usize {
        self.fields.len()
    }
}
