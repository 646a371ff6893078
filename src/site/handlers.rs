//! Page and form handlers
//!
//! Each request does its repository reads and rendering in one blocking
//! task. Either the whole page is produced or the request fails with 500.

use std::collections::HashMap;

use axum::{
    extract::{Query, State},
    http::{StatusCode, Uri},
    response::{IntoResponse, Redirect, Response},
    Form,
};
use axum_extra::extract::cookie::{CookieJar, SignedCookieJar};
use chrono::{DateTime, Utc};
use maud::Markup;
use serde::Deserialize;

use super::access::{access_cookie, author_cookie, Visitor};
use super::error::SiteError;
use super::resolver::{resolve, Route};
use super::state::AppState;
use crate::content::{CommentFields, CommentTree, ContentItem, ListFilter, Pagination};
use crate::theme::{
    Access, ArchiveTitle, Chrome, CommentFormState, ListingKind, ListingView, PageBase, SingleView,
};

// ─────────────────────────────────────────────────────────────────────────────
// GET pages
// ─────────────────────────────────────────────────────────────────────────────

/// Catch-all GET: resolve the path and render the matching template
pub async fn page(
    State(state): State<AppState>,
    uri: Uri,
    Query(params): Query<HashMap<String, String>>,
    jar: CookieJar,
    signed: SignedCookieJar,
) -> Result<Response, SiteError> {
    let route = resolve(uri.path(), &params);
    tracing::debug!(path = %uri.path(), ?route, "Resolved request");

    let visitor = Visitor::new(jar, &signed);
    let reply_to = params.get("replytocom").and_then(|v| v.parse::<i64>().ok());
    let now = Utc::now();

    let (status, markup) =
        tokio::task::spawn_blocking(move || render_route(&state, route, &visitor, reply_to, now))
            .await??;

    tracing::debug!(path = %uri.path(), status = status.as_u16(), "Rendered page");
    Ok((status, markup).into_response())
}

fn render_route(
    state: &AppState,
    route: Route,
    visitor: &Visitor,
    reply_to: Option<i64>,
    now: DateTime<Utc>,
) -> Result<(StatusCode, Markup), SiteError> {
    match route {
        Route::Listing { filter, page } => render_listing(state, filter, page, now),
        Route::Single { slug } => match state.repo.get_item(&slug)? {
            Some(item) => {
                let form = CommentFormState::replying_to(reply_to);
                Ok((StatusCode::OK, render_single(state, &item, visitor, form, now)?))
            }
            None => Ok(not_found(state, now)),
        },
        Route::NotFound => Ok(not_found(state, now)),
    }
}

/// Where pager links for `filter` point
fn page_base(filter: &ListFilter) -> PageBase {
    match filter {
        ListFilter::All => PageBase::new("/"),
        ListFilter::Tag(slug) => PageBase::new(format!("/tag/{}", urlencoding::encode(slug))),
        ListFilter::Date { year, month, day } => {
            let mut path = format!("/{:04}", year);
            if let Some(m) = month {
                path.push_str(&format!("/{:02}", m));
            }
            if let Some(d) = day {
                path.push_str(&format!("/{:02}", d));
            }
            PageBase::new(path)
        }
        ListFilter::Search(q) => PageBase::search(q),
    }
}

fn render_listing(
    state: &AppState,
    filter: ListFilter,
    page: u32,
    now: DateTime<Utc>,
) -> Result<(StatusCode, Markup), SiteError> {
    let kind = match &filter {
        ListFilter::All => ListingKind::Home,
        ListFilter::Tag(slug) => match state.repo.tag_name(slug)? {
            Some(name) => ListingKind::Archive(ArchiveTitle::Tag(name)),
            None => return Ok(not_found(state, now)),
        },
        ListFilter::Date { year, month, day } => ListingKind::Archive(match (month, day) {
            (Some(m), Some(d)) => ArchiveTitle::Day(*year, *m, *d),
            (Some(m), None) => ArchiveTitle::Month(*year, *m),
            _ => ArchiveTitle::Year(*year),
        }),
        ListFilter::Search(q) => ListingKind::Search(q.clone()),
    };

    let result = state
        .repo
        .list_items(&filter, page, state.theme.site.posts_per_page)?;

    let chrome = match &filter {
        ListFilter::Search(q) => Chrome::new(now).with_search(q.clone()),
        _ => Chrome::new(now),
    };
    let view = ListingView {
        kind,
        items: &result.items,
        pagination: Pagination::new(page, result.total_pages),
        base: page_base(&filter),
    };
    Ok((StatusCode::OK, state.theme.listing_page(&view, &chrome)))
}

/// Generic index with the empty-state message, served as 404
fn not_found(state: &AppState, now: DateTime<Utc>) -> (StatusCode, Markup) {
    let view = ListingView {
        kind: ListingKind::NotFound,
        items: &[],
        pagination: Pagination::new(1, 0),
        base: PageBase::new("/"),
    };
    (
        StatusCode::NOT_FOUND,
        state.theme.listing_page(&view, &Chrome::new(now)),
    )
}

fn render_single(
    state: &AppState,
    item: &ContentItem,
    visitor: &Visitor,
    form: CommentFormState,
    now: DateTime<Utc>,
) -> Result<Markup, SiteError> {
    let access = visitor.access_to(item);

    let tags = match state.repo.get_tags(item.id) {
        Ok(tags) => tags,
        Err(e) => {
            tracing::error!(item = item.id, "Failed to load tags: {:#}", e);
            Vec::new()
        }
    };

    let comments = match access {
        Access::Granted => state.repo.get_comments(item.id, visitor.author_email())?,
        Access::Denied => Vec::new(),
    };
    let tree = CommentTree::build(comments, state.theme.max_depth);

    let view = SingleView {
        item,
        tags: &tags,
        access,
        comments: &tree,
        form: &form,
    };
    Ok(state.theme.single_page(&view, &Chrome::new(now)))
}

// ─────────────────────────────────────────────────────────────────────────────
// POST /comments
// ─────────────────────────────────────────────────────────────────────────────

/// Comment form as posted. Everything arrives as text; numbers are parsed
/// by hand so an empty `comment_parent` is not a decode error.
#[derive(Debug, Deserialize)]
pub struct CommentForm {
    #[serde(default)]
    pub author: String,
    #[serde(default)]
    pub email: String,
    #[serde(default)]
    pub url: String,
    #[serde(default)]
    pub comment: String,
    #[serde(rename = "comment_post_ID", default)]
    pub post_id: String,
    #[serde(default)]
    pub comment_parent: String,
}

impl CommentForm {
    fn into_fields(self) -> Result<(i64, CommentFields), SiteError> {
        let item_id = self
            .post_id
            .trim()
            .parse::<i64>()
            .map_err(|_| SiteError::BadRequest("Missing or invalid comment_post_ID".to_string()))?;

        let parent = self.comment_parent.trim();
        let parent_id = match parent {
            "" | "0" => None,
            raw => Some(raw.parse::<i64>().map_err(|_| {
                SiteError::BadRequest("Invalid comment_parent".to_string())
            })?),
        };

        Ok((
            item_id,
            CommentFields {
                author: self.author,
                email: self.email,
                url: self.url,
                body: self.comment,
                parent_id,
            },
        ))
    }
}

pub async fn submit_comment(
    State(state): State<AppState>,
    jar: CookieJar,
    signed: SignedCookieJar,
    Form(form): Form<CommentForm>,
) -> Result<Response, SiteError> {
    let (item_id, fields) = form.into_fields()?;
    let visitor = Visitor::new(jar, &signed);
    let now = Utc::now();

    tokio::task::spawn_blocking(move || {
        store_comment(&state, item_id, fields, &visitor, signed, now)
    })
    .await?
}

fn store_comment(
    state: &AppState,
    item_id: i64,
    fields: CommentFields,
    visitor: &Visitor,
    signed: SignedCookieJar,
    now: DateTime<Utc>,
) -> Result<Response, SiteError> {
    let Some(item) = state.repo.get_item_by_id(item_id)? else {
        return Err(SiteError::NotFound(format!("No post with id {}", item_id)));
    };

    // Locked or closed posts take no comments; send the visitor back quietly
    if visitor.access_to(&item) == Access::Denied || !item.comments_open {
        tracing::debug!(item = item.id, "Ignored comment on locked or closed post");
        return Ok(Redirect::to(&item.permalink()).into_response());
    }

    match state.repo.submit_comment(item.id, &fields, state.moderation)? {
        Ok(comment) => {
            let location = format!("{}#comment-{}", item.permalink(), comment.id);
            let signed = signed.add(author_cookie(fields.email.trim()));
            Ok((signed, Redirect::to(&location)).into_response())
        }
        Err(errors) => {
            tracing::debug!(item = item.id, errors = errors.len(), "Comment rejected");
            let form = CommentFormState::rejected(fields, errors);
            Ok(render_single(state, &item, visitor, form, now)?.into_response())
        }
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// POST /post-password
// ─────────────────────────────────────────────────────────────────────────────

#[derive(Debug, Deserialize)]
pub struct PasswordForm {
    #[serde(default)]
    pub post_password: String,
    #[serde(default)]
    pub redirect_to: String,
}

pub async fn unlock_post(
    State(state): State<AppState>,
    jar: CookieJar,
    Form(form): Form<PasswordForm>,
) -> Result<Response, SiteError> {
    let target = form
        .redirect_to
        .split(['?', '#'])
        .next()
        .unwrap_or_default();
    let Route::Single { slug } = resolve(target, &HashMap::new()) else {
        return Err(SiteError::BadRequest(format!(
            "redirect_to is not a post: {}",
            form.redirect_to
        )));
    };

    tokio::task::spawn_blocking(move || -> Result<Response, SiteError> {
        let Some(item) = state.repo.get_item(&slug)? else {
            return Err(SiteError::NotFound(format!("No post '{}'", slug)));
        };
        let back = Redirect::to(&item.permalink());

        match item.password.as_deref() {
            Some(pw) if !pw.is_empty() && pw == form.post_password => {
                tracing::info!(item = item.id, "Post unlocked");
                Ok((jar.add(access_cookie(item.id, pw)), back).into_response())
            }
            _ => {
                tracing::debug!(item = item.id, "Wrong post password");
                Ok(back.into_response())
            }
        }
    })
    .await?
}

#[cfg(test)]
mod tests {
    use super::*;

    fn form(post_id: &str, parent: &str) -> CommentForm {
        CommentForm {
            author: "민지".to_string(),
            email: "min@example.com".to_string(),
            url: String::new(),
            comment: "좋아요".to_string(),
            post_id: post_id.to_string(),
            comment_parent: parent.to_string(),
        }
    }

    #[test]
    fn test_comment_form_parent_parsing() {
        let (id, fields) = form("3", "").into_fields().unwrap();
        assert_eq!(id, 3);
        assert_eq!(fields.parent_id, None);
        assert_eq!(fields.body, "좋아요");

        assert_eq!(form("3", "0").into_fields().unwrap().1.parent_id, None);
        assert_eq!(form("3", "12").into_fields().unwrap().1.parent_id, Some(12));
    }

    #[test]
    fn test_comment_form_rejects_bad_ids() {
        assert!(matches!(form("", "").into_fields(), Err(SiteError::BadRequest(_))));
        assert!(matches!(form("x", "").into_fields(), Err(SiteError::BadRequest(_))));
        assert!(matches!(form("3", "y").into_fields(), Err(SiteError::BadRequest(_))));
    }

    #[test]
    fn test_page_base_for_filters() {
        assert_eq!(page_base(&ListFilter::All).url(2), "/page/2");
        assert_eq!(page_base(&ListFilter::Tag("sf".into())).url(2), "/tag/sf/page/2");
        assert_eq!(
            page_base(&ListFilter::Date {
                year: 2025,
                month: Some(3),
                day: None
            })
            .url(2),
            "/2025/03/page/2"
        );
        assert_eq!(page_base(&ListFilter::Search("a b".into())).url(1), "/?s=a%20b");
    }
}
