//! Comment thread and comment form
//!
//! The walker owns the `<li>`/`<ol class="children">` structure and hands
//! each node to the theme's comment callback. `theme_comment` is the
//! default card.

use maud::{html, Markup};

use super::single::Access;
use super::Theme;
use crate::content::{CommentFields, CommentNode, CommentTree, ContentItem, FieldError, ValidationErrors};

/// Reply context passed to a comment callback
#[derive(Debug, Clone)]
pub struct ReplyArgs {
    pub permalink: String,
    pub item_id: i64,
    /// Depth of the comment being drawn
    pub depth: u32,
    pub max_depth: u32,
}

impl ReplyArgs {
    fn at(&self, depth: u32) -> Self {
        Self {
            depth,
            ..self.clone()
        }
    }
}

/// What the comment form shows: previous input, field errors and the
/// comment being replied to
#[derive(Debug, Clone, Default)]
pub struct CommentFormState {
    pub values: CommentFields,
    pub errors: ValidationErrors,
    pub reply_to: Option<i64>,
}

impl CommentFormState {
    pub fn replying_to(id: Option<i64>) -> Self {
        Self {
            reply_to: id,
            ..Self::default()
        }
    }

    /// Re-show a rejected submission
    pub fn rejected(values: CommentFields, errors: ValidationErrors) -> Self {
        Self {
            reply_to: values.parent_id,
            values,
            errors,
        }
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Comment card
// ─────────────────────────────────────────────────────────────────────────────

/// Escaped comment text with blank-line paragraphs and `<br>` line breaks
fn body_paragraphs(text: &str) -> Markup {
    let normalized = text.replace("\r\n", "\n");
    html! {
        @for para in normalized.split("\n\n").map(str::trim).filter(|p| !p.is_empty()) {
            p {
                @for (i, line) in para.lines().enumerate() {
                    @if i > 0 { br; }
                    (line)
                }
            }
        }
    }
}

/// Default comment card
pub fn theme_comment(theme: &Theme, node: &CommentNode, args: &ReplyArgs) -> Markup {
    let c = &node.comment;
    let s = &theme.strings;
    let stamp = format!(
        "{} · {}",
        theme.format_date(&c.created_at),
        theme.format_time(&c.created_at)
    );

    html! {
        article.comment-card id={ "div-comment-" (c.id) } {
            div.comment-meta {
                span.comment-author {
                    (s.author_prefix)
                    @if let Some(url) = &c.author_url {
                        a.url href=(url) rel="external nofollow ugc" { (c.author) }
                    } @else {
                        (c.author)
                    }
                }
                time.comment-time datetime=(c.created_at.to_rfc3339()) { (stamp) }
                @if c.is_pending() {
                    span.comment-pending { (s.pending_badge) }
                }
            }
            div.comment-body {
                (body_paragraphs(&c.body))
            }
            div.comment-actions {
                a.comment-reply-link rel="nofollow"
                    href={ (args.permalink) "?replytocom=" (c.id) "#respond" }
                    data-commentid=(c.id)
                    data-postid=(args.item_id)
                    data-belowelement={ "div-comment-" (c.id) }
                    data-respondelement="respond"
                    data-depth=(args.depth)
                    data-max-depth=(args.max_depth) { (s.reply) }
            }
        }
    }
}

fn walk(theme: &Theme, nodes: &[CommentNode], args: &ReplyArgs) -> Markup {
    html! {
        @for node in nodes {
            li id={ "comment-" (node.comment.id) } class={ "comment-item depth-" (node.depth) } {
                ((theme.comment_callback)(theme, node, &args.at(node.depth)))
                @if !node.children.is_empty() {
                    ol.children {
                        (walk(theme, &node.children, args))
                    }
                }
            }
        }
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Form
// ─────────────────────────────────────────────────────────────────────────────

fn error_text(theme: &Theme, error: FieldError) -> &'static str {
    let s = &theme.strings;
    match error {
        FieldError::Required => s.error_required,
        FieldError::InvalidEmail => s.error_email,
        FieldError::InvalidUrl => s.error_url,
        FieldError::InvalidParent => s.error_parent,
    }
}

fn field_error(theme: &Theme, name: &str, error: Option<FieldError>) -> Markup {
    html! {
        @if let Some(e) = error {
            span.field-error id={ (name) "-error" } role="alert" { (error_text(theme, e)) }
        }
    }
}

fn input_field(
    theme: &Theme,
    name: &'static str,
    label: &str,
    input_type: &str,
    value: &str,
    required: bool,
    errors: &ValidationErrors,
) -> Markup {
    let error = errors.get(name);
    html! {
        p class={ "comment-form-" (name) } {
            label for=(name) {
                (label)
                @if required {
                    " " span.required { "*" }
                }
            }
            input id=(name) name=(name) type=(input_type) value=(value)
                required[required]
                aria-invalid=[error.map(|_| "true")];
            (field_error(theme, name, error))
        }
    }
}

fn form(theme: &Theme, item: &ContentItem, state: &CommentFormState, reply_to: Option<i64>) -> Markup {
    let s = &theme.strings;
    let v = &state.values;
    let body_error = state.errors.get("comment");

    html! {
        div.comment-respond id="respond" {
            h3.comment-reply-title id="reply-title" {
                @if reply_to.is_some() {
                    (s.reply_title)
                    " "
                    small {
                        a id="cancel-comment-reply-link" rel="nofollow"
                            href={ (item.permalink()) "#respond" } { (s.cancel_reply) }
                    }
                } @else {
                    (s.form_title)
                }
            }
            form.comment-form id="commentform" method="post" action="/comments" novalidate {
                (input_field(theme, "author", s.label_author, "text", &v.author, true, &state.errors))
                (input_field(theme, "email", s.label_email, "email", &v.email, true, &state.errors))
                (input_field(theme, "url", s.label_url, "url", &v.url, false, &state.errors))
                p.comment-form-comment {
                    label for="comment" {
                        (s.label_comment) " " span.required { "*" }
                    }
                    textarea id="comment" name="comment" rows="6" required
                        aria-invalid=[body_error.map(|_| "true")] { (v.body) }
                    (field_error(theme, "comment", body_error))
                }
                p.form-submit {
                    button.submit id="submit" type="submit" { (s.submit) }
                    input type="hidden" name="comment_post_ID" value=(item.id);
                    input id="comment_parent" type="hidden" name="comment_parent"
                        value=(reply_to.unwrap_or(0));
                }
            }
        }
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Section
// ─────────────────────────────────────────────────────────────────────────────

/// Comment list and form for one post. Locked posts get nothing at all.
pub(super) fn section(
    theme: &Theme,
    item: &ContentItem,
    access: Access,
    tree: &CommentTree,
    state: &CommentFormState,
) -> Markup {
    if access == Access::Denied {
        return html! {};
    }

    let s = &theme.strings;
    let args = ReplyArgs {
        permalink: item.permalink(),
        item_id: item.id,
        depth: 1,
        max_depth: tree.max_depth(),
    };
    // Only reply to comments the viewer can see
    let reply_to = state.reply_to.filter(|id| tree.find(*id).is_some());

    html! {
        div.comments-area id="comments" {
            @if !tree.is_empty() {
                h2.comments-title {
                    (s.comments_title) " " (item.comment_count) (s.comments_unit)
                }
                ol.comment-list {
                    (walk(theme, tree.roots(), &args))
                }
            }
            @if item.comments_open {
                (form(theme, item, state, reply_to))
            } @else {
                p.no-comments { (s.comments_closed) }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::content::{ApprovalState, Comment};
    use crate::theme::tests::{sample_item, sample_theme};
    use chrono::{TimeZone, Utc};

    fn comment(id: i64, parent: Option<i64>, state: ApprovalState) -> Comment {
        Comment {
            id,
            item_id: 1,
            parent_id: parent,
            author: format!("user{}", id),
            author_url: None,
            body: format!("comment {}", id),
            created_at: Utc.with_ymd_and_hms(2025, 3, 4, 15, 30, id as u32).unwrap(),
            state,
        }
    }

    fn render(tree: &CommentTree, state: &CommentFormState) -> String {
        let theme = sample_theme();
        let item = sample_item(1, "dune");
        section(&theme, &item, Access::Granted, tree, state).into_string()
    }

    #[test]
    fn test_pending_badge_only_on_pending() {
        let tree = CommentTree::build(
            vec![
                comment(1, None, ApprovalState::Approved),
                comment(2, None, ApprovalState::Pending),
            ],
            3,
        );
        let html = render(&tree, &CommentFormState::default());
        assert_eq!(html.matches("승인 대기중").count(), 1);

        let pending_card = html.split("id=\"div-comment-2\"").nth(1).unwrap();
        assert!(pending_card.contains("comment-pending"));
        let approved_card = html
            .split("id=\"div-comment-1\"")
            .nth(1)
            .unwrap()
            .split("id=\"div-comment-2\"")
            .next()
            .unwrap();
        assert!(!approved_card.contains("comment-pending"));
    }

    #[test]
    fn test_deep_thread_capped_but_every_comment_replyable() {
        let chain: Vec<Comment> = (1..=5)
            .map(|id| comment(id, (id > 1).then(|| id - 1), ApprovalState::Approved))
            .collect();
        let tree = CommentTree::build(chain, 3);
        let html = render(&tree, &CommentFormState::default());

        assert_eq!(html.matches("class=\"comment-reply-link\"").count(), 5);
        assert!(html.contains("?replytocom=5#respond"));
        assert!(html.contains("comment-item depth-3"));
        assert!(!html.contains("depth-4"));
        assert!(html.contains(r#"data-max-depth="3""#));
    }

    #[test]
    fn test_denied_renders_nothing() {
        let theme = sample_theme();
        let mut item = sample_item(1, "locked");
        item.password = Some("pw".to_string());
        let tree = CommentTree::build(vec![comment(1, None, ApprovalState::Approved)], 3);
        let html = section(&theme, &item, Access::Denied, &tree, &CommentFormState::default());
        assert_eq!(html.into_string(), "");
    }

    #[test]
    fn test_heading_counts_approved_comments() {
        let theme = sample_theme();
        let mut item = sample_item(1, "dune");
        item.comment_count = 2;
        let tree = CommentTree::build(
            vec![
                comment(1, None, ApprovalState::Approved),
                comment(2, Some(1), ApprovalState::Approved),
                comment(3, None, ApprovalState::Pending),
            ],
            3,
        );
        let html = section(&theme, &item, Access::Granted, &tree, &CommentFormState::default())
            .into_string();
        // The viewer's own pending comment is listed but not counted
        assert!(html.contains("<h2 class=\"comments-title\">댓글 2개</h2>"));
        assert!(html.contains(r#"id="div-comment-3""#));

        let empty = render(&CommentTree::build(Vec::new(), 3), &CommentFormState::default());
        assert!(!empty.contains("comments-title"));
        assert!(!empty.contains("comment-list"));
        assert!(empty.contains("댓글 남기기"));
    }

    #[test]
    fn test_card_contents() {
        let mut c = comment(7, None, ApprovalState::Approved);
        c.author_url = Some("https://example.com".to_string());
        c.body = "첫 줄\n둘째 줄\n\n<b>새 문단</b>".to_string();
        let tree = CommentTree::build(vec![c], 3);
        let html = render(&tree, &CommentFormState::default());

        assert!(html.contains("작성자 - <a class=\"url\" href=\"https://example.com\""));
        assert!(html.contains(">2025.03.05 · 00:30</time>"));
        assert!(html.contains("<p>첫 줄<br>둘째 줄</p><p>&lt;b&gt;새 문단&lt;/b&gt;</p>"));
        assert!(html.contains(r#"<li id="comment-7" class="comment-item depth-1">"#));
    }

    #[test]
    fn test_form_shows_errors_and_keeps_values() {
        let values = CommentFields {
            author: "민지".to_string(),
            email: "not-an-email".to_string(),
            url: String::new(),
            body: String::new(),
            parent_id: None,
        };
        let errors = values.validate();
        let state = CommentFormState::rejected(values, errors);
        let html = render(&CommentTree::build(Vec::new(), 3), &state);

        assert!(html.contains(r#"value="민지""#));
        assert!(html.contains(r#"value="not-an-email""#));
        assert!(html.contains("올바른 이메일 주소를 입력하세요."));
        assert!(html.contains("필수 항목입니다."));
        assert_eq!(html.matches(r#"aria-invalid="true""#).count(), 2);
        assert!(html.contains(r#"name="comment_post_ID" value="1""#));
        assert!(html.contains(r#"name="comment_parent" value="0""#));
    }

    #[test]
    fn test_reply_mode_needs_visible_target() {
        let tree = CommentTree::build(vec![comment(4, None, ApprovalState::Approved)], 3);

        let html = render(&tree, &CommentFormState::replying_to(Some(4)));
        assert!(html.contains("답글 남기기"));
        assert!(html.contains("답글 취소"));
        assert!(html.contains(r#"name="comment_parent" value="4""#));

        let html = render(&tree, &CommentFormState::replying_to(Some(99)));
        assert!(html.contains("댓글 남기기"));
        assert!(!html.contains("답글 취소"));
        assert!(html.contains(r#"name="comment_parent" value="0""#));
    }

    #[test]
    fn test_closed_comments_keep_list_drop_form() {
        let theme = sample_theme();
        let mut item = sample_item(1, "dune");
        item.comments_open = false;
        let tree = CommentTree::build(vec![comment(1, None, ApprovalState::Approved)], 3);
        let html = section(&theme, &item, Access::Granted, &tree, &CommentFormState::default())
            .into_string();
        assert!(html.contains("comment-list"));
        assert!(html.contains("댓글이 닫혀 있습니다."));
        assert!(!html.contains("commentform"));
    }

    #[test]
    fn test_custom_callback() {
        fn plain(_: &Theme, node: &CommentNode, _: &ReplyArgs) -> Markup {
            html! { span.plain { (node.comment.author) } }
        }
        let theme = sample_theme().with_comment_callback(plain);
        let item = sample_item(1, "dune");
        let tree = CommentTree::build(vec![comment(1, None, ApprovalState::Approved)], 3);
        let html = section(&theme, &item, Access::Granted, &tree, &CommentFormState::default())
            .into_string();
        assert!(html.contains(r#"<span class="plain">user1</span>"#));
        assert!(!html.contains("comment-card"));
    }
}
