//! Single post page

use maud::{html, Markup, PreEscaped};

use super::comments::{self, CommentFormState};
use super::{layout, Chrome, Theme};
use crate::content::{CommentTree, ContentItem, Tag};

/// Whether the viewer may read a protected post
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Access {
    Granted,
    Denied,
}

/// Everything the single template draws
#[derive(Debug, Clone)]
pub struct SingleView<'a> {
    pub item: &'a ContentItem,
    pub tags: &'a [Tag],
    pub access: Access,
    pub comments: &'a CommentTree,
    pub form: &'a CommentFormState,
}

fn password_form(theme: &Theme, item: &ContentItem) -> Markup {
    let s = &theme.strings;
    let field = format!("pwbox-{}", item.id);
    html! {
        form.post-password-form method="post" action="/post-password" {
            p { (s.protected_notice) }
            p {
                label for=(field) { (s.password_label) " " }
                input id=(field) name="post_password" type="password" size="20";
                input type="hidden" name="redirect_to" value=(item.permalink());
                " "
                button type="submit" { (s.password_submit) }
            }
        }
    }
}

fn article(theme: &Theme, view: &SingleView) -> Markup {
    let item = view.item;
    html! {
        article.single-card id={ "post-" (item.id) } {
            header.single-head {
                h1.single-title { (item.title) }
                p.meta {
                    time datetime=(item.published_at.to_rfc3339()) {
                        (theme.format_date(&item.published_at))
                    }
                }
            }
            @if let Some(thumb) = &item.thumbnail {
                figure.single-thumb {
                    img.attachment-large.size-large src=(thumb.url) alt=(thumb.alt) width="1024";
                }
            }
            div.single-content {
                @match view.access {
                    Access::Granted => {
                        (PreEscaped(&item.body))
                    }
                    Access::Denied => {
                        (password_form(theme, item))
                    }
                }
            }
            @if !view.tags.is_empty() {
                footer.single-foot {
                    div.tag-list aria-label=(theme.strings.tags_label) {
                        @for tag in view.tags {
                            a.tag-pill href=(tag.link()) rel="tag" { "#" (tag.name) }
                        }
                    }
                }
            }
        }
    }
}

/// Single post content without the layout shell
pub(super) fn content(theme: &Theme, view: &SingleView) -> Markup {
    html! {
        (article(theme, view))
        section.comments-wrap {
            (comments::section(theme, view.item, view.access, view.comments, view.form))
        }
    }
}

pub(super) fn page(theme: &Theme, view: &SingleView, chrome: &Chrome) -> Markup {
    layout::document(
        theme,
        chrome,
        Some(view.item.title.as_str()),
        "single",
        content(theme, view),
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::content::Thumbnail;
    use crate::theme::tests::{chrome, sample_item, sample_theme};

    fn tags() -> Vec<Tag> {
        vec![
            Tag {
                id: 1,
                slug: "sf".to_string(),
                name: "SF".to_string(),
            },
            Tag {
                id: 2,
                slug: "netflix".to_string(),
                name: "넷플릭스".to_string(),
            },
        ]
    }

    fn render(item: &ContentItem, tags: &[Tag], access: Access) -> String {
        let theme = sample_theme();
        let tree = CommentTree::build(Vec::new(), 3);
        let form = CommentFormState::default();
        let view = SingleView {
            item,
            tags,
            access,
            comments: &tree,
            form: &form,
        };
        content(&theme, &view).into_string()
    }

    #[test]
    fn test_article_parts() {
        let mut item = sample_item(5, "dune");
        item.thumbnail = Some(Thumbnail {
            url: "/img/dune-large.jpg".to_string(),
            alt: "Dune".to_string(),
        });
        let html = render(&item, &tags(), Access::Granted);

        assert!(html.contains("<h1 class=\"single-title\">dune 리뷰</h1>"));
        assert!(html.contains(">2025.03.05</time>"));
        assert!(html.contains("single-thumb"));
        // Body is trusted HTML
        assert!(html.contains("<div class=\"single-content\"><p>본문입니다.</p></div>"));
        assert!(html.contains(r##"<a class="tag-pill" href="/tag/sf" rel="tag">#SF</a>"##));
        assert!(html.contains("#넷플릭스"));
        assert!(html.contains("id=\"respond\""));
    }

    #[test]
    fn test_no_tags_no_footer() {
        let item = sample_item(5, "dune");
        let html = render(&item, &[], Access::Granted);
        assert!(!html.contains("single-foot"));
        assert!(!html.contains("single-thumb"));
    }

    #[test]
    fn test_locked_post_shows_password_form() {
        let mut item = sample_item(5, "secret");
        item.password = Some("pw".to_string());
        let html = render(&item, &tags(), Access::Denied);

        assert!(!html.contains("본문입니다."));
        assert!(html.contains("비밀번호로 보호되어 있습니다."));
        assert!(html.contains(r#"action="/post-password""#));
        assert!(html.contains(r#"name="redirect_to" value="/posts/secret""#));
        // Title and tags still render; comments do not
        assert!(html.contains("secret 리뷰"));
        assert!(html.contains("#SF"));
        assert!(!html.contains("comments-area"));
        assert!(html.contains("<section class=\"comments-wrap\"></section>"));
    }

    #[test]
    fn test_page_title() {
        let theme = sample_theme();
        let item = sample_item(5, "dune");
        let tree = CommentTree::build(Vec::new(), 3);
        let form = CommentFormState::default();
        let view = SingleView {
            item: &item,
            tags: &[],
            access: Access::Granted,
            comments: &tree,
            form: &form,
        };
        let html = theme.single_page(&view, &chrome()).into_string();
        assert!(html.contains("<title>dune 리뷰 – OTT Trendy</title>"));
        assert!(html.contains(r#"<body class="single">"#));
    }
}
