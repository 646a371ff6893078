//! Document shell shared by every page: head, header, main and footer

use chrono::Datelike;
use maud::{html, Markup, DOCTYPE};

use super::{Chrome, Theme};

fn header(theme: &Theme, chrome: &Chrome) -> Markup {
    let s = &theme.strings;
    html! {
        header.site-header {
            div.wrap.header-inner {
                a.brand href="/" {
                    span.brand-dot {}
                    (theme.site.name)
                }
                @if !theme.menu.is_empty() {
                    nav.top-nav aria-label="Primary Navigation" {
                        ul.menu {
                            @for entry in &theme.menu {
                                li.menu-item {
                                    a href=(entry.url) { (entry.label) }
                                }
                            }
                        }
                    }
                }
                form.search-form role="search" method="get" action="/" {
                    label {
                        span.screen-reader-text { (s.search_label) }
                        input.search-field type="search" name="s"
                            placeholder=(s.search_placeholder)
                            value=(chrome.search_query.as_deref().unwrap_or(""));
                    }
                    button.search-submit type="submit" { (s.search_button) }
                }
            }
        }
    }
}

fn footer(theme: &Theme, chrome: &Chrome) -> Markup {
    let year = chrome.now.with_timezone(&theme.site.utc_offset()).year();
    html! {
        footer.site-footer {
            div.wrap {
                small { "© " (year) " " (theme.site.name) }
                br;
                small { (theme.site.attribution) }
            }
        }
    }
}

/// Full HTML document around `content`. `title` of `None` uses the site
/// name alone.
pub(super) fn document(
    theme: &Theme,
    chrome: &Chrome,
    title: Option<&str>,
    body_class: &str,
    content: Markup,
) -> Markup {
    let full_title = match title {
        Some(t) => format!("{} – {}", t, theme.site.name),
        None => theme.site.name.clone(),
    };

    html! {
        (DOCTYPE)
        html lang=(theme.site.language) {
            head {
                meta charset="utf-8";
                meta name="viewport" content="width=device-width, initial-scale=1";
                title { (full_title) }
                @if let Some(href) = &theme.site.stylesheet {
                    link rel="stylesheet" href=(href);
                }
            }
            body class=(body_class) {
                (header(theme, chrome))
                main.site-main.wrap {
                    (content)
                }
                (footer(theme, chrome))
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::MenuItem;
    use crate::theme::tests::{chrome, sample_theme};

    fn render(theme: &Theme, chrome: &Chrome) -> String {
        document(theme, chrome, Some("태그: SF"), "archive", html! { p { "x" } }).into_string()
    }

    #[test]
    fn test_document_shell() {
        let theme = sample_theme();
        let html = render(&theme, &chrome());
        assert!(html.starts_with("<!DOCTYPE html>"));
        assert!(html.contains(r#"<html lang="ko-KR">"#));
        assert!(html.contains("<title>태그: SF – OTT Trendy</title>"));
        assert!(html.contains(r#"<main class="site-main wrap"><p>x</p></main>"#));
        assert!(!html.contains("stylesheet"));
    }

    #[test]
    fn test_search_form() {
        let theme = sample_theme();
        let html = render(&theme, &chrome());
        assert!(html.contains(r#"placeholder="작품/배우/키워드 검색""#));
        assert!(html.contains(r#"value="""#));
        assert!(html.contains(">검색</button>"));

        let html = render(&theme, &chrome().with_search("\"오징어\""));
        assert!(html.contains(r#"value="&quot;오징어&quot;""#));
    }

    #[test]
    fn test_menu_from_config() {
        let mut theme = sample_theme();
        theme.menu = vec![
            MenuItem {
                label: "홈".to_string(),
                url: "/".to_string(),
            },
            MenuItem {
                label: "SF".to_string(),
                url: "/tag/sf".to_string(),
            },
        ];
        let html = render(&theme, &chrome());
        assert!(html.contains(r#"aria-label="Primary Navigation""#));
        assert!(html.contains(r#"<a href="/tag/sf">SF</a>"#));

        theme.menu.clear();
        assert!(!render(&theme, &chrome()).contains("top-nav"));
    }

    #[test]
    fn test_footer_and_stylesheet() {
        let mut theme = sample_theme();
        theme.site.stylesheet = Some("/static/style.css".to_string());
        let html = render(&theme, &chrome());
        assert!(html.contains(r#"<link rel="stylesheet" href="/static/style.css">"#));
        assert!(html.contains("<small>© 2026 OTT Trendy</small>"));
        assert!(html.contains("<small>Powered by ott-trendy</small>"));
    }
}
