//! Listing pages: home, archives, search results and the not-found index

use maud::{html, Markup};

use super::excerpt::excerpt_for;
use super::{layout, pagination, Chrome, Theme};
use crate::content::{ContentItem, Pagination};

/// Where pager links point. Page 1 is the bare path; later pages append
/// `/page/{n}`. A query string (search) is kept on every link.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PageBase {
    path: String,
    query: Option<String>,
}

impl PageBase {
    pub fn new(path: impl Into<String>) -> Self {
        Self {
            path: path.into(),
            query: None,
        }
    }

    /// Listing of search results for `query`
    pub fn search(query: &str) -> Self {
        Self {
            path: "/".to_string(),
            query: Some(format!("s={}", urlencoding::encode(query))),
        }
    }

    pub fn url(&self, page: u32) -> String {
        let path = if page <= 1 {
            self.path.clone()
        } else {
            format!("{}/page/{}", self.path.trim_end_matches('/'), page)
        };
        match &self.query {
            Some(q) => format!("{}?{}", path, q),
            None => path,
        }
    }
}

/// Subject of an archive listing
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ArchiveTitle {
    Tag(String),
    Year(i32),
    Month(i32, u32),
    Day(i32, u32, u32),
}

impl ArchiveTitle {
    pub fn label(&self, theme: &Theme) -> String {
        let s = &theme.strings;
        match self {
            Self::Tag(name) => format!("{}: {}", s.archive_tag, name),
            Self::Year(y) => format!("{}: {}", s.archive_year, y),
            Self::Month(y, m) => format!("{}: {}년 {}월", s.archive_month, y, m),
            Self::Day(y, m, d) => format!("{}: {}년 {}월 {}일", s.archive_day, y, m, d),
        }
    }
}

/// Which listing template is rendering
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ListingKind {
    Home,
    Archive(ArchiveTitle),
    Search(String),
    /// Generic index shown for unknown routes
    NotFound,
}

/// Everything a listing page draws
#[derive(Debug, Clone)]
pub struct ListingView<'a> {
    pub kind: ListingKind,
    pub items: &'a [ContentItem],
    pub pagination: Pagination,
    pub base: PageBase,
}

impl ListingKind {
    fn empty_message<'s>(&self, theme: &'s Theme) -> &'s str {
        match self {
            Self::Home | Self::NotFound => theme.strings.empty_index,
            Self::Archive(_) => theme.strings.empty_archive,
            Self::Search(_) => theme.strings.empty_search,
        }
    }

    fn body_class(&self) -> &'static str {
        match self {
            Self::Home => "home blog",
            Self::Archive(_) => "archive",
            Self::Search(_) => "search",
            Self::NotFound => "error404",
        }
    }

    /// `<title>` prefix; `None` means the site name alone
    fn title(&self, theme: &Theme) -> Option<String> {
        match self {
            Self::Home => None,
            Self::Archive(subject) => Some(subject.label(theme)),
            Self::Search(q) => Some(format!("\"{}\" {}", q, theme.strings.search_heading)),
            Self::NotFound => Some(theme.strings.not_found_title.to_string()),
        }
    }
}

fn head(theme: &Theme, kind: &ListingKind) -> Markup {
    let (heading, lead) = match kind {
        ListingKind::Home => (
            theme.site.home_heading.clone(),
            theme.site.home_tagline.clone(),
        ),
        ListingKind::NotFound => (theme.site.name.clone(), theme.site.description.clone()),
        ListingKind::Archive(subject) => (subject.label(theme), String::new()),
        ListingKind::Search(q) => (
            theme.strings.search_heading.to_string(),
            format!("\"{}\" {}", q, theme.strings.search_summary),
        ),
    };

    html! {
        section.listing-head {
            h1 { (heading) }
            @if !lead.is_empty() {
                p { (lead) }
            }
        }
    }
}

/// One post card, shared by every listing template
pub(super) fn card(theme: &Theme, item: &ContentItem) -> Markup {
    html! {
        article.post-card id={ "post-" (item.id) } {
            a.post-card-link href=(item.permalink()) {
                @if let Some(thumb) = &item.thumbnail {
                    div.thumb-wrap {
                        img.attachment-medium_large.size-medium_large
                            src=(thumb.url) alt=(thumb.alt) width="768" loading="lazy";
                    }
                }
                div.post-body {
                    h2.post-title { (item.title) }
                    p.post-meta { (theme.format_date(&item.published_at)) }
                    p.post-excerpt { (excerpt_for(item, &theme.site)) }
                }
            }
        }
    }
}

/// Listing content without the layout shell
pub(super) fn content(theme: &Theme, view: &ListingView) -> Markup {
    html! {
        (head(theme, &view.kind))
        @if view.items.is_empty() {
            p.empty-state { (view.kind.empty_message(theme)) }
        } @else {
            section.post-grid {
                @for item in view.items {
                    (card(theme, item))
                }
            }
            (pagination::render(theme, view.pagination, &view.base))
        }
    }
}

pub(super) fn page(theme: &Theme, view: &ListingView, chrome: &Chrome) -> Markup {
    layout::document(
        theme,
        chrome,
        view.kind.title(theme).as_deref(),
        view.kind.body_class(),
        content(theme, view),
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::content::Thumbnail;
    use crate::theme::tests::{chrome, sample_item, sample_theme};

    fn render(kind: ListingKind, items: &[ContentItem], p: Pagination) -> String {
        let theme = sample_theme();
        let view = ListingView {
            kind,
            items,
            pagination: p,
            base: PageBase::new("/"),
        };
        content(&theme, &view).into_string()
    }

    #[test]
    fn test_empty_archive_message_and_no_pager() {
        let html = render(
            ListingKind::Archive(ArchiveTitle::Tag("SF".to_string())),
            &[],
            Pagination::new(1, 0),
        );
        assert!(html.contains("<p class=\"empty-state\">조건에 맞는 게시물이 없습니다.</p>"));
        assert!(!html.contains("nav-links"));
        assert!(!html.contains("post-card"));
    }

    #[test]
    fn test_empty_search_message() {
        let html = render(
            ListingKind::Search("인터스텔라".to_string()),
            &[],
            Pagination::new(1, 0),
        );
        assert!(html.contains("검색 결과가 없습니다."));
        // Quotes around the query are escaped in text
        assert!(html.contains("&quot;인터스텔라&quot; 검색 결과입니다."));
    }

    #[test]
    fn test_empty_home_and_not_found_message() {
        for kind in [ListingKind::Home, ListingKind::NotFound] {
            let html = render(kind, &[], Pagination::new(1, 0));
            assert!(html.contains("아직 게시물이 없습니다."));
        }
    }

    #[test]
    fn test_search_hits_use_home_card() {
        let theme = sample_theme();
        let items = vec![sample_item(7, "interstellar")];
        let html = render(
            ListingKind::Search("인터스텔라".to_string()),
            &items,
            Pagination::new(1, 1),
        );
        assert!(html.contains(&card(&theme, &items[0]).into_string()));
        assert!(!html.contains("검색 결과가 없습니다."));

        let home = render(ListingKind::Home, &items, Pagination::new(1, 1));
        assert!(home.contains(&card(&theme, &items[0]).into_string()));
    }

    #[test]
    fn test_card_contents() {
        let theme = sample_theme();
        let mut item = sample_item(3, "dune");
        let html = card(&theme, &item).into_string();
        assert!(html.contains(r#"href="/posts/dune""#));
        assert!(html.contains("<h2 class=\"post-title\">dune 리뷰</h2>"));
        assert!(html.contains("<p class=\"post-meta\">2025.03.05</p>"));
        assert!(html.contains("<p class=\"post-excerpt\">본문입니다.</p>"));
        assert!(!html.contains("thumb-wrap"));

        item.thumbnail = Some(Thumbnail {
            url: "/img/dune.jpg".to_string(),
            alt: "Dune".to_string(),
        });
        let html = card(&theme, &item).into_string();
        assert!(html.contains("thumb-wrap"));
        assert!(html.contains(r#"src="/img/dune.jpg""#));
    }

    #[test]
    fn test_titles_are_escaped() {
        let theme = sample_theme();
        let mut item = sample_item(1, "x");
        item.title = "<script>alert(1)</script>".to_string();
        let html = card(&theme, &item).into_string();
        assert!(!html.contains("<script>"));
        assert!(html.contains("&lt;script&gt;"));
    }

    #[test]
    fn test_pager_only_when_multiple_pages() {
        let items = vec![sample_item(1, "a")];
        assert!(!render(ListingKind::Home, &items, Pagination::new(1, 1)).contains("nav-links"));
        assert!(render(ListingKind::Home, &items, Pagination::new(1, 2)).contains("nav-links"));
    }

    #[test]
    fn test_page_base_urls() {
        let home = PageBase::new("/");
        assert_eq!(home.url(1), "/");
        assert_eq!(home.url(2), "/page/2");

        let search = PageBase::search("오징어 게임");
        assert_eq!(search.url(1), "/?s=%EC%98%A4%EC%A7%95%EC%96%B4%20%EA%B2%8C%EC%9E%84");
        assert!(search.url(3).starts_with("/page/3?s="));
    }

    #[test]
    fn test_full_page_titles() {
        let theme = sample_theme();
        let view = ListingView {
            kind: ListingKind::Archive(ArchiveTitle::Year(2025)),
            items: &[],
            pagination: Pagination::new(1, 0),
            base: PageBase::new("/2025"),
        };
        let html = page(&theme, &view, &chrome()).into_string();
        assert!(html.contains("<title>연간: 2025 – OTT Trendy</title>"));
        assert!(html.contains("class=\"archive\""));

        let home = ListingView {
            kind: ListingKind::Home,
            ..view
        };
        let html = page(&theme, &home, &chrome()).into_string();
        assert!(html.contains("<title>OTT Trendy</title>"));
    }

    #[test]
    fn test_archive_labels() {
        let theme = sample_theme();
        assert_eq!(ArchiveTitle::Tag("SF".into()).label(&theme), "태그: SF");
        assert_eq!(ArchiveTitle::Year(2025).label(&theme), "연간: 2025");
        assert_eq!(ArchiveTitle::Month(2025, 3).label(&theme), "월간: 2025년 3월");
        assert_eq!(
            ArchiveTitle::Day(2025, 3, 5).label(&theme),
            "일간: 2025년 3월 5일"
        );
    }
}
