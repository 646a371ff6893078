//! Numbered pager for listings
//!
//! Shows previous/next, the first and last page, one page either side of the
//! current one, and a gap marker wherever numbers are skipped.

use maud::{html, Markup};

use super::listing::PageBase;
use super::Theme;
use crate::content::Pagination;

/// Pages always shown at each end
const END_SIZE: u32 = 1;
/// Pages shown on each side of the current page
const MID_SIZE: u32 = 1;

/// One entry in the pager
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PageLink {
    Prev(u32),
    Number(u32),
    Current(u32),
    Gap,
    Next(u32),
}

/// Pager entries in display order; empty when there is a single page
pub fn page_links(p: Pagination) -> Vec<PageLink> {
    if !p.is_needed() {
        return Vec::new();
    }

    let mut links = Vec::new();
    if p.has_prev() {
        links.push(PageLink::Prev(p.current - 1));
    }

    let mut gap_allowed = false;
    for n in 1..=p.total {
        if n == p.current {
            links.push(PageLink::Current(n));
            gap_allowed = true;
        } else if n <= END_SIZE
            || (n + MID_SIZE >= p.current && n <= p.current + MID_SIZE)
            || n + END_SIZE > p.total
        {
            links.push(PageLink::Number(n));
            gap_allowed = true;
        } else if gap_allowed {
            links.push(PageLink::Gap);
            gap_allowed = false;
        }
    }

    if p.has_next() {
        links.push(PageLink::Next(p.current + 1));
    }
    links
}

pub(super) fn render(theme: &Theme, p: Pagination, base: &PageBase) -> Markup {
    let links = page_links(p);
    if links.is_empty() {
        return html! {};
    }
    let s = &theme.strings;

    html! {
        nav.navigation.pagination aria-label=(s.pager_label) {
            div.nav-links {
                @for link in &links {
                    @match link {
                        PageLink::Prev(n) => {
                            a.prev.page-numbers href=(base.url(*n)) { (s.prev_page) }
                        }
                        PageLink::Number(n) => {
                            a.page-numbers href=(base.url(*n)) { (n) }
                        }
                        PageLink::Current(n) => {
                            span.page-numbers.current aria-current="page" { (n) }
                        }
                        PageLink::Gap => {
                            span.page-numbers.dots { "…" }
                        }
                        PageLink::Next(n) => {
                            a.next.page-numbers href=(base.url(*n)) { (s.next_page) }
                        }
                    }
                }
            }
        }
    }
}
