//! Request path and query to route
//!
//! Pure mapping with no repository access. Whether a slug or tag exists is
//! decided later by the handler.

use std::collections::HashMap;

use chrono::NaiveDate;

use crate::content::ListFilter;

/// What a GET request asks for
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Route {
    /// A listing page; `filter` of `All` is the home page
    Listing { filter: ListFilter, page: u32 },
    Single { slug: String },
    NotFound,
}

/// Resolve a raw (percent-encoded) path and decoded query parameters
pub fn resolve(path: &str, params: &HashMap<String, String>) -> Route {
    let mut segments = Vec::new();
    for raw in path.split('/').filter(|s| !s.is_empty()) {
        match urlencoding::decode(raw) {
            Ok(s) => segments.push(s.into_owned()),
            Err(_) => return Route::NotFound,
        }
    }

    // Trailing /page/{n}
    let mut page = None;
    if segments.len() >= 2 && segments[segments.len() - 2] == "page" {
        match parse_page(&segments[segments.len() - 1]) {
            Some(n) => page = Some(n),
            None => return Route::NotFound,
        }
        segments.truncate(segments.len() - 2);
    }

    if page.is_none() {
        if let Some(raw) = params.get("paged") {
            match parse_page(raw) {
                Some(n) => page = Some(n),
                None => return Route::NotFound,
            }
        }
    }

    let query = params
        .get("s")
        .map(|s| s.trim())
        .filter(|s| !s.is_empty());

    let parts: Vec<&str> = segments.iter().map(String::as_str).collect();
    let filter = match parts.as_slice() {
        [] => match query {
            Some(q) => ListFilter::Search(q.to_string()),
            None => ListFilter::All,
        },
        ["search", q] if !q.trim().is_empty() => ListFilter::Search(q.trim().to_string()),
        ["tag", slug] => ListFilter::Tag(slug.to_string()),
        ["posts", slug] if page.is_none() => {
            return Route::Single {
                slug: slug.to_string(),
            }
        }
        [y] => match date_filter(y, None, None) {
            Some(f) => f,
            None => return Route::NotFound,
        },
        [y, m] => match date_filter(y, Some(*m), None) {
            Some(f) => f,
            None => return Route::NotFound,
        },
        [y, m, d] => match date_filter(y, Some(*m), Some(*d)) {
            Some(f) => f,
            None => return Route::NotFound,
        },
        _ => return Route::NotFound,
    };

    Route::Listing {
        filter,
        page: page.unwrap_or(1),
    }
}

/// Page numbers are positive integers
fn parse_page(raw: &str) -> Option<u32> {
    if raw.is_empty() || !raw.bytes().all(|b| b.is_ascii_digit()) {
        return None;
    }
    raw.parse().ok().filter(|n| *n >= 1)
}

fn fixed_digits(raw: &str, len: usize) -> Option<u32> {
    if raw.len() != len || !raw.bytes().all(|b| b.is_ascii_digit()) {
        return None;
    }
    raw.parse().ok()
}

/// `/yyyy`, `/yyyy/mm`, `/yyyy/mm/dd` with a real calendar date
fn date_filter(y: &str, m: Option<&str>, d: Option<&str>) -> Option<ListFilter> {
    let year = fixed_digits(y, 4)? as i32;
    let month = match m {
        Some(m) => Some(fixed_digits(m, 2)?),
        None => None,
    };
    let day = match d {
        Some(d) => Some(fixed_digits(d, 2)?),
        None => None,
    };

    NaiveDate::from_ymd_opt(year, month.unwrap_or(1), day.unwrap_or(1))?;
    Some(ListFilter::Date { year, month, day })
}
