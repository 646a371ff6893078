//! Card excerpts: strip markup, keep the first N words

use scraper::{ElementRef, Html, Node};

use crate::config::SiteConfig;
use crate::content::ContentItem;

/// Elements whose text never shows up in an excerpt
const HIDDEN: &[&str] = &["script", "style", "noscript", "template"];

/// Elements that separate words when flattened
const BLOCKS: &[&str] = &[
    "p", "div", "br", "li", "ul", "ol", "h1", "h2", "h3", "h4", "h5", "h6", "blockquote",
    "figure", "figcaption", "table", "tr", "td", "th", "hr", "section", "article",
];

fn collect_text(output: &mut String, element: ElementRef<'_>) {
    for child in element.children() {
        match child.value() {
            Node::Text(text) => output.push_str(text),
            Node::Element(el) => {
                let name = el.name();
                if HIDDEN.contains(&name) {
                    continue;
                }
                let block = BLOCKS.contains(&name);
                if block {
                    output.push(' ');
                }
                if let Some(el) = ElementRef::wrap(child) {
                    collect_text(output, el);
                }
                if block {
                    output.push(' ');
                }
            }
            _ => {}
        }
    }
}

/// Plain text of an HTML fragment with entities decoded. The result is
/// escaped again when rendered.
pub fn strip_tags(html: &str) -> String {
    let fragment = Html::parse_fragment(html);
    let mut output = String::new();
    collect_text(&mut output, fragment.root_element());
    output
}

/// Keep the first `limit` whitespace-separated words. Text that had to be cut
/// gets `more` appended; text within the limit is returned with its words
/// joined by single spaces and no suffix.
pub fn trim_words(text: &str, limit: usize, more: &str) -> String {
    let words: Vec<&str> = text.split_whitespace().collect();
    if words.len() > limit {
        let mut out = words[..limit].join(" ");
        out.push_str(more);
        out
    } else {
        words.join(" ")
    }
}

/// Excerpt shown on a card: the hand-written excerpt when there is one,
/// otherwise the trimmed body text.
pub fn excerpt_for(item: &ContentItem, site: &SiteConfig) -> String {
    match item.excerpt.as_deref() {
        Some(manual) => strip_tags(manual).trim().to_string(),
        None => trim_words(&strip_tags(&item.body), site.excerpt_length, &site.excerpt_more),
    }
}
