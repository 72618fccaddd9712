//! Main-content extraction from fetched pages.
//!
//! The page fetcher hands raw bodies to a [`ContentExtractor`]. The default
//! [`HtmlContentExtractor`] parses the HTML, skips non-content elements
//! (scripts, styles, navigation, ads), picks the main content area, and
//! reads title, publication date and author from the usual meta tags.

use crate::error::{Result, SearchError};
use crate::types::ExtractedContent;
use scraper::{ElementRef, Html, Selector};

/// Default maximum characters of text returned per page.
pub const DEFAULT_MAX_CHARS: usize = 100_000;

/// Elements whose text is never page content.
const BOILERPLATE_TAGS: &[&str] = &[
    "script", "style", "nav", "footer", "header", "aside", "noscript", "svg", "iframe", "form",
    "template",
];

/// Content roots in priority order.
const CONTENT_SELECTORS: &[&str] = &["article", "main", "[role=\"main\"]", "body"];

const DATE_SELECTORS: &[(&str, &str)] = &[
    ("meta[property=\"article:published_time\"]", "content"),
    ("meta[name=\"article:published_time\"]", "content"),
    ("meta[itemprop=\"datePublished\"]", "content"),
    ("meta[name=\"date\"]", "content"),
    ("meta[name=\"pubdate\"]", "content"),
    ("time[datetime]", "datetime"),
];

const AUTHOR_SELECTORS: &[(&str, &str)] = &[
    ("meta[name=\"author\"]", "content"),
    ("meta[property=\"article:author\"]", "content"),
];

/// Turns a fetched body into readable text plus metadata.
pub trait ContentExtractor: Send + Sync {
    /// Extract content from `body`, fetched from `url`.
    ///
    /// # Errors
    ///
    /// Returns [`SearchError::Parse`] if the body has no readable content.
    fn extract(&self, body: &str, url: &str) -> Result<ExtractedContent>;
}

/// HTML extractor built on `scraper`.
#[derive(Debug, Clone)]
pub struct HtmlContentExtractor {
    max_chars: usize,
}

impl HtmlContentExtractor {
    /// Extractor returning at most `max_chars` characters of text.
    pub fn with_limit(max_chars: usize) -> Self {
        Self { max_chars }
    }
}

impl Default for HtmlContentExtractor {
    fn default() -> Self {
        Self::with_limit(DEFAULT_MAX_CHARS)
    }
}

impl ContentExtractor for HtmlContentExtractor {
    fn extract(&self, body: &str, url: &str) -> Result<ExtractedContent> {
        let document = Html::parse_document(body);

        let text = normalise_whitespace(&main_text(&document));
        if text.is_empty() {
            tracing::debug!(url, "no extractable content");
            return Err(SearchError::Parse("no extractable content found".into()));
        }

        Ok(ExtractedContent {
            text: truncate_to_limit(&text, self.max_chars),
            title: title(&document),
            date: first_attribute(&document, DATE_SELECTORS),
            author: first_attribute(&document, AUTHOR_SELECTORS),
        })
    }
}

/// `<title>`, falling back to `og:title`.
fn title(document: &Html) -> Option<String> {
    let from_tag = Selector::parse("title").ok().and_then(|selector| {
        document
            .select(&selector)
            .next()
            .map(|el| el.text().collect::<String>().trim().to_owned())
    });

    from_tag
        .filter(|t| !t.is_empty())
        .or_else(|| first_attribute(document, &[("meta[property=\"og:title\"]", "content")]))
}

/// First non-empty attribute value across `(selector, attribute)` pairs.
fn first_attribute(document: &Html, candidates: &[(&str, &str)]) -> Option<String> {
    candidates.iter().find_map(|(selector, attr)| {
        let selector = Selector::parse(selector).ok()?;
        document
            .select(&selector)
            .filter_map(|el| el.value().attr(attr))
            .map(str::trim)
            .find(|value| !value.is_empty())
            .map(str::to_owned)
    })
}

/// Text of the first content root that has any.
fn main_text(document: &Html) -> String {
    for selector_str in CONTENT_SELECTORS {
        let Ok(selector) = Selector::parse(selector_str) else {
            continue;
        };
        if let Some(root) = document.select(&selector).next() {
            let text = visible_text(root);
            if !text.trim().is_empty() {
                return text;
            }
        }
    }
    String::new()
}

/// Text under `root`, skipping anything inside a boilerplate element.
fn visible_text(root: ElementRef<'_>) -> String {
    let mut parts = Vec::new();
    for node in root.descendants() {
        let Some(text) = node.value().as_text() else {
            continue;
        };
        let inside_boilerplate = node.ancestors().any(|ancestor| {
            ancestor
                .value()
                .as_element()
                .is_some_and(|el| BOILERPLATE_TAGS.contains(&el.name()))
        });
        if !inside_boilerplate {
            parts.push(&**text);
        }
    }
    parts.join(" ")
}

/// Collapse runs of spaces to one and runs of 3+ newlines to 2.
fn normalise_whitespace(text: &str) -> String {
    let mut result = String::with_capacity(text.len());
    let mut prev_was_space = false;
    let mut newline_count: u32 = 0;

    for ch in text.chars() {
        if ch == '\n' || ch == '\r' {
            newline_count += 1;
            prev_was_space = false;
            if newline_count <= 2 {
                result.push('\n');
            }
        } else if ch.is_whitespace() {
            newline_count = 0;
            if !prev_was_space {
                result.push(' ');
                prev_was_space = true;
            }
        } else {
            newline_count = 0;
            prev_was_space = false;
            result.push(ch);
        }
    }

    result
        .lines()
        .map(str::trim)
        .collect::<Vec<_>>()
        .join("\n")
        .trim()
        .to_owned()
}

fn truncate_to_limit(text: &str, max_chars: usize) -> String {
    match text.char_indices().nth(max_chars) {
        Some((end, _)) => text[..end].to_owned(),
        None => text.to_owned(),
    }
}
