//! Verbatim quote extraction.
//!
//! Quotes are whole sentences lifted unchanged from page text, so a
//! downstream answer can cite them word for word. Sentences are filtered on
//! length and on how much of them is punctuation or digits, which removes
//! navigation crumbs, tables and price lists.

use regex::Regex;
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::sync::LazyLock;

/// Longest text a [`Quote`] may carry.
pub const MAX_QUOTE_CHARS: usize = 120;

/// Quotes returned by [`extract_relevant_quotes`] when callers have no preference.
pub const DEFAULT_RELEVANT_QUOTES: usize = 3;

static SENTENCE_END: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"[.!?]+").unwrap_or_else(|e| panic!("invalid sentence pattern: {e}"))
});
static WORD: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\b\w+\b").unwrap_or_else(|e| panic!("invalid word pattern: {e}")));

/// Bounds for [`extract_quotes`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct QuoteOptions {
    /// Longest sentence kept, in characters.
    pub max_len: usize,
    /// Shortest sentence kept, in characters.
    pub min_len: usize,
    /// Maximum number of quotes returned.
    pub max_quotes: usize,
}

impl Default for QuoteOptions {
    fn default() -> Self {
        Self {
            max_len: MAX_QUOTE_CHARS,
            min_len: 20,
            max_quotes: 5,
        }
    }
}

/// A quote attributed to its source.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Quote {
    pub text: String,
    pub source_title: String,
    pub source_url: String,
    /// Canonical `YYYY-MM-DD` date, or empty when unknown.
    pub date: String,
    /// Page number or media timestamp, when the source has one.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub page_or_timestamp: Option<String>,
}

impl Quote {
    /// Build a quote, truncating text longer than [`MAX_QUOTE_CHARS`] to
    /// 117 characters plus `"..."`.
    pub fn new(
        text: impl Into<String>,
        source_title: impl Into<String>,
        source_url: impl Into<String>,
        date: impl Into<String>,
        page_or_timestamp: Option<String>,
    ) -> Self {
        Self {
            text: truncate_quote(&text.into()),
            source_title: source_title.into(),
            source_url: source_url.into(),
            date: date.into(),
            page_or_timestamp,
        }
    }
}

/// Truncate `text` to at most [`MAX_QUOTE_CHARS`] characters.
pub fn truncate_quote(text: &str) -> String {
    if text.chars().count() <= MAX_QUOTE_CHARS {
        return text.to_owned();
    }
    let mut out: String = text.chars().take(MAX_QUOTE_CHARS - 3).collect();
    out.push_str("...");
    out
}

/// Extract up to `options.max_quotes` sentences from `text`, in document order.
///
/// Every returned quote is a verbatim substring of `text`.
pub fn extract_quotes<'a>(text: &'a str, options: &QuoteOptions) -> Vec<&'a str> {
    if options.max_quotes == 0 {
        return Vec::new();
    }
    SENTENCE_END
        .split(text)
        .map(str::trim)
        .filter(|sentence| is_quotable(sentence, options))
        .take(options.max_quotes)
        .collect()
}

/// Extract the `max_quotes` sentences sharing the most words with `query`.
///
/// Candidates are the first `2 * max_quotes` quotable sentences. Ties keep
/// document order. Empty text or an empty query yields nothing.
pub fn extract_relevant_quotes<'a>(text: &'a str, query: &str, max_quotes: usize) -> Vec<&'a str> {
    if text.trim().is_empty() || query.trim().is_empty() {
        return Vec::new();
    }

    let options = QuoteOptions {
        max_quotes: max_quotes.saturating_mul(2),
        ..QuoteOptions::default()
    };
    let query_words = word_set(query);

    let mut scored: Vec<(usize, &str)> = extract_quotes(text, &options)
        .into_iter()
        .map(|quote| (word_set(quote).intersection(&query_words).count(), quote))
        .collect();
    scored.sort_by_key(|(score, _)| std::cmp::Reverse(*score));

    scored
        .into_iter()
        .take(max_quotes)
        .map(|(_, quote)| quote)
        .collect()
}

/// Attributed quotes from a source's text.
///
/// With a non-blank `query` the [`DEFAULT_RELEVANT_QUOTES`] most relevant
/// sentences are returned, otherwise plain extraction under `options`.
pub fn attributed_quotes(
    text: &str,
    query: Option<&str>,
    options: &QuoteOptions,
    source_title: &str,
    source_url: &str,
    date: &str,
) -> Vec<Quote> {
    let sentences = match query.filter(|q| !q.trim().is_empty()) {
        Some(q) => extract_relevant_quotes(text, q, DEFAULT_RELEVANT_QUOTES),
        None => extract_quotes(text, options),
    };
    sentences
        .into_iter()
        .map(|s| Quote::new(s, source_title, source_url, date, None))
        .collect()
}

fn is_quotable(sentence: &str, options: &QuoteOptions) -> bool {
    let len = sentence.chars().count();
    if len < options.min_len || len > options.max_len || len == 0 {
        return false;
    }

    let special = sentence
        .chars()
        .filter(|c| !c.is_alphanumeric() && !c.is_whitespace())
        .count();
    let digits = sentence.chars().filter(|c| c.is_numeric()).count();

    let len = len as f64;
    special as f64 / len <= 0.3 && digits as f64 / len <= 0.4
}

fn word_set(text: &str) -> HashSet<String> {
    let lower = text.to_lowercase();
    WORD.find_iter(&lower)
        .map(|m| m.as_str().to_owned())
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    const ARTICLE: &str = "The central bank raised interest rates by a quarter point. \
        Analysts had expected the move for several weeks! \
        Short one. \
        Did inflation finally peak this spring? \
        ###$$$%%%^^^&&&***((()))!!!@@@ \
        1234567890 1234567890 12345 rates. \
        Markets reacted calmly to the interest rate decision.";

    #[test]
    fn extracts_sentences_in_order() {
        let quotes = extract_quotes(ARTICLE, &QuoteOptions::default());
        assert_eq!(
            quotes,
            vec![
                "The central bank raised interest rates by a quarter point",
                "Analysts had expected the move for several weeks",
                "Did inflation finally peak this spring",
                "Markets reacted calmly to the interest rate decision",
            ]
        );
    }

    #[test]
    fn quotes_are_verbatim_and_bounded() {
        let text = format!("{} Then a normal sentence follows here. {}", "word ".repeat(40), ARTICLE);
        for quote in extract_quotes(&text, &QuoteOptions::default()) {
            assert!(text.contains(quote));
            assert!(quote.chars().count() <= MAX_QUOTE_CHARS);
            assert!(quote.chars().count() >= 20);
        }
    }

    #[test]
    fn special_character_heavy_sentences_are_dropped() {
        let quotes = extract_quotes("<<>> {{}} [[]] ## ** && some text.", &QuoteOptions::default());
        assert!(quotes.is_empty());
    }

    #[test]
    fn digit_heavy_sentences_are_dropped() {
        let quotes = extract_quotes("Prices 100 200 300 400 500 600 700.", &QuoteOptions::default());
        assert!(quotes.is_empty());
    }

    #[test]
    fn non_ascii_digits_count_towards_digit_ratio() {
        let text = "Revenue ١٢٣٤٥٦٧٨٩٠١٢٣٤٥٦٧٨٩٠١٢٣ was reported ok. \
            Die Behörde prüfte die Änderungen gründlich.";
        let quotes = extract_quotes(text, &QuoteOptions::default());
        assert_eq!(quotes, vec!["Die Behörde prüfte die Änderungen gründlich"]);
    }

    #[test]
    fn max_quotes_limits_output() {
        let options = QuoteOptions {
            max_quotes: 2,
            ..Default::default()
        };
        assert_eq!(extract_quotes(ARTICLE, &options).len(), 2);

        let none = QuoteOptions {
            max_quotes: 0,
            ..Default::default()
        };
        assert!(extract_quotes(ARTICLE, &none).is_empty());
    }

    #[test]
    fn empty_text_yields_nothing() {
        assert!(extract_quotes("", &QuoteOptions::default()).is_empty());
        assert!(extract_quotes("...!!!???", &QuoteOptions::default()).is_empty());
    }

    #[test]
    fn multibyte_text_is_measured_in_chars() {
        let text = "Ünïcödé sentences are measured by characters here.";
        let quotes = extract_quotes(text, &QuoteOptions::default());
        assert_eq!(quotes, vec!["Ünïcödé sentences are measured by characters here"]);
    }

    #[test]
    fn relevant_quotes_ranked_by_overlap() {
        let quotes = extract_relevant_quotes(ARTICLE, "interest rate decision", 3);
        assert_eq!(
            quotes,
            vec![
                "Markets reacted calmly to the interest rate decision",
                "The central bank raised interest rates by a quarter point",
                "Analysts had expected the move for several weeks",
            ]
        );
    }

    #[test]
    fn relevant_quotes_keep_order_on_ties() {
        let quotes = extract_relevant_quotes(ARTICLE, "unrelated zebra", 2);
        assert_eq!(
            quotes,
            vec![
                "The central bank raised interest rates by a quarter point",
                "Analysts had expected the move for several weeks",
            ]
        );
    }

    #[test]
    fn relevant_quotes_need_text_and_query() {
        assert!(extract_relevant_quotes("", "rates", 3).is_empty());
        assert!(extract_relevant_quotes(ARTICLE, "", 3).is_empty());
        assert!(extract_relevant_quotes(ARTICLE, "   ", 3).is_empty());
    }

    #[test]
    fn quote_new_truncates_long_text() {
        let long = "a".repeat(200);
        let quote = Quote::new(long, "Title", "https://example.com", "2024-01-01", None);
        assert_eq!(quote.text.chars().count(), 120);
        assert!(quote.text.ends_with("..."));
    }

    #[test]
    fn quote_new_keeps_short_text() {
        let quote = Quote::new("short", "T", "u", "", Some("p. 4".into()));
        assert_eq!(quote.text, "short");
        assert_eq!(quote.page_or_timestamp.as_deref(), Some("p. 4"));
    }

    #[test]
    fn attributed_quotes_carry_source() {
        let quotes = attributed_quotes(
            ARTICLE,
            Some("interest rate decision"),
            &QuoteOptions::default(),
            "Rates",
            "https://news.example/rates",
            "2024-03-14",
        );
        assert_eq!(quotes.len(), DEFAULT_RELEVANT_QUOTES);
        assert_eq!(quotes[0].text, "Markets reacted calmly to the interest rate decision");
        assert!(quotes.iter().all(|q| q.source_url == "https://news.example/rates"));
        assert!(quotes.iter().all(|q| q.date == "2024-03-14"));
    }

    #[test]
    fn attributed_quotes_without_query_use_plain_extraction() {
        let quotes = attributed_quotes(ARTICLE, Some("  "), &QuoteOptions::default(), "T", "u", "");
        assert_eq!(quotes.len(), 4);
        assert_eq!(quotes[0].source_title, "T");
    }

    #[test]
    fn quote_serialisation_omits_missing_page() {
        let quote = Quote::new("text", "T", "u", "", None);
        let json = serde_json::to_value(&quote).expect("serialize");
        assert!(json.get("page_or_timestamp").is_none());
        assert_eq!(json["source_url"], "u");
    }
}
