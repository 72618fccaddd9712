//! Answer composition: normalizes a drafted answer into the citation
//! contract and renders it as markdown.
//!
//! The tool does no I/O. It fills missing fields, bounds quote length and
//! coerces unknown confidence levels, so whatever the caller drafted comes
//! back in one predictable shape.

use std::fmt::{self, Write as _};

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use sift_search::quotes::MAX_QUOTE_CHARS;

use crate::error::{Result, SiftError};

use super::types::{Tool, ToolResult, to_json};

/// How sure the answer is.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Confidence {
    Low,
    #[default]
    Medium,
    High,
}

impl Confidence {
    /// Parse a level, falling back to [`Confidence::Medium`] for anything
    /// other than exactly `low`, `medium` or `high`.
    pub fn parse(raw: &str) -> Self {
        match raw {
            "low" => Self::Low,
            "high" => Self::High,
            _ => Self::Medium,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Self::Low => "low",
            Self::Medium => "medium",
            Self::High => "high",
        }
    }
}

impl fmt::Display for Confidence {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A supporting quote as cited in the answer.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct AnswerQuote {
    pub text: String,
    /// Source title.
    pub source: String,
    pub url: String,
    pub date: String,
    /// Page number (`p.12`) or media timestamp (`01:23`).
    pub page_or_ts: String,
}

/// A source listed under the answer.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct AnswerSource {
    pub title: String,
    pub domain: String,
    pub url: String,
    pub date: String,
}

/// How the answer was researched.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct SearchMethod {
    pub queries: Vec<String>,
    pub hops: u32,
    pub notes: String,
}

/// A normalized, citable answer.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ComposedAnswer {
    pub summary: String,
    pub bullets: Vec<String>,
    pub quotes: Vec<AnswerQuote>,
    pub sources: Vec<AnswerSource>,
    pub method: SearchMethod,
    pub confidence: Confidence,
}

/// Caller-drafted answer fields, all optional except `summary`.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct AnswerDraft {
    pub summary: String,
    pub bullets: Vec<String>,
    pub quotes: Vec<AnswerQuote>,
    pub sources: Vec<AnswerSource>,
    pub queries: Vec<String>,
    pub hops: u32,
    pub notes: String,
    pub confidence: String,
}

/// Normalize a draft: quote text is cut to 120 characters and an unknown
/// confidence becomes `medium`.
pub fn compose_answer(draft: AnswerDraft) -> ComposedAnswer {
    let quotes = draft
        .quotes
        .into_iter()
        .map(|q| AnswerQuote {
            text: q.text.chars().take(MAX_QUOTE_CHARS).collect(),
            ..q
        })
        .collect();

    ComposedAnswer {
        summary: draft.summary,
        bullets: draft.bullets,
        quotes,
        sources: draft.sources,
        method: SearchMethod {
            queries: draft.queries,
            hops: draft.hops,
            notes: draft.notes,
        },
        confidence: Confidence::parse(&draft.confidence),
    }
}

/// Render an answer as markdown for display.
pub fn format_markdown(answer: &ComposedAnswer) -> String {
    let mut md = String::new();
    // Writing to a String cannot fail.
    let _ = write_markdown(&mut md, answer);
    md
}

fn write_markdown(md: &mut String, answer: &ComposedAnswer) -> fmt::Result {
    writeln!(md, "## Summary\n\n{}\n", answer.summary)?;

    if !answer.bullets.is_empty() {
        writeln!(md, "## Key Points\n")?;
        for bullet in &answer.bullets {
            writeln!(md, "- {bullet}")?;
        }
        writeln!(md)?;
    }

    if !answer.quotes.is_empty() {
        writeln!(md, "## Supporting Quotes\n")?;
        for (i, quote) in answer.quotes.iter().enumerate() {
            writeln!(md, "{}. \"{}\"", i + 1, quote.text)?;
            writeln!(md, "   - Source: {}", quote.source)?;
            writeln!(md, "   - Date: {}", quote.date)?;
            writeln!(md, "   - URL: {}", quote.url)?;
            if !quote.page_or_ts.is_empty() {
                writeln!(md, "   - Location: {}", quote.page_or_ts)?;
            }
            writeln!(md)?;
        }
    }

    if !answer.sources.is_empty() {
        writeln!(md, "## Sources\n")?;
        for (i, source) in answer.sources.iter().enumerate() {
            writeln!(md, "{}. **{}** ({})", i + 1, source.title, source.domain)?;
            writeln!(md, "   - Date: {}", source.date)?;
            writeln!(md, "   - URL: {}", source.url)?;
            writeln!(md)?;
        }
    }

    let method = &answer.method;
    let notes = if method.notes.is_empty() { "N/A" } else { method.notes.as_str() };
    writeln!(md, "## How I Searched\n")?;
    writeln!(md, "- **Queries**: {}", method.queries.join(", "))?;
    writeln!(md, "- **Search Hops**: {}", method.hops)?;
    writeln!(md, "- **Notes**: {notes}")?;
    write!(
        md,
        "- **Confidence**: {}",
        answer.confidence.as_str().to_ascii_uppercase()
    )
}

/// Tool that normalizes the final answer.
///
/// # Arguments (JSON)
///
/// - `summary` (string, required)
/// - `bullets`, `queries` (lists of strings, optional)
/// - `quotes` (list of `{text, source, url, date, page_or_ts}`, optional)
/// - `sources` (list of `{title, domain, url, date}`, optional)
/// - `hops` (integer, optional), `notes` (string, optional)
/// - `confidence` (`low` | `medium` | `high`, optional)
/// - `format` (`json` | `markdown`, optional): output rendering
pub struct ComposeAnswerTool;

#[async_trait]
impl Tool for ComposeAnswerTool {
    fn name(&self) -> &str {
        "compose_answer"
    }

    fn description(&self) -> &str {
        "Compose the final answer: summary, key points, verbatim quotes with sources, \
         the source list, how the search was done, and a confidence level."
    }

    fn schema(&self) -> serde_json::Value {
        serde_json::json!({
            "type": "object",
            "properties": {
                "summary": { "type": "string", "description": "One or two sentence answer" },
                "bullets": { "type": "array", "items": { "type": "string" } },
                "quotes": {
                    "type": "array",
                    "items": {
                        "type": "object",
                        "properties": {
                            "text": { "type": "string", "description": "Verbatim quote, at most 120 characters" },
                            "source": { "type": "string" },
                            "url": { "type": "string" },
                            "date": { "type": "string", "description": "YYYY-MM-DD" },
                            "page_or_ts": { "type": "string" }
                        }
                    }
                },
                "sources": {
                    "type": "array",
                    "items": {
                        "type": "object",
                        "properties": {
                            "title": { "type": "string" },
                            "domain": { "type": "string" },
                            "url": { "type": "string" },
                            "date": { "type": "string" }
                        }
                    }
                },
                "queries": { "type": "array", "items": { "type": "string" } },
                "hops": { "type": "integer" },
                "notes": { "type": "string" },
                "confidence": { "type": "string", "enum": ["low", "medium", "high"] },
                "format": { "type": "string", "enum": ["json", "markdown"] }
            },
            "required": ["summary"]
        })
    }

    async fn execute(&self, args: serde_json::Value) -> Result<ToolResult> {
        super::required_str(&args, "summary")?;
        let markdown = match super::optional_str(&args, "format") {
            None | Some("json") => false,
            Some("markdown") => true,
            Some(other) => {
                return Err(SiftError::ToolValidation(format!(
                    "format must be 'json' or 'markdown', got '{other}'"
                )));
            }
        };
        let draft: AnswerDraft = serde_json::from_value(args)
            .map_err(|e| SiftError::ToolValidation(format!("invalid answer: {e}")))?;

        let answer = compose_answer(draft);
        let content = if markdown {
            format_markdown(&answer)
        } else {
            to_json(&answer)?
        };
        Ok(ToolResult::success(content))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn draft() -> AnswerDraft {
        AnswerDraft {
            summary: "The AI Act entered into force in August 2024.".into(),
            bullets: vec!["Applies to high-risk systems".into()],
            quotes: vec![AnswerQuote {
                text: "The regulation establishes harmonised rules on artificial intelligence".into(),
                source: "Official Journal".into(),
                url: "https://eur-lex.europa.eu/eli/reg/2024/1689".into(),
                date: "2024-07-12".into(),
                page_or_ts: "p.3".into(),
            }],
            sources: vec![AnswerSource {
                title: "Official Journal".into(),
                domain: "eur-lex.europa.eu".into(),
                url: "https://eur-lex.europa.eu/eli/reg/2024/1689".into(),
                date: "2024-07-12".into(),
            }],
            queries: vec!["EU AI Act entry into force".into(), "AI Act timeline".into()],
            hops: 2,
            notes: "Prioritised official EU sources".into(),
            confidence: "high".into(),
        }
    }

    #[test]
    fn confidence_falls_back_to_medium() {
        assert_eq!(Confidence::parse("low"), Confidence::Low);
        assert_eq!(Confidence::parse("high"), Confidence::High);
        assert_eq!(Confidence::parse("HIGH"), Confidence::Medium);
        assert_eq!(Confidence::parse(" low "), Confidence::Medium);
        assert_eq!(Confidence::parse("certain"), Confidence::Medium);
        assert_eq!(Confidence::parse(""), Confidence::Medium);
    }

    #[test]
    fn long_quotes_are_cut_to_limit() {
        let mut d = draft();
        d.quotes[0].text = "a".repeat(300);
        let answer = compose_answer(d);
        assert_eq!(answer.quotes[0].text.chars().count(), MAX_QUOTE_CHARS);
        assert_eq!(answer.quotes[0].page_or_ts, "p.3");
    }

    #[test]
    fn method_collects_search_metadata() {
        let answer = compose_answer(draft());
        assert_eq!(answer.method.hops, 2);
        assert_eq!(answer.method.queries.len(), 2);
        assert_eq!(answer.confidence, Confidence::High);
    }

    #[test]
    fn markdown_has_every_section() {
        let md = format_markdown(&compose_answer(draft()));
        for heading in [
            "## Summary",
            "## Key Points",
            "## Supporting Quotes",
            "## Sources",
            "## How I Searched",
        ] {
            assert!(md.contains(heading), "{heading}");
        }
        assert!(md.contains("   - Location: p.3"));
        assert!(md.contains("1. **Official Journal** (eur-lex.europa.eu)"));
        assert!(md.contains("- **Queries**: EU AI Act entry into force, AI Act timeline"));
        assert!(md.ends_with("- **Confidence**: HIGH"));
    }

    #[test]
    fn markdown_skips_empty_sections() {
        let answer = compose_answer(AnswerDraft {
            summary: "Nothing found.".into(),
            ..AnswerDraft::default()
        });
        let md = format_markdown(&answer);
        assert!(!md.contains("## Key Points"));
        assert!(!md.contains("## Sources"));
        assert!(md.contains("- **Notes**: N/A"));
        assert!(md.contains("- **Confidence**: MEDIUM"));
    }

    #[tokio::test]
    async fn tool_fills_missing_fields() {
        let result = ComposeAnswerTool
            .execute(json!({
                "summary": "Rates held.",
                "quotes": [{"text": "Rates were held", "url": "https://example.com"}],
                "confidence": "sure"
            }))
            .await
            .expect("valid args");
        let body: serde_json::Value = serde_json::from_str(&result.content).expect("json");

        assert_eq!(body["confidence"], "medium");
        assert_eq!(body["bullets"], json!([]));
        assert_eq!(body["quotes"][0]["source"], "");
        assert_eq!(body["quotes"][0]["page_or_ts"], "");
        assert_eq!(body["method"]["hops"], 0);
    }

    #[tokio::test]
    async fn tool_renders_markdown_on_request() {
        let result = ComposeAnswerTool
            .execute(json!({"summary": "Rates held.", "format": "markdown"}))
            .await
            .expect("valid args");
        assert!(result.content.starts_with("## Summary\n\nRates held."));
    }

    #[tokio::test]
    async fn tool_requires_summary() {
        let err = ComposeAnswerTool
            .execute(json!({"bullets": ["x"]}))
            .await
            .err()
            .expect("missing summary");
        assert_eq!(err.code(), "TOOL_VALIDATION");
    }
}
