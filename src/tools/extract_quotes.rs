//! Quote extraction tool for text the caller already has.

use async_trait::async_trait;
use sift_search::quotes::{self, DEFAULT_RELEVANT_QUOTES};
use sift_search::{Quote, QuoteOptions};

use crate::error::{Result, SiftError};

use super::types::{Tool, ToolResult, to_json};
use super::{optional_str, optional_u64, required_str};

/// Tool that pulls verbatim, citation-sized sentences out of a text.
///
/// # Arguments (JSON)
///
/// - `text` (string, required): the source text
/// - `query` (string, optional): rank sentences by overlap with this text
/// - `max_quotes` (integer, optional): default 3 with a query, else from config
/// - `source_title`, `source_url`, `date` (strings, optional): attribution
pub struct ExtractQuotesTool {
    options: QuoteOptions,
}

impl ExtractQuotesTool {
    pub fn new(options: QuoteOptions) -> Self {
        Self { options }
    }

    fn quotes(&self, args: &serde_json::Value) -> Result<Vec<Quote>> {
        let text = required_str(args, "text")?;
        let query = optional_str(args, "query");
        let max_quotes = optional_u64(args, "max_quotes")?
            .map(|n| usize::try_from(n).unwrap_or(usize::MAX));
        if max_quotes == Some(0) {
            return Err(SiftError::ToolValidation(
                "max_quotes must be greater than 0".into(),
            ));
        }

        let sentences = match query {
            Some(q) => {
                quotes::extract_relevant_quotes(text, q, max_quotes.unwrap_or(DEFAULT_RELEVANT_QUOTES))
            }
            None => {
                let options = QuoteOptions {
                    max_quotes: max_quotes.unwrap_or(self.options.max_quotes),
                    ..self.options
                };
                quotes::extract_quotes(text, &options)
            }
        };

        let title = optional_str(args, "source_title").unwrap_or_default();
        let url = optional_str(args, "source_url").unwrap_or_default();
        let date = match optional_str(args, "date") {
            Some(raw) => {
                let normalized = sift_search::date::normalize(raw);
                if normalized.is_empty() { raw.to_owned() } else { normalized }
            }
            None => String::new(),
        };

        Ok(sentences
            .into_iter()
            .map(|s| Quote::new(s, title, url, date.as_str(), None))
            .collect())
    }
}

impl Default for ExtractQuotesTool {
    fn default() -> Self {
        Self::new(QuoteOptions::default())
    }
}

#[async_trait]
impl Tool for ExtractQuotesTool {
    fn name(&self) -> &str {
        "extract_quotes"
    }

    fn description(&self) -> &str {
        "Extract verbatim sentences (20-120 characters) from a text, optionally ranked \
         by relevance to a query, with source attribution for citation."
    }

    fn schema(&self) -> serde_json::Value {
        serde_json::json!({
            "type": "object",
            "properties": {
                "text": {
                    "type": "string",
                    "description": "The text to quote from"
                },
                "query": {
                    "type": "string",
                    "description": "Optional question; the most relevant sentences are returned first"
                },
                "max_quotes": {
                    "type": "integer",
                    "description": "Maximum number of quotes"
                },
                "source_title": { "type": "string" },
                "source_url": { "type": "string" },
                "date": {
                    "type": "string",
                    "description": "Publication date in any common format"
                }
            },
            "required": ["text"]
        })
    }

    async fn execute(&self, args: serde_json::Value) -> Result<ToolResult> {
        let quotes = self.quotes(&args)?;
        Ok(ToolResult::success(to_json(&quotes)?))
    }
}
