//! Document analysis tool: delegates PDFs and images to a
//! [`DocumentAnalyzer`].

use std::path::Path;
use std::sync::Arc;

use async_trait::async_trait;
use serde::Serialize;

use crate::document::{DocumentAnalyzer, DocumentSource, mime_for_path};
use crate::error::Result;

use super::types::{Tool, ToolResult, to_json};
use super::{optional_str, required_str};

#[derive(Debug, Serialize)]
struct Analysis<'a> {
    source: &'a str,
    mime_type: Option<&'a str>,
    analysis: String,
}

/// Tool that reads a PDF, chart or other document and answers a question
/// about it.
///
/// # Arguments (JSON)
///
/// - `path_or_url` (string, required): an http(s) URL or a local path
/// - `question` (string, optional): what to look for in the document
pub struct AnalyzeDocumentTool {
    analyzer: Arc<dyn DocumentAnalyzer>,
}

impl AnalyzeDocumentTool {
    pub fn new(analyzer: Arc<dyn DocumentAnalyzer>) -> Self {
        Self { analyzer }
    }
}

fn is_remote(path_or_url: &str) -> bool {
    url::Url::parse(path_or_url).is_ok_and(|u| matches!(u.scheme(), "http" | "https"))
}

#[async_trait]
impl Tool for AnalyzeDocumentTool {
    fn name(&self) -> &str {
        "analyze_document"
    }

    fn description(&self) -> &str {
        "Analyze a PDF, image, chart or other document from a URL or local path, \
         optionally answering a specific question about it."
    }

    fn schema(&self) -> serde_json::Value {
        serde_json::json!({
            "type": "object",
            "properties": {
                "path_or_url": {
                    "type": "string",
                    "description": "http(s) URL or local file path of the document"
                },
                "question": {
                    "type": "string",
                    "description": "Optional question about the document"
                }
            },
            "required": ["path_or_url"]
        })
    }

    async fn execute(&self, args: serde_json::Value) -> Result<ToolResult> {
        let target = required_str(&args, "path_or_url")?.trim();
        let question = optional_str(&args, "question");

        let (source, mime_type) = if is_remote(target) {
            (DocumentSource::Url(target.to_owned()), None)
        } else {
            let path = Path::new(target);
            let mime = mime_for_path(path);
            match tokio::fs::read(path).await {
                Ok(data) => (
                    DocumentSource::Bytes {
                        data,
                        mime: mime.to_owned(),
                    },
                    Some(mime),
                ),
                Err(e) => {
                    let error = format!("cannot read '{target}': {e}");
                    tracing::warn!(source = target, error = %error, "document read failed");
                    return Ok(ToolResult::failure(error, String::new()));
                }
            }
        };

        tracing::debug!(source = %source.describe(), "analyzing document");
        match self.analyzer.analyze(source, question).await {
            Ok(analysis) => Ok(ToolResult::success(to_json(&Analysis {
                source: target,
                mime_type,
                analysis,
            })?)),
            Err(e) => {
                tracing::warn!(source = target, error = %e, "document analysis failed");
                Ok(ToolResult::failure(e.message().to_owned(), String::new()))
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::SiftError;
    use serde_json::json;
    use std::sync::Mutex;

    /// Records what it was asked and answers with a fixed text.
    #[derive(Default)]
    struct RecordingAnalyzer {
        seen: Mutex<Vec<(DocumentSource, Option<String>)>>,
    }

    #[async_trait]
    impl DocumentAnalyzer for RecordingAnalyzer {
        async fn analyze(&self, source: DocumentSource, question: Option<&str>) -> Result<String> {
            self.seen
                .lock()
                .unwrap_or_else(|e| e.into_inner())
                .push((source, question.map(str::to_owned)));
            Ok("Figure 2 shows rising output.".into())
        }
    }

    struct FailingAnalyzer;

    #[async_trait]
    impl DocumentAnalyzer for FailingAnalyzer {
        async fn analyze(&self, _: DocumentSource, _: Option<&str>) -> Result<String> {
            Err(SiftError::Document("model quota exhausted".into()))
        }
    }

    #[test]
    fn remote_detection() {
        assert!(is_remote("https://example.com/a.pdf"));
        assert!(is_remote("http://example.com"));
        assert!(!is_remote("/tmp/a.pdf"));
        assert!(!is_remote("report.pdf"));
        assert!(!is_remote("file:///tmp/a.pdf"));
    }

    #[tokio::test]
    async fn urls_are_passed_through() {
        let analyzer = Arc::new(RecordingAnalyzer::default());
        let tool = AnalyzeDocumentTool::new(analyzer.clone());

        let result = tool
            .execute(json!({"path_or_url": "https://example.com/r.pdf", "question": "output?"}))
            .await
            .expect("valid args");
        assert!(result.success);
        let body: serde_json::Value = serde_json::from_str(&result.content).expect("json");
        assert_eq!(body["analysis"], "Figure 2 shows rising output.");
        assert_eq!(body["mime_type"], serde_json::Value::Null);

        let seen = analyzer.seen.lock().unwrap_or_else(|e| e.into_inner());
        assert_eq!(
            seen[0],
            (
                DocumentSource::Url("https://example.com/r.pdf".into()),
                Some("output?".into())
            )
        );
    }

    #[tokio::test]
    async fn local_files_are_read_with_mime() {
        let dir = tempfile::tempdir().expect("tempdir");
        let path = dir.path().join("chart.png");
        std::fs::write(&path, [1u8, 2, 3]).expect("write");

        let analyzer = Arc::new(RecordingAnalyzer::default());
        let tool = AnalyzeDocumentTool::new(analyzer.clone());
        let result = tool
            .execute(json!({"path_or_url": path.to_string_lossy()}))
            .await
            .expect("valid args");
        assert!(result.success);

        let seen = analyzer.seen.lock().unwrap_or_else(|e| e.into_inner());
        assert_eq!(
            seen[0].0,
            DocumentSource::Bytes {
                data: vec![1, 2, 3],
                mime: "image/png".into()
            }
        );
        assert!(seen[0].1.is_none());
    }

    #[tokio::test]
    async fn missing_file_is_a_failed_result() {
        let tool = AnalyzeDocumentTool::new(Arc::new(RecordingAnalyzer::default()));
        let result = tool
            .execute(json!({"path_or_url": "/nonexistent/report.pdf"}))
            .await
            .expect("read failures are results");
        assert!(!result.success);
        assert!(result.error.as_deref().is_some_and(|e| e.contains("cannot read")));
    }

    #[tokio::test]
    async fn analyzer_errors_are_failed_results() {
        let tool = AnalyzeDocumentTool::new(Arc::new(FailingAnalyzer));
        let result = tool
            .execute(json!({"path_or_url": "https://example.com/r.pdf"}))
            .await
            .expect("analyzer failures are results");
        assert!(!result.success);
        assert_eq!(result.error.as_deref(), Some("model quota exhausted"));
    }
}
