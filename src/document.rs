//! Document understanding collaborator.
//!
//! Reading PDFs and images is delegated to an external service.
//! [`DocumentAnalyzer`] is the call contract; [`RemoteDocumentAnalyzer`]
//! speaks to an HTTP service and is used when `[tools] document_endpoint`
//! is configured.
//!
//! # Wire format
//!
//! - URL sources: `POST {endpoint}` with JSON `{"url": ..., "question": ...}`
//! - Byte sources: `POST {endpoint}?question=...` with the raw bytes as the
//!   body and the document's MIME type as `Content-Type`
//!
//! The reply is either JSON with a `text` field or plain text, used verbatim.

use std::path::Path;
use std::time::Duration;

use async_trait::async_trait;
use serde::Deserialize;
use url::Url;

use crate::error::{Result, SiftError};

/// A document to analyze.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DocumentSource {
    /// A document the service downloads itself.
    Url(String),
    /// Document bytes read locally.
    Bytes { data: Vec<u8>, mime: String },
}

impl DocumentSource {
    /// Short description for logs: the URL, or MIME type and size.
    pub fn describe(&self) -> String {
        match self {
            Self::Url(url) => url.clone(),
            Self::Bytes { data, mime } => format!("{mime} ({} bytes)", data.len()),
        }
    }
}

/// Something that can read a document and answer a question about it.
#[async_trait]
pub trait DocumentAnalyzer: Send + Sync {
    /// Analyze `source`, answering `question` when given, else describing
    /// the document. The returned text is used verbatim.
    ///
    /// # Errors
    ///
    /// Returns [`SiftError::Document`] when the document cannot be analyzed.
    async fn analyze(&self, source: DocumentSource, question: Option<&str>) -> Result<String>;
}

/// MIME type for a local file, from its extension.
pub fn mime_for_path(path: &Path) -> &'static str {
    let ext = path
        .extension()
        .and_then(|e| e.to_str())
        .map(str::to_ascii_lowercase)
        .unwrap_or_default();
    match ext.as_str() {
        "pdf" => "application/pdf",
        "png" => "image/png",
        "jpg" | "jpeg" => "image/jpeg",
        "gif" => "image/gif",
        "webp" => "image/webp",
        "txt" | "md" => "text/plain",
        "html" | "htm" => "text/html",
        "csv" => "text/csv",
        _ => "application/octet-stream",
    }
}

#[derive(Deserialize)]
struct AnalysisReply {
    text: String,
}

/// [`DocumentAnalyzer`] backed by an HTTP document-understanding service.
pub struct RemoteDocumentAnalyzer {
    client: reqwest::Client,
    endpoint: Url,
}

impl RemoteDocumentAnalyzer {
    /// # Errors
    ///
    /// Returns [`SiftError::Config`] if `endpoint` is not an http(s) URL or
    /// the HTTP client cannot be built.
    pub fn new(endpoint: &str, timeout: Duration) -> Result<Self> {
        let endpoint = Url::parse(endpoint)
            .map_err(|e| SiftError::Config(format!("invalid document_endpoint: {e}")))?;
        if !matches!(endpoint.scheme(), "http" | "https") {
            return Err(SiftError::Config(
                "document_endpoint must be an http or https URL".into(),
            ));
        }
        let client = reqwest::Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| SiftError::Config(format!("failed to build HTTP client: {e}")))?;
        Ok(Self { client, endpoint })
    }
}

#[async_trait]
impl DocumentAnalyzer for RemoteDocumentAnalyzer {
    async fn analyze(&self, source: DocumentSource, question: Option<&str>) -> Result<String> {
        let request = match source {
            DocumentSource::Url(url) => self.client.post(self.endpoint.clone()).json(
                &serde_json::json!({ "url": url, "question": question }),
            ),
            DocumentSource::Bytes { data, mime } => {
                let mut endpoint = self.endpoint.clone();
                if let Some(q) = question {
                    endpoint.query_pairs_mut().append_pair("question", q);
                }
                self.client
                    .post(endpoint)
                    .header(reqwest::header::CONTENT_TYPE, mime)
                    .body(data)
            }
        };

        let response = request
            .send()
            .await
            .map_err(|e| SiftError::Document(format!("document service unreachable: {e}")))?;
        let status = response.status();
        let body = response
            .text()
            .await
            .map_err(|e| SiftError::Document(format!("failed to read document reply: {e}")))?;

        if !status.is_success() {
            let snippet: String = body.chars().take(200).collect();
            return Err(SiftError::Document(format!(
                "document service returned {}: {snippet}",
                status.as_u16()
            )));
        }

        Ok(match serde_json::from_str::<AnalysisReply>(&body) {
            Ok(reply) => reply.text,
            Err(_) => body,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use wiremock::matchers::{body_json, header, method, query_param};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn analyzer(server: &MockServer) -> RemoteDocumentAnalyzer {
        RemoteDocumentAnalyzer::new(&server.uri(), Duration::from_secs(5)).expect("valid endpoint")
    }

    #[test]
    fn mime_types_follow_extension() {
        assert_eq!(mime_for_path(Path::new("report.PDF")), "application/pdf");
        assert_eq!(mime_for_path(Path::new("chart.jpeg")), "image/jpeg");
        assert_eq!(mime_for_path(Path::new("notes.txt")), "text/plain");
        assert_eq!(mime_for_path(Path::new("blob")), "application/octet-stream");
    }

    #[test]
    fn endpoint_must_be_http() {
        let err = RemoteDocumentAnalyzer::new("ftp://docs.local", Duration::from_secs(1))
            .err()
            .expect("bad scheme");
        assert_eq!(err.code(), "CONFIG_INVALID");
        assert!(RemoteDocumentAnalyzer::new("not a url", Duration::from_secs(1)).is_err());
    }

    #[test]
    fn describe_sources() {
        assert_eq!(
            DocumentSource::Url("https://example.com/a.pdf".into()).describe(),
            "https://example.com/a.pdf"
        );
        let bytes = DocumentSource::Bytes {
            data: vec![0; 4],
            mime: "image/png".into(),
        };
        assert_eq!(bytes.describe(), "image/png (4 bytes)");
    }

    #[tokio::test]
    async fn url_sources_are_posted_as_json() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(body_json(serde_json::json!({
                "url": "https://example.com/report.pdf",
                "question": "What was revenue?"
            })))
            .respond_with(
                ResponseTemplate::new(200).set_body_json(serde_json::json!({"text": "Revenue was 4.2bn."})),
            )
            .expect(1)
            .mount(&server)
            .await;

        let text = analyzer(&server)
            .analyze(
                DocumentSource::Url("https://example.com/report.pdf".into()),
                Some("What was revenue?"),
            )
            .await
            .expect("analysis");
        assert_eq!(text, "Revenue was 4.2bn.");
    }

    #[tokio::test]
    async fn byte_sources_carry_mime_and_question() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(header("content-type", "image/png"))
            .and(query_param("question", "trend?"))
            .respond_with(ResponseTemplate::new(200).set_body_string("Upward trend since 2020."))
            .expect(1)
            .mount(&server)
            .await;

        let text = analyzer(&server)
            .analyze(
                DocumentSource::Bytes {
                    data: vec![0x89, b'P', b'N', b'G'],
                    mime: "image/png".into(),
                },
                Some("trend?"),
            )
            .await
            .expect("analysis");
        assert_eq!(text, "Upward trend since 2020.");
    }

    #[tokio::test]
    async fn service_errors_become_document_errors() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .respond_with(ResponseTemplate::new(422).set_body_string("unsupported format"))
            .mount(&server)
            .await;

        let err = analyzer(&server)
            .analyze(DocumentSource::Url("https://example.com/x".into()), None)
            .await
            .err()
            .expect("service error");
        assert_eq!(err.code(), "DOCUMENT_FAILED");
        assert!(err.message().contains("422"));
        assert!(err.message().contains("unsupported format"));
    }
}
