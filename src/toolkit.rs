//! The process-wide set of tools.
//!
//! A [`Toolkit`] is built once from configuration. It owns the retrieval
//! pipeline (one pooled transport and the per-API rate limiters) and hands
//! out tools that share it.

use std::sync::Arc;
use std::time::Duration;

use sift_search::Retrieval;

use crate::config::SiftConfig;
use crate::document::{DocumentAnalyzer, RemoteDocumentAnalyzer};
use crate::error::Result;
use crate::tools::{
    AnalyzeDocumentTool, ComposeAnswerTool, ExtractQuotesTool, FetchUrlTool, ToolRegistry,
    WebSearchTool,
};

/// Shared retrieval state plus the tools built on it.
pub struct Toolkit {
    retrieval: Arc<Retrieval>,
    config: SiftConfig,
    analyzer: Option<Arc<dyn DocumentAnalyzer>>,
}

impl Toolkit {
    /// Build the toolkit from `config`.
    ///
    /// # Errors
    ///
    /// Returns [`crate::SiftError::Config`] if the configuration is invalid.
    pub fn from_config(config: SiftConfig) -> Result<Self> {
        let search_config = config.to_search_config()?;
        let mut retrieval = Retrieval::new(&search_config)?;
        retrieval.fetcher = retrieval.fetcher.with_quote_options(config.quotes);

        let analyzer = match config.tools.document_endpoint.as_deref() {
            Some(endpoint) => {
                let timeout = Duration::from_secs(config.http.timeout_seconds);
                let remote = RemoteDocumentAnalyzer::new(endpoint, timeout)?;
                Some(Arc::new(remote) as Arc<dyn DocumentAnalyzer>)
            }
            None => None,
        };

        tracing::info!(
            search_ready = search_config.api_key.is_some(),
            documents_ready = analyzer.is_some(),
            "toolkit ready"
        );

        Ok(Self {
            retrieval: Arc::new(retrieval),
            config,
            analyzer,
        })
    }

    /// Use `analyzer` for `analyze_document`, replacing any configured one.
    pub fn with_document_analyzer(mut self, analyzer: Arc<dyn DocumentAnalyzer>) -> Self {
        self.analyzer = Some(analyzer);
        self
    }

    /// The retrieval pipeline shared by the tools.
    pub fn retrieval(&self) -> &Arc<Retrieval> {
        &self.retrieval
    }

    pub fn config(&self) -> &SiftConfig {
        &self.config
    }

    /// A registry holding every available tool. `analyze_document` is
    /// included only when a document analyzer is configured.
    pub fn registry(&self) -> ToolRegistry {
        let mut registry = ToolRegistry::new(self.config.tools.max_output_bytes);
        registry.register(Arc::new(WebSearchTool::new(Arc::clone(&self.retrieval))));
        registry.register(Arc::new(FetchUrlTool::new(
            Arc::clone(&self.retrieval),
            self.config.tools.max_page_chars,
        )));
        registry.register(Arc::new(ExtractQuotesTool::new(self.config.quotes)));
        registry.register(Arc::new(ComposeAnswerTool));
        if let Some(analyzer) = &self.analyzer {
            registry.register(Arc::new(AnalyzeDocumentTool::new(Arc::clone(analyzer))));
        }
        registry
    }

    /// Stop the shared transport. In-flight requests finish; new ones fail.
    pub fn shutdown(&self) {
        self.retrieval.shutdown();
    }
}
