//! Sift: citation-grade web research tools.
//!
//! This crate is the thin layer an external reasoning component calls.
//! The retrieval work lives in [`sift_search`]; here it is wrapped as
//! JSON-in, JSON-out tools:
//!
//! - **web_search**: provider search ranked by source trust and recency
//! - **fetch_url**: main-content extraction with attributed quotes
//! - **extract_quotes**: verbatim, citation-sized sentences from text
//! - **compose_answer**: the final answer normalized for citation
//! - **analyze_document**: PDFs and images via an external service
//!
//! A [`Toolkit`] is built once per process from a [`SiftConfig`] and
//! shares one HTTP transport and rate limiter set between all tools.

pub mod config;
pub mod document;
pub mod error;
pub mod toolkit;
pub mod tools;

pub use config::SiftConfig;
pub use document::{DocumentAnalyzer, DocumentSource, RemoteDocumentAnalyzer};
pub use error::{Result, SiftError};
pub use toolkit::Toolkit;
pub use tools::{Tool, ToolRegistry, ToolResult};
