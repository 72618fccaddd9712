//! Search provider implementations.
//!
//! Each module provides a struct implementing [`crate::provider::SearchProvider`].

pub mod serper;

pub use serper::SerperProvider;
