//! Search source plugins.
//!
//! A [`Source`] turns a free-text query into a list of [`MetadataRecord`]s in
//! the provider's relevance order. Sources know nothing about session
//! identifiers or citation styles; the [`CitationService`] registers whatever
//! they return.
//!
//! Available sources:
//!
//! - [`ArxivSource`] - arXiv Atom API
//! - [`MockSource`] - canned responses for tests
//!
//! A query that matches nothing is `Ok(vec![])`, never an error. Transport and
//! provider failures are reported as [`SourceError`] and surface to clients
//! as `SearchUnavailable`.
//!
//! [`CitationService`]: crate::service::CitationService

mod arxiv;
pub mod mock;

pub use arxiv::{ArxivSource, ARXIV_API_URL};
pub use mock::MockSource;

use crate::models::{MetadataRecord, SearchQuery};
use async_trait::async_trait;

/// The Source trait defines the interface for all search providers.
#[async_trait]
pub trait Source: Send + Sync + std::fmt::Debug {
    /// Unique identifier for this source (e.g., "arxiv")
    fn id(&self) -> &str;

    /// Human-readable name of this source
    fn name(&self) -> &str;

    /// Search for papers matching the query
    async fn search(&self, query: &SearchQuery) -> Result<Vec<MetadataRecord>, SourceError>;
}

/// Errors that can occur when interacting with a source
#[derive(Debug, thiserror::Error)]
pub enum SourceError {
    /// Network or HTTP transport error
    #[error("Network error: {0}")]
    Network(String),

    /// The provider answered with a non-success status
    #[error("HTTP status {0}")]
    HttpStatus(u16),

    /// Parsing error (XML, JSON, ...)
    #[error("Parse error: {0}")]
    Parse(String),

    /// Invalid request parameters
    #[error("Invalid request: {0}")]
    InvalidRequest(String),

    /// Rate limit exceeded
    #[error("Rate limit exceeded")]
    RateLimit,

    /// API error reported in the response body
    #[error("API error: {0}")]
    Api(String),
}

impl From<reqwest::Error> for SourceError {
    fn from(err: reqwest::Error) -> Self {
        SourceError::Network(err.to_string())
    }
}

impl From<serde_json::Error> for SourceError {
    fn from(err: serde_json::Error) -> Self {
        SourceError::Parse(format!("JSON: {}", err))
    }
}
