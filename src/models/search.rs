//! Search and citation request/response models shared by the HTTP service,
//! the MCP tools and the CLI client.

use serde::{Deserialize, Serialize};

use super::MetadataRecord;
use crate::session::ShortId;

/// Default number of results requested from a source
pub const DEFAULT_MAX_RESULTS: usize = 10;

/// Upper bound on results per search
pub const MAX_RESULTS_LIMIT: usize = 100;

/// Search query parameters
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SearchQuery {
    /// Free-text query string
    pub query: String,

    /// Maximum number of results to return
    #[serde(default = "default_max_results")]
    pub max_results: usize,
}

fn default_max_results() -> usize {
    DEFAULT_MAX_RESULTS
}

impl SearchQuery {
    /// Create a new search query
    pub fn new(query: impl Into<String>) -> Self {
        Self {
            query: query.into(),
            max_results: DEFAULT_MAX_RESULTS,
        }
    }

    /// Set maximum results, clamped to `1..=MAX_RESULTS_LIMIT`
    pub fn max_results(mut self, max: usize) -> Self {
        self.max_results = max.clamp(1, MAX_RESULTS_LIMIT);
        self
    }

    /// The result limit actually sent to a source
    pub fn effective_max_results(&self) -> usize {
        self.max_results.clamp(1, MAX_RESULTS_LIMIT)
    }
}

/// One search result tagged with its session identifier
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SearchHit {
    pub id: ShortId,
    pub title: String,
    pub authors: Vec<String>,
    pub year: Option<i32>,
    pub external_id: String,
}

impl SearchHit {
    /// Summarize a stored record under its short identifier
    pub fn new(id: ShortId, record: &MetadataRecord) -> Self {
        Self {
            id,
            title: record.title.clone(),
            authors: record.authors.clone(),
            year: record.year(),
            external_id: record.external_id.clone(),
        }
    }
}

/// Search results in provider relevance order
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SearchResponse {
    pub query: String,
    pub count: usize,
    pub results: Vec<SearchHit>,
}

impl SearchResponse {
    pub fn new(query: impl Into<String>, results: Vec<SearchHit>) -> Self {
        Self {
            query: query.into(),
            count: results.len(),
            results,
        }
    }
}

/// Citation request for a previously seen paper
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CiteRequest {
    /// Short identifier from an earlier search
    pub id: String,

    /// Style name; defaults to APA
    #[serde(default)]
    pub style: Option<String>,
}

/// A rendered citation
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CitationResponse {
    /// Short identifier, absent for ad-hoc records
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<ShortId>,
    /// Style name, e.g. "apa"
    pub style: String,
    pub citation: String,
    pub external_id: String,
}

/// Service health, reported once the listener is bound
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HealthStatus {
    pub status: String,
    pub version: String,
    /// Number of session entries held
    pub entries: usize,
}
