//! Errors surfaced to callers of search and cite.

use crate::sources::SourceError;

/// Request-level failures of the citation service.
///
/// Every variant is local to the request that produced it; none of them
/// leaves the session store in a different state.
#[derive(Debug, thiserror::Error)]
pub enum CitationError {
    /// The external provider was unreachable or returned an error
    #[error("Search unavailable: {0}")]
    SearchUnavailable(String),

    /// The short identifier was never registered in this session
    #[error("Paper '{0}' not found in this session; search again to obtain an identifier")]
    NotFound(String),

    /// The requested style is not one the formatter implements
    #[error("Unsupported citation style '{style}' (supported: {supported})")]
    UnsupportedStyle { style: String, supported: String },

    /// Malformed request parameters
    #[error("Invalid request: {0}")]
    InvalidRequest(String),
}

impl CitationError {
    /// Stable machine-readable name of the error kind
    pub fn kind(&self) -> &'static str {
        match self {
            CitationError::SearchUnavailable(_) => "search_unavailable",
            CitationError::NotFound(_) => "not_found",
            CitationError::UnsupportedStyle { .. } => "unsupported_style",
            CitationError::InvalidRequest(_) => "invalid_request",
        }
    }
}

impl From<SourceError> for CitationError {
    fn from(err: SourceError) -> Self {
        match err {
            SourceError::InvalidRequest(msg) => CitationError::InvalidRequest(msg),
            other => CitationError::SearchUnavailable(other.to_string()),
        }
    }
}
