//! Mock source for testing purposes.

use async_trait::async_trait;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Mutex, PoisonError};

use crate::models::{MetadataRecord, SearchQuery};
use crate::sources::{Source, SourceError};

#[derive(Debug, Default)]
enum MockResponse {
    #[default]
    Empty,
    Records(Vec<MetadataRecord>),
    Failure(String),
}

/// A mock source for testing that returns predefined responses.
#[derive(Debug, Default)]
pub struct MockSource {
    response: Mutex<MockResponse>,
    calls: AtomicUsize,
}

impl MockSource {
    /// Create a new mock source that matches nothing.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a mock source returning the given records.
    pub fn with_records(records: Vec<MetadataRecord>) -> Self {
        let source = Self::new();
        source.set_search_response(records);
        source
    }

    /// Set the records to return.
    pub fn set_search_response(&self, records: Vec<MetadataRecord>) {
        *self.response.lock().unwrap_or_else(PoisonError::into_inner) =
            MockResponse::Records(records);
    }

    /// Make every search fail as if the provider were unreachable.
    pub fn fail_with(&self, message: impl Into<String>) {
        *self.response.lock().unwrap_or_else(PoisonError::into_inner) =
            MockResponse::Failure(message.into());
    }

    /// Clear the configured response.
    pub fn clear_response(&self) {
        *self.response.lock().unwrap_or_else(PoisonError::into_inner) = MockResponse::Empty;
    }

    /// Number of searches performed so far.
    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl Source for MockSource {
    fn id(&self) -> &str {
        "mock"
    }

    fn name(&self) -> &str {
        "Mock Source"
    }

    async fn search(&self, query: &SearchQuery) -> Result<Vec<MetadataRecord>, SourceError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        let guard = self.response.lock().unwrap_or_else(PoisonError::into_inner);
        match &*guard {
            MockResponse::Empty => Ok(Vec::new()),
            MockResponse::Records(records) => Ok(records
                .iter()
                .take(query.effective_max_results())
                .cloned()
                .collect()),
            MockResponse::Failure(message) => Err(SourceError::Network(message.clone())),
        }
    }
}
