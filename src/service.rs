//! Request routing between the search source, the session store and the
//! citation formatter.
//!
//! Both the HTTP API and the MCP tools delegate to one [`CitationService`],
//! so every transport shares the same identifier namespace.

use std::sync::Arc;

use crate::error::CitationError;
use crate::models::{
    CitationResponse, HealthStatus, MetadataRecord, SearchHit, SearchQuery, SearchResponse,
};
use crate::session::{SessionStore, ShortId};
use crate::sources::Source;
use crate::utils::{format_citation, CitationStyle};

/// Search and cite operations over a shared session store
#[derive(Debug, Clone)]
pub struct CitationService {
    source: Arc<dyn Source>,
    store: Arc<SessionStore>,
}

impl CitationService {
    pub fn new(source: Arc<dyn Source>, store: Arc<SessionStore>) -> Self {
        Self { source, store }
    }

    pub fn store(&self) -> &Arc<SessionStore> {
        &self.store
    }

    /// Name of the configured search source
    pub fn source_name(&self) -> &str {
        self.source.name()
    }

    /// Run a search and tag every result with its session identifier.
    ///
    /// The source is queried without holding the store lock; results keep the
    /// provider's order.
    pub async fn search(&self, query: &SearchQuery) -> Result<SearchResponse, CitationError> {
        let text = query.query.trim();
        if text.is_empty() {
            return Err(CitationError::InvalidRequest(
                "search query must not be empty".to_string(),
            ));
        }

        let records = self.source.search(query).await.map_err(|e| {
            tracing::warn!(source = self.source.id(), error = %e, "Search failed");
            CitationError::from(e)
        })?;

        let hits: Vec<SearchHit> = self
            .store
            .register(records)
            .into_iter()
            .map(|(id, record)| SearchHit::new(id, &record))
            .collect();

        tracing::info!(query = %text, results = hits.len(), "Search served");
        Ok(SearchResponse::new(text, hits))
    }

    /// Render a citation for a previously registered paper
    pub fn cite(&self, id: &str, style: &str) -> Result<CitationResponse, CitationError> {
        let style: CitationStyle = style.parse()?;
        let id = ShortId::from(id);
        let record = self.store.resolve(&id)?;

        tracing::debug!(id = %id, style = style.name(), "Formatting citation");
        Ok(CitationResponse {
            citation: format_citation(&record, style),
            style: style.name().to_string(),
            external_id: record.external_id.clone(),
            id: Some(id),
        })
    }

    /// Stored metadata for a short identifier
    pub fn paper(&self, id: &str) -> Result<Arc<MetadataRecord>, CitationError> {
        self.store.resolve(&ShortId::from(id))
    }

    /// Format a record supplied by the caller without touching the store
    pub fn format_record(
        record: &MetadataRecord,
        style: &str,
    ) -> Result<CitationResponse, CitationError> {
        let style: CitationStyle = style.parse()?;
        if record.title.trim().is_empty() {
            return Err(CitationError::InvalidRequest(
                "record title must not be empty".to_string(),
            ));
        }

        Ok(CitationResponse {
            id: None,
            style: style.name().to_string(),
            citation: format_citation(record, style),
            external_id: record.external_id.clone(),
        })
    }

    pub fn health(&self) -> HealthStatus {
        HealthStatus {
            status: "ok".to_string(),
            version: crate::VERSION.to_string(),
            entries: self.store.len(),
        }
    }
}
