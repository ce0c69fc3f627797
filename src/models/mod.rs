//! Core data models for paper metadata and search/citation exchanges.

mod csl;
mod paper;
mod search;

pub use csl::{CitationInput, CslDate, CslItem, CslName};
pub use paper::{MetadataRecord, PublicationKind, RecordBuilder};
pub use search::{
    CitationResponse, CiteRequest, HealthStatus, SearchHit, SearchQuery, SearchResponse,
    DEFAULT_MAX_RESULTS, MAX_RESULTS_LIMIT,
};
