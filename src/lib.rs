//! # Papervista
//!
//! Search an academic paper index, get back short session identifiers, and
//! turn those identifiers into formatted citations later without querying
//! the provider again.
//!
//! ## Architecture
//!
//! - [`models`]: metadata records and request/response types
//! - [`sources`]: search providers behind the [`Source`] trait
//! - [`session`]: the [`SessionStore`] mapping short ids to records
//! - [`utils`]: citation formatting, HTTP client and retry helpers
//! - [`service`]: [`CitationService`], routing search and cite requests
//! - [`api`]: axum HTTP API over the service
//! - [`mcp`]: MCP tools over the service
//! - [`client`]: HTTP client used by the CLI
//! - [`config`]: configuration management
//!
//! ```rust
//! use std::sync::Arc;
//! use papervista::{CitationService, SessionStore};
//! use papervista::models::{MetadataRecord, SearchQuery};
//! use papervista::sources::MockSource;
//!
//! # #[tokio::main]
//! # async fn main() -> Result<(), papervista::CitationError> {
//! let source = MockSource::with_records(vec![
//!     MetadataRecord::builder("1706.03762", "Attention Is All You Need")
//!         .authors(["Ashish Vaswani", "Noam Shazeer"])
//!         .published_year(2017)
//!         .build(),
//! ]);
//! let service = CitationService::new(Arc::new(source), Arc::new(SessionStore::new()));
//!
//! let results = service.search(&SearchQuery::new("attention")).await?;
//! let citation = service.cite(results.results[0].id.as_str(), "apa")?;
//! assert_eq!(
//!     citation.citation,
//!     "Vaswani, A. & Shazeer, N. (2017). Attention Is All You Need."
//! );
//! # Ok(())
//! # }
//! ```

pub mod api;
pub mod client;
pub mod config;
pub mod error;
pub mod mcp;
pub mod models;
pub mod service;
pub mod session;
pub mod sources;
pub mod ui;
pub mod utils;

// Re-export commonly used types
pub use error::CitationError;
pub use models::MetadataRecord;
pub use service::CitationService;
pub use session::{IdStrategy, SessionStore, ShortId};
pub use sources::Source;

/// Library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
