//! Utility modules supporting the citation service.
//!
//! - [`HttpClient`]: shared reqwest client with sensible defaults
//! - [`RetryConfig`] / [`with_retry`]: exponential backoff for provider calls
//! - [`CitationStyle`] / [`format_citation`]: citation formatting
//! - [`truncate_with_ellipsis`]: width-aware truncation for terminal output
//!
//! # Formatting a citation
//!
//! ```rust
//! use papervista::models::MetadataRecord;
//! use papervista::utils::{format_citation, CitationStyle};
//!
//! let record = MetadataRecord::builder("1706.03762", "Attention Is All You Need")
//!     .authors(["Ashish Vaswani"])
//!     .published_year(2017)
//!     .build();
//! let citation = format_citation(&record, CitationStyle::Apa);
//! assert_eq!(citation, "Vaswani, A. (2017). Attention Is All You Need.");
//! ```

mod cite;
mod display;
mod http;
mod retry;

pub use cite::{format_citation, format_named, CitationStyle};
pub use display::{format_authors, hit_table_columns, terminal_width, truncate_with_ellipsis};
pub use http::{HttpClient, DEFAULT_TIMEOUT};
pub use retry::{api_retry_config, with_retry, RetryConfig, TransientError};
