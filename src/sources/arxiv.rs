//! arXiv search source.

use async_trait::async_trait;
use feed_rs::parser;

use crate::models::{MetadataRecord, PublicationKind, SearchQuery};
use crate::sources::{Source, SourceError};
use crate::utils::{api_retry_config, with_retry, HttpClient, RetryConfig};

/// Base URL for arXiv API
pub const ARXIV_API_URL: &str = "http://export.arxiv.org/api/query";
/// Base URL for arXiv abstract pages
const ARXIV_ABS_URL: &str = "https://arxiv.org/abs";
/// Venue label used for arXiv records
const ARXIV_VENUE: &str = "arXiv";

/// arXiv research source
#[derive(Debug, Clone)]
pub struct ArxivSource {
    client: HttpClient,
    base_url: String,
    retry: RetryConfig,
}

impl ArxivSource {
    /// Create a new arXiv source against the public API
    pub fn new() -> Result<Self, SourceError> {
        Ok(Self::with_client(HttpClient::new()?))
    }

    /// Create with a custom HTTP client
    pub fn with_client(client: HttpClient) -> Self {
        Self {
            client,
            base_url: ARXIV_API_URL.to_string(),
            retry: api_retry_config(),
        }
    }

    /// Point the source at a different API endpoint (mirrors, tests)
    pub fn base_url(mut self, url: impl Into<String>) -> Self {
        self.base_url = url.into();
        self
    }

    /// Override the retry policy
    pub fn retry(mut self, retry: RetryConfig) -> Self {
        self.retry = retry;
        self
    }

    /// Build the `search_query` parameter: every term must match somewhere
    fn build_search_query(query: &SearchQuery) -> String {
        query
            .query
            .split_whitespace()
            .map(|term| format!("all:{}", term))
            .collect::<Vec<_>>()
            .join(" AND ")
    }

    fn search_url(&self, query: &SearchQuery) -> String {
        format!(
            "{}?search_query={}&start=0&max_results={}&sortBy=relevance&sortOrder=descending",
            self.base_url,
            urlencoding::encode(&Self::build_search_query(query)),
            query.effective_max_results()
        )
    }

    /// Strip the URL prefix and version suffix from an Atom entry id.
    ///
    /// "http://arxiv.org/abs/1706.03762v5" becomes "1706.03762" and
    /// "http://arxiv.org/abs/hep-th/9901001v1" becomes "hep-th/9901001".
    pub fn accession_number(entry_id: &str) -> Option<String> {
        let id = entry_id
            .split_once("/abs/")
            .map(|(_, rest)| rest)
            .unwrap_or(entry_id)
            .trim();

        let id = match id.rfind('v') {
            Some(pos) if pos + 1 < id.len() && id[pos + 1..].bytes().all(|b| b.is_ascii_digit()) => {
                &id[..pos]
            }
            _ => id,
        };

        (!id.is_empty()).then(|| id.to_string())
    }

    /// Parse arXiv Atom feed entry into a record
    fn parse_entry(entry: &feed_rs::model::Entry) -> Result<MetadataRecord, SourceError> {
        let external_id = Self::accession_number(&entry.id)
            .ok_or_else(|| SourceError::Parse("Missing paper ID".to_string()))?;

        let title = entry
            .title
            .as_ref()
            .map(|t| collapse_whitespace(&t.content))
            .unwrap_or_default();

        let mut builder = MetadataRecord::builder(external_id.clone(), title)
            .authors(entry.authors.iter().map(|a| collapse_whitespace(&a.name)))
            .venue(ARXIV_VENUE)
            .kind(PublicationKind::Preprint)
            .url(format!("{}/{}", ARXIV_ABS_URL, external_id));

        if let Some(published) = entry.published.or(entry.updated) {
            builder = builder.published(published.date_naive());
        }

        if let Some(summary) = entry.summary.as_ref() {
            let text = collapse_whitespace(&summary.content);
            if !text.is_empty() {
                builder = builder.abstract_text(text);
            }
        }

        // arXiv exposes the DOI as <link title="doi" href="http://dx.doi.org/...">
        let doi = entry
            .links
            .iter()
            .find(|link| link.title.as_deref() == Some("doi"))
            .and_then(|link| doi_from_url(&link.href));
        if let Some(doi) = doi {
            builder = builder.doi(doi);
        }

        Ok(builder.build())
    }

    /// arXiv reports malformed queries as a single entry under /api/errors
    fn api_error(feed: &feed_rs::model::Feed) -> Option<String> {
        feed.entries
            .iter()
            .find(|entry| entry.id.contains("/api/errors"))
            .map(|entry| {
                entry
                    .summary
                    .as_ref()
                    .map(|s| collapse_whitespace(&s.content))
                    .unwrap_or_else(|| "unknown arXiv API error".to_string())
            })
    }
}

fn collapse_whitespace(text: &str) -> String {
    text.split_whitespace().collect::<Vec<_>>().join(" ")
}

fn doi_from_url(href: &str) -> Option<String> {
    ["https://doi.org/", "http://doi.org/", "http://dx.doi.org/", "https://dx.doi.org/"]
        .iter()
        .find_map(|prefix| href.strip_prefix(prefix))
        .filter(|doi| !doi.is_empty())
        .map(str::to_string)
}

#[async_trait]
impl Source for ArxivSource {
    fn id(&self) -> &str {
        "arxiv"
    }

    fn name(&self) -> &str {
        "arXiv"
    }

    async fn search(&self, query: &SearchQuery) -> Result<Vec<MetadataRecord>, SourceError> {
        if query.query.trim().is_empty() {
            return Err(SourceError::InvalidRequest("Empty search query".to_string()));
        }

        let url = self.search_url(query);
        tracing::debug!(url = %url, "Querying arXiv");

        let feed = with_retry(self.retry, || {
            let client = self.client.clone();
            let url = url.clone();
            async move {
                let response = client
                    .get(&url)
                    .header("Accept", "application/atom+xml")
                    .send()
                    .await
                    .map_err(|e| {
                        SourceError::Network(format!("Failed to fetch arXiv results: {}", e))
                    })?;

                let status = response.status();
                if status == reqwest::StatusCode::TOO_MANY_REQUESTS {
                    return Err(SourceError::RateLimit);
                }
                if !status.is_success() {
                    return Err(SourceError::HttpStatus(status.as_u16()));
                }

                let bytes = response
                    .bytes()
                    .await
                    .map_err(|e| SourceError::Network(format!("Failed to read response: {}", e)))?;

                parser::parse(bytes.as_ref())
                    .map_err(|e| SourceError::Parse(format!("Failed to parse Atom feed: {}", e)))
            }
        })
        .await?;

        if let Some(message) = Self::api_error(&feed) {
            return Err(SourceError::Api(message));
        }

        let records = feed
            .entries
            .iter()
            .map(Self::parse_entry)
            .collect::<Result<Vec<_>, _>>()?;

        tracing::info!(query = %query.query, results = records.len(), "arXiv search complete");
        Ok(records)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    const FEED: &str = r#"<?xml version="1.0" encoding="UTF-8"?>
<feed xmlns="http://www.w3.org/2005/Atom">
  <title>arXiv Query Results</title>
  <id>http://arxiv.org/api/query</id>
  <updated>2024-01-01T00:00:00Z</updated>
  <entry>
    <id>http://arxiv.org/abs/1706.03762v7</id>
    <updated>2023-08-02T00:41:18Z</updated>
    <published>2017-06-12T17:57:34Z</published>
    <title>Attention Is All
      You Need</title>
    <summary>  The dominant sequence transduction models are based on complex
      recurrent networks.</summary>
    <author><name>Ashish Vaswani</name></author>
    <author><name>Noam Shazeer</name></author>
    <link href="http://arxiv.org/abs/1706.03762v7" rel="alternate" type="text/html"/>
    <link title="doi" href="http://dx.doi.org/10.48550/arXiv.1706.03762" rel="related"/>
  </entry>
  <entry>
    <id>http://arxiv.org/abs/hep-th/9901001v1</id>
    <updated>1999-01-04T00:00:00Z</updated>
    <published>1999-01-04T00:00:00Z</published>
    <title>Old Style Identifier</title>
    <summary>Abstract.</summary>
    <author><name>Some Physicist</name></author>
  </entry>
</feed>"#;

    const EMPTY_FEED: &str = r#"<?xml version="1.0" encoding="UTF-8"?>
<feed xmlns="http://www.w3.org/2005/Atom">
  <title>arXiv Query Results</title>
  <id>http://arxiv.org/api/query</id>
  <updated>2024-01-01T00:00:00Z</updated>
</feed>"#;

    const ERROR_FEED: &str = r#"<?xml version="1.0" encoding="UTF-8"?>
<feed xmlns="http://www.w3.org/2005/Atom">
  <title>arXiv Query Results</title>
  <id>http://arxiv.org/api/query</id>
  <updated>2024-01-01T00:00:00Z</updated>
  <entry>
    <id>http://arxiv.org/api/errors#incorrect_id_format_for_x</id>
    <title>Error</title>
    <summary>incorrect id format for x</summary>
    <updated>2024-01-01T00:00:00Z</updated>
  </entry>
</feed>"#;

    fn source_for(server: &mockito::ServerGuard) -> ArxivSource {
        ArxivSource::with_client(HttpClient::new().unwrap())
            .base_url(format!("{}/api/query", server.url()))
            .retry(RetryConfig::no_retry())
    }

    #[test]
    fn test_accession_number() {
        assert_eq!(
            ArxivSource::accession_number("http://arxiv.org/abs/2301.12345v1").as_deref(),
            Some("2301.12345")
        );
        assert_eq!(
            ArxivSource::accession_number("http://arxiv.org/abs/2301.12345").as_deref(),
            Some("2301.12345")
        );
        assert_eq!(
            ArxivSource::accession_number("http://arxiv.org/abs/solv-int/9901001v2").as_deref(),
            Some("solv-int/9901001")
        );
        assert_eq!(ArxivSource::accession_number("http://arxiv.org/abs/"), None);
    }

    #[test]
    fn test_build_search_query() {
        let query = SearchQuery::new("attention  transformer");
        assert_eq!(
            ArxivSource::build_search_query(&query),
            "all:attention AND all:transformer"
        );
    }

    #[test]
    fn test_doi_from_url() {
        assert_eq!(
            doi_from_url("http://dx.doi.org/10.1000/xyz").as_deref(),
            Some("10.1000/xyz")
        );
        assert_eq!(doi_from_url("https://example.com/10.1000"), None);
    }

    #[test]
    fn test_parse_feed_entries() {
        let feed = parser::parse(FEED.as_bytes()).unwrap();
        let records: Vec<MetadataRecord> = feed
            .entries
            .iter()
            .map(ArxivSource::parse_entry)
            .collect::<Result<_, _>>()
            .unwrap();

        assert_eq!(records.len(), 2);
        let first = &records[0];
        assert_eq!(first.external_id, "1706.03762");
        assert_eq!(first.title, "Attention Is All You Need");
        assert_eq!(first.authors, vec!["Ashish Vaswani", "Noam Shazeer"]);
        assert_eq!(first.published, NaiveDate::from_ymd_opt(2017, 6, 12));
        assert_eq!(first.doi.as_deref(), Some("10.48550/arXiv.1706.03762"));
        assert_eq!(first.venue.as_deref(), Some("arXiv"));
        assert_eq!(first.kind, PublicationKind::Preprint);
        assert!(first
            .abstract_text
            .as_deref()
            .unwrap()
            .starts_with("The dominant sequence"));
        assert_eq!(records[1].external_id, "hep-th/9901001");
        assert!(records[1].doi.is_none());
    }

    #[tokio::test]
    async fn test_search_against_mock_server() {
        let mut server = mockito::Server::new_async().await;
        let mock = server
            .mock("GET", "/api/query")
            .match_query(mockito::Matcher::AllOf(vec![
                mockito::Matcher::UrlEncoded(
                    "search_query".into(),
                    "all:attention AND all:need".into(),
                ),
                mockito::Matcher::UrlEncoded("max_results".into(), "5".into()),
            ]))
            .with_status(200)
            .with_header("content-type", "application/atom+xml")
            .with_body(FEED)
            .create_async()
            .await;

        let source = source_for(&server);
        let records = source
            .search(&SearchQuery::new("attention need").max_results(5))
            .await
            .unwrap();

        mock.assert_async().await;
        assert_eq!(records.len(), 2);
        assert_eq!(records[0].external_id, "1706.03762");
    }

    #[tokio::test]
    async fn test_search_no_matches_is_empty() {
        let mut server = mockito::Server::new_async().await;
        server
            .mock("GET", mockito::Matcher::Any)
            .with_status(200)
            .with_body(EMPTY_FEED)
            .create_async()
            .await;

        let records = source_for(&server)
            .search(&SearchQuery::new("qwertyuiopasdf"))
            .await
            .unwrap();
        assert!(records.is_empty());
    }

    #[tokio::test]
    async fn test_search_server_error() {
        let mut server = mockito::Server::new_async().await;
        server
            .mock("GET", mockito::Matcher::Any)
            .with_status(503)
            .create_async()
            .await;

        let err = source_for(&server)
            .search(&SearchQuery::new("attention"))
            .await
            .unwrap_err();
        assert!(matches!(err, SourceError::HttpStatus(503)));
    }

    #[tokio::test]
    async fn test_search_api_error_entry() {
        let mut server = mockito::Server::new_async().await;
        server
            .mock("GET", mockito::Matcher::Any)
            .with_status(200)
            .with_body(ERROR_FEED)
            .create_async()
            .await;

        let err = source_for(&server)
            .search(&SearchQuery::new("x"))
            .await
            .unwrap_err();
        assert!(matches!(err, SourceError::Api(ref msg) if msg.contains("incorrect id format")));
    }

    #[tokio::test]
    async fn test_search_empty_query_rejected() {
        let source = ArxivSource::new().unwrap();
        let err = source.search(&SearchQuery::new("   ")).await.unwrap_err();
        assert!(matches!(err, SourceError::InvalidRequest(_)));
    }
}
