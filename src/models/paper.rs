//! Metadata record representing one paper returned by a search source.

use chrono::{Datelike, NaiveDate};
use serde::{Deserialize, Serialize};

/// Kind of publication, used to pick BibTeX entry types and IEEE layout
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum PublicationKind {
    #[default]
    ArticleJournal,
    PaperConference,
    Preprint,
    Book,
    Webpage,
}

impl PublicationKind {
    pub const ALL: [PublicationKind; 5] = [
        PublicationKind::ArticleJournal,
        PublicationKind::PaperConference,
        PublicationKind::Preprint,
        PublicationKind::Book,
        PublicationKind::Webpage,
    ];

    /// Kind for a CSL type name; unknown types are treated as journal articles
    pub fn from_csl_type(name: &str) -> Self {
        let name = name.trim();
        Self::ALL
            .into_iter()
            .find(|kind| kind.csl_type().eq_ignore_ascii_case(name))
            .unwrap_or_default()
    }

    /// CSL type name for this kind
    pub fn csl_type(&self) -> &'static str {
        match self {
            PublicationKind::ArticleJournal => "article-journal",
            PublicationKind::PaperConference => "paper-conference",
            PublicationKind::Preprint => "preprint",
            PublicationKind::Book => "book",
            PublicationKind::Webpage => "webpage",
        }
    }
}

/// An immutable description of one paper.
///
/// The `external_id` is assigned by the provider (an arXiv accession number,
/// a DOI, ...) and is the deduplication key used by the session store.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MetadataRecord {
    /// Provider-assigned identifier, globally unique
    pub external_id: String,

    /// Paper title
    pub title: String,

    /// Author names in byline order ("Given Family" or "Family, Given")
    #[serde(default)]
    pub authors: Vec<String>,

    /// Publication or submission date
    #[serde(default)]
    pub published: Option<NaiveDate>,

    /// Abstract text
    #[serde(default, rename = "abstract")]
    pub abstract_text: Option<String>,

    /// Journal, proceedings or repository name
    #[serde(default)]
    pub venue: Option<String>,

    #[serde(default)]
    pub kind: PublicationKind,

    #[serde(default)]
    pub volume: Option<String>,

    #[serde(default)]
    pub issue: Option<String>,

    /// Page range, e.g. "5998-6008"
    #[serde(default)]
    pub pages: Option<String>,

    /// Digital Object Identifier (bare, without the resolver prefix)
    #[serde(default)]
    pub doi: Option<String>,

    /// Landing page URL
    #[serde(default)]
    pub url: Option<String>,
}

impl MetadataRecord {
    /// Start building a record from its required fields
    pub fn builder(external_id: impl Into<String>, title: impl Into<String>) -> RecordBuilder {
        RecordBuilder::new(external_id, title)
    }

    /// Publication year, if a date is known
    pub fn year(&self) -> Option<i32> {
        self.published.map(|d| d.year())
    }
}

/// Builder for constructing [`MetadataRecord`] values
#[derive(Debug, Clone)]
pub struct RecordBuilder {
    record: MetadataRecord,
}

impl RecordBuilder {
    /// Create a new builder with required fields
    pub fn new(external_id: impl Into<String>, title: impl Into<String>) -> Self {
        Self {
            record: MetadataRecord {
                external_id: external_id.into(),
                title: title.into(),
                authors: Vec::new(),
                published: None,
                abstract_text: None,
                venue: None,
                kind: PublicationKind::default(),
                volume: None,
                issue: None,
                pages: None,
                doi: None,
                url: None,
            },
        }
    }

    /// Append one author
    pub fn author(mut self, name: impl Into<String>) -> Self {
        self.record.authors.push(name.into());
        self
    }

    /// Replace the author list
    pub fn authors<I, S>(mut self, names: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.record.authors = names.into_iter().map(Into::into).collect();
        self
    }

    /// Set the publication date
    pub fn published(mut self, date: NaiveDate) -> Self {
        self.record.published = Some(date);
        self
    }

    /// Set a year-only publication date (stored as January 1st)
    pub fn published_year(mut self, year: i32) -> Self {
        self.record.published = NaiveDate::from_ymd_opt(year, 1, 1);
        self
    }

    pub fn abstract_text(mut self, text: impl Into<String>) -> Self {
        self.record.abstract_text = Some(text.into());
        self
    }

    pub fn venue(mut self, venue: impl Into<String>) -> Self {
        self.record.venue = Some(venue.into());
        self
    }

    pub fn kind(mut self, kind: PublicationKind) -> Self {
        self.record.kind = kind;
        self
    }

    pub fn volume(mut self, volume: impl Into<String>) -> Self {
        self.record.volume = Some(volume.into());
        self
    }

    pub fn issue(mut self, issue: impl Into<String>) -> Self {
        self.record.issue = Some(issue.into());
        self
    }

    pub fn pages(mut self, pages: impl Into<String>) -> Self {
        self.record.pages = Some(pages.into());
        self
    }

    pub fn doi(mut self, doi: impl Into<String>) -> Self {
        self.record.doi = Some(doi.into());
        self
    }

    pub fn url(mut self, url: impl Into<String>) -> Self {
        self.record.url = Some(url.into());
        self
    }

    /// Build the record
    pub fn build(self) -> MetadataRecord {
        self.record
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_record_builder() {
        let record = MetadataRecord::builder("1706.03762", "Attention Is All You Need")
            .author("Ashish Vaswani")
            .author("Noam Shazeer")
            .published_year(2017)
            .venue("NeurIPS")
            .kind(PublicationKind::PaperConference)
            .doi("10.48550/arXiv.1706.03762")
            .build();

        assert_eq!(record.external_id, "1706.03762");
        assert_eq!(record.authors, vec!["Ashish Vaswani", "Noam Shazeer"]);
        assert_eq!(record.year(), Some(2017));
        assert_eq!(record.venue.as_deref(), Some("NeurIPS"));
        assert_eq!(record.kind, PublicationKind::PaperConference);
    }

    #[test]
    fn test_year_absent_without_date() {
        let record = MetadataRecord::builder("x", "Untitled").build();
        assert_eq!(record.year(), None);
    }

    #[test]
    fn test_deserialize_minimal_json() {
        let json = r#"{"external_id": "VASWANI_2017", "title": "Attention Is All You Need",
                       "published": "2017-06-12", "kind": "paper-conference"}"#;
        let record: MetadataRecord = serde_json::from_str(json).unwrap();

        assert!(record.authors.is_empty());
        assert_eq!(record.year(), Some(2017));
        assert_eq!(record.kind.csl_type(), "paper-conference");
        assert!(record.abstract_text.is_none());
    }

    #[test]
    fn test_kind_from_csl_type() {
        for kind in PublicationKind::ALL {
            assert_eq!(PublicationKind::from_csl_type(kind.csl_type()), kind);
        }
        assert_eq!(PublicationKind::from_csl_type("Book"), PublicationKind::Book);
        assert_eq!(
            PublicationKind::from_csl_type("chapter"),
            PublicationKind::ArticleJournal
        );
    }
}
