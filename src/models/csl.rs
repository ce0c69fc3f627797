//! CSL-JSON citation items, as posted to `/generate/citation`.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use super::{MetadataRecord, PublicationKind};

/// A CSL name object
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CslName {
    pub family: String,
    #[serde(default)]
    pub given: Option<String>,
}

impl CslName {
    /// "Family, Given", or just the family name
    pub fn display(&self) -> String {
        match self.given.as_deref().map(str::trim).filter(|g| !g.is_empty()) {
            Some(given) => format!("{}, {}", self.family.trim(), given),
            None => self.family.trim().to_string(),
        }
    }
}

/// A CSL date: `[[year, month?, day?]]`
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CslDate {
    #[serde(alias = "date-parts")]
    pub date_parts: Vec<Vec<i32>>,
}

impl CslDate {
    /// First date in the list; missing month or day default to 1
    pub fn to_date(&self) -> Option<NaiveDate> {
        let parts = self.date_parts.first()?;
        let year = *parts.first()?;
        let month = parts.get(1).copied().unwrap_or(1);
        let day = parts.get(2).copied().unwrap_or(1);
        NaiveDate::from_ymd_opt(year, u32::try_from(month).ok()?, u32::try_from(day).ok()?)
    }
}

/// A CSL-JSON item
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CslItem {
    pub id: String,

    /// CSL type, e.g. "article-journal"
    #[serde(rename = "type", default = "default_csl_type")]
    pub item_type: String,

    pub title: String,

    #[serde(default)]
    pub author: Vec<CslName>,

    #[serde(default)]
    pub issued: Option<CslDate>,

    #[serde(default, alias = "container-title")]
    pub container_title: Option<String>,

    #[serde(default)]
    pub volume: Option<String>,

    #[serde(default)]
    pub issue: Option<String>,

    #[serde(default)]
    pub page: Option<String>,

    #[serde(default, rename = "DOI")]
    pub doi: Option<String>,

    #[serde(default, rename = "URL")]
    pub url: Option<String>,
}

fn default_csl_type() -> String {
    PublicationKind::default().csl_type().to_string()
}

impl From<CslItem> for MetadataRecord {
    fn from(item: CslItem) -> Self {
        MetadataRecord {
            external_id: item.id,
            title: item.title,
            authors: item.author.iter().map(CslName::display).collect(),
            published: item.issued.as_ref().and_then(CslDate::to_date),
            abstract_text: None,
            venue: item.container_title,
            kind: PublicationKind::from_csl_type(&item.item_type),
            volume: item.volume,
            issue: item.issue,
            pages: item.page,
            doi: item.doi,
            url: item.url,
        }
    }
}

/// Body of an ad-hoc citation request: a CSL-JSON item or a native record
#[derive(Debug, Clone, Deserialize)]
#[serde(untagged)]
pub enum CitationInput {
    Csl(CslItem),
    Record(MetadataRecord),
}

impl From<CitationInput> for MetadataRecord {
    fn from(input: CitationInput) -> Self {
        match input {
            CitationInput::Csl(item) => item.into(),
            CitationInput::Record(record) => record,
        }
    }
}
