//! Citation formatting in a fixed set of styles.
//!
//! Supports APA 7th, MLA 9th, IEEE and BibTeX. Formatting is a pure function
//! of the record and the style.

use crate::error::CitationError;
use crate::models::{MetadataRecord, PublicationKind};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// APA lists at most this many authors before eliding
const APA_MAX_AUTHORS: usize = 20;
/// IEEE switches to "et al." above this many authors
const IEEE_MAX_AUTHORS: usize = 6;

/// Generational suffixes kept apart from the family name
const NAME_SUFFIXES: &[&str] = &["Jr.", "Jr", "Sr.", "Sr", "II", "III", "IV"];

/// Lowercase particles that belong to the family name ("van Beethoven")
const NAME_PARTICLES: &[&str] = &[
    "van", "von", "de", "der", "den", "del", "della", "di", "da", "du", "la", "le", "ter",
];

/// Citation style
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CitationStyle {
    /// APA 7th edition
    #[default]
    Apa,
    /// MLA 9th edition
    Mla,
    /// IEEE reference list
    Ieee,
    /// BibTeX
    Bibtex,
}

impl CitationStyle {
    /// Every supported style
    pub const ALL: [CitationStyle; 4] = [
        CitationStyle::Apa,
        CitationStyle::Mla,
        CitationStyle::Ieee,
        CitationStyle::Bibtex,
    ];

    /// Name used on the wire and on the command line
    pub fn name(&self) -> &'static str {
        match self {
            CitationStyle::Apa => "apa",
            CitationStyle::Mla => "mla",
            CitationStyle::Ieee => "ieee",
            CitationStyle::Bibtex => "bibtex",
        }
    }

    /// Comma-separated list of supported style names
    pub fn supported_names() -> String {
        Self::ALL
            .iter()
            .map(|s| s.name())
            .collect::<Vec<_>>()
            .join(", ")
    }
}

impl FromStr for CitationStyle {
    type Err = CitationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let wanted = s.trim().to_lowercase();
        Self::ALL
            .into_iter()
            .find(|style| style.name() == wanted)
            .ok_or_else(|| CitationError::UnsupportedStyle {
                style: s.trim().to_string(),
                supported: Self::supported_names(),
            })
    }
}

impl fmt::Display for CitationStyle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CitationStyle::Apa => write!(f, "APA 7th"),
            CitationStyle::Mla => write!(f, "MLA 9th"),
            CitationStyle::Ieee => write!(f, "IEEE"),
            CitationStyle::Bibtex => write!(f, "BibTeX"),
        }
    }
}

/// Format a record in the specified style
pub fn format_citation(record: &MetadataRecord, style: CitationStyle) -> String {
    match style {
        CitationStyle::Apa => format_apa(record),
        CitationStyle::Mla => format_mla(record),
        CitationStyle::Ieee => format_ieee(record),
        CitationStyle::Bibtex => format_bibtex(record),
    }
}

/// Format a record in a style given by name
pub fn format_named(record: &MetadataRecord, style: &str) -> Result<String, CitationError> {
    let style: CitationStyle = style.parse()?;
    Ok(format_citation(record, style))
}

/// An author name split into family name, given names and suffix
#[derive(Debug, Clone, PartialEq, Eq)]
struct PersonName {
    family: String,
    given: Vec<String>,
    suffix: Option<String>,
}

impl PersonName {
    /// Parse "Given Family Suffix" or "Family, Given, Suffix"
    fn parse(raw: &str) -> Self {
        if let Some((family, rest)) = raw.split_once(',') {
            let (given, suffix) = match rest.split_once(',') {
                Some((given, suffix)) => (given, Some(collapse_whitespace(suffix))),
                None => (rest, None),
            };
            return Self {
                family: collapse_whitespace(family),
                given: given.split_whitespace().map(str::to_string).collect(),
                suffix: suffix.filter(|s| !s.is_empty()),
            };
        }

        let mut words: Vec<&str> = raw.split_whitespace().collect();
        let suffix = if words.len() > 2 && words.last().is_some_and(|w| NAME_SUFFIXES.contains(w)) {
            words.pop().map(str::to_string)
        } else {
            None
        };

        // The family name starts at the last word, pulled left over particles
        let mut start = words.len().saturating_sub(1);
        while start > 1 && NAME_PARTICLES.contains(&words[start - 1]) {
            start -= 1;
        }

        let family = words[start..].join(" ");
        let given = words[..start].iter().map(|w| w.to_string()).collect();
        Self {
            family,
            given,
            suffix,
        }
    }

    /// "King Jr." in natural order
    fn family_suffixed(&self) -> String {
        match &self.suffix {
            Some(suffix) => format!("{} {}", self.family, suffix),
            None => self.family.clone(),
        }
    }

    /// ", Jr." when inverted after the given names
    fn inverted_suffix(&self) -> String {
        self.suffix
            .as_ref()
            .map(|s| format!(", {}", s))
            .unwrap_or_default()
    }

    /// "N. M." for given names "Noam M."
    fn initials(&self) -> String {
        self.given
            .iter()
            .map(|part| initial_of(part))
            .collect::<Vec<_>>()
            .join(" ")
    }

    fn given_full(&self) -> String {
        self.given.join(" ")
    }

    /// "Shazeer, N. M." or "King, M. L., Jr."
    fn family_initials(&self) -> String {
        if self.given.is_empty() {
            self.family_suffixed()
        } else {
            format!("{}, {}{}", self.family, self.initials(), self.inverted_suffix())
        }
    }

    /// "N. M. Shazeer"
    fn initials_family(&self) -> String {
        if self.given.is_empty() {
            self.family_suffixed()
        } else {
            format!("{} {}", self.initials(), self.family_suffixed())
        }
    }

    /// "Shazeer, Noam M."
    fn family_given(&self) -> String {
        if self.given.is_empty() {
            self.family_suffixed()
        } else {
            format!("{}, {}{}", self.family, self.given_full(), self.inverted_suffix())
        }
    }

    /// "Noam M. Shazeer"
    fn given_family(&self) -> String {
        if self.given.is_empty() {
            self.family_suffixed()
        } else {
            format!("{} {}", self.given_full(), self.family_suffixed())
        }
    }
}

/// Initial of one given name; hyphenated names keep both parts ("J.-P.")
fn initial_of(part: &str) -> String {
    part.split('-')
        .filter_map(|piece| piece.chars().next())
        .map(|c| format!("{}.", c.to_uppercase()))
        .collect::<Vec<_>>()
        .join("-")
}

fn collapse_whitespace(text: &str) -> String {
    text.split_whitespace().collect::<Vec<_>>().join(" ")
}

fn parse_authors(record: &MetadataRecord) -> Vec<PersonName> {
    record
        .authors
        .iter()
        .map(|a| a.trim())
        .filter(|a| !a.is_empty())
        .map(PersonName::parse)
        .collect()
}

fn ends_with_terminal(text: &str) -> bool {
    text.ends_with('.') || text.ends_with('?') || text.ends_with('!')
}

/// Append a period unless the text already ends a sentence
fn terminate(text: &str) -> String {
    if ends_with_terminal(text) {
        text.to_string()
    } else {
        format!("{}.", text)
    }
}

/// Extract the year or "n.d."
fn year_or_nd(record: &MetadataRecord) -> String {
    record
        .year()
        .map(|y| y.to_string())
        .unwrap_or_else(|| "n.d.".to_string())
}

fn non_empty(value: &Option<String>) -> Option<&str> {
    value.as_deref().map(str::trim).filter(|v| !v.is_empty())
}

/// Format authors as "Last, F. M., Last, F. & Last, F."
fn format_authors_apa(names: &[PersonName]) -> Option<String> {
    let formatted: Vec<String> = names.iter().map(PersonName::family_initials).collect();

    match formatted.as_slice() {
        [] => None,
        [only] => Some(only.clone()),
        [init @ .., last] if formatted.len() <= APA_MAX_AUTHORS => {
            Some(format!("{} & {}", init.join(", "), last))
        }
        [.., last] => {
            // APA: first 19 authors, an ellipsis, then the final author
            let head = formatted[..APA_MAX_AUTHORS - 1].join(", ");
            Some(format!("{}, ... {}", head, last))
        }
    }
}

/// Format a record in APA 7th edition
/// Format: Author, A., & Author, B. (Year). Title. Venue, Vol(Issue), Pages. DOI
fn format_apa(record: &MetadataRecord) -> String {
    let mut segments = Vec::new();

    if let Some(authors) = format_authors_apa(&parse_authors(record)) {
        segments.push(terminate(&authors));
    }
    segments.push(format!("({}).", year_or_nd(record)));
    let title = collapse_whitespace(&record.title);
    if !title.is_empty() {
        segments.push(terminate(&title));
    }

    if let Some(venue) = non_empty(&record.venue) {
        let mut source = venue.to_string();
        match (non_empty(&record.volume), non_empty(&record.issue)) {
            (Some(volume), Some(issue)) => source.push_str(&format!(", {}({})", volume, issue)),
            (Some(volume), None) => source.push_str(&format!(", {}", volume)),
            (None, Some(issue)) => source.push_str(&format!(", ({})", issue)),
            (None, None) => {}
        }
        if let Some(pages) = non_empty(&record.pages) {
            source.push_str(&format!(", {}", pages));
        }
        segments.push(terminate(&source));
    }

    if let Some(doi) = non_empty(&record.doi) {
        segments.push(format!("https://doi.org/{}", doi));
    } else if let Some(url) = non_empty(&record.url) {
        segments.push(url.to_string());
    }

    segments.join(" ")
}

/// Format authors as "Last, First, and First Last"
fn format_authors_mla(names: &[PersonName]) -> Option<String> {
    match names {
        [] => None,
        [only] => Some(only.family_given()),
        [first, second] => Some(format!(
            "{}, and {}",
            first.family_given(),
            second.given_family()
        )),
        [first, ..] => Some(format!("{}, et al", first.family_given())),
    }
}

/// Format a record in MLA 9th edition
/// Format: Author. "Title." Venue, vol. V, no. I, Year, pp. P. DOI.
fn format_mla(record: &MetadataRecord) -> String {
    let mut segments = Vec::new();

    if let Some(authors) = format_authors_mla(&parse_authors(record)) {
        segments.push(terminate(&authors));
    }
    let title = collapse_whitespace(&record.title);
    if !title.is_empty() {
        segments.push(format!("\"{}\"", terminate(&title)));
    }

    let mut container = Vec::new();
    if let Some(venue) = non_empty(&record.venue) {
        container.push(venue.to_string());
    }
    if let Some(volume) = non_empty(&record.volume) {
        container.push(format!("vol. {}", volume));
    }
    if let Some(issue) = non_empty(&record.issue) {
        container.push(format!("no. {}", issue));
    }
    if let Some(year) = record.year() {
        container.push(year.to_string());
    }
    if let Some(pages) = non_empty(&record.pages) {
        container.push(format!("pp. {}", pages));
    }
    if !container.is_empty() {
        segments.push(terminate(&container.join(", ")));
    }

    if let Some(doi) = non_empty(&record.doi) {
        segments.push(format!("https://doi.org/{}.", doi));
    }

    segments.join(" ")
}

/// Format authors as "A. Last, B. Last, and C. Last"
fn format_authors_ieee(names: &[PersonName]) -> Option<String> {
    let formatted: Vec<String> = names.iter().map(PersonName::initials_family).collect();

    match formatted.as_slice() {
        [] => None,
        [only] => Some(only.clone()),
        [first, second] => Some(format!("{} and {}", first, second)),
        [first, ..] if formatted.len() > IEEE_MAX_AUTHORS => Some(format!("{} et al.", first)),
        [init @ .., last] => Some(format!("{}, and {}", init.join(", "), last)),
    }
}

/// Format a record for an IEEE reference list
/// Format: A. Author and B. Author, "Title," in Venue, vol. V, no. I, pp. P, Year, doi: D.
fn format_ieee(record: &MetadataRecord) -> String {
    let title = collapse_whitespace(&record.title);
    let quoted_title = if title.is_empty() {
        None
    } else if ends_with_terminal(&title) {
        Some(format!("\"{}\"", title))
    } else {
        Some(format!("\"{},\"", title))
    };

    let mut head = match (format_authors_ieee(&parse_authors(record)), quoted_title) {
        (Some(authors), Some(title)) => format!("{}, {}", authors, title),
        (Some(authors), None) => format!("{},", authors),
        (None, Some(title)) => title,
        (None, None) => String::new(),
    };

    let mut details = Vec::new();
    if let Some(venue) = non_empty(&record.venue) {
        if record.kind == PublicationKind::PaperConference {
            details.push(format!("in {}", venue));
        } else {
            details.push(venue.to_string());
        }
    }
    if let Some(volume) = non_empty(&record.volume) {
        details.push(format!("vol. {}", volume));
    }
    if let Some(issue) = non_empty(&record.issue) {
        details.push(format!("no. {}", issue));
    }
    if let Some(pages) = non_empty(&record.pages) {
        details.push(format!("pp. {}", pages));
    }
    details.push(year_or_nd(record));

    if !head.is_empty() {
        head.push(' ');
    }
    head.push_str(&terminate(&details.join(", ")));

    if let Some(doi) = non_empty(&record.doi) {
        head.push_str(&format!(" doi: {}.", doi));
    }

    head
}

/// Lowercase ASCII alphanumerics only, for citation keys
fn key_fragment(text: &str) -> String {
    text.chars()
        .filter(|c| c.is_ascii_alphanumeric())
        .flat_map(char::to_lowercase)
        .collect()
}

/// Escape characters that are special to BibTeX/LaTeX inside a field value
fn escape_bibtex(value: &str) -> String {
    let mut escaped = String::with_capacity(value.len());
    for c in value.chars() {
        match c {
            '{' | '}' | '%' | '&' | '$' | '#' | '_' => {
                escaped.push('\\');
                escaped.push(c);
            }
            _ => escaped.push(c),
        }
    }
    escaped
}

/// Citation key: firstauthorYEARfirstword, e.g. "vaswani2017attention"
fn bibtex_key(record: &MetadataRecord, names: &[PersonName]) -> String {
    let author = names
        .first()
        .map(|n| key_fragment(&n.family))
        .filter(|f| !f.is_empty())
        .unwrap_or_else(|| "anon".to_string());
    let year = record
        .year()
        .map(|y| y.to_string())
        .unwrap_or_else(|| "nd".to_string());
    let word = record
        .title
        .split_whitespace()
        .map(key_fragment)
        .find(|w| w.len() > 3)
        .unwrap_or_default();

    format!("{}{}{}", author, year, word)
}

/// Generate a BibTeX entry
/// Format: @article{key,
///   author = {Last, First and Last, First},
///   title = {Title},
///   journal = {Venue},
///   year = {Year}
/// }
fn format_bibtex(record: &MetadataRecord) -> String {
    let names = parse_authors(record);
    let (entry_type, venue_field) = match record.kind {
        PublicationKind::ArticleJournal => ("article", "journal"),
        PublicationKind::PaperConference => ("inproceedings", "booktitle"),
        PublicationKind::Book => ("book", "publisher"),
        PublicationKind::Preprint | PublicationKind::Webpage => ("misc", "howpublished"),
    };

    let mut fields: Vec<(&str, String)> = Vec::new();
    if !names.is_empty() {
        let authors = names
            .iter()
            .map(PersonName::family_given)
            .collect::<Vec<_>>()
            .join(" and ");
        fields.push(("author", escape_bibtex(&authors)));
    }
    let title = collapse_whitespace(&record.title);
    if !title.is_empty() {
        fields.push(("title", escape_bibtex(&title)));
    }
    if let Some(venue) = non_empty(&record.venue) {
        fields.push((venue_field, escape_bibtex(venue)));
    }
    if let Some(year) = record.year() {
        fields.push(("year", year.to_string()));
    }
    if let Some(volume) = non_empty(&record.volume) {
        fields.push(("volume", escape_bibtex(volume)));
    }
    if let Some(issue) = non_empty(&record.issue) {
        fields.push(("number", escape_bibtex(issue)));
    }
    if let Some(pages) = non_empty(&record.pages) {
        fields.push(("pages", escape_bibtex(&pages.replace('-', "--"))));
    }
    // DOIs and URLs are verbatim fields
    if let Some(doi) = non_empty(&record.doi) {
        fields.push(("doi", doi.replace(['{', '}'], "")));
    }
    if let Some(url) = non_empty(&record.url) {
        fields.push(("url", url.replace(['{', '}'], "")));
    }

    let body = fields
        .iter()
        .map(|(name, value)| format!("  {} = {{{}}}", name, value))
        .collect::<Vec<_>>()
        .join(",\n");

    format!(
        "@{}{{{},\n{}\n}}",
        entry_type,
        bibtex_key(record, &names),
        body
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    fn attention() -> MetadataRecord {
        MetadataRecord::builder("VASWANI_2017", "Attention Is All You Need")
            .authors(["Ashish Vaswani", "Noam Shazeer"])
            .published_year(2017)
            .build()
    }

    fn explorer_paper() -> MetadataRecord {
        MetadataRecord::builder(
            "711722243044",
            "AI Research Paper Explorer: Leveraging RAG for Persistent Research Memory",
        )
        .authors(["ANISHA, Z.", "JANANI, K."])
        .published_year(2025)
        .venue("Journal of Artificial Intelligence & Data Science")
        .volume("10")
        .issue("2")
        .pages("15-30")
        .url("http://example-kite.edu/paper-09")
        .build()
    }

    #[test]
    fn test_apa_two_authors() {
        assert_eq!(
            format_citation(&attention(), CitationStyle::Apa),
            "Vaswani, A. & Shazeer, N. (2017). Attention Is All You Need."
        );
    }

    #[test]
    fn test_apa_no_authors_no_date() {
        let record = MetadataRecord::builder("x", "Anonymous Findings").build();
        let citation = format_citation(&record, CitationStyle::Apa);

        assert_eq!(citation, "(n.d.). Anonymous Findings.");
        assert!(citation.contains("(n.d.)"));
    }

    #[test]
    fn test_apa_single_author_has_no_ampersand() {
        let record = MetadataRecord::builder("x", "Solo Work")
            .author("Grace Hopper")
            .published_year(1952)
            .build();
        assert_eq!(
            format_citation(&record, CitationStyle::Apa),
            "Hopper, G. (1952). Solo Work."
        );
    }

    #[test]
    fn test_apa_three_authors_and_middle_initials() {
        let record = MetadataRecord::builder("x", "Three Way")
            .authors(["Ashish Vaswani", "Noam M. Shazeer", "Aidan N. Gomez"])
            .published_year(2017)
            .build();
        assert_eq!(
            format_citation(&record, CitationStyle::Apa),
            "Vaswani, A., Shazeer, N. M. & Gomez, A. N. (2017). Three Way."
        );
    }

    #[test]
    fn test_apa_with_venue_volume_issue_pages() {
        assert_eq!(
            format_citation(&explorer_paper(), CitationStyle::Apa),
            "ANISHA, Z. & JANANI, K. (2025). AI Research Paper Explorer: Leveraging RAG for \
             Persistent Research Memory. Journal of Artificial Intelligence & Data Science, \
             10(2), 15-30. http://example-kite.edu/paper-09"
        );
    }

    #[test]
    fn test_apa_prefers_doi_over_url() {
        let record = MetadataRecord::builder("x", "Has DOI")
            .author("Ada Lovelace")
            .published_year(1843)
            .venue("Scientific Memoirs")
            .doi("10.1234/abc")
            .url("https://example.com")
            .build();
        assert_eq!(
            format_citation(&record, CitationStyle::Apa),
            "Lovelace, A. (1843). Has DOI. Scientific Memoirs. https://doi.org/10.1234/abc"
        );
    }

    #[test]
    fn test_apa_title_question_mark_kept() {
        let record = MetadataRecord::builder("x", "Is Attention All You Need?")
            .published_year(2021)
            .build();
        assert_eq!(
            format_citation(&record, CitationStyle::Apa),
            "(2021). Is Attention All You Need?"
        );
    }

    #[test]
    fn test_apa_elides_long_author_lists() {
        let authors: Vec<String> = (1..=25).map(|i| format!("Given{} Family{}", i, i)).collect();
        let record = MetadataRecord::builder("x", "Big Team")
            .authors(authors)
            .published_year(2020)
            .build();
        let citation = format_citation(&record, CitationStyle::Apa);

        assert!(citation.contains("Family19, G., ... Family25, G."));
        assert!(!citation.contains("Family20"));
    }

    #[test]
    fn test_apa_unicode_and_hyphenated_initials() {
        let record = MetadataRecord::builder("x", "T")
            .authors(["Łukasz Kaiser", "Jean-Paul Sartre"])
            .published_year(2000)
            .build();
        assert_eq!(
            format_citation(&record, CitationStyle::Apa),
            "Kaiser, Ł. & Sartre, J.-P. (2000). T."
        );
    }

    #[test]
    fn test_mla() {
        assert_eq!(
            format_citation(&attention(), CitationStyle::Mla),
            "Vaswani, Ashish, and Noam Shazeer. \"Attention Is All You Need.\" 2017."
        );

        let record = MetadataRecord::builder("x", "Crowded")
            .authors(["A One", "B Two", "C Three"])
            .venue("Nature")
            .volume("5")
            .published_year(2019)
            .build();
        assert_eq!(
            format_citation(&record, CitationStyle::Mla),
            "One, A, et al. \"Crowded.\" Nature, vol. 5, 2019."
        );
    }

    #[test]
    fn test_ieee() {
        let record = MetadataRecord::builder("x", "Attention Is All You Need")
            .authors(["Ashish Vaswani", "Noam Shazeer"])
            .published_year(2017)
            .venue("Advances in Neural Information Processing Systems")
            .kind(PublicationKind::PaperConference)
            .pages("5998-6008")
            .build();
        assert_eq!(
            format_citation(&record, CitationStyle::Ieee),
            "A. Vaswani and N. Shazeer, \"Attention Is All You Need,\" in Advances in Neural \
             Information Processing Systems, pp. 5998-6008, 2017."
        );
    }

    #[test]
    fn test_ieee_many_authors_et_al() {
        let authors: Vec<String> = (1..=8).map(|i| format!("X{} Y{}", i, i)).collect();
        let record = MetadataRecord::builder("x", "T")
            .authors(authors)
            .build();
        assert_eq!(
            format_citation(&record, CitationStyle::Ieee),
            "X. Y1 et al., \"T,\" n.d."
        );
    }

    #[test]
    fn test_bibtex() {
        let record = MetadataRecord::builder("1706.03762", "Attention Is All You Need")
            .authors(["Ashish Vaswani", "Noam Shazeer"])
            .published_year(2017)
            .venue("NeurIPS")
            .kind(PublicationKind::PaperConference)
            .pages("5998-6008")
            .build();
        assert_eq!(
            format_citation(&record, CitationStyle::Bibtex),
            "@inproceedings{vaswani2017attention,\n  author = {Vaswani, Ashish and Shazeer, Noam},\n  title = {Attention Is All You Need},\n  booktitle = {NeurIPS},\n  year = {2017},\n  pages = {5998--6008}\n}"
        );
    }

    #[test]
    fn test_bibtex_anonymous_key() {
        let record = MetadataRecord::builder("x", "On Things").build();
        let entry = format_citation(&record, CitationStyle::Bibtex);
        assert!(entry.starts_with("@article{anonndthings,"));
    }

    #[test]
    fn test_style_parsing() {
        assert_eq!("apa".parse::<CitationStyle>().unwrap(), CitationStyle::Apa);
        assert_eq!(" IEEE ".parse::<CitationStyle>().unwrap(), CitationStyle::Ieee);
        assert_eq!("BibTeX".parse::<CitationStyle>().unwrap(), CitationStyle::Bibtex);
    }

    #[test]
    fn test_unsupported_style() {
        let err = format_named(&attention(), "chicago").unwrap_err();
        match err {
            CitationError::UnsupportedStyle { style, supported } => {
                assert_eq!(style, "chicago");
                assert_eq!(supported, "apa, mla, ieee, bibtex");
            }
            other => panic!("expected UnsupportedStyle, got {other:?}"),
        }
    }

    #[test]
    fn test_formatting_is_deterministic() {
        let record = explorer_paper();
        for style in CitationStyle::ALL {
            assert_eq!(
                format_citation(&record, style),
                format_citation(&record.clone(), style)
            );
        }
    }

    #[test]
    fn test_name_parsing() {
        assert_eq!(
            PersonName::parse("Shazeer, Noam M."),
            PersonName {
                family: "Shazeer".to_string(),
                given: vec!["Noam".to_string(), "M.".to_string()],
                suffix: None,
            }
        );
        assert_eq!(PersonName::parse("Plato").family_initials(), "Plato");
    }

    #[test]
    fn test_name_suffixes_and_particles() {
        let king = PersonName::parse("Martin Luther King Jr.");
        assert_eq!(king.family, "King");
        assert_eq!(king.suffix.as_deref(), Some("Jr."));
        assert_eq!(king.family_initials(), "King, M. L., Jr.");
        assert_eq!(king.initials_family(), "M. L. King Jr.");

        let inverted = PersonName::parse("King, Martin Luther, Jr.");
        assert_eq!(inverted, king);

        let beethoven = PersonName::parse("Ludwig van Beethoven");
        assert_eq!(beethoven.family, "van Beethoven");
        assert_eq!(beethoven.family_initials(), "van Beethoven, L.");

        assert_eq!(PersonName::parse("Henry VIII II").family, "VIII");
        assert_eq!(PersonName::parse("Ken Jr").family, "Jr");
    }

    #[test]
    fn test_apa_suffix_and_particle_authors() {
        let record = MetadataRecord::builder("x", "Letters")
            .authors(["Martin Luther King Jr.", "Ludwig van Beethoven"])
            .published_year(1963)
            .build();
        assert_eq!(
            format_citation(&record, CitationStyle::Apa),
            "King, M. L., Jr. & van Beethoven, L. (1963). Letters."
        );
    }

    #[test]
    fn test_empty_title_is_skipped() {
        let record = MetadataRecord::builder("x", "  ")
            .author("A B")
            .published_year(2000)
            .build();

        assert_eq!(format_citation(&record, CitationStyle::Apa), "B, A. (2000).");
        assert_eq!(format_citation(&record, CitationStyle::Mla), "B, A. 2000.");
        assert_eq!(format_citation(&record, CitationStyle::Ieee), "A. B, 2000.");
        assert!(!format_citation(&record, CitationStyle::Bibtex).contains("title"));
    }

    #[test]
    fn test_bibtex_escapes_special_characters() {
        let record = MetadataRecord::builder("x", "Costs of {Big} Data: 50% & Rising")
            .author("Ada Lovelace")
            .venue("Data_Science & Co")
            .url("https://example.com/a%20b")
            .build();
        let entry = format_citation(&record, CitationStyle::Bibtex);

        assert!(entry.contains(r"title = {Costs of \{Big\} Data: 50\% \& Rising}"));
        assert!(entry.contains(r"journal = {Data\_Science \& Co}"));
        assert!(entry.contains("url = {https://example.com/a%20b}"));
    }

    #[test]
    fn test_default_style_is_apa() {
        assert_eq!(CitationStyle::default(), CitationStyle::Apa);
    }
}
