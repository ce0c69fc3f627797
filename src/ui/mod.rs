//! CLI presentation: colored status lines, result tables and spinners.

use comfy_table::{presets::UTF8_FULL, Attribute, Cell, ContentArrangement, Table};
use indicatif::{ProgressBar, ProgressStyle};
use owo_colors::OwoColorize;
use std::time::Duration;

use crate::models::{CitationResponse, MetadataRecord, SearchHit};
use crate::utils::{format_authors, hit_table_columns, terminal_width, truncate_with_ellipsis};

/// Status types for colored output.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Status {
    Success,
    Error,
    Warning,
    Info,
    Search,
}

/// Status icons for different operations.
pub fn status_icon(status: Status) -> &'static str {
    match status {
        Status::Success => "✓",
        Status::Error => "✗",
        Status::Warning => "⚠",
        Status::Info => "ℹ",
        Status::Search => "🔍",
    }
}

/// Render a status line with a colored icon.
pub fn status_line(status: Status, msg: &str) -> String {
    let icon = status_icon(status);
    match status {
        Status::Success => format!("{} {}", icon.green().bold(), msg),
        Status::Error => format!("{} {}", icon.red().bold(), msg),
        Status::Warning => format!("{} {}", icon.yellow().bold(), msg),
        Status::Info => format!("{} {}", icon.cyan().bold(), msg),
        Status::Search => format!("{} {}", icon.yellow(), msg),
    }
}

/// Print a styled status message to stdout.
#[macro_export]
macro_rules! print_status {
    ($status:expr, $($arg:tt)*) => {
        println!("{}", $crate::ui::status_line($status, &format!($($arg)*)))
    };
}

/// Print a styled status message to stderr.
#[macro_export]
macro_rules! eprint_status {
    ($status:expr, $($arg:tt)*) => {
        eprintln!("{}", $crate::ui::status_line($status, &format!($($arg)*)))
    };
}

/// Print a section header.
pub fn print_section(title: &str) {
    println!();
    println!("{}", format!("━━━ {} ━━━", title).bold().cyan());
}

/// Print search results header.
pub fn print_search_header(query: &str, count: usize, duration: Duration) {
    println!();
    println!(
        "{} Search results for: \"{}\"",
        status_icon(Status::Search).yellow().bold(),
        query.cyan().bold()
    );
    println!(
        "{} Found {} papers in {:.2}s",
        "─".repeat(30).dimmed(),
        count.to_string().green().bold(),
        duration.as_secs_f64()
    );
    println!();
}

/// Build the results table; ids are what `cite` expects.
pub fn hits_table(hits: &[SearchHit], width: usize) -> Table {
    let (_, title_width, authors_width, _) = hit_table_columns(width);

    let mut table = Table::new();
    table
        .load_preset(UTF8_FULL)
        .set_content_arrangement(ContentArrangement::Dynamic)
        .set_width(width.min(u16::MAX as usize) as u16)
        .set_header(vec!["ID", "Title", "Authors", "Year"]);

    for hit in hits {
        table.add_row(vec![
            Cell::new(hit.id.as_str()).add_attribute(Attribute::Bold),
            Cell::new(truncate_with_ellipsis(&hit.title, title_width)),
            Cell::new(format_authors(&hit.authors, authors_width)),
            Cell::new(hit.year.map(|y| y.to_string()).unwrap_or_default()),
        ]);
    }
    table
}

pub fn print_hits_table(hits: &[SearchHit]) {
    println!("{}", hits_table(hits, terminal_width()));
}

/// Print a citation with its style label.
pub fn print_citation(citation: &CitationResponse) {
    let label = match &citation.id {
        Some(id) => format!("{} [{}]", id, citation.style.to_uppercase()),
        None => format!("[{}]", citation.style.to_uppercase()),
    };
    println!("{}", label.dimmed());
    println!("{}", "─".repeat(terminal_width().min(80)).dimmed());
    println!("{}", citation.citation);
}

/// Print stored metadata for one paper.
pub fn print_paper(id: &str, record: &MetadataRecord) {
    print_section(id);
    println!("{}", record.title.blue().bold());
    if !record.authors.is_empty() {
        println!("  Authors: {}", record.authors.join(", "));
    }
    if let Some(date) = record.published {
        println!("  Published: {}", date.to_string().yellow());
    }
    if let Some(venue) = &record.venue {
        println!("  Venue: {}", venue.green());
    }
    println!("  Source id: {}", record.external_id);
    if let Some(doi) = &record.doi {
        println!("  DOI: {}", doi);
    }
    if let Some(url) = &record.url {
        println!("  URL: {}", url.underline());
    }
    if let Some(text) = &record.abstract_text {
        println!();
        println!("{}", truncate_with_ellipsis(text, 600));
    }
}

fn style(template: &str, ticks: &str) -> ProgressStyle {
    ProgressStyle::with_template(template)
        .unwrap_or_else(|_| ProgressStyle::default_spinner())
        .tick_chars(ticks)
}

/// A loading spinner with a message.
pub struct Spinner {
    pb: ProgressBar,
}

impl Spinner {
    /// Create a new spinner with the given message.
    pub fn new(msg: &str) -> Self {
        let pb = ProgressBar::new_spinner();
        pb.set_style(style("{spinner:.cyan} {msg}", "⠁⠂⠄⡀⢀⠠⠐⠈ "));
        pb.set_message(msg.to_string());
        pb.enable_steady_tick(Duration::from_millis(100));

        Self { pb }
    }

    /// A spinner that draws nothing, for quiet or non-terminal output.
    pub fn hidden() -> Self {
        Self {
            pb: ProgressBar::hidden(),
        }
    }

    /// Finish with error message.
    pub fn finish_with_error(&self, msg: &str) {
        self.pb.set_style(style("{spinner:.red} {msg}", "✗✗"));
        self.pb.finish_with_message(msg.to_string());
    }

    /// Remove the spinner line.
    pub fn clear(&self) {
        self.pb.finish_and_clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::session::ShortId;

    #[test]
    fn test_status_icon() {
        assert_eq!(status_icon(Status::Success), "✓");
        assert_eq!(status_icon(Status::Error), "✗");
        assert_eq!(status_icon(Status::Search), "🔍");
    }

    #[test]
    fn test_status_line_contains_message() {
        let line = status_line(Status::Warning, "server not running");
        assert!(line.contains("server not running"));
        assert!(line.contains("⚠"));
    }

    #[test]
    fn test_hits_table_lists_ids() {
        let record = MetadataRecord::builder("1706.03762", "Attention Is All You Need")
            .authors(["Ashish Vaswani", "Noam Shazeer", "Niki Parmar"])
            .published_year(2017)
            .build();
        let hits = vec![SearchHit::new(ShortId::from("p1"), &record)];

        let rendered = hits_table(&hits, 120).to_string();
        assert!(rendered.contains("p1"));
        assert!(rendered.contains("Attention Is All You Need"));
        assert!(rendered.contains("Ashish Vaswani et al."));
        assert!(rendered.contains("2017"));
    }
}
