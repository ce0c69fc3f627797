//! Terminal display helpers for CLI output.
//!
//! Width calculations use `unicode-width` so titles with CJK characters or
//! accented author names line up in tables.

use std::sync::OnceLock;
use terminal_size::terminal_size;
use unicode_width::UnicodeWidthChar;

/// Default width when terminal size cannot be determined.
pub const DEFAULT_WIDTH: usize = 100;

static TERMINAL_WIDTH: OnceLock<usize> = OnceLock::new();

/// Current terminal width in characters, cached after the first call.
pub fn terminal_width() -> usize {
    *TERMINAL_WIDTH.get_or_init(|| {
        terminal_size()
            .map(|(w, _)| w.0 as usize)
            .unwrap_or(DEFAULT_WIDTH)
    })
}

fn char_width(c: char) -> usize {
    c.width().unwrap_or(1)
}

/// Truncate text to fit within `max_width` display columns.
///
/// An ellipsis is appended when anything was cut.
///
/// ```
/// use papervista::utils::truncate_with_ellipsis;
///
/// assert_eq!(truncate_with_ellipsis("Hello World", 8), "Hello...");
/// assert_eq!(truncate_with_ellipsis("Hi", 8), "Hi");
/// ```
pub fn truncate_with_ellipsis(text: &str, max_width: usize) -> String {
    if max_width == 0 {
        return String::new();
    }

    let total_width: usize = text.chars().map(char_width).sum();
    if total_width <= max_width {
        return text.to_string();
    }

    let budget = max_width.saturating_sub(3);
    let mut current_width = 0;
    let mut truncated = String::new();
    for c in text.chars() {
        let w = char_width(c);
        if current_width + w > budget {
            break;
        }
        current_width += w;
        truncated.push(c);
    }

    format!("{}...", truncated.trim_end())
}

/// Join author names for a table cell, collapsing long lists to "et al.".
pub fn format_authors(authors: &[String], max_width: usize) -> String {
    let joined = match authors {
        [] => String::new(),
        [only] => only.clone(),
        [first, second] => format!("{}, {}", first, second),
        [first, ..] => format!("{} et al.", first),
    };
    truncate_with_ellipsis(&joined, max_width)
}

/// Column widths for the search results table: (id, title, authors, year).
pub fn hit_table_columns(terminal_width: usize) -> (usize, usize, usize, usize) {
    const ID: usize = 8;
    const YEAR: usize = 6;
    // Borders and padding of a four-column UTF-8 table
    const CHROME: usize = 13;

    let flexible = terminal_width.saturating_sub(ID + YEAR + CHROME).max(40);
    let title = flexible * 2 / 3;
    (ID, title, flexible - title, YEAR)
}
