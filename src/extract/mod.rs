//! Extraction engine for Zonerama pages
//!
//! Pure functions over a parsed document:
//! - Page classification (profile listing vs. album)
//! - Listing scan: album tiles with their preliminary metadata
//! - Album scan: header metadata plus photos via tiered fallbacks
//! - Date parsing and the deterministic album ordering
//!
//! Nothing here performs I/O; the crawler feeds in fetched bodies.

mod album;
mod date;
mod listing;
mod router;

pub use album::{extract_album, PhotoStrategy, PHOTO_STRATEGIES};
pub use date::{compare_dates, parse_date, sort_albums, sort_entries};
pub use listing::extract_entries;
pub use router::{classify, PageKind};

use once_cell::sync::Lazy;
use regex::Regex;
use scraper::ElementRef;

static NUMBER: Lazy<Regex> = Lazy::new(|| Regex::new(r"\d+").expect("static regex"));

/// Collects an element's text content, trimmed
pub(crate) fn element_text(element: ElementRef<'_>) -> String {
    element.text().collect::<String>().trim().to_string()
}

/// Returns the first run of digits in a label such as "42 fotografií"
///
/// Values that do not fit a u32 are treated as absent.
pub(crate) fn first_number(text: &str) -> Option<u32> {
    NUMBER
        .find(text)
        .and_then(|digits| digits.as_str().parse().ok())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_first_number() {
        assert_eq!(first_number("42"), Some(42));
        assert_eq!(first_number("  42 fotografií"), Some(42));
        assert_eq!(first_number("Fotek: 7"), Some(7));
        assert_eq!(first_number("žádné"), None);
        assert_eq!(first_number(""), None);
        assert_eq!(first_number("99999999999999"), None);
    }
}
