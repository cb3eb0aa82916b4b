//! Date parsing and ordering for albums and listing tiles
//!
//! The site prints dates day-first with dots, with or without spaces after
//! the separators ("20. 9. 2025", "20. 9.2025", "20.9.2025", "05.03.2024").
//! Anything else is treated as undated and sorted last.

use crate::model::{Album, ListingEntry};
use chrono::NaiveDate;
use once_cell::sync::Lazy;
use regex::Regex;
use std::cmp::Ordering;

/// Layouts tried in order; the first one that parses wins.
///
/// `%d`/`%m` accept one or two digits, so the zero-padded `DD.MM.YYYY`
/// form goes through the compact layout.
const DATE_LAYOUTS: &[&str] = &["%d. %m. %Y", "%d. %m.%Y", "%d.%m.%Y"];

/// Day and month of one or two digits, year of exactly four
///
/// `%Y` alone would also take "25" as the year 25.
static DATE_SHAPE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^\d{1,2}\.\s*\d{1,2}\.\s*\d{4}$").expect("static regex"));

/// Parses a site date, returning None when no layout matches
///
/// # Examples
///
/// ```
/// use chrono::NaiveDate;
/// use zonerama_scraper::extract::parse_date;
///
/// assert_eq!(parse_date("20. 9. 2025"), NaiveDate::from_ymd_opt(2025, 9, 20));
/// assert_eq!(parse_date("yesterday"), None);
/// ```
pub fn parse_date(text: &str) -> Option<NaiveDate> {
    let text = text.trim();
    if !DATE_SHAPE.is_match(text) {
        return None;
    }

    DATE_LAYOUTS
        .iter()
        .find_map(|layout| NaiveDate::parse_from_str(text, layout).ok())
}

/// Orders two optional dates newest first, dated before undated
///
/// Returns `Equal` when both are undated or both carry the same day; callers
/// chain their own tie-break for the undated case.
pub fn compare_dates(a: Option<NaiveDate>, b: Option<NaiveDate>) -> Ordering {
    match (a, b) {
        (Some(a), Some(b)) => b.cmp(&a),
        (Some(_), None) => Ordering::Less,
        (None, Some(_)) => Ordering::Greater,
        (None, None) => Ordering::Equal,
    }
}

/// Final ordering of crawled albums
///
/// Newest first; undated albums go last, ordered by title among themselves.
/// Albums with the same date keep their insertion order.
pub fn sort_albums(albums: &mut [Album]) {
    albums.sort_by(|a, b| {
        let (da, db) = (parse_date(&a.date), parse_date(&b.date));
        compare_dates(da, db).then_with(|| {
            if da.is_none() && db.is_none() {
                a.title.cmp(&b.title)
            } else {
                Ordering::Equal
            }
        })
    });
}

/// Fetch ordering of listing tiles, decided before any limit is applied
///
/// Same rule as [`sort_albums`] with the tile link as the undated tie-break.
pub fn sort_entries(entries: &mut [ListingEntry]) {
    entries.sort_by(|a, b| {
        let (da, db) = (
            parse_date(&a.preliminary.date),
            parse_date(&b.preliminary.date),
        );
        compare_dates(da, db).then_with(|| {
            if da.is_none() && db.is_none() {
                a.link.cmp(&b.link)
            } else {
                Ordering::Equal
            }
        })
    });
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::Preliminary;

    fn ymd(y: i32, m: u32, d: u32) -> Option<NaiveDate> {
        NaiveDate::from_ymd_opt(y, m, d)
    }

    fn album(title: &str, date: &str) -> Album {
        Album {
            title: title.to_string(),
            date: date.to_string(),
            ..Album::default()
        }
    }

    fn entry(link: &str, date: &str) -> ListingEntry {
        ListingEntry {
            link: link.to_string(),
            preliminary: Preliminary {
                date: date.to_string(),
                ..Preliminary::default()
            },
        }
    }

    #[test]
    fn test_supported_layouts() {
        assert_eq!(parse_date("20. 9. 2025"), ymd(2025, 9, 20));
        assert_eq!(parse_date("20. 9.2025"), ymd(2025, 9, 20));
        assert_eq!(parse_date("20.9.2025"), ymd(2025, 9, 20));
        assert_eq!(parse_date("05.03.2024"), ymd(2024, 3, 5));
        assert_eq!(parse_date("1. 1. 2024"), ymd(2024, 1, 1));
    }

    #[test]
    fn test_surrounding_whitespace() {
        assert_eq!(parse_date("  20. 9. 2025\n"), ymd(2025, 9, 20));
    }

    #[test]
    fn test_unparseable_dates() {
        assert_eq!(parse_date(""), None);
        assert_eq!(parse_date("   "), None);
        assert_eq!(parse_date("20 September 2025"), None);
        assert_eq!(parse_date("2025-09-20"), None);
        assert_eq!(parse_date("31. 2. 2025"), None);
        assert_eq!(parse_date("20. 9. 25"), None);
        assert_eq!(parse_date("20. 9. 5"), None);
        assert_eq!(parse_date("20.9.02025"), None);
    }

    #[test]
    fn test_short_year_sorts_with_undated() {
        let mut albums = vec![
            album("b", "20. 9. 25"),
            album("a", ""),
            album("dated", "1. 1. 2020"),
        ];
        sort_albums(&mut albums);

        let titles: Vec<_> = albums.iter().map(|a| a.title.as_str()).collect();
        assert_eq!(titles, vec!["dated", "a", "b"]);
    }

    #[test]
    fn test_compare_dates() {
        assert_eq!(
            compare_dates(ymd(2025, 1, 1), ymd(2024, 1, 1)),
            Ordering::Less
        );
        assert_eq!(compare_dates(None, ymd(2000, 1, 1)), Ordering::Greater);
        assert_eq!(compare_dates(ymd(2000, 1, 1), None), Ordering::Less);
        assert_eq!(compare_dates(None, None), Ordering::Equal);
    }

    #[test]
    fn test_sort_albums_newest_first_undated_last() {
        let mut albums = vec![
            album("b", "garbage"),
            album("old", "1. 1. 2024"),
            album("a", ""),
            album("new", "20. 9. 2025"),
        ];
        sort_albums(&mut albums);

        let titles: Vec<_> = albums.iter().map(|a| a.title.as_str()).collect();
        assert_eq!(titles, vec!["new", "old", "a", "b"]);
    }

    #[test]
    fn test_sort_albums_is_stable_on_equal_dates() {
        let mut albums = vec![
            album("zeta", "3. 3. 2023"),
            album("alpha", "03.03.2023"),
            album("mid", "3.3.2023"),
        ];
        sort_albums(&mut albums);

        let titles: Vec<_> = albums.iter().map(|a| a.title.as_str()).collect();
        assert_eq!(titles, vec!["zeta", "alpha", "mid"]);
    }

    #[test]
    fn test_sort_entries_uses_link_for_undated() {
        let mut entries = vec![
            entry("https://z/Album/2", ""),
            entry("https://z/Album/1", ""),
            entry("https://z/Album/3", "1. 1. 2024"),
        ];
        sort_entries(&mut entries);

        let links: Vec<_> = entries.iter().map(|e| e.link.as_str()).collect();
        assert_eq!(
            links,
            vec!["https://z/Album/3", "https://z/Album/1", "https://z/Album/2"]
        );
    }
}
