//! URL handling module for Zonerama-Scraper
//!
//! This module validates caller-supplied links, matches hosts against the
//! configured allow-list and resolves relative links found in page markup.

mod matcher;
mod resolve;

use crate::{LinkError, LinkResult};
use url::Url;

// Re-export main functions
pub use matcher::{host_allowed, host_matches};
pub use resolve::{page_authority, resolve_link};

/// Usage hint returned when `/listing` is called without a link
pub const LISTING_USAGE: &str =
    "/listing?link=https://eu.zonerama.com/<Account>/<TabId> or profile link";

/// Usage hint returned when `/album` is called without a link
pub const ALBUM_USAGE: &str = "/album?link=https://eu.zonerama.com/<Account>/Album/<AlbumId>";

/// Validates a link supplied by an API caller
///
/// # Checks
///
/// 1. The link is present and non-blank
/// 2. It parses and uses the `http` or `https` scheme
/// 3. Its host matches one of the `allowed_hosts` patterns
///
/// # Examples
///
/// ```
/// use zonerama_scraper::url::{validate_link, LISTING_USAGE};
///
/// let allowed = vec!["*.zonerama.com".to_string()];
/// assert!(validate_link("https://eu.zonerama.com/Someone", &allowed, LISTING_USAGE).is_ok());
/// assert!(validate_link("https://example.com/", &allowed, LISTING_USAGE).is_err());
/// ```
pub fn validate_link<S: AsRef<str>>(
    raw: &str,
    allowed_hosts: &[S],
    usage: &'static str,
) -> LinkResult<Url> {
    let raw = raw.trim();
    if raw.is_empty() {
        return Err(LinkError::Missing { usage });
    }

    let url = Url::parse(raw).map_err(|_| LinkError::Invalid)?;
    if url.scheme() != "http" && url.scheme() != "https" {
        return Err(LinkError::Invalid);
    }

    let host = url.host_str().ok_or(LinkError::Invalid)?;
    if !host_allowed(allowed_hosts, host) {
        let allowed = allowed_hosts
            .iter()
            .map(|pattern| pattern.as_ref().trim_start_matches("*."))
            .collect::<Vec<_>>()
            .join(", ");
        return Err(LinkError::OutOfScope { allowed });
    }

    Ok(url)
}

/// Validates a link for single-album mode
///
/// On top of [`validate_link`], the path must reference an album page
/// (contain `/Album/`).
pub fn validate_album_link<S: AsRef<str>>(raw: &str, allowed_hosts: &[S]) -> LinkResult<Url> {
    let url = validate_link(raw, allowed_hosts, ALBUM_USAGE)?;
    if !url.path().contains("/Album/") {
        return Err(LinkError::NotAlbum);
    }
    Ok(url)
}
