//! Page classification
//!
//! Decides whether a fetched page is a profile listing or a single album.
//! Listing markers are checked first; an album is only recognised by its
//! identity markers, and anything else is scanned as a listing.

use once_cell::sync::Lazy;
use scraper::{Html, Selector};

static LISTING_MARKERS: Lazy<Selector> =
    Lazy::new(|| Selector::parse("li.list-alb, #profile-albums").expect("static selector"));

static ALBUM_META: Lazy<Selector> =
    Lazy::new(|| Selector::parse("meta[property='znrm:album']").expect("static selector"));

static ALBUM_HEADER: Lazy<Selector> =
    Lazy::new(|| Selector::parse(".row-name-album").expect("static selector"));

/// Outcome of classifying a page
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PageKind {
    /// Album tiles or the profile album container are present
    Listing,

    /// Album metadata tag or album header present, no tiles
    Album,

    /// No markers at all; scanned as a listing
    ///
    /// An album page that lost both its identity markers ends up here and
    /// yields no albums instead of its photos.
    DefaultListing,
}

impl PageKind {
    /// Returns true if the page should be scanned for album tiles
    pub fn is_listing(&self) -> bool {
        matches!(self, Self::Listing | Self::DefaultListing)
    }
}

/// Classifies a parsed page
pub fn classify(document: &Html) -> PageKind {
    if document.select(&LISTING_MARKERS).next().is_some() {
        return PageKind::Listing;
    }

    if document.select(&ALBUM_META).next().is_some()
        || document.select(&ALBUM_HEADER).next().is_some()
    {
        return PageKind::Album;
    }

    PageKind::DefaultListing
}

#[cfg(test)]
mod tests {
    use super::*;

    fn kind(html: &str) -> PageKind {
        classify(&Html::parse_document(html))
    }

    #[test]
    fn test_album_tiles_mean_listing() {
        assert_eq!(
            kind(r#"<ul><li class="list-alb"><a href="/A/Album/1">x</a></li></ul>"#),
            PageKind::Listing
        );
    }

    #[test]
    fn test_profile_container_means_listing() {
        assert_eq!(
            kind(r#"<div id="profile-albums"></div>"#),
            PageKind::Listing
        );
    }

    #[test]
    fn test_listing_markers_win_over_album_markers() {
        let html = r#"<html><head><meta property="znrm:album" content="1"></head>
            <body><li class="list-alb"></li></body></html>"#;
        assert_eq!(kind(html), PageKind::Listing);
    }

    #[test]
    fn test_album_meta_tag() {
        let html = r#"<html><head><meta property="znrm:album" content="13878599"></head><body></body></html>"#;
        assert_eq!(kind(html), PageKind::Album);
    }

    #[test]
    fn test_album_header_block() {
        assert_eq!(
            kind(r#"<div class="row-name-album"><h2><span>Trip</span></h2></div>"#),
            PageKind::Album
        );
    }

    #[test]
    fn test_unmarked_page_defaults_to_listing() {
        assert_eq!(kind("<html><body><p>hi</p></body></html>"), PageKind::DefaultListing);
        assert!(PageKind::DefaultListing.is_listing());
    }

    #[test]
    fn test_album_without_identity_markers_is_misclassified() {
        // Known edge case: photos are present but nothing identifies the album,
        // so the page is treated as a listing.
        let html = r#"<div class="gallery-inner"><div data-type="photo" data-id="5"></div></div>"#;
        assert_eq!(kind(html), PageKind::DefaultListing);
    }
}
