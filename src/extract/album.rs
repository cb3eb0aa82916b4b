//! Album page scan
//!
//! Header fields come from fixed selectors. Photos are found by an ordered
//! list of strategies: the first one that yields at least one photo wins, so
//! markup changes degrade to a coarser source instead of an empty album.

use super::{element_text, first_number};
use crate::model::{Album, Photo};
use crate::url::{page_authority, resolve_link};
use once_cell::sync::Lazy;
use regex::Regex;
use scraper::{ElementRef, Html, Selector};
use url::Url;

static ALBUM_META: Lazy<Selector> =
    Lazy::new(|| Selector::parse("meta[property='znrm:album']").expect("static selector"));

static TITLE: Lazy<Selector> =
    Lazy::new(|| Selector::parse(".row-name-album h2 span").expect("static selector"));

static DATE: Lazy<Selector> = Lazy::new(|| {
    Selector::parse(".row-name-album .album-info .hide-on-phone").expect("static selector")
});

static PHOTO_COUNT: Lazy<Selector> = Lazy::new(|| {
    Selector::parse(".row-name-album [data-id='header-album-photos']").expect("static selector")
});

static TYPED_PHOTOS: Lazy<Selector> =
    Lazy::new(|| Selector::parse("[data-type='photo'][data-id]").expect("static selector"));

static GALLERY_ITEMS: Lazy<Selector> =
    Lazy::new(|| Selector::parse(".gallery-inner [data-id]").expect("static selector"));

static GALLERY_LINK: Lazy<Selector> =
    Lazy::new(|| Selector::parse("a.gallery-link").expect("static selector"));

static PHOTO_ANCHORS: Lazy<Selector> =
    Lazy::new(|| Selector::parse("a[href*='/Photo/']").expect("static selector"));

static PHOTO_IMAGES: Lazy<Selector> =
    Lazy::new(|| Selector::parse("img[src*='/photos/']").expect("static selector"));

static NUMERIC_ID: Lazy<Regex> = Lazy::new(|| Regex::new(r"^\d+$").expect("static regex"));

static PHOTO_HREF: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"/Photo/\d+/(\d+)").expect("static regex"));

static PHOTO_SRC: Lazy<Regex> = Lazy::new(|| Regex::new(r"/photos/(\d+)_").expect("static regex"));

/// A photo source tried against an album page
///
/// Receives the document, the page URL and the photo limit (0 = unlimited)
/// and returns photos in document order.
pub type PhotoStrategy = fn(&Html, &Url, usize) -> Vec<Photo>;

/// Photo sources, most precise first
pub const PHOTO_STRATEGIES: &[(&str, PhotoStrategy)] = &[
    ("typed elements", typed_photo_elements),
    ("photo anchors", photo_detail_anchors),
    ("photo images", photo_asset_images),
];

/// Scans an album page
///
/// Missing header fields stay empty and a page without any photo markup
/// yields an album with no photos.
pub fn extract_album(document: &Html, page_url: &Url, photo_limit: usize) -> Album {
    let mut album = Album::new(page_url.as_str());

    album.id = document
        .select(&ALBUM_META)
        .next()
        .and_then(|meta| meta.value().attr("content"))
        .map(|content| content.trim().to_string())
        .unwrap_or_default();

    album.title = first_text(document, &TITLE);

    let date = first_text(document, &DATE);
    album.date = date
        .strip_prefix('|')
        .map(str::trim)
        .unwrap_or(date.as_str())
        .to_string();

    album.photo_count = first_number(&first_text(document, &PHOTO_COUNT)).unwrap_or(0);

    for (name, strategy) in PHOTO_STRATEGIES {
        let photos = strategy(document, page_url, photo_limit);
        if !photos.is_empty() {
            tracing::debug!(
                strategy = *name,
                photos = photos.len(),
                page = %page_url,
                "Extracted photos"
            );
            album.photos = photos;
            break;
        }
    }

    if album.photos.is_empty() {
        tracing::debug!(page = %page_url, "No photo markup matched");
    }

    album
}

fn first_text(document: &Html, selector: &Selector) -> String {
    document
        .select(selector)
        .next()
        .map(element_text)
        .unwrap_or_default()
}

fn limit_reached(count: usize, photo_limit: usize) -> bool {
    photo_limit > 0 && count >= photo_limit
}

/// Elements typed as photos (or any `data-id` inside the gallery) with a numeric id
fn typed_photo_elements(document: &Html, page_url: &Url, photo_limit: usize) -> Vec<Photo> {
    let mut candidates: Vec<ElementRef<'_>> = document.select(&TYPED_PHOTOS).collect();
    if candidates.is_empty() {
        candidates = document.select(&GALLERY_ITEMS).collect();
    }

    let authority = page_authority(page_url);
    let mut photos = Vec::new();

    for element in candidates {
        if limit_reached(photos.len(), photo_limit) {
            break;
        }

        let id = element.value().attr("data-id").unwrap_or_default().trim();
        if !NUMERIC_ID.is_match(id) {
            continue;
        }

        let page_link = element
            .select(&GALLERY_LINK)
            .next()
            .and_then(|a| a.value().attr("href"))
            .and_then(|href| resolve_link(href, page_url));

        photos.push(Photo::new(id, page_link, &authority));
    }

    photos
}

/// Anchors pointing at `/Photo/<albumId>/<photoId>`
fn photo_detail_anchors(document: &Html, page_url: &Url, photo_limit: usize) -> Vec<Photo> {
    let authority = page_authority(page_url);
    let mut photos = Vec::new();

    for anchor in document.select(&PHOTO_ANCHORS) {
        if limit_reached(photos.len(), photo_limit) {
            break;
        }

        let href = anchor.value().attr("href").unwrap_or_default().trim();
        let Some(id) = PHOTO_HREF.captures(href).and_then(|c| c.get(1)) else {
            continue;
        };
        if !NUMERIC_ID.is_match(id.as_str()) {
            continue;
        }

        photos.push(Photo::new(
            id.as_str(),
            resolve_link(href, page_url),
            &authority,
        ));
    }

    photos
}

/// Images served from `/photos/<photoId>_...`; no page link is known
fn photo_asset_images(document: &Html, page_url: &Url, photo_limit: usize) -> Vec<Photo> {
    let authority = page_authority(page_url);
    let mut photos = Vec::new();

    for image in document.select(&PHOTO_IMAGES) {
        if limit_reached(photos.len(), photo_limit) {
            break;
        }

        let src = image.value().attr("src").unwrap_or_default().trim();
        if let Some(id) = PHOTO_SRC.captures(src).and_then(|c| c.get(1)) {
            photos.push(Photo::new(id.as_str(), None, &authority));
        }
    }

    photos
}
