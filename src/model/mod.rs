//! Records produced by extraction and returned to API callers
//!
//! Field names match the JSON the service emits; empty dates, zero counts and
//! missing photo page links are left out of the output.

mod merge;

use serde::Serialize;

pub use merge::merge;

/// One photo belonging to an album
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Photo {
    /// Numeric photo id as given by the page markup
    pub id: String,

    /// Photo detail page, when the markup links one
    #[serde(skip_serializing_if = "Option::is_none")]
    pub page_link: Option<String>,

    /// `https://{host}/photos/{id}_1500x1000.jpg` on the host that served the album
    pub primary_image_link: String,
}

impl Photo {
    /// Builds a photo record, deriving the large image link from the page host
    pub fn new(id: impl Into<String>, page_link: Option<String>, authority: &str) -> Self {
        let id = id.into();
        let primary_image_link = format!("https://{}/photos/{}_1500x1000.jpg", authority, id);
        Self {
            id,
            page_link,
            primary_image_link,
        }
    }
}

/// One album, as scraped from its own page and optionally its listing tile
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct Album {
    /// Album id from the page metadata (may be empty)
    pub id: String,

    pub title: String,

    /// Absolute album URL; identity key for deduplication
    pub url: String,

    /// Date text exactly as the site prints it (e.g. "20. 9. 2025")
    #[serde(skip_serializing_if = "String::is_empty")]
    pub date: String,

    #[serde(skip_serializing_if = "is_zero")]
    pub photo_count: u32,

    #[serde(skip_serializing_if = "is_zero")]
    pub view_count: u32,

    /// Photos in document order, capped by the request's photo limit
    #[serde(rename = "items")]
    pub photos: Vec<Photo>,
}

impl Album {
    /// Creates an empty album record for the given page URL
    pub fn new(url: impl Into<String>) -> Self {
        Self {
            url: url.into(),
            ..Self::default()
        }
    }
}

/// Cheap metadata read off a listing tile before the album page is fetched
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Preliminary {
    pub date: String,
    pub photo_count: u32,
    pub view_count: u32,
}

impl Preliminary {
    /// Returns true when no field carries information
    pub fn is_empty(&self) -> bool {
        self.date.trim().is_empty() && self.photo_count == 0 && self.view_count == 0
    }
}

/// An album tile found on a listing page
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ListingEntry {
    /// Absolute link to the album page
    pub link: String,
    pub preliminary: Preliminary,
}

/// Response body for both crawl modes
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct CrawlResult {
    pub input_link: String,

    #[serde(rename = "entities")]
    pub albums: Vec<Album>,
}

impl CrawlResult {
    pub fn new(input_link: impl Into<String>) -> Self {
        Self {
            input_link: input_link.into(),
            albums: Vec::new(),
        }
    }
}

fn is_zero(value: &u32) -> bool {
    *value == 0
}
