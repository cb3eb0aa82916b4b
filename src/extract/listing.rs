//! Profile listing scan
//!
//! Every album tile yields its album link plus the date, photo count and
//! view count printed on the tile. No limit is applied here; the crawler
//! sorts the full list first and truncates afterwards.

use super::{element_text, first_number};
use crate::model::{ListingEntry, Preliminary};
use crate::url::resolve_link;
use once_cell::sync::Lazy;
use scraper::{ElementRef, Html, Selector};
use url::Url;

static TILES: Lazy<Selector> =
    Lazy::new(|| Selector::parse("li.list-alb").expect("static selector"));

static TILES_FALLBACK: Lazy<Selector> = Lazy::new(|| {
    Selector::parse("[data-type='album'], li[class*='list-alb']").expect("static selector")
});

static THUMBNAIL_LINK: Lazy<Selector> =
    Lazy::new(|| Selector::parse("a.thumbnail").expect("static selector"));

static ANY_LINK: Lazy<Selector> = Lazy::new(|| Selector::parse("a").expect("static selector"));

static INFO_BLOCK: Lazy<Selector> = Lazy::new(|| Selector::parse("p").expect("static selector"));

static COUNTERS: Lazy<Selector> = Lazy::new(|| Selector::parse("span").expect("static selector"));

/// Scans a listing page for album tiles, in document order
///
/// Tiles whose link cannot be resolved are skipped.
pub fn extract_entries(document: &Html, base_url: &Url) -> Vec<ListingEntry> {
    let mut tiles: Vec<ElementRef<'_>> = document.select(&TILES).collect();
    if tiles.is_empty() {
        tiles = document.select(&TILES_FALLBACK).collect();
    }

    tracing::debug!(candidates = tiles.len(), page = %base_url, "Scanning album tiles");

    tiles
        .into_iter()
        .filter_map(|tile| {
            let link = tile_link(tile, base_url)?;
            Some(ListingEntry {
                link,
                preliminary: tile_metadata(tile),
            })
        })
        .collect()
}

/// Resolves the album link of a tile: `data-url`, then the thumbnail anchor,
/// then the first anchor
fn tile_link(tile: ElementRef<'_>, base_url: &Url) -> Option<String> {
    let attr_link = tile
        .value()
        .attr("data-url")
        .map(str::trim)
        .filter(|v| !v.is_empty());

    let raw = attr_link
        .or_else(|| first_href(tile, &THUMBNAIL_LINK))
        .or_else(|| first_href(tile, &ANY_LINK))?;

    resolve_link(raw, base_url)
}

fn first_href<'a>(tile: ElementRef<'a>, selector: &Selector) -> Option<&'a str> {
    tile.select(selector)
        .next()
        .and_then(|a| a.value().attr("href"))
        .map(str::trim)
        .filter(|href| !href.is_empty())
}

/// Reads "date | <span>photos</span> | <span>views</span>" from the tile's first paragraph
fn tile_metadata(tile: ElementRef<'_>) -> Preliminary {
    let Some(block) = tile.select(&INFO_BLOCK).next() else {
        return Preliminary::default();
    };

    let full = element_text(block);
    let date = full.split('|').next().unwrap_or_default().trim().to_string();

    let mut counters = block.select(&COUNTERS).map(element_text);
    let photo_count = counters
        .next()
        .and_then(|text| first_number(&text))
        .unwrap_or(0);
    let view_count = counters
        .next()
        .and_then(|text| first_number(&text))
        .unwrap_or(0);

    Preliminary {
        date,
        photo_count,
        view_count,
    }
}
