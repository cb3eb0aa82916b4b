//! Lenient query string parsing
//!
//! Malformed values never fail a request: integers use the leading integer of
//! the value and booleans accept the usual spellings; anything else falls
//! back to the configured default.

use crate::config::Config;
use crate::crawler::CrawlOptions;
use once_cell::sync::Lazy;
use regex::Regex;
use std::collections::HashMap;

static LEADING_INT: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^\s*([+-]?\d+)").expect("static regex"));

/// Parses the leading integer of a value ("12abc" → 12)
///
/// # Examples
///
/// ```
/// use zonerama_scraper::server::params::parse_int;
///
/// assert_eq!(parse_int("25"), Some(25));
/// assert_eq!(parse_int(" 7 albums"), Some(7));
/// assert_eq!(parse_int("-3"), Some(-3));
/// assert_eq!(parse_int("many"), None);
/// ```
pub fn parse_int(value: &str) -> Option<i64> {
    LEADING_INT
        .captures(value)
        .and_then(|c| c.get(1))
        .and_then(|m| m.as_str().parse().ok())
}

/// Parses a boolean spelled `1`, `t`, `true` (or `0`, `f`, `false`)
///
/// Accepts lowercase, uppercase and capitalized forms of the words.
pub fn parse_bool(value: &str) -> Option<bool> {
    match value {
        "1" | "t" | "T" | "TRUE" | "true" | "True" => Some(true),
        "0" | "f" | "F" | "FALSE" | "false" | "False" => Some(false),
        _ => None,
    }
}

/// Query parameters of one API request
#[derive(Debug, Clone, Default)]
pub struct RequestParams {
    values: HashMap<String, String>,
}

impl From<HashMap<String, String>> for RequestParams {
    fn from(values: HashMap<String, String>) -> Self {
        Self { values }
    }
}

impl RequestParams {
    fn get(&self, name: &str) -> Option<&str> {
        self.values
            .get(name)
            .map(String::as_str)
            .filter(|v| !v.is_empty())
    }

    /// The raw `link` parameter (empty when absent)
    pub fn link(&self) -> &str {
        self.get("link").unwrap_or_default()
    }

    /// A limit where 0 means unlimited; negative values also mean unlimited
    fn limit(&self, names: &[&str], default: usize) -> usize {
        names
            .iter()
            .find_map(|name| self.get(name))
            .and_then(parse_int)
            .map(|n| usize::try_from(n.max(0)).unwrap_or(usize::MAX))
            .unwrap_or(default)
    }

    fn flag(&self, name: &str) -> Option<bool> {
        self.get(name).and_then(parse_bool)
    }

    pub fn photo_limit(&self, default: usize) -> usize {
        self.limit(&["photo_limit"], default)
    }

    /// `entity_limit`, or its older spelling `album_limit`
    pub fn entity_limit(&self, default: usize) -> usize {
        self.limit(&["entity_limit", "album_limit"], default)
    }

    /// Requested concurrency, at least 1
    pub fn concurrency(&self, default: usize) -> usize {
        self.limit(&["concurrency"], default).max(1)
    }

    pub fn debug(&self) -> bool {
        self.flag("debug").unwrap_or(false)
    }

    /// `rendered=<bool>`, overridden by `no-render=true` or `no_render=true`
    pub fn rendered(&self, default: bool) -> bool {
        let mut rendered = self.flag("rendered").unwrap_or(default);
        if self.flag("no-render") == Some(true) || self.flag("no_render") == Some(true) {
            rendered = false;
        }
        rendered
    }

    /// Crawl options for `/album`
    pub fn album_options(&self, config: &Config) -> CrawlOptions {
        let defaults = CrawlOptions::from_config(config);
        CrawlOptions {
            photo_limit: self.photo_limit(defaults.photo_limit),
            rendered: self.rendered(defaults.rendered),
            debug: self.debug(),
            ..defaults
        }
    }

    /// Crawl options for `/listing`
    pub fn listing_options(&self, config: &Config) -> CrawlOptions {
        let defaults = CrawlOptions::from_config(config);
        CrawlOptions {
            photo_limit: self.photo_limit(defaults.photo_limit),
            entity_limit: self.entity_limit(defaults.entity_limit),
            concurrency: self.concurrency(defaults.concurrency),
            rendered: self.rendered(defaults.rendered),
            debug: self.debug(),
            deadline: defaults.deadline,
        }
    }
}
