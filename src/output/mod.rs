//! Output module for crawl results
//!
//! This module handles:
//! - Encoding crawl results as the JSON returned by the API
//! - Optional raw page dumps for debugging

mod dump;

pub use dump::DebugDumper;

use crate::model::CrawlResult;

/// Encodes a crawl result as indented JSON with a trailing newline
pub fn render_json(result: &CrawlResult) -> Result<String, serde_json::Error> {
    let mut json = serde_json::to_string_pretty(result)?;
    json.push('\n');
    Ok(json)
}
