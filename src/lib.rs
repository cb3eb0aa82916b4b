//! Zonerama-Scraper: album and photo metadata harvester
//!
//! This crate fetches Zonerama profile and album pages, classifies them,
//! extracts album/photo metadata with tiered selector fallbacks and crawls
//! profile listings with bounded concurrency. Results are served as JSON
//! over a small HTTP API.

pub mod config;
pub mod crawler;
pub mod extract;
pub mod model;
pub mod output;
pub mod server;
pub mod url;

use thiserror::Error;

/// Main error type for Zonerama-Scraper operations
#[derive(Debug, Error)]
pub enum ScraperError {
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    #[error("HTTP client error: {0}")]
    Reqwest(#[from] reqwest::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// Configuration-specific errors
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to read config file: {0}")]
    Io(#[from] std::io::Error),

    #[error("Failed to parse TOML: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("Validation error: {0}")]
    Validation(String),

    #[error("Invalid host pattern: {0}")]
    InvalidPattern(String),
}

/// Errors for caller-supplied links.
///
/// These are the only errors surfaced to API callers; every variant maps to
/// HTTP 400 with the message as the `error` field.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum LinkError {
    #[error("missing link param: {usage}")]
    Missing { usage: &'static str },

    #[error("invalid link URL")]
    Invalid,

    #[error("link must point to {allowed}")]
    OutOfScope { allowed: String },

    #[error("album endpoint expects an album link containing /Album/")]
    NotAlbum,
}

/// Result type alias for Zonerama-Scraper operations
pub type Result<T> = std::result::Result<T, ScraperError>;

/// Result type alias for configuration operations
pub type ConfigResult<T> = std::result::Result<T, ConfigError>;

/// Result type alias for link validation
pub type LinkResult<T> = std::result::Result<T, LinkError>;

// Re-export commonly used types
pub use config::Config;
pub use model::{Album, CrawlResult, Photo, Preliminary};
pub use url::{validate_album_link, validate_link};
