//! Configuration module for Zonerama-Scraper
//!
//! This module handles loading, parsing, and validating TOML configuration files.
//! Every key has a default, so the service also runs without a file.
//!
//! # Example
//!
//! ```no_run
//! use zonerama_scraper::config::load_config;
//! use std::path::Path;
//!
//! let config = load_config(Path::new("config.toml")).unwrap();
//! println!("Listening on {}", config.server.bind);
//! ```

mod parser;
mod types;
mod validation;

// Re-export types
pub use types::{Config, FetchConfig, LimitsConfig, ServerConfig, SiteConfig};

// Re-export parser functions
pub use parser::{compute_config_hash, load_config, load_config_with_hash, load_or_default};
pub use validation::validate;
