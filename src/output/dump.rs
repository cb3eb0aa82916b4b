//! Raw page dumps for debugging selector problems
//!
//! When a request sets `debug=true`, every fetched body is written to the
//! debug directory under a name derived from the crawl stage and the URL.
//! The directory is served back over HTTP. Write failures are logged and
//! otherwise ignored.

use once_cell::sync::Lazy;
use regex::Regex;
use sha2::{Digest, Sha256};
use std::path::{Path, PathBuf};
use url::Url;

static UNSAFE_CHARS: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"[^a-zA-Z0-9._-]+").expect("static regex"));

/// Writes fetched pages into a debug directory
#[derive(Debug, Clone)]
pub struct DebugDumper {
    dir: PathBuf,
}

impl DebugDumper {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    /// Builds `{stage}_{hash}_{sanitized url}.html`
    ///
    /// The hash is the first 6 bytes of the SHA-256 of the URL, hex encoded,
    /// which keeps names unique after sanitizing.
    ///
    /// # Examples
    ///
    /// ```
    /// use url::Url;
    /// use zonerama_scraper::output::DebugDumper;
    ///
    /// let url = Url::parse("https://eu.zonerama.com/A/Album/1").unwrap();
    /// let name = DebugDumper::file_name("album", &url);
    /// assert!(name.starts_with("album_"));
    /// assert!(name.ends_with("_https_eu.zonerama.com_A_Album_1.html"));
    /// ```
    pub fn file_name(stage: &str, url: &Url) -> String {
        let digest = Sha256::digest(url.as_str().as_bytes());
        let short = hex::encode(&digest[..6]);
        let sanitized = UNSAFE_CHARS.replace_all(url.as_str(), "_");
        format!("{}_{}_{}.html", stage, short, sanitized)
    }

    /// Saves a page body, ignoring failures
    pub async fn save(&self, stage: &str, url: &Url, body: &str) {
        match self.try_save(stage, url, body).await {
            Ok(path) => tracing::debug!(path = %path.display(), "Saved debug dump"),
            Err(e) => tracing::debug!(error = %e, %url, "Could not save debug dump"),
        }
    }

    async fn try_save(&self, stage: &str, url: &Url, body: &str) -> std::io::Result<PathBuf> {
        tokio::fs::create_dir_all(&self.dir).await?;
        let path = self.dir.join(Self::file_name(stage, url));
        tokio::fs::write(&path, body).await?;
        Ok(path)
    }
}
