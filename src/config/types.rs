use serde::Deserialize;

/// Main configuration structure for Zonerama-Scraper
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct Config {
    pub server: ServerConfig,
    pub fetch: FetchConfig,
    pub limits: LimitsConfig,
    pub site: SiteConfig,
}

/// HTTP server configuration
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct ServerConfig {
    /// Socket address the API listens on
    pub bind: String,

    /// Directory receiving raw page dumps when a request sets `debug=true`
    #[serde(rename = "debug-dir")]
    pub debug_dir: String,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            bind: "0.0.0.0:7053".to_string(),
            debug_dir: "debuging".to_string(),
        }
    }
}

/// Fetch client behavior
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct FetchConfig {
    /// Per-request timeout (seconds)
    #[serde(rename = "timeout-secs")]
    pub timeout_secs: u64,

    /// Extra attempts after a transient failure
    #[serde(rename = "retry-times")]
    pub retry_times: u32,

    /// Pause between attempts (milliseconds)
    #[serde(rename = "retry-delay-ms")]
    pub retry_delay_ms: u64,

    #[serde(rename = "user-agent")]
    pub user_agent: String,

    /// Whether requests render JavaScript unless the caller opts out
    pub rendered: bool,
}

impl Default for FetchConfig {
    fn default() -> Self {
        Self {
            timeout_secs: 30,
            retry_times: 2,
            retry_delay_ms: 500,
            user_agent: format!("zonerama-scraper/{}", env!("CARGO_PKG_VERSION")),
            rendered: true,
        }
    }
}

/// Default crawl limits, overridable per request
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct LimitsConfig {
    /// Photos kept per album (0 = unlimited)
    #[serde(rename = "photo-limit")]
    pub photo_limit: usize,

    /// Albums crawled from a listing (0 = unlimited)
    #[serde(rename = "entity-limit")]
    pub entity_limit: usize,

    /// Concurrent album fetches during a listing crawl
    pub concurrency: usize,

    /// Outer deadline for waiting on album fetches (seconds)
    #[serde(rename = "crawl-deadline-secs")]
    pub crawl_deadline_secs: Option<u64>,
}

impl Default for LimitsConfig {
    fn default() -> Self {
        Self {
            photo_limit: 10,
            entity_limit: 5,
            concurrency: 8,
            crawl_deadline_secs: None,
        }
    }
}

/// Which hosts callers may point the scraper at
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct SiteConfig {
    /// Host patterns (e.g., "zonerama.com" or "*.zonerama.com")
    #[serde(rename = "allowed-hosts")]
    pub allowed_hosts: Vec<String>,
}

impl Default for SiteConfig {
    fn default() -> Self {
        Self {
            allowed_hosts: vec!["*.zonerama.com".to_string()],
        }
    }
}
