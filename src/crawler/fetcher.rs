//! HTTP fetcher implementation
//!
//! This module handles all page requests for the crawler, including:
//! - Building the HTTP client with the configured user agent and timeout
//! - Plain GET requests and (with the `render` feature) headless rendering
//! - Retry logic for transient failures
//! - Error classification

use crate::config::FetchConfig;
use async_trait::async_trait;
use reqwest::Client;
use std::time::Duration;
use thiserror::Error;
use url::Url;

/// A fetched page body together with the URL that produced it
#[derive(Debug, Clone)]
pub struct FetchedPage {
    /// Final URL after redirects; relative links resolve against it
    pub url: Url,

    /// HTTP status code (200 for rendered pages)
    pub status: u16,

    /// Raw HTML, or the serialized DOM for rendered pages
    pub body: String,
}

/// Why a fetch produced no page
#[derive(Debug, Error)]
pub enum FetchError {
    #[error("Request timeout for {url}")]
    Timeout { url: String },

    #[error("HTTP {status} for {url}")]
    Status { url: String, status: u16 },

    #[error("Network error for {url}: {message}")]
    Network { url: String, message: String },

    #[error("Render error for {url}: {message}")]
    Render { url: String, message: String },
}

impl FetchError {
    /// Returns true when another attempt may succeed
    ///
    /// | Condition | Retry |
    /// |-----------|-------|
    /// | Timeout | yes |
    /// | Connection/network failure | yes |
    /// | HTTP 429, 5xx | yes |
    /// | Other HTTP status | no |
    /// | Render failure | yes |
    pub fn is_transient(&self) -> bool {
        match self {
            Self::Timeout { .. } | Self::Network { .. } | Self::Render { .. } => true,
            Self::Status { status, .. } => *status == 429 || *status >= 500,
        }
    }

    fn from_reqwest(url: &Url, error: reqwest::Error) -> Self {
        if error.is_timeout() {
            Self::Timeout {
                url: url.to_string(),
            }
        } else {
            Self::Network {
                url: url.to_string(),
                message: error.to_string(),
            }
        }
    }
}

/// Source of pages for the crawler
///
/// Retries and timeouts are the implementation's business; callers treat an
/// `Err` as "this page contributes nothing".
#[async_trait]
pub trait PageFetcher: Send + Sync {
    /// Fetches a page, executing its scripts first when `rendered` is set
    async fn fetch(&self, url: &Url, rendered: bool) -> Result<FetchedPage, FetchError>;
}

/// Builds an HTTP client with proper configuration
///
/// # Example
///
/// ```
/// use zonerama_scraper::config::FetchConfig;
/// use zonerama_scraper::crawler::build_http_client;
///
/// let client = build_http_client(&FetchConfig::default()).unwrap();
/// ```
pub fn build_http_client(config: &FetchConfig) -> Result<Client, reqwest::Error> {
    Client::builder()
        .user_agent(config.user_agent.as_str())
        .timeout(Duration::from_secs(config.timeout_secs))
        .connect_timeout(Duration::from_secs(config.timeout_secs.min(10)))
        .gzip(true)
        .brotli(true)
        .build()
}

/// Production fetcher: reqwest for plain pages, headless Chromium for
/// rendered ones when built with the `render` feature
pub struct HttpFetcher {
    client: Client,
    retry_times: u32,
    retry_delay: Duration,
    #[cfg(feature = "render")]
    renderer: super::render::Renderer,
}

impl HttpFetcher {
    /// Creates a fetcher from the `[fetch]` configuration section
    pub fn new(config: &FetchConfig) -> Result<Self, reqwest::Error> {
        Ok(Self {
            client: build_http_client(config)?,
            retry_times: config.retry_times,
            retry_delay: Duration::from_millis(config.retry_delay_ms),
            #[cfg(feature = "render")]
            renderer: super::render::Renderer::new(Duration::from_secs(config.timeout_secs)),
        })
    }

    /// One plain GET attempt
    async fn get(&self, url: &Url) -> Result<FetchedPage, FetchError> {
        let response = self
            .client
            .get(url.clone())
            .send()
            .await
            .map_err(|e| FetchError::from_reqwest(url, e))?;

        let status = response.status();
        let final_url = response.url().clone();

        if !status.is_success() {
            return Err(FetchError::Status {
                url: url.to_string(),
                status: status.as_u16(),
            });
        }

        let body = response
            .text()
            .await
            .map_err(|e| FetchError::from_reqwest(url, e))?;

        Ok(FetchedPage {
            url: final_url,
            status: status.as_u16(),
            body,
        })
    }

    /// One rendered attempt
    #[cfg(feature = "render")]
    async fn render(&self, url: &Url) -> Result<FetchedPage, FetchError> {
        self.renderer.render(url).await
    }

    /// Without the `render` feature, rendered requests are served raw
    #[cfg(not(feature = "render"))]
    async fn render(&self, url: &Url) -> Result<FetchedPage, FetchError> {
        tracing::debug!(%url, "Built without rendering support, fetching raw page");
        self.get(url).await
    }
}

#[async_trait]
impl PageFetcher for HttpFetcher {
    async fn fetch(&self, url: &Url, rendered: bool) -> Result<FetchedPage, FetchError> {
        let mut attempt = 0;

        loop {
            let result = if rendered {
                self.render(url).await
            } else {
                self.get(url).await
            };

            match result {
                Ok(page) => return Ok(page),
                Err(e) if e.is_transient() && attempt < self.retry_times => {
                    attempt += 1;
                    tracing::debug!(
                        %url,
                        attempt,
                        error = %e,
                        "Transient fetch failure, retrying"
                    );
                    tokio::time::sleep(self.retry_delay).await;
                }
                Err(e) => return Err(e),
            }
        }
    }
}
