//! Crawler module for page fetching and crawl orchestration
//!
//! This module contains the core crawling logic, including:
//! - HTTP fetching with retry logic (optionally rendered in a headless browser)
//! - Bounded-concurrency scheduling of album fetches
//! - Overall crawl coordination for listing and album requests

mod coordinator;
mod fetcher;
#[cfg(feature = "render")]
mod render;
mod scheduler;

pub use coordinator::{Coordinator, CrawlOptions};
pub use fetcher::{build_http_client, FetchError, FetchedPage, HttpFetcher, PageFetcher};
pub use scheduler::{effective_concurrency, CrawlContext, Scheduler, MAX_CONCURRENCY};
