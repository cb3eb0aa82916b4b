//! Crawler coordinator - main crawl orchestration logic
//!
//! A listing crawl moves through these steps:
//! 1. Fetch the input link
//! 2. Classify the page (listing / album / default listing)
//! 3. For an album: extract it and stop
//! 4. For a listing: scan tiles, order them newest first and dispatch album
//!    fetches through the [`Scheduler`] until the album limit of distinct
//!    links is reached
//! 5. Wait for every dispatched fetch
//! 6. Sort the collected albums once and return them
//!
//! Failed fetches never abort a crawl; they only shrink the result.

use crate::config::Config;
use crate::crawler::fetcher::{FetchedPage, PageFetcher};
use crate::crawler::scheduler::{effective_concurrency, Scheduler, MAX_CONCURRENCY};
use crate::extract::{classify, extract_album, extract_entries, sort_albums, sort_entries, PageKind};
use crate::model::{Album, CrawlResult, ListingEntry};
use crate::output::DebugDumper;
use scraper::Html;
use std::sync::Arc;
use std::time::Duration;
use tracing::instrument;
use url::Url;

/// Per-request crawl settings
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CrawlOptions {
    /// Photos kept per album (0 = unlimited)
    pub photo_limit: usize,

    /// Albums fetched from a listing (0 = unlimited)
    pub entity_limit: usize,

    /// Requested concurrent album fetches
    pub concurrency: usize,

    /// Render pages with JavaScript before extraction
    pub rendered: bool,

    /// Dump fetched bodies into the debug directory
    pub debug: bool,

    /// Give up waiting for album fetches after this long
    pub deadline: Option<Duration>,
}

impl CrawlOptions {
    /// Options taken straight from the configuration defaults
    pub fn from_config(config: &Config) -> Self {
        Self {
            photo_limit: config.limits.photo_limit,
            entity_limit: config.limits.entity_limit,
            concurrency: config.limits.concurrency,
            rendered: config.fetch.rendered,
            debug: false,
            deadline: config.limits.crawl_deadline_secs.map(Duration::from_secs),
        }
    }
}

/// What a fetched root page turned out to be
#[derive(Debug)]
enum PageOutcome {
    Album(Album),
    Listing(Vec<ListingEntry>),
}

/// Classifies a page and runs the matching extraction
///
/// The parsed document never outlives this call, so callers can keep
/// awaiting afterwards.
fn route_page(page: &FetchedPage, photo_limit: usize) -> PageOutcome {
    let document = Html::parse_document(&page.body);
    let kind = classify(&document);

    if !kind.is_listing() {
        tracing::info!(page = %page.url, "Classified as album");
        return PageOutcome::Album(extract_album(&document, &page.url, photo_limit));
    }

    if kind == PageKind::DefaultListing {
        tracing::info!(page = %page.url, "No page markers, defaulting to listing");
    } else {
        tracing::info!(page = %page.url, "Classified as listing");
    }
    PageOutcome::Listing(extract_entries(&document, &page.url))
}

fn album_from_page(page: &FetchedPage, photo_limit: usize) -> Album {
    let document = Html::parse_document(&page.body);
    extract_album(&document, &page.url, photo_limit)
}

/// Fetches and extracts one album discovered on a listing
async fn fetch_album(
    fetcher: Arc<dyn PageFetcher>,
    dumper: Option<DebugDumper>,
    link: String,
    rendered: bool,
    photo_limit: usize,
) -> Option<Album> {
    let url = match Url::parse(&link) {
        Ok(url) => url,
        Err(e) => {
            tracing::warn!(%link, error = %e, "Unusable album link");
            return None;
        }
    };

    let page = match fetcher.fetch(&url, rendered).await {
        Ok(page) => page,
        Err(e) => {
            tracing::warn!(%link, error = %e, "Album fetch failed, omitting album");
            return None;
        }
    };

    if let Some(dumper) = &dumper {
        dumper.save("album", &page.url, &page.body).await;
    }

    let album = album_from_page(&page, photo_limit);
    tracing::debug!(%link, photos = album.photos.len(), "Album extracted");
    Some(album)
}

/// Main crawler coordinator structure
///
/// Holds only request-independent collaborators; every crawl builds its own
/// [`Scheduler`] and state.
pub struct Coordinator {
    fetcher: Arc<dyn PageFetcher>,
    dumper: DebugDumper,
}

impl Coordinator {
    /// Creates a coordinator around a fetch client and the debug dump location
    pub fn new(fetcher: Arc<dyn PageFetcher>, dumper: DebugDumper) -> Self {
        Self { fetcher, dumper }
    }

    /// The debug dump location, served back by the API
    pub fn dumper(&self) -> &DebugDumper {
        &self.dumper
    }

    fn request_dumper(&self, options: &CrawlOptions) -> Option<DebugDumper> {
        options.debug.then(|| self.dumper.clone())
    }

    /// Scrapes a single album page
    ///
    /// The page is extracted as an album without classification. The result
    /// holds that album, or nothing if the fetch failed.
    #[instrument(level = "info", skip_all, fields(%link))]
    pub async fn crawl_album(&self, link: &Url, options: &CrawlOptions) -> CrawlResult {
        let mut result = CrawlResult::new(link.as_str());

        let page = match self.fetcher.fetch(link, options.rendered).await {
            Ok(page) => page,
            Err(e) => {
                tracing::warn!(error = %e, "Album fetch failed");
                return result;
            }
        };

        if let Some(dumper) = self.request_dumper(options) {
            dumper.save("album", &page.url, &page.body).await;
        }

        result
            .albums
            .push(album_from_page(&page, options.photo_limit));
        result
    }

    /// Crawls a profile listing (or an album reached through one link)
    #[instrument(level = "info", skip_all, fields(%link))]
    pub async fn crawl_listing(&self, link: &Url, options: &CrawlOptions) -> CrawlResult {
        let mut result = CrawlResult::new(link.as_str());

        let page = match self.fetcher.fetch(link, options.rendered).await {
            Ok(page) => page,
            Err(e) => {
                tracing::warn!(error = %e, "Root fetch failed");
                return result;
            }
        };

        tracing::debug!(status = page.status, bytes = page.body.len(), "Root page fetched");

        let dumper = self.request_dumper(options);
        if let Some(dumper) = &dumper {
            dumper.save("router", &page.url, &page.body).await;
        }

        match route_page(&page, options.photo_limit) {
            PageOutcome::Album(album) => result.albums.push(album),
            PageOutcome::Listing(entries) => {
                result.albums = self.fan_out(entries, dumper, options).await;
            }
        }

        sort_albums(&mut result.albums);
        tracing::info!(albums = result.albums.len(), "Crawl finished");
        result
    }

    /// Dispatches album fetches for listing tiles and collects the albums
    async fn fan_out(
        &self,
        mut entries: Vec<ListingEntry>,
        dumper: Option<DebugDumper>,
        options: &CrawlOptions,
    ) -> Vec<Album> {
        let found = entries.len();

        // Newest first, so a limit keeps the most recent albums
        sort_entries(&mut entries);

        let concurrency = effective_concurrency(options.concurrency, options.entity_limit);
        tracing::info!(
            found,
            limit = options.entity_limit,
            concurrency,
            max = MAX_CONCURRENCY,
            "Dispatching album fetches"
        );

        // Only spawned fetches count against the limit; repeated tiles do not
        let mut scheduler = Scheduler::new(concurrency);
        let mut spawned = 0;
        for entry in entries {
            if options.entity_limit > 0 && spawned >= options.entity_limit {
                break;
            }

            let fetcher = Arc::clone(&self.fetcher);
            let dumper = dumper.clone();
            let rendered = options.rendered;
            let photo_limit = options.photo_limit;

            let dispatched = scheduler
                .dispatch(entry, move |link| {
                    fetch_album(fetcher, dumper, link, rendered, photo_limit)
                })
                .await;
            if dispatched {
                spawned += 1;
            }
        }

        tracing::debug!(
            dispatched = scheduler.context().dispatched(),
            "All album fetches dispatched"
        );
        scheduler.drain(options.deadline).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::crawler::fetcher::FetchError;
    use async_trait::async_trait;
    use std::collections::HashMap;
    use std::sync::Mutex;

    /// Serves canned pages and records every requested URL
    struct StaticFetcher {
        pages: HashMap<String, String>,
        requested: Mutex<Vec<String>>,
    }

    impl StaticFetcher {
        fn new(pages: &[(&str, &str)]) -> Arc<Self> {
            Arc::new(Self {
                pages: pages
                    .iter()
                    .map(|(url, body)| (url.to_string(), body.to_string()))
                    .collect(),
                requested: Mutex::new(Vec::new()),
            })
        }

        fn requested(&self) -> Vec<String> {
            self.requested.lock().unwrap().clone()
        }
    }

    #[async_trait]
    impl PageFetcher for StaticFetcher {
        async fn fetch(&self, url: &Url, _rendered: bool) -> Result<FetchedPage, FetchError> {
            self.requested.lock().unwrap().push(url.to_string());
            match self.pages.get(url.as_str()) {
                Some(body) => Ok(FetchedPage {
                    url: url.clone(),
                    status: 200,
                    body: body.clone(),
                }),
                None => Err(FetchError::Timeout {
                    url: url.to_string(),
                }),
            }
        }
    }

    const PROFILE: &str = "https://eu.zonerama.com/Someone/1234";

    fn options(entity_limit: usize, photo_limit: usize) -> CrawlOptions {
        CrawlOptions {
            photo_limit,
            entity_limit,
            concurrency: 4,
            rendered: false,
            debug: false,
            deadline: None,
        }
    }

    fn tile(id: u32, date: &str) -> String {
        format!(
            r#"<li class="list-alb" data-url="/Someone/Album/{id}"><p>{date} | <span>{id}</span> | <span>100</span></p></li>"#
        )
    }

    fn album_page(title: &str, date: &str, photo_ids: &[u32]) -> String {
        let photos: String = photo_ids
            .iter()
            .map(|id| format!(r#"<div data-type="photo" data-id="{}"></div>"#, id))
            .collect();
        format!(
            r#"<html><body><div class="row-name-album"><h2><span>{title}</span></h2>
               <div class="album-info"><span class="hide-on-phone">{date}</span></div></div>
               {photos}</body></html>"#
        )
    }

    fn coordinator(fetcher: Arc<StaticFetcher>) -> Coordinator {
        Coordinator::new(fetcher, DebugDumper::new("unused-debug-dir"))
    }

    #[tokio::test]
    async fn test_limit_keeps_newest_tile() {
        let profile = format!("<ul>{}{}</ul>", tile(1, "1. 1. 2024"), tile(2, "20. 9. 2025"));
        let fetcher = StaticFetcher::new(&[
            (PROFILE, profile.as_str()),
            (
                "https://eu.zonerama.com/Someone/Album/1",
                album_page("Old", "", &[1]).as_str(),
            ),
            (
                "https://eu.zonerama.com/Someone/Album/2",
                album_page("New", "", &[2]).as_str(),
            ),
        ]);

        let url = Url::parse(PROFILE).unwrap();
        let result = coordinator(fetcher.clone())
            .crawl_listing(&url, &options(1, 10))
            .await;

        assert_eq!(result.albums.len(), 1);
        assert_eq!(result.albums[0].title, "New");
        assert_eq!(result.albums[0].date, "20. 9. 2025");
        assert_eq!(result.albums[0].photo_count, 2);
        assert_eq!(result.albums[0].view_count, 100);
        assert_eq!(
            fetcher.requested(),
            vec![
                PROFILE.to_string(),
                "https://eu.zonerama.com/Someone/Album/2".to_string()
            ]
        );
    }

    #[tokio::test]
    async fn test_results_sorted_after_crawl() {
        let profile = format!(
            "<ul>{}{}{}</ul>",
            tile(1, "1. 1. 2024"),
            tile(2, ""),
            tile(3, "20. 9. 2025")
        );
        let fetcher = StaticFetcher::new(&[
            (PROFILE, profile.as_str()),
            (
                "https://eu.zonerama.com/Someone/Album/1",
                album_page("B", "", &[]).as_str(),
            ),
            (
                "https://eu.zonerama.com/Someone/Album/2",
                album_page("A", "", &[]).as_str(),
            ),
            (
                "https://eu.zonerama.com/Someone/Album/3",
                album_page("C", "| 5. 5. 2023", &[]).as_str(),
            ),
        ]);

        let url = Url::parse(PROFILE).unwrap();
        let result = coordinator(fetcher).crawl_listing(&url, &options(0, 10)).await;

        let titles: Vec<_> = result.albums.iter().map(|a| a.title.as_str()).collect();
        // Album 3's own page date wins over its tile date
        assert_eq!(titles, vec!["B", "C", "A"]);
        assert_eq!(result.albums[1].date, "5. 5. 2023");
    }

    #[tokio::test]
    async fn test_duplicate_tiles_fetched_once() {
        let profile = format!("<ul>{}{}</ul>", tile(1, "1. 1. 2024"), tile(1, "1. 1. 2024"));
        let fetcher = StaticFetcher::new(&[
            (PROFILE, profile.as_str()),
            (
                "https://eu.zonerama.com/Someone/Album/1",
                album_page("Only", "", &[]).as_str(),
            ),
        ]);

        let url = Url::parse(PROFILE).unwrap();
        let result = coordinator(fetcher.clone())
            .crawl_listing(&url, &options(0, 10))
            .await;

        assert_eq!(result.albums.len(), 1);
        assert_eq!(fetcher.requested().len(), 2);
    }

    #[tokio::test]
    async fn test_repeated_tile_does_not_use_up_limit() {
        let profile = format!(
            "<ul>{}{}{}</ul>",
            tile(1, "20. 9. 2025"),
            tile(1, "20. 9. 2025"),
            tile(2, "1. 1. 2024")
        );
        let fetcher = StaticFetcher::new(&[
            (PROFILE, profile.as_str()),
            (
                "https://eu.zonerama.com/Someone/Album/1",
                album_page("A1", "", &[]).as_str(),
            ),
            (
                "https://eu.zonerama.com/Someone/Album/2",
                album_page("A2", "", &[]).as_str(),
            ),
        ]);

        let url = Url::parse(PROFILE).unwrap();
        let result = coordinator(fetcher.clone())
            .crawl_listing(&url, &options(2, 10))
            .await;

        let titles: Vec<_> = result.albums.iter().map(|a| a.title.as_str()).collect();
        assert_eq!(titles, vec!["A1", "A2"]);
        assert_eq!(fetcher.requested().len(), 3);
    }

    #[tokio::test]
    async fn test_failed_album_fetch_is_omitted() {
        let profile = format!("<ul>{}</ul>", tile(9, "1. 1. 2024"));
        let fetcher = StaticFetcher::new(&[(PROFILE, profile.as_str())]);

        let url = Url::parse(PROFILE).unwrap();
        let result = coordinator(fetcher).crawl_listing(&url, &options(5, 10)).await;

        assert_eq!(result.input_link, PROFILE);
        assert!(result.albums.is_empty());
    }

    #[tokio::test]
    async fn test_failed_root_fetch_gives_empty_result() {
        let fetcher = StaticFetcher::new(&[]);
        let url = Url::parse(PROFILE).unwrap();
        let result = coordinator(fetcher).crawl_listing(&url, &options(5, 10)).await;

        assert!(result.albums.is_empty());
    }

    #[tokio::test]
    async fn test_root_album_page_is_extracted_directly() {
        let link = "https://eu.zonerama.com/Someone/Album/7";
        let body = album_page("Direct", "1. 1. 2024", &[1, 2, 3]);
        let fetcher = StaticFetcher::new(&[(link, body.as_str())]);

        let url = Url::parse(link).unwrap();
        let result = coordinator(fetcher.clone())
            .crawl_listing(&url, &options(5, 2))
            .await;

        assert_eq!(result.albums.len(), 1);
        assert_eq!(result.albums[0].photos.len(), 2);
        assert_eq!(fetcher.requested().len(), 1);
    }

    #[tokio::test]
    async fn test_crawl_album_skips_classification() {
        let link = "https://eu.zonerama.com/Someone/Album/7";
        // Tiles present, but single-album mode extracts photos anyway
        let body = format!(
            "<ul>{}</ul><div data-type=\"photo\" data-id=\"5\"></div>",
            tile(1, "")
        );
        let fetcher = StaticFetcher::new(&[(link, body.as_str())]);

        let url = Url::parse(link).unwrap();
        let result = coordinator(fetcher.clone())
            .crawl_album(&url, &options(5, 10))
            .await;

        assert_eq!(result.albums.len(), 1);
        assert_eq!(result.albums[0].photos[0].id, "5");
        assert_eq!(fetcher.requested().len(), 1);
    }

    #[tokio::test]
    async fn test_unmarked_root_yields_empty_listing() {
        let fetcher = StaticFetcher::new(&[(PROFILE, "<html><body>maintenance</body></html>")]);
        let url = Url::parse(PROFILE).unwrap();
        let result = coordinator(fetcher).crawl_listing(&url, &options(5, 10)).await;

        assert!(result.albums.is_empty());
    }

    #[test]
    fn test_options_from_config() {
        let options = CrawlOptions::from_config(&Config::default());
        assert_eq!(options.photo_limit, 10);
        assert_eq!(options.entity_limit, 5);
        assert_eq!(options.concurrency, 8);
        assert!(options.rendered);
        assert!(!options.debug);
        assert_eq!(options.deadline, None);
    }
}
