//! Scheduler for album fetches discovered on a listing page
//!
//! This module handles:
//! - Deduplicating album links before dispatch
//! - Global concurrency limiting via a semaphore
//! - Collecting finished albums under a single lock
//! - Waiting for every dispatched fetch (optionally under a deadline)
//!
//! All state belongs to one crawl; nothing is shared between requests.

use crate::model::{merge, Album, ListingEntry, Preliminary};
use std::collections::{HashMap, HashSet};
use std::future::Future;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use std::time::Duration;
use tokio::sync::{OwnedSemaphorePermit, Semaphore};
use tokio::task::JoinSet;

/// Upper bound for a caller-requested concurrency
pub const MAX_CONCURRENCY: usize = 100;

/// Computes the permit pool size for a listing crawl
///
/// The configured concurrency is clamped to `1..=MAX_CONCURRENCY` and, when a
/// positive album limit is set, to at most that limit.
///
/// # Examples
///
/// ```
/// use zonerama_scraper::crawler::effective_concurrency;
///
/// assert_eq!(effective_concurrency(8, 5), 5);
/// assert_eq!(effective_concurrency(8, 0), 8);
/// assert_eq!(effective_concurrency(0, 0), 1);
/// ```
pub fn effective_concurrency(configured: usize, entity_limit: usize) -> usize {
    let mut concurrency = configured.clamp(1, MAX_CONCURRENCY);
    if entity_limit > 0 {
        concurrency = concurrency.min(entity_limit);
    }
    concurrency
}

/// Mutable crawl state, always locked as a unit
#[derive(Debug, Default)]
struct CrawlState {
    albums: Vec<Album>,
    visited: HashSet<String>,
    preliminary: HashMap<String, Preliminary>,
}

/// Per-request crawl context handed to every album task
#[derive(Debug)]
pub struct CrawlContext {
    state: Mutex<CrawlState>,
    permits: Arc<Semaphore>,
}

impl CrawlContext {
    /// Creates a context with a permit pool of the given size (at least 1)
    pub fn new(concurrency: usize) -> Self {
        Self {
            state: Mutex::new(CrawlState::default()),
            permits: Arc::new(Semaphore::new(concurrency.max(1))),
        }
    }

    // A panicking album task must not take the whole result set with it
    fn lock(&self) -> MutexGuard<'_, CrawlState> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Marks an album link as dispatched and records its tile metadata, if any
    ///
    /// Returns false if the link was already claimed in this crawl; the
    /// membership check and both insertions happen under one lock.
    pub fn claim(&self, entry: &ListingEntry) -> bool {
        let mut state = self.lock();
        if !state.visited.insert(entry.link.clone()) {
            return false;
        }
        if !entry.preliminary.is_empty() {
            state
                .preliminary
                .insert(entry.link.clone(), entry.preliminary.clone());
        }
        true
    }

    /// Merges a finished album with the tile metadata of the link it was
    /// dispatched for and appends it to the result set
    pub fn complete(&self, link: &str, album: Album) {
        let mut state = self.lock();
        let album = match state.preliminary.get(link) {
            Some(preliminary) => merge(album, preliminary),
            None => album,
        };
        state.albums.push(album);
    }

    /// Number of distinct links dispatched so far
    pub fn dispatched(&self) -> usize {
        self.lock().visited.len()
    }

    /// Takes the collected albums, in completion order
    pub fn take_albums(&self) -> Vec<Album> {
        std::mem::take(&mut self.lock().albums)
    }

    /// Waits for a free slot in the permit pool
    async fn acquire(&self) -> Option<OwnedSemaphorePermit> {
        Arc::clone(&self.permits).acquire_owned().await.ok()
    }
}

/// Dispatches album fetches and waits for them to finish
pub struct Scheduler {
    context: Arc<CrawlContext>,
    tasks: JoinSet<()>,
}

impl Scheduler {
    /// Creates a scheduler with a permit pool of `concurrency` slots
    pub fn new(concurrency: usize) -> Self {
        Self {
            context: Arc::new(CrawlContext::new(concurrency)),
            tasks: JoinSet::new(),
        }
    }

    /// The crawl context shared with album tasks
    pub fn context(&self) -> &Arc<CrawlContext> {
        &self.context
    }

    /// Dispatches one album fetch unless its link was already dispatched
    ///
    /// Waits for a permit before spawning. The permit travels with the task
    /// and is released when the task ends, whatever the outcome. A task that
    /// yields `None` contributes nothing to the result set.
    ///
    /// Returns true if a task was spawned.
    pub async fn dispatch<F, Fut>(&mut self, entry: ListingEntry, work: F) -> bool
    where
        F: FnOnce(String) -> Fut,
        Fut: Future<Output = Option<Album>> + Send + 'static,
    {
        if !self.context.claim(&entry) {
            tracing::debug!(link = %entry.link, "Album already dispatched, skipping");
            return false;
        }

        let Some(permit) = self.context.acquire().await else {
            tracing::warn!(link = %entry.link, "Permit pool closed, album skipped");
            return false;
        };

        let context = Arc::clone(&self.context);
        let link = entry.link;
        let fetch = work(link.clone());

        self.tasks.spawn(async move {
            let _permit = permit;
            if let Some(album) = fetch.await {
                context.complete(&link, album);
            }
        });

        true
    }

    /// Blocks until every dispatched task has finished and returns the albums
    ///
    /// With a deadline, tasks still running when it expires are aborted and
    /// whatever finished so far is returned.
    pub async fn drain(mut self, deadline: Option<Duration>) -> Vec<Album> {
        let outstanding = self.tasks.len();
        tracing::debug!(outstanding, "Waiting for album fetches");

        let tasks = &mut self.tasks;
        let wait = async move {
            while let Some(joined) = tasks.join_next().await {
                if let Err(e) = joined {
                    tracing::warn!(error = %e, "Album task failed");
                }
            }
        };

        match deadline {
            Some(limit) => {
                let expired = tokio::time::timeout(limit, wait).await.is_err();
                if expired {
                    tracing::warn!(
                        deadline = ?limit,
                        remaining = self.tasks.len(),
                        "Crawl deadline reached, abandoning outstanding fetches"
                    );
                    self.tasks.abort_all();
                }
            }
            None => wait.await,
        }

        self.context.take_albums()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicUsize, Ordering};

    fn entry(link: &str, date: &str) -> ListingEntry {
        ListingEntry {
            link: link.to_string(),
            preliminary: Preliminary {
                date: date.to_string(),
                photo_count: 3,
                view_count: 0,
            },
        }
    }

    fn album(link: &str) -> Album {
        Album::new(link)
    }

    #[test]
    fn test_effective_concurrency() {
        assert_eq!(effective_concurrency(8, 5), 5);
        assert_eq!(effective_concurrency(8, 0), 8);
        assert_eq!(effective_concurrency(8, 20), 8);
        assert_eq!(effective_concurrency(0, 3), 1);
        assert_eq!(effective_concurrency(1_000_000, 0), MAX_CONCURRENCY);
    }

    #[test]
    fn test_claim_is_once_per_link() {
        let context = CrawlContext::new(2);
        assert!(context.claim(&entry("https://z/Album/1", "1. 1. 2024")));
        assert!(!context.claim(&entry("https://z/Album/1", "2. 2. 2024")));
        assert!(context.claim(&entry("https://z/Album/2", "")));
        assert_eq!(context.dispatched(), 2);
    }

    #[test]
    fn test_complete_merges_first_claimed_metadata() {
        let context = CrawlContext::new(1);
        context.claim(&entry("https://z/Album/1", "1. 1. 2024"));
        context.claim(&entry("https://z/Album/1", "2. 2. 2024"));
        context.complete("https://z/Album/1", album("https://z/Album/1"));

        let albums = context.take_albums();
        assert_eq!(albums.len(), 1);
        assert_eq!(albums[0].date, "1. 1. 2024");
        assert_eq!(albums[0].photo_count, 3);
    }

    #[test]
    fn test_tile_without_metadata_leaves_album_untouched() {
        let context = CrawlContext::new(1);
        let mut bare = entry("https://z/Album/1", "");
        bare.preliminary.photo_count = 0;
        context.claim(&bare);

        let mut page_album = album("https://z/Album/1");
        page_album.date = "5. 5. 2023".to_string();
        context.complete("https://z/Album/1", page_album.clone());

        assert_eq!(context.take_albums(), vec![page_album]);
    }

    #[tokio::test]
    async fn test_dispatch_skips_duplicates() {
        let mut scheduler = Scheduler::new(2);
        let calls = Arc::new(AtomicUsize::new(0));

        for link in ["https://z/Album/1", "https://z/Album/1", "https://z/Album/2"] {
            let calls = Arc::clone(&calls);
            scheduler
                .dispatch(entry(link, ""), move |link| async move {
                    calls.fetch_add(1, Ordering::SeqCst);
                    Some(album(&link))
                })
                .await;
        }

        assert_eq!(scheduler.context().dispatched(), 2);
        let albums = scheduler.drain(None).await;
        assert_eq!(albums.len(), 2);
        assert_eq!(calls.load(Ordering::SeqCst), 2);
    }

    #[tokio::test]
    async fn test_concurrency_never_exceeds_pool() {
        let mut scheduler = Scheduler::new(2);
        let running = Arc::new(AtomicUsize::new(0));
        let peak = Arc::new(AtomicUsize::new(0));

        for i in 0..6 {
            let running = Arc::clone(&running);
            let peak = Arc::clone(&peak);
            scheduler
                .dispatch(entry(&format!("https://z/Album/{}", i), ""), move |link| async move {
                    let now = running.fetch_add(1, Ordering::SeqCst) + 1;
                    peak.fetch_max(now, Ordering::SeqCst);
                    tokio::time::sleep(Duration::from_millis(20)).await;
                    running.fetch_sub(1, Ordering::SeqCst);
                    Some(album(&link))
                })
                .await;
        }

        let albums = scheduler.drain(None).await;
        assert_eq!(albums.len(), 6);
        assert!(peak.load(Ordering::SeqCst) <= 2);
    }

    #[tokio::test]
    async fn test_empty_outcome_releases_permit() {
        let mut scheduler = Scheduler::new(1);

        scheduler
            .dispatch(entry("https://z/Album/1", ""), |_| async { None })
            .await;
        // Would wait forever if the first task kept its permit
        scheduler
            .dispatch(entry("https://z/Album/2", ""), |link| async move {
                Some(album(&link))
            })
            .await;

        let albums = scheduler.drain(None).await;
        assert_eq!(albums.len(), 1);
        assert_eq!(albums[0].url, "https://z/Album/2");
    }

    #[tokio::test]
    async fn test_panicking_task_releases_permit() {
        let mut scheduler = Scheduler::new(1);

        scheduler
            .dispatch(entry("https://z/Album/1", ""), |_| async {
                panic!("extraction blew up");
            })
            .await;
        scheduler
            .dispatch(entry("https://z/Album/2", ""), |link| async move {
                Some(album(&link))
            })
            .await;

        let albums = scheduler.drain(None).await;
        assert_eq!(albums.len(), 1);
    }

    #[tokio::test]
    async fn test_deadline_returns_partial_results() {
        let mut scheduler = Scheduler::new(2);

        scheduler
            .dispatch(entry("https://z/Album/fast", ""), |link| async move {
                Some(album(&link))
            })
            .await;
        scheduler
            .dispatch(entry("https://z/Album/slow", ""), |link| async move {
                tokio::time::sleep(Duration::from_secs(30)).await;
                Some(album(&link))
            })
            .await;

        let albums = scheduler.drain(Some(Duration::from_millis(200))).await;
        assert_eq!(albums.len(), 1);
        assert_eq!(albums[0].url, "https://z/Album/fast");
    }
}
