//! Headless Chromium rendering (feature `render`)
//!
//! The browser is launched on first use and shared by every request of the
//! process. It is relaunched when its event handler has stopped. Each render
//! opens its own tab, and the tab is closed on every exit path, including
//! failures and timeouts.

use super::fetcher::{FetchError, FetchedPage};
use async_trait::async_trait;
use chromiumoxide::browser::{Browser, BrowserConfig};
use chromiumoxide::Page;
use futures::StreamExt;
use std::future::Future;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::Mutex;
use tokio::task::JoinHandle;
use url::Url;

/// A browser tab that has to be closed asynchronously
#[async_trait]
trait Tab: Sized + Send + 'static {
    async fn close_tab(self);
}

#[async_trait]
impl Tab for Page {
    async fn close_tab(self) {
        if let Err(e) = self.close().await {
            tracing::debug!(error = %e, "Could not close browser tab");
        }
    }
}

/// Closes its tab when dropped, so cancelled renders do not leak tabs
struct TabGuard<T: Tab> {
    tab: Option<T>,
}

impl<T: Tab> TabGuard<T> {
    fn new(tab: T) -> Self {
        Self { tab: Some(tab) }
    }

    /// Closes the tab and waits for the browser to confirm
    async fn close(mut self) {
        if let Some(tab) = self.tab.take() {
            tab.close_tab().await;
        }
    }
}

impl<T: Tab> Drop for TabGuard<T> {
    fn drop(&mut self) {
        if let Some(tab) = self.tab.take() {
            match tokio::runtime::Handle::try_current() {
                Ok(handle) => {
                    handle.spawn(tab.close_tab());
                }
                Err(_) => tracing::debug!("No runtime left to close browser tab"),
            }
        }
    }
}

/// A launched browser together with the task driving its event stream
struct Launched<B> {
    browser: Arc<B>,
    handler: JoinHandle<()>,
}

/// Holds the shared browser and relaunches it once its handler has ended
struct BrowserSlot<B> {
    current: Mutex<Option<Launched<B>>>,
}

impl<B> BrowserSlot<B> {
    fn new() -> Self {
        Self {
            current: Mutex::new(None),
        }
    }

    async fn get_or_launch<F, Fut, E>(&self, launch: F) -> Result<Arc<B>, E>
    where
        F: FnOnce() -> Fut,
        Fut: Future<Output = Result<(B, JoinHandle<()>), E>>,
    {
        let mut current = self.current.lock().await;

        if let Some(launched) = current.as_ref() {
            if !launched.handler.is_finished() {
                return Ok(Arc::clone(&launched.browser));
            }
            tracing::warn!("Headless browser stopped, relaunching");
        }

        let (browser, handler) = launch().await?;
        let browser = Arc::new(browser);
        *current = Some(Launched {
            browser: Arc::clone(&browser),
            handler,
        });
        Ok(browser)
    }
}

pub struct Renderer {
    browser: BrowserSlot<Browser>,
    timeout: Duration,
}

impl Renderer {
    pub fn new(timeout: Duration) -> Self {
        Self {
            browser: BrowserSlot::new(),
            timeout,
        }
    }

    async fn browser(&self, url: &Url) -> Result<Arc<Browser>, FetchError> {
        self.browser
            .get_or_launch(move || async move {
                let config = BrowserConfig::builder()
                    .build()
                    .map_err(|message| render_error(url, message))?;
                let (browser, mut handler) = Browser::launch(config)
                    .await
                    .map_err(|e| render_error(url, e.to_string()))?;

                let handler = tokio::spawn(async move {
                    while let Some(event) = handler.next().await {
                        if event.is_err() {
                            break;
                        }
                    }
                });

                tracing::info!("Launched headless browser");
                Ok((browser, handler))
            })
            .await
    }

    /// Loads the page, waits for navigation and returns the serialized DOM
    pub async fn render(&self, url: &Url) -> Result<FetchedPage, FetchError> {
        let browser = self.browser(url).await?;

        let page = tokio::time::timeout(self.timeout, browser.new_page("about:blank"))
            .await
            .map_err(|_| FetchError::Timeout {
                url: url.to_string(),
            })?
            .map_err(|e| render_error(url, e.to_string()))?;
        let tab = TabGuard::new(page.clone());

        let rendered = tokio::time::timeout(self.timeout, async {
            page.goto(url.as_str()).await?;
            page.wait_for_navigation().await?;
            let body = page.content().await?;
            let final_url = page.url().await?;
            Ok::<_, chromiumoxide::error::CdpError>((body, final_url))
        })
        .await;

        tab.close().await;

        match rendered {
            Err(_) => Err(FetchError::Timeout {
                url: url.to_string(),
            }),
            Ok(Err(e)) => Err(render_error(url, e.to_string())),
            Ok(Ok((body, final_url))) => Ok(FetchedPage {
                url: final_url
                    .and_then(|u| Url::parse(&u).ok())
                    .unwrap_or_else(|| url.clone()),
                status: 200,
                body,
            }),
        }
    }
}

fn render_error(url: &Url, message: String) -> FetchError {
    FetchError::Render {
        url: url.to_string(),
        message,
    }
}
