//! Crawler coordinator - main crawl orchestration logic
//!
//! This module contains the crawl loop for a single request, including:
//! - Provisioning and connecting a browser session
//! - Breadth-first traversal of the origin's pages within the page budget
//! - Content extraction and link discovery
//! - Progress reporting on the request's event channel
//! - Unconditional teardown of the browser session

use crate::browser::{BrowserHandle, BrowserProvider, NON_CONTENT_SELECTORS};
use crate::config::CrawlerConfig;
use crate::crawler::content::clean_text;
use crate::crawler::frontier::Frontier;
use crate::crawler::links::extract_links;
use crate::crawler::page::PageRecord;
use crate::protocol::EventChannel;
use crate::state::progress::{CONNECTING, CRAWL_COMPLETE, PROVISIONING, TRAVERSAL_START};
use crate::state::{CrawlPhase, CrawlProgress};
use crate::url::NormalizedUrl;
use crate::ScoutError;
use std::sync::Arc;
use std::time::Duration;

/// Timing and size limits applied to every crawl
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CrawlSettings {
    /// Navigation timeout per page
    pub page_timeout: Duration,

    /// Time to let a page settle after navigation
    pub settle_time: Duration,

    /// Delay between successive page fetches
    pub politeness_delay: Duration,

    /// Maximum characters of text kept per page
    pub content_limit: usize,
}

impl Default for CrawlSettings {
    fn default() -> Self {
        Self::from(&CrawlerConfig::default())
    }
}

impl From<&CrawlerConfig> for CrawlSettings {
    fn from(config: &CrawlerConfig) -> Self {
        Self {
            page_timeout: Duration::from_millis(config.page_timeout),
            settle_time: Duration::from_millis(config.settle_time),
            politeness_delay: Duration::from_millis(config.politeness_delay),
            content_limit: config.content_limit,
        }
    }
}

/// Crawls one origin per call through a browser provider
///
/// A `Crawler` holds no per-crawl state, so one instance is shared by every
/// request the server handles.
#[derive(Clone)]
pub struct Crawler {
    provider: Arc<dyn BrowserProvider>,
    settings: CrawlSettings,
}

impl Crawler {
    /// Creates a new crawler
    ///
    /// # Arguments
    ///
    /// * `provider` - Source of browser sessions
    /// * `settings` - Timing and size limits
    pub fn new(provider: Arc<dyn BrowserProvider>, settings: CrawlSettings) -> Self {
        Self { provider, settings }
    }

    pub fn settings(&self) -> &CrawlSettings {
        &self.settings
    }

    /// Crawls `origin` breadth-first, staying on its host
    ///
    /// # Crawl Flow
    ///
    /// 1. Provision a browser session (progress 5)
    /// 2. Connect to it (progress 10)
    /// 3. Visit pages from the frontier until it is empty or `max_pages` pages
    ///    were captured (progress 15 to 85)
    /// 4. Close the page and end the session (progress 90)
    ///
    /// Pages that fail to load are logged and skipped. Only provisioning or
    /// connection failures abort the crawl; the session is ended on every path
    /// once it exists.
    ///
    /// # Arguments
    ///
    /// * `origin` - Admitted start URL; also the host scope
    /// * `max_pages` - Page budget
    /// * `sink` - Channel receiving status updates
    ///
    /// # Returns
    ///
    /// * `Ok(Vec<PageRecord>)` - Pages in visit order, possibly empty
    /// * `Err(ScoutError::Provisioning)` - No usable browser session
    pub async fn crawl(
        &self,
        origin: &NormalizedUrl,
        max_pages: usize,
        sink: &EventChannel,
    ) -> Result<Vec<PageRecord>, ScoutError> {
        let mut progress = CrawlProgress::new(max_pages);

        if max_pages == 0 {
            sink.status(
                "Crawling complete! Analyzed 0 pages.",
                progress.report(CRAWL_COMPLETE),
                "",
            );
            return Ok(Vec::new());
        }

        let mut phase = PhaseTracker::new(origin);

        sink.status(
            "Initializing browser session...",
            progress.report(PROVISIONING),
            "",
        );
        let session_id = match self.provider.create_session().await {
            Ok(id) => id,
            Err(e) => {
                tracing::error!("Failed to create browser session for {}: {}", origin, e);
                phase.advance(CrawlPhase::Done);
                return Err(ScoutError::Provisioning(e));
            }
        };

        phase.advance(CrawlPhase::Connecting);
        sink.status("Connecting to browser...", progress.report(CONNECTING), "");
        let mut handle = match self.provider.connect(&session_id).await {
            Ok(handle) => handle,
            Err(e) => {
                tracing::error!(
                    "Failed to connect to browser session {} for {}: {}",
                    session_id,
                    origin,
                    e
                );
                phase.advance(CrawlPhase::Finalizing);
                self.provider.end_session(&session_id).await;
                phase.advance(CrawlPhase::Done);
                return Err(ScoutError::Provisioning(e));
            }
        };

        phase.advance(CrawlPhase::Traversing);
        sink.status(
            "Browser connected, starting crawl...",
            progress.report(TRAVERSAL_START),
            origin.as_str(),
        );

        let pages = self
            .traverse(handle.as_mut(), origin, &mut progress, sink)
            .await;

        phase.advance(CrawlPhase::Finalizing);
        handle.close().await;
        self.provider.end_session(&session_id).await;
        phase.advance(CrawlPhase::Done);

        tracing::info!("Crawl of {} finished with {} pages", origin, pages.len());
        sink.status(
            format!("Crawling complete! Analyzed {} pages.", pages.len()),
            progress.report(CRAWL_COMPLETE),
            "",
        );

        Ok(pages)
    }

    /// Runs the page loop; never fails, individual pages may
    async fn traverse(
        &self,
        handle: &mut dyn BrowserHandle,
        origin: &NormalizedUrl,
        progress: &mut CrawlProgress,
        sink: &EventChannel,
    ) -> Vec<PageRecord> {
        let mut frontier = Frontier::new(origin.clone());
        let mut pages = Vec::new();

        while !progress.budget_exhausted() {
            let Some(url) = frontier.pop_next() else {
                break;
            };

            tracing::debug!("Visiting {}", url);
            match self.visit(handle, &url).await {
                Ok((record, html)) => {
                    let added = frontier.extend(extract_links(&html, &url, origin));
                    tracing::info!(
                        "Scraped {} ({} new links, {} pending)",
                        url,
                        added,
                        frontier.pending_count()
                    );
                    pages.push(record);
                    progress.record_fetched();
                }
                Err(e) => {
                    tracing::warn!("Skipping page: {}", e);
                    progress.record_failed();
                }
            }

            sink.status(
                format!(
                    "Crawled {} of {} pages...",
                    progress.fetched(),
                    progress.max_pages()
                ),
                progress.traversal_percent(),
                url.as_str(),
            );

            if !progress.budget_exhausted() && !frontier.is_empty() {
                tokio::time::sleep(self.settings.politeness_delay).await;
            }
        }

        pages
    }

    /// Loads one page and turns it into a record plus its raw markup
    async fn visit(
        &self,
        handle: &mut dyn BrowserHandle,
        url: &NormalizedUrl,
    ) -> Result<(PageRecord, String), ScoutError> {
        let fetch_error = |source| ScoutError::PageFetch {
            url: url.to_string(),
            source,
        };

        handle
            .navigate(url, self.settings.page_timeout)
            .await
            .map_err(fetch_error)?;
        handle.wait(self.settings.settle_time).await;

        let html = handle.html().await.map_err(fetch_error)?;
        let title = handle.title().await.map_err(fetch_error)?;
        let text = handle
            .visible_text(NON_CONTENT_SELECTORS)
            .await
            .map_err(fetch_error)?;

        let record = PageRecord::new(
            url.clone(),
            title.trim(),
            clean_text(&text, self.settings.content_limit),
        );
        Ok((record, html))
    }
}

/// Logs phase changes for one crawl and checks they are legal
struct PhaseTracker<'a> {
    origin: &'a NormalizedUrl,
    phase: CrawlPhase,
}

impl<'a> PhaseTracker<'a> {
    fn new(origin: &'a NormalizedUrl) -> Self {
        tracing::debug!("Crawl of {} entering {}", origin, CrawlPhase::Provisioning);
        Self {
            origin,
            phase: CrawlPhase::Provisioning,
        }
    }

    fn advance(&mut self, next: CrawlPhase) {
        debug_assert!(
            self.phase.can_transition_to(next),
            "illegal crawl phase transition {} -> {}",
            self.phase,
            next
        );
        tracing::debug!("Crawl of {} entering {}", self.origin, next);
        self.phase = next;
    }
}
