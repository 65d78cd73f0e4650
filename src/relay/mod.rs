//! Request flows behind the event protocol
//!
//! The relay ties the other components together for the two inbound requests:
//! - "start scrape": admit the URL, crawl, cache the pages, summarize
//! - "chat question": look up the cached pages and answer from them
//!
//! Every failed request produces exactly one Error event; the cause is logged
//! before the short client-facing message is sent.

use crate::browser::HttpBrowserProvider;
use crate::config::Config;
use crate::crawler::{CrawlSettings, Crawler};
use crate::protocol::{demultiplex, ChatRequest, EventChannel, InboundHandler, ScrapeRequest};
use crate::session::SessionStore;
use crate::state::progress::{ACCEPTED, ANSWERING, SUMMARIZING};
use crate::summarizer::{fallback_summary, Summarizer};
use crate::url::{extract_domain, NormalizedUrl, UrlGuard};
use crate::ScoutError;
use async_trait::async_trait;
use std::sync::Arc;

/// Page budget bounds for scrape requests
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PageLimits {
    /// Budget used when the request names none
    pub default_max_pages: u32,

    /// Largest budget a request may ask for
    pub max_pages_limit: u32,
}

impl Default for PageLimits {
    fn default() -> Self {
        Self {
            default_max_pages: 5,
            max_pages_limit: 50,
        }
    }
}

impl From<&Config> for PageLimits {
    fn from(config: &Config) -> Self {
        Self {
            default_max_pages: config.crawler.default_max_pages,
            max_pages_limit: config.crawler.max_pages_limit,
        }
    }
}

/// A scrape request that passed validation
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AdmittedScrape {
    pub url: NormalizedUrl,
    pub max_pages: u32,
}

/// Handles inbound requests for all connections
///
/// Cheap to clone; clones share the crawler, the session store and the
/// summarizer.
#[derive(Clone)]
pub struct Relay {
    crawler: Crawler,
    sessions: Arc<SessionStore>,
    summarizer: Option<Arc<dyn Summarizer>>,
    guard: UrlGuard,
    limits: PageLimits,
}

impl Relay {
    /// Creates a relay with the strict URL guard, default limits and no summarizer
    pub fn new(crawler: Crawler, sessions: Arc<SessionStore>) -> Self {
        Self {
            crawler,
            sessions,
            summarizer: None,
            guard: UrlGuard::strict(),
            limits: PageLimits::default(),
        }
    }

    /// Wires the bundled HTTP browser and session store from configuration
    pub fn from_config(config: &Config, summarizer: Option<Arc<dyn Summarizer>>) -> Self {
        let guard = UrlGuard::with_private_hosts(config.crawler.allow_private_hosts);
        let provider = HttpBrowserProvider::new(config.user_agent.clone(), guard);
        let crawler = Crawler::new(Arc::new(provider), CrawlSettings::from(&config.crawler));
        let sessions = Arc::new(SessionStore::new(config.sessions.ttl()));

        let relay = Self::new(crawler, sessions)
            .with_guard(guard)
            .with_limits(PageLimits::from(config));
        match summarizer {
            Some(summarizer) => relay.with_summarizer(summarizer),
            None => relay,
        }
    }

    pub fn with_summarizer(mut self, summarizer: Arc<dyn Summarizer>) -> Self {
        self.summarizer = Some(summarizer);
        self
    }

    pub fn with_guard(mut self, guard: UrlGuard) -> Self {
        self.guard = guard;
        self
    }

    pub fn with_limits(mut self, limits: PageLimits) -> Self {
        self.limits = limits;
        self
    }

    pub fn sessions(&self) -> &Arc<SessionStore> {
        &self.sessions
    }

    /// Parses and handles one raw inbound frame
    pub async fn dispatch(&self, channel: &EventChannel, raw: &str) {
        demultiplex(channel, raw, self).await;
    }

    /// Validates a scrape request without starting it
    ///
    /// Used by both the WebSocket flow and `POST /api/scrape`.
    ///
    /// # Returns
    ///
    /// * `Ok(AdmittedScrape)` - Normalized URL and effective page budget
    /// * `Err(ScoutError::InvalidRequest)` - Page budget out of range
    /// * `Err(ScoutError::Validation)` - URL refused by the guard
    pub fn admit(&self, request: &ScrapeRequest) -> Result<AdmittedScrape, ScoutError> {
        let max_pages = match request.max_pages {
            None => self.limits.default_max_pages,
            Some(n) if (1..=i64::from(self.limits.max_pages_limit)).contains(&n) => n as u32,
            Some(n) => {
                return Err(ScoutError::InvalidRequest(format!(
                    "maxPages must be between 1 and {}, got {}",
                    self.limits.max_pages_limit, n
                )))
            }
        };

        let url = self.guard.normalize(&request.url)?;
        Ok(AdmittedScrape { url, max_pages })
    }

    /// Runs the "start scrape" flow, reporting on `channel`
    pub async fn start_scrape(&self, channel: &EventChannel, request: ScrapeRequest) {
        if let Err(e) = self.run_scrape(channel, &request).await {
            tracing::error!(
                "Scrape of '{}' for client {} failed: {:?}",
                request.url,
                channel.client_id(),
                e
            );
            let message = match e {
                ScoutError::GenerationFailed(_) => "Failed to generate summary with AI".to_string(),
                other => other.to_string(),
            };
            channel.error(message);
        }
    }

    /// Runs the "chat question" flow, reporting on `channel`
    pub async fn chat_question(&self, channel: &EventChannel, request: ChatRequest) {
        if let Err(e) = self.run_chat(channel, &request).await {
            tracing::error!(
                "Chat question for session {:?} from client {} failed: {:?}",
                request.session_id,
                channel.client_id(),
                e
            );
            let message = match e {
                ScoutError::GenerationFailed(_) => "Failed to answer question with AI".to_string(),
                other => other.to_string(),
            };
            channel.error(message);
        }
    }

    async fn run_scrape(
        &self,
        channel: &EventChannel,
        request: &ScrapeRequest,
    ) -> Result<(), ScoutError> {
        let AdmittedScrape { url, max_pages } = self.admit(request)?;
        tracing::info!(
            "Scrape requested by client {}: {} (domain {}, max {} pages)",
            channel.client_id(),
            url,
            extract_domain(url.as_url()).unwrap_or_default(),
            max_pages
        );

        channel.status("Starting web scraping...", ACCEPTED, url.as_str());

        let pages = self.crawler.crawl(&url, max_pages as usize, channel).await?;
        if pages.is_empty() {
            return Err(ScoutError::EmptyCrawl {
                url: url.to_string(),
            });
        }

        let page_count = pages.len();
        let session_id = self.sessions.create(url.clone(), pages.clone());

        let Some(summarizer) = &self.summarizer else {
            tracing::warn!("No summarizer configured; sending page listing for {}", url);
            channel.summary(fallback_summary(&pages), page_count, Some(session_id));
            return Ok(());
        };

        channel.status("Analyzing content with AI...", SUMMARIZING, "");

        let summary = summarizer.summarize(&pages, &url).await?;

        channel.summary(
            with_footer(&summary, page_count, summarizer.model()),
            page_count,
            Some(session_id),
        );
        Ok(())
    }

    async fn run_chat(&self, channel: &EventChannel, request: &ChatRequest) -> Result<(), ScoutError> {
        let question = non_blank(request.question.as_deref());
        let session_id = non_blank(request.session_id.as_deref());
        let (Some(question), Some(session_id)) = (question, session_id) else {
            return Err(ScoutError::InvalidRequest("Invalid chat request".to_string()));
        };

        let session = self
            .sessions
            .get(session_id)
            .ok_or_else(|| ScoutError::SessionExpired {
                session_id: session_id.to_string(),
            })?;

        let summarizer = self
            .summarizer
            .as_ref()
            .ok_or(ScoutError::SummarizerUnavailable)?;

        channel.status("Thinking...", ANSWERING, "");

        let answer = summarizer
            .answer(question, &session.pages, &session.origin_url)
            .await?;
        channel.chat_response(answer);
        Ok(())
    }
}

#[async_trait]
impl InboundHandler for Relay {
    async fn on_start_scrape(&self, channel: &EventChannel, request: ScrapeRequest) {
        self.start_scrape(channel, request).await;
    }

    async fn on_chat_question(&self, channel: &EventChannel, request: ChatRequest) {
        self.chat_question(channel, request).await;
    }
}

/// Appends the pages/model footer shown under every generated summary
pub fn with_footer(summary: &str, pages_analyzed: usize, model: &str) -> String {
    format!(
        "{}\n\n---\n\n**Pages Analyzed:** {} | **Model:** {}",
        summary, pages_analyzed, model
    )
}

fn non_blank(value: Option<&str>) -> Option<&str> {
    value.map(str::trim).filter(|v| !v.is_empty())
}
