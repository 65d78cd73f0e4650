//! Browser session boundary
//!
//! The crawler never talks to a rendering service directly. It goes through two
//! traits:
//! - `BrowserProvider`: provisions, connects to and tears down remote sessions
//! - `BrowserHandle`: drives one page inside a connected session
//!
//! `HttpBrowserProvider` is the bundled implementation. It fetches pages with a
//! plain HTTP client and extracts text from the static markup, which is enough for
//! server-rendered sites and for tests.

mod extract;
#[cfg(test)]
pub(crate) mod fake;
mod http;

pub use extract::{extract_title, extract_visible_text};
pub use http::{build_http_client, HttpBrowserProvider, HttpPage};

use crate::url::NormalizedUrl;
use async_trait::async_trait;
use std::time::Duration;
use thiserror::Error;

/// Elements whose text never counts as page content
pub const NON_CONTENT_SELECTORS: &[&str] = &[
    "script", "style", "noscript", "iframe", "nav", "footer", "header",
];

/// Failures reported by a browser session
#[derive(Debug, Error)]
pub enum BrowserError {
    #[error("Navigation to {url} timed out")]
    Timeout { url: String },

    #[error("{url} returned HTTP {status}")]
    HttpStatus { url: String, status: u16 },

    #[error("{url} is not an HTML page (content-type: {content_type})")]
    ContentMismatch { url: String, content_type: String },

    #[error("Network error for {url}: {message}")]
    Network { url: String, message: String },

    #[error("No page has been loaded")]
    NoPage,

    #[error("Browser client error: {0}")]
    Client(String),
}

/// Provisions remote browser sessions
///
/// One session is created per crawl and ended exactly once, whatever the outcome
/// of the crawl.
#[async_trait]
pub trait BrowserProvider: Send + Sync {
    /// Creates a new remote session and returns its identifier
    async fn create_session(&self) -> Result<String, BrowserError>;

    /// Connects to a session created by [`BrowserProvider::create_session`]
    async fn connect(&self, session_id: &str) -> Result<Box<dyn BrowserHandle>, BrowserError>;

    /// Releases the remote session; errors are logged, never returned
    async fn end_session(&self, session_id: &str);
}

/// A single page inside a connected browser session
#[async_trait]
pub trait BrowserHandle: Send {
    /// Loads `url`, failing if it does not finish within `timeout`
    async fn navigate(&mut self, url: &NormalizedUrl, timeout: Duration)
        -> Result<(), BrowserError>;

    /// Lets the current page settle (late scripts, lazy content)
    async fn wait(&mut self, duration: Duration) {
        tokio::time::sleep(duration).await;
    }

    /// Raw markup of the current page
    async fn html(&mut self) -> Result<String, BrowserError>;

    /// Visible text of the current page, skipping elements matched by `exclude`
    async fn visible_text(&mut self, exclude: &[&str]) -> Result<String, BrowserError>;

    /// Document title of the current page (empty if none)
    async fn title(&mut self) -> Result<String, BrowserError>;

    /// Closes the page
    async fn close(&mut self);
}
