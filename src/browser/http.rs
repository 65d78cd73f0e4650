//! HTTP-backed browser implementation
//!
//! This module handles all HTTP requests made on behalf of a crawl, including:
//! - Building HTTP clients with proper user agent strings
//! - Redirect handling under the same host policy as submitted URLs
//! - Content-Type checks (only HTML is loaded)
//! - Error classification into `BrowserError`

use super::{extract_title, extract_visible_text, BrowserError, BrowserHandle, BrowserProvider};
use crate::config::UserAgentConfig;
use crate::url::{NormalizedUrl, UrlGuard};
use async_trait::async_trait;
use reqwest::{redirect::Policy, Client};
use std::time::Duration;

/// Maximum redirect hops followed for a single navigation
const MAX_REDIRECTS: usize = 10;

/// Builds an HTTP client with proper configuration
///
/// Redirect targets are checked against `guard`, so a public page cannot bounce the
/// crawler onto a loopback or private address.
///
/// # Arguments
///
/// * `config` - The user agent configuration
/// * `guard` - Host policy applied to every redirect hop
///
/// # Returns
///
/// * `Ok(Client)` - Successfully built HTTP client
/// * `Err(reqwest::Error)` - Failed to build client
///
/// # Example
///
/// ```no_run
/// use sumi_scout::browser::build_http_client;
/// use sumi_scout::config::UserAgentConfig;
/// use sumi_scout::url::UrlGuard;
///
/// let client = build_http_client(&UserAgentConfig::default(), UrlGuard::strict()).unwrap();
/// ```
pub fn build_http_client(
    config: &UserAgentConfig,
    guard: UrlGuard,
) -> Result<Client, reqwest::Error> {
    let redirect_policy = Policy::custom(move |attempt| {
        if attempt.previous().len() >= MAX_REDIRECTS {
            attempt.error("too many redirects")
        } else if !guard.admits(attempt.url()) {
            attempt.stop()
        } else {
            attempt.follow()
        }
    });

    Client::builder()
        .user_agent(config.header_value())
        .timeout(Duration::from_secs(60))
        .connect_timeout(Duration::from_secs(10))
        .redirect(redirect_policy)
        .gzip(true)
        .brotli(true)
        .build()
}

/// Provider that serves "sessions" backed by a shared HTTP client
#[derive(Debug, Clone)]
pub struct HttpBrowserProvider {
    user_agent: UserAgentConfig,
    guard: UrlGuard,
}

impl HttpBrowserProvider {
    /// Creates a new provider
    ///
    /// # Arguments
    ///
    /// * `user_agent` - Identification sent with every request
    /// * `guard` - Host policy for redirect targets
    pub fn new(user_agent: UserAgentConfig, guard: UrlGuard) -> Self {
        Self { user_agent, guard }
    }
}

#[async_trait]
impl BrowserProvider for HttpBrowserProvider {
    async fn create_session(&self) -> Result<String, BrowserError> {
        let session_id = uuid::Uuid::new_v4().to_string();
        tracing::debug!("Created HTTP browser session {}", session_id);
        Ok(session_id)
    }

    async fn connect(&self, session_id: &str) -> Result<Box<dyn BrowserHandle>, BrowserError> {
        let client = build_http_client(&self.user_agent, self.guard)
            .map_err(|e| BrowserError::Client(e.to_string()))?;
        tracing::debug!("Connected to HTTP browser session {}", session_id);
        Ok(Box::new(HttpPage::new(client)))
    }

    async fn end_session(&self, session_id: &str) {
        tracing::debug!("Ended HTTP browser session {}", session_id);
    }
}

/// The last document loaded by an [`HttpPage`]
#[derive(Debug, Clone)]
struct LoadedDocument {
    body: String,
}

/// A page that loads documents over plain HTTP
#[derive(Debug)]
pub struct HttpPage {
    client: Client,
    current: Option<LoadedDocument>,
}

impl HttpPage {
    /// Creates a page that fetches through `client`
    pub fn new(client: Client) -> Self {
        Self {
            client,
            current: None,
        }
    }

    fn document(&self) -> Result<&LoadedDocument, BrowserError> {
        self.current.as_ref().ok_or(BrowserError::NoPage)
    }

    async fn fetch(&self, url: &NormalizedUrl) -> Result<LoadedDocument, BrowserError> {
        let response = self
            .client
            .get(url.as_str())
            .send()
            .await
            .map_err(|e| classify_error(url, e))?;

        let status = response.status();
        if !status.is_success() {
            return Err(BrowserError::HttpStatus {
                url: url.to_string(),
                status: status.as_u16(),
            });
        }

        // Check Content-Type
        let content_type = response
            .headers()
            .get(reqwest::header::CONTENT_TYPE)
            .and_then(|v| v.to_str().ok())
            .unwrap_or("")
            .to_string();

        if !is_html_content_type(&content_type) {
            return Err(BrowserError::ContentMismatch {
                url: url.to_string(),
                content_type,
            });
        }

        let body = response.text().await.map_err(|e| classify_error(url, e))?;
        Ok(LoadedDocument { body })
    }
}

#[async_trait]
impl BrowserHandle for HttpPage {
    async fn navigate(
        &mut self,
        url: &NormalizedUrl,
        timeout: Duration,
    ) -> Result<(), BrowserError> {
        // The previous document is gone whether or not this load succeeds
        self.current = None;

        let document = tokio::time::timeout(timeout, self.fetch(url))
            .await
            .map_err(|_| BrowserError::Timeout {
                url: url.to_string(),
            })??;

        self.current = Some(document);
        Ok(())
    }

    async fn html(&mut self) -> Result<String, BrowserError> {
        Ok(self.document()?.body.clone())
    }

    async fn visible_text(&mut self, exclude: &[&str]) -> Result<String, BrowserError> {
        Ok(extract_visible_text(&self.document()?.body, exclude))
    }

    async fn title(&mut self) -> Result<String, BrowserError> {
        Ok(extract_title(&self.document()?.body))
    }

    async fn close(&mut self) {
        self.current = None;
    }
}

/// Returns true for HTML and XHTML media types, ignoring case and parameters
fn is_html_content_type(content_type: &str) -> bool {
    let content_type = content_type.to_ascii_lowercase();
    content_type.contains("text/html") || content_type.contains("application/xhtml")
}

/// Maps a transport error onto a browser error
fn classify_error(url: &NormalizedUrl, error: reqwest::Error) -> BrowserError {
    if error.is_timeout() {
        BrowserError::Timeout {
            url: url.to_string(),
        }
    } else if error.is_connect() {
        BrowserError::Network {
            url: url.to_string(),
            message: "Connection refused".to_string(),
        }
    } else {
        BrowserError::Network {
            url: url.to_string(),
            message: error.to_string(),
        }
    }
}
