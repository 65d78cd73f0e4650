//! Sumi-Scout: a same-origin web research relay
//!
//! This crate crawls a website breadth-first within its own host, streams crawl
//! progress to connected clients, caches the crawled pages in short-lived sessions
//! and relays summaries and follow-up answers produced by a text-generation provider.

pub mod browser;
pub mod config;
pub mod crawler;
pub mod protocol;
pub mod relay;
pub mod server;
pub mod session;
pub mod state;
pub mod summarizer;
pub mod url;

use thiserror::Error;

/// Main error type for Sumi-Scout operations
///
/// The `Display` text of each variant is what clients get to see; the wrapped
/// sources are only written to the log.
#[derive(Debug, Error)]
pub enum ScoutError {
    #[error("{0}")]
    Validation(#[from] UrlRejection),

    #[error("{0}")]
    InvalidRequest(String),

    #[error("Failed to initialize browser session")]
    Provisioning(#[source] browser::BrowserError),

    #[error("Failed to load {url}: {source}")]
    PageFetch {
        url: String,
        #[source]
        source: browser::BrowserError,
    },

    #[error("No pages could be crawled from {url}")]
    EmptyCrawl { url: String },

    #[error("Session expired. Please analyze a new website.")]
    SessionExpired { session_id: String },

    #[error("AI service is not available")]
    SummarizerUnavailable,

    #[error("AI generation failed")]
    GenerationFailed(#[from] summarizer::SummarizerError),

    #[error("Invalid message format")]
    Protocol(String),

    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// Configuration-specific errors
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to read config file: {0}")]
    Io(#[from] std::io::Error),

    #[error("Failed to parse TOML: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("Validation error: {0}")]
    Validation(String),

    #[error("Invalid URL in config: {0}")]
    InvalidUrl(String),
}

/// Reasons a submitted URL is refused before any crawling happens
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum UrlRejection {
    #[error("URL cannot be empty")]
    EmptyInput,

    #[error("Invalid URL format")]
    MalformedUrl,

    #[error("Only HTTP and HTTPS protocols are supported")]
    UnsupportedScheme(String),

    #[error("Invalid URL: missing hostname")]
    MissingHost,

    #[error("Cannot scrape localhost or private IP addresses")]
    PrivateOrLoopbackHost(String),
}

/// Result type alias for Sumi-Scout operations
pub type Result<T> = std::result::Result<T, ScoutError>;

/// Result type alias for configuration operations
pub type ConfigResult<T> = std::result::Result<T, ConfigError>;

/// Result type alias for URL admission
pub type UrlResult<T> = std::result::Result<T, UrlRejection>;

// Re-export commonly used types
pub use config::Config;
pub use crawler::{Crawler, PageRecord};
pub use protocol::{EventChannel, ProtocolEvent};
pub use session::{CrawlSession, SessionStore};
pub use state::CrawlPhase;
pub use url::{normalize_url, same_origin, NormalizedUrl, UrlGuard};
