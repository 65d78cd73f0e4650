use serde::Deserialize;
use std::time::Duration;

/// Main configuration structure for Sumi-Scout
///
/// Every section has defaults, so an empty file (or no file at all) yields a
/// runnable configuration.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct Config {
    pub server: ServerConfig,
    pub crawler: CrawlerConfig,
    pub sessions: SessionConfig,
    #[serde(rename = "user-agent")]
    pub user_agent: UserAgentConfig,
    pub summarizer: SummarizerConfig,
}

/// HTTP/WebSocket listener configuration
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct ServerConfig {
    /// Socket address to bind (host:port)
    pub bind: String,

    /// Origins allowed by the CORS layer
    #[serde(rename = "allowed-origins")]
    pub allowed_origins: Vec<String>,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            bind: "0.0.0.0:3001".to_string(),
            allowed_origins: vec!["http://localhost:3000".to_string()],
        }
    }
}

/// Crawler behavior configuration
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct CrawlerConfig {
    /// Page budget used when a request does not name one
    #[serde(rename = "default-max-pages")]
    pub default_max_pages: u32,

    /// Largest page budget a request may ask for
    #[serde(rename = "max-pages-limit")]
    pub max_pages_limit: u32,

    /// Navigation timeout per page (milliseconds)
    #[serde(rename = "page-timeout")]
    pub page_timeout: u64,

    /// Time to let a page settle after navigation (milliseconds)
    #[serde(rename = "settle-time")]
    pub settle_time: u64,

    /// Delay between successive page fetches (milliseconds)
    #[serde(rename = "politeness-delay")]
    pub politeness_delay: u64,

    /// Maximum characters of visible text kept per page
    #[serde(rename = "content-limit")]
    pub content_limit: usize,

    /// Admit loopback/private targets (local development only)
    #[serde(rename = "allow-private-hosts")]
    pub allow_private_hosts: bool,
}

impl Default for CrawlerConfig {
    fn default() -> Self {
        Self {
            default_max_pages: 5,
            max_pages_limit: 50,
            page_timeout: 30_000,
            settle_time: 1_500,
            politeness_delay: 1_000,
            content_limit: 10_000,
            allow_private_hosts: false,
        }
    }
}

/// Session cache configuration
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct SessionConfig {
    /// Lifetime of a crawl session (minutes)
    #[serde(rename = "ttl-minutes")]
    pub ttl_minutes: u64,

    /// Interval between expiry sweeps (minutes)
    #[serde(rename = "sweep-interval-minutes")]
    pub sweep_interval_minutes: u64,
}

impl SessionConfig {
    pub fn ttl(&self) -> Duration {
        Duration::from_secs(self.ttl_minutes * 60)
    }

    pub fn sweep_interval(&self) -> Duration {
        Duration::from_secs(self.sweep_interval_minutes * 60)
    }
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            ttl_minutes: 30,
            sweep_interval_minutes: 10,
        }
    }
}

/// User agent identification configuration
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct UserAgentConfig {
    /// Name of the crawler
    #[serde(rename = "crawler-name")]
    pub crawler_name: String,

    /// Version of the crawler
    #[serde(rename = "crawler-version")]
    pub crawler_version: String,

    /// URL with information about the crawler
    #[serde(rename = "contact-url")]
    pub contact_url: String,

    /// Email address for crawler-related contact
    #[serde(rename = "contact-email")]
    pub contact_email: String,
}

impl UserAgentConfig {
    /// Formats the header value: `Name/Version (+ContactURL; ContactEmail)`
    pub fn header_value(&self) -> String {
        format!(
            "{}/{} (+{}; {})",
            self.crawler_name, self.crawler_version, self.contact_url, self.contact_email
        )
    }
}

impl Default for UserAgentConfig {
    fn default() -> Self {
        Self {
            crawler_name: "SumiScout".to_string(),
            crawler_version: env!("CARGO_PKG_VERSION").to_string(),
            contact_url: "https://example.com/about".to_string(),
            contact_email: "admin@example.com".to_string(),
        }
    }
}

/// Text-generation provider configuration
///
/// The API key is deliberately not part of the file; it is read from the
/// environment by the binary.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct SummarizerConfig {
    /// Model identifier sent with every request
    pub model: String,

    /// Base URL of the Messages API
    #[serde(rename = "api-base")]
    pub api_base: String,

    /// Token cap for the initial summary
    #[serde(rename = "summary-max-tokens")]
    pub summary_max_tokens: u32,

    /// Token cap for follow-up answers
    #[serde(rename = "answer-max-tokens")]
    pub answer_max_tokens: u32,

    /// Sampling temperature
    pub temperature: f32,

    /// Request timeout (seconds)
    #[serde(rename = "request-timeout")]
    pub request_timeout: u64,
}

impl Default for SummarizerConfig {
    fn default() -> Self {
        Self {
            model: "claude-3-5-sonnet-20241022".to_string(),
            api_base: "https://api.anthropic.com/v1".to_string(),
            summary_max_tokens: 2048,
            answer_max_tokens: 3072,
            temperature: 0.5,
            request_timeout: 60,
        }
    }
}
