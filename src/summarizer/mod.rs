//! Text-generation boundary
//!
//! The relay only sees the `Summarizer` trait. `AnthropicSummarizer` is the
//! bundled implementation; when no API key is configured the relay falls back to
//! [`fallback_summary`] and refuses follow-up questions.

mod anthropic;
pub mod prompt;

pub use anthropic::AnthropicSummarizer;

use crate::crawler::PageRecord;
use crate::url::NormalizedUrl;
use async_trait::async_trait;
use thiserror::Error;

/// Failures reported by a summarizer
#[derive(Debug, Error)]
pub enum SummarizerError {
    #[error("API key is missing or malformed")]
    InvalidApiKey,

    #[error("Failed to build HTTP client: {0}")]
    Client(String),

    #[error("Request failed: {0}")]
    Request(#[from] reqwest::Error),

    #[error("Provider returned HTTP {status}: {body}")]
    Api { status: u16, body: String },

    #[error("Provider response contained no text")]
    EmptyResponse,
}

/// Produces summaries and answers from crawled pages
///
/// Calls are made once; retrying is up to the caller.
#[async_trait]
pub trait Summarizer: Send + Sync {
    /// Identifier of the model producing the text
    fn model(&self) -> &str;

    /// Summarizes a freshly crawled site
    async fn summarize(
        &self,
        pages: &[PageRecord],
        origin: &NormalizedUrl,
    ) -> Result<String, SummarizerError>;

    /// Answers a question using previously crawled pages
    async fn answer(
        &self,
        question: &str,
        pages: &[PageRecord],
        origin: &NormalizedUrl,
    ) -> Result<String, SummarizerError>;
}

/// Plain listing of crawled pages, used when no summarizer is configured
pub fn fallback_summary(pages: &[PageRecord]) -> String {
    let listing = pages
        .iter()
        .enumerate()
        .map(|(i, page)| format!("{}. {}\n   {}", i + 1, page.display_title(), page.url))
        .collect::<Vec<_>>()
        .join("\n\n");

    format!(
        "Successfully crawled {} page(s):\n\n{}\n\nAI summarization is not available. \
         Set ANTHROPIC_API_KEY to enable it.",
        pages.len(),
        listing
    )
}
