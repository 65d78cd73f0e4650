//! Summarizer backed by the Anthropic Messages API

use super::prompt::{question_prompt, summary_prompt};
use super::{Summarizer, SummarizerError};
use crate::config::SummarizerConfig;
use crate::crawler::PageRecord;
use crate::url::NormalizedUrl;
use async_trait::async_trait;
use reqwest::header::{HeaderMap, HeaderValue, CONTENT_TYPE};
use reqwest::Client;
use serde::{Deserialize, Serialize};
use std::time::Duration;

const ANTHROPIC_VERSION: &str = "2023-06-01";

pub struct AnthropicSummarizer {
    client: Client,
    endpoint: String,
    headers: HeaderMap,
    model: String,
    summary_max_tokens: u32,
    answer_max_tokens: u32,
    temperature: f32,
}

impl AnthropicSummarizer {
    /// Creates a client for the configured Messages API
    ///
    /// # Arguments
    ///
    /// * `api_key` - Anthropic API key
    /// * `config` - Model, endpoint and sampling settings
    ///
    /// # Returns
    ///
    /// * `Ok(AnthropicSummarizer)` - Ready to use client
    /// * `Err(SummarizerError)` - Blank or malformed key, or the HTTP client failed to build
    pub fn new(api_key: &str, config: &SummarizerConfig) -> Result<Self, SummarizerError> {
        let api_key = api_key.trim();
        if api_key.is_empty() {
            return Err(SummarizerError::InvalidApiKey);
        }

        let mut headers = HeaderMap::new();
        headers.insert(
            "x-api-key",
            HeaderValue::from_str(api_key).map_err(|_| SummarizerError::InvalidApiKey)?,
        );
        headers.insert("anthropic-version", HeaderValue::from_static(ANTHROPIC_VERSION));
        headers.insert(CONTENT_TYPE, HeaderValue::from_static("application/json"));

        let client = Client::builder()
            .timeout(Duration::from_secs(config.request_timeout))
            .build()
            .map_err(|e| SummarizerError::Client(e.to_string()))?;

        Ok(Self {
            client,
            endpoint: format!("{}/messages", config.api_base.trim_end_matches('/')),
            headers,
            model: config.model.clone(),
            summary_max_tokens: config.summary_max_tokens,
            answer_max_tokens: config.answer_max_tokens,
            temperature: config.temperature,
        })
    }

    async fn complete(&self, prompt: &str, max_tokens: u32) -> Result<String, SummarizerError> {
        let body = AnthropicRequest {
            model: &self.model,
            max_tokens,
            temperature: self.temperature,
            messages: vec![AnthropicMessage {
                role: "user",
                content: vec![AnthropicContentBlock {
                    kind: "text",
                    text: prompt,
                }],
            }],
        };

        let resp = self
            .client
            .post(&self.endpoint)
            .headers(self.headers.clone())
            .json(&body)
            .send()
            .await?;

        if !resp.status().is_success() {
            let status = resp.status().as_u16();
            let body = resp
                .text()
                .await
                .unwrap_or_else(|_| "<body unavailable>".to_string());
            return Err(SummarizerError::Api { status, body });
        }

        let parsed: AnthropicResponse = resp.json().await?;
        let text = parsed
            .content
            .into_iter()
            .filter_map(|block| match block {
                AnthropicResponseBlock::Text { text } => Some(text),
                AnthropicResponseBlock::Other => None,
            })
            .collect::<Vec<_>>()
            .join("\n");

        if text.is_empty() {
            return Err(SummarizerError::EmptyResponse);
        }
        Ok(text)
    }
}

#[async_trait]
impl Summarizer for AnthropicSummarizer {
    fn model(&self) -> &str {
        &self.model
    }

    async fn summarize(
        &self,
        pages: &[PageRecord],
        origin: &NormalizedUrl,
    ) -> Result<String, SummarizerError> {
        tracing::info!("Requesting summary of {} ({} pages)", origin, pages.len());
        let summary = self
            .complete(&summary_prompt(pages, origin), self.summary_max_tokens)
            .await?;
        tracing::info!("Summary generated for {}", origin);
        Ok(summary)
    }

    async fn answer(
        &self,
        question: &str,
        pages: &[PageRecord],
        origin: &NormalizedUrl,
    ) -> Result<String, SummarizerError> {
        tracing::info!("Answering follow-up question about {}", origin);
        self.complete(&question_prompt(question, pages, origin), self.answer_max_tokens)
            .await
    }
}

impl std::fmt::Debug for AnthropicSummarizer {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AnthropicSummarizer")
            .field("endpoint", &self.endpoint)
            .field("model", &self.model)
            .finish_non_exhaustive()
    }
}

#[derive(Serialize)]
struct AnthropicRequest<'a> {
    model: &'a str,
    max_tokens: u32,
    temperature: f32,
    messages: Vec<AnthropicMessage<'a>>,
}

#[derive(Serialize)]
struct AnthropicMessage<'a> {
    role: &'a str,
    content: Vec<AnthropicContentBlock<'a>>,
}

#[derive(Serialize)]
struct AnthropicContentBlock<'a> {
    #[serde(rename = "type")]
    kind: &'a str,
    text: &'a str,
}

#[derive(Debug, Deserialize)]
struct AnthropicResponse {
    content: Vec<AnthropicResponseBlock>,
}

#[derive(Debug, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
enum AnthropicResponseBlock {
    Text {
        text: String,
    },
    #[serde(other)]
    Other,
}
