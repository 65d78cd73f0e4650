use crate::url::NormalizedUrl;
use chrono::{DateTime, Utc};
use serde::Serialize;

/// One successfully crawled page
///
/// `content` is the visible text with whitespace collapsed and truncated to the
/// configured content limit.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PageRecord {
    pub url: NormalizedUrl,
    pub title: String,
    pub content: String,
    #[serde(rename = "timestamp", serialize_with = "serialize_epoch_ms")]
    pub fetched_at: DateTime<Utc>,
}

impl PageRecord {
    /// Creates a record stamped with the current time
    pub fn new(url: NormalizedUrl, title: impl Into<String>, content: impl Into<String>) -> Self {
        Self {
            url,
            title: title.into(),
            content: content.into(),
            fetched_at: Utc::now(),
        }
    }

    /// Fetch time as milliseconds since the Unix epoch
    pub fn fetched_at_epoch_ms(&self) -> i64 {
        self.fetched_at.timestamp_millis()
    }

    /// Title to show for this page, falling back to its URL
    pub fn display_title(&self) -> &str {
        if self.title.is_empty() {
            self.url.as_str()
        } else {
            &self.title
        }
    }
}

fn serialize_epoch_ms<S: serde::Serializer>(
    value: &DateTime<Utc>,
    serializer: S,
) -> Result<S::Ok, S::Error> {
    serializer.serialize_i64(value.timestamp_millis())
}
