//! In-memory browser used by unit tests

use super::{extract_title, extract_visible_text, BrowserError, BrowserHandle, BrowserProvider};
use crate::url::NormalizedUrl;
use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::{Arc, Mutex};
use std::time::Duration;

/// What the fake provider observed during a crawl
#[derive(Debug, Default)]
pub(crate) struct Journal {
    pub sessions_created: usize,
    pub sessions_ended: usize,
    pub handles_closed: usize,
    pub navigations: Vec<String>,
}

/// In-memory site served by a fake browser
#[derive(Clone, Default)]
pub(crate) struct FakeSite {
    pub pages: HashMap<String, String>,
    pub fail_create: bool,
    pub fail_connect: bool,
    pub journal: Arc<Mutex<Journal>>,
}

impl FakeSite {
    pub fn page(mut self, url: &str, html: &str) -> Self {
        self.pages.insert(url.to_string(), html.to_string());
        self
    }

    pub fn journal(&self) -> std::sync::MutexGuard<'_, Journal> {
        self.journal.lock().unwrap()
    }
}

struct FakePage {
    site: FakeSite,
    current: Option<String>,
}

#[async_trait]
impl BrowserProvider for FakeSite {
    async fn create_session(&self) -> Result<String, BrowserError> {
        if self.fail_create {
            return Err(BrowserError::Client("quota exceeded".to_string()));
        }
        self.journal().sessions_created += 1;
        Ok("fake-session".to_string())
    }

    async fn connect(&self, _session_id: &str) -> Result<Box<dyn BrowserHandle>, BrowserError> {
        if self.fail_connect {
            return Err(BrowserError::Client("connect refused".to_string()));
        }
        Ok(Box::new(FakePage {
            site: self.clone(),
            current: None,
        }))
    }

    async fn end_session(&self, _session_id: &str) {
        self.journal().sessions_ended += 1;
    }
}

#[async_trait]
impl BrowserHandle for FakePage {
    async fn navigate(
        &mut self,
        url: &NormalizedUrl,
        _timeout: Duration,
    ) -> Result<(), BrowserError> {
        self.site.journal().navigations.push(url.to_string());
        match self.site.pages.get(url.as_str()) {
            Some(html) => {
                self.current = Some(html.clone());
                Ok(())
            }
            None => Err(BrowserError::HttpStatus {
                url: url.to_string(),
                status: 404,
            }),
        }
    }

    async fn wait(&mut self, _duration: Duration) {}

    async fn html(&mut self) -> Result<String, BrowserError> {
        self.current.clone().ok_or(BrowserError::NoPage)
    }

    async fn visible_text(&mut self, exclude: &[&str]) -> Result<String, BrowserError> {
        let html = self.current.as_deref().ok_or(BrowserError::NoPage)?;
        Ok(extract_visible_text(html, exclude))
    }

    async fn title(&mut self) -> Result<String, BrowserError> {
        let html = self.current.as_deref().ok_or(BrowserError::NoPage)?;
        Ok(extract_title(html))
    }

    async fn close(&mut self) {
        self.site.journal().handles_closed += 1;
    }
}

/// Minimal page with a title, one paragraph and the given links
pub(crate) fn linking_page(title: &str, links: &[&str]) -> String {
    let anchors: String = links
        .iter()
        .map(|l| format!(r#"<a href="{}">{}</a>"#, l, l))
        .collect();
    format!(
        "<html><head><title>{}</title></head><body><p>{} body</p>{}</body></html>",
        title, title, anchors
    )
}
