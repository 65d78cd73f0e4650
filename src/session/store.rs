//! In-memory, TTL-bounded store of crawl sessions

use super::clock::{Clock, SystemClock};
use crate::crawler::PageRecord;
use crate::url::NormalizedUrl;
use chrono::{DateTime, Utc};
use std::collections::HashMap;
use std::sync::{Arc, PoisonError, RwLock};
use std::time::Duration;
use tokio::task::JoinHandle;

/// Cached result of one crawl, used to answer follow-up questions
///
/// Sessions are never modified after creation.
#[derive(Debug, Clone)]
pub struct CrawlSession {
    pub id: String,
    pub origin_url: NormalizedUrl,
    pub pages: Vec<PageRecord>,
    pub created_at: DateTime<Utc>,
}

/// Thread-safe map of live crawl sessions
///
/// A session is visible for `ttl` after creation. Expired sessions are evicted
/// lazily by [`SessionStore::get`] and in bulk by [`SessionStore::sweep`].
pub struct SessionStore {
    sessions: RwLock<HashMap<String, Arc<CrawlSession>>>,
    ttl: chrono::Duration,
    clock: Arc<dyn Clock>,
}

impl SessionStore {
    /// Creates a store using the system clock
    pub fn new(ttl: Duration) -> Self {
        Self::with_clock(ttl, Arc::new(SystemClock))
    }

    /// Creates a store with an injected clock
    pub fn with_clock(ttl: Duration, clock: Arc<dyn Clock>) -> Self {
        Self {
            sessions: RwLock::new(HashMap::new()),
            ttl: chrono::Duration::from_std(ttl).unwrap_or_else(|_| chrono::Duration::days(36_500)),
            clock,
        }
    }

    /// Stores the pages of a finished crawl and returns the new session id
    ///
    /// Ids are `session_` followed by a random UUID, so they cannot be guessed
    /// from other sessions' ids.
    pub fn create(&self, origin_url: NormalizedUrl, pages: Vec<PageRecord>) -> String {
        let id = format!("session_{}", uuid::Uuid::new_v4().simple());
        let session = CrawlSession {
            id: id.clone(),
            origin_url,
            pages,
            created_at: self.clock.now(),
        };

        tracing::info!(
            "Created session {} for {} ({} pages)",
            id,
            session.origin_url,
            session.pages.len()
        );

        self.write().insert(id.clone(), Arc::new(session));
        id
    }

    /// Looks up a live session
    ///
    /// Returns None if the id is unknown or the session has outlived its TTL; in
    /// the latter case the session is evicted.
    pub fn get(&self, id: &str) -> Option<Arc<CrawlSession>> {
        let now = self.clock.now();
        let session = self.read().get(id).cloned()?;

        if self.is_expired(&session, now) {
            let mut sessions = self.write();
            if sessions
                .get(id)
                .map_or(false, |current| self.is_expired(current, now))
            {
                sessions.remove(id);
                tracing::debug!("Evicted expired session {}", id);
            }
            return None;
        }

        Some(session)
    }

    /// Evicts every expired session and returns how many were removed
    pub fn sweep(&self) -> usize {
        let now = self.clock.now();
        let mut sessions = self.write();
        let before = sessions.len();
        sessions.retain(|_, session| !self.is_expired(session, now));
        let removed = before - sessions.len();

        if removed > 0 {
            tracing::info!("Cleaned up {} expired sessions", removed);
        }
        removed
    }

    /// Number of sessions held, including expired ones not yet swept
    pub fn count(&self) -> usize {
        self.read().len()
    }

    /// Removes a session; returns true if it existed
    pub fn remove(&self, id: &str) -> bool {
        self.write().remove(id).is_some()
    }

    pub fn ttl(&self) -> chrono::Duration {
        self.ttl
    }

    /// Starts a background task that sweeps the store every `interval`
    ///
    /// The first sweep happens one interval after the call.
    pub fn spawn_sweeper(self: &Arc<Self>, interval: Duration) -> JoinHandle<()> {
        let store = Arc::clone(self);
        tokio::spawn(async move {
            let mut ticker = tokio::time::interval(interval);
            ticker.set_missed_tick_behavior(tokio::time::MissedTickBehavior::Delay);
            // The first tick completes immediately
            ticker.tick().await;
            loop {
                ticker.tick().await;
                store.sweep();
            }
        })
    }

    fn is_expired(&self, session: &CrawlSession, now: DateTime<Utc>) -> bool {
        now.signed_duration_since(session.created_at) > self.ttl
    }

    fn read(&self) -> std::sync::RwLockReadGuard<'_, HashMap<String, Arc<CrawlSession>>> {
        self.sessions.read().unwrap_or_else(PoisonError::into_inner)
    }

    fn write(&self) -> std::sync::RwLockWriteGuard<'_, HashMap<String, Arc<CrawlSession>>> {
        self.sessions.write().unwrap_or_else(PoisonError::into_inner)
    }
}

impl std::fmt::Debug for SessionStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SessionStore")
            .field("sessions", &self.count())
            .field("ttl", &self.ttl)
            .finish()
    }
}
