//! Breadth-first crawl frontier
//!
//! The frontier owns two sets: URLs waiting in the FIFO queue and URLs already
//! visited. A URL is marked visited when it is handed out by [`Frontier::pop_next`],
//! before any I/O happens for it, so a page linked from many places is fetched once.

use crate::url::NormalizedUrl;
use std::collections::{HashSet, VecDeque};

/// FIFO queue of not-yet-visited URLs for one crawl
#[derive(Debug, Default)]
pub struct Frontier {
    /// URLs waiting to be visited, in discovery order
    queue: VecDeque<NormalizedUrl>,

    /// Membership of `queue`
    queued: HashSet<NormalizedUrl>,

    /// URLs already handed out
    visited: HashSet<NormalizedUrl>,
}

impl Frontier {
    /// Creates a frontier seeded with the crawl origin
    pub fn new(seed: NormalizedUrl) -> Self {
        let mut frontier = Self::default();
        frontier.enqueue(seed);
        frontier
    }

    /// Pops the next unvisited URL and marks it visited
    pub fn pop_next(&mut self) -> Option<NormalizedUrl> {
        while let Some(url) = self.queue.pop_front() {
            self.queued.remove(&url);
            if self.visited.insert(url.clone()) {
                return Some(url);
            }
        }
        None
    }

    /// Appends a URL unless it was already visited or is already waiting
    ///
    /// Returns true if the URL was added.
    pub fn enqueue(&mut self, url: NormalizedUrl) -> bool {
        if self.visited.contains(&url) || self.queued.contains(&url) {
            return false;
        }
        self.queued.insert(url.clone());
        self.queue.push_back(url);
        true
    }

    /// Enqueues every URL in order, returning how many were new
    pub fn extend(&mut self, urls: impl IntoIterator<Item = NormalizedUrl>) -> usize {
        urls.into_iter().filter(|url| self.enqueue(url.clone())).count()
    }

    pub fn is_visited(&self, url: &NormalizedUrl) -> bool {
        self.visited.contains(url)
    }

    pub fn visited_count(&self) -> usize {
        self.visited.len()
    }

    pub fn pending_count(&self) -> usize {
        self.queue.len()
    }

    pub fn is_empty(&self) -> bool {
        self.queue.is_empty()
    }
}
