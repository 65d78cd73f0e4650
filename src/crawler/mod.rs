//! Crawler module for same-origin page traversal
//!
//! This module contains the core crawling logic, including:
//! - The breadth-first frontier with visit-once semantics
//! - Anchor link discovery restricted to the origin's host
//! - Text cleanup for captured pages
//! - Overall crawl coordination over a browser session

mod content;
mod coordinator;
mod frontier;
mod links;
mod page;

pub use content::clean_text;
pub use coordinator::{CrawlSettings, Crawler};
pub use frontier::Frontier;
pub use links::extract_links;
pub use page::PageRecord;
