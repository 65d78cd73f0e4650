//! State module for tracking crawl progress
//!
//! This module provides state management for a single crawl invocation.
//!
//! # Components
//!
//! - `CrawlPhase`: The lifecycle phase of a crawl (provisioning, connecting, traversing, ...)
//! - `CrawlProgress`: Pages fetched against the budget, mapped to a non-decreasing percentage

mod crawl_phase;
pub mod progress;

// Re-export main types
pub use crawl_phase::CrawlPhase;
pub use progress::CrawlProgress;
