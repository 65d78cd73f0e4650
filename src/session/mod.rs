//! Session module for caching crawl results
//!
//! # Components
//!
//! - `SessionStore`: TTL-bounded in-memory map of crawl sessions with a periodic sweeper
//! - `CrawlSession`: the immutable pages of one crawl
//! - `Clock`: time source, swappable for `ManualClock` in tests

mod clock;
mod store;

pub use clock::{Clock, ManualClock, SystemClock};
pub use store::{CrawlSession, SessionStore};
