//! URL handling module for Sumi-Scout
//!
//! This module provides URL admission control (normalization plus the lexical
//! private-host check), domain extraction and the same-origin test used to keep a
//! crawl on its starting host.

mod domain;
mod normalize;

// Re-export main functions
pub use domain::{extract_domain, same_origin};
pub use normalize::{is_private_host, normalize_url, NormalizedUrl, UrlGuard};
