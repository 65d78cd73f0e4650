//! Anchor link discovery
//!
//! Links are found with a regex scan over the raw markup rather than a DOM walk,
//! so broken HTML never stops discovery; anything the pattern cannot make sense
//! of is simply not a link.

use crate::url::NormalizedUrl;
use regex::Regex;
use std::collections::HashSet;
use std::sync::OnceLock;

/// Anchor href pattern regex
static ANCHOR_HREF_REGEX: OnceLock<Regex> = OnceLock::new();

/// Get the compiled regex for `<a ... href="...">` attributes
fn get_anchor_href_regex() -> &'static Regex {
    ANCHOR_HREF_REGEX.get_or_init(|| {
        Regex::new(r#"(?is)<a\s+(?:[^>]*?\s+)?href\s*=\s*(?:"([^"]*)"|'([^']*)')"#)
            .expect("Invalid anchor href regex")
    })
}

/// Extracts same-origin links from a page
///
/// # Link Rules
///
/// - Empty, fragment-only (`#...`), `mailto:` and `tel:` hrefs are skipped
/// - Relative hrefs are resolved against `page_url`
/// - Only links on the same host as `origin` are kept
/// - Query string and fragment are stripped
/// - Order is first-seen, without duplicates
///
/// # Arguments
///
/// * `html` - Raw markup of the page
/// * `page_url` - URL the markup was loaded from
/// * `origin` - URL the crawl started at
///
/// # Example
///
/// ```
/// use sumi_scout::crawler::extract_links;
/// use sumi_scout::url::normalize_url;
///
/// let page = normalize_url("https://ex.com/p").unwrap();
/// let html = r#"<a href="/a?x=1#y">A</a> <a href="/a">A again</a>"#;
/// let links = extract_links(html, &page, &page);
/// assert_eq!(links.len(), 1);
/// assert_eq!(links[0].as_str(), "https://ex.com/a");
/// ```
pub fn extract_links(
    html: &str,
    page_url: &NormalizedUrl,
    origin: &NormalizedUrl,
) -> Vec<NormalizedUrl> {
    let mut seen = HashSet::new();
    let mut links = Vec::new();

    for captures in get_anchor_href_regex().captures_iter(html) {
        let Some(href) = captures.get(1).or_else(|| captures.get(2)) else {
            continue;
        };

        if let Some(link) = resolve_link(href.as_str(), page_url, origin) {
            if seen.insert(link.clone()) {
                links.push(link);
            }
        }
    }

    links
}

/// Resolves one href, returning None if it should not be followed
fn resolve_link(
    href: &str,
    page_url: &NormalizedUrl,
    origin: &NormalizedUrl,
) -> Option<NormalizedUrl> {
    let href = href.trim();
    if href.is_empty() || href.starts_with('#') {
        return None;
    }

    let lower = href.to_ascii_lowercase();
    if lower.starts_with("mailto:") || lower.starts_with("tel:") {
        return None;
    }

    let mut absolute = page_url.as_url().join(href).ok()?;
    if absolute.scheme() != "http" && absolute.scheme() != "https" {
        return None;
    }
    if !crate::url::same_origin(&absolute, origin.as_url()) {
        return None;
    }

    absolute.set_query(None);
    absolute.set_fragment(None);
    Some(NormalizedUrl::from_admitted(absolute))
}
