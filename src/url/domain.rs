use url::Url;

/// Extracts the domain from a URL
///
/// Returns the host portion of a URL in lowercase, or None if the URL has no host.
///
/// # Examples
///
/// ```
/// use url::Url;
/// use sumi_scout::url::extract_domain;
///
/// let url = Url::parse("https://EXAMPLE.COM/path").unwrap();
/// assert_eq!(extract_domain(&url), Some("example.com".to_string()));
/// ```
pub fn extract_domain(url: &Url) -> Option<String> {
    url.host_str().map(|h| h.to_lowercase())
}

/// Checks whether two URLs belong to the same crawl origin
///
/// Only the hostnames are compared, byte for byte. Scheme and port differences are
/// ignored, and subdomains count as different origins.
///
/// # Examples
///
/// ```
/// use url::Url;
/// use sumi_scout::url::same_origin;
///
/// let a = Url::parse("https://example.com/a").unwrap();
/// let b = Url::parse("http://example.com:8080/b").unwrap();
/// let c = Url::parse("https://blog.example.com/").unwrap();
/// assert!(same_origin(&a, &b));
/// assert!(!same_origin(&a, &c));
/// ```
pub fn same_origin(a: &Url, b: &Url) -> bool {
    match (a.host_str(), b.host_str()) {
        (Some(left), Some(right)) => left == right,
        _ => false,
    }
}
