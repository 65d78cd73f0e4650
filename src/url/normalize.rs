use crate::{UrlRejection, UrlResult};
use serde::{Serialize, Serializer};
use std::borrow::Cow;
use std::fmt;
use std::net::{Ipv4Addr, Ipv6Addr};
use url::{Host, Url};

/// Non-hierarchical schemes that count as "explicit" even without `//`
const OPAQUE_SCHEMES: &[&str] = &["mailto:", "javascript:", "data:", "tel:", "file:"];

/// An absolute http(s) URL that passed admission control
///
/// Values are only produced by [`UrlGuard::normalize`] or derived from one that was
/// (for example links resolved against an admitted page on the same host).
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct NormalizedUrl(Url);

impl NormalizedUrl {
    /// Wraps a URL derived from an already admitted one
    pub(crate) fn from_admitted(url: Url) -> Self {
        Self(url)
    }

    /// The full serialized URL
    pub fn as_str(&self) -> &str {
        self.0.as_str()
    }

    /// The underlying parsed URL
    pub fn as_url(&self) -> &Url {
        &self.0
    }

    /// The scheme, always `http` or `https`
    pub fn scheme(&self) -> &str {
        self.0.scheme()
    }

    /// The host as serialized in the URL
    pub fn host(&self) -> &str {
        self.0.host_str().unwrap_or_default()
    }

    /// Returns true if both URLs share a hostname
    pub fn same_origin(&self, other: &NormalizedUrl) -> bool {
        super::same_origin(&self.0, &other.0)
    }
}

impl fmt::Display for NormalizedUrl {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.0.as_str())
    }
}

impl Serialize for NormalizedUrl {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.0.as_str())
    }
}

/// Admission control for user-submitted URLs
///
/// # Admission Steps
///
/// 1. Reject empty or whitespace-only input
/// 2. Prepend `https://` when the input carries no explicit scheme
/// 3. Parse as an absolute URL; reject if malformed
/// 4. Reject schemes other than http/https
/// 5. Reject URLs without a host
/// 6. Reject loopback, private, link-local and unspecified hosts
///
/// The host check in step 6 is lexical: a DNS name that resolves to a private
/// address is not caught here.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct UrlGuard {
    allow_private_hosts: bool,
}

impl Default for UrlGuard {
    fn default() -> Self {
        Self::strict()
    }
}

impl UrlGuard {
    /// Guard that refuses loopback and private targets
    pub fn strict() -> Self {
        Self {
            allow_private_hosts: false,
        }
    }

    /// Guard that skips the private-host check (local development and mock servers)
    pub fn permissive() -> Self {
        Self {
            allow_private_hosts: true,
        }
    }

    /// Builds a guard from the `allow-private-hosts` setting
    pub fn with_private_hosts(allow: bool) -> Self {
        Self {
            allow_private_hosts: allow,
        }
    }

    /// Returns true if private hosts are admitted
    pub fn allows_private_hosts(&self) -> bool {
        self.allow_private_hosts
    }

    /// Validates and normalizes an arbitrary input string
    ///
    /// # Examples
    ///
    /// ```
    /// use sumi_scout::url::UrlGuard;
    ///
    /// let url = UrlGuard::strict().normalize("example.com").unwrap();
    /// assert_eq!(url.as_str(), "https://example.com/");
    /// assert!(UrlGuard::strict().normalize("http://localhost/").is_err());
    /// ```
    pub fn normalize(&self, input: &str) -> UrlResult<NormalizedUrl> {
        let trimmed = input.trim();
        if trimmed.is_empty() {
            return Err(UrlRejection::EmptyInput);
        }

        let candidate = if has_explicit_scheme(trimmed) {
            Cow::Borrowed(trimmed)
        } else {
            Cow::Owned(format!("https://{}", trimmed))
        };

        let url = Url::parse(&candidate).map_err(|_| UrlRejection::MalformedUrl)?;

        if url.scheme() != "http" && url.scheme() != "https" {
            return Err(UrlRejection::UnsupportedScheme(url.scheme().to_string()));
        }

        let host = url.host().ok_or(UrlRejection::MissingHost)?;

        if !self.allow_private_hosts && is_private_host(&host) {
            return Err(UrlRejection::PrivateOrLoopbackHost(host.to_string()));
        }

        Ok(NormalizedUrl(url))
    }

    /// Checks an already parsed URL against the host policy
    ///
    /// Used for redirect targets, which never pass through [`UrlGuard::normalize`].
    pub fn admits(&self, url: &Url) -> bool {
        if url.scheme() != "http" && url.scheme() != "https" {
            return false;
        }
        match url.host() {
            Some(host) => self.allow_private_hosts || !is_private_host(&host),
            None => false,
        }
    }
}

/// Normalizes a URL with the strict default guard
pub fn normalize_url(input: &str) -> UrlResult<NormalizedUrl> {
    UrlGuard::strict().normalize(input)
}

/// Returns true if the input already names its scheme
fn has_explicit_scheme(input: &str) -> bool {
    let lower = input.to_ascii_lowercase();
    if OPAQUE_SCHEMES.iter().any(|scheme| lower.starts_with(scheme)) {
        return true;
    }

    match input.find("://") {
        Some(idx) => {
            let scheme = &input[..idx];
            scheme
                .chars()
                .next()
                .map_or(false, |c| c.is_ascii_alphabetic())
                && scheme
                    .chars()
                    .all(|c| c.is_ascii_alphanumeric() || matches!(c, '+' | '-' | '.'))
        }
        None => false,
    }
}

/// Lexical loopback/private/link-local check on a parsed host
pub fn is_private_host(host: &Host<&str>) -> bool {
    match host {
        Host::Domain(domain) => domain
            .trim_end_matches('.')
            .eq_ignore_ascii_case("localhost"),
        Host::Ipv4(ip) => is_private_ipv4(ip),
        Host::Ipv6(ip) => is_private_ipv6(ip),
    }
}

fn is_private_ipv4(ip: &Ipv4Addr) -> bool {
    ip.is_loopback() || ip.is_private() || ip.is_link_local() || ip.is_unspecified()
}

fn is_private_ipv6(ip: &Ipv6Addr) -> bool {
    if ip.is_loopback() || ip.is_unspecified() {
        return true;
    }
    ip.to_ipv4_mapped()
        .map(|mapped| is_private_ipv4(&mapped))
        .unwrap_or(false)
}
