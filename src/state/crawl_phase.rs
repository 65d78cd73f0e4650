/// Crawl phase definitions for tracking a single crawl invocation
///
/// This module defines the phases a crawl moves through from browser provisioning
/// to completion.
use std::fmt;

/// Represents the current phase of one crawl invocation
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum CrawlPhase {
    // ===== Setup Phases =====
    /// A remote browser session is being requested from the provider
    Provisioning,

    /// A page handle is being attached to the provisioned session
    Connecting,

    // ===== Work Phase =====
    /// Pages are being visited from the frontier
    Traversing,

    // ===== Teardown Phases =====
    /// The browser handle is being closed and the session ended
    Finalizing,

    /// The crawl has returned its pages (or its error)
    Done,
}

impl CrawlPhase {
    /// Returns true if no further transitions are possible
    pub fn is_terminal(&self) -> bool {
        matches!(self, Self::Done)
    }

    /// Returns true while a browser resource may be held by the crawl
    pub fn holds_browser(&self) -> bool {
        matches!(self, Self::Connecting | Self::Traversing | Self::Finalizing)
    }

    /// Checks whether moving from `self` to `next` is a legal transition
    ///
    /// Setup failures jump straight to `Finalizing` (after a session exists) or
    /// `Done` (when nothing was provisioned).
    pub fn can_transition_to(&self, next: CrawlPhase) -> bool {
        matches!(
            (self, next),
            (Self::Provisioning, Self::Connecting)
                | (Self::Provisioning, Self::Done)
                | (Self::Connecting, Self::Traversing)
                | (Self::Connecting, Self::Finalizing)
                | (Self::Traversing, Self::Finalizing)
                | (Self::Finalizing, Self::Done)
        )
    }

    /// Short lowercase label used in log lines
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Provisioning => "provisioning",
            Self::Connecting => "connecting",
            Self::Traversing => "traversing",
            Self::Finalizing => "finalizing",
            Self::Done => "done",
        }
    }

    /// Returns all phases in lifecycle order
    pub fn all_phases() -> Vec<Self> {
        vec![
            Self::Provisioning,
            Self::Connecting,
            Self::Traversing,
            Self::Finalizing,
            Self::Done,
        ]
    }
}

impl fmt::Display for CrawlPhase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}
