//! Progress accounting for a single crawl
//!
//! Progress is reported as a percentage inside a reserved band: setup steps use the
//! low end, page visits share `TRAVERSAL_START..TRAVERSAL_END`, and the remainder is
//! left for finalization and summarization.

/// Progress reported when the relay accepts a crawl request
pub const ACCEPTED: u8 = 0;

/// Progress reported while a browser session is requested
pub const PROVISIONING: u8 = 5;

/// Progress reported while a page handle is attached
pub const CONNECTING: u8 = 10;

/// First value of the page-visit band
pub const TRAVERSAL_START: u8 = 15;

/// Width of the page-visit band
pub const TRAVERSAL_SPAN: u8 = 70;

/// Progress reported once the frontier loop has exited
pub const CRAWL_COMPLETE: u8 = 90;

/// Progress reported while the summary is generated
pub const SUMMARIZING: u8 = 95;

/// Progress reported while a follow-up answer is generated
pub const ANSWERING: u8 = 50;

/// Tracks pages fetched against the budget and hands out non-decreasing percentages
#[derive(Debug, Clone)]
pub struct CrawlProgress {
    /// Page budget for this crawl
    max_pages: usize,

    /// Pages successfully fetched so far
    fetched: usize,

    /// Page attempts so far (successful or not)
    attempted: usize,

    /// Highest percentage handed out so far
    last_reported: u8,
}

impl CrawlProgress {
    /// Creates a tracker for a crawl with the given page budget
    pub fn new(max_pages: usize) -> Self {
        Self {
            max_pages,
            fetched: 0,
            attempted: 0,
            last_reported: ACCEPTED,
        }
    }

    /// Records a successful page fetch
    pub fn record_fetched(&mut self) {
        self.fetched += 1;
        self.attempted += 1;
    }

    /// Records a page attempt that did not produce a record
    pub fn record_failed(&mut self) {
        self.attempted += 1;
    }

    /// Page budget for this crawl
    pub fn max_pages(&self) -> usize {
        self.max_pages
    }

    /// Number of pages fetched so far
    pub fn fetched(&self) -> usize {
        self.fetched
    }

    /// Number of page attempts so far
    pub fn attempted(&self) -> usize {
        self.attempted
    }

    /// Returns true once the page budget is used up
    pub fn budget_exhausted(&self) -> bool {
        self.fetched >= self.max_pages
    }

    /// Percentage for the current position inside the page-visit band
    pub fn traversal_percent(&mut self) -> u8 {
        let span = if self.max_pages == 0 {
            TRAVERSAL_SPAN as usize
        } else {
            (TRAVERSAL_SPAN as usize * self.fetched.min(self.max_pages)) / self.max_pages
        };
        self.report(TRAVERSAL_START.saturating_add(span as u8))
    }

    /// Clamps `percent` so it never goes below a previously reported value
    pub fn report(&mut self, percent: u8) -> u8 {
        let clamped = percent.min(100).max(self.last_reported);
        self.last_reported = clamped;
        clamped
    }
}
