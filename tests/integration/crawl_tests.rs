//! Crawler tests over real HTTP against a mock site

use crate::common::{drain, fast_settings, html_page, http_crawler, mount_html, mount_site};
use std::time::Duration;
use sumi_scout::protocol::{ProtocolEvent, StatusUpdate};
use sumi_scout::{EventChannel, UrlGuard};
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn statuses(events: &[ProtocolEvent]) -> Vec<&StatusUpdate> {
    events
        .iter()
        .filter_map(|e| match e {
            ProtocolEvent::StatusUpdate(s) => Some(s),
            _ => None,
        })
        .collect()
}

#[tokio::test]
async fn test_crawl_respects_page_budget() {
    let mock_server = MockServer::start().await;
    mount_site(&mock_server, 10).await;

    let origin = UrlGuard::permissive().normalize(&mock_server.uri()).unwrap();
    let crawler = http_crawler(fast_settings());
    let (channel, mut events) = EventChannel::open("crawl-budget");

    let pages = crawler.crawl(&origin, 3, &channel).await.unwrap();

    assert_eq!(pages.len(), 3);
    assert_eq!(pages[0].url, origin);
    assert_eq!(pages[0].title, "Home");
    assert!(pages[0].content.contains("Welcome home"));
    // Navigation text is not page content
    assert!(!pages[0].content.contains("Menu"));
    assert_eq!(pages[1].title, "Page 1");
    assert_eq!(pages[2].title, "Page 2");

    let events = drain(&mut events);
    let statuses = statuses(&events);
    let progress: Vec<u8> = statuses.iter().map(|s| s.progress).collect();
    assert!(progress.windows(2).all(|w| w[0] <= w[1]), "{:?}", progress);

    let last = statuses.last().unwrap();
    assert_eq!(last.progress, 90);
    assert_eq!(last.message, "Crawling complete! Analyzed 3 pages.");
}

#[tokio::test]
async fn test_crawl_stays_on_origin_host() {
    let mock_server = MockServer::start().await;
    mount_html(
        &mock_server,
        "/",
        html_page(
            "Home",
            "Root",
            &["/about", "https://elsewhere.example.com/page", "mailto:a@b.c"],
        ),
    )
    .await;
    mount_html(&mock_server, "/about", html_page("About", "About us", &["/"])).await;

    let origin = UrlGuard::permissive().normalize(&mock_server.uri()).unwrap();
    let crawler = http_crawler(fast_settings());
    let channel = EventChannel::detached("crawl-origin");

    let pages = crawler.crawl(&origin, 10, &channel).await.unwrap();

    assert_eq!(pages.len(), 2);
    assert!(pages.iter().all(|p| p.url.same_origin(&origin)));
}

#[tokio::test]
async fn test_crawl_skips_non_html_and_missing_pages() {
    let mock_server = MockServer::start().await;
    mount_html(
        &mock_server,
        "/",
        html_page("Home", "Root", &["/report.pdf", "/missing", "/docs"]),
    )
    .await;
    Mock::given(method("GET"))
        .and(path("/report.pdf"))
        .respond_with(ResponseTemplate::new(200).set_body_raw(b"%PDF-1.4".to_vec(), "application/pdf"))
        .mount(&mock_server)
        .await;
    Mock::given(method("GET"))
        .and(path("/missing"))
        .respond_with(ResponseTemplate::new(404))
        .mount(&mock_server)
        .await;
    mount_html(&mock_server, "/docs", html_page("Docs", "Read the docs", &[])).await;

    let origin = UrlGuard::permissive().normalize(&mock_server.uri()).unwrap();
    let crawler = http_crawler(fast_settings());
    let (channel, mut events) = EventChannel::open("crawl-skips");

    let pages = crawler.crawl(&origin, 5, &channel).await.unwrap();

    let titles: Vec<&str> = pages.iter().map(|p| p.title.as_str()).collect();
    assert_eq!(titles, vec!["Home", "Docs"]);

    // Failed attempts still report progress, but never an error event
    let events = drain(&mut events);
    assert!(events
        .iter()
        .all(|e| matches!(e, ProtocolEvent::StatusUpdate(_))));
    assert_eq!(
        statuses(&events)
            .iter()
            .filter(|s| s.message.starts_with("Crawled "))
            .count(),
        4
    );
}

#[tokio::test]
async fn test_crawl_times_out_slow_pages() {
    let mock_server = MockServer::start().await;
    mount_html(&mock_server, "/", html_page("Home", "Root", &["/slow", "/fast"])).await;
    Mock::given(method("GET"))
        .and(path("/slow"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_raw(html_page("Slow", "Too late", &[]), "text/html")
                .set_delay(Duration::from_secs(3)),
        )
        .mount(&mock_server)
        .await;
    mount_html(&mock_server, "/fast", html_page("Fast", "In time", &[])).await;

    let origin = UrlGuard::permissive().normalize(&mock_server.uri()).unwrap();
    let mut settings = fast_settings();
    settings.page_timeout = Duration::from_millis(300);
    let crawler = http_crawler(settings);
    let channel = EventChannel::detached("crawl-timeout");

    let pages = crawler.crawl(&origin, 5, &channel).await.unwrap();

    let titles: Vec<&str> = pages.iter().map(|p| p.title.as_str()).collect();
    assert_eq!(titles, vec!["Home", "Fast"]);
}

#[tokio::test]
async fn test_crawl_of_unreachable_origin_is_empty() {
    let mock_server = MockServer::start().await;
    let origin = UrlGuard::permissive().normalize(&mock_server.uri()).unwrap();
    drop(mock_server);

    let crawler = http_crawler(fast_settings());
    let (channel, mut events) = EventChannel::open("crawl-unreachable");

    let pages = crawler.crawl(&origin, 3, &channel).await.unwrap();

    assert!(pages.is_empty());
    let events = drain(&mut events);
    let last = statuses(&events).last().map(|s| s.message.clone());
    assert_eq!(last.as_deref(), Some("Crawling complete! Analyzed 0 pages."));
}
