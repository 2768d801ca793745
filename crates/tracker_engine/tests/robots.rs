use std::sync::Arc;

use tracker_engine::{FetchSettings, ReqwestFetcher, RobotsCache, RobotsPolicy};
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

const UA: &str = "Job-Tracker/1.0 (Educational Project; Contact: your-email@example.com)";

fn cache() -> RobotsCache {
    RobotsCache::new(Arc::new(ReqwestFetcher::new(FetchSettings::default())))
}

#[tokio::test]
async fn rules_are_fetched_once_per_origin() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/robots.txt"))
        .respond_with(
            ResponseTemplate::new(200).set_body_string("User-agent: *\nDisallow: /internal\n"),
        )
        .expect(1)
        .mount(&server)
        .await;

    let robots = cache();
    let base = server.uri();
    assert!(robots.allowed(&format!("{base}/jobs/1"), UA).await);
    assert!(!robots.allowed(&format!("{base}/internal/roles"), UA).await);
    assert!(robots.allowed(&format!("{base}/jobs/2"), UA).await);
    assert_eq!(robots.origin_count(), 1);
}

#[tokio::test]
async fn server_error_denies_and_is_cached() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/robots.txt"))
        .respond_with(ResponseTemplate::new(500))
        .expect(1)
        .mount(&server)
        .await;

    let robots = cache();
    let url = format!("{}/jobs/1", server.uri());
    assert!(!robots.allowed(&url, UA).await);
    assert!(!robots.allowed(&url, UA).await);
    assert!(matches!(
        robots.cached(&server.uri()),
        Some(RobotsPolicy::Unreadable(_))
    ));
}

#[tokio::test]
async fn missing_robots_allows_everything() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/robots.txt"))
        .respond_with(ResponseTemplate::new(404))
        .mount(&server)
        .await;

    let robots = cache();
    assert!(robots.allowed(&format!("{}/jobs/1", server.uri()), UA).await);
    assert_eq!(robots.cached(&server.uri()), Some(RobotsPolicy::AllowAll));
}

#[tokio::test]
async fn forbidden_robots_denies_everything() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/robots.txt"))
        .respond_with(ResponseTemplate::new(403))
        .mount(&server)
        .await;

    let robots = cache();
    assert!(!robots.allowed(&format!("{}/jobs/1", server.uri()), UA).await);
}

#[tokio::test]
async fn unreachable_host_denies() {
    let robots = cache();
    // Nothing listens on port 9 locally.
    assert!(!robots.allowed("http://127.0.0.1:9/jobs/1", UA).await);
    assert!(!robots.allowed("not a url", UA).await);
}

#[tokio::test]
async fn empty_disallow_group_does_not_swallow_next_group() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/robots.txt"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_string("User-agent: *\nDisallow:\n\nUser-agent: BadBot\nDisallow: /\n"),
        )
        .mount(&server)
        .await;

    let robots = cache();
    assert!(robots.allowed(&format!("{}/jobs/1", server.uri()), UA).await);
    assert!(!robots.allowed(&format!("{}/jobs/1", server.uri()), "BadBot/1.0").await);
}

#[tokio::test]
async fn empty_user_agent_line_is_skipped() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/robots.txt"))
        .respond_with(ResponseTemplate::new(200).set_body_string("User-agent:\nDisallow: /\n"))
        .mount(&server)
        .await;

    let robots = cache();
    assert!(robots.allowed(&format!("{}/jobs/1", server.uri()), UA).await);
}
