use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Once};

use async_trait::async_trait;
use pretty_assertions::assert_eq;
use tracker_core::{classify, Platform, PlatformInfo};
use tracker_engine::{
    FailureKind, FetchError, FetchMetadata, FetchOutput, Fetcher, GateDecision, ResourceKind,
    ScrapeOrchestrator, ScrapeOutcome, ScrapeSettings,
};
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

static INIT: Once = Once::new();

fn init_logging() {
    INIT.call_once(tracker_logging::initialize_for_tests);
}

const JOB_PAGE: &str = r#"<html><head><title>Jobs</title></head><body>
    <h1 class="job-title">Role: Backend Engineer - Remote</h1>
    <div class="company-name">Scraped Inc</div>
    <div class="location">Remote</div>
    <div class="salary">$150k</div>
</body></html>"#;

/// Serves fixed responses and counts every call.
#[derive(Default)]
struct CountingFetcher {
    calls: AtomicUsize,
    page: Option<&'static str>,
    robots: Option<&'static str>,
}

impl CountingFetcher {
    fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl Fetcher for CountingFetcher {
    async fn fetch(&self, url: &str, kind: ResourceKind) -> Result<FetchOutput, FetchError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        let body = match kind {
            ResourceKind::RobotsTxt => self.robots,
            ResourceKind::Page => self.page,
        };
        let body =
            body.ok_or_else(|| FetchError::new(FailureKind::HttpStatus(404), "not found"))?;
        Ok(FetchOutput {
            bytes: body.as_bytes().to_vec(),
            metadata: FetchMetadata {
                original_url: url.to_string(),
                final_url: url.to_string(),
                redirect_count: 0,
                content_type: Some("text/html; charset=utf-8".to_string()),
                byte_len: body.len() as u64,
            },
        })
    }
}

fn fast_settings() -> ScrapeSettings {
    ScrapeSettings {
        min_delay_secs: 0.0,
        max_delay_secs: 0.0,
        ..ScrapeSettings::default()
    }
}

fn local_settings() -> ScrapeSettings {
    ScrapeSettings {
        allow_patterns: vec![r"^127\.0\.0\.1$".to_string()],
        ..fast_settings()
    }
}

#[test]
fn gate_applies_enabled_flag_deny_list_then_allow_list() {
    let orchestrator = ScrapeOrchestrator::new(&fast_settings());
    let gate = orchestrator.gate();
    assert_eq!(
        gate.check("https://careers.acme.com/jobs/1"),
        GateDecision::Eligible
    );
    assert_eq!(
        gate.check("https://jobs.example.org/42"),
        GateDecision::Eligible
    );
    assert_eq!(
        gate.check("https://www.linkedin.com/jobs/view/1"),
        GateDecision::Blocked {
            domain: "linkedin.com".to_string()
        }
    );
    assert_eq!(
        gate.check("https://acme.com/about"),
        GateDecision::NotAllowlisted
    );
    assert_eq!(gate.check("mailto:hr@acme.com"), GateDecision::InvalidUrl);

    let disabled = ScrapeOrchestrator::new(&ScrapeSettings {
        enabled: false,
        ..fast_settings()
    });
    assert_eq!(
        disabled.gate().check("https://careers.acme.com/jobs/1"),
        GateDecision::Disabled
    );
}

#[test]
fn deny_list_beats_allow_list() {
    let settings = ScrapeSettings {
        allow_patterns: vec![r"indeed".to_string()],
        ..fast_settings()
    };
    let orchestrator = ScrapeOrchestrator::new(&settings);
    assert!(matches!(
        orchestrator.gate().check("https://jobs.indeed.com/viewjob?jk=1"),
        GateDecision::Blocked { .. }
    ));
}

#[tokio::test]
async fn blocked_domains_are_never_fetched() {
    init_logging();
    let fetcher = Arc::new(CountingFetcher {
        page: Some(JOB_PAGE),
        robots: Some("User-agent: *\nAllow: /\n"),
        ..CountingFetcher::default()
    });
    let orchestrator = ScrapeOrchestrator::with_fetcher(&fast_settings(), fetcher.clone());

    let url = "https://www.linkedin.com/jobs/view/123456";
    let info = classify(url);
    let enhanced = orchestrator.enhance(url, info.clone()).await;

    assert_eq!(enhanced, info);
    assert_eq!(fetcher.calls(), 0);
}

#[tokio::test]
async fn disabled_scraping_never_fetches() {
    let fetcher = Arc::new(CountingFetcher::default());
    let settings = ScrapeSettings {
        enabled: false,
        ..fast_settings()
    };
    let orchestrator = ScrapeOrchestrator::with_fetcher(&settings, fetcher.clone());

    let outcome = orchestrator.scrape("https://careers.acme.com/jobs/1").await;
    assert_eq!(outcome, ScrapeOutcome::Skipped(GateDecision::Disabled));
    assert_eq!(fetcher.calls(), 0);
}

#[tokio::test]
async fn robots_disallow_stops_before_page_fetch() {
    let fetcher = Arc::new(CountingFetcher {
        page: Some(JOB_PAGE),
        robots: Some("User-agent: *\nDisallow: /\n"),
        ..CountingFetcher::default()
    });
    let orchestrator = ScrapeOrchestrator::with_fetcher(&fast_settings(), fetcher.clone());

    let outcome = orchestrator.scrape("https://careers.acme.com/jobs/1").await;
    assert_eq!(outcome, ScrapeOutcome::Disallowed);
    assert_eq!(fetcher.calls(), 1);

    orchestrator.scrape("https://careers.acme.com/jobs/2").await;
    assert_eq!(fetcher.calls(), 1);
}

#[tokio::test]
async fn scraped_fields_fill_only_empty_slots() {
    init_logging();
    let fetcher = Arc::new(CountingFetcher {
        page: Some(JOB_PAGE),
        robots: Some("User-agent: *\nAllow: /\n"),
        ..CountingFetcher::default()
    });
    let orchestrator = ScrapeOrchestrator::with_fetcher(&fast_settings(), fetcher.clone());

    let existing = PlatformInfo {
        platform: Platform::CompanyWebsite,
        company: "Acme".to_string(),
        ..PlatformInfo::default()
    };
    let enhanced = orchestrator
        .enhance("https://careers.acme.com/jobs/7", existing)
        .await;

    assert_eq!(
        enhanced,
        PlatformInfo {
            platform: Platform::CompanyWebsite,
            company: "Acme".to_string(),
            job_id: String::new(),
            role: "Backend Engineer".to_string(),
            location: "Remote".to_string(),
            salary: "$150k".to_string(),
        }
    );
    assert_eq!(fetcher.calls(), 2);
}

#[tokio::test]
async fn end_to_end_against_local_server() {
    init_logging();
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/robots.txt"))
        .respond_with(ResponseTemplate::new(200).set_body_string("User-agent: *\nDisallow:\n"))
        .expect(1)
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/jobs/55"))
        .respond_with(ResponseTemplate::new(200).set_body_raw(JOB_PAGE, "text/html"))
        .expect(1)
        .mount(&server)
        .await;

    let orchestrator = ScrapeOrchestrator::new(&local_settings());
    let url = format!("{}/jobs/55", server.uri());
    let outcome = orchestrator.scrape(&url).await;

    let ScrapeOutcome::Scraped(result) = outcome else {
        panic!("expected a scrape, got {outcome:?}");
    };
    assert_eq!(result.company, "Scraped Inc");
    assert_eq!(result.role, "Backend Engineer");
    assert_eq!(result.error, None);
}

#[tokio::test]
async fn page_timeout_keeps_url_derived_fields() {
    init_logging();
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/robots.txt"))
        .respond_with(ResponseTemplate::new(404))
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/jobs/slow"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_delay(std::time::Duration::from_millis(500))
                .set_body_raw(JOB_PAGE, "text/html"),
        )
        .mount(&server)
        .await;

    let settings = ScrapeSettings {
        timeout_secs: 0.1,
        ..local_settings()
    };
    let orchestrator = ScrapeOrchestrator::new(&settings);
    let url = format!("{}/jobs/slow", server.uri());

    let ScrapeOutcome::Scraped(result) = orchestrator.scrape(&url).await else {
        panic!("expected a failed scrape result");
    };
    assert!(result.error.is_some());
    assert!(result.is_empty());

    let existing = PlatformInfo {
        company: "Kept".to_string(),
        job_id: "slow".to_string(),
        ..PlatformInfo::default()
    };
    let enhanced = orchestrator.enhance(&url, existing.clone()).await;
    assert_eq!(enhanced, existing);
}

#[tokio::test]
async fn stray_bytes_in_page_still_yield_fields() {
    init_logging();
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/robots.txt"))
        .respond_with(ResponseTemplate::new(404))
        .mount(&server)
        .await;
    let page: &[u8] =
        b"<html><body><h1 class=\"job-title\">Engineer</h1><p>Caf\xe9 perks</p></body></html>";
    Mock::given(method("GET"))
        .and(path("/jobs/latin"))
        .respond_with(ResponseTemplate::new(200).set_body_raw(page, "text/html; charset=utf-8"))
        .mount(&server)
        .await;

    let orchestrator = ScrapeOrchestrator::new(&local_settings());
    let url = format!("{}/jobs/latin", server.uri());
    let ScrapeOutcome::Scraped(result) = orchestrator.scrape(&url).await else {
        panic!("expected a scrape result");
    };
    assert_eq!(result.role, "Engineer");
    assert_eq!(result.error, None);
}
