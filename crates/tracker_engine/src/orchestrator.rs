//! Decide whether to scrape a job URL, do it politely, and merge the result.
//!
//! Every stage returns a value instead of an error:
//! gate -> robots -> rate limit -> fetch -> decode -> extract -> merge.
//! The caller always gets a `PlatformInfo` back, at worst the one it passed in.

use std::panic::AssertUnwindSafe;
use std::sync::Arc;

use futures_util::FutureExt;
use regex::Regex;
use tracker_core::{merge, PlatformInfo, ScrapeResult};
use tracker_logging::{tracker_error, tracker_info, tracker_warn};
use url::Url;

use crate::{
    decode_page, FieldScraper, Fetcher, RateLimiter, ReqwestFetcher, ResourceKind, RobotsCache,
    ScrapeSettings,
};

/// Pre-network eligibility of a URL for scraping.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum GateDecision {
    Eligible,
    Disabled,
    InvalidUrl,
    Blocked { domain: String },
    NotAllowlisted,
}

/// Allow/deny policy evaluated on the URL host only.
pub struct ScrapeGate {
    enabled: bool,
    allow: Vec<Regex>,
    blocked: Vec<String>,
}

impl ScrapeGate {
    pub fn from_settings(settings: &ScrapeSettings) -> Self {
        let allow = settings
            .allow_patterns
            .iter()
            .filter_map(|pattern| match Regex::new(&format!("(?i){pattern}")) {
                Ok(regex) => Some(regex),
                Err(err) => {
                    tracker_warn!("Skipping allow pattern {:?}: {}", pattern, err);
                    None
                }
            })
            .collect();
        let blocked = settings
            .blocked_domains
            .iter()
            .map(|domain| domain.trim().trim_start_matches('.').to_ascii_lowercase())
            .filter(|domain| !domain.is_empty())
            .collect();
        Self {
            enabled: settings.enabled,
            allow,
            blocked,
        }
    }

    pub fn check(&self, url: &str) -> GateDecision {
        if !self.enabled {
            return GateDecision::Disabled;
        }
        let host = match Url::parse(url) {
            Ok(parsed) if matches!(parsed.scheme(), "http" | "https") => {
                match parsed.host_str() {
                    Some(host) => host.to_ascii_lowercase(),
                    None => return GateDecision::InvalidUrl,
                }
            }
            _ => return GateDecision::InvalidUrl,
        };
        if let Some(domain) = self
            .blocked
            .iter()
            .find(|domain| host == **domain || host.ends_with(&format!(".{domain}")))
        {
            return GateDecision::Blocked {
                domain: domain.clone(),
            };
        }
        if self.allow.iter().any(|regex| regex.is_match(&host)) {
            GateDecision::Eligible
        } else {
            GateDecision::NotAllowlisted
        }
    }
}

/// What happened to a scrape attempt.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ScrapeOutcome {
    Skipped(GateDecision),
    Disallowed,
    Scraped(ScrapeResult),
}

pub struct ScrapeOrchestrator {
    user_agent: String,
    gate: ScrapeGate,
    robots: RobotsCache,
    limiter: RateLimiter,
    fetcher: Arc<dyn Fetcher>,
    scraper: FieldScraper,
}

impl ScrapeOrchestrator {
    pub fn new(settings: &ScrapeSettings) -> Self {
        let fetcher = Arc::new(ReqwestFetcher::new(settings.fetch_settings()));
        Self::with_fetcher(settings, fetcher)
    }

    /// Same pipeline over a caller-supplied fetcher (used for robots.txt too).
    pub fn with_fetcher(settings: &ScrapeSettings, fetcher: Arc<dyn Fetcher>) -> Self {
        Self {
            user_agent: settings.user_agent.clone(),
            gate: ScrapeGate::from_settings(settings),
            robots: RobotsCache::new(fetcher.clone()),
            limiter: RateLimiter::new(settings.min_delay(), settings.max_delay()),
            fetcher,
            scraper: FieldScraper::from_settings(&settings.selectors),
        }
    }

    pub fn gate(&self) -> &ScrapeGate {
        &self.gate
    }

    pub async fn scrape(&self, url: &str) -> ScrapeOutcome {
        let decision = self.gate.check(url);
        if decision != GateDecision::Eligible {
            tracker_info!("Skipping scraping for {}: {:?}", url, decision);
            return ScrapeOutcome::Skipped(decision);
        }

        if !self.robots.allowed(url, &self.user_agent).await {
            tracker_warn!("Robots.txt disallows fetching {}", url);
            return ScrapeOutcome::Disallowed;
        }

        self.limiter.wait_before_next_request().await;

        let result = match self.fetcher.fetch(url, ResourceKind::Page).await {
            Ok(output) => {
                let decoded = decode_page(&output.bytes, output.metadata.content_type.as_deref());
                if decoded.had_errors {
                    tracker_warn!(
                        "Page {} has malformed {} bytes; replaced them",
                        url,
                        decoded.encoding_label
                    );
                }
                let result = self.scraper.extract(&decoded.text);
                tracker_info!("Scraped job info from {}", url);
                result
            }
            Err(err) => {
                tracker_error!("Error fetching {}: {}", url, err);
                ScrapeResult::failed(format!("could not fetch page: {err}"))
            }
        };
        ScrapeOutcome::Scraped(result)
    }

    /// Fill empty fields of `info` from the page when allowed. Never fails.
    pub async fn enhance(&self, url: &str, info: PlatformInfo) -> PlatformInfo {
        match AssertUnwindSafe(self.scrape(url)).catch_unwind().await {
            Ok(ScrapeOutcome::Scraped(result)) => {
                if let Some(error) = &result.error {
                    tracker_warn!("Scraping error for {}: {}", url, error);
                }
                merge(info, &result)
            }
            Ok(ScrapeOutcome::Skipped(_) | ScrapeOutcome::Disallowed) => info,
            Err(_) => {
                tracker_error!("Scraping {} panicked; keeping URL-derived fields", url);
                info
            }
        }
    }
}
