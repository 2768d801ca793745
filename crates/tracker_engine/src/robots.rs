//! robots.txt policy per origin, cached for the life of the process.
//!
//! Reading is fail-closed: if robots.txt cannot be fetched or decoded the
//! origin is treated as disallowed, and that decision is cached too so a
//! broken origin is not asked again.

use std::collections::HashMap;
use std::sync::{Arc, Mutex, PoisonError};

use texting_robots::Robot;
use tracker_logging::{tracker_debug, tracker_warn};
use url::Url;

use crate::{decode_body, FailureKind, FetchError, FetchOutput, Fetcher, ResourceKind};

/// Cached outcome of reading one origin's robots.txt.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RobotsPolicy {
    AllowAll,
    DisallowAll,
    /// robots.txt could not be read; denies everything.
    Unreadable(String),
    Rules(RobotsRules),
}

impl RobotsPolicy {
    pub fn is_allowed(&self, path: &str, user_agent: &str) -> bool {
        match self {
            RobotsPolicy::AllowAll => true,
            RobotsPolicy::DisallowAll | RobotsPolicy::Unreadable(_) => false,
            RobotsPolicy::Rules(rules) => rules.is_allowed(path, user_agent),
        }
    }

    fn from_fetch(result: Result<FetchOutput, FetchError>) -> Self {
        match result {
            Ok(output) => match decode_body(&output.bytes, output.metadata.content_type.as_deref()) {
                Ok(decoded) => RobotsPolicy::Rules(RobotsRules::parse(&decoded.text)),
                Err(err) => RobotsPolicy::Unreadable(err.to_string()),
            },
            Err(err) => match err.kind {
                FailureKind::HttpStatus(401 | 403) => RobotsPolicy::DisallowAll,
                FailureKind::HttpStatus(400..=499) => RobotsPolicy::AllowAll,
                _ => RobotsPolicy::Unreadable(err.to_string()),
            },
        }
    }
}

/// One origin's robots.txt body, matched with `texting_robots` on each check.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct RobotsRules {
    body: String,
}

impl RobotsRules {
    pub fn parse(body: &str) -> Self {
        Self {
            body: body.to_string(),
        }
    }

    /// Google matching rules: the group for our product token, else `*`;
    /// longest path wins and Allow wins a tie. A body the matcher rejects denies.
    pub fn is_allowed(&self, path: &str, user_agent: &str) -> bool {
        if path == "/robots.txt" {
            return true;
        }
        match Robot::new(&product_token(user_agent), self.body.as_bytes()) {
            Ok(robot) => robot.allowed(path),
            Err(err) => {
                tracker_debug!("robots.txt rejected by matcher: {}", err);
                false
            }
        }
    }
}

/// `Job-Tracker/1.0 (...)` -> `job-tracker`.
fn product_token(user_agent: &str) -> String {
    user_agent
        .split(['/', ' '])
        .next()
        .unwrap_or_default()
        .to_ascii_lowercase()
}

/// Per-origin robots.txt decisions.
pub struct RobotsCache {
    fetcher: Arc<dyn Fetcher>,
    entries: Mutex<HashMap<String, RobotsPolicy>>,
}

impl RobotsCache {
    pub fn new(fetcher: Arc<dyn Fetcher>) -> Self {
        Self {
            fetcher,
            entries: Mutex::new(HashMap::new()),
        }
    }

    /// Whether `user_agent` may fetch `url`. Fetches robots.txt on first use of an origin.
    pub async fn allowed(&self, url: &str, user_agent: &str) -> bool {
        let Ok(parsed) = Url::parse(url) else {
            return false;
        };
        if !matches!(parsed.scheme(), "http" | "https") || parsed.host_str().is_none() {
            return false;
        }
        let origin = parsed.origin().ascii_serialization();
        let mut path = parsed.path().to_string();
        if let Some(query) = parsed.query() {
            path.push('?');
            path.push_str(query);
        }

        let policy = match self.cached(&origin) {
            Some(policy) => policy,
            None => self.load(&origin).await,
        };
        let allowed = policy.is_allowed(&path, user_agent);
        tracker_debug!("robots.txt for {} allows {}: {}", origin, path, allowed);
        allowed
    }

    /// The cached decision for an origin such as `https://careers.example.com`.
    pub fn cached(&self, origin: &str) -> Option<RobotsPolicy> {
        self.lock().get(origin).cloned()
    }

    /// Number of origins with a cached decision.
    pub fn origin_count(&self) -> usize {
        self.lock().len()
    }

    async fn load(&self, origin: &str) -> RobotsPolicy {
        let robots_url = format!("{origin}/robots.txt");
        let policy = RobotsPolicy::from_fetch(
            self.fetcher
                .fetch(&robots_url, ResourceKind::RobotsTxt)
                .await,
        );
        if let RobotsPolicy::Unreadable(reason) = &policy {
            tracker_warn!("Could not read robots.txt for {}: {}", origin, reason);
        }
        self.lock()
            .entry(origin.to_string())
            .or_insert(policy)
            .clone()
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, HashMap<String, RobotsPolicy>> {
        self.entries.lock().unwrap_or_else(PoisonError::into_inner)
    }
}
