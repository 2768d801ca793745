use std::time::Duration;

use serde::{Deserialize, Serialize};

pub const DEFAULT_USER_AGENT: &str =
    "Job-Tracker/1.0 (Educational Project; Contact: your-email@example.com)";

/// Scraping options, read once at startup.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ScrapeSettings {
    pub enabled: bool,
    pub min_delay_secs: f64,
    pub max_delay_secs: f64,
    pub timeout_secs: f64,
    pub connect_timeout_secs: f64,
    pub user_agent: String,
    /// Regexes matched against the URL host; one must match before scraping.
    pub allow_patterns: Vec<String>,
    /// Domains never scraped, regardless of robots.txt.
    pub blocked_domains: Vec<String>,
    pub selectors: SelectorSettings,
    pub redirect_limit: usize,
    pub max_bytes: u64,
}

impl Default for ScrapeSettings {
    fn default() -> Self {
        Self {
            enabled: true,
            min_delay_secs: 2.0,
            max_delay_secs: 5.0,
            timeout_secs: 10.0,
            connect_timeout_secs: 10.0,
            user_agent: DEFAULT_USER_AGENT.to_string(),
            allow_patterns: to_strings(&[
                r"(^|\.)careers\.",
                r"(^|\.)jobs\.",
                r"(^|\.)hire\.",
                r"(^|\.)work\.",
            ]),
            blocked_domains: to_strings(&["linkedin.com", "indeed.com", "glassdoor.com"]),
            selectors: SelectorSettings::default(),
            redirect_limit: 5,
            max_bytes: 5 * 1024 * 1024,
        }
    }
}

impl ScrapeSettings {
    pub fn min_delay(&self) -> Duration {
        secs(self.min_delay_secs)
    }

    pub fn max_delay(&self) -> Duration {
        secs(self.max_delay_secs)
    }

    pub fn fetch_settings(&self) -> FetchSettings {
        FetchSettings {
            connect_timeout: secs(self.connect_timeout_secs),
            request_timeout: secs(self.timeout_secs),
            redirect_limit: self.redirect_limit,
            max_bytes: self.max_bytes,
            user_agent: self.user_agent.clone(),
            ..FetchSettings::default()
        }
    }
}

/// Ordered CSS selector lists per field; the first non-empty match wins.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct SelectorSettings {
    pub role: Vec<String>,
    pub company: Vec<String>,
    pub location: Vec<String>,
    pub salary: Vec<String>,
}

impl Default for SelectorSettings {
    fn default() -> Self {
        Self {
            role: to_strings(&[
                "h1.job-title",
                "h1[data-job-title]",
                ".job-title",
                "h1.position-title",
                ".position-title",
                ".role-title",
                "h1:first-of-type",
                "title",
            ]),
            company: to_strings(&[
                ".company-name",
                ".employer-name",
                "[data-company]",
                r#"span[itemprop="hiringOrganization"]"#,
                ".company",
                ".employer",
            ]),
            location: to_strings(&[
                ".job-location",
                ".location",
                "[data-location]",
                r#"span[itemprop="jobLocation"]"#,
                ".job-location-text",
                ".position-location",
            ]),
            salary: to_strings(&[
                ".salary",
                ".compensation",
                "[data-salary]",
                r#"span[itemprop="baseSalary"]"#,
                ".salary-range",
                ".pay-range",
            ]),
        }
    }
}

#[derive(Debug, Clone)]
pub struct FetchSettings {
    pub connect_timeout: Duration,
    pub request_timeout: Duration,
    pub redirect_limit: usize,
    pub max_bytes: u64,
    pub user_agent: String,
    pub allowed_content_types: Vec<String>,
}

impl Default for FetchSettings {
    fn default() -> Self {
        Self {
            connect_timeout: Duration::from_secs(10),
            request_timeout: Duration::from_secs(10),
            redirect_limit: 5,
            max_bytes: 5 * 1024 * 1024,
            user_agent: DEFAULT_USER_AGENT.to_string(),
            allowed_content_types: vec![
                "text/html".to_string(),
                "application/xhtml+xml".to_string(),
            ],
        }
    }
}

fn to_strings(values: &[&str]) -> Vec<String> {
    values.iter().map(|v| (*v).to_string()).collect()
}

// Negative or NaN seconds map to zero; anything above one day is capped.
fn secs(value: f64) -> Duration {
    if value.is_finite() && value > 0.0 {
        Duration::from_secs_f64(value.min(86_400.0))
    } else {
        Duration::ZERO
    }
}
