use std::fmt;

use serde::{Deserialize, Serialize};

/// Job board or career system a URL belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum Platform {
    LinkedIn,
    Greenhouse,
    Lever,
    Workday,
    Indeed,
    AngelList,
    Glassdoor,
    #[serde(rename = "Company Website")]
    CompanyWebsite,
    #[serde(rename = "Job Board")]
    JobBoard,
    #[default]
    #[serde(rename = "")]
    Unknown,
}

impl Platform {
    pub fn as_str(self) -> &'static str {
        match self {
            Platform::LinkedIn => "LinkedIn",
            Platform::Greenhouse => "Greenhouse",
            Platform::Lever => "Lever",
            Platform::Workday => "Workday",
            Platform::Indeed => "Indeed",
            Platform::AngelList => "AngelList",
            Platform::Glassdoor => "Glassdoor",
            Platform::CompanyWebsite => "Company Website",
            Platform::JobBoard => "Job Board",
            Platform::Unknown => "",
        }
    }
}

impl fmt::Display for Platform {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Fields derivable for a job URL. Empty string means "unknown".
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct PlatformInfo {
    pub platform: Platform,
    pub company: String,
    pub job_id: String,
    pub role: String,
    pub location: String,
    pub salary: String,
}

/// Best-effort output of a page scrape.
///
/// `error` is diagnostic only; whatever fields were obtained are still merged.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct ScrapeResult {
    pub company: String,
    pub role: String,
    pub job_id: String,
    pub location: String,
    pub salary: String,
    pub error: Option<String>,
}

impl ScrapeResult {
    pub fn failed(error: impl Into<String>) -> Self {
        Self {
            error: Some(error.into()),
            ..Self::default()
        }
    }

    pub fn is_empty(&self) -> bool {
        [
            &self.company,
            &self.role,
            &self.job_id,
            &self.location,
            &self.salary,
        ]
        .iter()
        .all(|value| value.is_empty())
    }
}

/// Fill fields still empty in `existing` from `scraped`; existing values always win.
pub fn merge(existing: PlatformInfo, scraped: &ScrapeResult) -> PlatformInfo {
    PlatformInfo {
        platform: existing.platform,
        company: prefer(existing.company, &scraped.company),
        job_id: prefer(existing.job_id, &scraped.job_id),
        role: prefer(existing.role, &scraped.role),
        location: prefer(existing.location, &scraped.location),
        salary: prefer(existing.salary, &scraped.salary),
    }
}

fn prefer(existing: String, scraped: &str) -> String {
    if existing.is_empty() {
        scraped.to_string()
    } else {
        existing
    }
}
