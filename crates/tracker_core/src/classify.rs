//! URL-only platform classification. No network access.
//!
//! Hosts are matched against a priority-ordered table; the first rule whose
//! marker appears in the host wins and runs its extractor over the parsed URL.
//! Anything that does not parse as a URL with a host classifies as unknown.

use url::Url;

use crate::{Platform, PlatformInfo};

type Extractor = fn(&Url, &mut PlatformInfo);

struct Rule {
    markers: &'static [&'static str],
    platform: Platform,
    extract: Extractor,
}

const RULES: &[Rule] = &[
    Rule {
        markers: &["linkedin.com"],
        platform: Platform::LinkedIn,
        extract: extract_linkedin,
    },
    Rule {
        markers: &["greenhouse.io"],
        platform: Platform::Greenhouse,
        extract: extract_greenhouse,
    },
    Rule {
        markers: &["lever.co"],
        platform: Platform::Lever,
        extract: extract_lever,
    },
    Rule {
        markers: &["workday.com", "myworkdayjobs.com"],
        platform: Platform::Workday,
        extract: extract_workday,
    },
    Rule {
        markers: &["indeed.com"],
        platform: Platform::Indeed,
        extract: extract_indeed,
    },
    Rule {
        markers: &["angel.co", "wellfound.com"],
        platform: Platform::AngelList,
        extract: extract_nothing,
    },
    Rule {
        markers: &["glassdoor.com"],
        platform: Platform::Glassdoor,
        extract: extract_nothing,
    },
];

const CAREER_SITE_MARKERS: &[&str] = &["careers", "jobs"];
const JOB_BOARD_MARKERS: &[&str] = &["hiring", "employment", "position"];

const JOB_URL_KEYWORDS: &[&str] = &[
    "job",
    "career",
    "hiring",
    "employment",
    "position",
    "linkedin.com/jobs",
    "greenhouse.io",
    "lever.co",
    "workday.com",
    "indeed.com",
    "glassdoor.com",
    "angel.co",
    "wellfound.com",
];

/// Map a URL to its platform plus whatever the URL text alone reveals.
pub fn classify(raw: &str) -> PlatformInfo {
    let mut info = PlatformInfo::default();
    let Ok(url) = Url::parse(raw.trim()) else {
        return info;
    };
    let Some(host) = url.host_str().map(str::to_ascii_lowercase) else {
        return info;
    };

    if let Some(rule) = RULES
        .iter()
        .find(|rule| rule.markers.iter().any(|marker| host.contains(marker)))
    {
        info.platform = rule.platform;
        (rule.extract)(&url, &mut info);
        return info;
    }

    if CAREER_SITE_MARKERS.iter().any(|marker| host.contains(marker)) {
        info.platform = Platform::CompanyWebsite;
        info.company = company_from_career_host(&host);
    } else if JOB_BOARD_MARKERS.iter().any(|marker| host.contains(marker)) {
        info.platform = Platform::JobBoard;
    }
    info
}

/// True when clipboard text is an http(s) URL that mentions a job keyword or known board.
pub fn looks_like_job_url(text: &str) -> bool {
    let text = text.trim();
    if !(text.starts_with("http://") || text.starts_with("https://")) {
        return false;
    }
    let lower = text.to_ascii_lowercase();
    JOB_URL_KEYWORDS.iter().any(|keyword| lower.contains(keyword))
}

/// Capitalize the first letter of every alphabetic run and lowercase the rest.
pub fn title_case(input: &str) -> String {
    let mut out = String::with_capacity(input.len());
    let mut prev_alpha = false;
    for ch in input.chars() {
        if ch.is_alphabetic() {
            if prev_alpha {
                out.extend(ch.to_lowercase());
            } else {
                out.extend(ch.to_uppercase());
            }
            prev_alpha = true;
        } else {
            out.push(ch);
            prev_alpha = false;
        }
    }
    out
}

fn company_from_slug(slug: &str) -> String {
    title_case(&slug.replace('-', " "))
}

fn company_from_career_host(host: &str) -> String {
    let stripped = host.replace("careers.", "").replace("jobs.", "");
    let labels: Vec<&str> = stripped.split('.').collect();
    if labels.len() >= 2 {
        title_case(labels[labels.len() - 2])
    } else {
        String::new()
    }
}

fn segments(url: &Url) -> Vec<&str> {
    url.path_segments()
        .map(|parts| parts.filter(|part| !part.is_empty()).collect())
        .unwrap_or_default()
}

fn query_value(url: &Url, key: &str) -> Option<String> {
    url.query_pairs()
        .find(|(name, _)| name == key)
        .map(|(_, value)| value.into_owned())
        .filter(|value| !value.is_empty())
}

fn is_digits(value: &str) -> bool {
    !value.is_empty() && value.bytes().all(|b| b.is_ascii_digit())
}

/// Digits immediately following `marker` in the path, e.g. `/jobs/123`.
fn digits_after(parts: &[&str], marker: &str) -> Option<String> {
    parts
        .windows(2)
        .find(|pair| pair[0] == marker && is_digits(pair[1]))
        .map(|pair| pair[1].to_string())
}

fn extract_nothing(_url: &Url, _info: &mut PlatformInfo) {}

fn extract_linkedin(url: &Url, info: &mut PlatformInfo) {
    let parts = segments(url);
    let from_path = parts
        .windows(3)
        .find(|w| w[0] == "jobs" && w[1] == "view" && is_digits(w[2]))
        .map(|w| w[2].to_string());
    info.job_id = from_path
        .or_else(|| query_value(url, "currentJobId").filter(|id| is_digits(id)))
        .unwrap_or_default();
}

fn extract_greenhouse(url: &Url, info: &mut PlatformInfo) {
    let parts = segments(url);
    let host = url.host_str().unwrap_or_default().to_ascii_lowercase();
    let subdomain = host
        .strip_suffix("greenhouse.io")
        .map(|rest| rest.trim_end_matches('.'))
        .and_then(|rest| rest.split('.').next())
        .unwrap_or_default();

    let shared_board = matches!(subdomain, "" | "www" | "boards" | "job-boards");
    if !shared_board {
        info.company = company_from_slug(subdomain);
    } else if parts.first() == Some(&"embed") {
        info.company = query_value(url, "for")
            .map(|slug| company_from_slug(&slug))
            .unwrap_or_default();
        info.job_id = query_value(url, "token")
            .filter(|id| is_digits(id))
            .unwrap_or_default();
        return;
    } else if let Some(slug) = parts.first().filter(|slug| **slug != "jobs") {
        info.company = company_from_slug(slug);
    }
    info.job_id = digits_after(&parts, "jobs").unwrap_or_default();
}

fn extract_lever(url: &Url, info: &mut PlatformInfo) {
    let parts = segments(url);
    if let Some(slug) = parts.first() {
        info.company = company_from_slug(slug);
    }
    if let Some(id) = parts.get(1).filter(|id| **id != "apply") {
        info.job_id = (*id).to_string();
    }
}

fn extract_workday(url: &Url, info: &mut PlatformInfo) {
    let parts = segments(url);
    let from_path = parts
        .windows(2)
        .find(|pair| pair[1] == "job")
        .map(|pair| company_from_slug(pair[0]));
    info.company = from_path.unwrap_or_else(|| {
        let host = url.host_str().unwrap_or_default();
        if host.ends_with("myworkdayjobs.com") {
            host.split('.')
                .next()
                .map(company_from_slug)
                .unwrap_or_default()
        } else {
            String::new()
        }
    });
}

fn extract_indeed(url: &Url, info: &mut PlatformInfo) {
    info.job_id = query_value(url, "jk")
        .filter(|id| id.bytes().all(|b| b.is_ascii_alphanumeric()))
        .unwrap_or_default();
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn title_case_matches_word_boundaries() {
        assert_eq!(title_case("acme corp"), "Acme Corp");
        assert_eq!(title_case("ACME"), "Acme");
        assert_eq!(title_case("acme2go"), "Acme2Go");
    }

    #[test]
    fn career_host_uses_second_level_label() {
        assert_eq!(company_from_career_host("careers.google.com"), "Google");
        assert_eq!(company_from_career_host("jobs.netflix.com"), "Netflix");
        assert_eq!(company_from_career_host("careers"), "");
    }

    #[test]
    fn digits_after_requires_numeric_segment() {
        assert_eq!(digits_after(&["jobs", "123"], "jobs"), Some("123".to_string()));
        assert_eq!(digits_after(&["jobs", "abc"], "jobs"), None);
    }
}
