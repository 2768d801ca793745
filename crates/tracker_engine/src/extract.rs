//! Best-effort job field extraction from HTML.
//!
//! Each field has an ordered list of strategies; the first one that yields
//! non-empty trimmed text wins. A field with no hit stays empty, and a bad
//! selector only drops that one strategy.

use scraper::{Html, Selector};
use tracker_core::ScrapeResult;
use tracker_logging::tracker_warn;

use crate::SelectorSettings;

/// A pure lookup over a parsed page.
pub type Strategy = Box<dyn Fn(&Html) -> Option<String> + Send + Sync>;

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("invalid selector {selector:?}: {message}")]
pub struct SelectorError {
    pub selector: String,
    pub message: String,
}

/// Text of the first element matching `css`, whitespace-collapsed.
pub fn css_strategy(css: &str) -> Result<Strategy, SelectorError> {
    let selector = Selector::parse(css).map_err(|err| SelectorError {
        selector: css.to_string(),
        message: err.to_string(),
    })?;
    Ok(Box::new(move |doc: &Html| {
        doc.select(&selector)
            .next()
            .map(|element| collapse_whitespace(&element.text().collect::<String>()))
            .filter(|text| !text.is_empty())
    }))
}

/// First non-empty result, in order.
pub fn first_match(strategies: &[Strategy], doc: &Html) -> Option<String> {
    strategies.iter().find_map(|strategy| strategy(doc))
}

/// Drop a leading `Job:`/`Position:`/`Role:` label, then everything from the first ` - `.
pub fn clean_role(raw: &str) -> String {
    let trimmed = raw.trim();
    let without_label = ["job:", "position:", "role:"]
        .iter()
        .find_map(|label| {
            trimmed
                .get(..label.len())
                .filter(|head| head.eq_ignore_ascii_case(label))
                .map(|_| &trimmed[label.len()..])
        })
        .unwrap_or(trimmed)
        .trim_start();
    let head = match without_label.find(" - ") {
        Some(idx) => &without_label[..idx],
        None => without_label,
    };
    head.trim().to_string()
}

fn collapse_whitespace(text: &str) -> String {
    text.split_whitespace().collect::<Vec<_>>().join(" ")
}

pub struct FieldScraper {
    role: Vec<Strategy>,
    company: Vec<Strategy>,
    location: Vec<Strategy>,
    salary: Vec<Strategy>,
}

impl FieldScraper {
    pub fn from_settings(selectors: &SelectorSettings) -> Self {
        Self {
            role: compile("role", &selectors.role),
            company: compile("company", &selectors.company),
            location: compile("location", &selectors.location),
            salary: compile("salary", &selectors.salary),
        }
    }

    pub fn extract(&self, html: &str) -> ScrapeResult {
        let doc = Html::parse_document(html);
        let field = |strategies: &[Strategy]| first_match(strategies, &doc).unwrap_or_default();
        ScrapeResult {
            company: field(&self.company),
            role: first_match(&self.role, &doc)
                .map(|raw| clean_role(&raw))
                .unwrap_or_default(),
            job_id: String::new(),
            location: field(&self.location),
            salary: field(&self.salary),
            error: None,
        }
    }
}

impl Default for FieldScraper {
    fn default() -> Self {
        Self::from_settings(&SelectorSettings::default())
    }
}

fn compile(field: &str, selectors: &[String]) -> Vec<Strategy> {
    selectors
        .iter()
        .filter_map(|css| match css_strategy(css) {
            Ok(strategy) => Some(strategy),
            Err(err) => {
                tracker_warn!("Skipping {} selector: {}", field, err);
                None
            }
        })
        .collect()
}
