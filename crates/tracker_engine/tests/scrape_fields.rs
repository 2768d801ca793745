use pretty_assertions::assert_eq;
use tracker_core::ScrapeResult;
use tracker_engine::{FieldScraper, SelectorSettings};

#[test]
fn extracts_fields_from_common_markup() {
    let html = r#"
        <html><head><title>Careers at Acme</title></head>
        <body>
          <h1 class="job-title">Position: Senior  Rust Engineer - Platform Team</h1>
          <div class="company-name">Acme Corp</div>
          <span class="location">Berlin,
             Germany</span>
          <p class="compensation">EUR 90k - 110k</p>
        </body></html>"#;

    let result = FieldScraper::default().extract(html);
    assert_eq!(
        result,
        ScrapeResult {
            company: "Acme Corp".to_string(),
            role: "Senior Rust Engineer".to_string(),
            job_id: String::new(),
            location: "Berlin, Germany".to_string(),
            salary: "EUR 90k - 110k".to_string(),
            error: None,
        }
    );
}

#[test]
fn earlier_selector_wins_over_later_ones() {
    let html = r#"<html><body>
        <div class="position-title">Second Choice</div>
        <h1 data-job-title="x">First Choice</h1>
    </body></html>"#;

    let result = FieldScraper::default().extract(html);
    assert_eq!(result.role, "First Choice");
}

#[test]
fn empty_matches_fall_through_to_next_selector() {
    let html = r#"<html><body>
        <div class="company-name">   </div>
        <div class="employer">Globex</div>
    </body></html>"#;

    let result = FieldScraper::default().extract(html);
    assert_eq!(result.company, "Globex");
}

#[test]
fn title_is_the_last_resort_for_role() {
    let html = "<html><head><title>Job: Data Analyst - Initech</title></head><body></body></html>";
    let result = FieldScraper::default().extract(html);
    assert_eq!(result.role, "Data Analyst");
    assert!(result.company.is_empty());
}

#[test]
fn unmatched_page_yields_empty_result() {
    let result = FieldScraper::default().extract("<html><body><p>Hello</p></body></html>");
    assert!(result.is_empty());
    assert_eq!(result.error, None);
}

#[test]
fn invalid_configured_selectors_are_skipped() {
    let selectors = SelectorSettings {
        role: vec!["h1[".to_string(), ".role".to_string()],
        ..SelectorSettings::default()
    };
    let scraper = FieldScraper::from_settings(&selectors);
    let result = scraper.extract(r#"<div class="role">Tester</div>"#);
    assert_eq!(result.role, "Tester");
}
