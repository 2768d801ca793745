//! Dashboard and analytics aggregation over stored applications.

use std::collections::HashMap;

use chrono::{Days, NaiveDate};
use serde::Serialize;

const INTERVIEW_KEYWORDS: &[&str] = &["interview", "technical", "final", "assessment"];
const MAX_FOLLOW_UPS: usize = 5;
const MAX_INSIGHTS: usize = 4;

/// Longest timeline a report will build, in days including both ends.
pub const MAX_TIMELINE_DAYS: u64 = 366;

/// Borrowed view of the columns the aggregation needs.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ApplicationSummary<'a> {
    pub id: i64,
    pub company: &'a str,
    pub role: &'a str,
    pub status: &'a str,
    pub platform: &'a str,
    pub date_applied: &'a str,
    pub follow_up_on: Option<&'a str>,
}

pub fn is_interview_status(status: &str) -> bool {
    let lower = status.to_lowercase();
    INTERVIEW_KEYWORDS.iter().any(|keyword| lower.contains(keyword))
}

fn is_offer(status: &str) -> bool {
    matches!(status, "Offer" | "Accepted")
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
pub struct DashboardStats {
    pub total: usize,
    pub applied: usize,
    pub interview: usize,
    pub offer: usize,
    /// Rejected plus "No Response".
    pub rejected: usize,
}

impl DashboardStats {
    pub fn from_applications(apps: &[ApplicationSummary<'_>]) -> Self {
        let count = |pred: &dyn Fn(&str) -> bool| apps.iter().filter(|a| pred(a.status)).count();
        Self {
            total: apps.len(),
            applied: count(&|s: &str| s == "Applied"),
            interview: count(&is_interview_status),
            offer: count(&is_offer),
            rejected: count(&|s: &str| matches!(s, "Rejected" | "No Response")),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PlatformCount {
    pub platform: String,
    pub count: usize,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TimelinePoint {
    pub date: String,
    pub count: usize,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FollowUp {
    pub id: i64,
    pub company: String,
    pub role: String,
    pub follow_up_on: String,
}

/// Counts for the application outcome flow chart.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
pub struct FlowData {
    pub no_response: usize,
    pub rejected_early: usize,
    pub interviews: usize,
    /// Interview-stage statuses that never reached an offer.
    pub no_offer: usize,
    pub offers: usize,
    pub declined: usize,
    pub accepted: usize,
}

impl FlowData {
    pub fn from_applications(apps: &[ApplicationSummary<'_>]) -> Self {
        let count = |pred: &dyn Fn(&str) -> bool| apps.iter().filter(|a| pred(a.status)).count();
        Self {
            no_response: count(&|s: &str| s == "No Response"),
            rejected_early: count(&|s: &str| s == "Rejected"),
            interviews: count(&is_interview_status),
            no_offer: count(&|s: &str| is_interview_status(s) && !is_offer(s)),
            offers: count(&is_offer),
            declined: count(&|s: &str| s == "Declined"),
            accepted: count(&|s: &str| s == "Accepted"),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum InsightLevel {
    Warning,
    Success,
    Info,
    Primary,
}

/// One dashboard hint derived from the rates and counts.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Insight {
    #[serde(rename = "type")]
    pub level: InsightLevel,
    pub icon: &'static str,
    pub title: String,
    pub message: String,
}

impl Insight {
    fn new(level: InsightLevel, icon: &'static str, title: &str, message: String) -> Self {
        Self {
            level,
            icon,
            title: title.to_string(),
            message,
        }
    }
}

/// At most four hints, in a fixed order: response rate, volume, interview
/// conversion, busiest platform. Nothing for an empty history.
pub fn insights(
    dashboard: &DashboardStats,
    response_rate: f64,
    platforms: &[PlatformCount],
) -> Vec<Insight> {
    let total = dashboard.total;
    if total == 0 {
        return Vec::new();
    }
    let mut out = Vec::new();

    if response_rate < 20.0 {
        out.push(Insight::new(
            InsightLevel::Warning,
            "exclamation-triangle",
            "Low Response Rate",
            format!(
                "Your response rate is {response_rate:.1}%. Consider improving your resume or targeting more suitable positions."
            ),
        ));
    } else if response_rate > 50.0 {
        out.push(Insight::new(
            InsightLevel::Success,
            "check-circle",
            "Great Response Rate!",
            format!("Your {response_rate:.1}% response rate is excellent. Keep up the good work!"),
        ));
    }

    if total < 10 {
        out.push(Insight::new(
            InsightLevel::Info,
            "info-circle",
            "Consider Applying More",
            "Job searching is a numbers game. Consider increasing your application volume for better results."
                .to_string(),
        ));
    } else if total > 50 {
        out.push(Insight::new(
            InsightLevel::Primary,
            "trophy",
            "High Application Volume",
            format!("You've submitted {total} applications - great persistence!"),
        ));
    }

    if dashboard.interview > 0 && dashboard.offer == 0 {
        out.push(Insight::new(
            InsightLevel::Warning,
            "arrow-up",
            "Interview Skills Focus",
            "You're getting interviews but no offers. Consider practicing interview skills or researching companies better."
                .to_string(),
        ));
    }

    // First platform wins a tie.
    if let Some(top) = platforms.iter().rev().max_by_key(|p| p.count) {
        out.push(Insight::new(
            InsightLevel::Info,
            "graph-up",
            "Platform Performance",
            format!(
                "{} is your most used platform with {} applications.",
                top.platform, top.count
            ),
        ));
    }

    out.truncate(MAX_INSIGHTS);
    out
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct StatsReport {
    pub dashboard: DashboardStats,
    pub rejected: usize,
    pub no_response: usize,
    pub response_rate: f64,
    pub interview_rate: f64,
    pub success_rate: f64,
    pub platforms: Vec<PlatformCount>,
    pub start_date: String,
    pub end_date: String,
    pub timeline: Vec<TimelinePoint>,
    pub follow_ups: Vec<FollowUp>,
    pub flow: FlowData,
    pub insights: Vec<Insight>,
}

impl StatsReport {
    /// Aggregate over `apps`; the timeline covers `start..=end` (swapped if reversed),
    /// trimmed to the last [`MAX_TIMELINE_DAYS`] days.
    pub fn build(
        apps: &[ApplicationSummary<'_>],
        start: NaiveDate,
        end: NaiveDate,
        today: NaiveDate,
    ) -> Self {
        let (start, end) = if start > end { (end, start) } else { (start, end) };
        let earliest = end
            .checked_sub_days(Days::new(MAX_TIMELINE_DAYS - 1))
            .unwrap_or(NaiveDate::MIN);
        let start = start.max(earliest);
        let dashboard = DashboardStats::from_applications(apps);
        let rejected = apps.iter().filter(|a| a.status == "Rejected").count();
        let no_response = apps.iter().filter(|a| a.status == "No Response").count();
        let total = dashboard.total;

        let response_rate = percent(dashboard.interview + dashboard.offer + rejected, total);
        let interview_rate = percent(dashboard.interview, total);
        let success_rate = percent(dashboard.offer, total);

        let today_str = today.format("%Y-%m-%d").to_string();
        let follow_ups = apps
            .iter()
            .filter_map(|a| {
                let due = a.follow_up_on.filter(|d| !d.is_empty())?;
                (due <= today_str.as_str()).then(|| FollowUp {
                    id: a.id,
                    company: a.company.to_string(),
                    role: a.role.to_string(),
                    follow_up_on: due.to_string(),
                })
            })
            .take(MAX_FOLLOW_UPS)
            .collect();

        let platforms = platform_counts(apps);
        let insights = insights(&dashboard, response_rate, &platforms);

        Self {
            dashboard,
            rejected,
            no_response,
            response_rate,
            interview_rate,
            success_rate,
            platforms,
            start_date: start.format("%Y-%m-%d").to_string(),
            end_date: end.format("%Y-%m-%d").to_string(),
            timeline: timeline(apps, start, end),
            follow_ups,
            flow: FlowData::from_applications(apps),
            insights,
        }
    }
}

fn percent(part: usize, total: usize) -> f64 {
    if total == 0 {
        return 0.0;
    }
    let raw = part as f64 / total as f64 * 100.0;
    (raw * 10.0).round() / 10.0
}

fn platform_counts(apps: &[ApplicationSummary<'_>]) -> Vec<PlatformCount> {
    let mut counts: Vec<PlatformCount> = Vec::new();
    for app in apps.iter().filter(|a| !a.platform.is_empty()) {
        match counts.iter_mut().find(|c| c.platform == app.platform) {
            Some(entry) => entry.count += 1,
            None => counts.push(PlatformCount {
                platform: app.platform.to_string(),
                count: 1,
            }),
        }
    }
    counts
}

fn timeline(apps: &[ApplicationSummary<'_>], start: NaiveDate, end: NaiveDate) -> Vec<TimelinePoint> {
    let mut per_day: HashMap<NaiveDate, usize> = HashMap::new();
    for day in apps
        .iter()
        .filter_map(|a| a.date_applied.get(..10))
        .filter_map(|d| NaiveDate::parse_from_str(d, "%Y-%m-%d").ok())
        .filter(|d| (start..=end).contains(d))
    {
        *per_day.entry(day).or_default() += 1;
    }

    start
        .iter_days()
        .take_while(|day| *day <= end)
        .map(|day| TimelinePoint {
            date: day.format("%Y-%m-%d").to_string(),
            count: per_day.get(&day).copied().unwrap_or(0),
        })
        .collect()
}
