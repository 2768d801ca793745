//! Tracker core: pure classification, merge rules, and the clipboard draft state machine.
mod classify;
mod draft;
mod effect;
mod msg;
mod platform;
mod state;
mod summary;
mod update;
mod view_model;

pub use classify::{classify, looks_like_job_url, title_case};
pub use draft::{DraftRecord, DEFAULT_STATUS};
pub use effect::Effect;
pub use msg::Msg;
pub use platform::{merge, Platform, PlatformInfo, ScrapeResult};
pub use state::WatchState;
pub use summary::{
    insights, is_interview_status, ApplicationSummary, DashboardStats, FlowData, FollowUp, Insight,
    InsightLevel, PlatformCount, StatsReport, TimelinePoint, MAX_TIMELINE_DAYS,
};
pub use update::update;
pub use view_model::{WatchPhase, WatchView};
