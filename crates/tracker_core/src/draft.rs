use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::{Platform, PlatformInfo};

pub const DEFAULT_STATUS: &str = "Applied";

/// Unconfirmed application entry built from a copied URL.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DraftRecord {
    pub url: String,
    pub platform: Platform,
    pub company: String,
    pub job_id: String,
    pub role: String,
    pub location: String,
    pub salary: String,
    /// `YYYY-MM-DD`.
    pub date_applied: String,
    pub status: String,
}

impl DraftRecord {
    pub fn new(url: impl Into<String>, info: PlatformInfo, today: NaiveDate) -> Self {
        Self {
            url: url.into(),
            platform: info.platform,
            company: info.company,
            job_id: info.job_id,
            role: info.role,
            location: info.location,
            salary: info.salary,
            date_applied: today.format("%Y-%m-%d").to_string(),
            status: DEFAULT_STATUS.to_string(),
        }
    }
}
