//! SQLite persistence for job applications.
//!
//! One table, keyed by an autoincrement id, with a uniqueness constraint on
//! `url`. Empty URLs are stored as NULL so manual entries without a link
//! never collide with each other.

use std::fs;
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use chrono::Local;
use rusqlite::types::Value;
use rusqlite::{params, params_from_iter, Connection, OptionalExtension, Row};
use serde::{Deserialize, Serialize};
use tracker_core::{ApplicationSummary, DraftRecord, DEFAULT_STATUS};
use tracker_logging::tracker_info;

#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    #[error("failed to create database directory {path:?}: {source}")]
    CreateDir {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("URL already exists")]
    DuplicateUrl,
    #[error("database error: {0}")]
    Sqlite(#[from] rusqlite::Error),
}

pub type Result<T> = std::result::Result<T, StoreError>;

/// A stored application row.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Application {
    pub id: i64,
    pub company: String,
    pub role: String,
    pub job_id: String,
    pub date_applied: String,
    pub status: String,
    pub url: String,
    pub platform: String,
    pub location: String,
    pub salary: String,
    pub notes: String,
    pub tags: String,
    pub next_action: String,
    pub follow_up_on: Option<String>,
    pub created_at: String,
    pub updated_at: String,
}

impl Application {
    pub fn summary(&self) -> ApplicationSummary<'_> {
        ApplicationSummary {
            id: self.id,
            company: &self.company,
            role: &self.role,
            status: &self.status,
            platform: &self.platform,
            date_applied: &self.date_applied,
            follow_up_on: self.follow_up_on.as_deref(),
        }
    }

    fn from_row(row: &Row<'_>) -> rusqlite::Result<Self> {
        let text = |idx: usize| -> rusqlite::Result<String> {
            Ok(row.get::<_, Option<String>>(idx)?.unwrap_or_default())
        };
        Ok(Self {
            id: row.get(0)?,
            company: text(1)?,
            role: text(2)?,
            job_id: text(3)?,
            date_applied: text(4)?,
            status: text(5)?,
            url: text(6)?,
            platform: text(7)?,
            location: text(8)?,
            salary: text(9)?,
            notes: text(10)?,
            tags: text(11)?,
            next_action: text(12)?,
            follow_up_on: row
                .get::<_, Option<String>>(13)?
                .filter(|value| !value.is_empty()),
            created_at: text(14)?,
            updated_at: text(15)?,
        })
    }
}

/// Fields accepted when creating an application; anything missing defaults.
#[derive(Debug, Clone, PartialEq, Eq, Default, Deserialize)]
#[serde(default)]
pub struct NewApplication {
    pub company: String,
    pub role: String,
    pub job_id: String,
    pub date_applied: Option<String>,
    pub status: Option<String>,
    pub url: String,
    pub platform: String,
    pub location: String,
    pub salary: String,
    pub notes: String,
    pub tags: String,
    pub next_action: String,
    pub follow_up_on: Option<String>,
}

impl From<DraftRecord> for NewApplication {
    fn from(draft: DraftRecord) -> Self {
        Self {
            company: draft.company,
            role: draft.role,
            job_id: draft.job_id,
            date_applied: Some(draft.date_applied),
            status: Some(draft.status),
            url: draft.url,
            platform: draft.platform.as_str().to_string(),
            location: draft.location,
            salary: draft.salary,
            ..Self::default()
        }
    }
}

/// Partial update; `None` leaves a column untouched.
#[derive(Debug, Clone, PartialEq, Eq, Default, Deserialize)]
#[serde(default)]
pub struct ApplicationUpdate {
    pub company: Option<String>,
    pub role: Option<String>,
    pub job_id: Option<String>,
    pub date_applied: Option<String>,
    pub status: Option<String>,
    pub url: Option<String>,
    pub platform: Option<String>,
    pub location: Option<String>,
    pub salary: Option<String>,
    pub notes: Option<String>,
    pub tags: Option<String>,
    pub next_action: Option<String>,
    pub follow_up_on: Option<String>,
}

impl ApplicationUpdate {
    pub fn status(status: impl Into<String>) -> Self {
        Self {
            status: Some(status.into()),
            ..Self::default()
        }
    }

    // Column names come from this fixed list only.
    fn assignments(&self) -> Vec<(&'static str, Option<String>)> {
        let nullable = |value: &String| Some(value.clone()).filter(|v| !v.is_empty());
        let columns: [(&'static str, Option<Option<String>>); 13] = [
            ("company", self.company.clone().map(Some)),
            ("role", self.role.clone().map(Some)),
            ("job_id", self.job_id.clone().map(Some)),
            ("date_applied", self.date_applied.clone().map(Some)),
            ("status", self.status.clone().map(Some)),
            ("url", self.url.as_ref().map(nullable)),
            ("platform", self.platform.clone().map(Some)),
            ("location", self.location.clone().map(Some)),
            ("salary", self.salary.clone().map(Some)),
            ("notes", self.notes.clone().map(Some)),
            ("tags", self.tags.clone().map(Some)),
            ("next_action", self.next_action.clone().map(Some)),
            ("follow_up_on", self.follow_up_on.as_ref().map(nullable)),
        ];
        columns
            .into_iter()
            .filter_map(|(column, value)| value.map(|value| (column, value)))
            .collect()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InsertOutcome {
    Inserted(i64),
    DuplicateUrl,
}

const SCHEMA: &str = "
CREATE TABLE IF NOT EXISTS applications (
    id INTEGER PRIMARY KEY AUTOINCREMENT,
    company TEXT NOT NULL,
    role TEXT NOT NULL,
    job_id TEXT,
    date_applied DATE DEFAULT CURRENT_DATE,
    status TEXT DEFAULT 'Applied',
    url TEXT UNIQUE,
    platform TEXT,
    location TEXT,
    salary TEXT,
    notes TEXT,
    tags TEXT,
    next_action TEXT,
    follow_up_on DATE,
    created_at TIMESTAMP DEFAULT CURRENT_TIMESTAMP,
    updated_at TIMESTAMP DEFAULT CURRENT_TIMESTAMP
);
CREATE INDEX IF NOT EXISTS idx_url ON applications(url);
";

const COLUMNS: &str = "id, company, role, job_id, date_applied, status, url, platform, \
     location, salary, notes, tags, next_action, follow_up_on, created_at, updated_at";

#[derive(Clone)]
pub struct ApplicationStore {
    conn: Arc<Mutex<Connection>>,
}

impl ApplicationStore {
    /// Open (or create) the database file, creating its parent directory first.
    pub fn open(path: &Path) -> Result<Self> {
        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(parent).map_err(|source| StoreError::CreateDir {
                path: parent.to_path_buf(),
                source,
            })?;
        }
        let store = Self::from_connection(Connection::open(path)?)?;
        tracker_info!("Opened application store at {:?}", path);
        Ok(store)
    }

    pub fn open_in_memory() -> Result<Self> {
        Self::from_connection(Connection::open_in_memory()?)
    }

    fn from_connection(conn: Connection) -> Result<Self> {
        conn.execute_batch(SCHEMA)?;
        Ok(Self {
            conn: Arc::new(Mutex::new(conn)),
        })
    }

    pub fn insert(&self, app: &NewApplication) -> Result<InsertOutcome> {
        let today = Local::now().date_naive().format("%Y-%m-%d").to_string();
        let date_applied = app
            .date_applied
            .clone()
            .filter(|value| !value.is_empty())
            .unwrap_or(today);
        let status = app
            .status
            .clone()
            .filter(|value| !value.is_empty())
            .unwrap_or_else(|| DEFAULT_STATUS.to_string());
        let url = Some(app.url.trim()).filter(|value| !value.is_empty());
        let follow_up_on = app.follow_up_on.as_deref().filter(|value| !value.is_empty());

        let conn = self.lock();
        let inserted = conn.execute(
            "INSERT INTO applications
             (company, role, job_id, date_applied, status, url, platform,
              location, salary, notes, tags, next_action, follow_up_on)
             VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10, ?11, ?12, ?13)",
            params![
                app.company,
                app.role,
                app.job_id,
                date_applied,
                status,
                url,
                app.platform,
                app.location,
                app.salary,
                app.notes,
                app.tags,
                app.next_action,
                follow_up_on,
            ],
        );
        match inserted {
            Ok(_) => Ok(InsertOutcome::Inserted(conn.last_insert_rowid())),
            Err(err) if is_unique_violation(&err) => Ok(InsertOutcome::DuplicateUrl),
            Err(err) => Err(err.into()),
        }
    }

    /// Newest application date first, then newest entry.
    pub fn list(&self) -> Result<Vec<Application>> {
        let conn = self.lock();
        let mut stmt = conn.prepare(&format!(
            "SELECT {COLUMNS} FROM applications
             ORDER BY date_applied DESC, created_at DESC, id DESC"
        ))?;
        let rows = stmt.query_map([], Application::from_row)?;
        rows.collect::<rusqlite::Result<Vec<_>>>()
            .map_err(StoreError::from)
    }

    pub fn get(&self, id: i64) -> Result<Option<Application>> {
        let conn = self.lock();
        conn.query_row(
            &format!("SELECT {COLUMNS} FROM applications WHERE id = ?1"),
            params![id],
            Application::from_row,
        )
        .optional()
        .map_err(StoreError::from)
    }

    /// Apply the present fields and bump `updated_at`. Returns false for an unknown id.
    pub fn update(&self, id: i64, changes: &ApplicationUpdate) -> Result<bool> {
        let assignments = changes.assignments();
        if assignments.is_empty() {
            return Ok(self.get(id)?.is_some());
        }

        let mut sql = String::from("UPDATE applications SET ");
        let mut values: Vec<Value> = Vec::with_capacity(assignments.len() + 2);
        for (idx, (column, value)) in assignments.into_iter().enumerate() {
            sql.push_str(&format!("{column} = ?{}, ", idx + 1));
            values.push(value.map_or(Value::Null, Value::Text));
        }
        let updated_at = Local::now().format("%Y-%m-%d %H:%M:%S").to_string();
        values.push(Value::Text(updated_at));
        values.push(Value::Integer(id));
        sql.push_str(&format!(
            "updated_at = ?{} WHERE id = ?{}",
            values.len() - 1,
            values.len()
        ));

        let conn = self.lock();
        match conn.execute(&sql, params_from_iter(values)) {
            Ok(changed) => Ok(changed > 0),
            Err(err) if is_unique_violation(&err) => Err(StoreError::DuplicateUrl),
            Err(err) => Err(err.into()),
        }
    }

    pub fn update_status(&self, id: i64, status: &str) -> Result<bool> {
        self.update(id, &ApplicationUpdate::status(status))
    }

    pub fn delete(&self, id: i64) -> Result<bool> {
        let conn = self.lock();
        let removed = conn.execute("DELETE FROM applications WHERE id = ?1", params![id])?;
        Ok(removed > 0)
    }

    fn lock(&self) -> MutexGuard<'_, Connection> {
        self.conn.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

fn is_unique_violation(err: &rusqlite::Error) -> bool {
    matches!(
        err,
        rusqlite::Error::SqliteFailure(code, _)
            if code.extended_code == rusqlite::ffi::SQLITE_CONSTRAINT_UNIQUE
    )
}
