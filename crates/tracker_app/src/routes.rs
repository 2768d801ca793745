//! JSON routes for the local dashboard.
//!
//! - `GET  /check_draft` - take the pending clipboard draft, if any
//! - `POST /save_draft` - persist a confirmed draft
//! - `POST /update_status` - change one application's status
//! - `GET|POST /api/applications`, `GET|PUT|DELETE /api/applications/{id}`
//! - `GET  /api/stats?start=&end=` - dashboard counts and timeline
//! - `GET  /api/classify?url=` - URL-only platform detection

use axum::{
    extract::{rejection::JsonRejection, Path, Query, State},
    http::StatusCode,
    response::Json,
    routing::{get, post},
    Router,
};
use chrono::{Duration, NaiveDate};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use tracker_core::{classify, DraftRecord, PlatformInfo, StatsReport, MAX_TIMELINE_DAYS};
use tracker_engine::{DraftSlot, Today};
use tracker_logging::{tracker_info, tracker_warn};

use crate::error::{AppError, Result};
use crate::store::{Application, ApplicationStore, ApplicationUpdate, InsertOutcome, NewApplication};

const DUPLICATE_URL: &str = "URL already exists";
const NO_DATA: &str = "No data provided";
/// Default stats window, today included.
const DEFAULT_STATS_DAYS: i64 = 30;

#[derive(Clone)]
pub struct AppState {
    pub store: ApplicationStore,
    pub drafts: DraftSlot,
    pub today: Today,
}

impl AppState {
    pub fn new(store: ApplicationStore, drafts: DraftSlot) -> Self {
        Self {
            store,
            drafts,
            today: std::sync::Arc::new(|| chrono::Local::now().date_naive()),
        }
    }
}

pub fn create_router() -> Router<AppState> {
    let api_routes = Router::new()
        .route(
            "/applications",
            get(list_applications).post(create_application),
        )
        .route(
            "/applications/{id}",
            get(get_application)
                .put(update_application)
                .delete(delete_application),
        )
        .route("/stats", get(stats))
        .route("/classify", get(classify_url));

    Router::new()
        .route("/check_draft", get(check_draft))
        .route("/save_draft", post(save_draft))
        .route("/update_status", post(update_status))
        .nest("/api", api_routes)
}

#[derive(Debug, Serialize)]
pub struct CheckDraftResponse {
    pub has_draft: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub draft: Option<DraftRecord>,
}

#[derive(Debug, Serialize)]
pub struct SuccessResponse {
    pub success: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<&'static str>,
}

impl SuccessResponse {
    fn ok() -> Self {
        Self {
            success: true,
            error: None,
        }
    }

    fn failed(error: &'static str) -> Self {
        Self {
            success: false,
            error: Some(error),
        }
    }
}

async fn check_draft(State(state): State<AppState>) -> Json<CheckDraftResponse> {
    let draft = state.drafts.take();
    Json(CheckDraftResponse {
        has_draft: draft.is_some(),
        draft,
    })
}

async fn save_draft(
    State(state): State<AppState>,
    payload: std::result::Result<Json<Value>, JsonRejection>,
) -> Result<Json<SuccessResponse>> {
    let data = match payload {
        Ok(Json(value)) if has_data(&value) => value,
        _ => return Ok(Json(SuccessResponse::failed(NO_DATA))),
    };
    let app: NewApplication =
        serde_json::from_value(data).map_err(|err| AppError::BadRequest(err.to_string()))?;

    match state.store.insert(&app)? {
        InsertOutcome::Inserted(id) => {
            tracker_info!("Saved draft for {} as application {}", app.url, id);
            Ok(Json(SuccessResponse::ok()))
        }
        InsertOutcome::DuplicateUrl => {
            tracker_info!("Draft not saved, URL already tracked: {}", app.url);
            Ok(Json(SuccessResponse::failed(DUPLICATE_URL)))
        }
    }
}

fn has_data(value: &Value) -> bool {
    match value {
        Value::Null => false,
        Value::Object(map) => !map.is_empty(),
        _ => true,
    }
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct StatusChange {
    pub id: Option<i64>,
    pub status: Option<String>,
}

async fn update_status(
    State(state): State<AppState>,
    payload: std::result::Result<Json<StatusChange>, JsonRejection>,
) -> Result<Json<SuccessResponse>> {
    let change = payload.map(|Json(change)| change).unwrap_or_default();
    let (Some(id), Some(status)) = (change.id, change.status.filter(|s| !s.is_empty())) else {
        return Ok(Json(SuccessResponse {
            success: false,
            error: None,
        }));
    };
    let updated = state.store.update_status(id, &status)?;
    Ok(Json(SuccessResponse {
        success: updated,
        error: None,
    }))
}

async fn list_applications(State(state): State<AppState>) -> Result<Json<Vec<Application>>> {
    Ok(Json(state.store.list()?))
}

async fn create_application(
    State(state): State<AppState>,
    Json(app): Json<NewApplication>,
) -> Result<(StatusCode, Json<Application>)> {
    match state.store.insert(&app)? {
        InsertOutcome::Inserted(id) => {
            let created = state
                .store
                .get(id)?
                .ok_or_else(|| AppError::Internal(format!("application {id} vanished")))?;
            Ok((StatusCode::CREATED, Json(created)))
        }
        InsertOutcome::DuplicateUrl => {
            tracker_info!("Rejected duplicate application URL {}", app.url);
            Err(AppError::Conflict(DUPLICATE_URL.to_string()))
        }
    }
}

async fn get_application(
    State(state): State<AppState>,
    Path(id): Path<i64>,
) -> Result<Json<Application>> {
    state
        .store
        .get(id)?
        .map(Json)
        .ok_or_else(|| AppError::application_not_found(id))
}

async fn update_application(
    State(state): State<AppState>,
    Path(id): Path<i64>,
    Json(changes): Json<ApplicationUpdate>,
) -> Result<Json<Application>> {
    if !state.store.update(id, &changes)? {
        return Err(AppError::application_not_found(id));
    }
    state
        .store
        .get(id)?
        .map(Json)
        .ok_or_else(|| AppError::application_not_found(id))
}

async fn delete_application(
    State(state): State<AppState>,
    Path(id): Path<i64>,
) -> Result<StatusCode> {
    if state.store.delete(id)? {
        Ok(StatusCode::NO_CONTENT)
    } else {
        Err(AppError::application_not_found(id))
    }
}

#[derive(Debug, Default, Deserialize)]
pub struct StatsQuery {
    pub start: Option<String>,
    pub end: Option<String>,
}

async fn stats(
    State(state): State<AppState>,
    Query(query): Query<StatsQuery>,
) -> Result<Json<StatsReport>> {
    let today = (state.today)();
    let end = parse_date("end", query.end.as_deref())?.unwrap_or(today);
    let start = parse_date("start", query.start.as_deref())?
        .unwrap_or(today - Duration::days(DEFAULT_STATS_DAYS - 1));
    let span_days = (end - start).num_days().unsigned_abs() + 1;
    if span_days > MAX_TIMELINE_DAYS {
        tracker_warn!("Rejected stats range {} to {} ({} days)", start, end, span_days);
        return Err(AppError::BadRequest(format!(
            "date range must span at most {MAX_TIMELINE_DAYS} days"
        )));
    }

    let applications = state.store.list()?;
    let summaries: Vec<_> = applications.iter().map(Application::summary).collect();
    Ok(Json(StatsReport::build(&summaries, start, end, today)))
}

fn parse_date(name: &str, value: Option<&str>) -> Result<Option<NaiveDate>> {
    match value.map(str::trim).filter(|v| !v.is_empty()) {
        None => Ok(None),
        Some(raw) => NaiveDate::parse_from_str(raw, "%Y-%m-%d")
            .map(Some)
            .map_err(|_| {
                tracker_warn!("Rejected {} date {:?}", name, raw);
                AppError::BadRequest(format!("{name} must be YYYY-MM-DD"))
            }),
    }
}

#[derive(Debug, Deserialize)]
pub struct ClassifyQuery {
    pub url: String,
}

async fn classify_url(Query(query): Query<ClassifyQuery>) -> Json<PlatformInfo> {
    Json(classify(&query.url))
}
