//! Search handlers.
//!
//! The search runs in the background on the daemon; the dashboard starts it,
//! then re-reads the snapshot while the poll loop refreshes it. Sort and page
//! of the result table are kept server side so every snapshot shows the page
//! the user is on.

use std::sync::Arc;

use axum::{extract::State, http::StatusCode, Json};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use qbitdash_core::qbit::SearchPlugin;
use qbitdash_core::{
    ResultSortField, ResultView, SearchJob, SearchJobId, SearchStatus, StopReason,
};

use super::error::{ApiError, ApiResult};
use crate::state::AppState;

#[derive(Debug, Deserialize)]
pub struct StartSearchRequest {
    pub query: String,
}

#[derive(Debug, Deserialize)]
pub struct SortRequest {
    pub field: ResultSortField,
}

#[derive(Debug, Deserialize)]
pub struct PageRequest {
    pub page: usize,
}

/// Job metadata without the result list (that goes through the view).
#[derive(Debug, Serialize)]
pub struct JobSummary {
    pub id: SearchJobId,
    pub query: String,
    pub status: SearchStatus,
    pub total: u64,
    pub polls: u32,
    pub started_at: DateTime<Utc>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub finished_at: Option<DateTime<Utc>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub stop_reason: Option<StopReason>,
}

impl From<&SearchJob> for JobSummary {
    fn from(job: &SearchJob) -> Self {
        Self {
            id: job.id,
            query: job.query.clone(),
            status: job.status,
            total: job.total,
            polls: job.polls,
            started_at: job.started_at,
            finished_at: job.finished_at,
            stop_reason: job.stop_reason.clone(),
        }
    }
}

#[derive(Debug, Serialize)]
pub struct SearchSnapshot {
    pub running: bool,
    pub job: Option<JobSummary>,
    pub results: Option<ResultView>,
}

#[derive(Debug, Serialize)]
pub struct CancelResponse {
    pub cancelled: bool,
}

async fn snapshot(state: &AppState) -> SearchSnapshot {
    let search = state.search();
    let running = search.is_running().await;
    let job = search.current().await;

    let results = match &job {
        Some(job) => Some(state.results().lock().await.view(job)),
        None => None,
    };

    SearchSnapshot {
        running,
        job: job.as_ref().map(JobSummary::from),
        results,
    }
}

/// POST /api/v1/search
pub async fn start_search(
    State(state): State<Arc<AppState>>,
    Json(body): Json<StartSearchRequest>,
) -> Result<(StatusCode, Json<SearchSnapshot>), ApiError> {
    state.search().start(&body.query).await?;
    Ok((StatusCode::CREATED, Json(snapshot(&state).await)))
}

/// GET /api/v1/search
pub async fn get_search(State(state): State<Arc<AppState>>) -> Json<SearchSnapshot> {
    Json(snapshot(&state).await)
}

/// POST /api/v1/search/sort
///
/// Sorting by the active column flips its direction; a new column starts
/// descending. Either way the table goes back to page 1.
pub async fn sort_results(
    State(state): State<Arc<AppState>>,
    Json(body): Json<SortRequest>,
) -> Json<SearchSnapshot> {
    state.results().lock().await.sort_by(body.field);
    Json(snapshot(&state).await)
}

/// POST /api/v1/search/page
pub async fn set_page(
    State(state): State<Arc<AppState>>,
    Json(body): Json<PageRequest>,
) -> ApiResult<SearchSnapshot> {
    if body.page == 0 {
        return Err(ApiError::bad_request("Pages start at 1"));
    }
    state.results().lock().await.set_page(body.page);
    Ok(Json(snapshot(&state).await))
}

/// DELETE /api/v1/search
pub async fn cancel_search(State(state): State<Arc<AppState>>) -> Json<CancelResponse> {
    Json(CancelResponse {
        cancelled: state.search().cancel().await,
    })
}

/// GET /api/v1/search/plugins
pub async fn list_plugins(State(state): State<Arc<AppState>>) -> ApiResult<Vec<SearchPlugin>> {
    Ok(Json(state.qbit().search_plugins().await?))
}
