use std::sync::Arc;

use axum::{
    extract::{Query, State},
    Json,
};
use serde::Deserialize;

use qbitdash_core::qbit::{LogEntry, LogQuery};

use super::error::ApiResult;
use crate::state::AppState;

/// Entries returned per request.
const LOG_LIMIT: usize = 100;

#[derive(Debug, Deserialize)]
pub struct LogParams {
    #[serde(default = "default_true")]
    pub normal: bool,
    #[serde(default = "default_true")]
    pub info: bool,
    #[serde(default = "default_true")]
    pub warning: bool,
    #[serde(default = "default_true")]
    pub critical: bool,
    /// Only entries newer than this id; -1 for all.
    #[serde(default = "default_last_id")]
    pub last_id: i64,
}

fn default_true() -> bool {
    true
}

fn default_last_id() -> i64 {
    -1
}

/// GET /api/v1/logs
///
/// Newest entries first, at most [`LOG_LIMIT`].
pub async fn get_logs(
    State(state): State<Arc<AppState>>,
    Query(params): Query<LogParams>,
) -> ApiResult<Vec<LogEntry>> {
    let query = LogQuery {
        normal: params.normal,
        info: params.info,
        warning: params.warning,
        critical: params.critical,
        last_known_id: params.last_id,
    };

    let mut entries = state.qbit().logs(&query).await?;
    entries.sort_by(|a, b| b.id.cmp(&a.id));
    entries.truncate(LOG_LIMIT);
    Ok(Json(entries))
}
