use std::sync::Arc;

use axum::{extract::State, Json};
use serde_json::{Map, Value};
use tracing::info;

use super::error::{ApiError, ApiResult};
use crate::state::AppState;

/// GET /api/v1/preferences
pub async fn get_preferences(
    State(state): State<Arc<AppState>>,
) -> ApiResult<Map<String, Value>> {
    Ok(Json(state.qbit().preferences().await?))
}

/// POST /api/v1/preferences
///
/// Partial update: only the keys in the body change. Returns the preferences
/// as the daemon reports them afterwards.
pub async fn set_preferences(
    State(state): State<Arc<AppState>>,
    Json(changes): Json<Map<String, Value>>,
) -> ApiResult<Map<String, Value>> {
    if changes.is_empty() {
        return Err(ApiError::bad_request("No preferences given"));
    }

    let qbit = state.qbit();
    qbit.set_preferences(&changes).await?;
    info!(keys = ?changes.keys().collect::<Vec<_>>(), "Updated preferences");

    Ok(Json(qbit.preferences().await?))
}
