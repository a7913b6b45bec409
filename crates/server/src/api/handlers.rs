use axum::{
    extract::State,
    http::header,
    response::IntoResponse,
    Json,
};
use serde::Serialize;
use std::sync::Arc;
use qbitdash_core::qbit::{AppVersion, TransferInfo};
use qbitdash_core::SanitizedConfig;

use super::error::ApiResult;
use crate::metrics::encode_metrics;
use crate::state::AppState;

#[derive(Serialize)]
pub struct HealthResponse {
    pub status: String,
}

pub async fn health() -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "ok".to_string(),
    })
}

pub async fn get_config(State(state): State<Arc<AppState>>) -> Json<SanitizedConfig> {
    Json(state.sanitized_config())
}

/// GET /metrics
pub async fn metrics() -> impl IntoResponse {
    (
        [(header::CONTENT_TYPE, "text/plain; version=0.0.4")],
        encode_metrics(),
    )
}

/// GET /api/v1/app/version
pub async fn app_version(State(state): State<Arc<AppState>>) -> ApiResult<AppVersion> {
    Ok(Json(state.qbit().app_version().await?))
}

/// GET /api/v1/transfer
pub async fn transfer_info(State(state): State<Arc<AppState>>) -> ApiResult<TransferInfo> {
    Ok(Json(state.qbit().transfer_info().await?))
}
