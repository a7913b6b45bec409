//! Session handlers: who is logged in to qBittorrent, login and logout.

use std::sync::Arc;

use axum::{extract::State, Json};
use serde::Deserialize;
use tracing::{info, warn};

use qbitdash_core::qbit::SessionInfo;

use super::error::{ApiError, ApiResult};
use crate::state::AppState;

#[derive(Debug, Deserialize)]
pub struct LoginRequest {
    pub username: String,
    #[serde(default)]
    pub password: String,
}

/// GET /api/v1/session
pub async fn get_session(State(state): State<Arc<AppState>>) -> Json<SessionInfo> {
    Json(state.qbit().session().await)
}

/// POST /api/v1/session/login
///
/// Replace the credentials and log in with them.
pub async fn login(
    State(state): State<Arc<AppState>>,
    Json(body): Json<LoginRequest>,
) -> ApiResult<SessionInfo> {
    let username = body.username.trim();
    if username.is_empty() {
        return Err(ApiError::bad_request("Username cannot be empty"));
    }

    let qbit = state.qbit();
    qbit.set_credentials(username, &body.password).await;
    qbit.authenticate().await?;
    info!(username, "Logged in to qBittorrent");

    Ok(Json(qbit.session().await))
}

/// POST /api/v1/session/logout
///
/// Best effort: the local session is dropped even when the daemon is gone.
pub async fn logout(State(state): State<Arc<AppState>>) -> Json<SessionInfo> {
    let qbit = state.qbit();
    if let Err(e) = qbit.logout().await {
        warn!(error = %e, "Logout request failed");
    }
    Json(qbit.session().await)
}
