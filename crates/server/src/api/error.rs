//! Mapping of domain errors onto HTTP responses.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::Serialize;
use tracing::warn;

use qbitdash_core::{QbitError, SearchError};

#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    pub error: String,
    /// Body as received from qBittorrent when it could not be decoded.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub raw: Option<String>,
}

/// Error returned by every API handler.
#[derive(Debug)]
pub struct ApiError {
    status: StatusCode,
    message: String,
    raw: Option<String>,
}

pub type ApiResult<T> = Result<Json<T>, ApiError>;

impl ApiError {
    pub fn new(status: StatusCode, message: impl Into<String>) -> Self {
        Self {
            status,
            message: message.into(),
            raw: None,
        }
    }

    pub fn bad_request(message: impl Into<String>) -> Self {
        Self::new(StatusCode::BAD_REQUEST, message)
    }

    pub fn not_found(message: impl Into<String>) -> Self {
        Self::new(StatusCode::NOT_FOUND, message)
    }

    pub fn status(&self) -> StatusCode {
        self.status
    }
}

impl From<QbitError> for ApiError {
    fn from(e: QbitError) -> Self {
        let status = match &e {
            QbitError::AuthenticationRequired => StatusCode::UNAUTHORIZED,
            QbitError::SearchUnavailable => StatusCode::SERVICE_UNAVAILABLE,
            QbitError::NotFound(_) => StatusCode::NOT_FOUND,
            QbitError::InvalidRequest(_) => StatusCode::BAD_REQUEST,
            QbitError::Timeout => StatusCode::GATEWAY_TIMEOUT,
            QbitError::Transport(_) | QbitError::Decode { .. } => StatusCode::BAD_GATEWAY,
        };
        let raw = match &e {
            QbitError::Decode { raw, .. } => Some(raw.clone()),
            _ => None,
        };
        Self {
            status,
            message: e.to_string(),
            raw,
        }
    }
}

impl From<SearchError> for ApiError {
    fn from(e: SearchError) -> Self {
        match e {
            SearchError::InvalidQuery(_) => Self::bad_request(e.to_string()),
            SearchError::AlreadyRunning(_) => Self::new(StatusCode::CONFLICT, e.to_string()),
            SearchError::Api(inner) => inner.into(),
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        if self.status.is_server_error() {
            warn!(status = %self.status, error = %self.message, "Upstream request failed");
        }
        (
            self.status,
            Json(ErrorResponse {
                error: self.message,
                raw: self.raw,
            }),
        )
            .into_response()
    }
}
