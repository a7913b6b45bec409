//! Errors surfaced by the qBittorrent facade.

use thiserror::Error;

/// Errors that can occur while talking to the qBittorrent WebUI API.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum QbitError {
    /// The daemon answered 401/403, or rejected the login.
    #[error("Authentication required")]
    AuthenticationRequired,

    /// Network failure or a non-2xx answer other than auth/not-found.
    #[error("Request failed: {0}")]
    Transport(String),

    #[error("Request timeout")]
    Timeout,

    /// `search/start` returned no job identifier.
    #[error("Search not available - no plugins configured")]
    SearchUnavailable,

    #[error("Not found: {0}")]
    NotFound(String),

    /// A JSON endpoint returned something that is not the expected JSON.
    /// `raw` keeps the body as received so callers can show it.
    #[error("Unexpected response: {reason}")]
    Decode { reason: String, raw: String },

    #[error("Invalid request: {0}")]
    InvalidRequest(String),
}

impl QbitError {
    /// Whether the caller has to log in again before retrying.
    pub fn is_auth(&self) -> bool {
        matches!(self, QbitError::AuthenticationRequired)
    }

    /// Short label used for metrics.
    pub fn kind(&self) -> &'static str {
        match self {
            QbitError::AuthenticationRequired => "auth",
            QbitError::Transport(_) => "transport",
            QbitError::Timeout => "timeout",
            QbitError::SearchUnavailable => "search_unavailable",
            QbitError::NotFound(_) => "not_found",
            QbitError::Decode { .. } => "decode",
            QbitError::InvalidRequest(_) => "invalid_request",
        }
    }
}

impl From<reqwest::Error> for QbitError {
    fn from(e: reqwest::Error) -> Self {
        if e.is_timeout() {
            QbitError::Timeout
        } else {
            QbitError::Transport(e.to_string())
        }
    }
}
