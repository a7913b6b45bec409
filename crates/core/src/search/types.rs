//! Search job and result types.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::qbit::QbitError;

/// Server-assigned search job handle.
pub type SearchJobId = i64;

/// Status tag of a remote search job.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum SearchStatus {
    Running,
    Paused,
    Stopped,
    Completed,
    Error,
    #[serde(other)]
    Unknown,
}

impl SearchStatus {
    /// No further results will arrive once a job reports a terminal status.
    pub fn is_terminal(&self) -> bool {
        matches!(self, SearchStatus::Stopped | SearchStatus::Completed)
    }
}

/// One hit from a search plugin. Never mutated after it is received.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SearchResult {
    pub file_name: String,
    /// Size in bytes; -1 when the plugin does not know.
    #[serde(default)]
    pub file_size: i64,
    #[serde(default)]
    pub nb_seeders: i64,
    #[serde(default)]
    pub nb_leechers: i64,
    #[serde(default)]
    pub site_url: String,
    #[serde(default)]
    pub descr_link: String,
    /// Magnet link or direct .torrent URL.
    #[serde(default)]
    pub file_url: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub engine_name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub pub_date: Option<i64>,
}

/// Body of `search/results`. `results` is the full accumulated list, not a delta.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SearchResultsResponse {
    #[serde(default)]
    pub results: Vec<SearchResult>,
    pub status: SearchStatus,
    #[serde(default)]
    pub total: u64,
}

/// Why a poll loop stopped.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum StopReason {
    /// The job reached a terminal status.
    Finished { status: SearchStatus },
    /// The attempt ceiling was reached before a terminal status.
    AttemptsExhausted,
    Cancelled,
    /// A poll failed; the loop does not retry.
    Failed { error: String },
}

impl StopReason {
    pub fn as_str(&self) -> &'static str {
        match self {
            StopReason::Finished { .. } => "finished",
            StopReason::AttemptsExhausted => "attempts_exhausted",
            StopReason::Cancelled => "cancelled",
            StopReason::Failed { .. } => "failed",
        }
    }
}

/// Snapshot of a search job.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SearchJob {
    pub id: SearchJobId,
    pub query: String,
    pub status: SearchStatus,
    /// Latest non-empty batch received from the daemon.
    pub results: Vec<SearchResult>,
    /// Total reported by the daemon on the last poll.
    pub total: u64,
    pub polls: u32,
    /// Bumped every time `results` is replaced.
    pub generation: u64,
    pub started_at: DateTime<Utc>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub finished_at: Option<DateTime<Utc>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub stop_reason: Option<StopReason>,
}

impl SearchJob {
    pub fn new(id: SearchJobId, query: impl Into<String>) -> Self {
        Self {
            id,
            query: query.into(),
            status: SearchStatus::Running,
            results: Vec::new(),
            total: 0,
            polls: 0,
            generation: 0,
            started_at: Utc::now(),
            finished_at: None,
            stop_reason: None,
        }
    }

    pub fn is_active(&self) -> bool {
        self.stop_reason.is_none()
    }

    /// Apply one poll response. A non-empty batch replaces the accumulation;
    /// an empty one leaves it as it was.
    pub fn apply_poll(&mut self, response: SearchResultsResponse) {
        self.polls += 1;
        self.status = response.status;
        self.total = response.total;
        if !response.results.is_empty() {
            self.results = response.results;
            self.generation += 1;
        }
    }

    pub fn finish(&mut self, reason: StopReason) {
        self.finished_at = Some(Utc::now());
        self.stop_reason = Some(reason);
    }
}

/// Errors returned by the search orchestrator.
#[derive(Debug, Clone, Error)]
pub enum SearchError {
    #[error("Invalid search query: {0}")]
    InvalidQuery(String),

    /// Carries the running job id, or None while its start is in flight.
    #[error("A search is already running")]
    AlreadyRunning(Option<SearchJobId>),

    #[error(transparent)]
    Api(#[from] QbitError),
}

#[cfg(test)]
mod tests {
    use super::*;

    fn result(name: &str, seeders: i64) -> SearchResult {
        SearchResult {
            file_name: name.to_string(),
            file_size: 1024,
            nb_seeders: seeders,
            nb_leechers: 1,
            site_url: "https://example.org".to_string(),
            descr_link: String::new(),
            file_url: format!("magnet:?xt=urn:btih:{}", name),
            engine_name: None,
            pub_date: None,
        }
    }

    #[test]
    fn test_terminal_statuses() {
        assert!(SearchStatus::Stopped.is_terminal());
        assert!(SearchStatus::Completed.is_terminal());
        assert!(!SearchStatus::Running.is_terminal());
        assert!(!SearchStatus::Paused.is_terminal());
        assert!(!SearchStatus::Error.is_terminal());
    }

    #[test]
    fn test_status_wire_names() {
        let status: SearchStatus = serde_json::from_str("\"Stopped\"").unwrap();
        assert_eq!(status, SearchStatus::Stopped);
        let status: SearchStatus = serde_json::from_str("\"Whatever\"").unwrap();
        assert_eq!(status, SearchStatus::Unknown);
    }

    #[test]
    fn test_results_response_wire_format() {
        let json = r#"{
            "results": [{
                "descrLink": "https://example.org/t/1",
                "fileName": "ubuntu-24.04-desktop-amd64.iso",
                "fileSize": 6114656256,
                "fileUrl": "magnet:?xt=urn:btih:abc",
                "nbLeechers": 12,
                "nbSeeders": 340,
                "siteUrl": "https://example.org",
                "engineName": "example",
                "pubDate": 1713916800
            }],
            "status": "Running",
            "total": 1
        }"#;
        let response: SearchResultsResponse = serde_json::from_str(json).unwrap();
        assert_eq!(response.status, SearchStatus::Running);
        assert_eq!(response.total, 1);
        let hit = &response.results[0];
        assert_eq!(hit.file_size, 6114656256);
        assert_eq!(hit.nb_seeders, 340);
        assert_eq!(hit.engine_name.as_deref(), Some("example"));
    }

    #[test]
    fn test_apply_poll_replaces_not_merges() {
        let mut job = SearchJob::new(1, "ubuntu");
        job.apply_poll(SearchResultsResponse {
            results: vec![result("a", 1), result("b", 2)],
            status: SearchStatus::Running,
            total: 2,
        });
        assert_eq!(job.results.len(), 2);
        assert_eq!(job.generation, 1);

        job.apply_poll(SearchResultsResponse {
            results: vec![result("c", 3)],
            status: SearchStatus::Running,
            total: 1,
        });
        assert_eq!(job.results, vec![result("c", 3)]);
        assert_eq!(job.generation, 2);
        assert_eq!(job.polls, 2);
    }

    #[test]
    fn test_apply_poll_empty_batch_keeps_previous() {
        let mut job = SearchJob::new(1, "ubuntu");
        job.apply_poll(SearchResultsResponse {
            results: vec![result("a", 1)],
            status: SearchStatus::Running,
            total: 1,
        });
        job.apply_poll(SearchResultsResponse {
            results: vec![],
            status: SearchStatus::Stopped,
            total: 1,
        });
        assert_eq!(job.results.len(), 1);
        assert_eq!(job.generation, 1);
        assert_eq!(job.status, SearchStatus::Stopped);
    }

    #[test]
    fn test_finish_records_reason() {
        let mut job = SearchJob::new(7, "debian");
        assert!(job.is_active());
        job.finish(StopReason::Cancelled);
        assert!(!job.is_active());
        assert!(job.finished_at.is_some());

        let json = serde_json::to_value(&job).unwrap();
        assert_eq!(json["stop_reason"]["type"], "cancelled");
    }
}
