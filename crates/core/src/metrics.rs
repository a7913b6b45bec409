//! Prometheus metrics for core components.
//!
//! This module provides metrics for:
//! - Search orchestration (jobs by outcome, polls)
//! - qBittorrent API calls (count and latency per endpoint)

use once_cell::sync::Lazy;
use prometheus::{HistogramOpts, HistogramVec, IntCounter, IntCounterVec, Opts};

// =============================================================================
// Search Metrics
// =============================================================================

/// Search jobs by outcome.
pub static SEARCH_JOBS: Lazy<IntCounterVec> = Lazy::new(|| {
    IntCounterVec::new(
        Opts::new("qbitdash_search_jobs_total", "Total search jobs by outcome"),
        // "started", "rejected", "finished", "attempts_exhausted", "cancelled", "failed"
        &["outcome"],
    )
    .unwrap()
});

/// Result polls issued by the search orchestrator.
pub static SEARCH_POLLS: Lazy<IntCounter> = Lazy::new(|| {
    IntCounter::new(
        "qbitdash_search_polls_total",
        "Total search result polls",
    )
    .unwrap()
});

// =============================================================================
// qBittorrent API Metrics
// =============================================================================

/// qBittorrent API requests by endpoint and result.
pub static QBIT_REQUESTS: Lazy<IntCounterVec> = Lazy::new(|| {
    IntCounterVec::new(
        Opts::new(
            "qbitdash_qbit_requests_total",
            "Total qBittorrent WebUI API requests",
        ),
        &["endpoint", "result"], // result: "ok" or the error kind
    )
    .unwrap()
});

/// qBittorrent API request duration.
pub static QBIT_REQUEST_DURATION: Lazy<HistogramVec> = Lazy::new(|| {
    HistogramVec::new(
        HistogramOpts::new(
            "qbitdash_qbit_request_duration_seconds",
            "Duration of qBittorrent WebUI API requests",
        )
        .buckets(vec![0.005, 0.01, 0.025, 0.05, 0.1, 0.25, 0.5, 1.0, 2.5, 5.0, 10.0, 30.0]),
        &["endpoint"],
    )
    .unwrap()
});

// =============================================================================
// Helper functions
// =============================================================================

/// Get all core metrics for registration in a registry.
pub fn all_metrics() -> Vec<Box<dyn prometheus::core::Collector>> {
    vec![
        // Search
        Box::new(SEARCH_JOBS.clone()),
        Box::new(SEARCH_POLLS.clone()),
        // qBittorrent
        Box::new(QBIT_REQUESTS.clone()),
        Box::new(QBIT_REQUEST_DURATION.clone()),
    ]
}
