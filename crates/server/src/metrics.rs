//! Prometheus metrics for the dashboard server.
//!
//! HTTP request metrics live here; search and qBittorrent API metrics come
//! from the core crate and are registered into the same registry.

use once_cell::sync::Lazy;
use prometheus::{
    self, Encoder, HistogramOpts, HistogramVec, IntCounterVec, IntGauge, Opts, Registry,
    TextEncoder,
};
use regex_lite::Regex;

/// Global metrics registry.
pub static REGISTRY: Lazy<Registry> = Lazy::new(|| {
    let registry = Registry::new();
    register_metrics(&registry);
    registry
});

/// HTTP request duration in seconds.
pub static HTTP_REQUEST_DURATION: Lazy<HistogramVec> = Lazy::new(|| {
    HistogramVec::new(
        HistogramOpts::new(
            "qbitdash_http_request_duration_seconds",
            "HTTP request duration in seconds",
        )
        .buckets(vec![
            0.001, 0.005, 0.01, 0.025, 0.05, 0.1, 0.25, 0.5, 1.0, 2.5, 5.0, 10.0,
        ]),
        &["method", "path", "status"],
    )
    .unwrap()
});

/// HTTP requests total count.
pub static HTTP_REQUESTS_TOTAL: Lazy<IntCounterVec> = Lazy::new(|| {
    IntCounterVec::new(
        Opts::new("qbitdash_http_requests_total", "Total HTTP requests"),
        &["method", "path", "status"],
    )
    .unwrap()
});

/// HTTP requests currently in flight.
pub static HTTP_REQUESTS_IN_FLIGHT: Lazy<IntGauge> = Lazy::new(|| {
    IntGauge::new(
        "qbitdash_http_requests_in_flight",
        "Number of HTTP requests currently being processed",
    )
    .unwrap()
});

static UUID_SEGMENT: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"[0-9a-fA-F]{8}-[0-9a-fA-F]{4}-[0-9a-fA-F]{4}-[0-9a-fA-F]{4}-[0-9a-fA-F]{12}")
        .unwrap()
});
static HASH_SEGMENT: Lazy<Regex> = Lazy::new(|| Regex::new(r"[0-9a-fA-F]{40}").unwrap());
static NUMERIC_SEGMENT: Lazy<Regex> = Lazy::new(|| Regex::new(r"/\d+(/|$)").unwrap());
/// Anything after `/rss/feeds/` up to a known sub-resource is a feed path.
static RSS_FEED_SEGMENT: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"/rss/feeds/[^/]+(/articles|/read)?$").unwrap());

fn register_metrics(registry: &Registry) {
    registry
        .register(Box::new(HTTP_REQUEST_DURATION.clone()))
        .unwrap();
    registry
        .register(Box::new(HTTP_REQUESTS_TOTAL.clone()))
        .unwrap();
    registry
        .register(Box::new(HTTP_REQUESTS_IN_FLIGHT.clone()))
        .unwrap();

    // Core metrics (search jobs, qBittorrent API calls)
    for metric in qbitdash_core::metrics::all_metrics() {
        registry.register(metric).unwrap();
    }
}

/// Encode all metrics as Prometheus text format.
pub fn encode_metrics() -> String {
    let encoder = TextEncoder::new();
    let metric_families = REGISTRY.gather();
    let mut buffer = Vec::new();
    if let Err(e) = encoder.encode(&metric_families, &mut buffer) {
        tracing::error!(error = %e, "Failed to encode metrics");
    }
    String::from_utf8_lossy(&buffer).into_owned()
}

/// Normalize a path for metric labels (replace ids, hashes and feed paths
/// with placeholders so label cardinality stays bounded).
pub fn normalize_path(path: &str) -> String {
    let result = UUID_SEGMENT.replace_all(path, "{id}");
    let result = HASH_SEGMENT.replace_all(&result, "{hash}");
    let result = NUMERIC_SEGMENT.replace_all(&result, "/{id}$1");
    let result = RSS_FEED_SEGMENT.replace_all(&result, "/rss/feeds/{path}$1");
    result.to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_normalize_path_hash() {
        let path = "/api/v1/torrents/a94a8fe5ccb19ba61c4c0873d391e987982fbbd3";
        assert_eq!(normalize_path(path), "/api/v1/torrents/{hash}");
    }

    #[test]
    fn test_normalize_path_hash_with_suffix() {
        let path = "/api/v1/torrents/a94a8fe5ccb19ba61c4c0873d391e987982fbbd3/files/priority";
        assert_eq!(normalize_path(path), "/api/v1/torrents/{hash}/files/priority");
    }

    #[test]
    fn test_normalize_path_numeric() {
        assert_eq!(normalize_path("/api/v1/items/12345"), "/api/v1/items/{id}");
        assert_eq!(
            normalize_path("/api/v1/items/12345/sub/2"),
            "/api/v1/items/{id}/sub/{id}"
        );
    }

    #[test]
    fn test_normalize_path_rss_feed() {
        assert_eq!(
            normalize_path("/api/v1/rss/feeds/Linux%5CDistros"),
            "/api/v1/rss/feeds/{path}"
        );
        assert_eq!(
            normalize_path("/api/v1/rss/feeds/Linux%5CDistros/articles"),
            "/api/v1/rss/feeds/{path}/articles"
        );
        assert_eq!(normalize_path("/api/v1/rss/feeds"), "/api/v1/rss/feeds");
    }

    #[test]
    fn test_normalize_path_no_ids() {
        assert_eq!(normalize_path("/api/v1/health"), "/api/v1/health");
        assert_eq!(normalize_path("/api/v1/search/sort"), "/api/v1/search/sort");
    }

    #[test]
    fn test_encode_metrics_returns_prometheus_format() {
        HTTP_REQUESTS_TOTAL
            .with_label_values(&["GET", "/test", "200"])
            .inc();
        HTTP_REQUEST_DURATION
            .with_label_values(&["GET", "/test", "200"])
            .observe(0.1);
        HTTP_REQUESTS_IN_FLIGHT.set(0);

        let output = encode_metrics();
        assert!(output.contains("qbitdash_http_requests_total"));
        assert!(output.contains("qbitdash_http_request_duration_seconds"));
        assert!(output.contains("qbitdash_http_requests_in_flight"));
        assert!(output.contains("# HELP"));
        assert!(output.contains("# TYPE"));
    }

    #[test]
    fn test_registry_includes_core_metrics() {
        qbitdash_core::metrics::SEARCH_POLLS.inc();
        let output = encode_metrics();
        assert!(output.contains("qbitdash_search_polls_total"));
    }
}
