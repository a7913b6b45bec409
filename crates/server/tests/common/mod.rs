//! Common test utilities for E2E testing with mocks.
//!
//! This module provides a test fixture that creates an in-process server
//! backed by an in-memory qBittorrent, so the whole API can be exercised
//! without a running daemon.

use std::sync::Arc;

use axum::body::Body;
use axum::http::{Request, StatusCode};
use axum::Router;
use http_body_util::BodyExt;
use serde_json::Value;
use tower::ServiceExt;

use qbitdash_core::testing::MockQbit;
use qbitdash_core::{Config, QBittorrentConfig, QbitApi, SearchConfig, ServerConfig};
use qbitdash_server::state::AppState;

/// Re-export fixtures for test convenience
#[allow(unused_imports)]
pub use qbitdash_core::testing::fixtures;

/// Test fixture for E2E testing with a mock daemon.
///
/// # Example
///
/// ```rust,ignore
/// #[tokio::test]
/// async fn test_list_torrents() {
///     let fixture = TestFixture::new().await;
///     fixture.qbit.add_mock_torrent(fixtures::torrent("abc", "Ubuntu")).await;
///
///     let response = fixture.get("/api/v1/torrents").await;
///     assert_eq!(response.status, 200);
/// }
/// ```
#[allow(dead_code)]
pub struct TestFixture {
    /// The Axum router for testing
    pub router: Router,
    /// Mock daemon - seed torrents, feeds and script search answers
    pub qbit: MockQbit,
    /// Shared state, for waiting on background searches
    pub state: Arc<AppState>,
}

/// Response from a test request
#[derive(Debug)]
pub struct TestResponse {
    pub status: StatusCode,
    pub body: Value,
}

#[allow(dead_code)]
impl TestFixture {
    /// Create a new test fixture with default mocks.
    pub async fn new() -> Self {
        Self::with_config(TestConfig::default()).await
    }

    /// Create a test fixture with custom configuration.
    pub async fn with_config(test_config: TestConfig) -> Self {
        let qbit = MockQbit::new();

        let config = Config {
            server: ServerConfig {
                host: std::net::IpAddr::V4(std::net::Ipv4Addr::LOCALHOST),
                port: 0, // Not used for in-process testing
            },
            qbittorrent: QBittorrentConfig {
                url: "http://qbittorrent.test:8080".to_string(),
                username: "admin".to_string(),
                password: "adminadmin".to_string(),
                timeout_secs: 5,
            },
            search: SearchConfig {
                poll_interval_ms: test_config.poll_interval_ms,
                max_attempts: test_config.max_attempts,
                page_size: test_config.page_size,
            },
        };

        let api: Arc<dyn QbitApi> = Arc::new(qbit.clone());
        let state = Arc::new(AppState::new(config, api));
        let router = qbitdash_server::api::create_router(Arc::clone(&state));

        Self {
            router,
            qbit,
            state,
        }
    }

    /// Wait until the background search loop has exited.
    pub async fn wait_for_search(&self) {
        self.state.search().wait().await;
    }

    /// Send a GET request to the test server.
    pub async fn get(&self, path: &str) -> TestResponse {
        self.request("GET", path, None).await
    }

    /// Send a POST request with JSON body.
    pub async fn post(&self, path: &str, body: Value) -> TestResponse {
        self.request("POST", path, Some(body)).await
    }

    /// Send a DELETE request.
    pub async fn delete(&self, path: &str) -> TestResponse {
        self.request("DELETE", path, None).await
    }

    /// Send a POST request with raw string body (for testing malformed JSON).
    pub async fn post_raw(&self, path: &str, body: &str) -> TestResponse {
        self.request_raw("POST", path, body, "application/json").await
    }

    /// Send a POST request with custom content type (multipart uploads).
    pub async fn post_with_content_type(
        &self,
        path: &str,
        body: &str,
        content_type: &str,
    ) -> TestResponse {
        self.request_raw("POST", path, body, content_type).await
    }

    /// Send a request with raw string body and custom content type.
    async fn request_raw(
        &self,
        method: &str,
        path: &str,
        body: &str,
        content_type: &str,
    ) -> TestResponse {
        let request = Request::builder()
            .method(method)
            .uri(path)
            .header("Content-Type", content_type)
            .body(Body::from(body.to_string()))
            .unwrap();

        self.send(request).await
    }

    /// Send a request to the test server.
    async fn request(&self, method: &str, path: &str, body: Option<Value>) -> TestResponse {
        let mut request_builder = Request::builder().method(method).uri(path);

        let body = if let Some(json_body) = body {
            request_builder = request_builder.header("Content-Type", "application/json");
            Body::from(serde_json::to_vec(&json_body).unwrap())
        } else {
            Body::empty()
        };

        let request = request_builder.body(body).unwrap();
        self.send(request).await
    }

    async fn send(&self, request: Request<Body>) -> TestResponse {
        let response = self
            .router
            .clone()
            .oneshot(request)
            .await
            .expect("Failed to send request");

        let status = response.status();
        let body_bytes = response
            .into_body()
            .collect()
            .await
            .expect("Failed to collect body")
            .to_bytes();

        let body: Value = if body_bytes.is_empty() {
            Value::Null
        } else {
            serde_json::from_slice(&body_bytes)
                .unwrap_or_else(|_| Value::String(String::from_utf8_lossy(&body_bytes).into()))
        };

        TestResponse { status, body }
    }
}

/// Configuration for test fixture.
#[derive(Debug, Clone)]
pub struct TestConfig {
    pub poll_interval_ms: u64,
    pub max_attempts: u32,
    pub page_size: usize,
}

impl Default for TestConfig {
    /// Fast polling so search tests finish in milliseconds.
    fn default() -> Self {
        Self {
            poll_interval_ms: 5,
            max_attempts: 60,
            page_size: 20,
        }
    }
}

/// Helper to assert a response has expected status.
#[macro_export]
macro_rules! assert_status {
    ($response:expr, $status:expr) => {
        assert_eq!(
            $response.status, $status,
            "Expected status {:?}, got {:?}. Body: {}",
            $status,
            $response.status,
            serde_json::to_string_pretty(&$response.body).unwrap_or_default()
        );
    };
}
