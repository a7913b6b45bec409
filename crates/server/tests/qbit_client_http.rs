//! HTTP-level tests of the qBittorrent client against a fake WebUI daemon
//! served by axum on an ephemeral port.

use std::collections::HashMap;
use std::sync::Arc;
use std::time::Duration;

use axum::{
    extract::{Form, Query},
    http::{header, HeaderMap, StatusCode},
    response::{Html, IntoResponse, Response},
    routing::{get, post},
    Json, Router,
};
use serde_json::json;
use tokio::io::{AsyncReadExt, AsyncWriteExt};
use tokio::time::timeout;

use qbitdash_core::{
    QBittorrentConfig, QbitApi, QbitClient, QbitError, SearchConfig, SearchOrchestrator,
    SearchStatus, StopReason,
};

const SID: &str = "fake-session-1";
const PASSWORD: &str = "adminadmin";

fn authorized(headers: &HeaderMap) -> bool {
    headers
        .get(header::COOKIE)
        .and_then(|v| v.to_str().ok())
        .map(|c| c.contains(&format!("SID={}", SID)))
        .unwrap_or(false)
}

async fn login(Form(form): Form<HashMap<String, String>>) -> Response {
    if form.get("password").map(String::as_str) == Some(PASSWORD) {
        (
            [(header::SET_COOKIE, format!("SID={}; HttpOnly; path=/", SID))],
            "Ok.",
        )
            .into_response()
    } else {
        "Fails.".into_response()
    }
}

async fn version(headers: HeaderMap) -> Response {
    if !authorized(&headers) {
        return StatusCode::FORBIDDEN.into_response();
    }
    "v4.6.2".into_response()
}

async fn webapi_version(headers: HeaderMap) -> Response {
    if !authorized(&headers) {
        return StatusCode::FORBIDDEN.into_response();
    }
    "2.9.3".into_response()
}

async fn search_start(headers: HeaderMap, Form(form): Form<HashMap<String, String>>) -> Response {
    if !authorized(&headers) {
        return StatusCode::FORBIDDEN.into_response();
    }
    // No plugins installed for anything but "ubuntu"
    match form.get("pattern").map(String::as_str) {
        Some("ubuntu") => Json(json!({ "id": 12345 })).into_response(),
        Some("slow ubuntu") => {
            tokio::time::sleep(Duration::from_secs(1)).await;
            Json(json!({ "id": 12345 })).into_response()
        }
        _ => Json(json!({})).into_response(),
    }
}

async fn search_results(
    headers: HeaderMap,
    Query(query): Query<HashMap<String, String>>,
) -> Response {
    if !authorized(&headers) {
        return StatusCode::FORBIDDEN.into_response();
    }
    if query.get("id").map(String::as_str) != Some("12345") {
        return StatusCode::NOT_FOUND.into_response();
    }
    Json(json!({
        "results": [{
            "fileName": "ubuntu-24.04-desktop-amd64.iso",
            "fileSize": 6_114_656_256_i64,
            "fileUrl": "magnet:?xt=urn:btih:ubuntu",
            "nbSeeders": 1500,
            "nbLeechers": 40,
            "siteUrl": "https://linuxtracker.example",
            "descrLink": "https://linuxtracker.example/ubuntu"
        }],
        "status": "Stopped",
        "total": 1
    }))
    .into_response()
}

async fn search_stop(headers: HeaderMap) -> StatusCode {
    if !authorized(&headers) {
        return StatusCode::FORBIDDEN;
    }
    StatusCode::OK
}

/// Answers with an HTML page where JSON is expected.
async fn torrents_info() -> Html<&'static str> {
    Html("<html><body>Maintenance</body></html>")
}

async fn not_found() -> StatusCode {
    StatusCode::NOT_FOUND
}

async fn always_forbidden() -> StatusCode {
    StatusCode::FORBIDDEN
}

async fn server_error() -> (StatusCode, &'static str) {
    (StatusCode::INTERNAL_SERVER_ERROR, "database is locked")
}

async fn logout() -> StatusCode {
    StatusCode::OK
}

fn fake_daemon() -> Router {
    Router::new()
        .route("/api/v2/auth/login", post(login))
        .route("/api/v2/auth/logout", post(logout))
        .route("/api/v2/app/version", get(version))
        .route("/api/v2/app/webapiVersion", get(webapi_version))
        .route("/api/v2/app/preferences", get(server_error))
        .route("/api/v2/transfer/info", get(always_forbidden))
        .route("/api/v2/torrents/info", get(torrents_info))
        .route("/api/v2/torrents/properties", get(not_found))
        .route("/api/v2/search/start", post(search_start))
        .route("/api/v2/search/results", get(search_results))
        .route("/api/v2/search/stop", post(search_stop))
}

async fn spawn_daemon() -> String {
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, fake_daemon()).await.unwrap();
    });
    format!("http://{}", addr)
}

fn client(url: &str, password: &str) -> QbitClient {
    QbitClient::new(&QBittorrentConfig {
        url: url.to_string(),
        username: "admin".to_string(),
        password: password.to_string(),
        timeout_secs: 5,
    })
    .unwrap()
}

async fn logged_in_client() -> QbitClient {
    let url = spawn_daemon().await;
    let client = client(&url, PASSWORD);
    client.authenticate().await.unwrap();
    client
}

#[tokio::test]
async fn test_login_stores_session_cookie() {
    let client = logged_in_client().await;
    assert!(client.session().await.authenticated);

    let version = client.app_version().await.unwrap();
    assert_eq!(version.version, "v4.6.2");
    assert_eq!(version.api_version, "2.9.3");
}

#[tokio::test]
async fn test_rejected_login() {
    let url = spawn_daemon().await;
    let client = client(&url, "wrong");

    let err = client.authenticate().await.unwrap_err();
    assert_eq!(err, QbitError::AuthenticationRequired);
    assert!(!client.session().await.authenticated);
}

#[tokio::test]
async fn test_request_without_session_is_auth_error() {
    let url = spawn_daemon().await;
    let client = client(&url, PASSWORD);

    let err = client.app_version().await.unwrap_err();
    assert!(err.is_auth());
}

#[tokio::test]
async fn test_forbidden_clears_session() {
    let client = logged_in_client().await;

    let err = client.transfer_info().await.unwrap_err();
    assert_eq!(err, QbitError::AuthenticationRequired);
    assert!(!client.session().await.authenticated);
}

#[tokio::test]
async fn test_new_credentials_drop_session() {
    let client = logged_in_client().await;
    client.set_credentials("admin", "other").await;
    assert!(!client.session().await.authenticated);
}

#[tokio::test]
async fn test_start_search_and_fetch_results() {
    let client = logged_in_client().await;

    let id = client.start_search("ubuntu").await.unwrap();
    assert_eq!(id, 12345);

    let response = client.search_results(id).await.unwrap();
    assert_eq!(response.status, SearchStatus::Stopped);
    assert_eq!(response.total, 1);
    assert_eq!(response.results[0].nb_seeders, 1500);
    assert_eq!(response.results[0].file_size, 6_114_656_256);

    client.stop_search(id).await.unwrap();
}

#[tokio::test]
async fn test_start_search_without_plugins() {
    let client = logged_in_client().await;
    let err = client.start_search("anything else").await.unwrap_err();
    assert_eq!(err, QbitError::SearchUnavailable);
}

#[tokio::test]
async fn test_orchestrated_search_against_daemon() {
    let client = Arc::new(logged_in_client().await);
    let search = SearchOrchestrator::new(
        client,
        SearchConfig {
            poll_interval_ms: 1,
            max_attempts: 60,
            page_size: 20,
        },
    );

    search.start("ubuntu").await.unwrap();
    search.wait().await;

    let job = search.current().await.unwrap();
    assert_eq!(job.id, 12345);
    assert_eq!(job.polls, 1);
    assert_eq!(job.results.len(), 1);
    assert_eq!(
        job.stop_reason,
        Some(StopReason::Finished {
            status: SearchStatus::Stopped
        })
    );
}

#[tokio::test]
async fn test_html_where_json_expected_is_decode_error() {
    let client = logged_in_client().await;

    match client.list_torrents(&Default::default()).await {
        Err(QbitError::Decode { raw, .. }) => {
            assert!(raw.contains("Maintenance"));
        }
        other => panic!("expected decode error, got {:?}", other),
    }
}

#[tokio::test]
async fn test_not_found_names_the_torrent() {
    let client = logged_in_client().await;
    let err = client.torrent_properties("ABC").await.unwrap_err();
    assert_eq!(err, QbitError::NotFound("torrent ABC".to_string()));
}

#[tokio::test]
async fn test_server_error_is_transport_error() {
    let client = logged_in_client().await;
    match client.preferences().await {
        Err(QbitError::Transport(message)) => {
            assert!(message.contains("500"));
            assert!(message.contains("database is locked"));
        }
        other => panic!("expected transport error, got {:?}", other),
    }
}

#[tokio::test]
async fn test_unreachable_daemon_is_transport_error() {
    // Bind then drop to get a port nothing listens on
    let listener = std::net::TcpListener::bind("127.0.0.1:0").unwrap();
    let addr = listener.local_addr().unwrap();
    drop(listener);

    let client = client(&format!("http://{}", addr), PASSWORD);
    let err = client.authenticate().await.unwrap_err();
    assert!(matches!(err, QbitError::Transport(_)));
}

#[tokio::test]
async fn test_dispose_logs_out() {
    let client = logged_in_client().await;
    client.dispose().await;
    assert!(!client.session().await.authenticated);
}

#[tokio::test]
async fn test_slow_search_start_does_not_block_status_or_cancel() {
    let client = Arc::new(logged_in_client().await);
    let search = Arc::new(SearchOrchestrator::new(
        client,
        SearchConfig {
            poll_interval_ms: 1,
            max_attempts: 60,
            page_size: 20,
        },
    ));

    let starting = {
        let search = Arc::clone(&search);
        tokio::spawn(async move { search.start("slow ubuntu").await })
    };
    tokio::time::sleep(Duration::from_millis(100)).await;

    let running = timeout(Duration::from_millis(300), search.is_running())
        .await
        .expect("is_running blocked behind search/start");
    assert!(running);

    let cancelled = timeout(Duration::from_millis(300), search.cancel())
        .await
        .expect("cancel blocked behind search/start");
    assert!(cancelled);

    let job = starting.await.unwrap().unwrap();
    assert_eq!(job.id, 12345);
    search.wait().await;

    let job = search.current().await.unwrap();
    assert_eq!(job.stop_reason, Some(StopReason::Cancelled));
    assert_eq!(job.polls, 0);
    assert!(!search.is_running().await);
}

#[tokio::test]
async fn test_truncated_login_body_is_transport_error() {
    // Promises 64 bytes of body, sends two, then hangs up
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        let (mut socket, _) = listener.accept().await.unwrap();
        let mut buf = [0u8; 4096];
        let _ = socket.read(&mut buf).await;
        let _ = socket
            .write_all(b"HTTP/1.1 200 OK\r\nContent-Length: 64\r\n\r\nOk")
            .await;
        let _ = socket.shutdown().await;
    });

    let client = client(&format!("http://{}", addr), PASSWORD);
    match client.authenticate().await {
        Err(QbitError::Transport(_)) => {}
        other => panic!("expected transport error, got {:?}", other),
    }
    assert!(!client.session().await.authenticated);
}
