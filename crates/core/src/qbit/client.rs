//! HTTP implementation of [`QbitApi`] against the qBittorrent WebUI API v2.

use std::sync::Arc;
use std::time::{Duration, Instant};

use async_trait::async_trait;
use futures::future;
use once_cell::sync::Lazy;
use regex_lite::Regex;
use reqwest::header::{COOKIE, REFERER, SET_COOKIE};
use reqwest::{multipart, Client, RequestBuilder, StatusCode};
use serde::de::DeserializeOwned;
use serde::Deserialize;
use serde_json::{Map, Value};
use tokio::sync::RwLock;
use tracing::{debug, warn};

use crate::config::QBittorrentConfig;
use crate::metrics;
use crate::search::{SearchJobId, SearchResultsResponse};

use super::rss::{flatten_feeds, rules_from_map, RssFeed, RssRule};
use super::{
    AddTorrentRequest, AppVersion, FilePriority, LogEntry, LogQuery, QbitApi, QbitError,
    SearchPlugin, SessionInfo, Torrent, TorrentFile, TorrentFilter, TorrentProperties,
    TorrentTracker, TransferInfo,
};

static SID_COOKIE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"SID=([^;]+)").expect("valid SID regex"));

/// Longest body excerpt kept in transport errors.
const ERROR_BODY_LIMIT: usize = 200;

/// A response body: JSON when it parses, raw text otherwise.
#[derive(Debug, Clone, PartialEq)]
enum Body {
    Json(Value),
    Text(String),
}

impl Body {
    fn parse(text: String) -> Self {
        match serde_json::from_str::<Value>(&text) {
            Ok(value) => Body::Json(value),
            Err(_) => Body::Text(text),
        }
    }

    /// The body as plain text, for endpoints that answer with a bare string.
    fn into_text(self) -> String {
        match self {
            Body::Text(text) => text.trim().to_string(),
            Body::Json(Value::String(s)) => s,
            Body::Json(value) => value.to_string(),
        }
    }

    fn decode<T: DeserializeOwned>(self) -> Result<T, QbitError> {
        match self {
            Body::Json(value) => {
                let raw = value.to_string();
                serde_json::from_value(value).map_err(|e| QbitError::Decode {
                    reason: e.to_string(),
                    raw,
                })
            }
            Body::Text(raw) => Err(QbitError::Decode {
                reason: "expected a JSON body".to_string(),
                raw,
            }),
        }
    }
}

/// Extract the session id from a `Set-Cookie` header value.
fn parse_sid(set_cookie: &str) -> Option<String> {
    SID_COOKIE
        .captures(set_cookie)
        .and_then(|c| c.get(1))
        .map(|m| m.as_str().to_string())
}

fn truncate(text: &str) -> String {
    text.chars().take(ERROR_BODY_LIMIT).collect()
}

fn join_hashes(hashes: &[String]) -> String {
    hashes
        .iter()
        .map(|h| h.to_lowercase())
        .collect::<Vec<_>>()
        .join("|")
}

/// Rewrite an endpoint-level not-found into one naming the torrent.
fn torrent_not_found(hash: &str) -> impl FnOnce(QbitError) -> QbitError + '_ {
    move |e| match e {
        QbitError::NotFound(_) => QbitError::NotFound(format!("torrent {}", hash)),
        other => other,
    }
}

#[derive(Debug, Clone)]
struct Credentials {
    username: String,
    password: String,
}

/// Logged-in session. `sid` is None when the daemon skips auth (whitelisted
/// subnet) and so never sends a cookie.
#[derive(Debug, Clone)]
struct Session {
    sid: Option<String>,
}

#[derive(Debug, Deserialize)]
struct SearchStartResponse {
    #[serde(default)]
    id: Option<i64>,
}

/// qBittorrent WebUI client.
pub struct QbitClient {
    client: Client,
    base_url: String,
    credentials: RwLock<Credentials>,
    session: Arc<RwLock<Option<Session>>>,
}

impl QbitClient {
    /// Create a new client. Does not contact the daemon.
    pub fn new(config: &QBittorrentConfig) -> Result<Self, QbitError> {
        let client = Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs as u64))
            .build()
            .map_err(|e| QbitError::Transport(format!("failed to build HTTP client: {}", e)))?;

        Ok(Self {
            client,
            base_url: config.url.trim_end_matches('/').to_string(),
            credentials: RwLock::new(Credentials {
                username: config.username.clone(),
                password: config.password.clone(),
            }),
            session: Arc::new(RwLock::new(None)),
        })
    }

    fn url(&self, endpoint: &str) -> String {
        format!("{}/api/v2/{}", self.base_url, endpoint)
    }

    /// Send a request and classify the answer. Records one metric sample per call.
    async fn send(&self, endpoint: &'static str, request: RequestBuilder) -> Result<Body, QbitError> {
        let start = Instant::now();
        let result = self.send_inner(endpoint, request).await;

        let label = match &result {
            Ok(_) => "ok",
            Err(e) => e.kind(),
        };
        metrics::QBIT_REQUESTS
            .with_label_values(&[endpoint, label])
            .inc();
        metrics::QBIT_REQUEST_DURATION
            .with_label_values(&[endpoint])
            .observe(start.elapsed().as_secs_f64());

        result
    }

    async fn send_inner(
        &self,
        endpoint: &'static str,
        request: RequestBuilder,
    ) -> Result<Body, QbitError> {
        let mut request = request.header(REFERER, &self.base_url);
        if let Some(sid) = self
            .session
            .read()
            .await
            .as_ref()
            .and_then(|s| s.sid.clone())
        {
            request = request.header(COOKIE, format!("SID={}", sid));
        }

        let response = request.send().await?;
        let status = response.status();

        if status == StatusCode::UNAUTHORIZED || status == StatusCode::FORBIDDEN {
            warn!(endpoint, status = %status, "qBittorrent rejected the session");
            *self.session.write().await = None;
            return Err(QbitError::AuthenticationRequired);
        }

        let text = response.text().await?;

        if status == StatusCode::NOT_FOUND {
            return Err(QbitError::NotFound(endpoint.to_string()));
        }
        if !status.is_success() {
            return Err(QbitError::Transport(format!(
                "HTTP {}: {}",
                status,
                truncate(&text)
            )));
        }

        Ok(Body::parse(text))
    }

    async fn get(&self, endpoint: &'static str) -> Result<Body, QbitError> {
        self.send(endpoint, self.client.get(self.url(endpoint))).await
    }

    async fn get_query(
        &self,
        endpoint: &'static str,
        query: &[(&str, String)],
    ) -> Result<Body, QbitError> {
        self.send(endpoint, self.client.get(self.url(endpoint)).query(query))
            .await
    }

    async fn post_form(
        &self,
        endpoint: &'static str,
        params: &[(&str, String)],
    ) -> Result<Body, QbitError> {
        self.send(endpoint, self.client.post(self.url(endpoint)).form(params))
            .await
    }

    async fn post_multipart(
        &self,
        endpoint: &'static str,
        form: multipart::Form,
    ) -> Result<Body, QbitError> {
        self.send(endpoint, self.client.post(self.url(endpoint)).multipart(form))
            .await
    }

    /// POST `auth/login` and classify the answer. Yields the `SID` cookie,
    /// if the daemon sent one.
    async fn login(&self, credentials: &Credentials) -> Result<Option<String>, QbitError> {
        let params = [
            ("username", credentials.username.as_str()),
            ("password", credentials.password.as_str()),
        ];
        let response = self
            .client
            .post(self.url("auth/login"))
            .header(REFERER, &self.base_url)
            .form(&params)
            .send()
            .await?;

        let status = response.status();
        let sid = response
            .headers()
            .get_all(SET_COOKIE)
            .iter()
            .filter_map(|v| v.to_str().ok())
            .find_map(parse_sid);
        let body = response.text().await?;

        if status == StatusCode::UNAUTHORIZED
            || status == StatusCode::FORBIDDEN
            || body.trim() == "Fails."
        {
            Err(QbitError::AuthenticationRequired)
        } else if !status.is_success() {
            Err(QbitError::Transport(format!(
                "HTTP {}: {}",
                status,
                truncate(&body)
            )))
        } else if sid.is_some() || body.trim() == "Ok." {
            Ok(sid)
        } else {
            Err(QbitError::Decode {
                reason: "unexpected login response".to_string(),
                raw: truncate(&body),
            })
        }
    }

    /// Forget the session after a best-effort logout.
    pub async fn dispose(&self) {
        if self.session.read().await.is_some() {
            if let Err(e) = self.logout().await {
                debug!(error = %e, "Logout during dispose failed");
            }
        }
        *self.session.write().await = None;
    }
}

#[async_trait]
impl QbitApi for QbitClient {
    async fn session(&self) -> SessionInfo {
        SessionInfo {
            username: self.credentials.read().await.username.clone(),
            authenticated: self.session.read().await.is_some(),
        }
    }

    async fn set_credentials(&self, username: &str, password: &str) {
        *self.credentials.write().await = Credentials {
            username: username.to_string(),
            password: password.to_string(),
        };
        *self.session.write().await = None;
    }

    async fn authenticate(&self) -> Result<(), QbitError> {
        let credentials = self.credentials.read().await.clone();

        let start = Instant::now();
        let result = self.login(&credentials).await;
        metrics::QBIT_REQUEST_DURATION
            .with_label_values(&["auth/login"])
            .observe(start.elapsed().as_secs_f64());

        let label = match &result {
            Ok(_) => "ok",
            Err(e) => e.kind(),
        };
        metrics::QBIT_REQUESTS
            .with_label_values(&["auth/login", label])
            .inc();

        match result {
            Ok(sid) => {
                debug!(username = %credentials.username, cookie = sid.is_some(), "qBittorrent login successful");
                *self.session.write().await = Some(Session { sid });
                Ok(())
            }
            Err(e) => {
                *self.session.write().await = None;
                Err(e)
            }
        }
    }

    async fn logout(&self) -> Result<(), QbitError> {
        let result = self.post_form("auth/logout", &[]).await;
        *self.session.write().await = None;
        result.map(|_| ())
    }

    async fn app_version(&self) -> Result<AppVersion, QbitError> {
        let (version, api_version) =
            future::try_join(self.get("app/version"), self.get("app/webapiVersion")).await?;
        Ok(AppVersion {
            version: version.into_text(),
            api_version: api_version.into_text(),
        })
    }

    async fn transfer_info(&self) -> Result<TransferInfo, QbitError> {
        self.get("transfer/info").await?.decode()
    }

    async fn preferences(&self) -> Result<Map<String, Value>, QbitError> {
        self.get("app/preferences").await?.decode()
    }

    async fn set_preferences(&self, changes: &Map<String, Value>) -> Result<(), QbitError> {
        let json = serde_json::to_string(changes)
            .map_err(|e| QbitError::InvalidRequest(e.to_string()))?;
        self.post_form("app/setPreferences", &[("json", json)])
            .await?;
        Ok(())
    }

    async fn logs(&self, query: &LogQuery) -> Result<Vec<LogEntry>, QbitError> {
        let params = [
            ("normal", query.normal.to_string()),
            ("info", query.info.to_string()),
            ("warning", query.warning.to_string()),
            ("critical", query.critical.to_string()),
            ("last_known_id", query.last_known_id.to_string()),
        ];
        self.get_query("log/main", &params).await?.decode()
    }

    async fn list_torrents(&self, filter: &TorrentFilter) -> Result<Vec<Torrent>, QbitError> {
        let mut params = Vec::new();
        if let Some(state) = filter.state {
            params.push(("filter", state.as_str().to_string()));
        }
        if let Some(category) = &filter.category {
            params.push(("category", category.clone()));
        }
        self.get_query("torrents/info", &params).await?.decode()
    }

    async fn torrent_properties(&self, hash: &str) -> Result<TorrentProperties, QbitError> {
        self.get_query("torrents/properties", &[("hash", hash.to_lowercase())])
            .await
            .map_err(torrent_not_found(hash))?
            .decode()
    }

    async fn torrent_files(&self, hash: &str) -> Result<Vec<TorrentFile>, QbitError> {
        self.get_query("torrents/files", &[("hash", hash.to_lowercase())])
            .await
            .map_err(torrent_not_found(hash))?
            .decode()
    }

    async fn set_file_priority(
        &self,
        hash: &str,
        file_ids: &[u32],
        priority: FilePriority,
    ) -> Result<(), QbitError> {
        if file_ids.is_empty() {
            return Err(QbitError::InvalidRequest("no file ids given".to_string()));
        }
        let ids = file_ids
            .iter()
            .map(u32::to_string)
            .collect::<Vec<_>>()
            .join("|");
        self.post_form(
            "torrents/filePrio",
            &[
                ("hash", hash.to_lowercase()),
                ("id", ids),
                ("priority", u8::from(priority).to_string()),
            ],
        )
        .await
        .map_err(torrent_not_found(hash))?;
        Ok(())
    }

    async fn torrent_trackers(&self, hash: &str) -> Result<Vec<TorrentTracker>, QbitError> {
        self.get_query("torrents/trackers", &[("hash", hash.to_lowercase())])
            .await
            .map_err(torrent_not_found(hash))?
            .decode()
    }

    async fn add_torrent(&self, request: AddTorrentRequest) -> Result<(), QbitError> {
        let options = request.options().clone();
        let mut form = match request {
            AddTorrentRequest::Urls { urls, .. } => {
                if urls.iter().all(|u| u.trim().is_empty()) {
                    return Err(QbitError::InvalidRequest("no URLs given".to_string()));
                }
                multipart::Form::new().text("urls", urls.join("\n"))
            }
            AddTorrentRequest::File { data, filename, .. } => {
                if data.is_empty() {
                    return Err(QbitError::InvalidRequest("empty torrent file".to_string()));
                }
                let part = multipart::Part::bytes(data)
                    .file_name(filename.unwrap_or_else(|| "upload.torrent".to_string()))
                    .mime_str("application/x-bittorrent")
                    .map_err(|e| QbitError::InvalidRequest(e.to_string()))?;
                multipart::Form::new().part("torrents", part)
            }
        };

        if let Some(path) = options.save_path {
            form = form.text("savepath", path);
        }
        if let Some(category) = options.category {
            form = form.text("category", category);
        }
        if options.paused {
            // qBittorrent 5 renamed the field; older versions ignore it.
            form = form.text("paused", "true").text("stopped", "true");
        }

        match self.post_multipart("torrents/add", form).await? {
            Body::Text(text) if text.trim() == "Fails." => Err(QbitError::InvalidRequest(
                "qBittorrent rejected the torrent".to_string(),
            )),
            _ => Ok(()),
        }
    }

    async fn pause_torrents(&self, hashes: &[String]) -> Result<(), QbitError> {
        self.post_form("torrents/pause", &[("hashes", join_hashes(hashes))])
            .await?;
        Ok(())
    }

    async fn resume_torrents(&self, hashes: &[String]) -> Result<(), QbitError> {
        self.post_form("torrents/resume", &[("hashes", join_hashes(hashes))])
            .await?;
        Ok(())
    }

    async fn delete_torrents(
        &self,
        hashes: &[String],
        delete_files: bool,
    ) -> Result<(), QbitError> {
        self.post_form(
            "torrents/delete",
            &[
                ("hashes", join_hashes(hashes)),
                ("deleteFiles", delete_files.to_string()),
            ],
        )
        .await?;
        Ok(())
    }

    async fn rss_feeds(&self) -> Result<Vec<RssFeed>, QbitError> {
        let tree: Map<String, Value> = self
            .get_query("rss/items", &[("withData", "true".to_string())])
            .await?
            .decode()?;
        Ok(flatten_feeds(&tree))
    }

    async fn add_rss_feed(&self, url: &str, path: Option<&str>) -> Result<(), QbitError> {
        let mut params = vec![("url", url.to_string())];
        if let Some(path) = path.filter(|p| !p.is_empty()) {
            params.push(("path", path.to_string()));
        }
        self.post_form("rss/addFeed", &params).await?;
        Ok(())
    }

    async fn remove_rss_item(&self, path: &str) -> Result<(), QbitError> {
        self.post_form("rss/removeItem", &[("path", path.to_string())])
            .await?;
        Ok(())
    }

    async fn mark_rss_read(&self, path: &str, article_id: Option<&str>) -> Result<(), QbitError> {
        let mut params = vec![("itemPath", path.to_string())];
        if let Some(id) = article_id {
            params.push(("articleId", id.to_string()));
        }
        self.post_form("rss/markAsRead", &params).await?;
        Ok(())
    }

    async fn rss_rules(&self) -> Result<Vec<RssRule>, QbitError> {
        let map: Map<String, Value> = self.get("rss/rules").await?.decode()?;
        Ok(rules_from_map(map))
    }

    async fn search_plugins(&self) -> Result<Vec<SearchPlugin>, QbitError> {
        self.get("search/plugins").await?.decode()
    }

    async fn start_search(&self, pattern: &str) -> Result<SearchJobId, QbitError> {
        let body = self
            .post_form(
                "search/start",
                &[
                    ("pattern", pattern.to_string()),
                    ("plugins", "all".to_string()),
                    ("category", "all".to_string()),
                ],
            )
            .await?;

        let id = match body {
            Body::Json(value) => serde_json::from_value::<SearchStartResponse>(value)
                .ok()
                .and_then(|r| r.id),
            Body::Text(_) => None,
        };

        match id {
            Some(id) if id > 0 => Ok(id),
            _ => Err(QbitError::SearchUnavailable),
        }
    }

    async fn search_results(&self, id: SearchJobId) -> Result<SearchResultsResponse, QbitError> {
        self.get_query("search/results", &[("id", id.to_string())])
            .await?
            .decode()
    }

    async fn stop_search(&self, id: SearchJobId) -> Result<(), QbitError> {
        self.post_form("search/stop", &[("id", id.to_string())])
            .await?;
        Ok(())
    }
}
