//! In-memory qBittorrent for testing.

use std::collections::{HashMap, VecDeque};
use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use chrono::Utc;
use serde_json::{Map, Value};
use tokio::sync::RwLock;

use crate::qbit::{
    AddTorrentRequest, AppVersion, FilePriority, LogEntry, LogQuery, LogType, QbitApi, QbitError,
    RssFeed, RssRule, SearchPlugin, SessionInfo, StateFilter, Torrent, TorrentActivity, TorrentFile,
    TorrentFilter, TorrentProperties, TorrentState, TorrentTracker, TransferInfo,
};
use crate::search::{SearchJobId, SearchResultsResponse, SearchStatus};

/// A recorded torrent addition for test assertions.
#[derive(Debug, Clone)]
pub struct RecordedAddTorrent {
    pub request: AddTorrentRequest,
    pub timestamp: chrono::DateTime<Utc>,
}

#[derive(Debug)]
struct MockState {
    /// Credentials the daemon accepts; None accepts anything.
    accepted: Option<(String, String)>,
    username: String,
    password: String,
    authenticated: bool,
    require_auth: bool,

    torrents: Vec<Torrent>,
    files: HashMap<String, Vec<TorrentFile>>,
    trackers: HashMap<String, Vec<TorrentTracker>>,
    added: Vec<RecordedAddTorrent>,
    transfer: TransferInfo,
    preferences: Map<String, Value>,
    logs: Vec<LogEntry>,
    feeds: Vec<RssFeed>,
    rules: Vec<RssRule>,
    plugins: Vec<SearchPlugin>,

    search_id: Option<SearchJobId>,
    search_starts: Vec<String>,
    search_responses: VecDeque<Result<SearchResultsResponse, QbitError>>,
    default_search_response: SearchResultsResponse,
    search_polls: u32,
    stop_calls: Vec<SearchJobId>,
    fail_stop: bool,
    /// Latency of `search/start` and `search/results`.
    start_delay: Duration,
    poll_delay: Duration,

    next_error: Option<QbitError>,
}

impl Default for MockState {
    fn default() -> Self {
        Self {
            accepted: None,
            username: "admin".to_string(),
            password: String::new(),
            authenticated: false,
            require_auth: false,
            torrents: Vec::new(),
            files: HashMap::new(),
            trackers: HashMap::new(),
            added: Vec::new(),
            transfer: TransferInfo {
                connection_status: "connected".to_string(),
                ..TransferInfo::default()
            },
            preferences: Map::new(),
            logs: Vec::new(),
            feeds: Vec::new(),
            rules: Vec::new(),
            plugins: Vec::new(),
            search_id: Some(1),
            search_starts: Vec::new(),
            search_responses: VecDeque::new(),
            default_search_response: SearchResultsResponse {
                results: Vec::new(),
                status: SearchStatus::Running,
                total: 0,
            },
            search_polls: 0,
            stop_calls: Vec::new(),
            fail_stop: false,
            start_delay: Duration::ZERO,
            poll_delay: Duration::ZERO,
            next_error: None,
        }
    }
}

/// Mock implementation of [`QbitApi`].
///
/// Keeps torrents, feeds, preferences and logs in memory and scripts the
/// search endpoints:
///
/// ```rust,ignore
/// let qbit = MockQbit::new();
/// qbit.set_search_id(Some(12345)).await;
/// qbit.push_search_response(Ok(response)).await;
///
/// // After the run
/// assert_eq!(qbit.search_polls().await, 1);
/// ```
#[derive(Debug, Clone, Default)]
pub struct MockQbit {
    state: Arc<RwLock<MockState>>,
}

impl MockQbit {
    pub fn new() -> Self {
        Self::default()
    }

    /// Only accept this username/password pair on login.
    pub async fn set_accepted_credentials(&self, username: &str, password: &str) {
        self.state.write().await.accepted = Some((username.to_string(), password.to_string()));
    }

    /// Reject every operation with `AuthenticationRequired` until logged in.
    pub async fn set_require_auth(&self, require: bool) {
        self.state.write().await.require_auth = require;
    }

    /// Configure the next operation to fail with the given error.
    pub async fn set_next_error(&self, error: QbitError) {
        self.state.write().await.next_error = Some(error);
    }

    pub async fn add_mock_torrent(&self, torrent: Torrent) {
        self.state.write().await.torrents.push(torrent);
    }

    pub async fn set_files(&self, hash: &str, files: Vec<TorrentFile>) {
        self.state.write().await.files.insert(hash.to_string(), files);
    }

    pub async fn set_trackers(&self, hash: &str, trackers: Vec<TorrentTracker>) {
        self.state
            .write()
            .await
            .trackers
            .insert(hash.to_string(), trackers);
    }

    pub async fn set_transfer_info(&self, info: TransferInfo) {
        self.state.write().await.transfer = info;
    }

    pub async fn set_mock_preferences(&self, preferences: Map<String, Value>) {
        self.state.write().await.preferences = preferences;
    }

    pub async fn push_log(&self, kind: LogType, message: &str) {
        let mut state = self.state.write().await;
        let id = state.logs.len() as i64;
        state.logs.push(LogEntry {
            id,
            message: message.to_string(),
            timestamp: Utc::now().timestamp(),
            kind,
        });
    }

    pub async fn add_mock_feed(&self, feed: RssFeed) {
        self.state.write().await.feeds.push(feed);
    }

    pub async fn set_rules(&self, rules: Vec<RssRule>) {
        self.state.write().await.rules = rules;
    }

    pub async fn set_plugins(&self, plugins: Vec<SearchPlugin>) {
        self.state.write().await.plugins = plugins;
    }

    /// Id handed out by `start_search`; None or 0 means no plugins.
    pub async fn set_search_id(&self, id: Option<SearchJobId>) {
        self.state.write().await.search_id = id;
    }

    /// Queue one answer for `search_results`.
    pub async fn push_search_response(&self, response: Result<SearchResultsResponse, QbitError>) {
        self.state.write().await.search_responses.push_back(response);
    }

    /// Answer used once the queue is drained.
    pub async fn set_default_search_response(&self, response: SearchResultsResponse) {
        self.state.write().await.default_search_response = response;
    }

    /// Make `stop_search` fail (the call is still recorded).
    pub async fn set_fail_stop(&self, fail: bool) {
        self.state.write().await.fail_stop = fail;
    }

    /// Make `start_search` take this long to answer.
    pub async fn set_start_delay(&self, delay: Duration) {
        self.state.write().await.start_delay = delay;
    }

    /// Make every `search_results` call take this long to answer.
    pub async fn set_poll_delay(&self, delay: Duration) {
        self.state.write().await.poll_delay = delay;
    }

    pub async fn search_starts(&self) -> Vec<String> {
        self.state.read().await.search_starts.clone()
    }

    pub async fn search_polls(&self) -> u32 {
        self.state.read().await.search_polls
    }

    pub async fn stop_calls(&self) -> Vec<SearchJobId> {
        self.state.read().await.stop_calls.clone()
    }

    pub async fn added_torrents(&self) -> Vec<RecordedAddTorrent> {
        self.state.read().await.added.clone()
    }

    pub async fn torrent(&self, hash: &str) -> Option<Torrent> {
        self.state
            .read()
            .await
            .torrents
            .iter()
            .find(|t| t.hash == hash)
            .cloned()
    }

    pub async fn feed_paths(&self) -> Vec<String> {
        self.state
            .read()
            .await
            .feeds
            .iter()
            .map(|f| f.path.clone())
            .collect()
    }

    /// Fail with the injected error, or with an auth error when required.
    async fn check(&self) -> Result<(), QbitError> {
        let mut state = self.state.write().await;
        if let Some(err) = state.next_error.take() {
            return Err(err);
        }
        if state.require_auth && !state.authenticated {
            return Err(QbitError::AuthenticationRequired);
        }
        Ok(())
    }
}

fn matches_filter(torrent: &Torrent, filter: &TorrentFilter) -> bool {
    if let Some(category) = &filter.category {
        if &torrent.category != category {
            return false;
        }
    }
    let activity = torrent.state.activity();
    match filter.state {
        None | Some(StateFilter::All) => true,
        Some(StateFilter::Downloading) => activity == TorrentActivity::Downloading,
        Some(StateFilter::Seeding) => activity == TorrentActivity::Seeding,
        Some(StateFilter::Completed) => torrent.is_complete(),
        Some(StateFilter::Paused) => torrent.state.is_paused(),
        Some(StateFilter::Resumed) => !torrent.state.is_paused(),
        Some(StateFilter::Active) => torrent.dlspeed > 0 || torrent.upspeed > 0,
        Some(StateFilter::Inactive) => torrent.dlspeed == 0 && torrent.upspeed == 0,
        Some(StateFilter::Stalled) => activity == TorrentActivity::Stalled,
        Some(StateFilter::StalledUploading) => torrent.state == TorrentState::StalledUp,
        Some(StateFilter::StalledDownloading) => torrent.state == TorrentState::StalledDl,
        Some(StateFilter::Errored) => activity == TorrentActivity::Error,
    }
}

#[async_trait]
impl QbitApi for MockQbit {
    async fn session(&self) -> SessionInfo {
        let state = self.state.read().await;
        SessionInfo {
            username: state.username.clone(),
            authenticated: state.authenticated,
        }
    }

    async fn set_credentials(&self, username: &str, password: &str) {
        let mut state = self.state.write().await;
        state.username = username.to_string();
        state.password = password.to_string();
        state.authenticated = false;
    }

    async fn authenticate(&self) -> Result<(), QbitError> {
        let mut state = self.state.write().await;
        if let Some(err) = state.next_error.take() {
            return Err(err);
        }
        let ok = match &state.accepted {
            Some((user, pass)) => *user == state.username && *pass == state.password,
            None => true,
        };
        state.authenticated = ok;
        if ok {
            Ok(())
        } else {
            Err(QbitError::AuthenticationRequired)
        }
    }

    async fn logout(&self) -> Result<(), QbitError> {
        let mut state = self.state.write().await;
        state.authenticated = false;
        match state.next_error.take() {
            Some(err) => Err(err),
            None => Ok(()),
        }
    }

    async fn app_version(&self) -> Result<AppVersion, QbitError> {
        self.check().await?;
        Ok(AppVersion {
            version: "v4.6.2".to_string(),
            api_version: "2.9.3".to_string(),
        })
    }

    async fn transfer_info(&self) -> Result<TransferInfo, QbitError> {
        self.check().await?;
        Ok(self.state.read().await.transfer.clone())
    }

    async fn preferences(&self) -> Result<Map<String, Value>, QbitError> {
        self.check().await?;
        Ok(self.state.read().await.preferences.clone())
    }

    async fn set_preferences(&self, changes: &Map<String, Value>) -> Result<(), QbitError> {
        self.check().await?;
        let mut state = self.state.write().await;
        for (key, value) in changes {
            state.preferences.insert(key.clone(), value.clone());
        }
        Ok(())
    }

    async fn logs(&self, query: &LogQuery) -> Result<Vec<LogEntry>, QbitError> {
        self.check().await?;
        Ok(self
            .state
            .read()
            .await
            .logs
            .iter()
            .filter(|e| e.id > query.last_known_id)
            .filter(|e| match e.kind {
                LogType::Normal => query.normal,
                LogType::Info => query.info,
                LogType::Warning => query.warning,
                LogType::Critical => query.critical,
            })
            .cloned()
            .collect())
    }

    async fn list_torrents(&self, filter: &TorrentFilter) -> Result<Vec<Torrent>, QbitError> {
        self.check().await?;
        Ok(self
            .state
            .read()
            .await
            .torrents
            .iter()
            .filter(|t| matches_filter(t, filter))
            .cloned()
            .collect())
    }

    async fn torrent_properties(&self, hash: &str) -> Result<TorrentProperties, QbitError> {
        self.check().await?;
        let torrent = self
            .torrent(hash)
            .await
            .ok_or_else(|| QbitError::NotFound(format!("torrent {}", hash)))?;
        Ok(TorrentProperties {
            save_path: torrent.save_path,
            total_size: torrent.total_size,
            total_downloaded: torrent.downloaded,
            total_uploaded: torrent.uploaded,
            share_ratio: torrent.ratio,
            addition_date: torrent.added_on,
            completion_date: if torrent.completion_on > 0 {
                torrent.completion_on
            } else {
                -1
            },
            dl_speed: torrent.dlspeed,
            up_speed: torrent.upspeed,
            eta: torrent.eta,
            seeds: torrent.num_seeds,
            peers: torrent.num_leechs,
            ..TorrentProperties::default()
        })
    }

    async fn torrent_files(&self, hash: &str) -> Result<Vec<TorrentFile>, QbitError> {
        self.check().await?;
        let state = self.state.read().await;
        if !state.torrents.iter().any(|t| t.hash == hash) {
            return Err(QbitError::NotFound(format!("torrent {}", hash)));
        }
        Ok(state.files.get(hash).cloned().unwrap_or_default())
    }

    async fn set_file_priority(
        &self,
        hash: &str,
        file_ids: &[u32],
        priority: FilePriority,
    ) -> Result<(), QbitError> {
        self.check().await?;
        if file_ids.is_empty() {
            return Err(QbitError::InvalidRequest("no file ids given".to_string()));
        }
        let mut state = self.state.write().await;
        let files = state
            .files
            .get_mut(hash)
            .ok_or_else(|| QbitError::NotFound(format!("torrent {}", hash)))?;
        for file in files.iter_mut().filter(|f| file_ids.contains(&f.index)) {
            file.priority = priority;
        }
        Ok(())
    }

    async fn torrent_trackers(&self, hash: &str) -> Result<Vec<TorrentTracker>, QbitError> {
        self.check().await?;
        let state = self.state.read().await;
        if !state.torrents.iter().any(|t| t.hash == hash) {
            return Err(QbitError::NotFound(format!("torrent {}", hash)));
        }
        Ok(state.trackers.get(hash).cloned().unwrap_or_default())
    }

    async fn add_torrent(&self, request: AddTorrentRequest) -> Result<(), QbitError> {
        self.check().await?;
        match &request {
            AddTorrentRequest::Urls { urls, .. } if urls.iter().all(|u| u.trim().is_empty()) => {
                return Err(QbitError::InvalidRequest("no URLs given".to_string()));
            }
            AddTorrentRequest::File { data, .. } if data.is_empty() => {
                return Err(QbitError::InvalidRequest("empty torrent file".to_string()));
            }
            _ => {}
        }
        self.state.write().await.added.push(RecordedAddTorrent {
            request,
            timestamp: Utc::now(),
        });
        Ok(())
    }

    async fn pause_torrents(&self, hashes: &[String]) -> Result<(), QbitError> {
        self.check().await?;
        let mut state = self.state.write().await;
        for torrent in state.torrents.iter_mut().filter(|t| hashes.contains(&t.hash)) {
            torrent.state = if torrent.is_complete() {
                TorrentState::PausedUp
            } else {
                TorrentState::PausedDl
            };
            torrent.dlspeed = 0;
            torrent.upspeed = 0;
        }
        Ok(())
    }

    async fn resume_torrents(&self, hashes: &[String]) -> Result<(), QbitError> {
        self.check().await?;
        let mut state = self.state.write().await;
        for torrent in state.torrents.iter_mut().filter(|t| hashes.contains(&t.hash)) {
            torrent.state = if torrent.is_complete() {
                TorrentState::Uploading
            } else {
                TorrentState::Downloading
            };
        }
        Ok(())
    }

    async fn delete_torrents(
        &self,
        hashes: &[String],
        _delete_files: bool,
    ) -> Result<(), QbitError> {
        self.check().await?;
        self.state
            .write()
            .await
            .torrents
            .retain(|t| !hashes.contains(&t.hash));
        Ok(())
    }

    async fn rss_feeds(&self) -> Result<Vec<RssFeed>, QbitError> {
        self.check().await?;
        Ok(self.state.read().await.feeds.clone())
    }

    async fn add_rss_feed(&self, url: &str, path: Option<&str>) -> Result<(), QbitError> {
        self.check().await?;
        let mut state = self.state.write().await;
        let path = path.filter(|p| !p.is_empty()).unwrap_or(url).to_string();
        if state.feeds.iter().any(|f| f.path == path) {
            return Err(QbitError::Transport(
                "HTTP 409 Conflict: feed already exists".to_string(),
            ));
        }
        let uid = format!("{{mock-{}}}", state.feeds.len() + 1);
        state.feeds.push(RssFeed {
            title: path.clone(),
            path,
            uid,
            url: url.to_string(),
            ..RssFeed::default()
        });
        Ok(())
    }

    async fn remove_rss_item(&self, path: &str) -> Result<(), QbitError> {
        self.check().await?;
        let mut state = self.state.write().await;
        let before = state.feeds.len();
        state.feeds.retain(|f| f.path != path);
        if state.feeds.len() == before {
            return Err(QbitError::NotFound(format!("rss item {}", path)));
        }
        Ok(())
    }

    async fn mark_rss_read(&self, path: &str, article_id: Option<&str>) -> Result<(), QbitError> {
        self.check().await?;
        let mut state = self.state.write().await;
        let feed = state
            .feeds
            .iter_mut()
            .find(|f| f.path == path)
            .ok_or_else(|| QbitError::NotFound(format!("rss item {}", path)))?;
        for article in feed
            .articles
            .iter_mut()
            .filter(|a| article_id.map_or(true, |id| a.id == id))
        {
            article.is_read = true;
        }
        feed.unread_count = feed.articles.iter().filter(|a| !a.is_read).count();
        Ok(())
    }

    async fn rss_rules(&self) -> Result<Vec<RssRule>, QbitError> {
        self.check().await?;
        Ok(self.state.read().await.rules.clone())
    }

    async fn search_plugins(&self) -> Result<Vec<SearchPlugin>, QbitError> {
        self.check().await?;
        Ok(self.state.read().await.plugins.clone())
    }

    async fn start_search(&self, pattern: &str) -> Result<SearchJobId, QbitError> {
        self.check().await?;
        let delay = self.state.read().await.start_delay;
        tokio::time::sleep(delay).await;
        let mut state = self.state.write().await;
        state.search_starts.push(pattern.to_string());
        match state.search_id {
            Some(id) if id > 0 => Ok(id),
            _ => Err(QbitError::SearchUnavailable),
        }
    }

    async fn search_results(&self, _id: SearchJobId) -> Result<SearchResultsResponse, QbitError> {
        self.check().await?;
        let delay = self.state.read().await.poll_delay;
        tokio::time::sleep(delay).await;
        let mut state = self.state.write().await;
        state.search_polls += 1;
        match state.search_responses.pop_front() {
            Some(response) => response,
            None => Ok(state.default_search_response.clone()),
        }
    }

    async fn stop_search(&self, id: SearchJobId) -> Result<(), QbitError> {
        let mut state = self.state.write().await;
        state.stop_calls.push(id);
        if state.fail_stop {
            Err(QbitError::Transport("stop failed".to_string()))
        } else {
            Ok(())
        }
    }
}
