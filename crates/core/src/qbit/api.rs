//! The facade the dashboard uses to drive qBittorrent.

use async_trait::async_trait;
use serde_json::{Map, Value};

use crate::search::{SearchJobId, SearchResultsResponse};

use super::rss::{RssFeed, RssRule};
use super::{
    AddTorrentRequest, AppVersion, FilePriority, LogEntry, LogQuery, QbitError, SearchPlugin,
    SessionInfo, Torrent, TorrentFile, TorrentFilter, TorrentProperties, TorrentTracker,
    TransferInfo,
};

/// Remote control operations against a qBittorrent daemon.
///
/// One implementation talks HTTP to the WebUI API; the testing module
/// provides an in-memory one. Every operation is independent: there is no
/// automatic retry and an expired session surfaces as
/// [`QbitError::AuthenticationRequired`].
#[async_trait]
pub trait QbitApi: Send + Sync {
    // ---- session ----

    /// Current session state.
    async fn session(&self) -> SessionInfo;

    /// Replace the stored credentials and drop the session. Does not log in.
    async fn set_credentials(&self, username: &str, password: &str);

    /// Log in with the stored credentials.
    async fn authenticate(&self) -> Result<(), QbitError>;

    /// End the session. The local session is forgotten even if the call fails.
    async fn logout(&self) -> Result<(), QbitError>;

    // ---- application ----

    async fn app_version(&self) -> Result<AppVersion, QbitError>;

    async fn transfer_info(&self) -> Result<TransferInfo, QbitError>;

    async fn preferences(&self) -> Result<Map<String, Value>, QbitError>;

    /// Apply a partial preference update; only the given keys change.
    async fn set_preferences(&self, changes: &Map<String, Value>) -> Result<(), QbitError>;

    async fn logs(&self, query: &LogQuery) -> Result<Vec<LogEntry>, QbitError>;

    // ---- torrents ----

    async fn list_torrents(&self, filter: &TorrentFilter) -> Result<Vec<Torrent>, QbitError>;

    async fn torrent_properties(&self, hash: &str) -> Result<TorrentProperties, QbitError>;

    async fn torrent_files(&self, hash: &str) -> Result<Vec<TorrentFile>, QbitError>;

    async fn set_file_priority(
        &self,
        hash: &str,
        file_ids: &[u32],
        priority: FilePriority,
    ) -> Result<(), QbitError>;

    async fn torrent_trackers(&self, hash: &str) -> Result<Vec<TorrentTracker>, QbitError>;

    async fn add_torrent(&self, request: AddTorrentRequest) -> Result<(), QbitError>;

    async fn pause_torrents(&self, hashes: &[String]) -> Result<(), QbitError>;

    async fn resume_torrents(&self, hashes: &[String]) -> Result<(), QbitError>;

    async fn delete_torrents(&self, hashes: &[String], delete_files: bool)
        -> Result<(), QbitError>;

    // ---- rss ----

    async fn rss_feeds(&self) -> Result<Vec<RssFeed>, QbitError>;

    /// Subscribe to a feed. `path` is the item path; None uses the URL.
    async fn add_rss_feed(&self, url: &str, path: Option<&str>) -> Result<(), QbitError>;

    async fn remove_rss_item(&self, path: &str) -> Result<(), QbitError>;

    /// Mark a whole feed, or a single article in it, as read.
    async fn mark_rss_read(&self, path: &str, article_id: Option<&str>) -> Result<(), QbitError>;

    async fn rss_rules(&self) -> Result<Vec<RssRule>, QbitError>;

    // ---- search ----

    async fn search_plugins(&self) -> Result<Vec<SearchPlugin>, QbitError>;

    /// Start a search over all enabled plugins.
    ///
    /// Returns [`QbitError::SearchUnavailable`] when the daemon hands back no
    /// usable job id, which is what happens with no plugins installed.
    async fn start_search(&self, pattern: &str) -> Result<SearchJobId, QbitError>;

    async fn search_results(&self, id: SearchJobId) -> Result<SearchResultsResponse, QbitError>;

    async fn stop_search(&self, id: SearchJobId) -> Result<(), QbitError>;
}
