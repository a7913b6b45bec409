//! Types mirroring the qBittorrent WebUI API payloads.

use chrono::{DateTime, TimeZone, Utc};
use serde::{Deserialize, Deserializer, Serialize};

/// Raw torrent state as reported by qBittorrent.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum TorrentState {
    #[serde(rename = "error")]
    Error,
    #[serde(rename = "missingFiles")]
    MissingFiles,
    #[serde(rename = "uploading")]
    Uploading,
    #[serde(rename = "pausedUP")]
    PausedUp,
    #[serde(rename = "stoppedUP")]
    StoppedUp,
    #[serde(rename = "queuedUP")]
    QueuedUp,
    #[serde(rename = "stalledUP")]
    StalledUp,
    #[serde(rename = "checkingUP")]
    CheckingUp,
    #[serde(rename = "forcedUP")]
    ForcedUp,
    #[serde(rename = "downloading")]
    Downloading,
    #[serde(rename = "pausedDL")]
    PausedDl,
    #[serde(rename = "stoppedDL")]
    StoppedDl,
    #[serde(rename = "queuedDL")]
    QueuedDl,
    #[serde(rename = "stalledDL")]
    StalledDl,
    #[serde(rename = "checkingDL")]
    CheckingDl,
    #[serde(rename = "forcedDL")]
    ForcedDl,
    #[serde(rename = "metaDL")]
    MetaDl,
    #[serde(rename = "forcedMetaDL")]
    ForcedMetaDl,
    #[serde(rename = "allocating")]
    Allocating,
    #[serde(rename = "checkingResumeData")]
    CheckingResumeData,
    #[serde(rename = "moving")]
    Moving,
    #[default]
    #[serde(rename = "unknown", other)]
    Unknown,
}

/// Coarse grouping of [`TorrentState`] values.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TorrentActivity {
    Downloading,
    Seeding,
    Paused,
    Checking,
    Queued,
    Stalled,
    Error,
    Unknown,
}

impl TorrentState {
    /// The wire name used by qBittorrent.
    pub fn as_str(&self) -> &'static str {
        match self {
            TorrentState::Error => "error",
            TorrentState::MissingFiles => "missingFiles",
            TorrentState::Uploading => "uploading",
            TorrentState::PausedUp => "pausedUP",
            TorrentState::StoppedUp => "stoppedUP",
            TorrentState::QueuedUp => "queuedUP",
            TorrentState::StalledUp => "stalledUP",
            TorrentState::CheckingUp => "checkingUP",
            TorrentState::ForcedUp => "forcedUP",
            TorrentState::Downloading => "downloading",
            TorrentState::PausedDl => "pausedDL",
            TorrentState::StoppedDl => "stoppedDL",
            TorrentState::QueuedDl => "queuedDL",
            TorrentState::StalledDl => "stalledDL",
            TorrentState::CheckingDl => "checkingDL",
            TorrentState::ForcedDl => "forcedDL",
            TorrentState::MetaDl => "metaDL",
            TorrentState::ForcedMetaDl => "forcedMetaDL",
            TorrentState::Allocating => "allocating",
            TorrentState::CheckingResumeData => "checkingResumeData",
            TorrentState::Moving => "moving",
            TorrentState::Unknown => "unknown",
        }
    }

    pub fn is_paused(&self) -> bool {
        matches!(
            self,
            TorrentState::PausedUp
                | TorrentState::PausedDl
                | TorrentState::StoppedUp
                | TorrentState::StoppedDl
        )
    }

    pub fn activity(&self) -> TorrentActivity {
        match self {
            TorrentState::Downloading
            | TorrentState::ForcedDl
            | TorrentState::MetaDl
            | TorrentState::ForcedMetaDl
            | TorrentState::Allocating => TorrentActivity::Downloading,
            TorrentState::Uploading | TorrentState::ForcedUp => TorrentActivity::Seeding,
            TorrentState::PausedDl
            | TorrentState::PausedUp
            | TorrentState::StoppedDl
            | TorrentState::StoppedUp => TorrentActivity::Paused,
            TorrentState::CheckingDl
            | TorrentState::CheckingUp
            | TorrentState::CheckingResumeData
            | TorrentState::Moving => TorrentActivity::Checking,
            TorrentState::QueuedDl | TorrentState::QueuedUp => TorrentActivity::Queued,
            TorrentState::StalledDl | TorrentState::StalledUp => TorrentActivity::Stalled,
            TorrentState::Error | TorrentState::MissingFiles => TorrentActivity::Error,
            TorrentState::Unknown => TorrentActivity::Unknown,
        }
    }

    /// Human readable label. A paused torrent that already finished reads "Completed".
    pub fn label(&self, completed: bool) -> &'static str {
        if self.is_paused() && completed {
            return "Completed";
        }
        match self {
            TorrentState::Downloading => "Downloading",
            TorrentState::PausedDl
            | TorrentState::PausedUp
            | TorrentState::StoppedDl
            | TorrentState::StoppedUp => "Paused",
            TorrentState::Uploading => "Seeding",
            TorrentState::StalledDl | TorrentState::StalledUp => "Stalled",
            TorrentState::CheckingDl
            | TorrentState::CheckingUp
            | TorrentState::CheckingResumeData => "Checking",
            TorrentState::Error => "Error",
            TorrentState::ForcedDl => "Forced DL",
            TorrentState::ForcedUp => "Forced UP",
            TorrentState::MetaDl | TorrentState::ForcedMetaDl => "Meta DL",
            TorrentState::Allocating => "Allocating",
            TorrentState::Moving => "Moving",
            TorrentState::MissingFiles => "Missing Files",
            TorrentState::QueuedDl | TorrentState::QueuedUp => "Queued",
            TorrentState::Unknown => "Unknown",
        }
    }
}

/// Torrent snapshot from `torrents/info`.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Torrent {
    pub hash: String,
    pub name: String,
    pub state: TorrentState,
    /// Progress fraction (0.0 - 1.0).
    pub progress: f64,
    /// Selected size in bytes.
    pub size: i64,
    pub total_size: i64,
    pub downloaded: i64,
    pub uploaded: i64,
    pub amount_left: i64,
    /// Download speed in bytes/second.
    pub dlspeed: i64,
    /// Upload speed in bytes/second.
    pub upspeed: i64,
    pub dl_limit: i64,
    pub up_limit: i64,
    pub num_seeds: i64,
    pub num_leechs: i64,
    pub num_complete: i64,
    pub num_incomplete: i64,
    pub ratio: f64,
    /// ETA in seconds; 8640000 means infinity.
    pub eta: i64,
    pub added_on: i64,
    pub completion_on: i64,
    pub last_activity: i64,
    pub seeding_time: i64,
    pub time_active: i64,
    pub category: String,
    pub tags: String,
    pub save_path: String,
    pub content_path: String,
    pub magnet_uri: String,
    pub tracker: String,
    pub priority: i64,
    pub force_start: bool,
    pub auto_tmm: bool,
}

/// qBittorrent reports this ETA when it cannot compute one.
pub const ETA_INFINITY: i64 = 8_640_000;

impl Torrent {
    pub fn is_complete(&self) -> bool {
        self.completion_on > 0
    }

    pub fn state_label(&self) -> &'static str {
        self.state.label(self.is_complete())
    }

    /// ETA in seconds (None if unknown or complete).
    pub fn eta_secs(&self) -> Option<u64> {
        if self.eta > 0 && self.eta < ETA_INFINITY {
            Some(self.eta as u64)
        } else {
            None
        }
    }

    pub fn added_at(&self) -> Option<DateTime<Utc>> {
        timestamp_to_datetime(self.added_on)
    }

    pub fn completed_at(&self) -> Option<DateTime<Utc>> {
        timestamp_to_datetime(self.completion_on)
    }
}

/// Detail view from `torrents/properties`.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct TorrentProperties {
    pub save_path: String,
    pub creation_date: i64,
    pub piece_size: i64,
    pub comment: String,
    pub total_wasted: i64,
    pub total_uploaded: i64,
    pub total_downloaded: i64,
    pub up_limit: i64,
    pub dl_limit: i64,
    pub time_elapsed: i64,
    pub seeding_time: i64,
    pub nb_connections: i64,
    pub share_ratio: f64,
    pub addition_date: i64,
    pub completion_date: i64,
    pub created_by: String,
    pub dl_speed: i64,
    pub dl_speed_avg: i64,
    pub up_speed: i64,
    pub up_speed_avg: i64,
    pub eta: i64,
    pub last_seen: i64,
    pub peers: i64,
    pub peers_total: i64,
    pub seeds: i64,
    pub seeds_total: i64,
    pub pieces_have: i64,
    pub pieces_num: i64,
    pub total_size: i64,
}

/// Download priority of a file inside a torrent.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "u8", into = "u8")]
pub enum FilePriority {
    Skip,
    Normal,
    High,
    Maximum,
}

impl TryFrom<u8> for FilePriority {
    type Error = String;

    fn try_from(value: u8) -> Result<Self, Self::Error> {
        match value {
            0 => Ok(FilePriority::Skip),
            1 => Ok(FilePriority::Normal),
            // Older WebUI versions report 2 for "high".
            2..=6 => Ok(FilePriority::High),
            7 => Ok(FilePriority::Maximum),
            other => Err(format!("invalid file priority: {}", other)),
        }
    }
}

impl From<FilePriority> for u8 {
    fn from(priority: FilePriority) -> Self {
        match priority {
            FilePriority::Skip => 0,
            FilePriority::Normal => 1,
            FilePriority::High => 6,
            FilePriority::Maximum => 7,
        }
    }
}

/// A file entry from `torrents/files`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TorrentFile {
    pub index: u32,
    /// Slash separated path inside the torrent.
    pub name: String,
    pub size: i64,
    pub progress: f64,
    pub priority: FilePriority,
    #[serde(default)]
    pub is_seed: bool,
    #[serde(default)]
    pub piece_range: Vec<i64>,
    #[serde(default)]
    pub availability: f64,
}

/// Tracker status codes from `torrents/trackers`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "u8", rename_all = "snake_case")]
pub enum TrackerStatus {
    Disabled,
    NotContacted,
    Working,
    Updating,
    NotWorking,
}

impl From<u8> for TrackerStatus {
    fn from(value: u8) -> Self {
        match value {
            0 => TrackerStatus::Disabled,
            1 => TrackerStatus::NotContacted,
            2 => TrackerStatus::Working,
            3 => TrackerStatus::Updating,
            _ => TrackerStatus::NotWorking,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TorrentTracker {
    pub url: String,
    pub status: TrackerStatus,
    /// -1 for the DHT/PeX/LSD pseudo trackers.
    #[serde(deserialize_with = "lenient_i64", default = "minus_one")]
    pub tier: i64,
    #[serde(deserialize_with = "lenient_i64", default)]
    pub num_peers: i64,
    #[serde(deserialize_with = "lenient_i64", default)]
    pub num_seeds: i64,
    #[serde(deserialize_with = "lenient_i64", default)]
    pub num_leeches: i64,
    #[serde(deserialize_with = "lenient_i64", default)]
    pub num_downloaded: i64,
    #[serde(default)]
    pub msg: String,
}

fn minus_one() -> i64 {
    -1
}

/// Older WebUI versions send `""` instead of a number for pseudo trackers.
fn lenient_i64<'de, D>(deserializer: D) -> Result<i64, D::Error>
where
    D: Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum NumOrString {
        Num(i64),
        Str(String),
    }

    Ok(match NumOrString::deserialize(deserializer)? {
        NumOrString::Num(n) => n,
        NumOrString::Str(s) => s.trim().parse().unwrap_or(-1),
    })
}

/// Global transfer statistics from `transfer/info`.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct TransferInfo {
    pub connection_status: String,
    pub dht_nodes: i64,
    pub dl_info_data: i64,
    pub dl_info_speed: i64,
    pub dl_rate_limit: i64,
    pub up_info_data: i64,
    pub up_info_speed: i64,
    pub up_rate_limit: i64,
}

/// Daemon and WebUI API versions.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AppVersion {
    pub version: String,
    pub api_version: String,
}

/// Server-side filter for `torrents/info`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum StateFilter {
    All,
    Downloading,
    Seeding,
    Completed,
    Paused,
    Active,
    Inactive,
    Resumed,
    Stalled,
    StalledUploading,
    StalledDownloading,
    Errored,
}

impl StateFilter {
    pub fn as_str(&self) -> &'static str {
        match self {
            StateFilter::All => "all",
            StateFilter::Downloading => "downloading",
            StateFilter::Seeding => "seeding",
            StateFilter::Completed => "completed",
            StateFilter::Paused => "paused",
            StateFilter::Active => "active",
            StateFilter::Inactive => "inactive",
            StateFilter::Resumed => "resumed",
            StateFilter::Stalled => "stalled",
            StateFilter::StalledUploading => "stalled_uploading",
            StateFilter::StalledDownloading => "stalled_downloading",
            StateFilter::Errored => "errored",
        }
    }
}

/// Filters for listing torrents.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct TorrentFilter {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub state: Option<StateFilter>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub category: Option<String>,
}

impl TorrentFilter {
    pub fn is_empty(&self) -> bool {
        self.state.is_none() && self.category.is_none()
    }
}

/// Options shared by both ways of adding a torrent.
#[derive(Debug, Clone, Default)]
pub struct AddTorrentOptions {
    pub save_path: Option<String>,
    pub category: Option<String>,
    pub paused: bool,
}

/// Request to add a new torrent.
#[derive(Debug, Clone)]
pub enum AddTorrentRequest {
    /// Magnet links or http(s) URLs to .torrent files.
    Urls {
        urls: Vec<String>,
        options: AddTorrentOptions,
    },
    /// Raw .torrent file contents.
    File {
        data: Vec<u8>,
        filename: Option<String>,
        options: AddTorrentOptions,
    },
}

impl AddTorrentRequest {
    pub fn url(url: impl Into<String>) -> Self {
        AddTorrentRequest::Urls {
            urls: vec![url.into()],
            options: AddTorrentOptions::default(),
        }
    }

    pub fn torrent_file(data: Vec<u8>, filename: Option<String>) -> Self {
        AddTorrentRequest::File {
            data,
            filename,
            options: AddTorrentOptions::default(),
        }
    }

    fn options_mut(&mut self) -> &mut AddTorrentOptions {
        match self {
            AddTorrentRequest::Urls { options, .. } => options,
            AddTorrentRequest::File { options, .. } => options,
        }
    }

    pub fn options(&self) -> &AddTorrentOptions {
        match self {
            AddTorrentRequest::Urls { options, .. } => options,
            AddTorrentRequest::File { options, .. } => options,
        }
    }

    pub fn with_save_path(mut self, path: impl Into<String>) -> Self {
        self.options_mut().save_path = Some(path.into());
        self
    }

    pub fn with_category(mut self, category: impl Into<String>) -> Self {
        self.options_mut().category = Some(category.into());
        self
    }

    pub fn with_paused(mut self, paused: bool) -> Self {
        self.options_mut().paused = paused;
        self
    }
}

/// Severity of a log line; qBittorrent encodes it as a bit flag.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "u8", rename_all = "UPPERCASE")]
pub enum LogType {
    Normal,
    Info,
    Warning,
    Critical,
}

impl From<u8> for LogType {
    fn from(value: u8) -> Self {
        match value {
            2 => LogType::Info,
            4 => LogType::Warning,
            8 => LogType::Critical,
            _ => LogType::Normal,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LogEntry {
    pub id: i64,
    pub message: String,
    /// Unix seconds.
    pub timestamp: i64,
    #[serde(rename = "type")]
    pub kind: LogType,
}

/// Query for `log/main`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LogQuery {
    pub normal: bool,
    pub info: bool,
    pub warning: bool,
    pub critical: bool,
    /// Only entries with a greater id are returned; -1 for everything.
    pub last_known_id: i64,
}

impl Default for LogQuery {
    fn default() -> Self {
        Self {
            normal: true,
            info: true,
            warning: true,
            critical: true,
            last_known_id: -1,
        }
    }
}

/// Installed search plugin from `search/plugins`.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct SearchPlugin {
    pub name: String,
    pub full_name: String,
    pub version: String,
    pub enabled: bool,
    pub url: String,
}

/// State of the API session as seen by the dashboard.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SessionInfo {
    pub username: String,
    pub authenticated: bool,
}

/// Convert Unix timestamp to DateTime<Utc>.
pub(crate) fn timestamp_to_datetime(ts: i64) -> Option<DateTime<Utc>> {
    if ts > 0 {
        Utc.timestamp_opt(ts, 0).single()
    } else {
        None
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Datelike;

    #[test]
    fn test_torrent_state_wire_names() {
        let state: TorrentState = serde_json::from_str("\"pausedUP\"").unwrap();
        assert_eq!(state, TorrentState::PausedUp);
        let state: TorrentState = serde_json::from_str("\"forcedMetaDL\"").unwrap();
        assert_eq!(state, TorrentState::ForcedMetaDl);
        assert_eq!(
            serde_json::to_string(&TorrentState::CheckingResumeData).unwrap(),
            "\"checkingResumeData\""
        );
    }

    #[test]
    fn test_torrent_state_unknown_falls_back() {
        let state: TorrentState = serde_json::from_str("\"somethingNew\"").unwrap();
        assert_eq!(state, TorrentState::Unknown);
    }

    #[test]
    fn test_as_str_matches_serde() {
        for state in [
            TorrentState::Error,
            TorrentState::StalledUp,
            TorrentState::MetaDl,
            TorrentState::StoppedDl,
            TorrentState::Moving,
        ] {
            let json = serde_json::to_string(&state).unwrap();
            assert_eq!(json, format!("\"{}\"", state.as_str()));
        }
    }

    #[test]
    fn test_activity_grouping() {
        assert_eq!(TorrentState::MetaDl.activity(), TorrentActivity::Downloading);
        assert_eq!(TorrentState::ForcedUp.activity(), TorrentActivity::Seeding);
        assert_eq!(TorrentState::StoppedUp.activity(), TorrentActivity::Paused);
        assert_eq!(TorrentState::Moving.activity(), TorrentActivity::Checking);
        assert_eq!(TorrentState::QueuedDl.activity(), TorrentActivity::Queued);
        assert_eq!(TorrentState::StalledUp.activity(), TorrentActivity::Stalled);
        assert_eq!(TorrentState::MissingFiles.activity(), TorrentActivity::Error);
    }

    #[test]
    fn test_label_completed_when_paused_after_finish() {
        assert_eq!(TorrentState::PausedDl.label(true), "Completed");
        assert_eq!(TorrentState::PausedUp.label(true), "Completed");
        assert_eq!(TorrentState::PausedDl.label(false), "Paused");
        assert_eq!(TorrentState::Uploading.label(true), "Seeding");
        assert_eq!(TorrentState::StalledDl.label(false), "Stalled");
        assert_eq!(TorrentState::MissingFiles.label(false), "Missing Files");
    }

    #[test]
    fn test_torrent_deserialize_partial() {
        let json = r#"{
            "hash": "abc123",
            "name": "ubuntu-24.04.iso",
            "state": "downloading",
            "progress": 0.5,
            "size": 1000,
            "eta": 3600,
            "added_on": 1703980800,
            "completion_on": 0,
            "some_future_field": 1
        }"#;
        let torrent: Torrent = serde_json::from_str(json).unwrap();
        assert_eq!(torrent.hash, "abc123");
        assert_eq!(torrent.state, TorrentState::Downloading);
        assert_eq!(torrent.eta_secs(), Some(3600));
        assert!(!torrent.is_complete());
        assert_eq!(torrent.added_at().unwrap().year(), 2023);
        assert!(torrent.completed_at().is_none());
        assert_eq!(torrent.state_label(), "Downloading");
    }

    #[test]
    fn test_eta_infinity_is_none() {
        let torrent = Torrent {
            eta: ETA_INFINITY,
            ..Default::default()
        };
        assert_eq!(torrent.eta_secs(), None);
    }

    #[test]
    fn test_timestamp_to_datetime() {
        assert_eq!(timestamp_to_datetime(1703980800).unwrap().year(), 2023);
        assert!(timestamp_to_datetime(-1).is_none());
        assert!(timestamp_to_datetime(0).is_none());
    }

    #[test]
    fn test_file_priority_codes() {
        let file: TorrentFile = serde_json::from_str(
            r#"{"index": 0, "name": "dir/a.mkv", "size": 10, "progress": 1.0, "priority": 7}"#,
        )
        .unwrap();
        assert_eq!(file.priority, FilePriority::Maximum);

        assert_eq!(FilePriority::try_from(2).unwrap(), FilePriority::High);
        assert!(FilePriority::try_from(9).is_err());
        assert_eq!(serde_json::to_string(&FilePriority::High).unwrap(), "6");
        assert_eq!(serde_json::to_string(&FilePriority::Skip).unwrap(), "0");
    }

    #[test]
    fn test_tracker_lenient_numbers() {
        let json = r#"[
            {"url": "** [DHT] **", "status": 2, "tier": "", "num_peers": 5,
             "num_seeds": "", "num_leeches": 1, "num_downloaded": 0, "msg": ""},
            {"url": "udp://tracker.example:1337", "status": 4, "tier": 0,
             "num_peers": 0, "num_seeds": 0, "num_leeches": 0, "num_downloaded": 3,
             "msg": "timed out"}
        ]"#;
        let trackers: Vec<TorrentTracker> = serde_json::from_str(json).unwrap();
        assert_eq!(trackers[0].tier, -1);
        assert_eq!(trackers[0].num_seeds, -1);
        assert_eq!(trackers[0].status, TrackerStatus::Working);
        assert_eq!(trackers[1].status, TrackerStatus::NotWorking);
        assert_eq!(trackers[1].tier, 0);
    }

    #[test]
    fn test_log_type_from_flags() {
        let entries: Vec<LogEntry> = serde_json::from_str(
            r#"[
                {"id": 0, "message": "started", "timestamp": 1700000000, "type": 1},
                {"id": 1, "message": "port", "timestamp": 1700000001, "type": 2},
                {"id": 2, "message": "disk", "timestamp": 1700000002, "type": 4},
                {"id": 3, "message": "boom", "timestamp": 1700000003, "type": 8}
            ]"#,
        )
        .unwrap();
        let kinds: Vec<LogType> = entries.iter().map(|e| e.kind).collect();
        assert_eq!(
            kinds,
            vec![LogType::Normal, LogType::Info, LogType::Warning, LogType::Critical]
        );
        let json = serde_json::to_value(&entries[2]).unwrap();
        assert_eq!(json["type"], "WARNING");
    }

    #[test]
    fn test_add_torrent_request_builder() {
        let req = AddTorrentRequest::url("magnet:?xt=urn:btih:abc123")
            .with_save_path("/downloads")
            .with_category("linux")
            .with_paused(true);

        match &req {
            AddTorrentRequest::Urls { urls, options } => {
                assert_eq!(urls, &vec!["magnet:?xt=urn:btih:abc123".to_string()]);
                assert_eq!(options.save_path.as_deref(), Some("/downloads"));
                assert_eq!(options.category.as_deref(), Some("linux"));
                assert!(options.paused);
            }
            _ => panic!("Expected Urls variant"),
        }
    }

    #[test]
    fn test_torrent_filter_is_empty() {
        assert!(TorrentFilter::default().is_empty());
        let filter = TorrentFilter {
            state: Some(StateFilter::Downloading),
            ..Default::default()
        };
        assert!(!filter.is_empty());
        assert_eq!(StateFilter::StalledUploading.as_str(), "stalled_uploading");
    }

    #[test]
    fn test_search_plugin_camel_case() {
        let plugin: SearchPlugin = serde_json::from_str(
            r#"{"name": "piratebay", "fullName": "The Pirate Bay", "version": "3.3",
                "enabled": true, "url": "https://thepiratebay.org",
                "supportedCategories": []}"#,
        )
        .unwrap();
        assert_eq!(plugin.full_name, "The Pirate Bay");
        assert!(plugin.enabled);
    }
}
