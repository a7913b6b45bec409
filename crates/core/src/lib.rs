pub mod config;
pub mod metrics;
pub mod present;
pub mod qbit;
pub mod search;
pub mod testing;

pub use config::{
    load_config, load_config_from_str, validate_config, Config, ConfigError, QBittorrentConfig,
    SanitizedConfig, ServerConfig,
};
pub use present::{
    paginate, sort_results, sort_torrents, Page, ResultSortField, ResultTable, ResultView,
    SortDirection, SortState, TorrentSortField,
};
pub use qbit::{QbitApi, QbitClient, QbitError};
pub use search::{
    SearchConfig, SearchError, SearchJob, SearchJobId, SearchOrchestrator, SearchResult,
    SearchResultsResponse, SearchStatus, StopReason,
};
