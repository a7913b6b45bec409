//! Search job orchestration.

mod config;
mod orchestrator;
mod types;

pub use config::SearchConfig;
pub use orchestrator::SearchOrchestrator;
pub use types::{
    SearchError, SearchJob, SearchJobId, SearchResult, SearchResultsResponse, SearchStatus,
    StopReason,
};
