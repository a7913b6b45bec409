//! Search polling configuration.

use std::time::Duration;

use serde::{Deserialize, Serialize};

/// Configuration for the search orchestrator and result table.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SearchConfig {
    /// Delay between two result polls (milliseconds).
    #[serde(default = "default_poll_interval")]
    pub poll_interval_ms: u64,

    /// Upper bound on polls per search job.
    /// Together with the interval this is the only automatic timeout.
    #[serde(default = "default_max_attempts")]
    pub max_attempts: u32,

    /// Rows per page in the result table.
    #[serde(default = "default_page_size")]
    pub page_size: usize,
}

fn default_poll_interval() -> u64 {
    1000 // 1 second
}

fn default_max_attempts() -> u32 {
    60
}

fn default_page_size() -> usize {
    20
}

impl SearchConfig {
    pub fn poll_interval(&self) -> Duration {
        Duration::from_millis(self.poll_interval_ms)
    }
}

impl Default for SearchConfig {
    fn default() -> Self {
        Self {
            poll_interval_ms: default_poll_interval(),
            max_attempts: default_max_attempts(),
            page_size: default_page_size(),
        }
    }
}
