use std::sync::Arc;

use qbitdash_core::{Config, QbitApi, ResultTable, SanitizedConfig, SearchOrchestrator};
use tokio::sync::Mutex;

/// Shared application state
pub struct AppState {
    config: Config,
    qbit: Arc<dyn QbitApi>,
    search: SearchOrchestrator,
    /// Sort and page of the search result table; one table per dashboard.
    results: Mutex<ResultTable>,
}

impl AppState {
    pub fn new(config: Config, qbit: Arc<dyn QbitApi>) -> Self {
        let search = SearchOrchestrator::new(Arc::clone(&qbit), config.search.clone());
        let results = Mutex::new(ResultTable::new(config.search.page_size));
        Self {
            config,
            qbit,
            search,
            results,
        }
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    pub fn sanitized_config(&self) -> SanitizedConfig {
        SanitizedConfig::from(&self.config)
    }

    pub fn qbit(&self) -> &dyn QbitApi {
        self.qbit.as_ref()
    }

    pub fn search(&self) -> &SearchOrchestrator {
        &self.search
    }

    pub fn results(&self) -> &Mutex<ResultTable> {
        &self.results
    }
}
