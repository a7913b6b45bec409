//! Search orchestrator: starts a remote search job and polls it to completion.
//!
//! At most one job is tracked. The poll loop runs on its own task and stops
//! when the job reaches a terminal status, the attempt ceiling is hit, a poll
//! fails, or the job is cancelled.

use std::sync::Arc;

use tokio::sync::{Mutex, RwLock};
use tokio::task::JoinHandle;
use tokio_util::sync::CancellationToken;
use tracing::{debug, error, info, warn};

use crate::metrics;
use crate::qbit::QbitApi;

use super::config::SearchConfig;
use super::types::{SearchError, SearchJob, SearchJobId, StopReason};

/// Handle on the job whose poll loop is still running.
#[derive(Debug, Clone)]
struct ActiveSearch {
    id: SearchJobId,
    cancel: CancellationToken,
}

/// Search slot. Only one job is tracked at a time.
#[derive(Debug, Clone, Default)]
enum Slot {
    #[default]
    Idle,
    /// `search/start` is in flight; no job id yet.
    Starting(CancellationToken),
    Running(ActiveSearch),
}

/// Drives a single search job against qBittorrent.
pub struct SearchOrchestrator {
    api: Arc<dyn QbitApi>,
    config: SearchConfig,
    /// Latest snapshot, kept after the loop exits.
    job: Arc<RwLock<Option<SearchJob>>>,
    /// Never held across a remote call. Reset by the poll loop on exit, or
    /// taken by `cancel`.
    slot: Arc<Mutex<Slot>>,
    task: Mutex<Option<JoinHandle<()>>>,
}

impl SearchOrchestrator {
    pub fn new(api: Arc<dyn QbitApi>, config: SearchConfig) -> Self {
        Self {
            api,
            config,
            job: Arc::new(RwLock::new(None)),
            slot: Arc::new(Mutex::new(Slot::Idle)),
            task: Mutex::new(None),
        }
    }

    pub fn config(&self) -> &SearchConfig {
        &self.config
    }

    /// Start a search and spawn its poll loop.
    ///
    /// The previous job snapshot is discarded once its loop has exited. Fails
    /// without polling if the daemon does not hand out a job id. A `cancel`
    /// issued while the start request is in flight stops the job as soon as
    /// its id is known.
    pub async fn start(&self, query: &str) -> Result<SearchJob, SearchError> {
        let query = query.trim();
        if query.is_empty() {
            return Err(SearchError::InvalidQuery(
                "query must not be blank".to_string(),
            ));
        }

        let cancel = {
            let mut slot = self.slot.lock().await;
            match &*slot {
                Slot::Idle => {}
                Slot::Starting(_) => return Err(SearchError::AlreadyRunning(None)),
                Slot::Running(current) => {
                    return Err(SearchError::AlreadyRunning(Some(current.id)))
                }
            }
            let cancel = CancellationToken::new();
            *slot = Slot::Starting(cancel.clone());
            cancel
        };

        // A cancelled loop may still be finishing its last poll.
        self.wait().await;
        *self.job.write().await = None;

        let id = match self.api.start_search(query).await {
            Ok(id) => id,
            Err(e) => {
                *self.slot.lock().await = Slot::Idle;
                metrics::SEARCH_JOBS.with_label_values(&["rejected"]).inc();
                warn!(query, error = %e, "Search could not be started");
                return Err(e.into());
            }
        };

        let job = SearchJob::new(id, query);
        *self.job.write().await = Some(job.clone());

        // Only a cancel during `Starting` can have fired the token here.
        let cancelled_early = {
            let mut slot = self.slot.lock().await;
            if cancel.is_cancelled() {
                *slot = Slot::Idle;
                true
            } else {
                *slot = Slot::Running(ActiveSearch {
                    id,
                    cancel: cancel.clone(),
                });
                false
            }
        };

        info!(id, query, "Search started");
        metrics::SEARCH_JOBS.with_label_values(&["started"]).inc();

        let handle = tokio::spawn(poll_loop(
            Arc::clone(&self.api),
            self.config.clone(),
            Arc::clone(&self.job),
            Arc::clone(&self.slot),
            id,
            cancel,
        ));
        *self.task.lock().await = Some(handle);

        if cancelled_early {
            self.stop_remote(id).await;
        }

        Ok(job)
    }

    /// Cancel the running job, if any.
    ///
    /// Also asks the daemon to stop the job; a failure there is only logged.
    /// Returns false when nothing was running or it was already cancelled.
    pub async fn cancel(&self) -> bool {
        let active = {
            let mut slot = self.slot.lock().await;
            match std::mem::take(&mut *slot) {
                Slot::Idle => return false,
                Slot::Starting(cancel) => {
                    let first = !cancel.is_cancelled();
                    cancel.cancel();
                    // `start` owns the slot until the job id is known.
                    *slot = Slot::Starting(cancel);
                    if first {
                        info!("Search cancelled before the daemon assigned an id");
                    }
                    return first;
                }
                Slot::Running(active) => active,
            }
        };

        active.cancel.cancel();
        info!(id = active.id, "Search cancelled");
        self.stop_remote(active.id).await;
        true
    }

    async fn stop_remote(&self, id: SearchJobId) {
        if let Err(e) = self.api.stop_search(id).await {
            warn!(id, error = %e, "Failed to stop remote search");
        }
    }

    /// Latest job snapshot, running or finished.
    pub async fn current(&self) -> Option<SearchJob> {
        self.job.read().await.clone()
    }

    /// True from the moment a start is accepted until its loop exits.
    pub async fn is_running(&self) -> bool {
        !matches!(*self.slot.lock().await, Slot::Idle)
    }

    /// Wait for the current poll loop to exit.
    pub async fn wait(&self) {
        let handle = self.task.lock().await.take();
        if let Some(handle) = handle {
            if let Err(e) = handle.await {
                error!(error = %e, "Search poll task failed");
            }
        }
    }

    /// Cancel any running job and wait for its loop to finish.
    pub async fn shutdown(&self) {
        self.cancel().await;
        self.wait().await;
    }
}

async fn poll_loop(
    api: Arc<dyn QbitApi>,
    config: SearchConfig,
    job: Arc<RwLock<Option<SearchJob>>>,
    slot: Arc<Mutex<Slot>>,
    id: SearchJobId,
    cancel: CancellationToken,
) {
    let mut polls: u32 = 0;

    let reason = loop {
        if cancel.is_cancelled() {
            break StopReason::Cancelled;
        }
        if polls >= config.max_attempts {
            break StopReason::AttemptsExhausted;
        }

        tokio::select! {
            _ = cancel.cancelled() => break StopReason::Cancelled,
            _ = tokio::time::sleep(config.poll_interval()) => {}
        }

        polls += 1;
        metrics::SEARCH_POLLS.inc();

        match api.search_results(id).await {
            Ok(response) => {
                let status = response.status;
                debug!(
                    id,
                    poll = polls,
                    results = response.results.len(),
                    status = ?status,
                    "Search poll"
                );
                if let Some(job) = job.write().await.as_mut().filter(|j| j.id == id) {
                    job.apply_poll(response);
                }
                if status.is_terminal() {
                    break StopReason::Finished { status };
                }
            }
            Err(e) => {
                warn!(id, poll = polls, error = %e, "Search poll failed");
                break StopReason::Failed {
                    error: e.to_string(),
                };
            }
        }
    };

    {
        let mut slot = slot.lock().await;
        if matches!(&*slot, Slot::Running(active) if active.id == id) {
            *slot = Slot::Idle;
        }
    }

    let results = match job.write().await.as_mut().filter(|j| j.id == id) {
        Some(job) => {
            job.finish(reason.clone());
            job.results.len()
        }
        None => 0,
    };

    metrics::SEARCH_JOBS
        .with_label_values(&[reason.as_str()])
        .inc();
    info!(id, polls, results, reason = reason.as_str(), "Search finished");
}
