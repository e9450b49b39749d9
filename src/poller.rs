use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Mutex, MutexGuard};

use anyhow::Result;
use chrono::{DateTime, Utc};
use tokio::task::JoinHandle;
use tokio::time::{Duration, MissedTickBehavior, interval};
use tracing::{debug, info, warn};

use crate::client::ApiClient;
use crate::telemetry::SensorRecord;

/// Default cadence between automatic refreshes.
pub const POLL_INTERVAL: Duration = Duration::from_secs(10);

/// What consumers see: the most recently *completed* fetch, not the most
/// recently issued one.
#[derive(Debug, Clone, Default)]
pub struct FetchState {
    /// Current batch, newest first. Replaced wholesale on success, cleared
    /// on failure so stale data is never shown behind a plausible view.
    pub batch: Vec<SensorRecord>,

    /// Completion time of the last applied successful fetch.
    pub last_fetch: Option<DateTime<Utc>>,

    /// Human-readable message from the last failed fetch.
    pub error: Option<String>,

    pub loading: bool,
}

#[derive(Debug, Default)]
struct Shared {
    state: FetchState,
    /// Sequence of the last applied completion. Completions stamped with an
    /// older sequence are discarded, so a slow response never clobbers a
    /// newer one.
    applied_seq: u64,
    stopped: bool,
}

/// Periodically fetches the recent batch from the collection service and
/// owns the resulting state. Stops with its owner: `stop()` (or drop)
/// cancels the timer task and marks in-flight completions for discard.
#[derive(Debug)]
pub struct Poller {
    client: ApiClient,
    shared: Arc<Mutex<Shared>>,
    issued: Arc<AtomicU64>,
    task: Option<JoinHandle<()>>,
}

impl Poller {
    pub fn new(client: ApiClient) -> Self {
        let shared = Shared {
            state: FetchState {
                loading: true,
                ..FetchState::default()
            },
            ..Shared::default()
        };
        Poller {
            client,
            shared: Arc::new(Mutex::new(shared)),
            issued: Arc::new(AtomicU64::new(0)),
            task: None,
        }
    }

    /// Fetch immediately, then keep fetching every `every` until `stop()`.
    pub fn start(&mut self, every: Duration) {
        if self.task.is_some() {
            return;
        }
        let client = self.client.clone();
        let shared = Arc::clone(&self.shared);
        let issued = Arc::clone(&self.issued);
        self.task = Some(tokio::spawn(async move {
            let mut ticker = interval(every);
            ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);
            loop {
                // the first tick completes immediately
                ticker.tick().await;
                run_cycle(&client, &shared, &issued).await;
            }
        }));
    }

    /// Manual refresh with the same semantics as a timer cycle. Safe to call
    /// while another fetch is in flight.
    pub async fn refresh(&self) {
        run_cycle(&self.client, &self.shared, &self.issued).await;
    }

    /// Cancel the timer task. An in-flight request may still complete but
    /// its result will be discarded.
    pub fn stop(&mut self) {
        if let Some(task) = self.task.take() {
            task.abort();
        }
        lock(&self.shared).stopped = true;
    }

    pub fn snapshot(&self) -> FetchState {
        lock(&self.shared).state.clone()
    }
}

impl Drop for Poller {
    fn drop(&mut self) {
        self.stop();
    }
}

async fn run_cycle(client: &ApiClient, shared: &Mutex<Shared>, issued: &AtomicU64) {
    let seq = issued.fetch_add(1, Ordering::SeqCst) + 1;
    {
        let mut shared = lock(shared);
        if shared.stopped {
            return;
        }
        shared.state.error = None;
        shared.state.loading = true;
    }

    let result = client.recent_data().await.map(|response| response.data);
    apply_completion(shared, seq, result);
}

/// Apply one fetch completion, unless the poller stopped or a newer
/// completion already landed.
fn apply_completion(shared: &Mutex<Shared>, seq: u64, result: Result<Vec<SensorRecord>>) {
    let mut shared = lock(shared);
    if shared.stopped {
        debug!(seq, "discarding completion after stop");
        return;
    }
    if seq <= shared.applied_seq {
        debug!(
            seq,
            applied = shared.applied_seq,
            "discarding out-of-order completion"
        );
        return;
    }
    shared.applied_seq = seq;
    shared.state.loading = false;

    match result {
        Ok(batch) => {
            info!(seq, records = batch.len(), "fetch applied");
            shared.state.batch = batch;
            shared.state.last_fetch = Some(Utc::now());
            shared.state.error = None;
        }
        Err(error) => {
            let message = format!("{error:#}");
            warn!(seq, error = %message, "fetch failed, clearing batch");
            shared.state.batch.clear();
            shared.state.error = Some(message);
        }
    }
}

fn lock(shared: &Mutex<Shared>) -> MutexGuard<'_, Shared> {
    shared.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
}
