use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::{Arc, Mutex, OnceLock, PoisonError};
use std::time::Duration;

use engine_logging::{engine_debug, engine_error, engine_info, engine_trace, engine_warn};
use todo_core::{FetchTarget, Item, ResultStore, RunConfig, TargetGenerator};
use tokio::sync::Semaphore;
use tokio::task::JoinSet;
use tokio::time::Instant;
use tokio_util::sync::CancellationToken;

use crate::fetch::{FetchSettings, Fetcher, ReqwestFetcher};
use crate::{decode_item, FailureKind, FetchError, TaskError};

/// Runs the bounded fetch pool and places results by id.
pub struct Orchestrator {
    config: RunConfig,
    fetcher: Arc<dyn Fetcher>,
}

/// Everything a finished run produced. Always renderable, even after a
/// failure or an exceeded deadline.
#[derive(Debug)]
pub struct RunReport {
    pub store: ResultStore,
    pub first_error: Option<TaskError>,
    pub deadline_exceeded: bool,
    /// Tasks spawned before dispatch finished or stopped.
    pub dispatched: usize,
    /// Items dropped for having a non-positive id.
    pub discarded: usize,
    pub elapsed: Duration,
}

#[derive(Debug, PartialEq, Eq)]
pub enum StopCause<'a> {
    Completed,
    Failed(&'a TaskError),
    DeadlineExceeded,
}

impl RunReport {
    /// A task error takes precedence over the deadline when both happened.
    pub fn stop_cause(&self) -> StopCause<'_> {
        match (&self.first_error, self.deadline_exceeded) {
            (Some(err), _) => StopCause::Failed(err),
            (None, true) => StopCause::DeadlineExceeded,
            (None, false) => StopCause::Completed,
        }
    }

    pub fn render(&self) -> String {
        self.store.render()
    }
}

/// State shared by the dispatch loop and every task of one run.
struct RunShared {
    store: Mutex<ResultStore>,
    first_error: OnceLock<TaskError>,
    cancel: CancellationToken,
    discarded: AtomicUsize,
}

impl RunShared {
    fn place(&self, item: Item) {
        match item.slot() {
            Ok(index) => {
                engine_trace!("Placing item id={} index={}", item.external_id, index);
                let mut store = self.store.lock().unwrap_or_else(PoisonError::into_inner);
                store.place(index, item);
            }
            Err(invalid) => {
                engine_error!("API item_id={} error={}", invalid.external_id, invalid);
                self.discarded.fetch_add(1, Ordering::Relaxed);
            }
        }
    }

    /// Keeps the first failure and cancels the run; later ones are dropped.
    fn record_failure(&self, err: TaskError) {
        if is_cancellation(&err) {
            engine_debug!("Task cancelled endpoint={}", err.target());
            return;
        }
        match self.first_error.set(err) {
            Ok(()) => self.cancel.cancel(),
            Err(dropped) => engine_debug!("Dropping later task error error={}", dropped),
        }
    }
}

fn is_cancellation(err: &TaskError) -> bool {
    matches!(err, TaskError::Fetch { source, .. } if source.kind == FailureKind::Cancelled)
}

impl Orchestrator {
    pub fn new(config: RunConfig, fetcher: Arc<dyn Fetcher>) -> Self {
        Self { config, fetcher }
    }

    /// Builds an orchestrator backed by a [`ReqwestFetcher`] whose timeouts
    /// come from `config`.
    pub fn with_reqwest(config: RunConfig) -> Result<Self, FetchError> {
        let fetcher = ReqwestFetcher::new(FetchSettings::from_config(&config))?;
        Ok(Self::new(config, Arc::new(fetcher)))
    }

    pub fn config(&self) -> &RunConfig {
        &self.config
    }

    /// Dispatches `count` fetches, at most `worker_limit` at a time, and
    /// waits for all of them to settle.
    ///
    /// The generator is called once per dispatched task, in dispatch order.
    /// Dispatch stops when the deadline passes or a task fails; tasks already
    /// spawned still run to completion and their items are kept.
    pub async fn run(&self, generator: &mut dyn TargetGenerator) -> RunReport {
        let start = Instant::now();
        let shared = Arc::new(RunShared {
            store: Mutex::new(ResultStore::with_capacity(self.config.initial_capacity)),
            first_error: OnceLock::new(),
            cancel: CancellationToken::new(),
            discarded: AtomicUsize::new(0),
        });

        let deadline_hit = Arc::new(AtomicBool::new(false));
        let watchdog = tokio::spawn(watch_deadline(
            start.checked_add(self.config.overall_deadline),
            shared.cancel.clone(),
            deadline_hit.clone(),
        ));

        let workers = self.config.effective_workers().min(Semaphore::MAX_PERMITS);
        let permits = Arc::new(Semaphore::new(workers));
        let mut tasks = JoinSet::new();
        let mut dispatched = 0;

        for _ in 0..self.config.count {
            if shared.cancel.is_cancelled() {
                break;
            }
            let permit = tokio::select! {
                biased;
                _ = shared.cancel.cancelled() => break,
                permit = permits.clone().acquire_owned() => match permit {
                    Ok(permit) => permit,
                    Err(_) => break,
                },
            };

            let target = generator.next_target();
            dispatched += 1;
            let fetcher = self.fetcher.clone();
            let shared = shared.clone();
            tasks.spawn(async move {
                let _permit = permit;
                match fetch_item(fetcher.as_ref(), &shared.cancel, target).await {
                    Ok(item) => shared.place(item),
                    Err(err) => shared.record_failure(err),
                }
            });
        }

        if dispatched < self.config.count {
            engine_warn!(
                "Dispatch stopped early dispatched={} requested={}",
                dispatched,
                self.config.count
            );
        }

        while let Some(joined) = tasks.join_next().await {
            if let Err(err) = joined {
                engine_warn!("Fetch task did not complete: {}", err);
            }
        }
        watchdog.abort();

        let deadline_exceeded = deadline_hit.load(Ordering::SeqCst);
        if deadline_exceeded {
            engine_error!(
                "Execution exceeded deadline deadline={:?}",
                self.config.overall_deadline
            );
        }
        let first_error = shared.first_error.get().cloned();
        if let Some(err) = &first_error {
            engine_error!("Fetching todo items error={}", err);
        }

        let store = std::mem::take(
            &mut *shared.store.lock().unwrap_or_else(PoisonError::into_inner),
        );
        let report = RunReport {
            store,
            first_error,
            deadline_exceeded,
            dispatched,
            discarded: shared.discarded.load(Ordering::Relaxed),
            elapsed: start.elapsed(),
        };
        engine_info!(
            "Run finished placed={} dispatched={} discarded={} elapsed={:?}",
            report.store.len(),
            report.dispatched,
            report.discarded,
            report.elapsed
        );
        report
    }
}

async fn fetch_item(
    fetcher: &dyn Fetcher,
    cancel: &CancellationToken,
    target: FetchTarget,
) -> Result<Item, TaskError> {
    let output = match fetcher.fetch(&target, cancel).await {
        Ok(output) => output,
        Err(source) => return Err(TaskError::Fetch { target, source }),
    };
    decode_item(&output.bytes).map_err(|source| TaskError::Decode { target, source })
}

/// Cancels the run once `at` passes. A deadline too far out to represent
/// never fires.
async fn watch_deadline(at: Option<Instant>, cancel: CancellationToken, hit: Arc<AtomicBool>) {
    let Some(at) = at else {
        cancel.cancelled().await;
        return;
    };
    tokio::select! {
        _ = tokio::time::sleep_until(at) => {
            hit.store(true, Ordering::SeqCst);
            cancel.cancel();
        }
        _ = cancel.cancelled() => {}
    }
}
