//! Submit / poll / sweep for insight jobs.

use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};
use std::time::Duration;

use serde::Serialize;
use tokio::sync::{Notify, Semaphore};
use tokio::task::JoinHandle;
use tokio::time::MissedTickBehavior;
use tracing::{debug, info, warn};

use callsight_ai::{ExtraContext, InsightPipeline, Report};
use callsight_core::{DomainError, MetricId, MetricValue};

use super::clock::Clock;
use super::store::{JobStats, JobStore, JobStoreError};
use super::types::{Job, JobId, Observation, PollResult};
use super::worker::{WorkerOutcome, run_job};

/// User-facing processing timeout.
pub const DEFAULT_JOB_TIMEOUT: Duration = Duration::from_secs(30);
/// Age after which any job is reclaimed by the sweep.
pub const DEFAULT_STALE_AFTER: Duration = Duration::from_secs(5 * 60);
/// Cadence of the background sweeper.
pub const DEFAULT_SWEEP_INTERVAL: Duration = Duration::from_secs(60);

const ID_ATTEMPTS: usize = 3;

/// Orchestrator configuration.
#[derive(Debug, Clone)]
pub struct OrchestratorConfig {
    pub job_timeout: Duration,
    pub stale_after: Duration,
    pub sweep_interval: Duration,
    /// Cap on concurrently running pipelines. `None` is unbounded.
    pub max_concurrent_workers: Option<usize>,
}

impl Default for OrchestratorConfig {
    fn default() -> Self {
        Self {
            job_timeout: DEFAULT_JOB_TIMEOUT,
            stale_after: DEFAULT_STALE_AFTER,
            sweep_interval: DEFAULT_SWEEP_INTERVAL,
            max_concurrent_workers: None,
        }
    }
}

impl OrchestratorConfig {
    pub fn with_job_timeout(mut self, timeout: Duration) -> Self {
        self.job_timeout = timeout;
        self
    }

    pub fn with_stale_after(mut self, stale_after: Duration) -> Self {
        self.stale_after = stale_after;
        self
    }

    pub fn with_sweep_interval(mut self, interval: Duration) -> Self {
        self.sweep_interval = interval;
        self
    }

    pub fn with_max_concurrent_workers(mut self, max: Option<usize>) -> Self {
        self.max_concurrent_workers = max;
        self
    }
}

#[derive(Debug, thiserror::Error)]
pub enum OrchestratorError {
    #[error("invalid metric: {0}")]
    InvalidMetric(#[from] DomainError),
    #[error(transparent)]
    Store(#[from] JobStoreError),
    #[error("submit called outside a tokio runtime")]
    NoRuntime,
}

/// Lifetime counters plus the live store breakdown.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct OrchestratorStats {
    pub submitted: u64,
    pub delivered: u64,
    pub timed_out: u64,
    pub reclaimed: u64,
    pub worker_faults: u64,
    pub live: JobStats,
}

#[derive(Debug, Default)]
struct Counters {
    submitted: AtomicU64,
    delivered: AtomicU64,
    timed_out: AtomicU64,
    reclaimed: AtomicU64,
    worker_faults: AtomicU64,
}

impl Counters {
    fn bump(counter: &AtomicU64, by: u64) {
        counter.fetch_add(by, Ordering::Relaxed);
    }
}

/// Owns the job store and hands each submission to a background worker.
///
/// Cheap to clone; clones share the store, counters and worker pool.
pub struct InsightOrchestrator<S, C> {
    store: S,
    clock: C,
    pipeline: Arc<InsightPipeline>,
    config: OrchestratorConfig,
    permits: Option<Arc<Semaphore>>,
    counters: Arc<Counters>,
}

impl<S: Clone, C: Clone> Clone for InsightOrchestrator<S, C> {
    fn clone(&self) -> Self {
        Self {
            store: self.store.clone(),
            clock: self.clock.clone(),
            pipeline: self.pipeline.clone(),
            config: self.config.clone(),
            permits: self.permits.clone(),
            counters: self.counters.clone(),
        }
    }
}

impl<S, C> InsightOrchestrator<S, C>
where
    S: JobStore + Clone + 'static,
    C: Clock + Clone,
{
    pub fn new(store: S, clock: C, pipeline: Arc<InsightPipeline>, config: OrchestratorConfig) -> Self {
        let permits = config
            .max_concurrent_workers
            .map(|n| Arc::new(Semaphore::new(n.max(1))));
        Self {
            store,
            clock,
            pipeline,
            config,
            permits,
            counters: Arc::new(Counters::default()),
        }
    }

    pub fn config(&self) -> &OrchestratorConfig {
        &self.config
    }

    /// Create a job and start its worker. Returns without waiting for it.
    pub fn submit(
        &self,
        metric_id: &str,
        current_value: MetricValue,
        extra_context: ExtraContext,
    ) -> Result<JobId, OrchestratorError> {
        let metric_id = MetricId::parse(metric_id)?;
        let runtime = tokio::runtime::Handle::try_current().map_err(|_| OrchestratorError::NoRuntime)?;

        let job_id = self.create_job(metric_id.clone(), current_value, extra_context)?;
        Counters::bump(&self.counters.submitted, 1);
        info!(job_id = %job_id, metric = %metric_id, "insight job submitted");

        let store = self.store.clone();
        let clock = self.clock.clone();
        let pipeline = self.pipeline.clone();
        let permits = self.permits.clone();
        let counters = self.counters.clone();
        let worker_id = job_id.clone();
        runtime.spawn(async move {
            if run_job(store, clock, pipeline, worker_id, permits).await == WorkerOutcome::Faulted {
                Counters::bump(&counters.worker_faults, 1);
            }
        });

        Ok(job_id)
    }

    fn create_job(
        &self,
        metric_id: MetricId,
        current_value: MetricValue,
        extra_context: ExtraContext,
    ) -> Result<JobId, OrchestratorError> {
        let mut last_err = None;
        for _ in 0..ID_ATTEMPTS {
            let job = Job::new(
                JobId::generate(&metric_id, self.clock.utc_now()),
                metric_id.clone(),
                current_value.clone(),
                extra_context.clone(),
                self.clock.now(),
                self.clock.utc_now(),
            );
            match self.store.create(job) {
                Ok(id) => return Ok(id),
                Err(e @ JobStoreError::AlreadyExists(_)) => {
                    warn!(error = %e, "job id collision; regenerating");
                    last_err = Some(e);
                }
                Err(e) => return Err(e.into()),
            }
        }
        Err(last_err
            .unwrap_or_else(|| JobStoreError::Storage("job id generation failed".to_string()))
            .into())
    }

    /// One poll step. Sweeps stale jobs first, then observes `job_id`.
    ///
    /// Never fails: a store error is logged and reported as `Unknown`.
    pub fn poll(&self, job_id: &str) -> PollResult {
        self.sweep();

        let job_id = JobId::from(job_id);
        let observation = match self
            .store
            .observe(&job_id, self.clock.now(), self.config.job_timeout)
        {
            Ok(o) => o,
            Err(e) => {
                warn!(job_id = %job_id, error = %e, "poll failed");
                return PollResult::Unknown;
            }
        };

        match observation {
            Observation::Unknown => PollResult::Unknown,
            Observation::Unchanged => PollResult::NoChange,
            Observation::Progress { elapsed_seconds } => PollResult::Processing { elapsed_seconds },
            Observation::Complete(report) => {
                Counters::bump(&self.counters.delivered, 1);
                debug!(job_id = %job_id, source = report.source.as_str(), "report delivered");
                PollResult::Complete { report }
            }
            Observation::TimedOut { metric_id, elapsed } => {
                Counters::bump(&self.counters.timed_out, 1);
                warn!(
                    job_id = %job_id,
                    metric = %metric_id,
                    elapsed_secs = elapsed.as_secs(),
                    "insight job timed out"
                );
                PollResult::Complete {
                    report: Report::error(&metric_id, "processing timeout"),
                }
            }
        }
    }

    /// Remove jobs older than `stale_after`. Returns how many were removed.
    pub fn sweep(&self) -> usize {
        match self
            .store
            .sweep_stale(self.clock.now(), self.config.stale_after)
        {
            Ok(ids) => {
                if !ids.is_empty() {
                    Counters::bump(&self.counters.reclaimed, ids.len() as u64);
                    info!(count = ids.len(), "reclaimed stale insight jobs");
                }
                ids.len()
            }
            Err(e) => {
                warn!(error = %e, "stale sweep failed");
                0
            }
        }
    }

    /// Run `sweep` every `sweep_interval` until the handle is shut down.
    pub fn spawn_sweeper(&self) -> SweeperHandle {
        let shutdown = Arc::new(Notify::new());
        let signal = shutdown.clone();
        let orchestrator = self.clone();
        let period = self.config.sweep_interval;

        let join = tokio::spawn(async move {
            let mut interval = tokio::time::interval(period);
            interval.set_missed_tick_behavior(MissedTickBehavior::Skip);
            loop {
                tokio::select! {
                    _ = signal.notified() => {
                        debug!("sweeper shutting down");
                        break;
                    }
                    _ = interval.tick() => {
                        orchestrator.sweep();
                    }
                }
            }
        });

        SweeperHandle { shutdown, join }
    }

    pub fn stats(&self) -> OrchestratorStats {
        let live = self.store.stats().unwrap_or_else(|e| {
            warn!(error = %e, "job stats unavailable");
            JobStats::default()
        });
        OrchestratorStats {
            submitted: self.counters.submitted.load(Ordering::Relaxed),
            delivered: self.counters.delivered.load(Ordering::Relaxed),
            timed_out: self.counters.timed_out.load(Ordering::Relaxed),
            reclaimed: self.counters.reclaimed.load(Ordering::Relaxed),
            worker_faults: self.counters.worker_faults.load(Ordering::Relaxed),
            live,
        }
    }
}

/// Handle to the background sweeper.
#[derive(Debug)]
pub struct SweeperHandle {
    shutdown: Arc<Notify>,
    join: JoinHandle<()>,
}

impl SweeperHandle {
    /// Stop the sweeper and wait for it to exit.
    pub async fn shutdown(self) {
        self.shutdown.notify_one();
        let _ = self.join.await;
    }
}
