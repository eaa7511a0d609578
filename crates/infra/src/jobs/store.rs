//! Job storage implementations.

use std::collections::HashMap;
use std::sync::{Arc, RwLock, RwLockReadGuard, RwLockWriteGuard};
use std::time::{Duration, Instant};

use callsight_ai::Report;

use super::types::{Job, JobId, JobStatus, Observation};

/// Job store abstraction.
///
/// The store is the only holder of job state. Every mutation of a single job
/// happens under one lock acquisition, so callers never see a torn job.
pub trait JobStore: Send + Sync {
    /// Insert a new job.
    fn create(&self, job: Job) -> Result<JobId, JobStoreError>;

    /// Snapshot of a job by id.
    fn get(&self, job_id: &JobId) -> Result<Option<Job>, JobStoreError>;

    /// Attach the final report.
    ///
    /// Returns `false` (no-op) when the job is gone or already complete.
    fn set_result(&self, job_id: &JobId, report: Report) -> Result<bool, JobStoreError>;

    /// Remove a job, returning it if it existed.
    fn delete(&self, job_id: &JobId) -> Result<Option<Job>, JobStoreError>;

    /// Remove every job older than `max_age`, whatever its status.
    fn sweep_stale(&self, now: Instant, max_age: Duration) -> Result<Vec<JobId>, JobStoreError>;

    /// The poll step: consume a complete job, reclaim a timed-out one, or
    /// record elapsed progress. Atomic with respect to other callers.
    fn observe(
        &self,
        job_id: &JobId,
        now: Instant,
        timeout: Duration,
    ) -> Result<Observation, JobStoreError>;

    /// Number of live jobs.
    fn len(&self) -> Result<usize, JobStoreError>;

    fn is_empty(&self) -> Result<bool, JobStoreError> {
        Ok(self.len()? == 0)
    }

    /// Job statistics.
    fn stats(&self) -> Result<JobStats, JobStoreError>;
}

/// Job store error.
#[derive(Debug, Clone, thiserror::Error)]
pub enum JobStoreError {
    #[error("job not found: {0}")]
    NotFound(JobId),
    #[error("job already exists: {0}")]
    AlreadyExists(JobId),
    #[error("storage error: {0}")]
    Storage(String),
}

/// Job statistics.
#[derive(Debug, Clone, Default, PartialEq, Eq, serde::Serialize)]
pub struct JobStats {
    pub processing: usize,
    pub complete: usize,
}

/// In-memory job store.
#[derive(Debug)]
pub struct InMemoryJobStore {
    jobs: RwLock<HashMap<JobId, Job>>,
}

impl InMemoryJobStore {
    pub fn new() -> Self {
        Self {
            jobs: RwLock::new(HashMap::new()),
        }
    }

    pub fn arc() -> Arc<Self> {
        Arc::new(Self::new())
    }

    fn read(&self) -> Result<RwLockReadGuard<'_, HashMap<JobId, Job>>, JobStoreError> {
        self.jobs
            .read()
            .map_err(|_| JobStoreError::Storage("job store lock poisoned".to_string()))
    }

    fn write(&self) -> Result<RwLockWriteGuard<'_, HashMap<JobId, Job>>, JobStoreError> {
        self.jobs
            .write()
            .map_err(|_| JobStoreError::Storage("job store lock poisoned".to_string()))
    }
}

impl Default for InMemoryJobStore {
    fn default() -> Self {
        Self::new()
    }
}

impl JobStore for InMemoryJobStore {
    fn create(&self, job: Job) -> Result<JobId, JobStoreError> {
        let mut jobs = self.write()?;
        if jobs.contains_key(&job.id) {
            return Err(JobStoreError::AlreadyExists(job.id));
        }
        let id = job.id.clone();
        jobs.insert(id.clone(), job);
        Ok(id)
    }

    fn get(&self, job_id: &JobId) -> Result<Option<Job>, JobStoreError> {
        Ok(self.read()?.get(job_id).cloned())
    }

    fn set_result(&self, job_id: &JobId, report: Report) -> Result<bool, JobStoreError> {
        let mut jobs = self.write()?;
        match jobs.get_mut(job_id) {
            Some(job) => {
                let written = job.complete(report);
                if !written {
                    tracing::warn!(job_id = %job_id, "result already set; ignoring second write");
                }
                Ok(written)
            }
            None => Ok(false),
        }
    }

    fn delete(&self, job_id: &JobId) -> Result<Option<Job>, JobStoreError> {
        Ok(self.write()?.remove(job_id))
    }

    fn sweep_stale(&self, now: Instant, max_age: Duration) -> Result<Vec<JobId>, JobStoreError> {
        let mut jobs = self.write()?;
        let stale: Vec<JobId> = jobs
            .values()
            .filter(|j| j.age(now) > max_age)
            .map(|j| j.id.clone())
            .collect();
        for id in &stale {
            jobs.remove(id);
        }
        Ok(stale)
    }

    fn observe(
        &self,
        job_id: &JobId,
        now: Instant,
        timeout: Duration,
    ) -> Result<Observation, JobStoreError> {
        let mut jobs = self.write()?;

        let Some(job) = jobs.get_mut(job_id) else {
            return Ok(Observation::Unknown);
        };

        if job.is_complete() {
            let report = job.result.take();
            jobs.remove(job_id);
            return Ok(match report {
                Some(report) => Observation::Complete(report),
                // Complete without a report cannot be built through `Job::complete`.
                None => Observation::Unknown,
            });
        }

        let elapsed = job.age(now);
        if elapsed > timeout {
            let metric_id = job.metric_id.clone();
            jobs.remove(job_id);
            return Ok(Observation::TimedOut { metric_id, elapsed });
        }

        Ok(match job.observe_elapsed(now) {
            Some(elapsed_seconds) => Observation::Progress { elapsed_seconds },
            None => Observation::Unchanged,
        })
    }

    fn len(&self) -> Result<usize, JobStoreError> {
        Ok(self.read()?.len())
    }

    fn stats(&self) -> Result<JobStats, JobStoreError> {
        let jobs = self.read()?;
        let mut stats = JobStats::default();
        for job in jobs.values() {
            match job.status {
                JobStatus::Processing => stats.processing += 1,
                JobStatus::Complete => stats.complete += 1,
            }
        }
        Ok(stats)
    }
}

impl JobStore for Arc<InMemoryJobStore> {
    fn create(&self, job: Job) -> Result<JobId, JobStoreError> {
        (**self).create(job)
    }

    fn get(&self, job_id: &JobId) -> Result<Option<Job>, JobStoreError> {
        (**self).get(job_id)
    }

    fn set_result(&self, job_id: &JobId, report: Report) -> Result<bool, JobStoreError> {
        (**self).set_result(job_id, report)
    }

    fn delete(&self, job_id: &JobId) -> Result<Option<Job>, JobStoreError> {
        (**self).delete(job_id)
    }

    fn sweep_stale(&self, now: Instant, max_age: Duration) -> Result<Vec<JobId>, JobStoreError> {
        (**self).sweep_stale(now, max_age)
    }

    fn observe(
        &self,
        job_id: &JobId,
        now: Instant,
        timeout: Duration,
    ) -> Result<Observation, JobStoreError> {
        (**self).observe(job_id, now, timeout)
    }

    fn len(&self) -> Result<usize, JobStoreError> {
        (**self).len()
    }

    fn stats(&self) -> Result<JobStats, JobStoreError> {
        (**self).stats()
    }
}
