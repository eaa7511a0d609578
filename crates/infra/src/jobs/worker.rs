//! Background worker: one task per job.

use std::sync::Arc;

use tokio::sync::Semaphore;
use tracing::{debug, error, info, warn};

use callsight_ai::{InsightPipeline, Report};

use super::clock::Clock;
use super::store::JobStore;
use super::types::JobId;

/// How a worker run ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WorkerOutcome {
    /// A report was written to the job.
    Delivered,
    /// The pipeline failed or panicked; an error report was written instead.
    Faulted,
    /// The job was gone (reclaimed or swept) before or after the run.
    Abandoned,
}

/// Run the pipeline for `job_id` and attach its report.
///
/// Never panics and never propagates an error: every failure ends as an
/// error report on the job, or as a logged no-op when the job is gone.
pub async fn run_job<S, C>(
    store: S,
    clock: C,
    pipeline: Arc<InsightPipeline>,
    job_id: JobId,
    permits: Option<Arc<Semaphore>>,
) -> WorkerOutcome
where
    S: JobStore,
    C: Clock,
{
    let job = match store.get(&job_id) {
        Ok(Some(job)) => job,
        Ok(None) => {
            debug!(job_id = %job_id, "job vanished before worker start");
            return WorkerOutcome::Abandoned;
        }
        Err(e) => {
            error!(job_id = %job_id, error = %e, "failed to read job");
            return WorkerOutcome::Abandoned;
        }
    };

    let _permit = match permits {
        Some(sem) => match sem.acquire_owned().await {
            Ok(p) => Some(p),
            Err(_) => {
                warn!(job_id = %job_id, "worker pool closed");
                None
            }
        },
        None => None,
    };

    let metric_id = job.metric_id.clone();
    let request = job.request();

    // Inner task so a panic in the pipeline surfaces as a JoinError here.
    let handle = tokio::spawn(async move { pipeline.run(&request).await });

    let (report, faulted) = match handle.await {
        Ok(Ok(report)) => (report, false),
        Ok(Err(e)) => {
            warn!(job_id = %job_id, metric = %metric_id, error = %e, "pipeline failed");
            (Report::error(&metric_id, &e.to_string()), true)
        }
        Err(e) => {
            error!(job_id = %job_id, metric = %metric_id, error = %e, "pipeline task aborted");
            (Report::error(&metric_id, "internal worker failure"), true)
        }
    };

    let source = report.source.as_str();
    match store.set_result(&job_id, report) {
        Ok(true) => {
            info!(
                job_id = %job_id,
                metric = %metric_id,
                source,
                age_ms = job.age(clock.now()).as_millis() as u64,
                "insight ready"
            );
            if faulted {
                WorkerOutcome::Faulted
            } else {
                WorkerOutcome::Delivered
            }
        }
        Ok(false) => {
            debug!(job_id = %job_id, "job reclaimed before result; dropping report");
            WorkerOutcome::Abandoned
        }
        Err(e) => {
            error!(job_id = %job_id, error = %e, "failed to store result");
            WorkerOutcome::Abandoned
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::jobs::clock::{Clock, ManualClock, SystemClock};
    use crate::jobs::store::InMemoryJobStore;
    use crate::jobs::types::{Job, JobStatus};
    use callsight_ai::{ExtraContext, ReportSource};
    use callsight_core::{MetricId, MetricValue};
    use chrono::Utc;
    use std::time::Instant;

    fn submit(store: &Arc<InMemoryJobStore>, metric: &str, extra: ExtraContext) -> JobId {
        let metric = MetricId::parse(metric).unwrap();
        let job = Job::new(
            JobId::generate(&metric, Utc::now()),
            metric,
            MetricValue::from(2800.0),
            extra,
            Instant::now(),
            Utc::now(),
        );
        store.create(job).unwrap()
    }

    #[tokio::test]
    async fn worker_writes_local_report() {
        let store = InMemoryJobStore::arc();
        let id = submit(&store, "call_volume", ExtraContext::new());

        let outcome = run_job(store.clone(), SystemClock, Arc::new(InsightPipeline::default()), id.clone(), None).await;

        assert_eq!(outcome, WorkerOutcome::Delivered);
        let job = store.get(&id).unwrap().unwrap();
        assert_eq!(job.status, JobStatus::Complete);
        assert_eq!(job.result.unwrap().source, ReportSource::FallbackLocal);
    }

    #[tokio::test]
    async fn pipeline_error_becomes_error_report() {
        let store = InMemoryJobStore::arc();
        let mut extra = ExtraContext::new();
        extra.insert("historical_trends".into(), serde_json::json!("not a list"));
        let id = submit(&store, "call_volume", extra);

        let outcome = run_job(store.clone(), SystemClock, Arc::new(InsightPipeline::default()), id.clone(), None).await;

        assert_eq!(outcome, WorkerOutcome::Faulted);
        let report = store.get(&id).unwrap().unwrap().result.unwrap();
        assert!(!report.success);
        assert_eq!(report.source, ReportSource::Error);
    }

    struct Exploding;

    #[async_trait::async_trait]
    impl callsight_ai::LanguageModel for Exploding {
        async fn generate(&self, _prompt: &str) -> Result<String, callsight_ai::GenerationError> {
            panic!("model backend blew up");
        }
    }

    #[tokio::test]
    async fn pipeline_panic_becomes_error_report() {
        let store = InMemoryJobStore::arc();
        let id = submit(&store, "call_volume", ExtraContext::new());
        let pipeline = InsightPipeline::with_model(Some(Arc::new(Exploding)));

        let outcome = run_job(store.clone(), SystemClock, Arc::new(pipeline), id.clone(), None).await;

        assert_eq!(outcome, WorkerOutcome::Faulted);
        let job = store.get(&id).unwrap().unwrap();
        assert_eq!(job.status, JobStatus::Complete);
        let report = job.result.unwrap();
        assert!(!report.success);
        assert_eq!(report.source, ReportSource::Error);
        assert!(report.body.contains("internal worker failure"));
    }

    #[tokio::test]
    async fn worker_reads_job_age_from_injected_clock() {
        let clock = ManualClock::arc();
        let store = InMemoryJobStore::arc();
        let metric = MetricId::parse("queue_status").unwrap();
        let job = Job::new(
            JobId::generate(&metric, clock.utc_now()),
            metric,
            MetricValue::from(12.0),
            ExtraContext::new(),
            clock.now(),
            clock.utc_now(),
        );
        let id = store.create(job).unwrap();
        clock.advance(std::time::Duration::from_secs(7));

        let outcome = run_job(store.clone(), clock.clone(), Arc::new(InsightPipeline::default()), id.clone(), None).await;

        assert_eq!(outcome, WorkerOutcome::Delivered);
        let job = store.get(&id).unwrap().unwrap();
        assert_eq!(job.age(clock.now()), std::time::Duration::from_secs(7));
    }

    #[tokio::test]
    async fn missing_job_is_abandoned() {
        let store = InMemoryJobStore::arc();
        let outcome = run_job(
            store.clone(),
            SystemClock,
            Arc::new(InsightPipeline::default()),
            JobId::from("gone"),
            Some(Arc::new(Semaphore::new(1))),
        )
        .await;
        assert_eq!(outcome, WorkerOutcome::Abandoned);
        assert!(store.is_empty().unwrap());
    }
}
