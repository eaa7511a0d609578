//! Core job types.

use std::time::{Duration, Instant};

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use callsight_ai::{ExtraContext, InsightRequest, Report};
use callsight_core::{MetricId, MetricValue};

/// Opaque job identifier: `<metric>-<unix millis>-<random suffix>`.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct JobId(String);

impl JobId {
    /// Fresh id for a submission of `metric` at `at`.
    pub fn generate(metric: &MetricId, at: DateTime<Utc>) -> Self {
        let uuid = Uuid::now_v7().simple().to_string();
        // The tail of a v7 uuid is random; the head repeats the timestamp.
        let suffix = &uuid[uuid.len() - 12..];
        Self(format!("{}-{}-{}", metric, at.timestamp_millis(), suffix))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl From<&str> for JobId {
    fn from(value: &str) -> Self {
        Self(value.to_string())
    }
}

impl From<String> for JobId {
    fn from(value: String) -> Self {
        Self(value)
    }
}

impl std::fmt::Display for JobId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

/// Job lifecycle. Timed-out and failed jobs are `Complete` with an error report.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum JobStatus {
    Processing,
    Complete,
}

/// An insight job as held by the store.
#[derive(Debug, Clone)]
pub struct Job {
    pub id: JobId,
    pub status: JobStatus,
    pub metric_id: MetricId,
    pub current_value: MetricValue,
    pub extra_context: ExtraContext,
    /// Monotonic creation time; drives timeout and staleness.
    pub started_at: Instant,
    pub submitted_at: DateTime<Utc>,
    /// Last whole-second elapsed value reported to a poller.
    pub last_reported_elapsed: Option<u64>,
    pub result: Option<Report>,
}

impl Job {
    pub fn new(
        id: JobId,
        metric_id: MetricId,
        current_value: MetricValue,
        extra_context: ExtraContext,
        started_at: Instant,
        submitted_at: DateTime<Utc>,
    ) -> Self {
        Self {
            id,
            status: JobStatus::Processing,
            metric_id,
            current_value,
            extra_context,
            started_at,
            submitted_at,
            last_reported_elapsed: None,
            result: None,
        }
    }

    pub fn age(&self, now: Instant) -> Duration {
        now.saturating_duration_since(self.started_at)
    }

    pub fn is_complete(&self) -> bool {
        self.status == JobStatus::Complete
    }

    /// Record the whole-second elapsed time a poller is about to see.
    ///
    /// Returns `None` when it equals the value last reported.
    pub fn observe_elapsed(&mut self, now: Instant) -> Option<u64> {
        let secs = self.age(now).as_secs();
        if self.last_reported_elapsed == Some(secs) {
            return None;
        }
        self.last_reported_elapsed = Some(secs);
        Some(secs)
    }

    /// Attach the final report. Write-once: returns `false` if already complete.
    pub fn complete(&mut self, report: Report) -> bool {
        if self.is_complete() {
            return false;
        }
        self.result = Some(report);
        self.status = JobStatus::Complete;
        true
    }

    /// Pipeline inputs for this job.
    pub fn request(&self) -> InsightRequest {
        InsightRequest::new(self.metric_id.clone(), self.current_value.clone())
            .with_extra_context(self.extra_context.clone())
    }
}

/// Outcome of one atomic poll step against the store.
#[derive(Debug, Clone, PartialEq)]
pub enum Observation {
    Unknown,
    /// The job was complete; it has been removed and this is its only delivery.
    Complete(Report),
    /// Still processing past the timeout; it has been removed.
    TimedOut { metric_id: MetricId, elapsed: Duration },
    /// Still processing, same whole second as the last poll.
    Unchanged,
    Progress { elapsed_seconds: u64 },
}

/// What a poller sees.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "state", rename_all = "kebab-case")]
pub enum PollResult {
    Unknown,
    NoChange,
    Processing { elapsed_seconds: u64 },
    Complete { report: Report },
}

impl PollResult {
    pub fn is_terminal(&self) -> bool {
        matches!(self, PollResult::Complete { .. })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;
    use std::collections::HashSet;

    fn job(now: Instant) -> Job {
        let metric = MetricId::parse("call_volume").unwrap();
        Job::new(
            JobId::generate(&metric, Utc::now()),
            metric,
            MetricValue::from(2800.0),
            ExtraContext::new(),
            now,
            Utc::now(),
        )
    }

    #[test]
    fn id_has_metric_millis_and_suffix() {
        let metric = MetricId::parse("revenue_growth").unwrap();
        let at = DateTime::from_timestamp_millis(1_700_000_000_123).unwrap();
        let id = JobId::generate(&metric, at);
        let s = id.as_str();
        assert!(s.starts_with("revenue_growth-1700000000123-"));
        assert_eq!(s.rsplit('-').next().unwrap().len(), 12);
    }

    #[test]
    fn elapsed_change_is_suppressed_within_a_second() {
        let t0 = Instant::now();
        let mut j = job(t0);
        assert_eq!(j.observe_elapsed(t0), Some(0));
        assert_eq!(j.observe_elapsed(t0 + Duration::from_millis(400)), None);
        assert_eq!(j.observe_elapsed(t0 + Duration::from_millis(1_200)), Some(1));
        assert_eq!(j.observe_elapsed(t0 + Duration::from_millis(1_900)), None);
    }

    #[test]
    fn result_is_write_once() {
        let mut j = job(Instant::now());
        let metric = j.metric_id.clone();
        assert!(j.complete(Report::error(&metric, "first")));
        assert!(!j.complete(Report::error(&metric, "second")));
        assert!(j.result.as_ref().unwrap().body.contains("first"));
        assert_eq!(j.status, JobStatus::Complete);
    }

    #[test]
    fn poll_result_serializes_with_state_tag() {
        let v = serde_json::to_value(PollResult::Processing { elapsed_seconds: 3 }).unwrap();
        assert_eq!(v, serde_json::json!({"state": "processing", "elapsed_seconds": 3}));
        let v = serde_json::to_value(PollResult::NoChange).unwrap();
        assert_eq!(v, serde_json::json!({"state": "no-change"}));
    }

    proptest! {
        #[test]
        fn ids_generated_together_are_unique(metric in "[a-z][a-z_]{0,20}", n in 2usize..200) {
            let metric = MetricId::parse(&metric).unwrap();
            let at = Utc::now();
            let ids: HashSet<JobId> = (0..n).map(|_| JobId::generate(&metric, at)).collect();
            prop_assert_eq!(ids.len(), n);
        }
    }
}
