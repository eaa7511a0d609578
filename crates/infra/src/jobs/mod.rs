//! Asynchronous insight jobs.
//!
//! ## Design
//!
//! - One job per submission, held only by the [`JobStore`]
//! - One background worker task per job; the submitter never waits
//! - Pollers observe progress; a complete job is delivered exactly once
//! - A processing timeout is enforced at poll time, and a staleness sweep
//!   reclaims anything nobody came back for
//!
//! ## Components
//!
//! - `Job`: inputs, status and the write-once report
//! - `JobStore`: storage with an atomic poll step
//! - `Clock`: injectable time source
//! - `InsightOrchestrator`: submit / poll / sweep

pub mod clock;
pub mod orchestrator;
pub mod store;
pub mod types;
pub mod worker;

pub use clock::{Clock, ManualClock, SystemClock};
pub use orchestrator::{
    DEFAULT_JOB_TIMEOUT, DEFAULT_STALE_AFTER, DEFAULT_SWEEP_INTERVAL, InsightOrchestrator,
    OrchestratorConfig, OrchestratorError, OrchestratorStats, SweeperHandle,
};
pub use store::{InMemoryJobStore, JobStats, JobStore, JobStoreError};
pub use types::{Job, JobId, JobStatus, Observation, PollResult};
