use std::sync::Arc;

use callsight_infra::AppConfig;
use callsight_infra::jobs::{InMemoryJobStore, InsightOrchestrator, SystemClock};

pub type Orchestrator = InsightOrchestrator<Arc<InMemoryJobStore>, SystemClock>;

/// Process-wide services shared by all handlers.
#[derive(Clone)]
pub struct AppServices {
    pub orchestrator: Orchestrator,
}

impl AppServices {
    pub fn new(orchestrator: Orchestrator) -> Self {
        Self { orchestrator }
    }
}

/// Wire the pipeline, store and orchestrator from configuration.
pub fn build_services(config: &AppConfig) -> AppServices {
    if config.openai.is_none() {
        tracing::warn!("OPENAI_API_KEY not set; narratives will use the local template only");
    }

    let pipeline = Arc::new(config.pipeline());
    tracing::info!(
        tiers = ?pipeline.narrative().tier_names(),
        timeout_secs = config.orchestrator.job_timeout.as_secs(),
        stale_after_secs = config.orchestrator.stale_after.as_secs(),
        "insight pipeline ready"
    );

    AppServices::new(InsightOrchestrator::new(
        InMemoryJobStore::arc(),
        SystemClock,
        pipeline,
        config.orchestrator.clone(),
    ))
}
