use std::sync::Arc;

use callsight_core::{MetricId, MetricValue};
use tracing::debug;

use crate::analytics::AnalyticsEngine;
use crate::context::ExtraContext;
use crate::knowledge::ContextRetriever;
use crate::narrative::{LanguageModel, NarrativeGenerator, Report};
use crate::result::AiError;

/// Inputs of one insight job.
#[derive(Debug, Clone, PartialEq)]
pub struct InsightRequest {
    pub metric_id: MetricId,
    pub current_value: MetricValue,
    pub extra_context: ExtraContext,
}

impl InsightRequest {
    pub fn new(metric_id: MetricId, current_value: MetricValue) -> Self {
        Self {
            metric_id,
            current_value,
            extra_context: ExtraContext::new(),
        }
    }

    pub fn with_extra_context(mut self, extra: ExtraContext) -> Self {
        self.extra_context = extra;
        self
    }
}

/// Retrieval, analytics and narration for a single request.
#[derive(Debug, Default)]
pub struct InsightPipeline {
    retriever: ContextRetriever,
    analytics: AnalyticsEngine,
    narrative: NarrativeGenerator,
}

impl InsightPipeline {
    pub fn new(
        retriever: ContextRetriever,
        analytics: AnalyticsEngine,
        narrative: NarrativeGenerator,
    ) -> Self {
        Self {
            retriever,
            analytics,
            narrative,
        }
    }

    /// Pipeline with the language model as primary tier, or local-only when `None`.
    pub fn with_model(model: Option<Arc<dyn LanguageModel>>) -> Self {
        let narrative = match model {
            Some(model) => NarrativeGenerator::with_model(model),
            None => NarrativeGenerator::local_only(),
        };
        Self::new(ContextRetriever::new(), AnalyticsEngine::new(), narrative)
    }

    pub fn narrative(&self) -> &NarrativeGenerator {
        &self.narrative
    }

    /// Only retrieval can fail; once a context exists a report is always produced.
    pub async fn run(&self, request: &InsightRequest) -> Result<Report, AiError> {
        let ctx = self.retriever.retrieve(
            &request.metric_id,
            &request.current_value,
            &request.extra_context,
        )?;
        debug!(
            metric = %request.metric_id,
            history_points = ctx.historical_trends.len(),
            comparatives = ctx.comparative_metrics.len(),
            "context retrieved"
        );

        let ctx = self.analytics.enrich(ctx);
        debug!(
            metric = %request.metric_id,
            skipped = ctx.analytics.skipped.len(),
            "analytics computed"
        );

        Ok(self.narrative.generate(&ctx).await)
    }
}
