//! The narrative degradation chain.
//!
//! Tiers are tried in order; the first to return a report wins. When every
//! tier fails the generator falls back to [`Report::error`], so `generate`
//! never fails.

use std::sync::Arc;

use async_trait::async_trait;
use tracing::{debug, info, warn};

use crate::context::EnrichedContext;
use crate::result::AiError;

use super::model::{GenerationError, LanguageModel};
use super::prompt::build_prompt;
use super::report::Report;
use super::template;

/// One strategy for producing a narrative.
#[async_trait]
pub trait NarrativeTier: Send + Sync {
    fn name(&self) -> &'static str;

    async fn produce(&self, ctx: &EnrichedContext) -> Result<Report, AiError>;
}

/// External language model tier.
pub struct PrimaryTier {
    model: Arc<dyn LanguageModel>,
}

impl PrimaryTier {
    pub fn new(model: Arc<dyn LanguageModel>) -> Self {
        Self { model }
    }
}

#[async_trait]
impl NarrativeTier for PrimaryTier {
    fn name(&self) -> &'static str {
        "primary"
    }

    async fn produce(&self, ctx: &EnrichedContext) -> Result<Report, AiError> {
        if !ctx.ai_enabled {
            return Err(GenerationError::Disabled.into());
        }

        let prompt = build_prompt(ctx);
        debug!(
            metric = %ctx.metric_id,
            model = self.model.name(),
            prompt_chars = prompt.len(),
            "requesting narrative from language model"
        );

        let text = self.model.generate(&prompt).await?;
        if text.trim().is_empty() {
            return Err(GenerationError::EmptyResponse.into());
        }

        Ok(Report::primary(&ctx.metric_id, &ctx.current_value, text))
    }
}

/// Deterministic template tier. Fails only on a malformed context.
#[derive(Debug, Clone, Default)]
pub struct LocalTemplateTier;

#[async_trait]
impl NarrativeTier for LocalTemplateTier {
    fn name(&self) -> &'static str {
        "local"
    }

    async fn produce(&self, ctx: &EnrichedContext) -> Result<Report, AiError> {
        ctx.validate()?;
        Ok(Report::local(
            &ctx.metric_id,
            &ctx.current_value,
            template::render(ctx),
        ))
    }
}

/// Ordered list of narrative tiers.
pub struct NarrativeGenerator {
    tiers: Vec<Box<dyn NarrativeTier>>,
}

impl NarrativeGenerator {
    pub fn from_tiers(tiers: Vec<Box<dyn NarrativeTier>>) -> Self {
        Self { tiers }
    }

    /// Local template only; used when no language model is configured.
    pub fn local_only() -> Self {
        Self::from_tiers(vec![Box::new(LocalTemplateTier)])
    }

    /// Language model first, local template second.
    pub fn with_model(model: Arc<dyn LanguageModel>) -> Self {
        Self::from_tiers(vec![
            Box::new(PrimaryTier::new(model)),
            Box::new(LocalTemplateTier),
        ])
    }

    pub fn tier_names(&self) -> Vec<&'static str> {
        self.tiers.iter().map(|t| t.name()).collect()
    }

    pub async fn generate(&self, ctx: &EnrichedContext) -> Report {
        let mut last_error: Option<AiError> = None;

        for tier in &self.tiers {
            match tier.produce(ctx).await {
                Ok(report) => {
                    info!(
                        metric = %ctx.metric_id,
                        tier = tier.name(),
                        source = report.source.as_str(),
                        "narrative produced"
                    );
                    return report;
                }
                Err(AiError::Generation(GenerationError::Disabled)) => {
                    debug!(metric = %ctx.metric_id, tier = tier.name(), "tier disabled for request");
                }
                Err(e) => {
                    warn!(metric = %ctx.metric_id, tier = tier.name(), error = %e, "narrative tier failed");
                    last_error = Some(e);
                }
            }
        }

        let message = last_error
            .map(|e| e.to_string())
            .unwrap_or_else(|| "no narrative tier available".to_string());
        Report::error(&ctx.metric_id, &message)
    }
}

impl Default for NarrativeGenerator {
    fn default() -> Self {
        Self::local_only()
    }
}

impl std::fmt::Debug for NarrativeGenerator {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("NarrativeGenerator")
            .field("tiers", &self.tier_names())
            .finish()
    }
}
