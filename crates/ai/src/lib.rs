//! `callsight-ai`
//!
//! **Responsibility:** the insight pipeline for a single KPI observation.
//!
//! - Context retrieval from a static knowledge base (`knowledge`).
//! - Deterministic statistics over the retrieved history (`analytics`).
//! - Malaysian festival and quarterly calendar for revenue metrics (`seasonal`).
//! - Narrative generation through an ordered chain of tiers (`narrative`).
//!
//! Nothing here knows about jobs, polling or HTTP. The only suspension point
//! is the [`LanguageModel`] seam used by the primary narrative tier.

pub mod analytics;
pub mod context;
pub mod knowledge;
pub mod narrative;
pub mod pipeline;
pub mod result;
pub mod seasonal;

pub use analytics::{Analytics, AnalyticsEngine, AnalyticsError};
pub use context::{EnrichedContext, ExtraContext};
pub use knowledge::ContextRetriever;
pub use narrative::{
    GenerationError, LanguageModel, NarrativeGenerator, NarrativeTier, Report, ReportSource,
};
pub use pipeline::{InsightPipeline, InsightRequest};
pub use result::AiError;
pub use seasonal::{SeasonalCalendar, SeasonalOutlook};
