//! Statistical analytics over an enriched context.
//!
//! Every analytic is computed independently. One that cannot run (too little
//! history, a non-numeric reading) is left out and recorded in
//! [`Analytics::skipped`]; the rest still run.

pub mod anomaly;
pub mod correlation;
pub mod impact;
pub mod trend;

mod stats;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::context::EnrichedContext;

pub use anomaly::{AnomalyAnalysis, AnomalyScore, DeviationDirection, Severity};
pub use correlation::{CorrelationInsights, CorrelationStrength};
pub use impact::{BusinessImpact, Criticality, FinancialImpact};
pub use trend::{Confidence, Projection, TrendAnalysis, TrendDirection, TrendStrength};

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum AnalyticsError {
    #[error("insufficient data: need at least {required} numeric points, have {available}")]
    InsufficientData { required: usize, available: usize },

    #[error("current value is not numeric")]
    NonNumericValue,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AnalyticKind {
    Anomaly,
    Trend,
    ShortTermProjection,
    MediumTermProjection,
}

impl AnalyticKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            AnalyticKind::Anomaly => "anomaly",
            AnalyticKind::Trend => "trend",
            AnalyticKind::ShortTermProjection => "short_term_projection",
            AnalyticKind::MediumTermProjection => "medium_term_projection",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SkippedAnalytic {
    pub analytic: AnalyticKind,
    pub reason: String,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Predictions {
    pub short_term: Option<Projection>,
    pub medium_term: Option<Projection>,
}

impl Predictions {
    pub fn is_empty(&self) -> bool {
        self.short_term.is_none() && self.medium_term.is_none()
    }
}

/// Analytics attached to a context. All fields are optional.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Analytics {
    pub correlations: Option<CorrelationInsights>,
    pub anomaly: Option<AnomalyAnalysis>,
    pub trend: Option<TrendAnalysis>,
    #[serde(default)]
    pub predictions: Predictions,
    pub impact: Option<BusinessImpact>,
    #[serde(default)]
    pub skipped: Vec<SkippedAnalytic>,
}

impl Analytics {
    pub fn is_empty(&self) -> bool {
        self.correlations.is_none()
            && self.anomaly.is_none()
            && self.trend.is_none()
            && self.predictions.is_empty()
            && self.impact.is_none()
    }

    fn skip(&mut self, analytic: AnalyticKind, err: AnalyticsError) {
        tracing::debug!(analytic = analytic.as_str(), reason = %err, "analytic skipped");
        self.skipped.push(SkippedAnalytic {
            analytic,
            reason: err.to_string(),
        });
    }
}

/// Deterministic analytics stage of the insight pipeline.
#[derive(Debug, Clone)]
pub struct AnalyticsEngine {
    z_threshold: f64,
    trend_window: usize,
}

impl Default for AnalyticsEngine {
    fn default() -> Self {
        Self::new()
    }
}

impl AnalyticsEngine {
    pub fn new() -> Self {
        Self {
            z_threshold: anomaly::DEFAULT_Z_THRESHOLD,
            trend_window: trend::DEFAULT_TREND_WINDOW,
        }
    }

    pub fn with_z_threshold(mut self, z_threshold: f64) -> Self {
        self.z_threshold = z_threshold;
        self
    }

    pub fn with_trend_window(mut self, window: usize) -> Self {
        self.trend_window = window;
        self
    }

    /// Compute analytics for `ctx` without touching it.
    pub fn compute(&self, ctx: &EnrichedContext) -> Analytics {
        let current = ctx.current();
        let history = ctx.numeric_history();
        let mut out = Analytics {
            correlations: Some(correlation::analyse(&ctx.metric_id, current)),
            ..Analytics::default()
        };

        match anomaly::detect(current, &history, self.z_threshold) {
            Ok(a) => out.anomaly = Some(a),
            Err(e) => out.skip(AnalyticKind::Anomaly, e),
        }

        match trend::analyse(&history, self.trend_window) {
            Ok(t) => {
                out.predictions.short_term = Some(trend::project_short_term(&t));
                out.trend = Some(t);
            }
            Err(e) => {
                out.skip(AnalyticKind::Trend, e.clone());
                out.skip(AnalyticKind::ShortTermProjection, e);
            }
        }

        match trend::project_medium_term(&history) {
            Ok(p) => out.predictions.medium_term = Some(p),
            Err(e) => out.skip(AnalyticKind::MediumTermProjection, e),
        }

        out.impact = Some(impact::assess(
            &ctx.metric_id,
            current,
            ctx.comparative("target"),
        ));

        out
    }

    /// Attach analytics to the context and hand it back.
    pub fn enrich(&self, mut ctx: EnrichedContext) -> EnrichedContext {
        ctx.analytics = self.compute(&ctx);
        ctx
    }
}
