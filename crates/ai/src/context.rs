//! Enriched context: the per-job bundle passed between pipeline stages.
//!
//! Retrieval creates it, the analytics engine fills in `analytics`, the
//! narrative generator reads it. It is never persisted.

use std::collections::BTreeMap;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value as JsonValue;

use callsight_core::{MetricId, MetricValue};

use crate::analytics::Analytics;
use crate::result::AiError;
use crate::seasonal::SeasonalOutlook;

/// Caller-supplied context attached to a submission (free-form JSON object).
pub type ExtraContext = serde_json::Map<String, JsonValue>;

/// Upper bound on the historical series carried through the pipeline.
pub const MAX_HISTORY_POINTS: usize = 30;

/// Context bundle for one insight request.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EnrichedContext {
    pub metric_id: MetricId,
    pub current_value: MetricValue,
    pub unit: Option<String>,
    /// Baselines and benchmarks (e.g. `target`, `monthly_average`, `monthly_trend`).
    pub comparative_metrics: BTreeMap<String, MetricValue>,
    /// Oldest first. May contain placeholder text that analytics filter out.
    pub historical_trends: Vec<MetricValue>,
    pub relevant_patterns: Vec<String>,
    pub best_practices: Vec<String>,
    /// Extra-context keys the pipeline does not interpret; forwarded to the prompt.
    pub additional: BTreeMap<String, JsonValue>,
    /// When false the external language service is not consulted.
    pub ai_enabled: bool,
    pub retrieved_at: DateTime<Utc>,
    #[serde(default)]
    pub analytics: Analytics,
    /// Festival and quarterly outlook; revenue metrics only.
    #[serde(default)]
    pub seasonal: Option<SeasonalOutlook>,
}

impl EnrichedContext {
    pub fn new(metric_id: MetricId, current_value: MetricValue) -> Self {
        Self {
            metric_id,
            current_value,
            unit: None,
            comparative_metrics: BTreeMap::new(),
            historical_trends: Vec::new(),
            relevant_patterns: Vec::new(),
            best_practices: Vec::new(),
            additional: BTreeMap::new(),
            ai_enabled: true,
            retrieved_at: Utc::now(),
            analytics: Analytics::default(),
            seasonal: None,
        }
    }

    pub fn current(&self) -> Option<f64> {
        self.current_value.as_f64()
    }

    /// Numeric comparative metric, if present.
    pub fn comparative(&self, key: &str) -> Option<f64> {
        self.comparative_metrics.get(key).and_then(MetricValue::as_f64)
    }

    /// Historical series with placeholders and non-numeric entries dropped.
    pub fn numeric_history(&self) -> Vec<f64> {
        self.historical_trends
            .iter()
            .filter_map(MetricValue::as_f64)
            .collect()
    }

    pub(crate) fn set_history<I>(&mut self, points: I)
    where
        I: IntoIterator<Item = MetricValue>,
    {
        let mut points: Vec<MetricValue> = points.into_iter().collect();
        if points.len() > MAX_HISTORY_POINTS {
            points.drain(..points.len() - MAX_HISTORY_POINTS);
        }
        self.historical_trends = points;
    }

    /// Merge caller-supplied context over the retrieved defaults.
    ///
    /// Known keys must have the documented shape; anything else is kept verbatim
    /// in `additional`.
    pub fn apply_overrides(&mut self, extra: &ExtraContext) -> Result<(), AiError> {
        for (key, value) in extra {
            match key.as_str() {
                "historical_trends" => {
                    let points: Vec<MetricValue> = serde_json::from_value(value.clone())
                        .map_err(|_| {
                            AiError::InvalidInput(
                                "historical_trends must be an array of numbers or strings".to_string(),
                            )
                        })?;
                    self.set_history(points);
                }
                "comparative_metrics" => {
                    let metrics: BTreeMap<String, MetricValue> =
                        serde_json::from_value(value.clone()).map_err(|_| {
                            AiError::InvalidInput(
                                "comparative_metrics must be an object of numbers or strings"
                                    .to_string(),
                            )
                        })?;
                    self.comparative_metrics.extend(metrics);
                }
                "relevant_patterns" => {
                    self.relevant_patterns = string_list(key, value)?;
                }
                "best_practices" => {
                    self.best_practices = string_list(key, value)?;
                }
                "unit" => {
                    let unit = value.as_str().ok_or_else(|| {
                        AiError::InvalidInput("unit must be a string".to_string())
                    })?;
                    self.unit = Some(unit.to_string());
                }
                "ai_enabled" => {
                    self.ai_enabled = value.as_bool().ok_or_else(|| {
                        AiError::InvalidInput("ai_enabled must be a boolean".to_string())
                    })?;
                }
                _ => {
                    self.additional.insert(key.clone(), value.clone());
                }
            }
        }
        Ok(())
    }

    /// Stage-boundary check: every number in the bundle must be finite.
    pub fn validate(&self) -> Result<(), AiError> {
        let non_finite = |v: &MetricValue| matches!(v, MetricValue::Number(n) if !n.is_finite());

        if non_finite(&self.current_value) {
            return Err(AiError::InvalidInput("current value is not finite".to_string()));
        }
        if let Some((key, _)) = self.comparative_metrics.iter().find(|(_, v)| non_finite(v)) {
            return Err(AiError::InvalidInput(format!(
                "comparative metric {key} is not finite"
            )));
        }
        if self.historical_trends.iter().any(non_finite) {
            return Err(AiError::InvalidInput(
                "historical series contains a non-finite value".to_string(),
            ));
        }
        Ok(())
    }
}

fn string_list(key: &str, value: &JsonValue) -> Result<Vec<String>, AiError> {
    serde_json::from_value(value.clone())
        .map_err(|_| AiError::InvalidInput(format!("{key} must be an array of strings")))
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn ctx() -> EnrichedContext {
        EnrichedContext::new(MetricId::parse("call_volume").unwrap(), MetricValue::from(2800.0))
    }

    #[test]
    fn numeric_history_drops_placeholders() {
        let mut c = ctx();
        c.set_history(vec![
            MetricValue::from(1.0),
            MetricValue::from("n/a"),
            MetricValue::from("2.5"),
        ]);
        assert_eq!(c.numeric_history(), vec![1.0, 2.5]);
    }

    #[test]
    fn history_is_bounded() {
        let mut c = ctx();
        c.set_history((0..50).map(|i| MetricValue::from(i as f64)));
        assert_eq!(c.historical_trends.len(), MAX_HISTORY_POINTS);
        assert_eq!(c.historical_trends[0], MetricValue::from(20.0));
    }

    #[test]
    fn overrides_merge_known_keys_and_keep_unknown() {
        let mut c = ctx();
        c.comparative_metrics.insert("monthly_average".into(), MetricValue::from(2700.0));

        let extra = json!({
            "historical_trends": [1, 2, "3"],
            "comparative_metrics": {"target": 3000},
            "ai_enabled": false,
            "region": "north",
        });
        c.apply_overrides(extra.as_object().unwrap()).unwrap();

        assert_eq!(c.numeric_history(), vec![1.0, 2.0, 3.0]);
        assert_eq!(c.comparative("monthly_average"), Some(2700.0));
        assert_eq!(c.comparative("target"), Some(3000.0));
        assert!(!c.ai_enabled);
        assert_eq!(c.additional.get("region"), Some(&json!("north")));
    }

    #[test]
    fn malformed_known_key_is_invalid_input() {
        let mut c = ctx();
        let extra = json!({"historical_trends": {"not": "a list"}});
        let err = c.apply_overrides(extra.as_object().unwrap()).unwrap_err();
        assert!(matches!(err, AiError::InvalidInput(_)));
    }

    #[test]
    fn validate_rejects_non_finite_numbers() {
        let mut c = ctx();
        assert!(c.validate().is_ok());
        c.comparative_metrics.insert("target".into(), MetricValue::Number(f64::INFINITY));
        assert!(c.validate().is_err());
    }
}
