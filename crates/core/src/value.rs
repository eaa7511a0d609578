//! Observed metric values.

use serde::{Deserialize, Serialize};

use crate::value_object::ValueObject;

/// A KPI observation as supplied by callers: a number, or free text such as
/// `"4.2"`, `"RM 2.60"` or the placeholder `"current"`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum MetricValue {
    Number(f64),
    Text(String),
}

impl ValueObject for MetricValue {}

impl MetricValue {
    /// Numeric reading of the value, if there is one.
    ///
    /// Numeric strings are parsed; placeholders and non-finite numbers yield `None`.
    pub fn as_f64(&self) -> Option<f64> {
        let v = match self {
            MetricValue::Number(n) => *n,
            MetricValue::Text(s) => s.trim().parse::<f64>().ok()?,
        };
        v.is_finite().then_some(v)
    }

    pub fn is_numeric(&self) -> bool {
        self.as_f64().is_some()
    }
}

impl From<f64> for MetricValue {
    fn from(value: f64) -> Self {
        MetricValue::Number(value)
    }
}

impl From<&str> for MetricValue {
    fn from(value: &str) -> Self {
        MetricValue::Text(value.to_string())
    }
}

impl From<String> for MetricValue {
    fn from(value: String) -> Self {
        MetricValue::Text(value)
    }
}

impl core::fmt::Display for MetricValue {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        match self {
            MetricValue::Number(n) => write!(f, "{n}"),
            MetricValue::Text(s) => f.write_str(s),
        }
    }
}
