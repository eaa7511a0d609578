//! Strongly-typed metric identifiers.

use core::str::FromStr;
use serde::{Deserialize, Serialize};

use crate::error::{DomainError, DomainResult};

/// Maximum accepted identifier length.
pub const MAX_METRIC_ID_LEN: usize = 64;

/// Identifier of a KPI (e.g. `revenue_growth`, `call_volume`).
///
/// Always trimmed and lower-case, restricted to `[a-z0-9_-]`.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct MetricId(String);

impl MetricId {
    pub fn parse(raw: &str) -> DomainResult<Self> {
        let normalized = raw.trim().to_ascii_lowercase();

        if normalized.is_empty() {
            return Err(DomainError::invalid_id("MetricId: must not be empty"));
        }
        if normalized.len() > MAX_METRIC_ID_LEN {
            return Err(DomainError::invalid_id(format!(
                "MetricId: longer than {MAX_METRIC_ID_LEN} characters"
            )));
        }
        if let Some(bad) = normalized
            .chars()
            .find(|c| !(c.is_ascii_alphanumeric() || *c == '_' || *c == '-'))
        {
            return Err(DomainError::invalid_id(format!(
                "MetricId: unsupported character {bad:?}"
            )));
        }

        Ok(Self(normalized))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Human-readable name: `revenue_growth` -> `Revenue Growth`.
    pub fn display_name(&self) -> String {
        self.0
            .split(['_', '-'])
            .filter(|w| !w.is_empty())
            .map(|w| {
                let mut chars = w.chars();
                match chars.next() {
                    Some(first) => first.to_ascii_uppercase().to_string() + chars.as_str(),
                    None => String::new(),
                }
            })
            .collect::<Vec<_>>()
            .join(" ")
    }
}

impl core::fmt::Display for MetricId {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.write_str(&self.0)
    }
}

impl FromStr for MetricId {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

impl TryFrom<String> for MetricId {
    type Error = DomainError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::parse(&value)
    }
}

impl From<MetricId> for String {
    fn from(value: MetricId) -> Self {
        value.0
    }
}
