//! Cross-metric relationships from call-center domain knowledge.

use serde::{Deserialize, Serialize};

use callsight_core::MetricId;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CorrelationStrength {
    Moderate,
    High,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CorrelationInsights {
    pub related_metrics: Vec<String>,
    pub insights: Vec<String>,
    pub strength: CorrelationStrength,
}

fn canonical(metric: &str) -> &str {
    match metric {
        "customer_satisfaction" => "satisfaction_score",
        other => other,
    }
}

fn related(metric: &str) -> &'static [&'static str] {
    match metric {
        "call_volume" => &["agent_availability", "service_level", "satisfaction_score"],
        "agent_availability" => &["satisfaction_score", "first_call_resolution"],
        "service_level" => &["satisfaction_score", "call_volume"],
        "satisfaction_score" => &["first_call_resolution", "avg_response_time"],
        "revenue_growth" => &["customer_retention", "satisfaction_score"],
        "cost_per_call" => &["agent_availability", "first_call_resolution"],
        _ => &[],
    }
}

fn insight(metric: &str, other: &str, current: Option<f64>) -> Option<String> {
    match (metric, other) {
        ("call_volume", "agent_availability") => current.map(|v| {
            let impact = (v * 0.1).abs();
            format!("Current call volume may impact agent availability by {impact:.1}%")
        }),
        ("satisfaction_score", "first_call_resolution") => {
            Some("Customer satisfaction strongly correlates with resolution rates".to_string())
        }
        ("revenue_growth", "customer_retention") => {
            Some("Revenue growth trends align with customer retention patterns".to_string())
        }
        _ => None,
    }
}

pub fn analyse(metric: &MetricId, current: Option<f64>) -> CorrelationInsights {
    let key = canonical(metric.as_str());
    let related = related(key);
    let insights: Vec<String> = related
        .iter()
        .filter_map(|other| insight(key, other, current))
        .collect();

    CorrelationInsights {
        related_metrics: related.iter().map(|s| s.to_string()).collect(),
        strength: if insights.len() > 2 {
            CorrelationStrength::High
        } else {
            CorrelationStrength::Moderate
        },
        insights,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn call_volume_relates_to_staffing() {
        let c = analyse(&MetricId::parse("call_volume").unwrap(), Some(2800.0));
        assert_eq!(c.related_metrics.len(), 3);
        assert_eq!(
            c.insights,
            vec!["Current call volume may impact agent availability by 280.0%"]
        );
        assert_eq!(c.strength, CorrelationStrength::Moderate);
    }

    #[test]
    fn satisfaction_alias_resolves() {
        let c = analyse(&MetricId::parse("customer_satisfaction").unwrap(), Some(4.2));
        assert!(c.related_metrics.contains(&"first_call_resolution".to_string()));
        assert_eq!(c.insights.len(), 1);
    }

    #[test]
    fn unknown_metric_has_no_relations() {
        let c = analyse(&MetricId::parse("widgets").unwrap(), Some(1.0));
        assert!(c.related_metrics.is_empty());
        assert!(c.insights.is_empty());
    }
}
