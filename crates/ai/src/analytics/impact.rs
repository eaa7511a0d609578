//! Business impact scoring and the rough financial estimate attached to it.

use serde::{Deserialize, Serialize};

use callsight_core::MetricId;

use super::trend::Confidence;

pub const NEUTRAL_IMPACT: f64 = 50.0;

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Criticality {
    Low,
    Moderate,
    High,
    Critical,
}

impl Criticality {
    pub fn from_score(score: f64) -> Self {
        if score > 80.0 {
            Criticality::Critical
        } else if score > 60.0 {
            Criticality::High
        } else if score > 40.0 {
            Criticality::Moderate
        } else {
            Criticality::Low
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Criticality::Low => "low",
            Criticality::Moderate => "moderate",
            Criticality::High => "high",
            Criticality::Critical => "critical",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FinancialImpact {
    pub estimated_impact: String,
    pub confidence: Confidence,
    pub timeframe: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BusinessImpact {
    /// 0..=100.
    pub impact_score: f64,
    pub criticality: Criticality,
    pub stakeholder_alerts: Vec<String>,
    pub financial: FinancialImpact,
}

/// Deviation from target (percent) above which a metric counts as high impact.
pub fn high_impact_threshold(metric: &MetricId) -> f64 {
    match metric.as_str() {
        "call_volume" => 20.0,
        "customer_satisfaction" | "satisfaction_score" => 10.0,
        "revenue_growth" => 15.0,
        _ => 15.0,
    }
}

pub fn impact_score(metric: &MetricId, current: Option<f64>, target: Option<f64>) -> f64 {
    let Some(current) = current else {
        return NEUTRAL_IMPACT;
    };

    let mut score = NEUTRAL_IMPACT;
    if let Some(target) = target.filter(|t| *t > 0.0) {
        let deviation = ((current - target) / target).abs() * 100.0;
        if deviation > high_impact_threshold(metric) {
            score += 30.0;
        } else if deviation > 10.0 {
            score += 15.0;
        } else if deviation < 5.0 {
            score -= 10.0;
        }
    }
    score.clamp(0.0, 100.0)
}

pub fn stakeholder_alerts(score: f64) -> Vec<String> {
    let names: &[&str] = if score > 80.0 {
        &["Executive Team", "Operations Manager", "Department Heads"]
    } else if score > 60.0 {
        &["Operations Manager", "Team Leads"]
    } else if score > 40.0 {
        &["Team Leads", "Supervisors"]
    } else {
        &[]
    };
    names.iter().map(|s| s.to_string()).collect()
}

pub fn estimate_financial(
    metric: &MetricId,
    current: Option<f64>,
    target: Option<f64>,
) -> FinancialImpact {
    match metric.as_str() {
        "revenue_growth" => match current {
            Some(current) => {
                let deviation = current - target.unwrap_or(current);
                let side = if deviation > 0.0 { "above" } else { "below" };
                FinancialImpact {
                    estimated_impact: format!(
                        "${} {side} target",
                        group_thousands((deviation * 10_000.0).abs().round() as u64)
                    ),
                    confidence: Confidence::High,
                    timeframe: Some("monthly".to_string()),
                }
            }
            None => not_quantifiable(),
        },
        "call_volume" | "satisfaction_score" | "customer_satisfaction" | "first_call_resolution" => {
            FinancialImpact {
                estimated_impact: "Moderate financial impact expected".to_string(),
                confidence: Confidence::Moderate,
                timeframe: Some("quarterly".to_string()),
            }
        }
        _ => not_quantifiable(),
    }
}

pub fn assess(metric: &MetricId, current: Option<f64>, target: Option<f64>) -> BusinessImpact {
    let score = impact_score(metric, current, target);
    BusinessImpact {
        impact_score: score,
        criticality: Criticality::from_score(score),
        stakeholder_alerts: stakeholder_alerts(score),
        financial: estimate_financial(metric, current, target),
    }
}

fn not_quantifiable() -> FinancialImpact {
    FinancialImpact {
        estimated_impact: "Not quantifiable".to_string(),
        confidence: Confidence::Low,
        timeframe: None,
    }
}

fn group_thousands(n: u64) -> String {
    let digits = n.to_string();
    let mut out = String::with_capacity(digits.len() + digits.len() / 3);
    for (i, ch) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            out.push(',');
        }
        out.push(ch);
    }
    out
}
