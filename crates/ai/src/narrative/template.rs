//! Deterministic markdown narrative built from the enriched context alone.

use crate::analytics::Analytics;
use crate::context::EnrichedContext;

enum Threshold {
    High(f64),
    Low(f64),
}

fn risk_threshold(metric: &str) -> Option<Threshold> {
    match metric {
        "call_volume" => Some(Threshold::High(3000.0)),
        "customer_satisfaction" => Some(Threshold::Low(3.5)),
        "sla_monitoring" => Some(Threshold::Low(85.0)),
        "agent_performance" => Some(Threshold::Low(75.0)),
        "queue_status" => Some(Threshold::High(50.0)),
        _ => None,
    }
}

pub fn status_line(ctx: &EnrichedContext) -> String {
    let display = ctx.metric_id.display_name();
    let current = &ctx.current_value;

    if ctx.comparative_metrics.is_empty() {
        return format!("Current {display}: {current} (baseline assessment)");
    }

    let reference = ctx
        .comparative("monthly_average")
        .map(|v| (v, "average"))
        .or_else(|| ctx.comparative("target").map(|v| (v, "target")));

    match (ctx.current(), reference) {
        (Some(c), Some((avg, label))) => {
            if c > avg * 1.1 {
                format!("Above average performance: {current} vs {avg:.1} {label}")
            } else if c < avg * 0.9 {
                format!("Below average performance: {current} vs {avg:.1} {label}")
            } else {
                format!("Normal performance: {current} near {avg:.1} {label}")
            }
        }
        _ => format!("Current {display}: {current}"),
    }
}

pub fn trend_line(history: &[f64]) -> String {
    if history.len() < 2 {
        return "Insufficient data for trend analysis".to_string();
    }
    let recent = &history[history.len().saturating_sub(3)..];
    let first = recent[0];
    let last = recent[recent.len() - 1];

    let label = if last > first * 1.05 {
        "Upward"
    } else if last < first * 0.95 {
        "Downward"
    } else {
        "Stable"
    };
    format!("{label} trend: {first:.1} → {last:.1}")
}

pub fn risk_line(ctx: &EnrichedContext) -> String {
    let Some(threshold) = risk_threshold(ctx.metric_id.as_str()) else {
        return "Standard monitoring recommended".to_string();
    };
    let current = &ctx.current_value;

    match (ctx.current(), threshold) {
        (Some(c), Threshold::High(limit)) if c > limit => {
            format!("High risk: {current} exceeds normal range")
        }
        (Some(c), Threshold::Low(limit)) if c < limit => {
            format!("Performance risk: {current} below acceptable threshold")
        }
        _ => "Normal risk level - continue monitoring".to_string(),
    }
}

pub fn recommendations(practices: &[String]) -> Vec<String> {
    if practices.is_empty() {
        return vec!["1. **Monitor**: Continue standard monitoring procedures".to_string()];
    }
    practices
        .iter()
        .take(3)
        .enumerate()
        .map(|(i, practice)| {
            let head = match practice.split_once('.') {
                Some((head, _)) => head,
                None => "Action",
            };
            format!("{}. **{head}**: {practice}", i + 1)
        })
        .collect()
}

pub fn prediction_line(ctx: &EnrichedContext) -> String {
    match &ctx.analytics.predictions.short_term {
        Some(p) => {
            let unit = ctx
                .unit
                .as_deref()
                .map(|u| format!(" {u}"))
                .unwrap_or_default();
            let basis = p.factors.first().map(String::as_str).unwrap_or("historical patterns");
            format!(
                "**{} confidence** - projected {:.2}{unit} over the next {} (based on {basis})",
                capitalize(p.confidence.as_str()),
                p.predicted_value,
                p.timeframe,
            )
        }
        None => "**Based on historical patterns** - Standard operational patterns expected".to_string(),
    }
}

fn analytics_lines(a: &Analytics) -> Vec<String> {
    let mut lines = Vec::new();

    if let Some(anomaly) = &a.anomaly {
        match (anomaly.z_score(), anomaly.severity()) {
            (Some(z), Some(severity)) if anomaly.anomaly_detected() => lines.push(format!(
                "- **Anomaly**: {} deviation from baseline (z-score {z:.2})",
                severity.as_str()
            )),
            (Some(z), _) => lines.push(format!(
                "- **Anomaly**: none detected (z-score {z:.2})"
            )),
            _ => lines.push(format!(
                "- **Anomaly**: none detected ({})",
                anomaly.reason().unwrap_or("no score")
            )),
        }
    }

    if let Some(t) = &a.trend {
        lines.push(format!(
            "- **Trend**: {} {} over the last {} points",
            t.strength.as_str(),
            t.direction.as_str(),
            t.window
        ));
    }

    if let Some(m) = &a.predictions.medium_term {
        lines.push(format!(
            "- **{} outlook**: {:.2} ({} confidence)",
            m.timeframe,
            m.predicted_value,
            m.confidence.as_str()
        ));
    }

    if let Some(i) = &a.impact {
        lines.push(format!(
            "- **Business impact**: {:.0}/100 ({} criticality)",
            i.impact_score,
            i.criticality.as_str()
        ));
        lines.push(format!(
            "- **Financial impact**: {}",
            i.financial.estimated_impact
        ));
        if !i.stakeholder_alerts.is_empty() {
            lines.push(format!(
                "- **Notify**: {}",
                i.stakeholder_alerts.join(", ")
            ));
        }
    }

    if let Some(c) = &a.correlations {
        for insight in &c.insights {
            lines.push(format!("- **Correlation**: {insight}"));
        }
    }

    lines
}

/// Render the local report body.
pub fn render(ctx: &EnrichedContext) -> String {
    let display = ctx.metric_id.display_name();
    let history = ctx.numeric_history();
    let mut out = Vec::<String>::new();

    out.push(format!("# {display} Analysis - {}", ctx.current_value));
    out.push(String::new());
    out.push("## Current Status".into());
    out.push(status_line(ctx));
    out.push(String::new());
    out.push("## Trend Analysis".into());
    out.push(trend_line(&history));

    if !ctx.relevant_patterns.is_empty() {
        out.push(String::new());
        out.push("**Key Patterns Observed:**".into());
        out.extend(ctx.relevant_patterns.iter().take(3).map(|p| format!("- {p}")));
    }

    let analytics = analytics_lines(&ctx.analytics);
    if !analytics.is_empty() {
        out.push(String::new());
        out.push("## Statistical Analysis".into());
        out.extend(analytics);
    }

    out.push(String::new());
    out.push("## Recommendations".into());
    out.extend(recommendations(&ctx.best_practices));
    out.push(String::new());
    out.push("## Predictions (Next 2-4 Hours)".into());
    out.push(prediction_line(ctx));
    if let Some(event) = ctx.seasonal.as_ref().and_then(|s| s.next_major_event.as_ref()) {
        out.push(format!(
            "- **Seasonal**: {} on {} ({:.0}% typical uplift)",
            event.name,
            event.date.format("%Y-%m-%d"),
            event.uplift_percent
        ));
    }
    out.push(String::new());
    out.push("## Risk Assessment".into());
    out.push(risk_line(ctx));
    out.push(String::new());
    out.push("---".into());
    out.push("*Analysis generated using historical data and statistical analytics*".into());

    let mut body = out.join("\n");
    body.push('\n');
    body
}

fn capitalize(s: &str) -> String {
    let mut chars = s.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().collect::<String>() + chars.as_str(),
        None => String::new(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::analytics::AnalyticsEngine;
    use callsight_core::{MetricId, MetricValue};

    fn ctx(metric: &str, current: MetricValue) -> EnrichedContext {
        EnrichedContext::new(MetricId::parse(metric).unwrap(), current)
    }

    #[test]
    fn status_compares_against_monthly_average() {
        let mut c = ctx("call_volume", MetricValue::from(3400.0));
        c.comparative_metrics
            .insert("monthly_average".into(), MetricValue::from(2800.0));
        assert_eq!(
            status_line(&c),
            "Above average performance: 3400 vs 2800.0 average"
        );

        c.current_value = MetricValue::from(2000.0);
        assert!(status_line(&c).starts_with("Below average performance"));

        c.current_value = MetricValue::from(2850.0);
        assert!(status_line(&c).starts_with("Normal performance"));
    }

    #[test]
    fn status_falls_back_to_target_then_baseline() {
        let mut c = ctx("profit_margin", MetricValue::from(18.3));
        assert_eq!(
            status_line(&c),
            "Current Profit Margin: 18.3 (baseline assessment)"
        );

        c.comparative_metrics
            .insert("target".into(), MetricValue::from(20.0));
        assert_eq!(status_line(&c), "Normal performance: 18.3 near 20.0 target");
    }

    #[test]
    fn trend_uses_last_three_points() {
        assert_eq!(trend_line(&[1.0]), "Insufficient data for trend analysis");
        assert_eq!(trend_line(&[100.0, 1.0, 2.0, 3.0]), "Upward trend: 1.0 → 3.0");
        assert_eq!(trend_line(&[3.0, 2.0, 1.0]), "Downward trend: 3.0 → 1.0");
        assert_eq!(trend_line(&[4.2, 4.2, 4.2]), "Stable trend: 4.2 → 4.2");
    }

    #[test]
    fn risk_thresholds() {
        assert!(risk_line(&ctx("call_volume", MetricValue::from(3200.0))).starts_with("High risk"));
        assert!(
            risk_line(&ctx("customer_satisfaction", MetricValue::from(3.1)))
                .starts_with("Performance risk")
        );
        assert_eq!(
            risk_line(&ctx("queue_status", MetricValue::from(30.0))),
            "Normal risk level - continue monitoring"
        );
        assert_eq!(
            risk_line(&ctx("revenue_growth", MetricValue::from(1.0))),
            "Standard monitoring recommended"
        );
    }

    #[test]
    fn recommendations_take_first_three() {
        let practices: Vec<String> = [
            "Add agents. Then review.",
            "Monitor queue",
            "Offer callbacks",
            "Ignored",
        ]
        .iter()
        .map(|s| s.to_string())
        .collect();
        let r = recommendations(&practices);
        assert_eq!(r.len(), 3);
        assert_eq!(r[0], "1. **Add agents**: Add agents. Then review.");
        assert_eq!(r[1], "2. **Action**: Monitor queue");
        assert_eq!(
            recommendations(&[]),
            vec!["1. **Monitor**: Continue standard monitoring procedures"]
        );
    }

    #[test]
    fn render_includes_every_section() {
        let mut c = ctx("call_volume", MetricValue::from(12.5));
        c.set_history([8.1, 9.3, 10.2, 11.8, 12.5].map(MetricValue::from));
        let c = AnalyticsEngine::new().enrich(c);
        let body = render(&c);

        for section in [
            "# Call Volume Analysis - 12.5",
            "## Current Status",
            "## Trend Analysis",
            "## Statistical Analysis",
            "## Recommendations",
            "## Predictions (Next 2-4 Hours)",
            "## Risk Assessment",
        ] {
            assert!(body.contains(section), "missing {section}");
        }
        assert!(body.contains("projected 13.1"));
    }

    #[test]
    fn render_mentions_next_seasonal_event() {
        let c = crate::knowledge::ContextRetriever::new()
            .with_today(chrono::NaiveDate::from_ymd_opt(2025, 11, 15).unwrap())
            .retrieve(
                &MetricId::parse("revenue_growth").unwrap(),
                &MetricValue::from(12.5),
                &crate::context::ExtraContext::new(),
            )
            .unwrap();
        let body = render(&c);
        assert!(body.contains("- **Seasonal**: Year End Sales on 2025-12-01 (25% typical uplift)"));

        assert!(!render(&ctx("call_volume", MetricValue::from(1.0))).contains("**Seasonal**"));
    }
}
