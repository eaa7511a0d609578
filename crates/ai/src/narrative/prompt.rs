//! Prompt construction for the primary tier.

use crate::analytics::Analytics;
use crate::context::EnrichedContext;
use crate::seasonal::SeasonalOutlook;

/// System message sent alongside every prompt.
pub const SYSTEM_PROMPT: &str = "You are an expert call center analytics AI that provides \
actionable insights based on data analysis. Always be specific, concise, and focus on \
actionable recommendations.";

/// History points quoted in the prompt.
pub const PROMPT_HISTORY_POINTS: usize = 10;

/// Catalysts quoted in the seasonal section.
const PROMPT_CATALYSTS: usize = 3;

pub fn build_prompt(ctx: &EnrichedContext) -> String {
    let display = ctx.metric_id.display_name();
    let mut out: Vec<String> = Vec::new();

    out.push("You are a senior call center analytics consultant.".into());
    out.push(String::new());
    out.push("CURRENT SITUATION:".into());
    out.push(format!("- KPI: {display}"));
    out.push(match &ctx.unit {
        Some(unit) => format!("- Current Value: {} ({unit})", ctx.current_value),
        None => format!("- Current Value: {}", ctx.current_value),
    });
    out.push(format!(
        "- Analysis Timestamp: {}",
        ctx.retrieved_at.format("%Y-%m-%d %H:%M:%S UTC")
    ));
    out.push(String::new());

    out.push("COMPARATIVE METRICS:".into());
    if ctx.comparative_metrics.is_empty() {
        out.push("No comparative benchmarks available".into());
    } else {
        out.extend(ctx.comparative_metrics.iter().map(|(k, v)| format!("- {k}: {v}")));
    }
    out.push(String::new());

    let start = ctx
        .historical_trends
        .len()
        .saturating_sub(PROMPT_HISTORY_POINTS);
    let recent: Vec<String> = ctx.historical_trends[start..]
        .iter()
        .map(|v| v.to_string())
        .collect();
    out.push("HISTORICAL CONTEXT:".into());
    out.push(format!("Recent Trend Data: [{}]", recent.join(", ")));
    out.push(String::new());

    bullet_section(
        &mut out,
        "PATTERN RECOGNITION:",
        &ctx.relevant_patterns,
        "No significant patterns detected",
    );
    bullet_section(
        &mut out,
        "OPERATIONAL BEST PRACTICES:",
        &ctx.best_practices,
        "Industry standard practices apply",
    );

    if let Some(seasonal) = &ctx.seasonal {
        out.extend(seasonal_lines(seasonal));
        out.push(String::new());
    }

    if !ctx.analytics.is_empty() {
        out.extend(analytics_lines(&ctx.analytics));
        out.push(String::new());
    }

    if !ctx.additional.is_empty() {
        out.push("ADDITIONAL CONTEXT:".into());
        out.extend(ctx.additional.iter().map(|(k, v)| format!("- {k}: {v}")));
        out.push(String::new());
    }

    out.push(format!(
        "Provide a markdown report titled \"{display} Intelligence Report - {}\" with these sections:",
        ctx.current_value
    ));
    out.push("1. CURRENT STATUS: brief assessment against targets and benchmarks".into());
    out.push("2. TREND ANALYSIS: what the historical values indicate, with the arithmetic".into());
    out.push(
        "3. RECOMMENDATIONS: 2-3 specific actions with owner, timeline and success metric".into(),
    );
    out.push("4. PREDICTIONS: next 2-4 hours and next 24 hours".into());
    out.push("5. RISK ASSESSMENT: potential issues and who must be alerted".into());
    if ctx.seasonal.is_some() {
        out.push("Factor the seasonal catalysts into the predictions.".into());
    }
    out.push(String::new());
    out.push(
        "Use the exact numbers provided. If the data is insufficient, state what additional data is needed."
            .into(),
    );

    out.join("\n")
}

fn bullet_section(out: &mut Vec<String>, heading: &str, items: &[String], empty: &str) {
    out.push(heading.to_string());
    if items.is_empty() {
        out.push(empty.to_string());
    } else {
        out.extend(items.iter().map(|item| format!("- {item}")));
    }
    out.push(String::new());
}

fn seasonal_lines(s: &SeasonalOutlook) -> Vec<String> {
    let mut lines = vec!["MALAYSIAN SEASONAL INTELLIGENCE:".to_string()];

    match &s.next_major_event {
        Some(e) => {
            lines.push(format!(
                "- Next Major Event: {} ({}, {} impact)",
                e.name,
                e.date.format("%Y-%m-%d"),
                e.impact.as_str()
            ));
            lines.push(format!("- Predicted Uplift: {:.0}%", e.uplift_percent));
        }
        None => lines.push("- Next Major Event: none in the next 30 days".into()),
    }

    let q = &s.quarterly_trend;
    lines.push(format!(
        "- Quarterly Trend: {} (average effect x{:.2}; drivers: {})",
        q.description,
        q.average_multiplier,
        q.drivers.join(", ")
    ));

    for c in s.catalysts.iter().take(PROMPT_CATALYSTS) {
        lines.push(format!(
            "- {} ({} days): {:.0}% expected uplift, projected {}",
            c.event, c.days_until, c.uplift_percent, c.predicted_value
        ));
    }
    lines
}

fn analytics_lines(a: &Analytics) -> Vec<String> {
    let mut lines = vec!["ADVANCED ANALYTICS:".to_string()];

    if let Some(anomaly) = &a.anomaly {
        lines.push(match anomaly.z_score() {
            Some(z) => format!(
                "- Anomaly Detection: {} (z-score {z:.2}, severity {})",
                if anomaly.anomaly_detected() { "anomaly detected" } else { "normal" },
                anomaly.severity().map(|s| s.as_str()).unwrap_or("low"),
            ),
            None => format!(
                "- Anomaly Detection: normal ({})",
                anomaly.reason().unwrap_or("no score")
            ),
        });
    }

    if let Some(t) = &a.trend {
        lines.push(format!(
            "- Trend Direction: {} ({} strength, r = {:.2})",
            t.direction.as_str(),
            t.strength.as_str(),
            t.r
        ));
    }

    if let Some(s) = &a.predictions.short_term {
        lines.push(format!(
            "- Short-term ({}): {:.2} (confidence {})",
            s.timeframe,
            s.predicted_value,
            s.confidence.as_str()
        ));
    }
    if let Some(m) = &a.predictions.medium_term {
        lines.push(format!(
            "- Medium-term ({}): {:.2} (confidence {})",
            m.timeframe,
            m.predicted_value,
            m.confidence.as_str()
        ));
    }

    if let Some(i) = &a.impact {
        lines.push(format!(
            "- Business Impact Score: {:.0}/100 ({} criticality)",
            i.impact_score,
            i.criticality.as_str()
        ));
        lines.push(format!("- Financial Impact: {}", i.financial.estimated_impact));
        if !i.stakeholder_alerts.is_empty() {
            lines.push(format!(
                "- Stakeholder Alerts Required: {}",
                i.stakeholder_alerts.join(", ")
            ));
        }
    }

    if let Some(c) = &a.correlations {
        lines.push(format!(
            "- Cross-KPI Correlations: {} insights identified",
            c.insights.len()
        ));
        lines.extend(c.insights.iter().map(|insight| format!("  - {insight}")));
    }

    lines
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::analytics::AnalyticsEngine;
    use crate::context::ExtraContext;
    use crate::knowledge::ContextRetriever;
    use callsight_core::{MetricId, MetricValue};
    use chrono::NaiveDate;
    use serde_json::json;

    fn ctx() -> EnrichedContext {
        let extra = json!({"region": "north"});
        let ctx = ContextRetriever::new()
            .retrieve(
                &MetricId::parse("call_volume").unwrap(),
                &MetricValue::from(3400.0),
                extra.as_object().unwrap(),
            )
            .unwrap();
        AnalyticsEngine::new().enrich(ctx)
    }

    #[test]
    fn prompt_quotes_only_last_ten_points() {
        let c = ctx();
        let p = build_prompt(&c);
        let history = c.numeric_history();
        let tail: Vec<String> = history[history.len() - 10..]
            .iter()
            .map(|v| MetricValue::from(*v).to_string())
            .collect();
        assert!(p.contains(&format!("Recent Trend Data: [{}]", tail.join(", "))));
        assert!(!p.contains(&format!("[{}, ", MetricValue::from(history[0]))));
    }

    #[test]
    fn prompt_carries_analytics_and_additional_context() {
        let p = build_prompt(&ctx());
        assert!(p.contains("- KPI: Call Volume"));
        assert!(p.contains("ADVANCED ANALYTICS:"));
        assert!(p.contains("Business Impact Score"));
        assert!(p.contains("- region: \"north\""));
        assert!(p.contains("Peak hours typically 10AM-12PM"));
    }

    #[test]
    fn sections_are_separated_by_blank_lines() {
        let p = build_prompt(&ctx());
        assert!(p.starts_with("You are a senior call center analytics consultant.\n\nCURRENT SITUATION:\n"));
        assert!(p.contains("\n\nCOMPARATIVE METRICS:\n"));
        assert!(p.contains("\n\nADVANCED ANALYTICS:\n"));
        assert!(p.ends_with("state what additional data is needed."));
        assert!(!p.contains("MALAYSIAN SEASONAL INTELLIGENCE"));
    }

    #[test]
    fn revenue_prompt_carries_seasonal_section() {
        let ctx = ContextRetriever::new()
            .with_today(NaiveDate::from_ymd_opt(2025, 8, 20).unwrap())
            .retrieve(
                &MetricId::parse("revenue_growth").unwrap(),
                &MetricValue::from(12.5),
                &ExtraContext::new(),
            )
            .unwrap();
        let p = build_prompt(&ctx);
        assert!(p.contains("MALAYSIAN SEASONAL INTELLIGENCE:"));
        assert!(p.contains("- Next Major Event: Merdeka Day (2025-08-31, medium impact)"));
        assert!(p.contains("- Predicted Uplift: 10%"));
        assert!(p.contains("Q3 typically shows enhanced business activity in Malaysia"));
        assert!(p.contains("- Malaysia Day (27 days): 8% expected uplift"));
        assert!(p.contains("Factor the seasonal catalysts into the predictions."));
    }
}
