use chrono::Utc;
use serde::{Deserialize, Serialize};

use callsight_core::{MetricId, MetricValue, ValueObject};

/// Longest error message carried verbatim into an error report.
pub const MAX_ERROR_CHARS: usize = 100;

const TIMESTAMP_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

/// Which tier produced a report.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum ReportSource {
    PrimaryGenerator,
    FallbackLocal,
    Error,
}

impl ReportSource {
    pub fn as_str(&self) -> &'static str {
        match self {
            ReportSource::PrimaryGenerator => "primary-generator",
            ReportSource::FallbackLocal => "fallback-local",
            ReportSource::Error => "error",
        }
    }
}

/// Final artifact of a job: a markdown narrative plus provenance.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Report {
    pub success: bool,
    pub title: String,
    pub body: String,
    pub source: ReportSource,
    pub timestamp: String,
    pub metric_id: String,
}

impl ValueObject for Report {}

impl Report {
    fn analysis(
        metric_id: &MetricId,
        current: &MetricValue,
        body: String,
        source: ReportSource,
    ) -> Self {
        Self {
            success: true,
            title: format!("{} Analysis - {}", metric_id.display_name(), current),
            body,
            source,
            timestamp: now(),
            metric_id: metric_id.to_string(),
        }
    }

    pub fn primary(metric_id: &MetricId, current: &MetricValue, body: String) -> Self {
        Self::analysis(metric_id, current, body, ReportSource::PrimaryGenerator)
    }

    pub fn local(metric_id: &MetricId, current: &MetricValue, body: String) -> Self {
        Self::analysis(metric_id, current, body, ReportSource::FallbackLocal)
    }

    /// Last-resort report. Always renderable; never fails.
    pub fn error(metric_id: &MetricId, message: &str) -> Self {
        let display = metric_id.display_name();
        let timestamp = now();
        let body = format!(
            "# {display} Analysis Error\n\
             \n\
             ## Service Unavailable\n\
             \n\
             AI insights are temporarily unavailable due to a system error.\n\
             \n\
             ## Manual Analysis Required\n\
             - **KPI Type**: {display}\n\
             - **Status**: Review manually using operational procedures\n\
             - **Action**: Contact system administrator if issue persists\n\
             \n\
             ## Troubleshooting\n\
             ```\n\
             Error: {error}\n\
             Timestamp: {timestamp}\n\
             ```\n\
             \n\
             ---\n\
             *Please try again later or contact support if the problem persists*\n",
            error = truncate_message(message, MAX_ERROR_CHARS),
        );

        Self {
            success: false,
            title: format!("{display} Analysis Error"),
            body,
            source: ReportSource::Error,
            timestamp,
            metric_id: metric_id.to_string(),
        }
    }

    pub fn is_error(&self) -> bool {
        self.source == ReportSource::Error
    }
}

fn now() -> String {
    Utc::now().format(TIMESTAMP_FORMAT).to_string()
}

/// Cut `message` to `max` characters, marking the cut with `...`.
pub fn truncate_message(message: &str, max: usize) -> String {
    match message.char_indices().nth(max) {
        Some((idx, _)) => format!("{}...", &message[..idx]),
        None => message.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn source_serializes_kebab_case() {
        assert_eq!(
            serde_json::to_string(&ReportSource::PrimaryGenerator).unwrap(),
            "\"primary-generator\""
        );
        assert_eq!(
            serde_json::to_string(&ReportSource::FallbackLocal).unwrap(),
            "\"fallback-local\""
        );
        assert_eq!(serde_json::to_string(&ReportSource::Error).unwrap(), "\"error\"");
    }

    #[test]
    fn error_report_truncates_long_messages() {
        let metric = MetricId::parse("queue_status").unwrap();
        let long = "x".repeat(250);
        let r = Report::error(&metric, &long);

        assert!(!r.success);
        assert_eq!(r.source, ReportSource::Error);
        assert_eq!(r.title, "Queue Status Analysis Error");
        assert!(r.body.contains(&format!("Error: {}...", "x".repeat(100))));
        assert!(!r.body.contains(&"x".repeat(101)));
    }

    #[test]
    fn truncation_respects_char_boundaries() {
        assert_eq!(truncate_message("héllo", 2), "hé...");
        assert_eq!(truncate_message("short", 100), "short");
    }

    #[test]
    fn analysis_title_uses_display_name() {
        let r = Report::local(
            &MetricId::parse("revenue_growth").unwrap(),
            &MetricValue::from(12.5),
            "body".into(),
        );
        assert_eq!(r.title, "Revenue Growth Analysis - 12.5");
        assert!(r.success);
        assert_eq!(r.metric_id, "revenue_growth");
    }
}
