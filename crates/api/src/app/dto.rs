use serde::{Deserialize, Serialize};

use callsight_ai::ExtraContext;
use callsight_core::MetricValue;

// -------------------------
// Request DTOs
// -------------------------

#[derive(Debug, Deserialize)]
pub struct SubmitInsightRequest {
    pub metric_id: String,
    pub current_value: MetricValue,
    #[serde(default)]
    pub context: Option<ExtraContext>,
}

// -------------------------
// Response DTOs
// -------------------------

#[derive(Debug, Serialize)]
pub struct SubmitInsightResponse {
    pub job_id: String,
}
