use axum::http::StatusCode;
use axum::response::IntoResponse;
use serde_json::json;

use callsight_infra::jobs::OrchestratorError;

pub fn orchestrator_error_to_response(err: OrchestratorError) -> axum::response::Response {
    match err {
        OrchestratorError::InvalidMetric(e) => {
            json_error(StatusCode::BAD_REQUEST, "invalid_metric", e.to_string())
        }
        OrchestratorError::Store(e) => {
            json_error(StatusCode::INTERNAL_SERVER_ERROR, "store_error", e.to_string())
        }
        OrchestratorError::NoRuntime => json_error(
            StatusCode::INTERNAL_SERVER_ERROR,
            "internal_error",
            "worker runtime unavailable",
        ),
    }
}

pub fn json_error(
    status: StatusCode,
    code: &'static str,
    message: impl Into<String>,
) -> axum::response::Response {
    (
        status,
        axum::Json(json!({
            "error": code,
            "message": message.into(),
        })),
    )
        .into_response()
}
