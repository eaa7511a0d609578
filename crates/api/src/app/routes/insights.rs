use std::sync::Arc;

use axum::{
    Json,
    extract::{Extension, Path},
    http::StatusCode,
    response::IntoResponse,
};

use crate::app::dto::{SubmitInsightRequest, SubmitInsightResponse};
use crate::app::errors;
use crate::app::services::AppServices;

pub async fn submit(
    Extension(services): Extension<Arc<AppServices>>,
    Json(req): Json<SubmitInsightRequest>,
) -> axum::response::Response {
    let extra = req.context.unwrap_or_default();
    match services
        .orchestrator
        .submit(&req.metric_id, req.current_value, extra)
    {
        Ok(job_id) => (
            StatusCode::ACCEPTED,
            Json(SubmitInsightResponse {
                job_id: job_id.to_string(),
            }),
        )
            .into_response(),
        Err(e) => errors::orchestrator_error_to_response(e),
    }
}

pub async fn poll(
    Extension(services): Extension<Arc<AppServices>>,
    Path(job_id): Path<String>,
) -> impl IntoResponse {
    Json(services.orchestrator.poll(&job_id))
}

pub async fn stats(Extension(services): Extension<Arc<AppServices>>) -> impl IntoResponse {
    Json(services.orchestrator.stats())
}
