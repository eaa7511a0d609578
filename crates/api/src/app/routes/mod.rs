use axum::{
    Router,
    routing::{get, post},
};

pub mod insights;
pub mod system;

/// Router for the insight job endpoints.
pub fn router() -> Router {
    Router::new()
        .route("/insights", post(insights::submit))
        .route("/insights/stats", get(insights::stats))
        .route("/insights/:job_id", get(insights::poll))
}
