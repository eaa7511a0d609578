use thiserror::Error;

use crate::narrative::model::GenerationError;

/// Errors raised inside the insight pipeline.
///
/// None of these escape a job: the narrative chain falls through tiers on
/// `Generation`, and the worker turns anything else into an error report.
#[derive(Debug, Error)]
pub enum AiError {
    #[error("invalid pipeline input: {0}")]
    InvalidInput(String),

    #[error("narrative generation failed: {0}")]
    Generation(#[from] GenerationError),

    #[error("internal error: {0}")]
    Internal(String),
}
