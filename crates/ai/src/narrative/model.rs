use std::sync::Arc;

use async_trait::async_trait;
use thiserror::Error;

/// Failure modes of an external language service.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum GenerationError {
    #[error("transport error: {0}")]
    Transport(String),

    #[error("quota exceeded: {0}")]
    Quota(String),

    #[error("service returned {status}: {body}")]
    Service { status: u16, body: String },

    #[error("service returned empty content")]
    EmptyResponse,

    #[error("generation timed out")]
    Timeout,

    #[error("language model disabled for this request")]
    Disabled,
}

/// Black-box text generator used by the primary narrative tier.
///
/// Implementations must be cheap to share across concurrent jobs.
#[async_trait]
pub trait LanguageModel: Send + Sync {
    async fn generate(&self, prompt: &str) -> Result<String, GenerationError>;

    /// Short identifier for logs (e.g. the model name).
    fn name(&self) -> &str {
        "language-model"
    }
}

#[async_trait]
impl<T> LanguageModel for Arc<T>
where
    T: LanguageModel + ?Sized,
{
    async fn generate(&self, prompt: &str) -> Result<String, GenerationError> {
        (**self).generate(prompt).await
    }

    fn name(&self) -> &str {
        (**self).name()
    }
}
