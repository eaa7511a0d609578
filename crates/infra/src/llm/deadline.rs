use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use tracing::warn;

use callsight_ai::{GenerationError, LanguageModel};

pub const DEFAULT_MODEL_DEADLINE: Duration = Duration::from_secs(25);

/// Bounds every call of the inner model; an overrun is `GenerationError::Timeout`.
pub struct DeadlineModel {
    inner: Arc<dyn LanguageModel>,
    deadline: Duration,
}

impl DeadlineModel {
    pub fn new(inner: Arc<dyn LanguageModel>, deadline: Duration) -> Self {
        Self { inner, deadline }
    }

    pub fn deadline(&self) -> Duration {
        self.deadline
    }
}

#[async_trait]
impl LanguageModel for DeadlineModel {
    async fn generate(&self, prompt: &str) -> Result<String, GenerationError> {
        match tokio::time::timeout(self.deadline, self.inner.generate(prompt)).await {
            Ok(result) => result,
            Err(_) => {
                warn!(
                    model = self.inner.name(),
                    deadline_secs = self.deadline.as_secs_f64(),
                    "language model call exceeded deadline"
                );
                Err(GenerationError::Timeout)
            }
        }
    }

    fn name(&self) -> &str {
        self.inner.name()
    }
}
