//! Language-model adapters for the primary narrative tier.

pub mod deadline;
pub mod openai;

pub use deadline::{DEFAULT_MODEL_DEADLINE, DeadlineModel};
pub use openai::{OpenAiClient, OpenAiConfig};
