//! Infrastructure layer: job orchestration, language-model adapters, config.

pub mod config;
pub mod jobs;
pub mod llm;

pub use config::{AppConfig, ConfigError};
pub use jobs::{InsightOrchestrator, OrchestratorConfig, PollResult};
