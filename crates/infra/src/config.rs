//! Environment configuration, read once at startup.

use std::net::SocketAddr;
use std::str::FromStr;
use std::sync::Arc;
use std::time::Duration;

use callsight_ai::{InsightPipeline, LanguageModel};

use crate::jobs::OrchestratorConfig;
use crate::llm::openai::{self, OpenAiClient, OpenAiConfig};
use crate::llm::{DEFAULT_MODEL_DEADLINE, DeadlineModel};

pub const DEFAULT_BIND_ADDR: &str = "0.0.0.0:8080";

#[derive(Debug, thiserror::Error, PartialEq, Eq)]
pub enum ConfigError {
    #[error("invalid value for {key}: {value:?}")]
    Invalid { key: String, value: String },
}

#[derive(Debug, Clone)]
pub struct AppConfig {
    pub bind_addr: SocketAddr,
    pub orchestrator: OrchestratorConfig,
    /// `None` runs the local tier only.
    pub openai: Option<OpenAiConfig>,
    pub model_deadline: Duration,
}

impl AppConfig {
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Build from any key lookup; empty values count as unset.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());

        let bind_addr = parse_or(&get, "CALLSIGHT_BIND_ADDR", || {
            SocketAddr::from(([0, 0, 0, 0], 8080))
        })?;

        let defaults = OrchestratorConfig::default();
        let orchestrator = OrchestratorConfig::default()
            .with_job_timeout(secs_or(&get, "CALLSIGHT_JOB_TIMEOUT_SECS", defaults.job_timeout)?)
            .with_stale_after(secs_or(&get, "CALLSIGHT_STALE_AFTER_SECS", defaults.stale_after)?)
            .with_sweep_interval(secs_or(
                &get,
                "CALLSIGHT_SWEEP_INTERVAL_SECS",
                defaults.sweep_interval,
            )?)
            .with_max_concurrent_workers(parse_opt(&get, "CALLSIGHT_MAX_WORKERS")?);

        let openai = match get("OPENAI_API_KEY") {
            Some(key) => Some(
                OpenAiConfig::new(key)
                    .with_base_url(
                        get("OPENAI_BASE_URL").unwrap_or_else(|| openai::DEFAULT_BASE_URL.to_string()),
                    )
                    .with_model(get("OPENAI_MODEL").unwrap_or_else(|| openai::DEFAULT_MODEL.to_string()))
                    .with_max_tokens(parse_or(&get, "OPENAI_MAX_TOKENS", || {
                        openai::DEFAULT_MAX_TOKENS
                    })?)
                    .with_temperature(parse_or(&get, "OPENAI_TEMPERATURE", || {
                        openai::DEFAULT_TEMPERATURE
                    })?),
            ),
            None => None,
        };

        let model_deadline = secs_or(&get, "OPENAI_TIMEOUT_SECS", DEFAULT_MODEL_DEADLINE)?;

        // A processing job must time out (terminal report) before the sweep can drop it.
        if orchestrator.stale_after <= orchestrator.job_timeout {
            return Err(ConfigError::Invalid {
                key: "CALLSIGHT_STALE_AFTER_SECS".to_string(),
                value: format!(
                    "{} (must exceed job timeout {})",
                    orchestrator.stale_after.as_secs(),
                    orchestrator.job_timeout.as_secs()
                ),
            });
        }
        // The model deadline only applies when the primary tier is enabled.
        if openai.is_some() && model_deadline >= orchestrator.job_timeout {
            return Err(ConfigError::Invalid {
                key: "OPENAI_TIMEOUT_SECS".to_string(),
                value: format!(
                    "{} (must be below job timeout {})",
                    model_deadline.as_secs(),
                    orchestrator.job_timeout.as_secs()
                ),
            });
        }

        Ok(Self {
            bind_addr,
            orchestrator,
            openai,
            model_deadline,
        })
    }

    /// Deadline-wrapped primary model, if an API key was configured.
    pub fn language_model(&self) -> Option<Arc<dyn LanguageModel>> {
        self.openai.as_ref().map(|c| {
            let client: Arc<dyn LanguageModel> = Arc::new(OpenAiClient::new(c.clone()));
            Arc::new(DeadlineModel::new(client, self.model_deadline)) as Arc<dyn LanguageModel>
        })
    }

    pub fn pipeline(&self) -> InsightPipeline {
        InsightPipeline::with_model(self.language_model())
    }
}

fn parse_opt<T, G>(get: &G, key: &str) -> Result<Option<T>, ConfigError>
where
    T: FromStr,
    G: Fn(&str) -> Option<String>,
{
    match get(key) {
        Some(raw) => raw
            .trim()
            .parse()
            .map(Some)
            .map_err(|_| ConfigError::Invalid {
                key: key.to_string(),
                value: raw,
            }),
        None => Ok(None),
    }
}

fn parse_or<T, G, D>(get: &G, key: &str, default: D) -> Result<T, ConfigError>
where
    T: FromStr,
    G: Fn(&str) -> Option<String>,
    D: FnOnce() -> T,
{
    Ok(parse_opt(get, key)?.unwrap_or_else(default))
}

fn secs_or<G>(get: &G, key: &str, default: Duration) -> Result<Duration, ConfigError>
where
    G: Fn(&str) -> Option<String>,
{
    match parse_opt::<u64, G>(get, key)? {
        Some(0) => Err(ConfigError::Invalid {
            key: key.to_string(),
            value: "0".to_string(),
        }),
        Some(secs) => Ok(Duration::from_secs(secs)),
        None => Ok(default),
    }
}
