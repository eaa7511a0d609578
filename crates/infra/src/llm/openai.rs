//! OpenAI-compatible chat-completions client.

use async_trait::async_trait;
use reqwest::{Client, StatusCode};
use serde_json::{Value, json};
use tracing::debug;

use callsight_ai::narrative::SYSTEM_PROMPT;
use callsight_ai::{GenerationError, LanguageModel};

pub const DEFAULT_BASE_URL: &str = "https://api.openai.com/v1";
pub const DEFAULT_MODEL: &str = "gpt-4";
pub const DEFAULT_MAX_TOKENS: u32 = 2500;
pub const DEFAULT_TEMPERATURE: f32 = 0.3;
const TOP_P: f32 = 0.9;

#[derive(Debug, Clone)]
pub struct OpenAiConfig {
    pub api_key: String,
    pub base_url: String,
    pub model: String,
    pub max_tokens: u32,
    pub temperature: f32,
}

impl OpenAiConfig {
    pub fn new(api_key: impl Into<String>) -> Self {
        Self {
            api_key: api_key.into(),
            base_url: DEFAULT_BASE_URL.to_string(),
            model: DEFAULT_MODEL.to_string(),
            max_tokens: DEFAULT_MAX_TOKENS,
            temperature: DEFAULT_TEMPERATURE,
        }
    }

    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into();
        self
    }

    pub fn with_model(mut self, model: impl Into<String>) -> Self {
        self.model = model.into();
        self
    }

    pub fn with_max_tokens(mut self, max_tokens: u32) -> Self {
        self.max_tokens = max_tokens;
        self
    }

    pub fn with_temperature(mut self, temperature: f32) -> Self {
        self.temperature = temperature;
        self
    }

    fn endpoint(&self) -> String {
        format!("{}/chat/completions", self.base_url.trim_end_matches('/'))
    }
}

/// Primary-tier language model backed by a chat-completions endpoint.
#[derive(Debug, Clone)]
pub struct OpenAiClient {
    http: Client,
    config: OpenAiConfig,
}

impl OpenAiClient {
    pub fn new(config: OpenAiConfig) -> Self {
        Self {
            http: Client::new(),
            config,
        }
    }

    pub fn config(&self) -> &OpenAiConfig {
        &self.config
    }
}

fn request_body(config: &OpenAiConfig, prompt: &str) -> Value {
    json!({
        "model": config.model,
        "messages": [
            {"role": "system", "content": SYSTEM_PROMPT},
            {"role": "user", "content": prompt}
        ],
        "max_tokens": config.max_tokens,
        "temperature": config.temperature,
        "top_p": TOP_P,
        "stream": false
    })
}

fn classify_status(status: StatusCode, body: String) -> GenerationError {
    if status == StatusCode::TOO_MANY_REQUESTS {
        GenerationError::Quota(body)
    } else {
        GenerationError::Service {
            status: status.as_u16(),
            body,
        }
    }
}

fn extract_content(text: &str) -> Result<String, GenerationError> {
    let v: Value = serde_json::from_str(text)
        .map_err(|e| GenerationError::Transport(format!("invalid response body: {e}")))?;
    match v["choices"][0]["message"]["content"].as_str() {
        Some(content) if !content.trim().is_empty() => Ok(content.to_string()),
        _ => Err(GenerationError::EmptyResponse),
    }
}

#[async_trait]
impl LanguageModel for OpenAiClient {
    async fn generate(&self, prompt: &str) -> Result<String, GenerationError> {
        let url = self.config.endpoint();
        debug!(url = %url, model = %self.config.model, "requesting completion");

        let resp = self
            .http
            .post(&url)
            .bearer_auth(&self.config.api_key)
            .json(&request_body(&self.config, prompt))
            .send()
            .await
            .map_err(|e| GenerationError::Transport(e.to_string()))?;

        let status = resp.status();
        let text = resp
            .text()
            .await
            .map_err(|e| GenerationError::Transport(e.to_string()))?;

        if !status.is_success() {
            return Err(classify_status(status, text));
        }
        extract_content(&text)
    }

    fn name(&self) -> &str {
        "openai"
    }
}
