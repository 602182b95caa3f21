use crate::config::{env_or, non_empty_env, non_empty_env_or, Settings};
use crate::llm::error::LlmDiagnosticsError;
use crate::llm::{CompletionRequest, LlmClient, Provider};
use anyhow::Context;
use serde::{Deserialize, Serialize};
use std::time::Duration;

const GROQ_BASE_URL: &str = "https://api.groq.com/openai/v1";
const OPENAI_BASE_URL: &str = "https://api.openai.com/v1";
const GROQ_DEFAULT_MODEL: &str = "qwen/qwen3-32b";
const OPENAI_DEFAULT_MODEL: &str = "gpt-4o-mini";
const DEFAULT_TEMPERATURE: f64 = 0.3;
const DEFAULT_MAX_TOKENS: u32 = 1000;
const DEFAULT_TIMEOUT_SECS: u64 = 60;

#[derive(Debug, Clone)]
pub struct ChatCompletionsConfig {
    pub provider: Provider,
    pub api_key: String,
    pub base_url: String,
    pub model: String,
    pub temperature: f64,
    pub max_tokens: u32,
    pub timeout: Duration,
}

impl ChatCompletionsConfig {
    pub fn new(provider: Provider, api_key: impl Into<String>, base_url: impl Into<String>) -> Self {
        let model = match provider {
            Provider::Groq => GROQ_DEFAULT_MODEL,
            Provider::OpenAI => OPENAI_DEFAULT_MODEL,
        };
        Self {
            provider,
            api_key: api_key.into(),
            base_url: base_url.into(),
            model: model.to_string(),
            temperature: DEFAULT_TEMPERATURE,
            max_tokens: DEFAULT_MAX_TOKENS,
            timeout: Duration::from_secs(DEFAULT_TIMEOUT_SECS),
        }
    }

    pub fn from_settings(settings: &Settings) -> anyhow::Result<Self> {
        let provider = settings.llm_provider()?;
        let api_key = settings.require_llm_api_key()?.to_string();
        let default_base = match provider {
            Provider::Groq => GROQ_BASE_URL,
            Provider::OpenAI => OPENAI_BASE_URL,
        };
        let base_url = non_empty_env_or("LLM_BASE_URL", default_base);

        let mut config = Self::new(provider, api_key, base_url);
        if let Some(model) = non_empty_env("LLM_MODEL") {
            config.model = model;
        }
        config.temperature = env_or("LLM_TEMPERATURE", DEFAULT_TEMPERATURE);
        config.max_tokens = env_or("LLM_MAX_TOKENS", DEFAULT_MAX_TOKENS);
        config.timeout = Duration::from_secs(env_or("LLM_TIMEOUT_SECS", DEFAULT_TIMEOUT_SECS));
        Ok(config)
    }
}

/// Client for the `/chat/completions` protocol shared by Groq and OpenAI.
#[derive(Debug, Clone)]
pub struct ChatCompletionsClient {
    http: reqwest::Client,
    config: ChatCompletionsConfig,
}

impl ChatCompletionsClient {
    pub fn new(config: ChatCompletionsConfig) -> anyhow::Result<Self> {
        let http = reqwest::Client::builder()
            .timeout(config.timeout)
            .build()
            .context("failed to build reqwest client")?;
        Ok(Self { http, config })
    }

    pub fn from_settings(settings: &Settings) -> anyhow::Result<Self> {
        Self::new(ChatCompletionsConfig::from_settings(settings)?)
    }

    pub fn model(&self) -> &str {
        &self.config.model
    }

    fn build_request<'a>(&'a self, request: &'a CompletionRequest) -> ChatRequest<'a> {
        ChatRequest {
            model: &self.config.model,
            messages: vec![
                ChatMessage {
                    role: "system",
                    content: &request.system,
                },
                ChatMessage {
                    role: "user",
                    content: &request.user,
                },
            ],
            temperature: self.config.temperature,
            max_tokens: self.config.max_tokens,
        }
    }

    fn diagnostics(&self, stage: &'static str, detail: String, raw: String) -> LlmDiagnosticsError {
        LlmDiagnosticsError {
            provider: self.config.provider,
            stage,
            detail,
            raw_output: Some(raw),
        }
    }
}

#[async_trait::async_trait]
impl LlmClient for ChatCompletionsClient {
    fn provider(&self) -> Provider {
        self.config.provider
    }

    async fn complete(&self, request: &CompletionRequest) -> anyhow::Result<String> {
        let url = format!(
            "{}/chat/completions",
            self.config.base_url.trim_end_matches('/')
        );
        tracing::debug!(%url, model = %self.config.model, "POST chat completion");

        let res = self
            .http
            .post(url)
            .bearer_auth(&self.config.api_key)
            .json(&self.build_request(request))
            .send()
            .await
            .with_context(|| format!("{} request failed", self.config.provider))?;

        let status = res.status();
        let text = res
            .text()
            .await
            .with_context(|| format!("failed to read {} response body", self.config.provider))?;
        if !status.is_success() {
            return Err(self.diagnostics("http", format!("status={status}"), text).into());
        }

        let parsed = match serde_json::from_str::<ChatResponse>(&text) {
            Ok(parsed) => parsed,
            Err(err) => {
                return Err(self
                    .diagnostics("decode", format!("invalid response JSON: {err}"), text)
                    .into())
            }
        };

        let Some(choice) = parsed.choices.into_iter().next() else {
            return Err(self
                .diagnostics("response", "response contained no choices".to_string(), text)
                .into());
        };

        if let Some(reason) = choice.finish_reason.as_deref() {
            if reason == "length" {
                tracing::warn!(
                    provider = %self.config.provider,
                    max_tokens = self.config.max_tokens,
                    "completion hit max_tokens; output may be truncated"
                );
            }
        }

        // Refusals, content filters and tool-call-only replies come back without content.
        let Some(content) = choice.message.content else {
            return Err(self
                .diagnostics("response", "completion content was null".to_string(), text)
                .into());
        };
        Ok(content)
    }
}

#[derive(Debug, Serialize)]
struct ChatRequest<'a> {
    model: &'a str,
    messages: Vec<ChatMessage<'a>>,
    temperature: f64,
    max_tokens: u32,
}

#[derive(Debug, Serialize)]
struct ChatMessage<'a> {
    role: &'static str,
    content: &'a str,
}

#[derive(Debug, Deserialize)]
struct ChatResponse {
    #[serde(default)]
    choices: Vec<Choice>,
}

#[derive(Debug, Deserialize)]
struct Choice {
    message: ChoiceMessage,
    #[serde(default)]
    finish_reason: Option<String>,
}

#[derive(Debug, Deserialize)]
struct ChoiceMessage {
    #[serde(default)]
    content: Option<String>,
}
