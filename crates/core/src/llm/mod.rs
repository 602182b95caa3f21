pub mod error;
pub mod json;
pub mod openai_compat;

use std::fmt;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CompletionRequest {
    pub system: String,
    pub user: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Provider {
    Groq,
    OpenAI,
}

impl fmt::Display for Provider {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Provider::Groq => f.write_str("groq"),
            Provider::OpenAI => f.write_str("openai"),
        }
    }
}

#[async_trait::async_trait]
pub trait LlmClient: Send + Sync {
    fn provider(&self) -> Provider;

    /// Returns the raw completion text. Transport and protocol failures are errors; the
    /// content of a successful completion is not inspected.
    async fn complete(&self, request: &CompletionRequest) -> anyhow::Result<String>;
}
