pub mod analysis;
pub mod domain;
pub mod llm;
pub mod news;
pub mod report;

pub mod config {
    use crate::llm::Provider;
    use anyhow::Context;

    #[derive(Debug, Clone, Default)]
    pub struct Settings {
        pub gnews_api_key: Option<String>,
        pub groq_api_key: Option<String>,
        pub openai_api_key: Option<String>,
        pub llm_provider: Option<String>,
        pub sentry_dsn: Option<String>,
    }

    impl Settings {
        pub fn from_env() -> anyhow::Result<Self> {
            Ok(Self {
                gnews_api_key: non_empty_env("GNEWS_API_KEY"),
                groq_api_key: non_empty_env("GROQ_API_KEY"),
                openai_api_key: non_empty_env("OPENAI_API_KEY"),
                llm_provider: non_empty_env("LLM_PROVIDER"),
                sentry_dsn: non_empty_env("SENTRY_DSN"),
            })
        }

        pub fn require_gnews_api_key(&self) -> anyhow::Result<&str> {
            self.gnews_api_key
                .as_deref()
                .context("GNEWS_API_KEY is required")
        }

        pub fn require_groq_api_key(&self) -> anyhow::Result<&str> {
            self.groq_api_key
                .as_deref()
                .context("GROQ_API_KEY is required")
        }

        pub fn require_openai_api_key(&self) -> anyhow::Result<&str> {
            self.openai_api_key
                .as_deref()
                .context("OPENAI_API_KEY is required")
        }

        /// Provider selected by `LLM_PROVIDER`; Groq when unset.
        pub fn llm_provider(&self) -> anyhow::Result<Provider> {
            match self.llm_provider.as_deref().map(str::trim) {
                None => Ok(Provider::Groq),
                Some(s) if s.eq_ignore_ascii_case("groq") => Ok(Provider::Groq),
                Some(s) if s.eq_ignore_ascii_case("openai") => Ok(Provider::OpenAI),
                Some(other) => anyhow::bail!("unsupported LLM_PROVIDER: {other}"),
            }
        }

        pub fn require_llm_api_key(&self) -> anyhow::Result<&str> {
            match self.llm_provider()? {
                Provider::Groq => self.require_groq_api_key(),
                Provider::OpenAI => self.require_openai_api_key(),
            }
        }
    }

    pub fn non_empty_env(key: &str) -> Option<String> {
        std::env::var(key).ok().filter(|v| !v.trim().is_empty())
    }

    /// Like [`non_empty_env`], with a fallback for unset or blank values.
    pub fn non_empty_env_or(key: &str, default: &str) -> String {
        non_empty_env(key).unwrap_or_else(|| default.to_string())
    }

    /// Reads an optional tuning knob; unparseable values fall back to `default`.
    pub fn env_or<T: std::str::FromStr>(key: &str, default: T) -> T {
        std::env::var(key)
            .ok()
            .and_then(|s| s.trim().parse::<T>().ok())
            .unwrap_or(default)
    }

}
