use crate::config::{env_or, non_empty_env_or, Settings};
use crate::domain::article::Article;
use crate::news::{placeholder_articles, NewsSource};
use anyhow::{Context, Result};
use serde::Deserialize;
use std::time::Duration;

const DEFAULT_BASE_URL: &str = "https://gnews.io/api/v4";
const DEFAULT_TIMEOUT_SECS: u64 = 10;
const DEFAULT_LANG: &str = "en";
const DEFAULT_COUNTRY: &str = "us,in";
const SEARCH_PATH: &str = "/search";
const UNKNOWN_SOURCE: &str = "Unknown";

#[derive(Debug, Clone)]
pub struct GNewsConfig {
    pub base_url: String,
    pub api_key: String,
    pub lang: String,
    pub country: String,
    pub timeout: Duration,
}

impl GNewsConfig {
    pub fn new(base_url: impl Into<String>, api_key: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into(),
            api_key: api_key.into(),
            lang: DEFAULT_LANG.to_string(),
            country: DEFAULT_COUNTRY.to_string(),
            timeout: Duration::from_secs(DEFAULT_TIMEOUT_SECS),
        }
    }

    pub fn from_settings(settings: &Settings) -> Result<Self> {
        let api_key = settings.require_gnews_api_key()?.to_string();
        let base_url = non_empty_env_or("GNEWS_BASE_URL", DEFAULT_BASE_URL);

        let mut config = Self::new(base_url, api_key);
        config.lang = env_or("GNEWS_LANG", config.lang);
        config.country = env_or("GNEWS_COUNTRY", config.country);
        config.timeout = Duration::from_secs(env_or("GNEWS_TIMEOUT_SECS", DEFAULT_TIMEOUT_SECS));
        Ok(config)
    }
}

#[derive(Debug, Clone)]
pub struct GNewsClient {
    http: reqwest::Client,
    config: GNewsConfig,
}

impl GNewsClient {
    pub fn new(config: GNewsConfig) -> Result<Self> {
        let http = reqwest::Client::builder()
            .timeout(config.timeout)
            .build()
            .context("failed to build news http client")?;
        Ok(Self { http, config })
    }

    pub fn from_settings(settings: &Settings) -> Result<Self> {
        Self::new(GNewsConfig::from_settings(settings)?)
    }

    fn url(&self) -> String {
        format!("{}{}", self.config.base_url.trim_end_matches('/'), SEARCH_PATH)
    }

    pub async fn search(&self, stock: &str, max_articles: usize) -> Result<Vec<Article>> {
        let query = format!("{stock} stock market");
        let max = max_articles.max(1).to_string();

        let res = self
            .http
            .get(self.url())
            .query(&[
                ("q", query.as_str()),
                ("lang", self.config.lang.as_str()),
                ("country", self.config.country.as_str()),
                ("max", max.as_str()),
                ("apikey", self.config.api_key.as_str()),
            ])
            .send()
            .await
            // The URL carries the api key.
            .map_err(reqwest::Error::without_url)
            .context("news request failed")?;

        let status = res.status();
        let text = res
            .text()
            .await
            .map_err(reqwest::Error::without_url)
            .context("failed to read news response")?;
        if !status.is_success() {
            anyhow::bail!("news provider HTTP {status}: {text}");
        }

        let parsed = serde_json::from_str::<SearchResponse>(&text)
            .with_context(|| format!("news response is not valid JSON: {text}"))?;

        Ok(parsed
            .articles
            .into_iter()
            .take(max_articles.max(1))
            .map(SearchArticle::into_article)
            .collect())
    }
}

#[async_trait::async_trait]
impl NewsSource for GNewsClient {
    fn provider_name(&self) -> &'static str {
        "gnews"
    }

    async fn fetch_latest(&self, stock: &str, max_articles: usize) -> Vec<Article> {
        match self.search(stock, max_articles).await {
            Ok(articles) => {
                tracing::debug!(stock, count = articles.len(), "fetched news");
                articles
            }
            Err(err) => {
                tracing::warn!(stock, error = %format!("{err:#}"), "news fetch failed; using placeholder articles");
                placeholder_articles(stock, max_articles)
            }
        }
    }
}

#[derive(Debug, Deserialize)]
struct SearchResponse {
    #[serde(default)]
    articles: Vec<SearchArticle>,
}

#[derive(Debug, Deserialize)]
struct SearchArticle {
    #[serde(default)]
    title: Option<String>,
    #[serde(default)]
    description: Option<String>,
    #[serde(default)]
    source: Option<SearchSource>,
    #[serde(default)]
    url: Option<String>,
    #[serde(default, rename = "publishedAt")]
    published_at: Option<String>,
}

#[derive(Debug, Deserialize)]
struct SearchSource {
    #[serde(default)]
    name: Option<String>,
}

impl SearchArticle {
    fn into_article(self) -> Article {
        Article {
            title: self.title.unwrap_or_default(),
            description: self.description.unwrap_or_default(),
            source: self
                .source
                .and_then(|s| s.name)
                .unwrap_or_else(|| UNKNOWN_SOURCE.to_string()),
            url: self.url.unwrap_or_default(),
            published_at: self.published_at.unwrap_or_default(),
        }
    }
}
