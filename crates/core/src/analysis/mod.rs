pub mod fallback;
pub mod prompt;

use crate::domain::article::Article;
use crate::domain::verdict::SentimentVerdict;
use crate::llm::json::parse_verdict;
use crate::llm::LlmClient;
use std::sync::Arc;

/// Turns a batch of articles into exactly one verdict. Every failure resolves to one of
/// the fallback verdicts in [`fallback`].
#[derive(Clone)]
pub struct SentimentAnalyzer {
    llm: Arc<dyn LlmClient>,
}

impl SentimentAnalyzer {
    pub fn new(llm: Arc<dyn LlmClient>) -> Self {
        Self { llm }
    }

    pub async fn analyze(&self, stock: &str, articles: &[Article]) -> SentimentVerdict {
        let request = prompt::completion_request(stock, articles);
        let provider = self.llm.provider();

        let text = match self.llm.complete(&request).await {
            Ok(text) => text,
            Err(err) => {
                tracing::error!(stock, %provider, error = %format!("{err:#}"), "sentiment request failed");
                return fallback::api_error_verdict(&err);
            }
        };

        match parse_verdict(&text) {
            Ok(verdict) => verdict,
            Err(err) => {
                tracing::warn!(
                    stock,
                    %provider,
                    error = %err,
                    raw_output = %text,
                    "could not parse sentiment verdict"
                );
                fallback::parse_failure_verdict()
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::verdict::{Recommendation, SentimentLabel};
    use crate::llm::{CompletionRequest, Provider};
    use std::sync::Mutex;

    struct ScriptedLlm {
        reply: Result<String, String>,
        seen: Mutex<Vec<CompletionRequest>>,
    }

    impl ScriptedLlm {
        fn replying(text: &str) -> Arc<Self> {
            Arc::new(Self {
                reply: Ok(text.to_string()),
                seen: Mutex::new(Vec::new()),
            })
        }

        fn failing(err: &str) -> Arc<Self> {
            Arc::new(Self {
                reply: Err(err.to_string()),
                seen: Mutex::new(Vec::new()),
            })
        }
    }

    #[async_trait::async_trait]
    impl LlmClient for ScriptedLlm {
        fn provider(&self) -> Provider {
            Provider::Groq
        }

        async fn complete(&self, request: &CompletionRequest) -> anyhow::Result<String> {
            self.seen.lock().unwrap().push(request.clone());
            match &self.reply {
                Ok(text) => Ok(text.clone()),
                Err(err) => Err(anyhow::anyhow!(err.clone())),
            }
        }
    }

    fn articles() -> Vec<Article> {
        vec![Article {
            title: "Record quarter".to_string(),
            description: "Revenue rose 12%.".to_string(),
            source: "Reuters".to_string(),
            url: "https://example.com".to_string(),
            published_at: "2026-10-16T00:00:00Z".to_string(),
        }]
    }

    async fn analyze_with(llm: Arc<ScriptedLlm>) -> SentimentVerdict {
        SentimentAnalyzer::new(llm).analyze("AAPL", &articles()).await
    }

    #[tokio::test]
    async fn well_formed_completion_is_returned_unchanged() {
        let verdict = analyze_with(ScriptedLlm::replying(
            r#"{"sentiment_score":-0.2,"sentiment_label":"Neutral","recommendation":"Hold","confidence":55,"key_insights":["i1","i2","i3"],"risks":["r1","r2"],"summary":"Mixed signals."}"#,
        ))
        .await;

        assert_eq!(verdict.sentiment_score, -0.2);
        assert_eq!(verdict.sentiment_label, SentimentLabel::Neutral);
        assert_eq!(verdict.recommendation, Recommendation::Hold);
        assert_eq!(verdict.confidence, 55);
        assert_eq!(verdict.key_insights, vec!["i1", "i2", "i3"]);
        assert_eq!(verdict.risks, vec!["r1", "r2"]);
        assert_eq!(verdict.summary, "Mixed signals.");
    }

    #[tokio::test]
    async fn json_embedded_in_prose_is_extracted() {
        let verdict = analyze_with(ScriptedLlm::replying(
            "Sure, here it is:\n{\"sentiment_score\":0.5,\"sentiment_label\":\"Bullish\",\"recommendation\":\"Buy\",\"confidence\":80,\"key_insights\":[],\"risks\":[],\"summary\":\"Up.\"}\nHope that helps",
        ))
        .await;
        assert_eq!(verdict.sentiment_label, SentimentLabel::Bullish);
        assert_eq!(verdict.confidence, 80);
    }

    #[tokio::test]
    async fn empty_completion_yields_neutral_fallback() {
        let verdict = analyze_with(ScriptedLlm::replying("")).await;
        assert_eq!(verdict, fallback::parse_failure_verdict());
        assert_eq!(verdict.sentiment_score, 0.0);
        assert_eq!(verdict.confidence, 0);
    }

    #[tokio::test]
    async fn broken_json_yields_neutral_not_error() {
        let verdict = analyze_with(ScriptedLlm::replying("{sentiment_score: bad}")).await;
        assert_eq!(verdict, fallback::parse_failure_verdict());
        assert_eq!(verdict.sentiment_label, SentimentLabel::Neutral);
    }

    #[tokio::test]
    async fn transport_failure_yields_error_fallback_with_detail() {
        let verdict = analyze_with(ScriptedLlm::failing("connection reset by peer")).await;
        assert_eq!(verdict.sentiment_label, SentimentLabel::Error);
        assert_eq!(verdict.recommendation, Recommendation::Hold);
        assert_eq!(verdict.confidence, 0);
        assert!(verdict.summary.contains("connection reset by peer"));
    }

    #[tokio::test]
    async fn parsed_scores_stay_in_range() {
        let verdict = analyze_with(ScriptedLlm::replying(
            r#"{"sentiment_score": 2.5, "sentiment_label": "Strongly Bullish"}"#,
        ))
        .await;
        assert!((-1.0..=1.0).contains(&verdict.sentiment_score));
        assert_eq!(verdict.sentiment_score, 1.0);
    }

    #[tokio::test]
    async fn sends_one_request_built_from_the_articles() {
        let llm = ScriptedLlm::replying("{}");
        SentimentAnalyzer::new(llm.clone())
            .analyze("AAPL", &articles())
            .await;

        let seen = llm.seen.lock().unwrap();
        assert_eq!(seen.len(), 1);
        assert_eq!(seen[0].system, prompt::SYSTEM_PROMPT);
        assert!(seen[0].user.contains("Record quarter (Reuters)\nRevenue rose 12%."));
    }
}
