use crate::analysis::SentimentAnalyzer;
use crate::domain::article::Article;
use crate::domain::verdict::SentimentVerdict;
use crate::news::NewsSource;
use serde::{Deserialize, Serialize};

pub const DEFAULT_MAX_ARTICLES: usize = 5;

/// Quick-select tickers offered by the front ends.
pub const POPULAR_STOCKS: [&str; 10] = [
    "AAPL", "GOOGL", "MSFT", "TSLA", "NVDA", "AMZN", "META", "TCS", "INFY", "RELIANCE",
];

const SIGNAL_THRESHOLD: f64 = 0.3;
const DECISIVE_CONFIDENCE: u8 = 70;

/// Styling class derived from the score alone; may disagree with the model's label.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SignalClass {
    Bullish,
    Neutral,
    Bearish,
}

impl SignalClass {
    pub fn from_score(score: f64) -> Self {
        if score > SIGNAL_THRESHOLD {
            SignalClass::Bullish
        } else if score < -SIGNAL_THRESHOLD {
            SignalClass::Bearish
        } else {
            SignalClass::Neutral
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DecisionHint {
    ConsiderInvesting,
    CautionAdvised,
    FurtherResearch,
}

impl DecisionHint {
    pub fn from_verdict(verdict: &SentimentVerdict) -> Self {
        let decisive = verdict.confidence > DECISIVE_CONFIDENCE;
        if decisive && verdict.recommendation.is_buy() {
            DecisionHint::ConsiderInvesting
        } else if decisive && verdict.recommendation.is_sell() {
            DecisionHint::CautionAdvised
        } else {
            DecisionHint::FurtherResearch
        }
    }

    pub fn headline(self) -> &'static str {
        match self {
            DecisionHint::ConsiderInvesting => "Consider Investing",
            DecisionHint::CautionAdvised => "Caution Advised",
            DecisionHint::FurtherResearch => "Further Research Needed",
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct AnalysisReport {
    pub stock: String,
    pub articles: Vec<Article>,
    pub verdict: SentimentVerdict,
    pub signal: SignalClass,
    pub decision: DecisionHint,
}

impl AnalysisReport {
    pub fn new(stock: impl Into<String>, articles: Vec<Article>, verdict: SentimentVerdict) -> Self {
        Self {
            stock: stock.into(),
            signal: SignalClass::from_score(verdict.sentiment_score),
            decision: DecisionHint::from_verdict(&verdict),
            articles,
            verdict,
        }
    }
}

/// Trimmed and upper-cased ticker; `None` when blank.
pub fn normalize_stock(input: &str) -> Option<String> {
    let stock = input.trim();
    if stock.is_empty() {
        return None;
    }
    Some(stock.to_uppercase())
}

/// Fetch, then analyze. `None` when the news source returned no articles.
pub async fn analyze_stock(
    news: &dyn NewsSource,
    analyzer: &SentimentAnalyzer,
    stock: &str,
    max_articles: usize,
) -> Option<AnalysisReport> {
    let articles = news.fetch_latest(stock, max_articles).await;
    if articles.is_empty() {
        tracing::info!(stock, provider = news.provider_name(), "no articles found");
        return None;
    }

    let verdict = analyzer.analyze(stock, &articles).await;
    tracing::info!(
        stock,
        articles = articles.len(),
        score = verdict.sentiment_score,
        label = %verdict.sentiment_label,
        "analysis complete"
    );
    Some(AnalysisReport::new(stock, articles, verdict))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::verdict::{Recommendation, SentimentLabel};

    fn verdict(score: f64, recommendation: Recommendation, confidence: u8) -> SentimentVerdict {
        SentimentVerdict {
            sentiment_score: score,
            sentiment_label: SentimentLabel::Neutral,
            recommendation,
            confidence,
            key_insights: vec![],
            risks: vec![],
            summary: String::new(),
        }
    }

    #[test]
    fn signal_thresholds_are_exclusive() {
        assert_eq!(SignalClass::from_score(0.6), SignalClass::Bullish);
        assert_eq!(SignalClass::from_score(0.3), SignalClass::Neutral);
        assert_eq!(SignalClass::from_score(0.0), SignalClass::Neutral);
        assert_eq!(SignalClass::from_score(-0.3), SignalClass::Neutral);
        assert_eq!(SignalClass::from_score(-0.31), SignalClass::Bearish);
    }

    #[test]
    fn decision_needs_confidence_above_seventy() {
        assert_eq!(
            DecisionHint::from_verdict(&verdict(0.6, Recommendation::Buy, 82)),
            DecisionHint::ConsiderInvesting
        );
        assert_eq!(
            DecisionHint::from_verdict(&verdict(0.6, Recommendation::StrongBuy, 70)),
            DecisionHint::FurtherResearch
        );
        assert_eq!(
            DecisionHint::from_verdict(&verdict(-0.8, Recommendation::StrongSell, 90)),
            DecisionHint::CautionAdvised
        );
        assert_eq!(
            DecisionHint::from_verdict(&verdict(0.0, Recommendation::Hold, 99)),
            DecisionHint::FurtherResearch
        );
    }

    #[test]
    fn label_and_signal_may_disagree() {
        let mut v = verdict(0.1, Recommendation::Buy, 60);
        v.sentiment_label = SentimentLabel::Bullish;
        let report = AnalysisReport::new("AAPL", vec![], v);
        assert_eq!(report.signal, SignalClass::Neutral);
    }

    #[test]
    fn normalizes_stock_input() {
        assert_eq!(normalize_stock("  tsla "), Some("TSLA".to_string()));
        assert_eq!(normalize_stock("   "), None);
    }
}
