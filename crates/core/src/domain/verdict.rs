use serde::{Deserialize, Serialize};
use std::fmt;

pub const NO_SUMMARY: &str = "No summary available.";

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SentimentVerdict {
    /// In [-1.0, 1.0].
    pub sentiment_score: f64,
    pub sentiment_label: SentimentLabel,
    pub recommendation: Recommendation,
    /// In [0, 100].
    pub confidence: u8,
    pub key_insights: Vec<String>,
    pub risks: Vec<String>,
    pub summary: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum SentimentLabel {
    #[serde(rename = "Strongly Bullish")]
    StronglyBullish,
    Bullish,
    Neutral,
    Bearish,
    #[serde(rename = "Strongly Bearish")]
    StronglyBearish,
    /// Only produced by the infrastructure-failure fallback.
    Error,
    /// Label absent or not one of the five model labels.
    #[serde(rename = "N/A")]
    Unrated,
}

impl SentimentLabel {
    /// Labels a model is allowed to emit.
    pub const MODEL_LABELS: [SentimentLabel; 5] = [
        SentimentLabel::StronglyBullish,
        SentimentLabel::Bullish,
        SentimentLabel::Neutral,
        SentimentLabel::Bearish,
        SentimentLabel::StronglyBearish,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            SentimentLabel::StronglyBullish => "Strongly Bullish",
            SentimentLabel::Bullish => "Bullish",
            SentimentLabel::Neutral => "Neutral",
            SentimentLabel::Bearish => "Bearish",
            SentimentLabel::StronglyBearish => "Strongly Bearish",
            SentimentLabel::Error => "Error",
            SentimentLabel::Unrated => "N/A",
        }
    }

    pub fn from_model_str(s: &str) -> Option<Self> {
        let s = s.trim();
        Self::MODEL_LABELS
            .into_iter()
            .find(|label| label.as_str().eq_ignore_ascii_case(s))
    }
}

impl fmt::Display for SentimentLabel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Recommendation {
    #[serde(rename = "Strong Buy")]
    StrongBuy,
    Buy,
    Hold,
    Sell,
    #[serde(rename = "Strong Sell")]
    StrongSell,
}

impl Recommendation {
    pub const ALL: [Recommendation; 5] = [
        Recommendation::StrongBuy,
        Recommendation::Buy,
        Recommendation::Hold,
        Recommendation::Sell,
        Recommendation::StrongSell,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            Recommendation::StrongBuy => "Strong Buy",
            Recommendation::Buy => "Buy",
            Recommendation::Hold => "Hold",
            Recommendation::Sell => "Sell",
            Recommendation::StrongSell => "Strong Sell",
        }
    }

    pub fn from_model_str(s: &str) -> Option<Self> {
        let s = s.trim();
        Self::ALL
            .into_iter()
            .find(|rec| rec.as_str().eq_ignore_ascii_case(s))
    }

    pub fn is_buy(self) -> bool {
        matches!(self, Recommendation::StrongBuy | Recommendation::Buy)
    }

    pub fn is_sell(self) -> bool {
        matches!(self, Recommendation::StrongSell | Recommendation::Sell)
    }
}

impl fmt::Display for Recommendation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn serializes_with_wire_names() {
        let verdict = SentimentVerdict {
            sentiment_score: -0.7,
            sentiment_label: SentimentLabel::StronglyBearish,
            recommendation: Recommendation::StrongSell,
            confidence: 64,
            key_insights: vec!["guidance cut".to_string()],
            risks: vec![],
            summary: "Weak quarter.".to_string(),
        };

        let v = serde_json::to_value(&verdict).unwrap();
        assert_eq!(v["sentiment_label"], json!("Strongly Bearish"));
        assert_eq!(v["recommendation"], json!("Strong Sell"));
        assert_eq!(v["confidence"], json!(64));
    }

    #[test]
    fn unrated_serializes_as_na() {
        assert_eq!(
            serde_json::to_value(SentimentLabel::Unrated).unwrap(),
            json!("N/A")
        );
    }

    #[test]
    fn model_strings_match_case_insensitively() {
        assert_eq!(
            SentimentLabel::from_model_str(" strongly bullish "),
            Some(SentimentLabel::StronglyBullish)
        );
        assert_eq!(Recommendation::from_model_str("HOLD"), Some(Recommendation::Hold));
        // The fallback-only labels are not accepted from a model.
        assert_eq!(SentimentLabel::from_model_str("Error"), None);
        assert_eq!(SentimentLabel::from_model_str("N/A"), None);
        assert_eq!(Recommendation::from_model_str("Accumulate"), None);
    }
}
