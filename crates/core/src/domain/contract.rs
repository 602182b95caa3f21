use crate::domain::verdict::{Recommendation, SentimentLabel, SentimentVerdict, NO_SUMMARY};
use serde::Deserialize;
use serde_json::Value;

/// Verdict as the model wrote it. Every field is optional and untyped; defaults and range
/// corrections are applied in [`LlmVerdict::into_verdict`].
#[derive(Debug, Clone, Default, Deserialize)]
pub struct LlmVerdict {
    #[serde(default)]
    pub sentiment_score: Option<Value>,
    #[serde(default)]
    pub sentiment_label: Option<Value>,
    #[serde(default)]
    pub recommendation: Option<Value>,
    #[serde(default)]
    pub confidence: Option<Value>,
    #[serde(default)]
    pub key_insights: Option<Value>,
    #[serde(default)]
    pub risks: Option<Value>,
    #[serde(default)]
    pub summary: Option<Value>,
}

impl LlmVerdict {
    /// Only JSON objects are accepted (derived `Deserialize` would also take an array
    /// positionally).
    pub fn from_object(value: Value) -> anyhow::Result<Self> {
        anyhow::ensure!(
            value.is_object(),
            "expected a JSON object, got {}",
            json_kind(&value)
        );
        Ok(serde_json::from_value(value)?)
    }

    pub fn into_verdict(self) -> SentimentVerdict {
        let sentiment_score = match self.sentiment_score.as_ref().and_then(as_f64) {
            Some(score) if (-1.0..=1.0).contains(&score) => score,
            Some(score) => {
                let clamped = score.clamp(-1.0, 1.0);
                tracing::warn!(score, clamped, "sentiment_score outside [-1, 1]; clamped");
                clamped
            }
            None => {
                if self.sentiment_score.is_some() {
                    tracing::warn!(raw = ?self.sentiment_score, "sentiment_score not numeric; using 0");
                }
                0.0
            }
        };

        let sentiment_label = match self.sentiment_label.as_ref().and_then(Value::as_str) {
            Some(s) => SentimentLabel::from_model_str(s).unwrap_or_else(|| {
                tracing::warn!(label = s, "unknown sentiment_label; marking unrated");
                SentimentLabel::Unrated
            }),
            None => SentimentLabel::Unrated,
        };

        let recommendation = match self.recommendation.as_ref().and_then(Value::as_str) {
            Some(s) => Recommendation::from_model_str(s).unwrap_or_else(|| {
                tracing::warn!(recommendation = s, "unknown recommendation; using Hold");
                Recommendation::Hold
            }),
            None => Recommendation::Hold,
        };

        let confidence = match self.confidence.as_ref().and_then(as_f64) {
            Some(c) => {
                let rounded = c.round();
                if !(0.0..=100.0).contains(&rounded) {
                    tracing::warn!(confidence = c, "confidence outside [0, 100]; clamped");
                }
                rounded.clamp(0.0, 100.0) as u8
            }
            None => 0,
        };

        let summary = match self.summary {
            Some(Value::String(s)) if !s.trim().is_empty() => s,
            _ => NO_SUMMARY.to_string(),
        };

        SentimentVerdict {
            sentiment_score,
            sentiment_label,
            recommendation,
            confidence,
            key_insights: string_list(self.key_insights),
            risks: string_list(self.risks),
            summary,
        }
    }
}

fn json_kind(v: &Value) -> &'static str {
    match v {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}

fn as_f64(v: &Value) -> Option<f64> {
    match v {
        Value::Number(n) => n.as_f64(),
        Value::String(s) => s.trim().parse::<f64>().ok().filter(|f| f.is_finite()),
        _ => None,
    }
}

fn string_list(v: Option<Value>) -> Vec<String> {
    match v {
        Some(Value::Array(items)) => items
            .into_iter()
            .filter_map(|item| match item {
                Value::String(s) => Some(s),
                _ => None,
            })
            .collect(),
        Some(Value::String(s)) if !s.trim().is_empty() => vec![s],
        _ => Vec::new(),
    }
}
