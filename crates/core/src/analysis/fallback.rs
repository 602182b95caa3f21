use crate::domain::verdict::{Recommendation, SentimentLabel, SentimentVerdict};

/// The completion arrived but held no usable JSON.
pub fn parse_failure_verdict() -> SentimentVerdict {
    SentimentVerdict {
        sentiment_score: 0.0,
        sentiment_label: SentimentLabel::Neutral,
        recommendation: Recommendation::Hold,
        confidence: 0,
        key_insights: vec!["Error parsing AI response".to_string()],
        risks: vec!["Please try again".to_string()],
        summary: "The AI response couldn't be parsed. It might have returned unstructured text."
            .to_string(),
    }
}

/// The model could not be reached or answered with an unusable envelope.
pub fn api_error_verdict(err: &anyhow::Error) -> SentimentVerdict {
    SentimentVerdict {
        sentiment_score: 0.0,
        sentiment_label: SentimentLabel::Error,
        recommendation: Recommendation::Hold,
        confidence: 0,
        key_insights: vec!["API error occurred".to_string()],
        risks: vec!["Unable to complete analysis".to_string()],
        summary: format!("Error: {err:#}"),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use anyhow::Context;

    #[test]
    fn fallback_labels_are_distinguishable() {
        let err = anyhow::anyhow!("boom");
        assert_eq!(parse_failure_verdict().sentiment_label, SentimentLabel::Neutral);
        assert_eq!(api_error_verdict(&err).sentiment_label, SentimentLabel::Error);
    }

    #[test]
    fn api_error_summary_includes_the_error_chain() {
        let err = Err::<(), _>(anyhow::anyhow!("connection refused"))
            .context("groq request failed")
            .unwrap_err();
        let verdict = api_error_verdict(&err);
        assert_eq!(verdict.summary, "Error: groq request failed: connection refused");
    }
}
