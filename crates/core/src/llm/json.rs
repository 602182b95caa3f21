use crate::domain::contract::LlmVerdict;
use crate::domain::verdict::SentimentVerdict;
use std::fmt;

/// Ways of locating a JSON object inside a free-text completion, tried in `ORDER`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ParseStrategy {
    /// First '{' to last '}' inclusive.
    BracketScan,
    /// The whole trimmed completion.
    WholeText,
}

impl ParseStrategy {
    pub const ORDER: [ParseStrategy; 2] = [ParseStrategy::BracketScan, ParseStrategy::WholeText];

    pub fn name(self) -> &'static str {
        match self {
            ParseStrategy::BracketScan => "bracket_scan",
            ParseStrategy::WholeText => "whole_text",
        }
    }

    pub fn candidate(self, trimmed: &str) -> Option<&str> {
        match self {
            ParseStrategy::BracketScan => bracket_span(trimmed),
            ParseStrategy::WholeText => Some(trimmed),
        }
    }
}

pub fn bracket_span(text: &str) -> Option<&str> {
    let start = text.find('{')?;
    let end = text.rfind('}')?;
    if end <= start {
        return None;
    }
    Some(&text[start..=end])
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParseAttempt {
    pub strategy: ParseStrategy,
    pub error: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum VerdictParseError {
    EmptyCompletion,
    NoValidJson { attempts: Vec<ParseAttempt> },
}

impl fmt::Display for VerdictParseError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            VerdictParseError::EmptyCompletion => f.write_str("empty completion from LLM"),
            VerdictParseError::NoValidJson { attempts } => {
                f.write_str("no valid JSON object in completion")?;
                for attempt in attempts {
                    write!(f, "; {}: {}", attempt.strategy.name(), attempt.error)?;
                }
                Ok(())
            }
        }
    }
}

impl std::error::Error for VerdictParseError {}

pub fn parse_verdict(text: &str) -> Result<SentimentVerdict, VerdictParseError> {
    let trimmed = text.trim();
    if trimmed.is_empty() {
        return Err(VerdictParseError::EmptyCompletion);
    }

    let mut attempts = Vec::with_capacity(ParseStrategy::ORDER.len());
    let mut tried: Vec<&str> = Vec::new();
    for strategy in ParseStrategy::ORDER {
        let Some(candidate) = strategy.candidate(trimmed) else {
            attempts.push(ParseAttempt {
                strategy,
                error: "no candidate span".to_string(),
            });
            continue;
        };
        if tried.contains(&candidate) {
            continue;
        }
        tried.push(candidate);

        match decode_candidate(candidate) {
            Ok(verdict) => {
                tracing::debug!(strategy = strategy.name(), "parsed LLM verdict");
                return Ok(verdict);
            }
            Err(err) => attempts.push(ParseAttempt {
                strategy,
                error: format!("{err:#}"),
            }),
        }
    }

    Err(VerdictParseError::NoValidJson { attempts })
}

fn decode_candidate(candidate: &str) -> anyhow::Result<SentimentVerdict> {
    let value = serde_json::from_str::<serde_json::Value>(candidate)?;
    Ok(LlmVerdict::from_object(value)?.into_verdict())
}
