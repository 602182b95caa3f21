use crate::domain::article::Article;
use crate::llm::CompletionRequest;

pub const SYSTEM_PROMPT: &str =
    "You are a financial analyst AI. Always respond with valid JSON only.";

const MAX_TITLE_CHARS: usize = 200;
const MAX_DESCRIPTION_CHARS: usize = 500;

/// `title (source)` then the description, one blank line between articles.
pub fn news_block(articles: &[Article]) -> String {
    articles
        .iter()
        .map(|a| {
            format!(
                "{} ({})\n{}",
                truncate_chars(a.title.trim(), MAX_TITLE_CHARS),
                a.source.trim(),
                truncate_chars(a.description.trim(), MAX_DESCRIPTION_CHARS)
            )
        })
        .collect::<Vec<_>>()
        .join("\n\n")
}

pub fn user_prompt(stock: &str, articles: &[Article]) -> String {
    let framing = [
        "Base your evaluation on these fundamental-analysis categories:",
        "- Profitability: net profit margin, gross profit margin, earnings per share (EPS), return on equity (ROE).",
        "- Liquidity: current ratio and quick ratio (ability to meet short-term obligations).",
        "- Solvency/Leverage: debt-to-equity ratio (long-term debt management).",
        "- Efficiency: inventory turnover and accounts receivable turnover.",
    ]
    .join("\n");

    let schema = [
        "{",
        "  \"sentiment_score\": <number between -1 (very bearish) and 1 (very bullish)>,",
        "  \"sentiment_label\": \"<Strongly Bullish|Bullish|Neutral|Bearish|Strongly Bearish>\",",
        "  \"recommendation\": \"<Strong Buy|Buy|Hold|Sell|Strong Sell>\",",
        "  \"confidence\": <integer between 0 and 100>,",
        "  \"key_insights\": [\"<insight 1>\", \"<insight 2>\", \"<insight 3>\"],",
        "  \"risks\": [\"<risk 1>\", \"<risk 2>\"],",
        "  \"summary\": \"<2-3 sentence summary of the analysis>\"",
        "}",
    ]
    .join("\n");

    format!(
        "You are an expert financial analyst. Analyze the following news articles about {stock} \
and provide an investment sentiment analysis.\n\n\
{framing}\n\n\
NEWS ARTICLES:\n{news}\n\n\
Respond with a single JSON object in exactly this format. The object is your entire response: \
no markdown, no prose before or after it.\n{schema}",
        news = news_block(articles),
    )
}

pub fn completion_request(stock: &str, articles: &[Article]) -> CompletionRequest {
    CompletionRequest {
        system: SYSTEM_PROMPT.to_string(),
        user: user_prompt(stock, articles),
    }
}

fn truncate_chars(s: &str, max_chars: usize) -> &str {
    match s.char_indices().nth(max_chars) {
        Some((idx, _)) => &s[..idx],
        None => s,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn article(title: &str, source: &str, description: &str) -> Article {
        Article {
            title: title.to_string(),
            description: description.to_string(),
            source: source.to_string(),
            url: "https://example.com".to_string(),
            published_at: "2026-10-16T00:00:00Z".to_string(),
        }
    }

    #[test]
    fn news_block_separates_articles_with_blank_line() {
        let block = news_block(&[
            article("Earnings beat", "Reuters", "Revenue up 8%."),
            article("Guidance raised", "Bloomberg", "Full-year outlook lifted."),
        ]);
        assert_eq!(
            block,
            "Earnings beat (Reuters)\nRevenue up 8%.\n\nGuidance raised (Bloomberg)\nFull-year outlook lifted."
        );
    }

    #[test]
    fn truncation_respects_char_boundaries() {
        let long = "é".repeat(MAX_DESCRIPTION_CHARS + 10);
        let block = news_block(&[article("t", "s", &long)]);
        let description = block.lines().nth(1).unwrap();
        assert_eq!(description.chars().count(), MAX_DESCRIPTION_CHARS);
    }

    #[test]
    fn prompt_names_schema_framing_and_stock() {
        let prompt = user_prompt("AAPL", &[article("Earnings beat", "Reuters", "Revenue up.")]);
        assert!(prompt.contains("about AAPL"));
        for needle in [
            "Profitability",
            "Liquidity",
            "Leverage",
            "Efficiency",
            "\"sentiment_score\"",
            "Strongly Bullish|Bullish|Neutral|Bearish|Strongly Bearish",
            "Strong Buy|Buy|Hold|Sell|Strong Sell",
            "entire response",
            "Earnings beat (Reuters)",
        ] {
            assert!(prompt.contains(needle), "missing {needle}");
        }
    }

    #[test]
    fn system_prompt_demands_json_only() {
        let req = completion_request("MSFT", &[]);
        assert!(req.system.contains("valid JSON only"));
    }
}
