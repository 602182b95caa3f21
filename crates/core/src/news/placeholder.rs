use crate::domain::article::Article;

/// Deterministic synthetic articles used when the news source is unreachable.
/// Every title mentions `stock`.
pub fn placeholder_articles(stock: &str, max_articles: usize) -> Vec<Article> {
    let articles = [
        (
            format!("{stock} Reports Strong Quarterly Earnings, Stock Surges 5%"),
            format!(
                "{stock} exceeded analyst expectations with record revenue growth driven by strong demand in key markets."
            ),
            "Financial Times",
            "2026-01-22T10:00:00Z",
        ),
        (
            format!("Analysts Upgrade {stock} Rating to 'Buy' After Positive Outlook"),
            format!(
                "Major investment banks have upgraded {stock} citing robust fundamentals and growth potential."
            ),
            "Bloomberg",
            "2026-01-22T08:30:00Z",
        ),
        (
            format!("{stock} Announces New Strategic Partnership"),
            format!(
                "The partnership is expected to drive innovation and expand market reach for {stock}."
            ),
            "Reuters",
            "2026-01-21T15:00:00Z",
        ),
    ];

    articles
        .into_iter()
        .take(max_articles.max(1))
        .map(|(title, description, source, published_at)| Article {
            title,
            description,
            source: source.to_string(),
            url: "#".to_string(),
            published_at: published_at.to_string(),
        })
        .collect()
}
