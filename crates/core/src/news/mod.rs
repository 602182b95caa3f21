pub mod gnews;
pub mod placeholder;

use crate::domain::article::Article;

pub use placeholder::placeholder_articles;

#[async_trait::async_trait]
pub trait NewsSource: Send + Sync {
    fn provider_name(&self) -> &'static str;

    /// Up to `max_articles` recent articles about `stock`. Never fails: transport problems
    /// degrade to [`placeholder_articles`]. An empty result means the source answered but
    /// had nothing.
    async fn fetch_latest(&self, stock: &str, max_articles: usize) -> Vec<Article>;
}
