use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Article {
    pub title: String,
    pub description: String,
    pub source: String,
    pub url: String,
    #[serde(rename = "publishedAt")]
    pub published_at: String,
}
