use async_trait::async_trait;
use serde::Deserialize;
use serde_json::Value;
use std::fmt;
use std::sync::Arc;
use tf_core::{Article, Category, Config, Error, NewsProvider, Result};
use tracing::{debug, error};
use super::utils;
use crate::transport::HttpTransport;

#[derive(Debug, Deserialize)]
struct NewsDataArticle {
    title: Option<String>,
    link: Option<String>,
    image_url: Option<String>,
    description: Option<String>,
    #[serde(rename = "pubDate")]
    pub_date: Option<String>,
}

/// newsdata.io `latest` endpoint. Unlike NewsAPI, a response without a
/// `results` array is a fetch error.
pub struct NewsDataProvider {
    transport: Arc<dyn HttpTransport>,
    api_key: Option<String>,
    base_url: String,
    language: String,
    page_size: usize,
}

impl NewsDataProvider {
    pub fn new(config: &Config, transport: Arc<dyn HttpTransport>) -> Self {
        Self {
            transport,
            api_key: config.newsdata_api_key.clone(),
            base_url: config.newsdata_base_url.clone(),
            language: config.language.clone(),
            page_size: config.page_size,
        }
    }

    fn query_for(&self, category: &Category) -> Vec<(&'static str, String)> {
        let mut query = vec![
            ("apikey", self.api_key.clone().unwrap_or_default()),
            ("language", self.language.clone()),
            ("size", self.page_size.to_string()),
        ];
        match category {
            Category::Crypto | Category::Technology => query.push(("category", category.slug().to_string())),
            Category::Other(q) => query.push(("q", q.clone())),
        }
        query
    }

    fn parse(&self, body: Value, category: &Category) -> Result<Vec<Article>> {
        if body.get("status").and_then(Value::as_str) == Some("error") {
            let message = body
                .pointer("/results/message")
                .and_then(Value::as_str)
                .unwrap_or("unknown error");
            return Err(Error::Fetch(format!("NewsData error: {}", message)));
        }

        let Some(results) = body.get("results").and_then(Value::as_array) else {
            error!("No articles found for '{}' in the NewsData response or the format is invalid", category);
            return Err(Error::Fetch(format!(
                "NewsData response for '{}' has no results",
                category.slug()
            )));
        };

        Ok(results
            .iter()
            .filter_map(|raw| match serde_json::from_value::<NewsDataArticle>(raw.clone()) {
                Ok(article) => Some(article),
                Err(e) => {
                    debug!("Skipping malformed NewsData article: {}", e);
                    None
                }
            })
            .filter_map(|raw| {
                Some(Article {
                    title: utils::non_empty(raw.title)?,
                    url: utils::non_empty(raw.link)?,
                    image_url: utils::non_empty(raw.image_url),
                    published_at: utils::non_empty(raw.pub_date),
                    summary: utils::non_empty(raw.description),
                    category: category.clone(),
                })
            })
            .collect())
    }
}

impl fmt::Debug for NewsDataProvider {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("NewsDataProvider")
            .field("api_key", &self.api_key.as_deref().map(|_| "<redacted>"))
            .field("base_url", &self.base_url)
            .field("language", &self.language)
            .finish()
    }
}

#[async_trait]
impl NewsProvider for NewsDataProvider {
    fn name(&self) -> &str {
        "NewsData"
    }

    fn cache_prefix(&self) -> &str {
        "newsdata"
    }

    fn ensure_configured(&self) -> Result<()> {
        match self.api_key {
            Some(_) => Ok(()),
            None => Err(Error::Configuration(format!(
                "NewsData API key is not configured; set {}",
                tf_core::config::NEWSDATA_API_KEY_ENV
            ))),
        }
    }

    async fn fetch(&self, category: &Category) -> Result<Vec<Article>> {
        self.ensure_configured()?;
        let url = utils::endpoint(&self.base_url, "/api/1/latest")?;
        let body = self.transport.get_json(&url, &self.query_for(category)).await?;
        self.parse(body, category)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::transport::CannedTransport;
    use serde_json::json;

    fn provider(transport: Arc<CannedTransport>) -> NewsDataProvider {
        let config = Config::default().with_newsdata_api_key(Some("nd-key".to_string()));
        NewsDataProvider::new(&config, transport)
    }

    #[tokio::test]
    async fn test_query_parameters() {
        let transport = Arc::new(CannedTransport::new().respond("/api/1/latest", json!({"status": "success", "results": []})));
        let provider = provider(transport.clone());

        provider.fetch(&Category::Crypto).await.unwrap();
        provider.fetch(&Category::Other("solana".to_string())).await.unwrap();

        let requests = transport.requests();
        assert_eq!(requests[0].url, "https://newsdata.io/api/1/latest");
        assert_eq!(requests[0].param("apikey"), Some("nd-key"));
        assert_eq!(requests[0].param("language"), Some("en"));
        assert_eq!(requests[0].param("size"), Some("10"));
        assert_eq!(requests[0].param("category"), Some("cryptocurrency"));
        assert_eq!(requests[1].param("category"), None);
        assert_eq!(requests[1].param("q"), Some("solana"));
    }

    #[tokio::test]
    async fn test_maps_provider_fields() {
        let transport = Arc::new(CannedTransport::new().respond(
            "/api/1/latest",
            json!({
                "status": "success",
                "totalResults": 3,
                "results": [
                    {"article_id": "1", "title": "Chip shortage eases", "link": "https://n.test/1",
                     "image_url": null, "description": "Supply recovers", "pubDate": "2024-05-01 09:00:00",
                     "source_id": "n", "source_name": "N"},
                    {"article_id": "2", "title": "", "link": "https://n.test/2"},
                    {"article_id": "3", "title": "New GPU", "link": "https://n.test/3", "image_url": "https://n.test/3.jpg"}
                ]
            }),
        ));

        let articles = provider(transport).fetch(&Category::Technology).await.unwrap();
        assert_eq!(articles.len(), 2);
        assert_eq!(articles[0].url, "https://n.test/1");
        assert_eq!(articles[0].summary.as_deref(), Some("Supply recovers"));
        assert_eq!(articles[0].published_at.as_deref(), Some("2024-05-01 09:00:00"));
        assert!(articles[0].image_url.is_none());
        assert_eq!(articles[1].image_url.as_deref(), Some("https://n.test/3.jpg"));
        assert!(articles.iter().all(|a| a.category == Category::Technology));
    }

    #[tokio::test]
    async fn test_missing_results_is_fetch_error() {
        let transport = Arc::new(CannedTransport::new().respond("/api/1/latest", json!({"status": "success"})));
        let err = provider(transport).fetch(&Category::Crypto).await.unwrap_err();
        assert!(matches!(err, Error::Fetch(_)));
    }

    #[tokio::test]
    async fn test_error_status_message() {
        let transport = Arc::new(CannedTransport::new().respond(
            "/api/1/latest",
            json!({"status": "error", "results": {"message": "API key invalid", "code": "Unauthorized"}}),
        ));
        let err = provider(transport).fetch(&Category::Crypto).await.unwrap_err();
        assert!(err.to_string().contains("API key invalid"));
    }
}
