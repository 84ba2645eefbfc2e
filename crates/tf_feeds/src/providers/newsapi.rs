use async_trait::async_trait;
use serde::Deserialize;
use serde_json::Value;
use std::fmt;
use std::sync::Arc;
use tf_core::{Article, Category, Config, Error, NewsProvider, Result};
use tracing::{debug, warn};
use super::utils;
use crate::transport::HttpTransport;

const CRYPTO_QUERY: &str = "crypto OR blockchain";

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct NewsApiArticle {
    title: Option<String>,
    url: Option<String>,
    url_to_image: Option<String>,
    description: Option<String>,
    published_at: Option<String>,
}

/// newsapi.org. A response without an `articles` array yields no articles.
pub struct NewsApiProvider {
    transport: Arc<dyn HttpTransport>,
    api_key: Option<String>,
    base_url: String,
    language: String,
    page_size: usize,
}

impl NewsApiProvider {
    pub fn new(config: &Config, transport: Arc<dyn HttpTransport>) -> Self {
        Self {
            transport,
            api_key: config.news_api_key.clone(),
            base_url: config.newsapi_base_url.clone(),
            language: config.language.clone(),
            page_size: config.page_size,
        }
    }

    fn request_for(&self, category: &Category) -> (&'static str, Vec<(&'static str, String)>) {
        let (path, selector) = match category {
            Category::Crypto => ("/v2/everything", ("q", CRYPTO_QUERY.to_string())),
            Category::Technology => ("/v2/top-headlines", ("category", "technology".to_string())),
            Category::Other(query) => ("/v2/everything", ("q", query.clone())),
        };

        let query = vec![
            selector,
            ("sortBy", "publishedAt".to_string()),
            ("language", self.language.clone()),
            ("pageSize", self.page_size.to_string()),
            ("apiKey", self.api_key.clone().unwrap_or_default()),
        ];
        (path, query)
    }

    fn parse(&self, body: Value, category: &Category) -> Result<Vec<Article>> {
        if body.get("status").and_then(Value::as_str) == Some("error") {
            let message = body
                .get("message")
                .and_then(Value::as_str)
                .unwrap_or("unknown error");
            return Err(Error::Fetch(format!("NewsAPI error: {}", message)));
        }

        let Some(raw_articles) = body.get("articles").and_then(Value::as_array) else {
            warn!("NewsAPI response for '{}' has no articles", category);
            return Ok(Vec::new());
        };

        Ok(raw_articles
            .iter()
            .filter_map(|raw| match serde_json::from_value::<NewsApiArticle>(raw.clone()) {
                Ok(article) => Some(article),
                Err(e) => {
                    debug!("Skipping malformed NewsAPI article: {}", e);
                    None
                }
            })
            .filter_map(|raw| {
                let title = utils::non_empty(raw.title)?;
                let url = utils::non_empty(raw.url)?;
                Some(Article {
                    title,
                    url,
                    image_url: utils::non_empty(raw.url_to_image),
                    published_at: utils::non_empty(raw.published_at),
                    summary: utils::non_empty(raw.description),
                    category: category.clone(),
                })
            })
            .collect())
    }
}

impl fmt::Debug for NewsApiProvider {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("NewsApiProvider")
            .field("api_key", &self.api_key.as_deref().map(|_| "<redacted>"))
            .field("base_url", &self.base_url)
            .field("language", &self.language)
            .finish()
    }
}

#[async_trait]
impl NewsProvider for NewsApiProvider {
    fn name(&self) -> &str {
        "NewsAPI"
    }

    fn cache_prefix(&self) -> &str {
        "newsapi"
    }

    fn ensure_configured(&self) -> Result<()> {
        match self.api_key {
            Some(_) => Ok(()),
            None => Err(Error::Configuration(format!(
                "News API key is not configured; set {}",
                tf_core::config::NEWS_API_KEY_ENV
            ))),
        }
    }

    async fn fetch(&self, category: &Category) -> Result<Vec<Article>> {
        self.ensure_configured()?;
        let (path, query) = self.request_for(category);
        let url = utils::endpoint(&self.base_url, path)?;
        let body = self.transport.get_json(&url, &query).await?;
        self.parse(body, category)
    }
}
