use async_trait::async_trait;
use crate::types::{Article, Category, PriceTick};
use crate::Result;

/// A news-aggregation API that can list articles for a category.
#[async_trait]
pub trait NewsProvider: Send + Sync {
    /// Human readable provider name
    fn name(&self) -> &str;

    /// Prefix for cache keys, e.g. `newsdata` gives `newsdata_news_technology`
    fn cache_prefix(&self) -> &str;

    /// Fails with a configuration error when the provider cannot be called at all
    fn ensure_configured(&self) -> Result<()>;

    /// Fetches articles for `category`, in provider order
    async fn fetch(&self, category: &Category) -> Result<Vec<Article>>;
}

/// Source of current market prices for the ticker.
#[async_trait]
pub trait PriceSource: Send + Sync {
    async fn fetch_prices(&self, limit: usize) -> Result<Vec<PriceTick>>;
}
