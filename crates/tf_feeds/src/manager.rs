use std::sync::Arc;
use tf_core::{Article, Category, Config, LatestNews, PriceSource, PriceTick, Result};
use tf_storage::Cache;
use tokio_util::sync::CancellationToken;
use tracing::{info, warn};
use crate::fetcher::NewsFetcher;
use crate::prices::CoinGeckoFeed;
use crate::providers::create_provider;
use crate::transport::HttpTransport;

/// Outcome of fetching the page's two news sections.
#[derive(Debug)]
pub struct Sections {
    pub crypto: Result<Vec<Article>>,
    pub tech: Result<Vec<Article>>,
}

impl Sections {
    /// Interleaves whatever succeeded; a failed section contributes nothing.
    pub fn latest(&self, block_size: usize, visible: usize) -> LatestNews {
        let crypto = self.crypto.as_deref().unwrap_or_default();
        let tech = self.tech.as_deref().unwrap_or_default();
        LatestNews::build(crypto, tech, block_size, visible)
    }
}

/// Everything the site and CLI read from: news, prices and the cache behind them.
#[derive(Clone)]
pub struct FeedManager {
    config: Config,
    fetcher: NewsFetcher,
    prices: Arc<dyn PriceSource>,
}

impl FeedManager {
    pub fn new(config: Config, cache: Cache, transport: Arc<dyn HttpTransport>) -> Self {
        let provider = create_provider(&config, transport.clone());
        let prices = Arc::new(CoinGeckoFeed::new(&config, transport));
        info!("🦗 News provider ready: {}", provider.name());
        Self {
            fetcher: NewsFetcher::new(provider, cache),
            prices,
            config,
        }
    }

    pub fn with_price_source(mut self, prices: Arc<dyn PriceSource>) -> Self {
        self.prices = prices;
        self
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    pub fn fetcher(&self) -> &NewsFetcher {
        &self.fetcher
    }

    pub fn cache(&self) -> &Cache {
        self.fetcher.cache()
    }

    pub async fn news(&self, category: &Category) -> Result<Vec<Article>> {
        self.fetcher.fetch_category(category).await
    }

    /// Crypto and tech fetched concurrently under `token`.
    pub async fn sections(&self, token: &CancellationToken) -> Sections {
        let mut results = self
            .fetcher
            .fetch_sections(&[Category::Crypto, Category::Technology], token)
            .await
            .into_iter();

        // fetch_sections answers in request order
        let crypto = results.next().map(|(_, r)| r).unwrap_or_else(|| Ok(Vec::new()));
        let tech = results.next().map(|(_, r)| r).unwrap_or_else(|| Ok(Vec::new()));
        Sections { crypto, tech }
    }

    /// The mixed grid, failing only if both sections failed.
    pub async fn latest(&self, visible: usize, token: &CancellationToken) -> Result<LatestNews> {
        let sections = self.sections(token).await;
        match (sections.crypto, sections.tech) {
            (Err(e), Err(_)) => Err(e),
            (crypto, tech) => {
                if let Err(e) = &crypto {
                    warn!("Crypto news unavailable for the latest grid: {}", e);
                }
                if let Err(e) = &tech {
                    warn!("Tech news unavailable for the latest grid: {}", e);
                }
                let sections = Sections { crypto, tech };
                Ok(sections.latest(self.config.block_size, visible))
            }
        }
    }

    pub async fn prices(&self) -> Result<Vec<PriceTick>> {
        self.top_prices(self.config.price_limit).await
    }

    pub async fn top_prices(&self, limit: usize) -> Result<Vec<PriceTick>> {
        self.prices.fetch_prices(limit).await
    }
}
