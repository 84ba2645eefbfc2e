use futures::future::join_all;
use std::sync::Arc;
use tf_core::{Article, Category, Error, NewsProvider, Result};
use tf_storage::Cache;
use tokio_util::sync::CancellationToken;
use tracing::{error, info};

/// Cache-first access to a news provider.
#[derive(Clone)]
pub struct NewsFetcher {
    provider: Arc<dyn NewsProvider>,
    cache: Cache,
}

impl NewsFetcher {
    pub fn new(provider: Arc<dyn NewsProvider>, cache: Cache) -> Self {
        Self { provider, cache }
    }

    pub fn provider(&self) -> &Arc<dyn NewsProvider> {
        &self.provider
    }

    pub fn cache(&self) -> &Cache {
        &self.cache
    }

    /// `newsdata_news_technology`, `newsapi_news_cryptocurrency`, ...
    pub fn cache_key(&self, category: &Category) -> String {
        format!("{}_news_{}", self.provider.cache_prefix(), category.slug())
    }

    pub async fn fetch_category(&self, category: &Category) -> Result<Vec<Article>> {
        self.fetch(category, None).await
    }

    /// Like `fetch_category`, but gives up with `Error::Cancelled` once
    /// `token` fires. A cancelled fetch never writes to the cache.
    pub async fn fetch_category_cancellable(
        &self,
        category: &Category,
        token: &CancellationToken,
    ) -> Result<Vec<Article>> {
        self.fetch(category, Some(token)).await
    }

    /// Fetches several categories concurrently. Each one settles on its own.
    pub async fn fetch_sections(
        &self,
        categories: &[Category],
        token: &CancellationToken,
    ) -> Vec<(Category, Result<Vec<Article>>)> {
        let futures = categories.iter().map(|category| async move {
            let result = self.fetch_category_cancellable(category, token).await;
            (category.clone(), result)
        });
        join_all(futures).await
    }

    async fn fetch(&self, category: &Category, token: Option<&CancellationToken>) -> Result<Vec<Article>> {
        self.provider.ensure_configured()?;

        let key = self.cache_key(category);
        if let Some(cached) = self.cache.read::<Vec<Article>>(&key).await {
            return Ok(cached);
        }

        info!("📰 Fetching '{}' from {}", category, self.provider.name());
        let result = match token {
            Some(token) => {
                if token.is_cancelled() {
                    return Err(Error::Cancelled);
                }
                tokio::select! {
                    biased;
                    _ = token.cancelled() => return Err(Error::Cancelled),
                    result = self.provider.fetch(category) => result,
                }
            }
            None => self.provider.fetch(category).await,
        };

        let articles = result.map_err(|e| {
            error!("Error fetching '{}' from {}: {}", category, self.provider.name(), e);
            e
        })?;

        // The owner may have gone away while the request was in flight
        if token.is_some_and(CancellationToken::is_cancelled) {
            return Err(Error::Cancelled);
        }

        info!("✨ Fetched {} articles for '{}'", articles.len(), category);
        self.cache.write(&key, &articles).await;
        Ok(articles)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::time::Duration;
    use tf_core::{CacheBackend, ManualClock};
    use tf_storage::MemoryBackend;
    use tokio::sync::Notify;

    /// Provider returning a fixed list, optionally parking until released.
    struct StubProvider {
        articles: Vec<Article>,
        calls: AtomicUsize,
        configured: bool,
        gate: Option<Arc<Notify>>,
        cancel_on_fetch: Option<CancellationToken>,
    }

    impl StubProvider {
        fn new(articles: Vec<Article>) -> Self {
            Self { articles, calls: AtomicUsize::new(0), configured: true, gate: None, cancel_on_fetch: None }
        }
    }

    #[async_trait]
    impl NewsProvider for StubProvider {
        fn name(&self) -> &str {
            "stub"
        }

        fn cache_prefix(&self) -> &str {
            "stub"
        }

        fn ensure_configured(&self) -> Result<()> {
            if self.configured {
                Ok(())
            } else {
                Err(Error::Configuration("no key".to_string()))
            }
        }

        async fn fetch(&self, category: &Category) -> Result<Vec<Article>> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            if let Some(gate) = &self.gate {
                gate.notified().await;
            }
            if let Some(token) = &self.cancel_on_fetch {
                token.cancel();
            }
            if let Category::Other(q) = category {
                if q == "broken" {
                    return Err(Error::Fetch("boom".to_string()));
                }
            }
            Ok(self.articles.clone())
        }
    }

    fn sample() -> Vec<Article> {
        vec![
            Article::new("one", "https://s.test/1", Category::Crypto),
            Article::new("two", "https://s.test/2", Category::Crypto),
        ]
    }

    fn fetcher(provider: Arc<StubProvider>) -> (NewsFetcher, MemoryBackend, Arc<ManualClock>) {
        let backend = MemoryBackend::new();
        let clock = Arc::new(ManualClock::new(0));
        let cache = Cache::new(Arc::new(backend.clone()), Duration::from_secs(600)).with_clock(clock.clone());
        (NewsFetcher::new(provider, cache), backend, clock)
    }

    #[tokio::test]
    async fn test_cache_hit_skips_provider() {
        let provider = Arc::new(StubProvider::new(sample()));
        let (fetcher, backend, clock) = fetcher(provider.clone());

        assert_eq!(fetcher.fetch_category(&Category::Crypto).await.unwrap(), sample());
        assert_eq!(fetcher.fetch_category(&Category::Crypto).await.unwrap(), sample());
        assert_eq!(provider.calls.load(Ordering::SeqCst), 1);
        assert!(backend.get_item("stub_news_cryptocurrency").await.unwrap().is_some());

        clock.advance_ms(600_000);
        fetcher.fetch_category(&Category::Crypto).await.unwrap();
        assert_eq!(provider.calls.load(Ordering::SeqCst), 2);
    }

    #[tokio::test]
    async fn test_unconfigured_provider_fails_first() {
        let mut stub = StubProvider::new(sample());
        stub.configured = false;
        let provider = Arc::new(stub);
        let (fetcher, _, _) = fetcher(provider.clone());

        let err = fetcher.fetch_category(&Category::Crypto).await.unwrap_err();
        assert!(err.is_configuration_error());
        assert_eq!(provider.calls.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn test_failure_is_not_cached() {
        let provider = Arc::new(StubProvider::new(sample()));
        let (fetcher, backend, _) = fetcher(provider);
        let err = fetcher.fetch_category(&Category::Other("broken".to_string())).await.unwrap_err();
        assert!(err.is_fetch_error());
        assert!(backend.is_empty().await);
    }

    #[tokio::test]
    async fn test_cancel_while_in_flight() {
        let gate = Arc::new(Notify::new());
        let mut stub = StubProvider::new(sample());
        stub.gate = Some(gate.clone());
        let (fetcher, backend, _) = fetcher(Arc::new(stub));

        let token = CancellationToken::new();
        let task = {
            let fetcher = fetcher.clone();
            let token = token.clone();
            tokio::spawn(async move { fetcher.fetch_category_cancellable(&Category::Crypto, &token).await })
        };

        token.cancel();
        let result = task.await.unwrap();
        assert!(matches!(result, Err(Error::Cancelled)));
        assert!(backend.is_empty().await);
        gate.notify_waiters();
    }

    #[tokio::test]
    async fn test_cancel_after_response_discards_result() {
        let token = CancellationToken::new();
        let mut stub = StubProvider::new(sample());
        stub.cancel_on_fetch = Some(token.clone());
        let (fetcher, backend, _) = fetcher(Arc::new(stub));

        let result = fetcher.fetch_category_cancellable(&Category::Crypto, &token).await;
        assert!(matches!(result, Err(Error::Cancelled)));
        assert!(backend.is_empty().await);
    }

    #[tokio::test]
    async fn test_sections_settle_independently() {
        let provider = Arc::new(StubProvider::new(sample()));
        let (fetcher, _, _) = fetcher(provider);

        let categories = [Category::Crypto, Category::Other("broken".to_string())];
        let results = fetcher.fetch_sections(&categories, &CancellationToken::new()).await;

        assert_eq!(results.len(), 2);
        assert_eq!(results[0].0, Category::Crypto);
        assert_eq!(results[0].1.as_ref().unwrap().len(), 2);
        assert!(results[1].1.is_err());
    }
}
