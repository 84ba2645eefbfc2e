use std::fmt;
use std::str::FromStr;
use std::time::Duration;

pub const NEWS_API_KEY_ENV: &str = "NEXT_PUBLIC_NEWS_API_KEY";
pub const NEWSDATA_API_KEY_ENV: &str = "NEXT_PUBLIC_NEWSDATA_API_KEY";

/// Cached news stays valid for ten minutes.
pub const DEFAULT_CACHE_TTL: Duration = Duration::from_secs(10 * 60);

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ProviderKind {
    /// newsdata.io `latest` endpoint
    #[default]
    NewsData,
    /// newsapi.org `everything` / `top-headlines`
    NewsApi,
}

impl FromStr for ProviderKind {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "newsdata" | "newsdata.io" => Ok(Self::NewsData),
            "newsapi" | "newsapi.org" => Ok(Self::NewsApi),
            other => Err(format!("Unknown news provider: {} (expected newsdata or newsapi)", other)),
        }
    }
}

impl fmt::Display for ProviderKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::NewsData => f.write_str("newsdata"),
            Self::NewsApi => f.write_str("newsapi"),
        }
    }
}

/// Everything the fetchers need, handed over at construction time.
#[derive(Clone)]
pub struct Config {
    pub provider: ProviderKind,
    pub news_api_key: Option<String>,
    pub newsdata_api_key: Option<String>,
    pub newsapi_base_url: String,
    pub newsdata_base_url: String,
    pub coingecko_base_url: String,
    pub language: String,
    pub page_size: usize,
    pub cache_ttl: Duration,
    pub price_limit: usize,
    pub latest_visible: usize,
    pub block_size: usize,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            provider: ProviderKind::default(),
            news_api_key: None,
            newsdata_api_key: None,
            newsapi_base_url: "https://newsapi.org".to_string(),
            newsdata_base_url: "https://newsdata.io".to_string(),
            coingecko_base_url: "https://api.coingecko.com".to_string(),
            language: "en".to_string(),
            page_size: 10,
            cache_ttl: DEFAULT_CACHE_TTL,
            price_limit: 10,
            latest_visible: 16,
            block_size: 4,
        }
    }
}

impl Config {
    /// Defaults plus API keys from the environment. Empty values count as unset.
    pub fn from_env() -> Self {
        Self {
            news_api_key: non_empty(std::env::var(NEWS_API_KEY_ENV).ok()),
            newsdata_api_key: non_empty(std::env::var(NEWSDATA_API_KEY_ENV).ok()),
            ..Self::default()
        }
    }

    pub fn with_news_api_key(mut self, key: Option<String>) -> Self {
        self.news_api_key = non_empty(key);
        self
    }

    pub fn with_newsdata_api_key(mut self, key: Option<String>) -> Self {
        self.newsdata_api_key = non_empty(key);
        self
    }

    pub fn cache_ttl_ms(&self) -> i64 {
        i64::try_from(self.cache_ttl.as_millis()).unwrap_or(i64::MAX)
    }
}

impl fmt::Debug for Config {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Config")
            .field("provider", &self.provider)
            .field("news_api_key", &self.news_api_key.as_deref().map(|_| "<redacted>"))
            .field("newsdata_api_key", &self.newsdata_api_key.as_deref().map(|_| "<redacted>"))
            .field("newsapi_base_url", &self.newsapi_base_url)
            .field("newsdata_base_url", &self.newsdata_base_url)
            .field("coingecko_base_url", &self.coingecko_base_url)
            .field("language", &self.language)
            .field("page_size", &self.page_size)
            .field("cache_ttl", &self.cache_ttl)
            .field("price_limit", &self.price_limit)
            .field("latest_visible", &self.latest_visible)
            .field("block_size", &self.block_size)
            .finish()
    }
}

fn non_empty(value: Option<String>) -> Option<String> {
    value.filter(|v| !v.trim().is_empty())
}
