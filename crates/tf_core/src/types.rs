use serde::{Deserialize, Serialize};
use std::fmt;

/// Image shown for articles that arrive without one.
pub const PLACEHOLDER_IMAGE_URL: &str = "https://via.placeholder.com/150";

/// News category requested from a provider. Anything that is not one of the
/// known categories is passed through as a free-text query.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(into = "String", from = "String")]
pub enum Category {
    Crypto,
    Technology,
    Other(String),
}

impl Category {
    /// Provider-facing value, also used to build cache keys.
    pub fn slug(&self) -> &str {
        match self {
            Category::Crypto => "cryptocurrency",
            Category::Technology => "technology",
            Category::Other(query) => query,
        }
    }

    pub fn label(&self) -> &str {
        match self {
            Category::Crypto => "Crypto",
            Category::Technology => "Technology",
            Category::Other(query) => query,
        }
    }
}

impl From<&str> for Category {
    fn from(value: &str) -> Self {
        match value.trim().to_lowercase().as_str() {
            "crypto" | "cryptocurrency" => Category::Crypto,
            "tech" | "technology" => Category::Technology,
            _ => Category::Other(value.trim().to_string()),
        }
    }
}

impl From<String> for Category {
    fn from(value: String) -> Self {
        Category::from(value.as_str())
    }
}

impl From<Category> for String {
    fn from(category: Category) -> Self {
        category.label().to_string()
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Article {
    pub title: String,
    pub url: String,
    pub image_url: Option<String>,
    pub published_at: Option<String>,
    pub summary: Option<String>,
    pub category: Category,
}

impl Article {
    pub fn new(title: impl Into<String>, url: impl Into<String>, category: Category) -> Self {
        Self {
            title: title.into(),
            url: url.into(),
            image_url: None,
            published_at: None,
            summary: None,
            category,
        }
    }

    pub fn has_image(&self) -> bool {
        self.image_url.as_deref().is_some_and(|url| !url.trim().is_empty())
    }

    /// The image to render, falling back to the placeholder.
    pub fn display_image(&self) -> &str {
        if self.has_image() {
            self.image_url.as_deref().unwrap_or(PLACEHOLDER_IMAGE_URL)
        } else {
            PLACEHOLDER_IMAGE_URL
        }
    }

    /// Explicit normalisation: fills a missing image with the placeholder.
    pub fn with_placeholder_image(mut self) -> Self {
        if !self.has_image() {
            self.image_url = Some(PLACEHOLDER_IMAGE_URL.to_string());
        }
        self
    }
}

/// One row of the price marquee. Lives only for a single page view.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PriceTick {
    pub id: String,
    pub display_name: String,
    pub symbol: String,
    pub logo_url: String,
    pub price_usd: f64,
}

impl PriceTick {
    pub fn formatted_price(&self) -> String {
        format!("${:.2}", self.price_usd)
    }

    /// `Bitcoin (btc) $64250.10`
    pub fn marquee_label(&self) -> String {
        format!("{} ({}) {}", self.display_name, self.symbol, self.formatted_price())
    }
}

/// Stored representation of a cached payload: `{"timestamp": <ms>, "data": ...}`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CacheEntry<T> {
    pub timestamp: i64,
    pub data: T,
}

impl<T> CacheEntry<T> {
    pub fn new(timestamp: i64, data: T) -> Self {
        Self { timestamp, data }
    }

    pub fn age_ms(&self, now_ms: i64) -> i64 {
        now_ms - self.timestamp
    }

    pub fn is_fresh(&self, now_ms: i64, ttl_ms: i64) -> bool {
        self.age_ms(now_ms) < ttl_ms
    }
}
