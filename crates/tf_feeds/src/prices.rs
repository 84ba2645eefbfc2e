use async_trait::async_trait;
use serde::Deserialize;
use serde_json::Value;
use std::sync::Arc;
use tf_core::{Config, Error, PriceSource, PriceTick, Result};
use tracing::debug;
use crate::providers::utils;
use crate::transport::HttpTransport;

#[derive(Debug, Deserialize)]
struct CoinMarket {
    id: String,
    name: String,
    symbol: String,
    #[serde(default)]
    image: Option<String>,
    current_price: Option<f64>,
}

/// Top coins by market cap from CoinGecko. Not cached.
pub struct CoinGeckoFeed {
    transport: Arc<dyn HttpTransport>,
    base_url: String,
}

impl CoinGeckoFeed {
    pub fn new(config: &Config, transport: Arc<dyn HttpTransport>) -> Self {
        Self {
            transport,
            base_url: config.coingecko_base_url.clone(),
        }
    }
}

#[async_trait]
impl PriceSource for CoinGeckoFeed {
    async fn fetch_prices(&self, limit: usize) -> Result<Vec<PriceTick>> {
        let url = utils::endpoint(&self.base_url, "/api/v3/coins/markets")?;
        let query = [
            ("vs_currency", "usd".to_string()),
            ("order", "market_cap_desc".to_string()),
            ("per_page", limit.to_string()),
            ("page", "1".to_string()),
            ("sparkline", "false".to_string()),
        ];
        let body = self.transport.get_json(&url, &query).await?;

        let Value::Array(markets) = body else {
            return Err(Error::Fetch("CoinGecko markets response is not a list".to_string()));
        };

        Ok(markets
            .into_iter()
            .filter_map(|raw| serde_json::from_value::<CoinMarket>(raw).ok())
            .filter_map(|coin| {
                let Some(price) = coin.current_price else {
                    debug!("Skipping {} without a price", coin.id);
                    return None;
                };
                Some(PriceTick {
                    id: coin.id,
                    display_name: coin.name,
                    symbol: coin.symbol,
                    logo_url: coin.image.unwrap_or_default(),
                    price_usd: price,
                })
            })
            .take(limit)
            .collect())
    }
}
