use clap::{Args, Subcommand};
use tf_core::{Article, Category, Result};
use tokio_util::sync::CancellationToken;
use crate::manager::FeedManager;

#[derive(Args, Debug, Clone)]
pub struct FeedArgs {
    #[command(subcommand)]
    pub command: FeedCommands,
}

#[derive(Subcommand, Debug, Clone)]
pub enum FeedCommands {
    /// Show articles for one category (crypto, technology, or any search term)
    News {
        category: String,
    },
    /// Show the mixed crypto/tech "Latest News" grid
    Latest {
        #[arg(long, default_value_t = 16)]
        limit: usize,
    },
    /// Show current prices for the top coins
    Prices {
        #[arg(long)]
        limit: Option<usize>,
    },
    /// Inspect or clear the news cache
    Cache {
        #[command(subcommand)]
        command: CacheCommands,
    },
}

#[derive(Subcommand, Debug, Clone)]
pub enum CacheCommands {
    /// List cached entries with their age
    List,
    /// Remove expired and unreadable entries
    Purge,
    /// Remove every entry
    Clear,
}

fn emoji(article: &Article) -> &'static str {
    match article.category {
        Category::Crypto => "🪙",
        Category::Technology => "💻",
        Category::Other(_) => "📰",
    }
}

pub async fn handle_command(command: FeedCommands, manager: &FeedManager, token: &CancellationToken) -> Result<()> {
    match command {
        FeedCommands::News { category } => {
            let category = Category::from(category.as_str());
            let articles = manager.fetcher().fetch_category_cancellable(&category, token).await?;
            println!("Found {} articles for {}", articles.len(), category);
            if let Some(lead) = tf_core::select_lead(&articles) {
                println!("⭐ {} - {}", lead.title, lead.url);
            }
            for article in &articles {
                println!("{} {} - {}", emoji(article), article.title, article.url);
            }
        }
        FeedCommands::Latest { limit } => {
            let latest = manager.latest(limit, token).await?;
            for article in &latest.articles {
                println!("{} [{}] {} - {}", emoji(article), article.category, article.title, article.url);
            }
            if latest.has_more {
                println!("See more...");
            }
        }
        FeedCommands::Prices { limit } => {
            let limit = limit.unwrap_or(manager.config().price_limit);
            for tick in manager.top_prices(limit).await? {
                println!("{:<12} {:>6} {:>14}", tick.display_name, tick.symbol.to_uppercase(), tick.formatted_price());
            }
        }
        FeedCommands::Cache { command } => {
            let cache = manager.cache();
            match command {
                CacheCommands::List => {
                    let entries = cache.entries().await;
                    println!("{} cached entries (ttl {}s)", entries.len(), cache.ttl_ms() / 1000);
                    for entry in entries {
                        let age = entry
                            .age_ms
                            .map(|ms| format!("{}s", ms / 1000))
                            .unwrap_or_else(|| "unreadable".to_string());
                        let state = if entry.fresh { "fresh" } else { "stale" };
                        println!("  {} ({}, {})", entry.key, age, state);
                    }
                }
                CacheCommands::Purge => {
                    println!("Purged {} entries", cache.purge_expired().await);
                }
                CacheCommands::Clear => {
                    println!("Cleared {} entries", cache.clear().await);
                }
            }
        }
    }
    Ok(())
}
