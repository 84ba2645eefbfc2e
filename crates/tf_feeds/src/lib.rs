pub mod cli;
pub mod fetcher;
pub mod logging;
pub mod manager;
pub mod prices;
pub mod providers;
pub mod transport;

pub use cli::{handle_command, CacheCommands, FeedArgs, FeedCommands};
pub use fetcher::NewsFetcher;
pub use manager::{FeedManager, Sections};
pub use prices::CoinGeckoFeed;
pub use providers::{create_provider, NewsApiProvider, NewsDataProvider};
pub use transport::{CannedTransport, HttpTransport, ReqwestTransport};

pub mod prelude {
    pub use super::fetcher::NewsFetcher;
    pub use super::manager::FeedManager;
    pub use tf_core::{Article, Category, Error, NewsProvider, Result};
}
