pub mod clock;
pub mod config;
pub mod error;
pub mod feed;
pub mod marquee;
pub mod merge;
pub mod storage;
pub mod types;

pub use clock::{Clock, ManualClock, SystemClock};
pub use config::{Config, ProviderKind};
pub use error::{Error, Result};
pub use feed::{NewsProvider, PriceSource};
pub use marquee::Marquee;
pub use merge::{interleave, select_lead, split_lead, LatestNews};
pub use storage::CacheBackend;
pub use types::{Article, CacheEntry, Category, PriceTick, PLACEHOLDER_IMAGE_URL};
