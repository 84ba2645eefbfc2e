use serde::de::{DeserializeOwned, IgnoredAny};
use serde::Serialize;
use std::sync::Arc;
use std::time::Duration;
use tf_core::{CacheBackend, CacheEntry, Clock, SystemClock};
use tracing::{debug, error, info, warn};

/// What `Cache::entries` reports for one key.
#[derive(Debug, Clone, PartialEq)]
pub struct EntryStatus {
    pub key: String,
    pub age_ms: Option<i64>,
    pub fresh: bool,
}

/// Time-boxed cache over a string backend.
///
/// Reads and writes never fail from the caller's point of view: backend and
/// decoding problems are logged and behave like a miss (on read) or a no-op
/// (on write). Stale entries are only removed when read.
#[derive(Clone)]
pub struct Cache {
    backend: Arc<dyn CacheBackend>,
    clock: Arc<dyn Clock>,
    ttl_ms: i64,
}

impl Cache {
    pub fn new(backend: Arc<dyn CacheBackend>, ttl: Duration) -> Self {
        Self {
            backend,
            clock: Arc::new(SystemClock),
            ttl_ms: i64::try_from(ttl.as_millis()).unwrap_or(i64::MAX),
        }
    }

    pub fn with_clock(mut self, clock: Arc<dyn Clock>) -> Self {
        self.clock = clock;
        self
    }

    pub fn ttl_ms(&self) -> i64 {
        self.ttl_ms
    }

    pub fn backend(&self) -> &Arc<dyn CacheBackend> {
        &self.backend
    }

    pub async fn read<T: DeserializeOwned>(&self, key: &str) -> Option<T> {
        let raw = match self.backend.get_item(key).await {
            Ok(Some(raw)) => raw,
            Ok(None) => {
                debug!("Cache MISS for {}", key);
                return None;
            }
            Err(e) => {
                error!("Error reading cache for {}: {}", key, e);
                return None;
            }
        };

        let entry: CacheEntry<T> = match serde_json::from_str(&raw) {
            Ok(entry) => entry,
            Err(e) => {
                error!("Error reading cache for {}: {}", key, e);
                return None;
            }
        };

        if entry.is_fresh(self.clock.now_ms(), self.ttl_ms) {
            info!("Cache HIT for {}", key);
            return Some(entry.data);
        }

        info!("Cache EXPIRED for {}", key);
        if let Err(e) = self.backend.remove_item(key).await {
            warn!("Failed to remove expired cache entry {}: {}", key, e);
        }
        None
    }

    pub async fn write<T: Serialize + ?Sized>(&self, key: &str, data: &T) {
        let entry = CacheEntry::new(self.clock.now_ms(), data);
        let raw = match serde_json::to_string(&entry) {
            Ok(raw) => raw,
            Err(e) => {
                error!("Error writing cache for {}: {}", key, e);
                return;
            }
        };

        match self.backend.set_item(key, &raw).await {
            Ok(()) => info!("Cache STORED for {}", key),
            Err(e) => error!("Error writing cache for {}: {}", key, e),
        }
    }

    /// Ages and freshness of every stored entry; unreadable entries report no age.
    pub async fn entries(&self) -> Vec<EntryStatus> {
        let keys = match self.backend.keys().await {
            Ok(keys) => keys,
            Err(e) => {
                error!("Error listing cache keys: {}", e);
                return Vec::new();
            }
        };

        let now = self.clock.now_ms();
        let mut statuses = Vec::with_capacity(keys.len());
        for key in keys {
            let age_ms = self.timestamp_of(&key).await.map(|ts| now - ts);
            statuses.push(EntryStatus {
                fresh: age_ms.is_some_and(|age| age < self.ttl_ms),
                key,
                age_ms,
            });
        }
        statuses
    }

    /// Removes every expired or unreadable entry. Returns how many were removed.
    pub async fn purge_expired(&self) -> usize {
        let mut removed = 0;
        for status in self.entries().await {
            if status.fresh {
                continue;
            }
            match self.backend.remove_item(&status.key).await {
                Ok(()) => removed += 1,
                Err(e) => warn!("Failed to purge cache entry {}: {}", status.key, e),
            }
        }
        removed
    }

    /// Removes everything. Returns how many entries were removed.
    pub async fn clear(&self) -> usize {
        let keys = match self.backend.keys().await {
            Ok(keys) => keys,
            Err(e) => {
                error!("Error listing cache keys: {}", e);
                return 0;
            }
        };
        let mut removed = 0;
        for key in keys {
            if self.backend.remove_item(&key).await.is_ok() {
                removed += 1;
            }
        }
        removed
    }

    async fn timestamp_of(&self, key: &str) -> Option<i64> {
        let raw = self.backend.get_item(key).await.ok().flatten()?;
        serde_json::from_str::<CacheEntry<IgnoredAny>>(&raw)
            .ok()
            .map(|entry| entry.timestamp)
    }
}
