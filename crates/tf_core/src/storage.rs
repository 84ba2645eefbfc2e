use async_trait::async_trait;
use crate::Result;

/// Raw string key/value store backing the cache, shaped like a browser's
/// origin-scoped local storage.
#[async_trait]
pub trait CacheBackend: Send + Sync {
    /// Returns the stored value for `key`, if any
    async fn get_item(&self, key: &str) -> Result<Option<String>>;

    /// Stores `value` under `key`, replacing any previous value
    async fn set_item(&self, key: &str, value: &str) -> Result<()>;

    /// Removes `key`; removing a missing key is not an error
    async fn remove_item(&self, key: &str) -> Result<()>;

    /// Lists every stored key
    async fn keys(&self) -> Result<Vec<String>>;

    /// Short name used in logs
    fn name(&self) -> &str;
}
