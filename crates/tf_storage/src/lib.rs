use std::path::Path;
use std::str::FromStr;
use std::sync::Arc;
use tf_core::{CacheBackend, Error, Result};
use tracing::info;

pub mod backends;
pub mod cache;

pub use backends::*;
pub use cache::{Cache, EntryStatus};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum StorageKind {
    Memory,
    #[default]
    File,
}

impl FromStr for StorageKind {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.to_lowercase().as_str() {
            "memory" => Ok(Self::Memory),
            "file" => Ok(Self::File),
            other => Err(Error::Configuration(format!(
                "Unknown cache storage: {} (expected memory or file)",
                other
            ))),
        }
    }
}

/// Builds the backend named by `kind`. File storage lives under `dir`
/// (default `.tf_cache`).
pub async fn create_backend(kind: &str, dir: Option<&Path>) -> Result<Arc<dyn CacheBackend>> {
    let backend: Arc<dyn CacheBackend> = match kind.parse::<StorageKind>()? {
        StorageKind::Memory => Arc::new(MemoryBackend::new()),
        StorageKind::File => {
            let dir = dir.unwrap_or_else(|| Path::new(".tf_cache"));
            Arc::new(FileBackend::new(dir).await?)
        }
    };
    info!("💾 Cache backend ready (using {})", backend.name());
    Ok(backend)
}

pub mod prelude {
    pub use super::backends::*;
    pub use super::cache::Cache;
    pub use super::create_backend;
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[tokio::test]
    async fn test_create_backend() {
        let memory = create_backend("memory", None).await.unwrap();
        assert_eq!(memory.name(), "memory");

        let dir = tempdir().unwrap();
        let file = create_backend("FILE", Some(dir.path())).await.unwrap();
        assert_eq!(file.name(), "file");

        let err = create_backend("redis", None).await.err().unwrap();
        assert!(err.is_configuration_error());
    }
}
