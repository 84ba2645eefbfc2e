use std::sync::Arc;
use tf_core::{Config, NewsProvider, ProviderKind, Result};
use crate::transport::HttpTransport;

pub mod newsapi;
pub mod newsdata;

pub use newsapi::NewsApiProvider;
pub use newsdata::NewsDataProvider;

/// Builds the provider selected in `config`.
pub fn create_provider(config: &Config, transport: Arc<dyn HttpTransport>) -> Arc<dyn NewsProvider> {
    match config.provider {
        ProviderKind::NewsData => Arc::new(NewsDataProvider::new(config, transport)),
        ProviderKind::NewsApi => Arc::new(NewsApiProvider::new(config, transport)),
    }
}

/// Common helpers for providers
pub(crate) mod utils {
    use tf_core::{Error, Result};
    use url::Url;

    /// Appends `path` below `base`, keeping any path prefix the base carries
    /// (`https://proxy/newsdata` + `/api/1/latest`).
    pub fn endpoint(base: &str, path: &str) -> Result<String> {
        let mut base = Url::parse(base)
            .map_err(|e| Error::Configuration(format!("Invalid base URL {}: {}", base, e)))?;
        if !base.path().ends_with('/') {
            let dir = format!("{}/", base.path());
            base.set_path(&dir);
        }
        base.join(path.trim_start_matches('/'))
            .map(String::from)
            .map_err(|e| Error::Configuration(format!("Invalid endpoint {}: {}", path, e)))
    }

    /// Treats missing, null and blank strings alike.
    pub fn non_empty(value: Option<String>) -> Option<String> {
        value
            .map(|v| v.trim().to_string())
            .filter(|v| !v.is_empty())
    }
}
