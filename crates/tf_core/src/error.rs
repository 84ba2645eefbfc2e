use thiserror::Error;

#[derive(Error, Debug)]
pub enum Error {
    /// A required setting (usually an API key) is missing. Raised before any I/O.
    #[error("Configuration error: {0}")]
    Configuration(String),

    #[error("Fetch error: {0}")]
    Fetch(String),

    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("Cache error: {0}")]
    Cache(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("Operation cancelled")]
    Cancelled,

    #[error("External error: {0}")]
    External(#[from] anyhow::Error),
}

impl Error {
    /// Network, non-2xx and response-parsing failures all count as fetch errors.
    pub fn is_fetch_error(&self) -> bool {
        matches!(self, Error::Fetch(_) | Error::Http(_) | Error::Serialization(_))
    }

    pub fn is_configuration_error(&self) -> bool {
        matches!(self, Error::Configuration(_))
    }
}

pub type Result<T> = std::result::Result<T, Error>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_classification() {
        assert!(Error::Fetch("boom".to_string()).is_fetch_error());
        assert!(Error::Serialization(serde_json::from_str::<u8>("x").unwrap_err()).is_fetch_error());
        assert!(!Error::Cache("disk full".to_string()).is_fetch_error());
        assert!(Error::Configuration("missing key".to_string()).is_configuration_error());
        assert!(!Error::Cancelled.is_configuration_error());
    }

    #[test]
    fn test_error_messages() {
        assert_eq!(
            Error::Configuration("NewsData API key is not configured".to_string()).to_string(),
            "Configuration error: NewsData API key is not configured"
        );
        assert_eq!(Error::Cancelled.to_string(), "Operation cancelled");
    }
}
