use async_trait::async_trait;
use reqwest::Client;
use serde_json::Value;
use std::fmt;
use std::sync::{Arc, Mutex};
use std::time::Duration;
use tf_core::{Error, Result};
use tracing::debug;

/// The network layer the providers talk through.
#[async_trait]
pub trait HttpTransport: Send + Sync {
    /// Issues a GET with `query` appended and decodes the body as JSON.
    /// Non-2xx responses are fetch errors.
    async fn get_json(&self, url: &str, query: &[(&str, String)]) -> Result<Value>;
}

#[derive(Debug, Clone)]
pub struct ReqwestTransport {
    client: Arc<Client>,
}

impl ReqwestTransport {
    pub fn new() -> Result<Self> {
        let client = Client::builder()
            .timeout(Duration::from_secs(15))
            .user_agent(concat!("techfusion/", env!("CARGO_PKG_VERSION")))
            .build()?;
        Ok(Self { client: Arc::new(client) })
    }

    pub fn with_client(client: Client) -> Self {
        Self { client: Arc::new(client) }
    }
}

#[async_trait]
impl HttpTransport for ReqwestTransport {
    async fn get_json(&self, url: &str, query: &[(&str, String)]) -> Result<Value> {
        debug!("GET {}", url);
        let response = self.client.get(url).query(query).send().await?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(Error::Fetch(format!("{} returned {}: {}", url, status, body.trim())));
        }

        Ok(response.json::<Value>().await?)
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct RecordedRequest {
    pub url: String,
    pub query: Vec<(String, String)>,
}

impl RecordedRequest {
    pub fn param(&self, name: &str) -> Option<&str> {
        self.query
            .iter()
            .find(|(k, _)| k == name)
            .map(|(_, v)| v.as_str())
    }
}

impl fmt::Display for RecordedRequest {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.url)?;
        for (i, (k, v)) in self.query.iter().enumerate() {
            write!(f, "{}{}={}", if i == 0 { '?' } else { '&' }, k, v)?;
        }
        Ok(())
    }
}

#[derive(Debug, Clone)]
enum CannedReply {
    Json(Value),
    Failure(String),
}

/// Serves canned JSON and records every request. Lets the fetch pipeline run
/// without a network.
///
/// Patterns are matched as substrings of `url?k=v&k=v` (unencoded), first
/// registered match wins.
#[derive(Debug, Default)]
pub struct CannedTransport {
    replies: Mutex<Vec<(String, CannedReply)>>,
    requests: Mutex<Vec<RecordedRequest>>,
}

impl CannedTransport {
    pub fn new() -> Self {
        Self::default()
    }

    /// Answers requests matching `pattern` with `body`.
    pub fn respond(self, pattern: &str, body: Value) -> Self {
        self.push(pattern, CannedReply::Json(body));
        self
    }

    /// Fails requests matching `pattern` with a fetch error.
    pub fn fail(self, pattern: &str, message: &str) -> Self {
        self.push(pattern, CannedReply::Failure(message.to_string()));
        self
    }

    pub fn requests(&self) -> Vec<RecordedRequest> {
        self.requests.lock().unwrap_or_else(|e| e.into_inner()).clone()
    }

    pub fn call_count(&self) -> usize {
        self.requests.lock().unwrap_or_else(|e| e.into_inner()).len()
    }

    fn push(&self, pattern: &str, reply: CannedReply) {
        self.replies
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .push((pattern.to_string(), reply));
    }
}

#[async_trait]
impl HttpTransport for CannedTransport {
    async fn get_json(&self, url: &str, query: &[(&str, String)]) -> Result<Value> {
        let request = RecordedRequest {
            url: url.to_string(),
            query: query.iter().map(|(k, v)| (k.to_string(), v.clone())).collect(),
        };
        let target = request.to_string();
        self.requests.lock().unwrap_or_else(|e| e.into_inner()).push(request);

        let reply = self
            .replies
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .iter()
            .find(|(pattern, _)| target.contains(pattern.as_str()))
            .map(|(_, reply)| reply.clone());

        match reply {
            Some(CannedReply::Json(body)) => Ok(body),
            Some(CannedReply::Failure(message)) => Err(Error::Fetch(message)),
            None => Err(Error::Fetch(format!("No canned response for {}", url))),
        }
    }
}
