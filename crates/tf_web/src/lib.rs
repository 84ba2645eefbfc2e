use axum::{routing::get, Router};
use std::sync::Arc;
use tower_http::{cors::CorsLayer, trace::TraceLayer};

pub mod error;
pub mod handlers;
pub mod state;
pub mod views;

pub use error::ApiError;
pub use state::AppState;

pub fn create_app(state: AppState) -> Router {
    let cors = CorsLayer::permissive();

    Router::new()
        .route("/", get(handlers::landing))
        .route("/health", get(handlers::health))
        .route("/api/news/:category", get(handlers::news))
        .route("/api/latest", get(handlers::latest))
        .route("/api/prices", get(handlers::prices))
        .layer(TraceLayer::new_for_http())
        .layer(cors)
        .with_state(Arc::new(state))
}

pub mod prelude {
    pub use tf_core::{Article, Error, Result};
    pub use crate::{create_app, AppState};
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::{
        body::{to_bytes, Body},
        http::{Request, StatusCode},
    };
    use async_trait::async_trait;
    use serde_json::{json, Value};
    use std::sync::atomic::{AtomicBool, Ordering};
    use std::time::Duration;
    use tf_core::{Article, Config};
    use tf_feeds::{CannedTransport, FeedManager, HttpTransport};
    use tf_storage::{Cache, MemoryBackend};
    use tokio::sync::Notify;
    use tokio_util::sync::CancellationToken;
    use tower::ServiceExt;

    fn results(prefix: &str, n: usize) -> Value {
        let items: Vec<_> = (0..n)
            .map(|i| json!({"title": format!("{prefix} {i}"), "link": format!("https://n.test/{prefix}/{i}")}))
            .collect();
        json!({"status": "success", "results": items})
    }

    fn coins() -> Value {
        json!([{
            "id": "bitcoin", "name": "Bitcoin", "symbol": "btc",
            "image": "https://c.test/btc.png", "current_price": 64250.1
        }])
    }

    fn app(transport: CannedTransport, key: Option<&str>) -> Router {
        let config = Config::default().with_newsdata_api_key(key.map(str::to_string));
        let cache = Cache::new(Arc::new(MemoryBackend::new()), Duration::from_secs(600));
        let feeds = FeedManager::new(config, cache, Arc::new(transport));
        create_app(AppState::new(feeds, CancellationToken::new()))
    }

    async fn get(app: Router, uri: &str) -> (StatusCode, String) {
        let response = app
            .oneshot(Request::builder().uri(uri).body(Body::empty()).unwrap())
            .await
            .unwrap();
        let status = response.status();
        let body = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        (status, String::from_utf8(body.to_vec()).unwrap())
    }

    #[tokio::test]
    async fn test_health() {
        let (status, body) = get(app(CannedTransport::new(), None), "/health").await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body, r#"{"status":"ok"}"#);
    }

    #[tokio::test]
    async fn test_news_endpoint() {
        let transport = CannedTransport::new().respond("category=cryptocurrency", results("coin", 3));
        let (status, body) = get(app(transport, Some("k")), "/api/news/crypto").await;
        assert_eq!(status, StatusCode::OK);
        let articles: Vec<Article> = serde_json::from_str(&body).unwrap();
        assert_eq!(articles.len(), 3);
        assert_eq!(articles[0].title, "coin 0");
    }

    #[tokio::test]
    async fn test_news_without_key_is_unavailable() {
        let (status, body) = get(app(CannedTransport::new(), None), "/api/news/technology").await;
        assert_eq!(status, StatusCode::SERVICE_UNAVAILABLE);
        assert!(body.contains("unavailable"));
    }

    #[tokio::test]
    async fn test_upstream_failure_is_bad_gateway() {
        let transport = CannedTransport::new().fail("/api/1/latest", "connection refused");
        let (status, _) = get(app(transport, Some("k")), "/api/news/crypto").await;
        assert_eq!(status, StatusCode::BAD_GATEWAY);
    }

    #[tokio::test]
    async fn test_latest_interleaves_with_limit() {
        let transport = CannedTransport::new()
            .respond("category=cryptocurrency", results("coin", 5))
            .respond("category=technology", results("chip", 5));
        let (status, body) = get(app(transport, Some("k")), "/api/latest?limit=6").await;
        assert_eq!(status, StatusCode::OK);

        let latest: Value = serde_json::from_str(&body).unwrap();
        let titles: Vec<&str> = latest["articles"]
            .as_array()
            .unwrap()
            .iter()
            .map(|a| a["title"].as_str().unwrap())
            .collect();
        assert_eq!(titles, ["coin 0", "coin 1", "coin 2", "coin 3", "chip 0", "chip 1"]);
        assert_eq!(latest["has_more"], true);
    }

    #[tokio::test]
    async fn test_prices_endpoint() {
        let transport = CannedTransport::new().respond("/api/v3/coins/markets", coins());
        let (status, body) = get(app(transport, None), "/api/prices").await;
        assert_eq!(status, StatusCode::OK);
        assert!(body.contains("Bitcoin"));
    }

    #[tokio::test]
    async fn test_landing_isolates_failed_section() {
        let transport = CannedTransport::new()
            .respond("category=cryptocurrency", results("coin", 2))
            .fail("category=technology", "timeout")
            .respond("/api/v3/coins/markets", coins());
        let (status, html) = get(app(transport, Some("k")), "/").await;
        assert_eq!(status, StatusCode::OK);
        assert!(html.contains("coin 0"));
        assert!(html.contains("Error fetching tech news. Please try again."));
        assert!(html.contains("Bitcoin (btc)"));
    }

    #[tokio::test]
    async fn test_landing_visible_query_limits_latest_grid() {
        let transport = CannedTransport::new()
            .respond("category=cryptocurrency", results("coin", 2))
            .respond("category=technology", results("chip", 2));
        let (status, html) = get(app(transport, Some("k")), "/?visible=2").await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(html.matches("class=\"latest-card\"").count(), 2);
        assert!(html.contains("See More..."));
        assert!(html.contains("visible=4"));
    }

    #[tokio::test]
    async fn test_landing_without_key_shows_configuration_message() {
        let (status, html) = get(app(CannedTransport::new(), None), "/").await;
        assert_eq!(status, StatusCode::OK);
        assert!(html.contains("id=\"crypto\""));
        assert!(html.contains("class=\"error\""));
    }

    /// Transport that parks every call until released and records whether an
    /// in-flight call was dropped.
    #[derive(Default)]
    struct ParkedTransport {
        entered: Notify,
        release: Notify,
        dropped_in_flight: AtomicBool,
    }

    struct InFlight<'a> {
        flag: &'a AtomicBool,
        done: bool,
    }

    impl Drop for InFlight<'_> {
        fn drop(&mut self) {
            if !self.done {
                self.flag.store(true, Ordering::SeqCst);
            }
        }
    }

    #[async_trait]
    impl HttpTransport for ParkedTransport {
        async fn get_json(&self, _url: &str, _query: &[(&str, String)]) -> tf_core::Result<Value> {
            let mut in_flight = InFlight { flag: &self.dropped_in_flight, done: false };
            self.entered.notify_one();
            self.release.notified().await;
            in_flight.done = true;
            Ok(results("late", 2))
        }
    }

    fn parked_app(transport: Arc<ParkedTransport>, backend: &MemoryBackend, shutdown: CancellationToken) -> Router {
        let config = Config::default().with_newsdata_api_key(Some("k".to_string()));
        let cache = Cache::new(Arc::new(backend.clone()), Duration::from_secs(600));
        let feeds = FeedManager::new(config, cache, transport);
        create_app(AppState::new(feeds, shutdown))
    }

    #[tokio::test]
    async fn test_abandoned_request_never_reaches_cache() {
        let transport = Arc::new(ParkedTransport::default());
        let backend = MemoryBackend::new();
        let app = parked_app(transport.clone(), &backend, CancellationToken::new());

        let request = tokio::spawn(get(app, "/api/news/crypto"));
        transport.entered.notified().await;
        request.abort();
        assert!(request.await.unwrap_err().is_cancelled());

        transport.release.notify_waiters();
        tokio::task::yield_now().await;
        assert!(transport.dropped_in_flight.load(Ordering::SeqCst));
        assert!(backend.is_empty().await);
    }

    #[tokio::test]
    async fn test_shutdown_cancels_in_flight_request() {
        let transport = Arc::new(ParkedTransport::default());
        let backend = MemoryBackend::new();
        let shutdown = CancellationToken::new();
        let app = parked_app(transport.clone(), &backend, shutdown.clone());

        let request = tokio::spawn(get(app, "/api/news/technology"));
        transport.entered.notified().await;
        shutdown.cancel();

        let (status, body) = request.await.unwrap();
        assert_eq!(status, StatusCode::SERVICE_UNAVAILABLE);
        assert!(body.contains("cancelled"));
        assert!(transport.dropped_in_flight.load(Ordering::SeqCst));
        assert!(backend.is_empty().await);
    }
}
