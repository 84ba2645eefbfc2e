use tf_feeds::FeedManager;
use tokio_util::sync::CancellationToken;

pub struct AppState {
    pub feeds: FeedManager,
    /// Cancelled when the server shuts down; request tokens are its children.
    pub shutdown: CancellationToken,
}

impl AppState {
    pub fn new(feeds: FeedManager, shutdown: CancellationToken) -> Self {
        Self { feeds, shutdown }
    }
}
