use anyhow::Context;
use clap::Parser;
use std::path::PathBuf;
use std::str::FromStr;
use std::sync::Arc;
use std::time::Duration;
use tf_core::{Config, ProviderKind};
use tf_feeds::cli::{handle_command, FeedCommands};
use tf_feeds::logging::init_logging;
use tf_feeds::{FeedManager, ReqwestTransport};
use tf_storage::Cache;
use tf_web::AppState;
use tokio::net::TcpListener;
use tokio_util::sync::CancellationToken;
use tracing::{error, info};

mod ticker;

#[derive(Debug, Clone)]
struct HumanDuration(Duration);

impl FromStr for HumanDuration {
    type Err = String;

    /// `10m`, `1h 30s`, or bare seconds.
    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        let s = s.trim();
        if let Ok(secs) = s.parse::<u64>() {
            return Ok(HumanDuration(Duration::from_secs(secs)));
        }
        humantime::parse_duration(s)
            .map(HumanDuration)
            .map_err(|e| format!("Invalid duration '{}': {}", s, e))
    }
}

#[derive(Parser, Debug)]
#[command(name = "tf", author, version, about = "Crypto and tech news with a live price ticker", long_about = None)]
pub struct Cli {
    /// News provider: newsdata or newsapi
    #[arg(long, env = "TF_PROVIDER", default_value = "newsdata", global = true)]
    provider: ProviderKind,
    #[arg(long, env = tf_core::config::NEWS_API_KEY_ENV, hide_env_values = true, global = true)]
    news_api_key: Option<String>,
    #[arg(long, env = tf_core::config::NEWSDATA_API_KEY_ENV, hide_env_values = true, global = true)]
    newsdata_api_key: Option<String>,
    /// Cache backend: file or memory
    #[arg(long, default_value = "file", global = true)]
    storage: String,
    #[arg(long, env = "TF_CACHE_DIR", global = true)]
    cache_dir: Option<PathBuf>,
    /// How long cached news stays fresh (e.g. 10m, 1h, 90s)
    #[arg(long, default_value = "10m", global = true)]
    cache_ttl: HumanDuration,
    #[arg(short, long, global = true)]
    verbose: bool,
    #[command(subcommand)]
    command: Commands,
}

#[derive(clap::Subcommand, Debug)]
enum Commands {
    /// Serve the news site and JSON API
    Serve {
        #[arg(long, env = "TF_ADDR", default_value = "127.0.0.1:3000")]
        addr: String,
    },
    /// Scroll current prices across the terminal
    Ticker {
        /// Characters advanced per frame
        #[arg(long, default_value_t = 1)]
        speed: usize,
        /// Columns to draw, defaults to the terminal width
        #[arg(long)]
        width: Option<usize>,
        /// Milliseconds between frames
        #[arg(long, default_value_t = 120)]
        interval: u64,
    },
    #[command(flatten)]
    Feed(FeedCommands),
}

impl Cli {
    fn config(&self) -> Config {
        let mut config = Config {
            provider: self.provider,
            cache_ttl: self.cache_ttl.0,
            ..Config::from_env()
        };
        if self.news_api_key.is_some() {
            config = config.with_news_api_key(self.news_api_key.clone());
        }
        if self.newsdata_api_key.is_some() {
            config = config.with_newsdata_api_key(self.newsdata_api_key.clone());
        }
        config
    }
}

async fn shutdown_signal(token: CancellationToken) {
    use tokio::signal;

    let ctrl_c = async {
        if let Err(e) = signal::ctrl_c().await {
            error!("Failed to install Ctrl+C handler: {}", e);
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match signal::unix::signal(signal::unix::SignalKind::terminate()) {
            Ok(mut stream) => {
                stream.recv().await;
            }
            Err(e) => {
                error!("Failed to install signal handler: {}", e);
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => info!("Received Ctrl+C signal"),
        _ = terminate => info!("Received terminate signal"),
    }
    token.cancel();
}

async fn serve(addr: &str, feeds: FeedManager, shutdown: CancellationToken) -> anyhow::Result<()> {
    let app = tf_web::create_app(AppState::new(feeds, shutdown.clone()));
    let listener = TcpListener::bind(addr)
        .await
        .with_context(|| format!("failed to bind to {}", addr))?;

    info!("🚀 Techfusion listening on http://{}", addr);
    axum::serve(listener, app)
        .with_graceful_shutdown(async move { shutdown.cancelled().await })
        .await
        .context("server error")?;
    info!("👋 Server stopped");
    Ok(())
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Before parsing so `.env` values feed the flag fallbacks
    dotenvy::dotenv().ok();
    let cli = Cli::parse();
    init_logging(cli.verbose);

    let config = cli.config();
    info!("📰 Using {} provider, cache ttl {}s", config.provider, config.cache_ttl.as_secs());

    let backend = tf_storage::create_backend(&cli.storage, cli.cache_dir.as_deref()).await?;
    let cache = Cache::new(backend, config.cache_ttl);
    let transport = Arc::new(ReqwestTransport::new()?);
    let feeds = FeedManager::new(config, cache, transport);

    let shutdown = CancellationToken::new();
    tokio::spawn(shutdown_signal(shutdown.clone()));

    match cli.command {
        Commands::Serve { addr } => serve(&addr, feeds, shutdown).await?,
        Commands::Ticker { speed, width, interval } => {
            let options = ticker::TickerOptions {
                speed,
                width,
                interval: Duration::from_millis(interval.max(1)),
            };
            ticker::run(&feeds, options, &shutdown).await?;
        }
        Commands::Feed(command) => handle_command(command, &feeds, &shutdown).await?,
    }

    Ok(())
}
