mod config;

use std::collections::HashMap;
use std::sync::atomic::AtomicBool;
use std::sync::Arc;

use clap::Parser;
use corpus_core::ports::Pingable;
use corpus_gateway::middleware::{ConcurrencyGate, RateLimiter};
use corpus_gateway::{auth::AuthService, detector::HttpDetector, state::AppState};
use corpus_ingestor::{IngestService, XkcdClient};
use corpus_normalizer::Normalizer;
use corpus_search::SearchService;
use corpus_storage::PgStorage;

use config::Settings;

#[derive(Parser)]
#[command(name = "corpus-gateway", about = "Comic corpus ingestion and dual-mode search gateway")]
struct Cli {
    /// Path to a TOML config file (without extension), e.g. "config" for ./config.toml.
    #[arg(long)]
    config: Option<String>,

    /// Overrides the configured bind address.
    #[arg(long)]
    bind_addr: Option<String>,

    /// Overrides the configured Postgres connection string.
    #[arg(long)]
    database_url: Option<String>,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_env("RUST_LOG")
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .init();

    let cli = Cli::parse();
    let mut settings = Settings::load(cli.config.as_deref())?;
    if let Some(bind_addr) = cli.bind_addr {
        settings.bind_addr = bind_addr;
    }
    if let Some(database_url) = cli.database_url {
        settings.database_url = database_url;
    }

    let storage = Arc::new(PgStorage::connect(&settings.database_url).await?);
    storage.migrate().await?;

    let normalizer: Arc<dyn corpus_core::ports::Normalizer> = Arc::new(Normalizer::new());

    let upstream = Arc::new(XkcdClient::new(
        settings.upstream_base_url.clone(),
        settings.upstream_timeout(),
    )?);

    let updater: Arc<dyn corpus_core::ports::Updater> = Arc::new(IngestService::new(
        storage.clone() as Arc<dyn corpus_core::ports::Storage>,
        upstream.clone() as Arc<dyn corpus_core::ports::UpstreamSource>,
        normalizer.clone(),
        settings.ingest_concurrency,
    )?);

    let search_service = Arc::new(SearchService::new(
        storage.clone() as Arc<dyn corpus_core::ports::Storage>,
        normalizer.clone(),
    ));
    let searcher: Arc<dyn corpus_core::ports::Searcher> = search_service.clone();
    search_service.spawn_background_rebuild(settings.rebuild_period()).await;

    let detector = Arc::new(HttpDetector::new(
        settings.detector_base_url.clone(),
        settings.upstream_timeout(),
    )?);

    let auth = Arc::new(AuthService::from_env(settings.token_ttl())?);

    let mut pingables: HashMap<String, Arc<dyn Pingable>> = HashMap::new();
    pingables.insert("storage".to_string(), storage.clone() as Arc<dyn Pingable>);
    pingables.insert("upstream".to_string(), upstream.clone() as Arc<dyn Pingable>);
    pingables.insert("detector".to_string(), detector.clone() as Arc<dyn Pingable>);

    let state = AppState {
        updater,
        searcher,
        normalizer,
        detector,
        auth,
        concurrency_gate: ConcurrencyGate::new(settings.search_concurrency),
        rate_limiter: RateLimiter::new(settings.search_rate),
        update_in_progress: Arc::new(AtomicBool::new(false)),
        pingables: Arc::new(pingables),
    };

    let app = corpus_gateway::router::build(state);

    tracing::info!(addr = %settings.bind_addr, "starting gateway");
    let listener = tokio::net::TcpListener::bind(&settings.bind_addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
