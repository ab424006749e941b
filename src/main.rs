use clap::Parser;
use dotenv::dotenv;
use std::sync::Arc;
use tracing::{info, warn};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use lyrics_insight::analysis::{Analyzer, GeminiModel};
use lyrics_insight::config::Config;
use lyrics_insight::genius::GeniusClient;
use lyrics_insight::lyrics::HttpPageFetcher;
use lyrics_insight::{AppState, build_router};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Load environment variables from .env file
    dotenv().ok();

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "lyrics_insight=debug,tower_http=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let config = Config::parse();

    // Credentials are checked per request, not here
    if config.genius_api_key.is_none() {
        warn!("GENIUS_API_KEY not set, search and song lookups will fail");
    }
    if config.gemini_api_key.is_none() {
        warn!("GEMINI_API_KEY not set, analysis will fail");
    }

    let timeout = config.http_timeout();
    let catalog = GeniusClient::new(&config.genius_api_url, config.genius_api_key.clone(), timeout)?;
    let pages = HttpPageFetcher::new(timeout)?;
    let model = GeminiModel::new(
        &config.gemini_api_url,
        &config.gemini_model,
        config.gemini_api_key.clone(),
        timeout,
    )?;

    let state = AppState {
        catalog: Arc::new(catalog),
        pages: Arc::new(pages),
        analyzer: Arc::new(Analyzer::new(Arc::new(model), config.analysis_max_chars)),
    };

    let addr = config.listen_addr();
    let listener = tokio::net::TcpListener::bind(addr).await?;
    info!("Lyrics Insight listening on http://{}", addr);

    axum::serve(listener, build_router(state)).await?;

    Ok(())
}
