mod config;
mod dedup;
mod errors;
mod ingest;
mod models;
mod pipeline;
mod routes;
mod scoring;
mod skills;
mod state;
mod tracker;

use anyhow::Result;
use std::net::SocketAddr;
use tower_http::{cors::CorsLayer, trace::TraceLayer};
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use std::sync::Arc;

use crate::config::Config;
use crate::dedup::Deduplicator;
use crate::routes::build_router;
use crate::skills::SkillCatalog;
use crate::state::AppState;
use crate::tracker::{HistorySource, MarkdownTrackerSource, StaticHistory};

#[tokio::main]
async fn main() -> Result<()> {
    // Load configuration first (fails on malformed env vars)
    let config = Config::from_env()?;

    // Initialize structured logging
    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| {
            EnvFilter::new(format!("{}={}", env!("CARGO_PKG_NAME"), &config.rust_log))
        }))
        .with(tracing_subscriber::fmt::layer())
        .init();

    info!("Starting Radar API v{}", env!("CARGO_PKG_VERSION"));

    // Skill catalog: custom vocabulary file or the built-in list
    let catalog = match &config.skill_catalog_path {
        Some(path) => SkillCatalog::from_file(path)?,
        None => SkillCatalog::builtin(),
    };
    info!(
        "Skill catalog loaded: {} terms, {} fallback",
        catalog.len(),
        catalog.fallback().len()
    );

    let deduplicator = Deduplicator::new(config.source_priority.clone(), config.dedup_config());
    info!(
        "Dedup source priority: {:?}, description tolerance {}",
        deduplicator.priority().sources(),
        config.description_length_tolerance
    );

    // Tracker history: Markdown vault when configured, otherwise none
    let history: Arc<dyn HistorySource> = match &config.tracker_dir {
        Some(dir) => {
            info!("Reading tracker history from {}", dir.display());
            Arc::new(MarkdownTrackerSource::new(dir.clone()))
        }
        None => {
            info!("TRACKER_DIR not set; runs start with no history");
            Arc::new(StaticHistory::default())
        }
    };

    // Build app state
    let state = AppState {
        config: config.clone(),
        catalog: Arc::new(catalog),
        deduplicator,
        history,
    };

    // Build router
    let app = build_router(state)
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive());

    let addr: SocketAddr = format!("0.0.0.0:{}", config.port).parse()?;
    info!("Listening on {addr}");

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
