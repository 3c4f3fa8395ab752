mod assessment;
mod careers;
mod config;
mod db;
mod errors;
mod llm_client;
mod models;
mod roadmaps;
mod routes;
mod state;

use std::net::SocketAddr;
use std::sync::Arc;

use anyhow::{Context, Result};
use tower_http::{cors::CorsLayer, trace::TraceLayer};
use tracing::{info, warn};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use crate::assessment::enricher::RecommendationEnricher;
use crate::assessment::pipeline::AssessmentPipeline;
use crate::assessment::questionnaire::verify_questionnaire;
use crate::careers::catalog::PgCareerCatalog;
use crate::careers::seed::{load_seed_file, replace_catalog};
use crate::config::Config;
use crate::db::{create_pool, run_migrations};
use crate::llm_client::{GeminiClient, TextGenerator};
use crate::routes::build_router;
use crate::state::AppState;

#[tokio::main]
async fn main() -> Result<()> {
    // Load configuration first (fails on missing required env vars)
    let config = Config::from_env()?;

    // Initialize structured logging
    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| {
            EnvFilter::new(format!("{}={}", env!("CARGO_PKG_NAME"), &config.rust_log))
        }))
        .with(tracing_subscriber::fmt::layer())
        .init();

    info!("Starting Pathlight API v{}", env!("CARGO_PKG_VERSION"));

    verify_questionnaire().context("Questionnaire tables are inconsistent")?;

    // Initialize PostgreSQL
    let db = create_pool(&config.database_url).await?;
    run_migrations(&db).await?;

    if let Some(path) = &config.career_seed_path {
        let seeds = load_seed_file(path).await?;
        let stored = replace_catalog(&db, &seeds).await?;
        info!("Seeded {stored} careers from {}", path.display());
    }

    // Initialize the text generator; without a key every report uses the fallback path
    let generator: Option<Arc<dyn TextGenerator>> = match &config.gemini_api_key {
        Some(key) => {
            let client = GeminiClient::new(
                key.clone(),
                config.gemini_model.clone(),
                config.gemini_base_url.clone(),
                config.llm_timeout,
            )?;
            info!("LLM client initialized (model: {})", client.model());
            Some(Arc::new(client))
        }
        None => {
            warn!("GEMINI_API_KEY not set; recommendations will use the deterministic fallback");
            None
        }
    };

    let pipeline = AssessmentPipeline::new(
        Arc::new(PgCareerCatalog::new(db.clone())),
        RecommendationEnricher::new(generator),
        config.recommendation_limit,
    );

    // Build app state
    let state = AppState {
        db,
        assessment: Arc::new(pipeline),
    };

    // Build router
    let app = build_router(state)
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive()); // TODO: restrict origins once the web client's host is fixed

    let addr: SocketAddr = format!("0.0.0.0:{}", config.port).parse()?;
    info!("Listening on {addr}");

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
