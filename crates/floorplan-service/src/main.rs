//! Voice-to-plan service
//!
//! Turns a spoken room description into a DXF floor plan and serves the
//! generated drawings from an in-memory cache.

use floorplan_service::{
    start_server, DrawingService, Result, ServerState, ServiceConfig, ServiceError, SharedState,
};
use plan_artifact_cache::ArtifactCache;
use room_extraction::{
    GeminiExtractor, HttpTranscriber, ParameterExtractor, RegexExtractor, Transcriber,
};
use std::sync::Arc;
use tracing::{info, warn};
use tracing_subscriber::{prelude::*, EnvFilter};

#[tokio::main]
async fn main() -> Result<()> {
    // Initialize logging
    let env_filter =
        EnvFilter::from_default_env().add_directive("floorplan_service=info".parse()?);

    // Use JSON format for GCP Cloud Logging when LOG_FORMAT=json
    if std::env::var("LOG_FORMAT")
        .map(|v| v == "json")
        .unwrap_or(false)
    {
        tracing_subscriber::registry()
            .with(env_filter)
            .with(tracing_stackdriver::layer())
            .init();
    } else {
        tracing_subscriber::fmt().with_env_filter(env_filter).init();
    };

    info!("Starting floor-plan service...");

    let config = ServiceConfig::from_env()?;
    info!("Port: {}", config.port);
    info!(
        "Drawing cache: {} items, {} MB",
        config.max_cache_items,
        config.max_cache_bytes / (1024 * 1024)
    );

    let cache = ArtifactCache::new(config.max_cache_items, config.max_cache_bytes);
    let drawings = DrawingService::new(cache);

    let extractor: Arc<dyn ParameterExtractor> = match &config.gemini_api_key {
        Some(key) => {
            info!("Parameter extraction: {}", config.gemini_model);
            Arc::new(GeminiExtractor::with_base_url(
                &config.gemini_base_url,
                &config.gemini_model,
                key,
            )?)
        }
        None => {
            warn!("GEMINI_API_KEY not set, using pattern-based extraction only");
            Arc::new(RegexExtractor::new())
        }
    };

    let transcriber: Option<Arc<dyn Transcriber>> = match &config.speech_api_url {
        Some(url) => {
            info!("Speech recognition: {}", url);
            Some(Arc::new(HttpTranscriber::new(url)?))
        }
        None => {
            warn!("SPEECH_API_URL not set, audio endpoints are disabled");
            None
        }
    };

    let port = config.port;
    let state: SharedState = Arc::new(ServerState::new(drawings, extractor, transcriber, config));

    // Start HTTP server (blocking)
    start_server(state, port)
        .await
        .map_err(|e| ServiceError::Config(format!("Server error: {}", e)))?;

    Ok(())
}
