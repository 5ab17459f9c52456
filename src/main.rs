use std::sync::Arc;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use polyvox_server::controllers::speech::SpeechController;
use polyvox_server::domain::speech::SpeechService;
use polyvox_server::infrastructure::config::{Config, LogFormat};
use polyvox_server::infrastructure::engine::ModelRegistry;
use polyvox_server::infrastructure::http::start_http_server;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Load configuration
    let config = Config::from_env()?;

    // Initialize logging
    init_logging(&config);

    tracing::info!("Starting polyvox-server on {}:{}", config.host, config.port);

    // Load every configured voice model up front. A model that cannot be
    // loaded aborts startup.
    tracing::info!(
        voices_dir = %config.voices_dir.display(),
        piper_bin = %config.piper_bin,
        "Loading voice models"
    );
    let registry = Arc::new(ModelRegistry::load(&config)?);
    tracing::info!(models = registry.len(), "Voice models loaded");

    let config = Arc::new(config);

    // === DEPENDENCY INJECTION SETUP ===
    let speech_service = Arc::new(SpeechService::new(registry.clone(), config.cache_enabled));
    let speech_controller = Arc::new(SpeechController::new(speech_service));

    // Start HTTP server with all routes
    start_http_server(config, registry, speech_controller).await?;

    Ok(())
}

fn init_logging(config: &Config) {
    if config.log_format == LogFormat::Json {
        tracing_subscriber::registry()
            .with(
                tracing_subscriber::EnvFilter::try_from_default_env()
                    .unwrap_or_else(|_| "polyvox_server=debug,tower_http=debug".into()),
            )
            .with(tracing_subscriber::fmt::layer().json())
            .init();
    } else {
        tracing_subscriber::registry()
            .with(
                tracing_subscriber::EnvFilter::try_from_default_env()
                    .unwrap_or_else(|_| "polyvox_server=debug,tower_http=debug".into()),
            )
            .with(tracing_subscriber::fmt::layer().pretty())
            .init();
    }
}
