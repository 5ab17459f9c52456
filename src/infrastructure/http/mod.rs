pub mod request_id;

pub use request_id::{request_id_middleware, RequestId};

use axum::{
    middleware,
    routing::{get, post},
    Router,
};
use std::sync::Arc;
use tower_http::trace::TraceLayer;

use crate::controllers::{health, speech::SpeechController};
use crate::infrastructure::config::Config;
use crate::infrastructure::engine::ModelRegistry;

/// Build the application router with all routes configured
pub fn build_router(
    registry: Arc<ModelRegistry>,
    speech_controller: Arc<SpeechController>,
) -> Router {
    // Synthesis routes
    let speech_routes = Router::new()
        .route("/synthesize", post(SpeechController::synthesize))
        .route("/voices", get(SpeechController::list_voices))
        .with_state(speech_controller);

    Router::new()
        .route("/health", get(health::health))
        .route("/health/ready", get(health::health_ready))
        .with_state(registry)
        .merge(speech_routes)
        .layer(middleware::from_fn(request_id_middleware))
        .layer(TraceLayer::new_for_http())
}

/// Start the HTTP server
pub async fn start_http_server(
    config: Arc<Config>,
    registry: Arc<ModelRegistry>,
    speech_controller: Arc<SpeechController>,
) -> Result<(), Box<dyn std::error::Error>> {
    let app = build_router(registry, speech_controller);

    let listener =
        tokio::net::TcpListener::bind(format!("{}:{}", config.host, config.port)).await?;

    tracing::info!("Server listening on {}", listener.local_addr()?);

    axum::serve(listener, app).await?;

    Ok(())
}
