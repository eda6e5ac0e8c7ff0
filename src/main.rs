//! IoT Network Sentinel ML Service binary

use std::net::SocketAddr;
use std::sync::Arc;

use anyhow::Context;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use iot_sentinel_ml::config::Config;
use iot_sentinel_ml::logic::model::{ModelRegistry, ModelStore};
use iot_sentinel_ml::{create_router, AppState};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load configuration
    dotenvy::dotenv().ok();
    let config = Config::from_env();

    // Initialize logging; JSON lines in production
    let json = config.is_production();
    tracing_subscriber::registry()
        .with(tracing_subscriber::EnvFilter::try_from_default_env()
            .unwrap_or_else(|_| "iot_sentinel_ml=debug,tower_http=debug".into()))
        .with(json.then(|| tracing_subscriber::fmt::layer().json()))
        .with((!json).then(tracing_subscriber::fmt::layer))
        .init();

    tracing::info!("IoT Sentinel ML Service starting...");
    tracing::info!(environment = %config.environment, "Configuration loaded");

    // Fit models off the runtime; requests get 503 until this lands
    let models = Arc::new(ModelStore::new());
    {
        let models = Arc::clone(&models);
        let training = config.training.clone();
        tokio::task::spawn_blocking(move || match ModelRegistry::fit(&training) {
            Ok(registry) => {
                models.install(registry);
            }
            Err(e) => tracing::error!("Failed to load models: {}", e),
        });
    }

    // Build application state
    let state = AppState {
        config: config.clone(),
        models,
    };

    // Build router
    let app = create_router(state);

    // Start server
    let addr = SocketAddr::from(([0, 0, 0, 0], config.port));
    tracing::info!("🚀 Server listening on http://{}", addr);

    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .with_context(|| format!("failed to bind {}", addr))?;
    axum::serve(listener, app).await.context("server error")?;

    Ok(())
}
