//! IoT Network Sentinel - ML Service
//!
//! Anomaly detection and attack classification over network flow features.
//!
//! # Architecture
//!
//! ```text
//! ┌──────────────────────────────────────────────────────────────┐
//! │                    IOT SENTINEL ML SERVICE                   │
//! ├──────────────────────────────────────────────────────────────┤
//! │  ┌───────────┐   ┌──────────────────────────────────────┐    │
//! │  │  API      │   │  Model Registry (set once at start)  │    │
//! │  │  (Axum)   │──▶│  scaler · isolation forest · forest  │    │
//! │  └───────────┘   └──────────────────┬───────────────────┘    │
//! │                                     ▼                        │
//! │                      risk scorer · recommendations           │
//! └──────────────────────────────────────────────────────────────┘
//! ```

pub mod config;
pub mod error;
pub mod handlers;
pub mod logic;

use std::sync::Arc;

use axum::{
    Router,
    routing::{get, post},
};
use tower_http::{
    cors::{CorsLayer, Any},
    trace::TraceLayer,
    compression::CompressionLayer,
};

pub use error::{AppError, AppResult};

use crate::logic::model::ModelStore;

/// Shared application state
#[derive(Clone)]
pub struct AppState {
    pub config: config::Config,
    pub models: Arc<ModelStore>,
}

/// Create the main router with all routes
pub fn create_router(state: AppState) -> Router {
    let public_routes = Router::new()
        .route("/", get(handlers::health::root))
        .route("/health", get(handlers::health::check))
        .route("/status", get(handlers::health::status));

    let predict_routes = Router::new()
        .route("/api/v1/predict", post(handlers::predict::predict))
        .route("/api/v1/predict/batch", post(handlers::predict::predict_batch))
        .route("/api/v1/predict/analyze", post(handlers::predict::analyze));

    let model_routes = Router::new()
        .route("/api/v1/models", get(handlers::models::list))
        .route("/api/v1/models/metrics", get(handlers::models::metrics))
        .route("/api/v1/models/:model_name", get(handlers::models::info))
        .route(
            "/api/v1/models/feature-importance/:model_name",
            get(handlers::models::feature_importance),
        );

    // Combine all routes
    Router::new()
        .merge(public_routes)
        .merge(predict_routes)
        .merge(model_routes)
        .layer(CompressionLayer::new())
        .layer(TraceLayer::new_for_http())
        .layer(
            CorsLayer::new()
                .allow_origin(Any)
                .allow_methods(Any)
                .allow_headers(Any)
        )
        .with_state(state)
}
