//! Health check handlers

use axum::{extract::State, Json};
use serde::Serialize;

use crate::logic::features::LayoutInfo;
use crate::logic::model::StatsSnapshot;
use crate::AppState;

pub const SERVICE_NAME: &str = "ml-service";

#[derive(Serialize)]
pub struct RootResponse {
    message: &'static str,
    version: &'static str,
}

#[derive(Serialize)]
pub struct HealthResponse {
    status: &'static str,
    version: &'static str,
    service: &'static str,
    models_loaded: bool,
    timestamp: i64,
}

/// Engine status for operators
#[derive(Serialize)]
pub struct StatusResponse {
    models_loaded: bool,
    fitted_at: Option<chrono::DateTime<chrono::Utc>>,
    training_samples: Option<usize>,
    feature_layout: LayoutInfo,
    #[serde(flatten)]
    stats: StatsSnapshot,
}

pub async fn root() -> Json<RootResponse> {
    Json(RootResponse {
        message: "IoT Network Sentinel - ML Service",
        version: env!("CARGO_PKG_VERSION"),
    })
}

pub async fn check(State(state): State<AppState>) -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "healthy",
        version: env!("CARGO_PKG_VERSION"),
        service: SERVICE_NAME,
        models_loaded: state.models.is_ready(),
        timestamp: chrono::Utc::now().timestamp(),
    })
}

pub async fn status(State(state): State<AppState>) -> Json<StatusResponse> {
    let registry = state.models.get().ok();

    Json(StatusResponse {
        models_loaded: registry.is_some(),
        fitted_at: registry.map(|r| r.fitted_at()),
        training_samples: registry.map(|r| r.training_config().total_samples()),
        feature_layout: LayoutInfo::current(),
        stats: registry.map(|r| r.stats().snapshot()).unwrap_or(StatsSnapshot {
            inference_count: 0,
            avg_latency_ms: 0.0,
        }),
    })
}
