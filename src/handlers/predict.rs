//! Prediction handlers

use std::time::Instant;

use axum::{extract::State, Json};
use serde::{Deserialize, Serialize};
use validator::Validate;

use crate::logic::features::FeatureMap;
use crate::logic::model::{AnalysisResult, ModelKind, PredictionResult};
use crate::{AppError, AppResult, AppState};

fn default_model_name() -> String {
    ModelKind::default().as_str().to_string()
}

#[derive(Debug, Deserialize, Validate)]
pub struct PredictionRequest {
    pub features: FeatureMap,
    #[serde(default = "default_model_name")]
    #[validate(length(min = 1, max = 64))]
    pub model_name: String,
}

#[derive(Debug, Deserialize, Validate)]
pub struct BatchPredictionRequest {
    pub samples: Vec<FeatureMap>,
    #[serde(default = "default_model_name")]
    #[validate(length(min = 1, max = 64))]
    pub model_name: String,
}

#[derive(Debug, Serialize)]
pub struct PredictionResponse {
    #[serde(flatten)]
    pub prediction: PredictionResult,
    pub processing_time_ms: f64,
}

#[derive(Debug, Serialize)]
pub struct BatchPredictionResponse {
    pub predictions: Vec<PredictionResult>,
    pub total_samples: usize,
    pub anomalies_detected: usize,
    pub processing_time_ms: f64,
}

/// Predict a single sample
pub async fn predict(
    State(state): State<AppState>,
    Json(req): Json<PredictionRequest>,
) -> AppResult<Json<PredictionResponse>> {
    req.validate()?;
    let registry = state.models.get()?;

    let started = Instant::now();
    let prediction = registry.predict(&req.features, &req.model_name)?;

    Ok(Json(PredictionResponse {
        prediction,
        processing_time_ms: elapsed_ms(started),
    }))
}

/// Predict many samples with one model
pub async fn predict_batch(
    State(state): State<AppState>,
    Json(req): Json<BatchPredictionRequest>,
) -> AppResult<Json<BatchPredictionResponse>> {
    req.validate()?;
    if req.samples.len() > state.config.max_batch_size {
        return Err(AppError::ValidationError(format!(
            "Batch of {} samples exceeds the maximum of {}",
            req.samples.len(),
            state.config.max_batch_size
        )));
    }
    let registry = state.models.get()?;

    let started = Instant::now();
    let predictions = registry.predict_batch(&req.samples, &req.model_name)?;
    let anomalies_detected = predictions.iter().filter(|p| p.is_anomaly).count();

    tracing::debug!(
        samples = predictions.len(),
        anomalies = anomalies_detected,
        model = %req.model_name,
        "Batch prediction"
    );

    Ok(Json(BatchPredictionResponse {
        total_samples: predictions.len(),
        anomalies_detected,
        predictions,
        processing_time_ms: elapsed_ms(started),
    }))
}

/// Both models on one sample
pub async fn analyze(
    State(state): State<AppState>,
    Json(features): Json<FeatureMap>,
) -> AppResult<Json<AnalysisResult>> {
    let registry = state.models.get()?;
    Ok(Json(registry.analyze(&features)?))
}

fn elapsed_ms(started: Instant) -> f64 {
    started.elapsed().as_secs_f64() * 1000.0
}

#[cfg(test)]
mod tests {
    use axum::http::StatusCode;
    use serde_json::json;

    use crate::handlers::test_util::{app, post_json};

    #[tokio::test]
    async fn test_predict_before_fit_is_unavailable() {
        let (status, body) = post_json(app(false), "/api/v1/predict", json!({"features": {}})).await;
        assert_eq!(status, StatusCode::SERVICE_UNAVAILABLE);
        assert_eq!(body["error"], "Models not loaded");
        assert_eq!(body["status"], 503);
    }

    #[tokio::test]
    async fn test_predict_defaults_to_isolation_forest() {
        let (status, body) = post_json(
            app(true),
            "/api/v1/predict",
            json!({"features": {"bytes_in": 1500, "protocol_tcp": 1}}),
        )
        .await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["model_used"], "isolation_forest");
        assert!(body["confidence_score"].is_f64());
        assert!(body["processing_time_ms"].is_f64());
        assert!(body["recommendations"].is_array());
    }

    #[tokio::test]
    async fn test_predict_unknown_model_is_not_found() {
        let (status, body) = post_json(
            app(true),
            "/api/v1/predict",
            json!({"features": {}, "model_name": "lstm"}),
        )
        .await;
        assert_eq!(status, StatusCode::NOT_FOUND);
        assert_eq!(body["error"], "Model lstm not found");
    }

    #[tokio::test]
    async fn test_predict_rejects_empty_model_name() {
        let (status, _) = post_json(
            app(true),
            "/api/v1/predict",
            json!({"features": {}, "model_name": ""}),
        )
        .await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn test_batch_counts_anomalies() {
        let (status, body) = post_json(
            app(true),
            "/api/v1/predict/batch",
            json!({
                "samples": [{}, {"bytes_in": 50, "bytes_out": 50}, {}],
                "model_name": "random_forest"
            }),
        )
        .await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["total_samples"], 3);

        let predictions = body["predictions"].as_array().unwrap();
        assert_eq!(predictions.len(), 3);
        let anomalies = predictions.iter().filter(|p| p["is_anomaly"] == true).count();
        assert_eq!(body["anomalies_detected"], anomalies);
        assert!(predictions.iter().all(|p| p["model_used"] == "random_forest"));
    }

    #[tokio::test]
    async fn test_batch_over_limit_is_rejected() {
        let samples: Vec<_> = (0..4).map(|_| json!({})).collect();
        let (status, _) = post_json(
            crate::handlers::test_util::app_with_batch_limit(3),
            "/api/v1/predict/batch",
            json!({"samples": samples}),
        )
        .await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn test_analyze() {
        let (status, body) = post_json(
            app(true),
            "/api/v1/predict/analyze",
            json!({"syn_count": 900, "unique_dst_ips": 250}),
        )
        .await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["isolation_forest_analysis"]["model_used"], "isolation_forest");
        assert_eq!(body["random_forest_analysis"]["model_used"], "random_forest");
        assert!(body["consensus"].is_boolean());

        let combined = body["combined_risk_score"].as_f64().unwrap();
        assert!((0.0..=1.0).contains(&combined));
    }
}
