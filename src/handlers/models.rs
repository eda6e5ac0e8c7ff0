//! Model introspection handlers

use std::collections::BTreeMap;

use axum::{
    extract::{Path, Query, State},
    Json,
};
use serde::{Deserialize, Serialize};

use crate::logic::model::{model_metrics, FeatureImportance, ModelCatalog, ModelInfo, ModelMetrics};
use crate::{AppError, AppResult, AppState};

#[derive(Debug, Deserialize)]
pub struct MetricsQuery {
    pub model_name: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct FeatureImportanceResponse {
    pub model_name: String,
    pub feature_importance: FeatureImportance,
}

/// List all models
pub async fn list(State(state): State<AppState>) -> AppResult<Json<ModelCatalog>> {
    let registry = state.models.get()?;
    Ok(Json(registry.list_models()))
}

/// Metadata for one model
pub async fn info(
    State(state): State<AppState>,
    Path(model_name): Path<String>,
) -> AppResult<Json<ModelInfo>> {
    let registry = state.models.get()?;
    Ok(Json(registry.model_info(&model_name)?))
}

/// Ranked feature importances; 404 when the model has none
pub async fn feature_importance(
    State(state): State<AppState>,
    Path(model_name): Path<String>,
) -> AppResult<Json<FeatureImportanceResponse>> {
    let registry = state.models.get()?;
    let feature_importance = registry.feature_importance(&model_name)?;

    if feature_importance.is_empty() {
        return Err(AppError::NotFound(format!(
            "Feature importance not available for {}",
            model_name
        )));
    }

    Ok(Json(FeatureImportanceResponse {
        model_name,
        feature_importance,
    }))
}

/// Static evaluation figures; available before the fit completes
pub async fn metrics(
    Query(query): Query<MetricsQuery>,
) -> AppResult<Json<BTreeMap<String, ModelMetrics>>> {
    Ok(Json(model_metrics(query.model_name.as_deref())?))
}
