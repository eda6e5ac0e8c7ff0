//! Model Registry
//!
//! Owns the fitted scaler and both strategies. Built once at startup and
//! read-only afterwards; `ModelStore` is the set-once cell handlers read it
//! through.

use std::collections::BTreeMap;
use std::time::Instant;

use chrono::{DateTime, Utc};
use once_cell::sync::OnceCell;
use serde::ser::{Serialize, SerializeMap, Serializer};

use super::classifier::{AnomalyClassifier, ModelInfo, ModelKind};
use super::error::{ModelError, ModelResult};
use super::inference::InferenceStats;
use super::isolation_forest::IsolationForest;
use super::random_forest::RandomForest;
use super::scaler::StandardScaler;
use super::training::{SyntheticDataset, TrainingConfig};
use crate::logic::features::feature_name;
use crate::logic::threat::AnomalyLabel;

// ============================================================================
// REGISTRY
// ============================================================================

pub struct ModelRegistry {
    pub(super) scaler: StandardScaler,
    pub(super) isolation_forest: IsolationForest,
    pub(super) random_forest: RandomForest,
    pub(super) stats: InferenceStats,
    training: TrainingConfig,
    fitted_at: DateTime<Utc>,
}

impl ModelRegistry {
    /// Generate the synthetic set and fit everything on it
    pub fn fit(config: &TrainingConfig) -> ModelResult<Self> {
        config.validate()?;

        tracing::info!(
            seed = config.seed,
            samples = config.total_samples(),
            "Fitting models on synthetic training data"
        );

        let dataset = SyntheticDataset::generate(config)?;
        Self::fit_dataset(&dataset, config)
    }

    /// Fit the scaler on `dataset`, then both strategies on the normalized
    /// rows with the estimator settings from `config`
    pub fn fit_dataset(dataset: &SyntheticDataset, config: &TrainingConfig) -> ModelResult<Self> {
        config.validate()?;
        let started = Instant::now();

        let scaler = StandardScaler::fit(dataset.features.view())?;
        let normalized = scaler.transform_batch(dataset.features.view())?;

        let isolation_forest = IsolationForest::fit(normalized.view(), &config.isolation_params())?;
        tracing::info!(
            estimators = config.isolation_estimators,
            "Isolation Forest model ready"
        );

        let random_forest = RandomForest::fit(
            normalized.view(),
            &dataset.labels,
            AnomalyLabel::COUNT,
            &config.forest_params(),
        )?;
        tracing::info!(
            estimators = config.forest_estimators,
            max_depth = config.forest_max_depth,
            "Random Forest model ready"
        );

        tracing::info!(
            elapsed_ms = started.elapsed().as_millis() as u64,
            "All models loaded"
        );

        Ok(Self {
            scaler,
            isolation_forest,
            random_forest,
            stats: InferenceStats::default(),
            training: config.clone(),
            fitted_at: Utc::now(),
        })
    }

    pub fn classifier(&self, kind: ModelKind) -> &dyn AnomalyClassifier {
        match kind {
            ModelKind::IsolationForest => &self.isolation_forest,
            ModelKind::RandomForest => &self.random_forest,
        }
    }

    pub fn scaler(&self) -> &StandardScaler {
        &self.scaler
    }

    pub fn isolation_forest(&self) -> &IsolationForest {
        &self.isolation_forest
    }

    pub fn random_forest(&self) -> &RandomForest {
        &self.random_forest
    }

    pub fn stats(&self) -> &InferenceStats {
        &self.stats
    }

    pub fn training_config(&self) -> &TrainingConfig {
        &self.training
    }

    pub fn fitted_at(&self) -> DateTime<Utc> {
        self.fitted_at
    }

    // ------------------------------------------------------------------------
    // Introspection
    // ------------------------------------------------------------------------

    pub fn list_models(&self) -> ModelCatalog {
        let details: BTreeMap<String, ModelInfo> = ModelKind::ALL
            .iter()
            .map(|&kind| (kind.as_str().to_string(), self.classifier(kind).info()))
            .collect();

        ModelCatalog {
            models: details.keys().cloned().collect(),
            details,
        }
    }

    pub fn model_info(&self, model_name: &str) -> ModelResult<ModelInfo> {
        let kind: ModelKind = model_name.parse()?;
        Ok(self.classifier(kind).info())
    }

    /// Importances sorted descending; empty for strategies without them
    pub fn feature_importance(&self, model_name: &str) -> ModelResult<FeatureImportance> {
        let kind: ModelKind = model_name.parse()?;

        let Some(values) = self.classifier(kind).feature_importances() else {
            return Ok(FeatureImportance::default());
        };

        let mut ranked: Vec<(String, f64)> = values
            .iter()
            .enumerate()
            .filter_map(|(index, &v)| feature_name(index).map(|name| (name.to_string(), v)))
            .collect();
        ranked.sort_by(|a, b| b.1.total_cmp(&a.1));

        Ok(FeatureImportance(ranked))
    }
}

impl std::fmt::Debug for ModelRegistry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ModelRegistry")
            .field("training", &self.training)
            .field("fitted_at", &self.fitted_at)
            .finish_non_exhaustive()
    }
}

/// Model names plus metadata keyed by name
#[derive(Debug, Clone, serde::Serialize)]
pub struct ModelCatalog {
    pub models: Vec<String>,
    pub details: BTreeMap<String, ModelInfo>,
}

/// Feature name → importance, kept in descending order on the wire
#[derive(Debug, Clone, Default, PartialEq)]
pub struct FeatureImportance(pub Vec<(String, f64)>);

impl FeatureImportance {
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn get(&self, feature: &str) -> Option<f64> {
        self.0.iter().find(|(name, _)| name == feature).map(|(_, v)| *v)
    }

    pub fn iter(&self) -> impl Iterator<Item = &(String, f64)> {
        self.0.iter()
    }
}

impl Serialize for FeatureImportance {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.0.len()))?;
        for (name, value) in &self.0 {
            map.serialize_entry(name, value)?;
        }
        map.end()
    }
}

// ============================================================================
// READINESS GATE
// ============================================================================

/// Set-once holder for the registry; empty until the startup fit completes
#[derive(Debug, Default)]
pub struct ModelStore {
    cell: OnceCell<ModelRegistry>,
}

impl ModelStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Publish the fitted registry. A second install keeps the first one.
    pub fn install(&self, registry: ModelRegistry) -> &ModelRegistry {
        match self.cell.try_insert(registry) {
            Ok(installed) => installed,
            Err((existing, _)) => {
                tracing::warn!("Model registry already installed, ignoring refit");
                existing
            }
        }
    }

    pub fn get(&self) -> ModelResult<&ModelRegistry> {
        self.cell.get().ok_or(ModelError::NotReady)
    }

    pub fn is_ready(&self) -> bool {
        self.cell.get().is_some()
    }
}

// ============================================================================
// TEST SUPPORT
// ============================================================================
