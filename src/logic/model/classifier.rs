//! Classifier strategies
//!
//! Both fitted models sit behind `AnomalyClassifier`; callers pick one with a
//! `ModelKind` parsed from the model name.

use std::fmt;
use std::str::FromStr;

use ndarray::ArrayView1;
use serde::{Deserialize, Serialize};

use super::error::{ModelError, ModelResult};
use crate::logic::features::LayoutInfo;
use crate::logic::threat::AnomalyLabel;

// ============================================================================
// MODEL KIND
// ============================================================================

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ModelKind {
    /// Density-based outlier scoring
    #[default]
    IsolationForest,
    /// Supervised multi-class attack classification
    RandomForest,
}

impl ModelKind {
    pub const ALL: [ModelKind; 2] = [ModelKind::IsolationForest, ModelKind::RandomForest];

    pub fn as_str(&self) -> &'static str {
        match self {
            ModelKind::IsolationForest => "isolation_forest",
            ModelKind::RandomForest => "random_forest",
        }
    }

    /// Estimator type name reported in model metadata
    pub fn type_name(&self) -> &'static str {
        match self {
            ModelKind::IsolationForest => "IsolationForest",
            ModelKind::RandomForest => "RandomForestClassifier",
        }
    }
}

impl fmt::Display for ModelKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl FromStr for ModelKind {
    type Err = ModelError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .iter()
            .find(|kind| kind.as_str() == s)
            .copied()
            .ok_or_else(|| ModelError::ModelNotFound(s.to_string()))
    }
}

// ============================================================================
// CLASSIFICATION
// ============================================================================

/// Strategy output for one normalized vector
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Classification {
    pub is_anomaly: bool,
    /// Strategy-specific certainty in [0, 1]
    pub confidence: f64,
    /// Attack type, when the strategy produces one
    pub label: Option<AnomalyLabel>,
}

/// Static description of a fitted model
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ModelInfo {
    pub name: String,
    #[serde(rename = "type")]
    pub model_type: String,
    pub features: Vec<String>,
    pub num_features: usize,
    pub n_estimators: usize,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub contamination: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub max_depth: Option<usize>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub classes: Option<Vec<String>>,
    pub feature_layout: LayoutInfo,
}

// ============================================================================
// STRATEGY TRAIT
// ============================================================================

pub trait AnomalyClassifier: Send + Sync {
    fn kind(&self) -> ModelKind;

    /// Classify one vector that has already been through the scaler
    fn classify(&self, x: ArrayView1<'_, f64>) -> ModelResult<Classification>;

    /// Per-feature importances in layout order, for strategies that have them
    fn feature_importances(&self) -> Option<&[f64]> {
        None
    }

    fn info(&self) -> ModelInfo;
}
