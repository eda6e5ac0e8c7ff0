//! Demo evaluation metrics
//!
//! Fixed figures reported by the metrics endpoint; no evaluation runs.

use std::collections::BTreeMap;

use chrono::{DateTime, Utc};
use serde::Serialize;

use super::classifier::ModelKind;
use super::error::ModelResult;

/// 2024-12-01T00:00:00Z
const LAST_TRAINED_EPOCH_SECS: i64 = 1_733_011_200;

const DEMO_TRAINING_SAMPLES: usize = 1100;

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ModelMetrics {
    pub accuracy: f64,
    pub precision: f64,
    pub recall: f64,
    pub f1_score: f64,
    pub false_positive_rate: f64,
    pub training_samples: usize,
    pub last_trained: DateTime<Utc>,
}

impl ModelMetrics {
    pub fn for_kind(kind: ModelKind) -> Self {
        let last_trained = DateTime::from_timestamp(LAST_TRAINED_EPOCH_SECS, 0).unwrap_or_default();

        match kind {
            ModelKind::IsolationForest => Self {
                accuracy: 0.942,
                precision: 0.921,
                recall: 0.958,
                f1_score: 0.939,
                false_positive_rate: 0.079,
                training_samples: DEMO_TRAINING_SAMPLES,
                last_trained,
            },
            ModelKind::RandomForest => Self {
                accuracy: 0.978,
                precision: 0.972,
                recall: 0.981,
                f1_score: 0.976,
                false_positive_rate: 0.028,
                training_samples: DEMO_TRAINING_SAMPLES,
                last_trained,
            },
        }
    }
}

/// Metrics for one model, or all of them when no name is given
pub fn model_metrics(model_name: Option<&str>) -> ModelResult<BTreeMap<String, ModelMetrics>> {
    let kinds = match model_name {
        Some(name) => vec![name.parse::<ModelKind>()?],
        None => ModelKind::ALL.to_vec(),
    };

    Ok(kinds
        .into_iter()
        .map(|kind| (kind.as_str().to_string(), ModelMetrics::for_kind(kind)))
        .collect())
}
