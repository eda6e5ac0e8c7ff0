//! Synthetic training data
//!
//! The service has no labelled traffic to learn from; both models are fit at
//! startup on a seeded synthetic set so every restart reproduces the same
//! fitted state.

use ndarray::Array2;
use rand::distributions::{Distribution, WeightedIndex};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use serde::{Deserialize, Serialize};

use super::error::{ModelError, ModelResult};
use super::isolation_forest::{IsolationForestParams, DEFAULT_MAX_SAMPLES};
use super::random_forest::RandomForestParams;
use crate::logic::features::FEATURE_COUNT;
use crate::logic::threat::AnomalyLabel;

/// Share of synthetic rows labelled normal; the rest is split evenly over attacks
pub const NORMAL_CLASS_PRIOR: f64 = 0.7;

/// Outlier rows are drawn from N(OUTLIER_MEAN, OUTLIER_STD²)
pub const OUTLIER_MEAN: f64 = 5.0;
pub const OUTLIER_STD: f64 = 3.0;

// ============================================================================
// CONFIGURATION
// ============================================================================

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TrainingConfig {
    pub seed: u64,
    pub normal_samples: usize,
    pub outlier_samples: usize,
    pub isolation_estimators: usize,
    pub contamination: f64,
    pub forest_estimators: usize,
    pub forest_max_depth: usize,
}

impl Default for TrainingConfig {
    fn default() -> Self {
        Self {
            seed: 42,
            normal_samples: 1000,
            outlier_samples: 100,
            isolation_estimators: 100,
            contamination: 0.1,
            forest_estimators: 200,
            forest_max_depth: 20,
        }
    }
}

impl TrainingConfig {
    pub fn validate(&self) -> ModelResult<()> {
        if self.total_samples() == 0 {
            return Err(ModelError::InvalidConfig(
                "synthetic training set would be empty".to_string(),
            ));
        }
        if self.isolation_estimators == 0 || self.forest_estimators == 0 {
            return Err(ModelError::InvalidConfig(
                "estimator counts must be positive".to_string(),
            ));
        }
        if self.forest_max_depth == 0 {
            return Err(ModelError::InvalidConfig(
                "forest max depth must be positive".to_string(),
            ));
        }
        if !(self.contamination > 0.0 && self.contamination <= 0.5) {
            return Err(ModelError::InvalidConfig(format!(
                "contamination must be in (0, 0.5], got {}",
                self.contamination
            )));
        }
        Ok(())
    }

    pub fn total_samples(&self) -> usize {
        self.normal_samples + self.outlier_samples
    }

    pub fn isolation_params(&self) -> IsolationForestParams {
        IsolationForestParams {
            n_estimators: self.isolation_estimators,
            max_samples: DEFAULT_MAX_SAMPLES,
            contamination: self.contamination,
            seed: self.seed,
        }
    }

    pub fn forest_params(&self) -> RandomForestParams {
        RandomForestParams {
            n_estimators: self.forest_estimators,
            max_depth: self.forest_max_depth,
            seed: self.seed,
        }
    }
}

// ============================================================================
// DATASET
// ============================================================================

#[derive(Debug, Clone)]
pub struct SyntheticDataset {
    /// Normal rows first, then outlier rows
    pub features: Array2<f64>,
    /// Class index per row, drawn independently of the features
    pub labels: Vec<usize>,
}

impl SyntheticDataset {
    pub fn generate(config: &TrainingConfig) -> ModelResult<Self> {
        let mut rng = StdRng::seed_from_u64(config.seed);
        let n_rows = config.total_samples();

        let mut features = Array2::<f64>::zeros((n_rows, FEATURE_COUNT));
        for (i, mut row) in features.outer_iter_mut().enumerate() {
            let (mean, std) = if i < config.normal_samples {
                (0.0, 1.0)
            } else {
                (OUTLIER_MEAN, OUTLIER_STD)
            };
            for v in row.iter_mut() {
                *v = mean + std * standard_normal(&mut rng);
            }
        }

        let priors = class_priors();
        let classes = WeightedIndex::new(&priors)
            .map_err(|e| ModelError::InvalidConfig(format!("class priors: {}", e)))?;
        let labels = (0..n_rows).map(|_| classes.sample(&mut rng)).collect();

        Ok(Self { features, labels })
    }
}

/// 0.7 on normal, 0.3 spread evenly over the attack classes
pub fn class_priors() -> Vec<f64> {
    let attacks = (AnomalyLabel::COUNT - 1) as f64;
    AnomalyLabel::ALL
        .iter()
        .map(|label| {
            if label.is_attack() {
                (1.0 - NORMAL_CLASS_PRIOR) / attacks
            } else {
                NORMAL_CLASS_PRIOR
            }
        })
        .collect()
}

/// Box–Muller draw from N(0, 1)
fn standard_normal(rng: &mut StdRng) -> f64 {
    // 1 - U keeps the log argument in (0, 1]
    let u1: f64 = 1.0 - rng.gen::<f64>();
    let u2: f64 = rng.gen();
    (-2.0 * u1.ln()).sqrt() * (std::f64::consts::TAU * u2).cos()
}
