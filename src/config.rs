//! Configuration module

use std::env;
use std::str::FromStr;

use crate::logic::model::TrainingConfig;

/// Application configuration
#[derive(Debug, Clone)]
pub struct Config {
    /// Server port
    pub port: u16,

    /// Environment (development, production)
    pub environment: String,

    /// Maximum samples accepted by one batch request
    pub max_batch_size: usize,

    /// Synthetic fit parameters used at startup
    pub training: TrainingConfig,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            port: 8001,
            environment: "development".to_string(),
            max_batch_size: 1000,
            training: TrainingConfig::default(),
        }
    }
}

impl Config {
    /// Load configuration from environment variables
    pub fn from_env() -> Self {
        let defaults = Self::default();
        let training = defaults.training;

        Self {
            port: env_or("PORT", defaults.port),

            environment: env::var("ENVIRONMENT").unwrap_or(defaults.environment),

            max_batch_size: env_or("MAX_BATCH_SIZE", defaults.max_batch_size),

            training: TrainingConfig {
                seed: env_or("TRAINING_SEED", training.seed),
                normal_samples: env_or("TRAINING_NORMAL_SAMPLES", training.normal_samples),
                outlier_samples: env_or("TRAINING_OUTLIER_SAMPLES", training.outlier_samples),
                isolation_estimators: env_or("ISOLATION_FOREST_ESTIMATORS", training.isolation_estimators),
                contamination: env_or("ISOLATION_FOREST_CONTAMINATION", training.contamination),
                forest_estimators: env_or("RANDOM_FOREST_ESTIMATORS", training.forest_estimators),
                forest_max_depth: env_or("RANDOM_FOREST_MAX_DEPTH", training.forest_max_depth),
            },
        }
    }

    /// Check if running in production
    pub fn is_production(&self) -> bool {
        self.environment == "production"
    }
}

/// Parsed variable, or the default when unset or unparsable
fn env_or<T: FromStr>(key: &str, default: T) -> T {
    env::var(key)
        .ok()
        .and_then(|v| v.parse().ok())
        .unwrap_or(default)
}
