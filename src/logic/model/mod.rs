//! Model Module - Anomaly Classification Engine
//!
//! Scaler and both strategies are fit once on synthetic data, then held in a
//! read-only registry behind a set-once readiness gate.
//!
//! ## Structure
//! - `scaler`: per-feature standardization
//! - `isolation_forest`, `decision_tree`, `random_forest`: the strategies
//! - `training`: synthetic training set and fit parameters
//! - `registry`: fitted state, introspection, readiness gate
//! - `inference`: prediction pipeline and latency stats
//! - `metrics`: demo evaluation figures

pub mod error;
pub mod scaler;
pub mod classifier;
pub mod isolation_forest;
pub mod decision_tree;
pub mod random_forest;
pub mod training;
pub mod registry;
pub mod inference;
pub mod metrics;

// Re-export common types
pub use error::{ModelError, ModelResult};
pub use classifier::{AnomalyClassifier, Classification, ModelInfo, ModelKind};
pub use training::TrainingConfig;
pub use registry::{FeatureImportance, ModelCatalog, ModelRegistry, ModelStore};
pub use inference::{AnalysisResult, InferenceStats, PredictionResult, StatsSnapshot};
pub use metrics::{model_metrics, ModelMetrics};
