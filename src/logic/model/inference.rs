//! Inference Engine
//!
//! Single-pass pipeline per call: attribute bag → feature vector → scaler →
//! strategy → risk score + recommendations. Nothing here mutates the fitted
//! models, so calls run concurrently without locks.

use std::sync::atomic::{AtomicU64, Ordering};
use std::time::{Duration, Instant};

use serde::{Deserialize, Serialize};

use super::classifier::ModelKind;
use super::error::ModelResult;
use super::registry::ModelRegistry;
use crate::logic::features::{FeatureMap, FeatureVector};
use crate::logic::threat::{generate_recommendations, risk_score, AnomalyLabel};

// ============================================================================
// DATA STRUCTURES
// ============================================================================

/// Prediction output
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PredictionResult {
    pub is_anomaly: bool,
    /// Present only when `is_anomaly` is true
    pub anomaly_type: Option<AnomalyLabel>,
    #[serde(rename = "confidence_score")]
    pub confidence: f64,
    pub risk_score: f64,
    pub model_used: String,
    pub recommendations: Vec<String>,
}

/// Both strategies on the same input
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AnalysisResult {
    pub isolation_forest_analysis: PredictionResult,
    pub random_forest_analysis: PredictionResult,
    pub combined_risk_score: f64,
    /// Both strategies agree on the anomaly flag
    pub consensus: bool,
    pub recommendations: Vec<String>,
}

// ============================================================================
// STATS
// ============================================================================

/// Latency stats
#[derive(Debug, Default)]
pub struct InferenceStats {
    latency_sum_us: AtomicU64,
    inference_count: AtomicU64,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct StatsSnapshot {
    pub inference_count: u64,
    pub avg_latency_ms: f64,
}

impl InferenceStats {
    pub fn record(&self, elapsed: Duration) {
        self.latency_sum_us
            .fetch_add(elapsed.as_micros() as u64, Ordering::Relaxed);
        self.inference_count.fetch_add(1, Ordering::Relaxed);
    }

    pub fn snapshot(&self) -> StatsSnapshot {
        let sum = self.latency_sum_us.load(Ordering::Relaxed);
        let count = self.inference_count.load(Ordering::Relaxed);
        let avg = if count > 0 {
            (sum as f64 / count as f64) / 1000.0
        } else {
            0.0
        };

        StatsSnapshot {
            inference_count: count,
            avg_latency_ms: avg,
        }
    }
}

// ============================================================================
// PIPELINE
// ============================================================================

impl ModelRegistry {
    /// Predict one attribute bag with the named strategy
    pub fn predict(&self, features: &FeatureMap, model_name: &str) -> ModelResult<PredictionResult> {
        let kind: ModelKind = model_name.parse()?;
        self.predict_vector(&FeatureVector::from_attributes(features), kind)
    }

    pub fn predict_vector(&self, vector: &FeatureVector, kind: ModelKind) -> ModelResult<PredictionResult> {
        let started = Instant::now();

        let normalized = self.scaler.transform(vector.view())?;
        let classification = self.classifier(kind).classify(normalized.view())?;

        // Outlier flags carry no attack type of their own; borrow the
        // classifier's call on the same vector
        let anomaly_type = match (classification.is_anomaly, classification.label) {
            (false, _) => None,
            (true, Some(label)) => Some(label),
            (true, None) => Some(self.random_forest.predict_label(normalized.view())?),
        };

        let label = anomaly_type.as_ref().map(AnomalyLabel::as_str);
        let risk = risk_score(classification.is_anomaly, classification.confidence, label);
        let recommendations = generate_recommendations(classification.is_anomaly, label, risk);

        self.stats.record(started.elapsed());

        tracing::debug!(
            model = kind.as_str(),
            is_anomaly = classification.is_anomaly,
            anomaly_type = label.unwrap_or("-"),
            risk,
            "Prediction"
        );

        Ok(PredictionResult {
            is_anomaly: classification.is_anomaly,
            anomaly_type,
            confidence: classification.confidence,
            risk_score: risk,
            model_used: kind.as_str().to_string(),
            recommendations,
        })
    }

    /// Sequential single predictions, input order preserved. An unknown model
    /// name fails before any sample runs.
    pub fn predict_batch(&self, samples: &[FeatureMap], model_name: &str) -> ModelResult<Vec<PredictionResult>> {
        let kind: ModelKind = model_name.parse()?;
        samples
            .iter()
            .map(|features| self.predict_vector(&FeatureVector::from_attributes(features), kind))
            .collect()
    }

    /// Run both strategies and merge their verdicts
    pub fn analyze(&self, features: &FeatureMap) -> ModelResult<AnalysisResult> {
        let vector = FeatureVector::from_attributes(features);
        let isolation = self.predict_vector(&vector, ModelKind::IsolationForest)?;
        let forest = self.predict_vector(&vector, ModelKind::RandomForest)?;

        let mut recommendations: Vec<String> = Vec::new();
        for item in isolation.recommendations.iter().chain(&forest.recommendations) {
            if !recommendations.contains(item) {
                recommendations.push(item.clone());
            }
        }

        Ok(AnalysisResult {
            combined_risk_score: isolation.risk_score.max(forest.risk_score),
            consensus: isolation.is_anomaly == forest.is_anomaly,
            recommendations,
            isolation_forest_analysis: isolation,
            random_forest_analysis: forest,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::logic::model::error::ModelError;
    use crate::logic::model::registry::test_support::{reduced_config, registry};
    use crate::logic::model::training::{SyntheticDataset, TrainingConfig};
    use crate::logic::threat::rules::{
        type_actions, BASELINE_ACTIONS, CONTINUE_MONITORING, CRITICAL_MARKER, ESCALATION_ACTIONS,
    };
    use ndarray::s;
    use serde_json::json;

    fn bag(pairs: &[(&str, serde_json::Value)]) -> FeatureMap {
        pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.clone()))
            .collect()
    }

    /// Far outside the synthetic range on every feature
    fn extreme_bag() -> FeatureMap {
        crate::logic::features::FEATURE_LAYOUT
            .iter()
            .map(|name| (name.to_string(), json!(50.0)))
            .collect()
    }

    #[test]
    fn test_empty_bag_confidence_strictly_inside_unit_interval() {
        let result = registry().predict(&FeatureMap::new(), "isolation_forest").unwrap();
        assert!(result.confidence > 0.0 && result.confidence < 1.0);
        assert_eq!(result.model_used, "isolation_forest");
    }

    #[test]
    fn test_central_point_is_normal() {
        let result = registry().predict(&FeatureMap::new(), "isolation_forest").unwrap();
        assert!(!result.is_anomaly);
        assert_eq!(result.anomaly_type, None);
        assert_eq!(result.risk_score, 0.0);
        assert_eq!(result.recommendations, vec![CONTINUE_MONITORING]);
    }

    #[test]
    fn test_outlier_borrows_classifier_label() {
        let registry = registry();
        let features = extreme_bag();
        let result = registry.predict(&features, "isolation_forest").unwrap();
        assert!(result.is_anomaly);

        let vector = FeatureVector::from_attributes(&features);
        let normalized = registry.scaler().transform(vector.view()).unwrap();
        let expected = registry.random_forest().predict_label(normalized.view()).unwrap();
        assert_eq!(result.anomaly_type, Some(expected));
        assert!(result.risk_score > 0.0 && result.risk_score <= 1.0);
    }

    #[test]
    fn test_idempotent() {
        let features = bag(&[("bytes_in", json!(1200)), ("syn_count", json!(40))]);
        for model in ["isolation_forest", "random_forest"] {
            let a = registry().predict(&features, model).unwrap();
            let b = registry().predict(&features, model).unwrap();
            assert_eq!(a, b);
        }
    }

    #[test]
    fn test_unconvertible_values_are_zero() {
        let junk = bag(&[
            ("bytes_in", json!("lots")),
            ("packets_in", json!(null)),
            ("duration", json!([1, 2])),
            ("not_a_feature", json!(99)),
        ]);
        let junk_result = registry().predict(&junk, "random_forest").unwrap();
        let empty_result = registry().predict(&FeatureMap::new(), "random_forest").unwrap();
        assert_eq!(junk_result, empty_result);
    }

    #[test]
    fn test_string_and_boolean_values_are_coerced() {
        let encoded = bag(&[
            ("bytes_in", json!("1500")),
            ("syn_count", json!(" 40 ")),
            ("protocol_tcp", json!(true)),
        ]);
        let numeric = bag(&[
            ("bytes_in", json!(1500.0)),
            ("syn_count", json!(40)),
            ("protocol_tcp", json!(1)),
        ]);
        for model in ["isolation_forest", "random_forest"] {
            assert_eq!(
                registry().predict(&encoded, model).unwrap(),
                registry().predict(&numeric, model).unwrap()
            );
        }
    }

    #[test]
    fn test_random_forest_label_only_when_anomalous() {
        for features in [FeatureMap::new(), extreme_bag()] {
            let result = registry().predict(&features, "random_forest").unwrap();
            assert_eq!(result.is_anomaly, result.anomaly_type.is_some());
            if let Some(label) = result.anomaly_type {
                assert!(label.is_attack());
            }
            assert!((0.0..=1.0).contains(&result.confidence));
            assert!((0.0..=1.0).contains(&result.risk_score));
        }
    }

    /// Outlier rows shifted far from the normal block and all labelled
    /// malware, so the extreme bag is a confident malware call
    fn malware_registry() -> ModelRegistry {
        let config = TrainingConfig {
            isolation_estimators: 20,
            forest_estimators: 20,
            ..reduced_config()
        };
        let mut dataset = SyntheticDataset::generate(&config).unwrap();
        dataset
            .features
            .slice_mut(s![config.normal_samples.., ..])
            .mapv_inplace(|v| v + 20.0);
        dataset.labels = (0..config.total_samples())
            .map(|row| {
                if row < config.normal_samples {
                    AnomalyLabel::Normal.index()
                } else {
                    AnomalyLabel::Malware.index()
                }
            })
            .collect();
        ModelRegistry::fit_dataset(&dataset, &config).unwrap()
    }

    #[test]
    fn test_critical_escalation_layout() {
        let registry = malware_registry();
        let result = registry.predict(&extreme_bag(), "random_forest").unwrap();

        assert!(result.is_anomaly);
        assert_eq!(result.anomaly_type, Some(AnomalyLabel::Malware));
        assert!(result.risk_score > 0.8, "risk {}", result.risk_score);

        let specific = type_actions("malware");
        let recs = &result.recommendations;
        assert_eq!(recs.len(), 2 + specific.len() + 2 + 1);
        assert_eq!(recs[0], CRITICAL_MARKER);
        assert_eq!(&recs[1..3], BASELINE_ACTIONS);
        assert_eq!(&recs[3..3 + specific.len()], specific);
        assert_eq!(&recs[3 + specific.len()..], ESCALATION_ACTIONS);
    }

    #[test]
    fn test_moderate_risk_has_no_escalation() {
        let registry = malware_registry();
        let result = registry.predict(&FeatureMap::new(), "random_forest").unwrap();

        assert!(!result.is_anomaly);
        assert!(!result.recommendations.iter().any(|r| r == CRITICAL_MARKER));
    }

    #[test]
    fn test_unknown_model() {
        assert_eq!(
            registry().predict(&FeatureMap::new(), "svm").unwrap_err(),
            ModelError::ModelNotFound("svm".to_string())
        );
        assert!(registry().predict_batch(&[FeatureMap::new()], "svm").is_err());
    }

    #[test]
    fn test_batch_preserves_order() {
        let samples = vec![FeatureMap::new(), extreme_bag(), FeatureMap::new()];
        let batch = registry().predict_batch(&samples, "isolation_forest").unwrap();
        assert_eq!(batch.len(), 3);
        for (sample, result) in samples.iter().zip(&batch) {
            assert_eq!(&registry().predict(sample, "isolation_forest").unwrap(), result);
        }
        assert!(registry().predict_batch(&[], "random_forest").unwrap().is_empty());
    }

    #[test]
    fn test_analyze_merges_both_strategies() {
        let features = extreme_bag();
        let analysis = registry().analyze(&features).unwrap();

        let iso = &analysis.isolation_forest_analysis;
        let rf = &analysis.random_forest_analysis;
        assert_eq!(iso.model_used, "isolation_forest");
        assert_eq!(rf.model_used, "random_forest");
        assert_eq!(analysis.combined_risk_score, iso.risk_score.max(rf.risk_score));
        assert_eq!(analysis.consensus, iso.is_anomaly == rf.is_anomaly);

        // Union without duplicates, density strategy first
        for item in iso.recommendations.iter().chain(&rf.recommendations) {
            assert_eq!(analysis.recommendations.iter().filter(|r| *r == item).count(), 1);
        }
        assert_eq!(analysis.recommendations[0], iso.recommendations[0]);
    }

    #[test]
    fn test_wire_names() {
        let result = registry().predict(&FeatureMap::new(), "isolation_forest").unwrap();
        let value = serde_json::to_value(&result).unwrap();
        assert!(value.get("confidence_score").is_some());
        assert!(value.get("confidence").is_none());
        assert_eq!(value["anomaly_type"], serde_json::Value::Null);
    }

    #[test]
    fn test_concurrent_predictions_agree() {
        let expected = registry().predict(&extreme_bag(), "random_forest").unwrap();

        let results = tokio_test::block_on(async {
            let handles: Vec<_> = (0..8)
                .map(|_| {
                    tokio::task::spawn_blocking(|| registry().predict(&extreme_bag(), "random_forest"))
                })
                .collect();

            let mut results = Vec::new();
            for handle in handles {
                results.push(handle.await.unwrap().unwrap());
            }
            results
        });

        assert_eq!(results.len(), 8);
        assert!(results.iter().all(|r| *r == expected));
    }

    #[test]
    fn test_stats_snapshot() {
        let stats = InferenceStats::default();
        assert_eq!(stats.snapshot().inference_count, 0);
        assert_eq!(stats.snapshot().avg_latency_ms, 0.0);

        stats.record(Duration::from_micros(1500));
        stats.record(Duration::from_micros(500));
        let snapshot = stats.snapshot();
        assert_eq!(snapshot.inference_count, 2);
        assert!((snapshot.avg_latency_ms - 1.0).abs() < 1e-12);
    }
}
