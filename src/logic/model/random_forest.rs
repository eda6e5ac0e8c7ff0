//! Random Forest - classification strategy
//!
//! Bagged CART trees over bootstrap samples; prediction averages the leaf
//! class distributions of all trees.

use ndarray::{ArrayView1, ArrayView2};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

use super::classifier::{AnomalyClassifier, Classification, ModelInfo, ModelKind};
use super::decision_tree::{DecisionTree, TreeParams};
use super::error::{ModelError, ModelResult};
use crate::logic::features::{feature_names, LayoutInfo};
use crate::logic::threat::AnomalyLabel;

#[derive(Debug, Clone, PartialEq)]
pub struct RandomForestParams {
    pub n_estimators: usize,
    pub max_depth: usize,
    pub seed: u64,
}

impl Default for RandomForestParams {
    fn default() -> Self {
        Self {
            n_estimators: 200,
            max_depth: 20,
            seed: 42,
        }
    }
}

#[derive(Debug, Clone)]
pub struct RandomForest {
    trees: Vec<DecisionTree>,
    params: RandomForestParams,
    n_features: usize,
    n_classes: usize,
    /// Mean decrease in impurity per feature, sums to 1
    importances: Vec<f64>,
}

impl RandomForest {
    /// Fit on `data` rows with class indices `labels` in `0..n_classes`
    pub fn fit(
        data: ArrayView2<'_, f64>,
        labels: &[usize],
        n_classes: usize,
        params: &RandomForestParams,
    ) -> ModelResult<Self> {
        let n_rows = data.nrows();
        let n_features = data.ncols();

        if n_rows == 0 || n_features == 0 {
            return Err(ModelError::EmptyTrainingSet);
        }
        if labels.len() != n_rows {
            return Err(ModelError::DimensionMismatch {
                expected: n_rows,
                actual: labels.len(),
            });
        }
        if params.n_estimators == 0 || params.max_depth == 0 {
            return Err(ModelError::InvalidConfig(
                "random forest needs at least one estimator and depth >= 1".to_string(),
            ));
        }
        if let Some(bad) = labels.iter().find(|&&l| l >= n_classes) {
            return Err(ModelError::InvalidConfig(format!(
                "label {} outside 0..{}",
                bad, n_classes
            )));
        }

        let tree_params = TreeParams {
            max_depth: params.max_depth,
            max_features: ((n_features as f64).sqrt() as usize).max(1),
            n_classes,
        };

        let mut rng = StdRng::seed_from_u64(params.seed);
        let trees: Vec<DecisionTree> = (0..params.n_estimators)
            .map(|_| {
                let mut tree_rng = StdRng::seed_from_u64(rng.gen());
                let bootstrap: Vec<usize> = (0..n_rows).map(|_| tree_rng.gen_range(0..n_rows)).collect();
                DecisionTree::fit(data, labels, bootstrap, tree_params, &mut tree_rng)
            })
            .collect();

        let mut importances = vec![0.0; n_features];
        for tree in &trees {
            for (total, v) in importances.iter_mut().zip(tree.importances()) {
                *total += v;
            }
        }
        let sum: f64 = importances.iter().sum();
        if sum > 0.0 {
            importances.iter_mut().for_each(|v| *v /= sum);
        }

        tracing::debug!(
            trees = trees.len(),
            max_features = tree_params.max_features,
            "Random forest fitted"
        );

        Ok(Self {
            trees,
            params: params.clone(),
            n_features,
            n_classes,
            importances,
        })
    }

    /// Mean class distribution over all trees
    pub fn predict_proba(&self, x: ArrayView1<'_, f64>) -> ModelResult<Vec<f64>> {
        if x.len() != self.n_features {
            return Err(ModelError::DimensionMismatch {
                expected: self.n_features,
                actual: x.len(),
            });
        }

        let mut proba = vec![0.0; self.n_classes];
        for tree in &self.trees {
            for (total, p) in proba.iter_mut().zip(tree.predict_proba(x)) {
                *total += p;
            }
        }
        let n_trees = self.trees.len() as f64;
        proba.iter_mut().for_each(|p| *p /= n_trees);
        Ok(proba)
    }

    /// Most probable class and its probability; ties go to the lower index
    pub fn predict(&self, x: ArrayView1<'_, f64>) -> ModelResult<(usize, f64)> {
        let proba = self.predict_proba(x)?;
        let best = proba
            .iter()
            .enumerate()
            .fold((0, f64::NEG_INFINITY), |best, (class, &p)| {
                if p > best.1 {
                    (class, p)
                } else {
                    best
                }
            });
        Ok(best)
    }

    /// Attack-type label for a normalized vector
    pub fn predict_label(&self, x: ArrayView1<'_, f64>) -> ModelResult<AnomalyLabel> {
        let (class, _) = self.predict(x)?;
        AnomalyLabel::from_index(class).ok_or_else(|| {
            ModelError::InvalidConfig(format!("class {} has no anomaly label", class))
        })
    }

    pub fn importances(&self) -> &[f64] {
        &self.importances
    }
}

impl AnomalyClassifier for RandomForest {
    fn kind(&self) -> ModelKind {
        ModelKind::RandomForest
    }

    fn classify(&self, x: ArrayView1<'_, f64>) -> ModelResult<Classification> {
        let (class, confidence) = self.predict(x)?;
        let label = AnomalyLabel::from_index(class).ok_or_else(|| {
            ModelError::InvalidConfig(format!("class {} has no anomaly label", class))
        })?;

        Ok(Classification {
            is_anomaly: label.is_attack(),
            confidence,
            label: Some(label),
        })
    }

    fn feature_importances(&self) -> Option<&[f64]> {
        Some(&self.importances)
    }

    fn info(&self) -> ModelInfo {
        ModelInfo {
            name: self.kind().as_str().to_string(),
            model_type: self.kind().type_name().to_string(),
            features: feature_names(),
            num_features: self.n_features,
            n_estimators: self.params.n_estimators,
            contamination: None,
            max_depth: Some(self.params.max_depth),
            classes: Some(AnomalyLabel::names()),
            feature_layout: LayoutInfo::current(),
        }
    }
}
