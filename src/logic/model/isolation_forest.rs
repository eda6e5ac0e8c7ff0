//! Isolation Forest - density strategy
//!
//! Random axis-aligned partitioning of sub-samples. Points that isolate in few
//! splits get a low (more negative) score; the decision offset is the
//! contamination quantile of the training scores.

use ndarray::{ArrayView1, ArrayView2};
use rand::rngs::StdRng;
use rand::seq::index;
use rand::{Rng, SeedableRng};

use super::classifier::{AnomalyClassifier, Classification, ModelInfo, ModelKind};
use super::error::{ModelError, ModelResult};
use crate::logic::features::{feature_names, LayoutInfo};

/// Euler–Mascheroni constant, for the harmonic number approximation
const EULER_GAMMA: f64 = 0.577_215_664_901_532_9;

/// Sub-sample ceiling per tree
pub const DEFAULT_MAX_SAMPLES: usize = 256;

// ============================================================================
// PARAMETERS
// ============================================================================

#[derive(Debug, Clone, PartialEq)]
pub struct IsolationForestParams {
    pub n_estimators: usize,
    pub max_samples: usize,
    /// Expected outlier share of the training set, in (0, 0.5]
    pub contamination: f64,
    pub seed: u64,
}

impl Default for IsolationForestParams {
    fn default() -> Self {
        Self {
            n_estimators: 100,
            max_samples: DEFAULT_MAX_SAMPLES,
            contamination: 0.1,
            seed: 42,
        }
    }
}

impl IsolationForestParams {
    fn validate(&self) -> ModelResult<()> {
        if self.n_estimators == 0 {
            return Err(ModelError::InvalidConfig(
                "isolation forest needs at least one estimator".to_string(),
            ));
        }
        if self.max_samples == 0 {
            return Err(ModelError::InvalidConfig(
                "isolation forest max_samples must be positive".to_string(),
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
}

// ============================================================================
// ISOLATION TREE
// ============================================================================

#[derive(Debug, Clone, Copy)]
enum IsolationNode {
    Split {
        feature: usize,
        threshold: f64,
        left: usize,
        right: usize,
    },
    Leaf {
        size: usize,
    },
}

#[derive(Debug, Clone)]
struct IsolationTree {
    nodes: Vec<IsolationNode>,
}

impl IsolationTree {
    fn fit(data: ArrayView2<'_, f64>, rows: Vec<usize>, max_depth: usize, rng: &mut StdRng) -> Self {
        let mut tree = Self { nodes: Vec::new() };
        tree.grow(data, rows, 0, max_depth, rng);
        tree
    }

    fn grow(
        &mut self,
        data: ArrayView2<'_, f64>,
        rows: Vec<usize>,
        depth: usize,
        max_depth: usize,
        rng: &mut StdRng,
    ) -> usize {
        let id = self.nodes.len();
        self.nodes.push(IsolationNode::Leaf { size: rows.len() });

        if depth >= max_depth || rows.len() <= 1 {
            return id;
        }

        // Only features that still vary inside this node can split it
        let candidates: Vec<(usize, f64, f64)> = (0..data.ncols())
            .filter_map(|feature| {
                let (lo, hi) = rows.iter().fold((f64::INFINITY, f64::NEG_INFINITY), |(lo, hi), &r| {
                    let v = data[[r, feature]];
                    (lo.min(v), hi.max(v))
                });
                (hi > lo).then_some((feature, lo, hi))
            })
            .collect();

        if candidates.is_empty() {
            return id;
        }

        let (feature, lo, hi) = candidates[rng.gen_range(0..candidates.len())];
        let threshold = rng.gen_range(lo..hi);

        let (left_rows, right_rows): (Vec<usize>, Vec<usize>) = rows
            .into_iter()
            .partition(|&r| data[[r, feature]] <= threshold);

        let left = self.grow(data, left_rows, depth + 1, max_depth, rng);
        let right = self.grow(data, right_rows, depth + 1, max_depth, rng);

        self.nodes[id] = IsolationNode::Split {
            feature,
            threshold,
            left,
            right,
        };
        id
    }

    /// Depth reached by `x`, plus the expected remaining depth of its leaf
    fn path_length(&self, x: ArrayView1<'_, f64>) -> f64 {
        let mut node = 0;
        let mut depth = 0.0;

        loop {
            match self.nodes[node] {
                IsolationNode::Split {
                    feature,
                    threshold,
                    left,
                    right,
                } => {
                    node = if x[feature] <= threshold { left } else { right };
                    depth += 1.0;
                }
                IsolationNode::Leaf { size } => return depth + average_path_length(size),
            }
        }
    }
}

/// Average path length of an unsuccessful BST search over `n` points
pub fn average_path_length(n: usize) -> f64 {
    match n {
        0 | 1 => 0.0,
        2 => 1.0,
        _ => {
            let n = n as f64;
            2.0 * ((n - 1.0).ln() + EULER_GAMMA) - 2.0 * (n - 1.0) / n
        }
    }
}

// ============================================================================
// ISOLATION FOREST
// ============================================================================

#[derive(Debug, Clone)]
pub struct IsolationForest {
    trees: Vec<IsolationTree>,
    params: IsolationForestParams,
    n_features: usize,
    /// Sub-sample size actually used (min of max_samples and training rows)
    sample_size: usize,
    /// Scores below this are outliers
    offset: f64,
}

impl IsolationForest {
    pub fn fit(data: ArrayView2<'_, f64>, params: &IsolationForestParams) -> ModelResult<Self> {
        params.validate()?;

        let n_rows = data.nrows();
        if n_rows == 0 || data.ncols() == 0 {
            return Err(ModelError::EmptyTrainingSet);
        }

        let sample_size = params.max_samples.min(n_rows);
        let max_depth = (sample_size.max(2) as f64).log2().ceil() as usize;

        let mut rng = StdRng::seed_from_u64(params.seed);
        let trees = (0..params.n_estimators)
            .map(|_| {
                let mut tree_rng = StdRng::seed_from_u64(rng.gen());
                let rows = index::sample(&mut tree_rng, n_rows, sample_size).into_vec();
                IsolationTree::fit(data, rows, max_depth, &mut tree_rng)
            })
            .collect();

        let mut forest = Self {
            trees,
            params: params.clone(),
            n_features: data.ncols(),
            sample_size,
            offset: 0.0,
        };

        let mut training_scores: Vec<f64> = data.outer_iter().map(|row| forest.score(row)).collect();
        forest.offset = percentile(&mut training_scores, params.contamination * 100.0);

        tracing::debug!(
            trees = forest.trees.len(),
            sample_size,
            offset = forest.offset,
            "Isolation forest fitted"
        );

        Ok(forest)
    }

    /// Raw anomaly score in [-1, 0); lower is more anomalous
    pub fn score_sample(&self, x: ArrayView1<'_, f64>) -> ModelResult<f64> {
        self.check_width(x.len())?;
        Ok(self.score(x))
    }

    /// Outlier decision for a normalized vector
    pub fn is_outlier(&self, x: ArrayView1<'_, f64>) -> ModelResult<bool> {
        Ok(self.score_sample(x)? < self.offset)
    }

    pub fn offset(&self) -> f64 {
        self.offset
    }

    fn score(&self, x: ArrayView1<'_, f64>) -> f64 {
        let mean_depth =
            self.trees.iter().map(|t| t.path_length(x)).sum::<f64>() / self.trees.len() as f64;
        let normalizer = match average_path_length(self.sample_size) {
            c if c > 0.0 => c,
            _ => 1.0,
        };
        -(2f64.powf(-mean_depth / normalizer))
    }

    fn check_width(&self, actual: usize) -> ModelResult<()> {
        if actual != self.n_features {
            return Err(ModelError::DimensionMismatch {
                expected: self.n_features,
                actual,
            });
        }
        Ok(())
    }
}

impl AnomalyClassifier for IsolationForest {
    fn kind(&self) -> ModelKind {
        ModelKind::IsolationForest
    }

    fn classify(&self, x: ArrayView1<'_, f64>) -> ModelResult<Classification> {
        let score = self.score_sample(x)?;
        Ok(Classification {
            is_anomaly: score < self.offset,
            confidence: sigmoid_confidence(score),
            label: None,
        })
    }

    fn info(&self) -> ModelInfo {
        ModelInfo {
            name: self.kind().as_str().to_string(),
            model_type: self.kind().type_name().to_string(),
            features: feature_names(),
            num_features: self.n_features,
            n_estimators: self.params.n_estimators,
            contamination: Some(self.params.contamination),
            max_depth: None,
            classes: None,
            feature_layout: LayoutInfo::current(),
        }
    }
}

/// Logistic squashing of the raw score, strictly inside (0, 1) for finite input
pub fn sigmoid_confidence(score: f64) -> f64 {
    1.0 / (1.0 + score.exp())
}

/// Linear-interpolated percentile, `q` in [0, 100]
fn percentile(values: &mut [f64], q: f64) -> f64 {
    if values.is_empty() {
        return 0.0;
    }
    values.sort_by(|a, b| a.total_cmp(b));

    let rank = (q / 100.0) * (values.len() - 1) as f64;
    let lower = rank.floor() as usize;
    let upper = rank.ceil() as usize;
    let frac = rank - lower as f64;

    values[lower] + (values[upper] - values[lower]) * frac
}
