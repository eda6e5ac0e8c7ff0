//! CART decision tree (Gini impurity) used by the random forest

use ndarray::{ArrayView1, ArrayView2};
use rand::rngs::StdRng;
use rand::seq::index;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TreeParams {
    pub max_depth: usize,
    /// Non-constant features examined per split
    pub max_features: usize,
    pub n_classes: usize,
}

#[derive(Debug, Clone)]
enum TreeNode {
    Split {
        feature: usize,
        threshold: f64,
        left: usize,
        right: usize,
    },
    Leaf {
        /// Class distribution of the training rows that reached this leaf
        proba: Vec<f64>,
    },
}

/// Best split found for a node
#[derive(Debug, Clone, Copy)]
struct SplitCandidate {
    feature: usize,
    threshold: f64,
    /// Size-weighted impurity of the two children
    weighted_impurity: f64,
}

#[derive(Debug, Clone)]
pub struct DecisionTree {
    nodes: Vec<TreeNode>,
    /// Total impurity decrease per feature, normalized to sum 1
    importances: Vec<f64>,
}

/// Borrowed training inputs threaded through the recursion
struct GrowContext<'a> {
    data: ArrayView2<'a, f64>,
    labels: &'a [usize],
    params: TreeParams,
}

impl DecisionTree {
    /// Grow a tree on `rows` (indices into `data`, duplicates allowed)
    pub fn fit(
        data: ArrayView2<'_, f64>,
        labels: &[usize],
        rows: Vec<usize>,
        params: TreeParams,
        rng: &mut StdRng,
    ) -> Self {
        let mut tree = Self {
            nodes: Vec::new(),
            importances: vec![0.0; data.ncols()],
        };
        let ctx = GrowContext {
            data: data.view(),
            labels,
            params,
        };
        tree.grow(&ctx, rows, 0, rng);

        let total: f64 = tree.importances.iter().sum();
        if total > 0.0 {
            tree.importances.iter_mut().for_each(|v| *v /= total);
        }
        tree
    }

    /// Class distribution at the leaf `x` falls into
    pub fn predict_proba(&self, x: ArrayView1<'_, f64>) -> &[f64] {
        let mut node = 0;
        loop {
            match &self.nodes[node] {
                TreeNode::Split {
                    feature,
                    threshold,
                    left,
                    right,
                } => {
                    node = if x[*feature] <= *threshold { *left } else { *right };
                }
                TreeNode::Leaf { proba } => return proba,
            }
        }
    }

    pub fn importances(&self) -> &[f64] {
        &self.importances
    }

    pub fn depth(&self) -> usize {
        self.depth_from(0)
    }

    fn depth_from(&self, node: usize) -> usize {
        match &self.nodes[node] {
            TreeNode::Split { left, right, .. } => {
                1 + self.depth_from(*left).max(self.depth_from(*right))
            }
            TreeNode::Leaf { .. } => 0,
        }
    }

    fn grow(&mut self, ctx: &GrowContext<'_>, rows: Vec<usize>, depth: usize, rng: &mut StdRng) -> usize {
        let n = rows.len();
        let counts = class_counts(ctx.labels, &rows, ctx.params.n_classes);
        let impurity = gini(&counts, n);

        let id = self.nodes.len();
        self.nodes.push(TreeNode::Leaf {
            proba: counts.iter().map(|&c| c as f64 / n.max(1) as f64).collect(),
        });

        if depth >= ctx.params.max_depth || n < 2 || impurity <= 0.0 {
            return id;
        }

        let Some(split) = best_split(ctx, &rows, &counts, rng) else {
            return id;
        };

        let (left_rows, right_rows): (Vec<usize>, Vec<usize>) = rows
            .into_iter()
            .partition(|&r| ctx.data[[r, split.feature]] <= split.threshold);

        // Weighted impurity decrease, in sample counts
        self.importances[split.feature] += n as f64 * (impurity - split.weighted_impurity);

        let left = self.grow(ctx, left_rows, depth + 1, rng);
        let right = self.grow(ctx, right_rows, depth + 1, rng);

        self.nodes[id] = TreeNode::Split {
            feature: split.feature,
            threshold: split.threshold,
            left,
            right,
        };
        id
    }
}

/// Exhaustive threshold search over a random subset of features.
///
/// Features are visited in random order until `max_features` non-constant
/// ones have been examined.
fn best_split(
    ctx: &GrowContext<'_>,
    rows: &[usize],
    counts: &[usize],
    rng: &mut StdRng,
) -> Option<SplitCandidate> {
    let n = rows.len();
    let n_features = ctx.data.ncols();
    let mut best: Option<SplitCandidate> = None;
    let mut visited = 0;

    for feature in index::sample(rng, n_features, n_features).into_iter() {
        if visited >= ctx.params.max_features {
            break;
        }

        let mut sorted = rows.to_vec();
        sorted.sort_by(|&a, &b| ctx.data[[a, feature]].total_cmp(&ctx.data[[b, feature]]));

        let first = ctx.data[[sorted[0], feature]];
        let last = ctx.data[[sorted[n - 1], feature]];
        if last <= first {
            continue;
        }
        visited += 1;

        let mut left = vec![0usize; counts.len()];
        let mut right = counts.to_vec();

        for i in 0..n - 1 {
            let class = ctx.labels[sorted[i]];
            left[class] += 1;
            right[class] -= 1;

            let value = ctx.data[[sorted[i], feature]];
            let next = ctx.data[[sorted[i + 1], feature]];
            if next <= value {
                continue;
            }

            let n_left = i + 1;
            let n_right = n - n_left;
            let weighted_impurity = (n_left as f64 * gini(&left, n_left)
                + n_right as f64 * gini(&right, n_right))
                / n as f64;

            if best.map_or(true, |b| weighted_impurity < b.weighted_impurity) {
                let mut threshold = value / 2.0 + next / 2.0;
                if threshold >= next {
                    threshold = value;
                }
                best = Some(SplitCandidate {
                    feature,
                    threshold,
                    weighted_impurity,
                });
            }
        }
    }

    best
}

fn class_counts(labels: &[usize], rows: &[usize], n_classes: usize) -> Vec<usize> {
    let mut counts = vec![0usize; n_classes];
    for &r in rows {
        counts[labels[r]] += 1;
    }
    counts
}

/// Gini impurity of a class histogram holding `n` samples
fn gini(counts: &[usize], n: usize) -> f64 {
    if n == 0 {
        return 0.0;
    }
    let n = n as f64;
    1.0 - counts
        .iter()
        .map(|&c| {
            let p = c as f64 / n;
            p * p
        })
        .sum::<f64>()
}
