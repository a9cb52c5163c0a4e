//! CART regression tree using squared-error reduction.
//!
//! Nodes live in a flat arena with index 0 as the root. Leaves predict the
//! mean target of the training rows that reached them.

use serde::{Deserialize, Serialize};

use super::{check_targets, Regressor};
use crate::error::{DataError, ModelError};
use crate::features::FeatureMatrix;

/// Minimum squared-error reduction for a split to be kept.
const MIN_IMPROVEMENT: f64 = 1e-12;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
enum TreeNode {
    Split {
        feature_idx: usize,
        threshold: f64,
        left: usize,
        right: usize,
    },
    Leaf {
        value: f64,
    },
}

/// Growth limits for the tree.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct TreeParams {
    /// Maximum depth; 0 yields a single leaf
    pub max_depth: usize,
    /// Nodes with fewer rows are not split
    pub min_samples_split: usize,
}

impl Default for TreeParams {
    fn default() -> Self {
        Self {
            max_depth: 10,
            min_samples_split: 2,
        }
    }
}

/// Bounded-depth regression tree.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct DecisionTreeRegressor {
    params: TreeParams,
    n_features: usize,
    nodes: Vec<TreeNode>,
}

impl DecisionTreeRegressor {
    pub fn new(params: TreeParams) -> Self {
        Self {
            params,
            n_features: 0,
            nodes: Vec::new(),
        }
    }

    pub fn params(&self) -> TreeParams {
        self.params
    }

    pub fn n_leaves(&self) -> usize {
        self.nodes
            .iter()
            .filter(|n| matches!(n, TreeNode::Leaf { .. }))
            .count()
    }

    /// Depth of the fitted tree (a lone leaf has depth 0).
    pub fn depth(&self) -> usize {
        fn walk(nodes: &[TreeNode], idx: usize) -> usize {
            match &nodes[idx] {
                TreeNode::Leaf { .. } => 0,
                TreeNode::Split { left, right, .. } => {
                    1 + walk(nodes, *left).max(walk(nodes, *right))
                }
            }
        }
        if self.nodes.is_empty() {
            0
        } else {
            walk(&self.nodes, 0)
        }
    }

    /// Every split points forward to existing nodes and reads an existing
    /// column. Trees built by `fit` always satisfy this; deserialized ones
    /// may not.
    fn links_are_valid(&self) -> bool {
        let len = self.nodes.len();
        self.nodes.iter().enumerate().all(|(idx, node)| match node {
            TreeNode::Leaf { .. } => true,
            TreeNode::Split {
                feature_idx,
                left,
                right,
                ..
            } => {
                *feature_idx < self.n_features
                    && (idx + 1..len).contains(left)
                    && (idx + 1..len).contains(right)
            }
        })
    }

    fn predict_row(&self, row: &[f64]) -> f64 {
        let mut idx = 0;
        loop {
            match &self.nodes[idx] {
                TreeNode::Leaf { value } => return *value,
                TreeNode::Split {
                    feature_idx,
                    threshold,
                    left,
                    right,
                } => {
                    idx = if row[*feature_idx] <= *threshold {
                        *left
                    } else {
                        *right
                    };
                }
            }
        }
    }
}

impl Regressor for DecisionTreeRegressor {
    fn fit(&mut self, features: &FeatureMatrix, targets: &[f64]) -> Result<(), DataError> {
        check_targets(features, targets)?;

        let indices: Vec<usize> = (0..features.n_rows()).collect();
        let mut nodes = Vec::new();
        let builder = Builder {
            features,
            targets,
            params: self.params,
        };
        builder.build(&indices, 0, &mut nodes);

        tracing::debug!(
            nodes = nodes.len(),
            max_depth = self.params.max_depth,
            "fitted regression tree"
        );

        self.n_features = features.n_features();
        self.nodes = nodes;
        Ok(())
    }

    fn predict(&self, features: &FeatureMatrix) -> Result<Vec<f64>, ModelError> {
        if !self.is_fitted() {
            return Err(ModelError::NotTrained("decision tree has not been fitted".into()));
        }
        features.expect_width(self.n_features)?;
        Ok(features.rows().map(|row| self.predict_row(row)).collect())
    }

    fn is_fitted(&self) -> bool {
        !self.nodes.is_empty() && self.links_are_valid()
    }

    fn name(&self) -> &str {
        "decision_tree"
    }
}

// ---------------------------------------------------------------------------
// Tree building
// ---------------------------------------------------------------------------

struct Builder<'a> {
    features: &'a FeatureMatrix,
    targets: &'a [f64],
    params: TreeParams,
}

struct BestSplit {
    feature_idx: usize,
    threshold: f64,
    improvement: f64,
}

impl Builder<'_> {
    /// Recursively build the subtree for `indices`, returning its arena index.
    fn build(&self, indices: &[usize], depth: usize, nodes: &mut Vec<TreeNode>) -> usize {
        let value = self.mean(indices);

        if depth >= self.params.max_depth
            || indices.len() < self.params.min_samples_split.max(2)
        {
            return push_leaf(nodes, value);
        }

        let Some(best) = self.find_best_split(indices) else {
            return push_leaf(nodes, value);
        };

        let (left_idx, right_idx): (Vec<usize>, Vec<usize>) = indices
            .iter()
            .copied()
            .partition(|&i| self.features.get(i, best.feature_idx) <= best.threshold);
        if left_idx.is_empty() || right_idx.is_empty() {
            return push_leaf(nodes, value);
        }

        // Reserve the slot so the parent precedes its children
        let node_idx = push_leaf(nodes, value);
        let left = self.build(&left_idx, depth + 1, nodes);
        let right = self.build(&right_idx, depth + 1, nodes);
        nodes[node_idx] = TreeNode::Split {
            feature_idx: best.feature_idx,
            threshold: best.threshold,
            left,
            right,
        };
        node_idx
    }

    fn mean(&self, indices: &[usize]) -> f64 {
        indices.iter().map(|&i| self.targets[i]).sum::<f64>() / indices.len() as f64
    }

    /// Scan every feature for the threshold with the largest squared-error
    /// reduction. Earlier features win ties.
    fn find_best_split(&self, indices: &[usize]) -> Option<BestSplit> {
        let n = indices.len() as f64;
        let total: f64 = indices.iter().map(|&i| self.targets[i]).sum();
        let parent_score = total * total / n;

        let mut best: Option<BestSplit> = None;
        let mut order = indices.to_vec();

        for feat in 0..self.features.n_features() {
            order.sort_by(|&a, &b| {
                self.features
                    .get(a, feat)
                    .total_cmp(&self.features.get(b, feat))
            });

            let mut left_sum = 0.0;
            for k in 0..order.len() - 1 {
                left_sum += self.targets[order[k]];
                let here = self.features.get(order[k], feat);
                let next = self.features.get(order[k + 1], feat);
                if here >= next {
                    continue;
                }

                let n_left = (k + 1) as f64;
                let n_right = n - n_left;
                let right_sum = total - left_sum;
                let score = left_sum * left_sum / n_left + right_sum * right_sum / n_right;
                let improvement = score - parent_score;

                let better = match &best {
                    Some(b) => improvement > b.improvement,
                    None => improvement > MIN_IMPROVEMENT,
                };
                if better {
                    best = Some(BestSplit {
                        feature_idx: feat,
                        threshold: here + (next - here) / 2.0,
                        improvement,
                    });
                }
            }
        }

        best
    }
}

fn push_leaf(nodes: &mut Vec<TreeNode>, value: f64) -> usize {
    let idx = nodes.len();
    nodes.push(TreeNode::Leaf { value });
    idx
}
